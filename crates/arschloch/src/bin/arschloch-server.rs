//! Runs one Arschloch table behind a WebSocket listener.
//!
//! Environment:
//!
//! - `ARSCHLOCH_BIND`: listen address, default `127.0.0.1:8080`
//! - `ARSCHLOCH_IDLE_SECS`: seconds of silence before the warning
//! - `ARSCHLOCH_GRACE_SECS`: seconds between the warning and the reset
//! - `ARSCHLOCH_SEED`: fixed deal seed, for replaying a session
//! - `RUST_LOG`: tracing filter, default `info`

use std::time::Duration;

use arschloch::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:8080";

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

fn table_config() -> TableConfig {
    let mut config = TableConfig::default();
    config.seed = env_parse("ARSCHLOCH_SEED");

    let defaults = IdleConfig::default();
    let idle_after = env_parse("ARSCHLOCH_IDLE_SECS")
        .map(Duration::from_secs)
        .unwrap_or(defaults.idle_after);
    let grace = env_parse("ARSCHLOCH_GRACE_SECS")
        .map(Duration::from_secs)
        .unwrap_or(defaults.grace);
    config.idle = IdleConfig::with_timings(idle_after, grace).validated();
    config
}

#[tokio::main]
async fn main() -> Result<(), ArschlochError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("ARSCHLOCH_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let server = ArschlochServerBuilder::new()
        .bind(&bind)
        .table_config(table_config())
        .build(NumericAuthenticator)
        .await?;

    tracing::info!(addr = %server.local_addr().map_err(TransportError::AcceptFailed)?, "listening");
    server.run().await
}
