//! Authentication hook mapping a connection's token to a [`PlayerId`].
//!
//! The table only knows opaque player ids. Whatever identity provider sits
//! in front of the server implements [`Authenticator`]; the handler calls
//! it once per connection with the first text frame.

use arschloch_protocol::PlayerId;

use crate::AuthError;

/// Validates a client's token and returns their identity.
///
/// `Send + Sync + 'static` because one instance is shared by every
/// connection task for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use arschloch::{AuthError, Authenticator};
/// use arschloch_protocol::PlayerId;
///
/// /// Everybody is player 1.
/// struct SinglePlayer;
///
/// impl Authenticator for SinglePlayer {
///     async fn authenticate(&self, _token: &str) -> Result<PlayerId, AuthError> {
///         Ok(PlayerId(1))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, AuthError>> + Send;
}

/// Uses the token, parsed as a number, as the player id.
///
/// For local play and tests; it trusts whatever the client sends.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericAuthenticator;

impl Authenticator for NumericAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<PlayerId, AuthError> {
        let id: u64 = token
            .trim()
            .parse()
            .map_err(|_| AuthError::Failed(format!("token {token:?} is not a number")))?;
        Ok(PlayerId(id))
    }
}
