//! Error types for the server crate and the unified [`ArschlochError`].

use arschloch_protocol::ProtocolError;
use arschloch_table::TableError;

/// Errors from the WebSocket transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer went away during the handshake.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or upgrading a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The peer sent nothing within the handshake window.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    Failed(String),
}

/// Top-level error that wraps every crate-specific error.
///
/// Each variant has a `#[from]` impl, so `?` converts errors from the
/// protocol, table, transport and auth layers automatically.
#[derive(Debug, thiserror::Error)]
pub enum ArschlochError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use arschloch_rules::GameError;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let err: ArschlochError = err.into();
        assert!(matches!(err, ArschlochError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: ArschlochError = ProtocolError::InvalidSyntax("5x".into()).into();
        assert!(matches!(err, ArschlochError::Protocol(_)));
    }

    #[test]
    fn test_from_auth_error() {
        let err: ArschlochError = AuthError::Failed("nope".into()).into();
        assert_eq!(err.to_string(), "authentication failed: nope");
    }

    #[test]
    fn test_rule_error_passes_through_table() {
        let err: ArschlochError = TableError::from(GameError::NotYourTurn).into();
        assert_eq!(err.to_string(), "it is not your turn");
    }
}
