//! Error types for the protocol layer.
//!
//! Each crate of the workspace keeps its own error enum; a
//! `ProtocolError` always means something went wrong turning text or
//! bytes into table vocabulary (or back).

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a notification failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserializing a notification failed.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A command did not match the grammar.
    #[error("invalid syntax: {0:?}")]
    InvalidSyntax(String),

    /// A rank label outside `7 8 9 10 J Q K A`.
    #[error("unknown rank: {0:?}")]
    UnknownRank(String),
}
