//! Codec trait and implementations for notifications on the wire.
//!
//! The table produces [`Notification`](crate::Notification) values; the
//! front end needs bytes. Anything implementing [`Codec`] can sit in
//! between, so a compact binary format can replace JSON without touching
//! the table.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// The server never decodes: players send plain-text commands. This is
    /// for clients and tests reading notifications off the wire.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`. Behind the `json` feature (default).
///
/// ```rust
/// use arschloch_protocol::{Codec, JsonCodec, Notification};
///
/// let codec = JsonCodec;
/// let note = Notification::Info { message: "Waiting for P-1 ...".into() };
///
/// let bytes = codec.encode(&note).unwrap();
/// let decoded: Notification = codec.decode(&bytes).unwrap();
/// assert_eq!(note, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
