//! WebSocket transport using `tokio-tungstenite`.
//!
//! Players send commands as text frames. Notifications go back as text
//! frames when the codec produced UTF-8, binary frames otherwise.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::TransportError;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Opaque identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Listens for WebSocket connections.
pub struct WebSocketTransport {
    listener: TcpListener,
}

impl WebSocketTransport {
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket transport listening");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next TCP connection and completes the upgrade.
    pub async fn accept(&self) -> Result<WebSocketConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(io_error(std::io::ErrorKind::ConnectionRefused, e))
        })?;

        let id = ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");
        Ok(WebSocketConnection { id, ws })
    }
}

/// A single upgraded connection, used whole during the handshake and then
/// split into a reader and a writer.
pub struct WebSocketConnection {
    id: ConnectionId,
    ws: WsStream,
}

impl WebSocketConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Next text payload, or `None` once the peer closed.
    pub async fn recv_text(&mut self) -> Result<Option<String>, TransportError> {
        read_text(&mut self.ws).await
    }

    pub async fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
        write_frame(&mut self.ws, data).await
    }

    pub fn split(self) -> (ConnectionWriter, ConnectionReader) {
        let (sink, stream) = self.ws.split();
        (ConnectionWriter { sink }, ConnectionReader { stream })
    }
}

/// Sending half of a connection.
pub struct ConnectionWriter {
    sink: SplitSink<WsStream, Message>,
}

impl ConnectionWriter {
    pub async fn send(&mut self, data: Vec<u8>) -> Result<(), TransportError> {
        write_frame(&mut self.sink, data).await
    }

    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::SendFailed(io_error(std::io::ErrorKind::BrokenPipe, e)))
    }
}

/// Receiving half of a connection.
pub struct ConnectionReader {
    stream: SplitStream<WsStream>,
}

impl ConnectionReader {
    pub async fn recv_text(&mut self) -> Result<Option<String>, TransportError> {
        read_text(&mut self.stream).await
    }
}

async fn read_text<S>(stream: &mut S) -> Result<Option<String>, TransportError>
where
    S: futures_util::Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => return Ok(Some(text.as_str().to_owned())),
            Some(Ok(Message::Binary(data))) => {
                return Ok(Some(String::from_utf8_lossy(&data).into_owned()));
            }
            Some(Ok(Message::Close(_))) | None => return Ok(None),
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                return Err(TransportError::ReceiveFailed(io_error(
                    std::io::ErrorKind::ConnectionReset,
                    e,
                )));
            }
        }
    }
}

async fn write_frame<S>(sink: &mut S, data: Vec<u8>) -> Result<(), TransportError>
where
    S: futures_util::Sink<Message, Error = tungstenite::Error> + Unpin,
{
    let message = match String::from_utf8(data) {
        Ok(text) => Message::Text(text.into()),
        Err(e) => Message::Binary(e.into_bytes().into()),
    };
    sink.send(message)
        .await
        .map_err(|e| TransportError::SendFailed(io_error(std::io::ErrorKind::BrokenPipe, e)))
}

fn io_error(kind: std::io::ErrorKind, err: tungstenite::Error) -> std::io::Error {
    std::io::Error::new(kind, err)
}
