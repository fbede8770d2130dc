//! Integration tests for the server: handshake, routing and the full
//! connection flow over real WebSockets.

use std::time::Duration;

use arschloch::prelude::*;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let config = TableConfig::seeded(7).with_idle(IdleConfig::disabled());
    let server = ArschlochServerBuilder::new()
        .bind("127.0.0.1:0")
        .table_config(config)
        .build(NumericAuthenticator)
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_text(ws: &mut ClientWs, text: &str) {
    ws.send(Message::Text(text.to_string().into()))
        .await
        .expect("send");
}

async fn recv(ws: &mut ClientWs) -> Notification {
    let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
        .await
        .expect("timed out waiting for a notification")
        .expect("stream ended")
        .expect("recv failed");
    serde_json::from_slice(&msg.into_data()).expect("decode")
}

async fn recv_until<T>(ws: &mut ClientWs, mut pick: impl FnMut(Notification) -> Option<T>) -> T {
    loop {
        if let Some(found) = pick(recv(ws).await) {
            return found;
        }
    }
}

/// Connects and authenticates as `id`, consuming the `Welcome`.
async fn login(addr: &str, id: u64) -> ClientWs {
    let mut ws = connect(addr).await;
    send_text(&mut ws, &id.to_string()).await;
    assert_eq!(
        recv(&mut ws).await,
        Notification::Welcome {
            player_id: PlayerId(id)
        }
    );
    ws
}

// =========================================================================
// Handshake
// =========================================================================

#[tokio::test]
async fn test_welcome_then_lobby_view() {
    let addr = start_server().await;
    let mut ws = login(&addr, 42).await;

    assert_eq!(
        recv(&mut ws).await,
        Notification::Lobby {
            phase: Phase::Queue,
            queue: vec![]
        }
    );
}

#[tokio::test]
async fn test_bad_token_is_unauthorized() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;
    send_text(&mut ws, "alice").await;

    match recv(&mut ws).await {
        Notification::Info { message } => assert!(message.starts_with("Unauthorized")),
        other => panic!("expected Unauthorized info, got {other:?}"),
    }
}

// =========================================================================
// Commands
// =========================================================================

#[tokio::test]
async fn test_garbage_command_is_rejected() {
    let addr = start_server().await;
    let mut ws = login(&addr, 1).await;
    send_text(&mut ws, "hello").await;

    let line = recv_until(&mut ws, |n| match n {
        Notification::Info { message } if message.starts_with("Rejected") => Some(message),
        _ => None,
    })
    .await;
    assert_eq!(line, "Rejected: invalid syntax");
}

#[tokio::test]
async fn test_join_shows_in_lobby() {
    let addr = start_server().await;
    let mut ws = login(&addr, 5).await;
    send_text(&mut ws, ".join").await;

    let queue = recv_until(&mut ws, |n| match n {
        Notification::Lobby { queue, .. } if !queue.is_empty() => Some(queue),
        _ => None,
    })
    .await;
    assert_eq!(queue, vec![PlayerId(5)]);
}

#[tokio::test]
async fn test_four_players_get_dealt_in() {
    let addr = start_server().await;
    let mut clients = Vec::new();
    for id in 1..=4 {
        clients.push(login(&addr, id).await);
    }
    for ws in &mut clients {
        send_text(ws, ".join").await;
    }

    let mut total = 0;
    for ws in &mut clients {
        let hand = recv_until(ws, |n| match n {
            Notification::Hand { cards } => Some(cards),
            _ => None,
        })
        .await;
        assert_eq!(hand.len(), 8);
        total += hand.len();
    }
    assert_eq!(total, 32);
}

#[tokio::test]
async fn test_closing_socket_keeps_seat() {
    let addr = start_server().await;
    let mut clients = Vec::new();
    for id in 1..=4 {
        clients.push(login(&addr, id).await);
    }
    for ws in &mut clients {
        send_text(ws, ".join").await;
    }
    for ws in &mut clients {
        recv_until(ws, |n| matches!(n, Notification::Hand { .. }).then_some(())).await;
    }

    let mut leaver = clients.remove(3);
    leaver.close(None).await.expect("close");
    drop(leaver);

    // Reconnecting re-renders the running round, hand included.
    let mut back = login(&addr, 4).await;
    let hand = recv_until(&mut back, |n| match n {
        Notification::Hand { cards } => Some(cards),
        _ => None,
    })
    .await;
    assert_eq!(hand.len(), 8);
}

#[tokio::test]
async fn test_second_login_closes_first_socket() {
    let addr = start_server().await;
    let mut first = login(&addr, 9).await;
    let mut second = login(&addr, 9).await;

    // The first socket drains what it was sent, then the server closes it.
    let closed = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match first.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "old connection was left open");

    send_text(&mut second, ".join").await;
    let queue = recv_until(&mut second, |n| match n {
        Notification::Lobby { queue, .. } if !queue.is_empty() => Some(queue),
        _ => None,
    })
    .await;
    assert_eq!(queue, vec![PlayerId(9)]);
}
