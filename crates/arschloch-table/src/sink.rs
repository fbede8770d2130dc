//! Per-player notification sink.

use arschloch_protocol::{Notification, Phase, PlayerId, Rank, SeatView, StackEntry};
use tokio::sync::mpsc;

/// Channel sender for delivering notifications to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<Notification>;

/// Where the table renders a player's view.
///
/// Delivery is best effort: a sink whose player has gone away drops the
/// notification and the table carries on.
pub trait NotificationSink: Send {
    fn deliver(&self, notification: Notification);

    fn render_round(&self, number: u32) {
        self.deliver(Notification::Round { number });
    }

    fn render_order(&self, seats: Vec<SeatView>, current: usize) {
        self.deliver(Notification::Order { seats, current });
    }

    fn render_stack(&self, stack: StackEntry) {
        self.deliver(Notification::Stack { stack });
    }

    fn render_hand(&self, cards: &[Rank]) {
        self.deliver(Notification::Hand {
            cards: cards.to_vec(),
        });
    }

    fn render_info(&self, message: &str) {
        self.deliver(Notification::Info {
            message: message.to_owned(),
        });
    }

    fn render_lobby(&self, phase: Phase, queue: &[PlayerId]) {
        self.deliver(Notification::Lobby {
            phase,
            queue: queue.to_vec(),
        });
    }
}

impl NotificationSink for PlayerSender {
    fn deliver(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::trace!("notification dropped, receiver gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_renders_notifications() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.render_round(3);
        tx.render_info("hello");
        assert_eq!(rx.try_recv().unwrap(), Notification::Round { number: 3 });
        assert_eq!(
            rx.try_recv().unwrap(),
            Notification::Info {
                message: "hello".into()
            }
        );
    }

    #[test]
    fn test_closed_sender_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel::<Notification>();
        drop(rx);
        tx.render_stack(StackEntry::Empty);
    }
}
