//! Lobby directory: the ordered queue of players waiting for a seat.

use arschloch_protocol::PlayerId;
use arschloch_rules::SEATS;

use crate::LobbyError;

/// Up to four distinct players in join order.
///
/// Reaching four triggers the deal; the queue then doubles as the
/// seating order and stays full until the table is reset.
#[derive(Debug, Clone, Default)]
pub struct Lobby {
    queue: Vec<PlayerId>,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `player`, returning the new queue length.
    pub fn join(&mut self, player: PlayerId) -> Result<usize, LobbyError> {
        if self.contains(player) {
            return Err(LobbyError::AlreadyQueued);
        }
        if self.is_full() {
            return Err(LobbyError::QueueFull);
        }
        self.queue.push(player);
        Ok(self.queue.len())
    }

    pub fn leave(&mut self, player: PlayerId) -> Result<(), LobbyError> {
        let index = self
            .queue
            .iter()
            .position(|&p| p == player)
            .ok_or(LobbyError::NotQueued)?;
        self.queue.remove(index);
        Ok(())
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.queue.contains(&player)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.len() >= SEATS
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.queue
    }

    /// The seating order, once four players are queued.
    pub fn seating(&self) -> Option<[PlayerId; SEATS]> {
        self.queue.as_slice().try_into().ok()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_until_full() {
        let mut lobby = Lobby::new();
        for id in 1..=4 {
            assert_eq!(lobby.join(PlayerId(id)), Ok(id as usize));
        }
        assert!(lobby.is_full());
        assert_eq!(lobby.join(PlayerId(5)), Err(LobbyError::QueueFull));
        assert_eq!(
            lobby.seating(),
            Some([PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)])
        );
    }

    #[test]
    fn test_duplicate_join_rejected() {
        let mut lobby = Lobby::new();
        lobby.join(PlayerId(1)).unwrap();
        assert_eq!(lobby.join(PlayerId(1)), Err(LobbyError::AlreadyQueued));
        assert_eq!(lobby.len(), 1);
    }

    #[test]
    fn test_leave_keeps_order() {
        let mut lobby = Lobby::new();
        for id in 1..=3 {
            lobby.join(PlayerId(id)).unwrap();
        }
        lobby.leave(PlayerId(2)).unwrap();
        assert_eq!(lobby.players(), &[PlayerId(1), PlayerId(3)]);
        assert_eq!(lobby.leave(PlayerId(2)), Err(LobbyError::NotQueued));
        assert_eq!(lobby.seating(), None);
    }
}
