//! Core vocabulary shared by every layer of the table.
//!
//! Everything in here either travels to clients inside a
//! [`Notification`] or is named by a [`Command`](crate::Command), so all
//! types derive serde and have a stable textual form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque, stable identity of a player.
///
/// The table never sees transport objects (connections, chat users);
/// whatever sits in front of it maps its own notion of a user onto one of
/// these. Serialized as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Rank
// ---------------------------------------------------------------------------

/// Card rank. The 32-card deck only has these eight.
///
/// Variant order is the game order: `Seven` is the lowest card and `Ace`
/// the highest, so the derived `Ord` is the comparison used for tricks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// All ranks, lowest first.
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Position in the game order (0 for `Seven`, 7 for `Ace`).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The label players type and see: `"7"`, ..., `"10"`, `"J"`, ..., `"A"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive, whitespace-tolerant.
impl FromStr for Rank {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.label().eq_ignore_ascii_case(label))
            .ok_or_else(|| ProtocolError::UnknownRank(label.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Finishing role earned in a round.
///
/// Not to be confused with [`Rank::King`]: the König is a player, the
/// King is a card. "No role" is `Option::<Role>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// First to finish.
    Koenig,
    /// Second to finish.
    ViceKoenig,
    /// Third to finish.
    ViceArschloch,
    /// Last, or whoever escapes by finishing on an Ace.
    Arschloch,
}

impl Role {
    /// Short label used in the seating order view.
    pub fn label(self) -> &'static str {
        match self {
            Self::Koenig => "K",
            Self::ViceKoenig => "VK",
            Self::ViceArschloch => "VA",
            Self::Arschloch => "A",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Koenig => "König",
            Self::ViceKoenig => "Vize-König",
            Self::ViceArschloch => "Vize-Arschloch",
            Self::Arschloch => "Arschloch",
        })
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of the table.
///
/// ```text
/// Queue → Running → Next → Trading → Running → …
///   ↑_______________________________________|  (reset from anywhere)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for four players to queue up.
    Queue,
    /// Cards are being played.
    Running,
    /// Round over, waiting for everyone to vote on continuing.
    Next,
    /// Post-round card exchange between the extreme roles.
    Trading,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Queue => "Queue",
            Self::Running => "Running",
            Self::Next => "Next",
            Self::Trading => "Trading",
        })
    }
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// The last accepted play of the current trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StackEntry {
    /// No play yet: any play opens the trick.
    #[default]
    Empty,
    /// `count` cards of `rank`.
    Cards { count: u8, rank: Rank },
}

impl StackEntry {
    /// Returns `true` if the trick has not been opened.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("-"),
            Self::Cards { count, rank } => write!(f, "{count}x{rank}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// One seat as shown in the order view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub player_id: PlayerId,
    pub role: Option<Role>,
    pub finished: bool,
}

/// Everything the table tells a player.
///
/// The variants map one-to-one onto the render calls of the notification
/// sink; `Welcome` is sent by the server front end after the handshake.
/// Internally tagged, e.g. `{"type":"Round","number":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// The connection is authenticated as `player_id`.
    Welcome { player_id: PlayerId },
    /// Current phase and queued players.
    Lobby { phase: Phase, queue: Vec<PlayerId> },
    /// 1-based round counter.
    Round { number: u32 },
    /// Seating order, roles and whose turn it is.
    Order { seats: Vec<SeatView>, current: usize },
    /// The active trick.
    Stack { stack: StackEntry },
    /// The recipient's own hand, ascending.
    Hand { cards: Vec<Rank> },
    /// Free-form status line, including rejections.
    Info { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order_is_game_order() {
        assert!(Rank::Seven < Rank::Eight);
        assert!(Rank::Ten < Rank::Jack);
        assert!(Rank::King < Rank::Ace);
        assert_eq!(Rank::Seven.index(), 0);
        assert_eq!(Rank::Ace.index(), 7);
        let mut sorted = Rank::ALL;
        sorted.sort();
        assert_eq!(sorted, Rank::ALL);
    }

    #[test]
    fn test_rank_parse_is_case_insensitive() {
        assert_eq!("q".parse::<Rank>().unwrap(), Rank::Queen);
        assert_eq!(" 10 ".parse::<Rank>().unwrap(), Rank::Ten);
        assert_eq!("a".parse::<Rank>().unwrap(), Rank::Ace);
        assert!("1".parse::<Rank>().is_err());
        assert!("11".parse::<Rank>().is_err());
    }

    #[test]
    fn test_rank_serializes_as_label() {
        let json = serde_json::to_string(&vec![Rank::Ten, Rank::Jack]).unwrap();
        assert_eq!(json, r#"["10","J"]"#);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::Koenig.label(), "K");
        assert_eq!(Role::ViceArschloch.label(), "VA");
        assert_eq!(Role::ViceKoenig.to_string(), "Vize-König");
    }

    #[test]
    fn test_stack_entry_display() {
        assert_eq!(StackEntry::Empty.to_string(), "-");
        let stack = StackEntry::Cards { count: 2, rank: Rank::King };
        assert_eq!(stack.to_string(), "2xK");
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_notification_is_internally_tagged() {
        let json = serde_json::to_value(Notification::Round { number: 3 }).unwrap();
        assert_eq!(json["type"], "Round");
        assert_eq!(json["number"], 3);

        let json = serde_json::to_value(Notification::Stack {
            stack: StackEntry::Cards { count: 4, rank: Rank::Queen },
        })
        .unwrap();
        assert_eq!(json["stack"]["kind"], "Cards");
        assert_eq!(json["stack"]["rank"], "Q");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(42).to_string(), "P-42");
    }
}
