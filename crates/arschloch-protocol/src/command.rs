//! The player command grammar.
//!
//! Players talk to the table in short text commands, matched
//! case-insensitively:
//!
//! ```text
//! .join  .quit          lobby
//! p…                    pass
//! 2K                    play two Kings (count 1-4, then a rank)
//! A & K                 König asking for / giving back two cards
//! 9                     Vize-König asking for / giving back one card
//! yes | y | no | n      vote on continuing after a round
//! ```
//!
//! Parsing never looks at the game phase. A lone rank is always a trade
//! and `"10"` is the rank ten, not "one zero", so the grammar stays
//! unambiguous; the table decides whether the command fits the phase.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ProtocolError, Rank};

/// Cards named in a trade command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeCards {
    /// `RANK`: the Vize-König exchange.
    One(Rank),
    /// `RANK & RANK`: the König exchange.
    Two(Rank, Rank),
}

impl TradeCards {
    /// The named ranks in the order they were typed.
    pub fn ranks(&self) -> Vec<Rank> {
        match *self {
            Self::One(rank) => vec![rank],
            Self::Two(first, second) => vec![first, second],
        }
    }
}

/// A parsed player command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Join,
    Quit,
    Pass,
    Play { count: u8, rank: Rank },
    Trade(TradeCards),
    Vote(bool),
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        let lower = text.to_ascii_lowercase();

        match lower.as_str() {
            ".join" => return Ok(Self::Join),
            ".quit" => return Ok(Self::Quit),
            "yes" | "y" => return Ok(Self::Vote(true)),
            "no" | "n" => return Ok(Self::Vote(false)),
            _ => {}
        }

        if lower.starts_with('p') {
            return Ok(Self::Pass);
        }

        let invalid = || ProtocolError::InvalidSyntax(text.to_string());

        if let Some((first, second)) = text.split_once('&') {
            let first = first.parse().map_err(|_| invalid())?;
            let second = second.parse().map_err(|_| invalid())?;
            return Ok(Self::Trade(TradeCards::Two(first, second)));
        }

        if let Ok(rank) = text.parse() {
            return Ok(Self::Trade(TradeCards::One(rank)));
        }

        let mut chars = text.chars();
        let count = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(invalid)?;
        let rank = chars.as_str().parse().map_err(|_| invalid())?;

        Ok(Self::Play { count: count as u8, rank })
    }
}
