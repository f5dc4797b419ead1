//! Player intents and where they come from.

use std::collections::VecDeque;

use thiserror::Error;

/// What the player wants to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Step by `(dx, dy)`.
    Move { dx: i32, dy: i32 },
    /// Do nothing.
    Wait,
}

impl Intent {
    pub const NORTH: Self = Self::Move { dx: 0, dy: -1 };
    pub const SOUTH: Self = Self::Move { dx: 0, dy: 1 };
    pub const EAST: Self = Self::Move { dx: 1, dy: 0 };
    pub const WEST: Self = Self::Move { dx: -1, dy: 0 };

    /// Map a vi-style roguelike key to an intent.
    ///
    /// `h j k l` move west, south, north, east; `y u b n` move diagonally;
    /// `.` waits.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        let intent = match key {
            'h' => Self::WEST,
            'j' => Self::SOUTH,
            'k' => Self::NORTH,
            'l' => Self::EAST,
            'y' => Self::Move { dx: -1, dy: -1 },
            'u' => Self::Move { dx: 1, dy: -1 },
            'b' => Self::Move { dx: -1, dy: 1 },
            'n' => Self::Move { dx: 1, dy: 1 },
            '.' => Self::Wait,
            _ => return None,
        };
        Some(intent)
    }
}

/// Source of player intents, polled once per accepted key press.
pub trait InputSource {
    /// The next intent, or `None` if nothing is pending.
    fn next_intent(&mut self) -> Option<Intent>;
}

/// A key that [`Intent::from_key`] does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown key {key:?} at position {position}")]
pub struct UnknownKey {
    pub key: char,
    pub position: usize,
}

/// A fixed queue of intents, replayed in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedInput {
    intents: VecDeque<Intent>,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
        }
    }

    /// Parse a string of vi-style keys. Whitespace is skipped.
    pub fn from_keys(keys: &str) -> Result<Self, UnknownKey> {
        keys.chars()
            .enumerate()
            .filter(|(_, key)| !key.is_whitespace())
            .map(|(position, key)| Intent::from_key(key).ok_or(UnknownKey { key, position }))
            .collect::<Result<VecDeque<_>, _>>()
            .map(|intents| Self { intents })
    }

    pub fn push(&mut self, intent: Intent) {
        self.intents.push_back(intent);
    }

    /// Intents not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.intents.len()
    }
}

impl IntoIterator for ScriptedInput {
    type Item = Intent;
    type IntoIter = std::collections::vec_deque::IntoIter<Intent>;

    fn into_iter(self) -> Self::IntoIter {
        self.intents.into_iter()
    }
}

impl InputSource for ScriptedInput {
    fn next_intent(&mut self) -> Option<Intent> {
        self.intents.pop_front()
    }
}
