use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{
    constants::{ACTION_CREATE, ACTION_TAKE, BOARD_CELLS},
    error::AppError,
};

/// Game state as written by the ledger-side transaction processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GameState {
    #[default]
    Unset,
    P1Next,
    P2Next,
    P1Win,
    P2Win,
    Tie,
}

impl GameState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::P1Next => "P1-NEXT",
            Self::P2Next => "P2-NEXT",
            Self::P1Win => "P1-WIN",
            Self::P2Win => "P2-WIN",
            Self::Tie => "TIE",
        }
    }

    pub fn is_finished(self) -> bool {
        matches!(self, Self::P1Win | Self::P2Win | Self::Tie)
    }
}

impl FromStr for GameState {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" => Ok(Self::Unset),
            "P1-NEXT" => Ok(Self::P1Next),
            "P2-NEXT" => Ok(Self::P2Next),
            "P1-WIN" => Ok(Self::P1Win),
            "P2-WIN" => Ok(Self::P2Win),
            "TIE" => Ok(Self::Tie),
            other => Err(AppError::MalformedState(format!(
                "unknown game state {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Content of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    Empty,
    X,
    O,
}

impl Mark {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Empty),
            'X' | 'x' => Some(Self::X),
            'O' | 'o' => Some(Self::O),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Empty => '-',
            Self::X => 'X',
            Self::O => 'O',
        }
    }
}

/// One game as visible on the ledger. Only ever rebuilt from gateway state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub name: String,
    pub board: String,
    pub game_state: GameState,
    pub player1: String,
    pub player2: String,
}

impl Game {
    /// Mark at a 1-based board space, or `None` when out of range or unreadable.
    pub fn mark_at(&self, space: u8) -> Option<Mark> {
        let index = usize::from(space).checked_sub(1)?;
        if index >= BOARD_CELLS {
            return None;
        }
        self.board.chars().nth(index).and_then(Mark::from_char)
    }

    pub fn is_finished(&self) -> bool {
        self.game_state.is_finished()
    }

    pub fn is_player(&self, public_key: &str) -> bool {
        !public_key.is_empty() && (self.player1 == public_key || self.player2 == public_key)
    }
}

/// User intent carried in a transaction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    /// 1-based board space.
    Take(u8),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => ACTION_CREATE,
            Self::Take(_) => ACTION_TAKE,
        }
    }

    pub fn argument(&self) -> Option<String> {
        match self {
            Self::Create => None,
            Self::Take(space) => Some(space.to_string()),
        }
    }
}
