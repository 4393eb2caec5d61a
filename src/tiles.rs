//! Basic types for working with tiles.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// The dimension of the board: N x N squares
pub const N: usize = 15;

/// Key used for a blank tile when naming rack tiles.
pub const BLANK: &str = "*";

/// Uppercase a letter the way tiles and dictionary words are stored.
pub(crate) fn normalize_letter(letter: &str) -> String {
    letter.trim().to_uppercase()
}

/// A letter tile. The letter may be a digraph ("CH", "LL", "NY") that still occupies one square.
/// A blank on the rack has an empty letter; once placed it carries the letter it stands for,
/// with value 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tile {
    pub letter: String,
    pub value: u32,
    pub is_blank: bool,
}

impl Tile {
    /// Return a new regular tile
    pub fn new(letter: &str, value: u32) -> Tile {
        Tile {
            letter: normalize_letter(letter),
            value,
            is_blank: false,
        }
    }

    /// Return a new unassigned blank
    pub fn blank() -> Tile {
        Tile {
            letter: String::new(),
            value: 0,
            is_blank: true,
        }
    }

    /// Placeholder for a tile on another player's rack.
    pub fn hidden() -> Tile {
        Tile {
            letter: String::from("?"),
            value: 0,
            is_blank: false,
        }
    }

    /// The name used to pick this tile from a rack: the letter, or `*` for a blank.
    pub fn key(&self) -> String {
        if self.is_blank {
            String::from(BLANK)
        } else {
            self.letter.clone()
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_blank && self.letter.is_empty() {
            write!(f, "{}", BLANK)
        } else if self.is_blank {
            write!(f, "{}", self.letter.to_lowercase())
        } else {
            write!(f, "{}", self.letter)
        }
    }
}

/// Normalize a rack key given by a caller: `""` and `"*"` both name a blank.
pub(crate) fn normalize_key(key: &str) -> String {
    let key = normalize_letter(key);
    if key.is_empty() {
        String::from(BLANK)
    } else {
        key
    }
}

/// A square on the board
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// The start square in the middle of the board
    pub const CENTER: Position = Position {
        row: N / 2,
        col: N / 2,
    };

    pub fn on_board(&self) -> bool {
        self.row < N && self.col < N
    }

    /// The neighbouring square in `direction`, if it is on the board.
    pub fn next(&self, direction: Direction) -> Option<Position> {
        let pos = match direction {
            Direction::Horizontal => Position::new(self.row, self.col + 1),
            Direction::Vertical => Position::new(self.row + 1, self.col),
        };
        Some(pos).filter(Position::on_board)
    }

    /// The neighbouring square against `direction`, if it is on the board.
    pub fn prev(&self, direction: Direction) -> Option<Position> {
        match direction {
            Direction::Horizontal if self.col > 0 => Some(Position::new(self.row, self.col - 1)),
            Direction::Vertical if self.row > 0 => Some(Position::new(self.row - 1, self.col)),
            _ => None,
        }
    }

    /// The up to four orthogonal neighbours on the board.
    pub fn neighbours(&self) -> impl Iterator<Item = Position> {
        let here = *self;
        [Direction::Horizontal, Direction::Vertical]
            .into_iter()
            .flat_map(move |dir| [here.prev(dir), here.next(dir)])
            .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction of a word on the board
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// The perpendicular direction
    pub fn cross(self) -> Direction {
        match self {
            Direction::Horizontal => Direction::Vertical,
            Direction::Vertical => Direction::Horizontal,
        }
    }
}

/// A tile put on the board in a move.
/// For a blank, `is_blank` is set and `letter` is the letter the blank stands for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedTile {
    pub row: usize,
    pub col: usize,
    pub letter: String,
    pub value: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_blank: bool,
}

impl PlacedTile {
    /// Return a regular tile placed at `row`, `col`
    pub fn new(row: usize, col: usize, letter: &str, value: u32) -> PlacedTile {
        PlacedTile {
            row,
            col,
            letter: normalize_letter(letter),
            value,
            is_blank: false,
        }
    }

    /// Return a blank placed at `row`, `col`, standing for `letter`
    pub fn blank(row: usize, col: usize, letter: &str) -> PlacedTile {
        PlacedTile {
            row,
            col,
            letter: normalize_letter(letter),
            value: 0,
            is_blank: true,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// The rack key this placement consumes
    pub fn key(&self) -> String {
        if self.is_blank {
            String::from(BLANK)
        } else {
            normalize_letter(&self.letter)
        }
    }

    /// The tile as it will sit on the board
    pub fn to_tile(&self) -> Tile {
        Tile {
            letter: normalize_letter(&self.letter),
            value: if self.is_blank { 0 } else { self.value },
            is_blank: self.is_blank,
        }
    }
}
