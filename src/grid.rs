use crate::tiles::{Position, N};
use crate::Error;
use lazy_static::lazy_static;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

const Q: usize = 1 + N / 2;

const STANDARD_QUARTER_BOARD: [&str; Q] = [
    "3w -- -- 2l -- -- -- 3w",
    "-- 2w -- -- -- 3l -- --",
    "-- -- 2w -- -- -- 2l --",
    "2l -- -- 2w -- -- -- 2l",
    "-- -- -- -- 2w -- -- --",
    "-- 3l -- -- -- 3l -- --",
    "-- -- 2l -- -- -- 2l --",
    "3w -- -- 2l -- -- -- ss",
];

lazy_static! {
    static ref STANDARD: Grid = Grid::expand_quarter_board(&STANDARD_QUARTER_BOARD);
}

/// The special kind of a board square.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Square {
    NoBonus,
    /// The center square; counts as a double word square
    Start,
    LetterBonus(u32),
    WordBonus(u32),
}

use Square::{LetterBonus, NoBonus, Start, WordBonus};

impl Square {
    /// Multiplier for the letter on this square, when the tile was placed in this move.
    pub fn letter_multiplier(self) -> u32 {
        match self {
            LetterBonus(n) => n,
            _ => 1,
        }
    }

    /// Multiplier for a word covering this square, when the tile was placed in this move.
    pub fn word_multiplier(self) -> u32 {
        match self {
            WordBonus(n) => n,
            Start => 2,
            _ => 1,
        }
    }
}

/// Two-letter code of a square in a layout row: `--`, `ss`, `2l`, `3l`, `2w` or `3w`.
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NoBonus => write!(f, "--"),
            Start => write!(f, "ss"),
            LetterBonus(n) => write!(f, "{}l", n),
            WordBonus(n) => write!(f, "{}w", n),
        }
    }
}

impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "--" => Ok(NoBonus),
            "ss" => Ok(Start),
            "2l" => Ok(LetterBonus(2)),
            "3l" => Ok(LetterBonus(3)),
            "2w" => Ok(WordBonus(2)),
            "3w" => Ok(WordBonus(3)),
            _ => Err(Error::GridParseError(String::from(s))),
        }
    }
}

type Inner = [[Square; N]; N];

/// Board layout, consisting of 15x15 (normal or bonus) squares.
///
/// A bonus square has a 2x or 3x letter bonus, or a 2x or 3x word bonus.
/// The center square at (7,7) is the "start" square, and must be covered in the first turn.
/// The layout never changes during a game.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid(Inner);

impl Deref for Grid {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_strings().join("\n"))
    }
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::standard().clone()
    }
}

impl Grid {
    fn empty() -> Grid {
        Grid([[NoBonus; N]; N])
    }

    /// Create a symmetrical board by mirroring a quarter board
    /// horizontally and vertically
    fn expand_quarter_board(qb: &[&str; Q]) -> Grid {
        let mut grid = Grid::empty();
        for (i, row) in qb.iter().enumerate() {
            for (j, square) in row.split(' ').enumerate() {
                let val = square.parse().unwrap_or(NoBonus);
                grid.0[i][j] = val;
                grid.0[N - i - 1][j] = val;
                grid.0[i][N - j - 1] = val;
                grid.0[N - i - 1][N - j - 1] = val;
            }
        }
        grid
    }

    /// The standard layout
    /// ## Example
    /// ```
    /// # use wordgame_engine::{Grid, Position, Square};
    /// let grid = Grid::standard();
    /// assert_eq!(grid.square(Position::CENTER), Square::Start);
    /// ```
    pub fn standard() -> &'static Grid {
        &STANDARD
    }

    /// The kind of square at `pos`
    pub fn square(&self, pos: Position) -> Square {
        self.0[pos.row][pos.col]
    }

    /// Get board squares as a vec of 15 strings
    pub fn to_strings(&self) -> Vec<String> {
        self.iter()
            .map(|row| {
                row.iter()
                    .map(Square::to_string)
                    .collect::<Vec<String>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
    }

    /// Create a `Grid` from strings
    /// Parameter `grid` must have 15 rows, each row consisting of 15 squares joined by spaces.
    ///
    /// ## Errors
    /// If `grid` has wrong dimensions, or elements can not be parsed as a `Square`.
    pub fn from_strings<S: AsRef<str>>(grid: &[S]) -> Result<Grid, Error> {
        if grid.len() != N {
            return Err(Error::InvalidRowCount(grid.len()));
        }
        let mut board = Grid::empty();
        for (i, row) in grid.iter().enumerate() {
            let squares: Vec<&str> = row.as_ref().split(' ').collect();
            if squares.len() != N {
                return Err(Error::InvalidRowLength(
                    String::from(row.as_ref()),
                    squares.len(),
                ));
            }
            for (j, &square) in squares.iter().enumerate() {
                board.0[i][j] = square.parse()?;
            }
        }
        Ok(board)
    }
}
