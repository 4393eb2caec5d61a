use crate::tiles::{Direction, PlacedTile, Position, Tile, N};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// A square on the board that is either empty or holds a [`Tile`](crate::Tile)
pub type Cell = Option<Tile>;

type State = [[Cell; N]; N];

/// The tiles on a 15x15 board.
///
/// Only successful moves change the board; tiles are never taken off again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    cells: State,
}

/// Display the board state as 15 lines of 15 squares.
/// Empty squares show as ".", blanks in lowercase.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_ref().map_or(String::from("."), Tile::to_string))
                    .collect::<Vec<_>>()
                    .join("")
            })
            .collect::<Vec<String>>()
            .join("\n");
        write!(f, "{}", repr)
    }
}

impl Board {
    /// Return a new empty board
    pub fn new() -> Board {
        Board::default()
    }

    /// Return tile at `pos` or None if empty square or outside the board.
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        if pos.on_board() {
            return self.cells[pos.row][pos.col].as_ref();
        }
        None
    }

    /// Check if the square at `pos` is occupied.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile_at(pos).is_some()
    }

    /// Check if no tile has been played yet.
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Number of tiles on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    /// Iterate over the tiles on the board
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten().filter_map(Option::as_ref)
    }

    /// Return a copy of the board with `placed` put on it.
    /// Squares outside the board are skipped; check the placement first.
    pub fn with_placed(&self, placed: &[PlacedTile]) -> Board {
        let mut board = self.clone();
        board.place(placed);
        board
    }

    pub(crate) fn place(&mut self, placed: &[PlacedTile]) {
        for tile in placed {
            let pos = tile.position();
            if pos.on_board() {
                self.cells[pos.row][pos.col] = Some(tile.to_tile());
            }
        }
    }

    /// Return the positions of the contiguous run of occupied squares through `pos`
    /// in `direction`. The square at `pos` itself is counted whether or not it is occupied.
    pub fn run_through(&self, pos: Position, direction: Direction) -> Vec<Position> {
        let mut start = pos;
        while let Some(prev) = start.prev(direction).filter(|&p| self.is_occupied(p)) {
            start = prev;
        }
        let mut run = vec![start];
        let mut cur = start;
        while let Some(next) = cur
            .next(direction)
            .filter(|&p| p == pos || self.is_occupied(p))
        {
            run.push(next);
            cur = next;
        }
        run
    }
}
