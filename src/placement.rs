//! Placement rules of a move, checked before any word is looked up.
use crate::board::Board;
use crate::tiles::{Direction, PlacedTile, Position};
use crate::words::direction;
use crate::Error;
use std::collections::HashSet;

/// Check that `placed` can be put on `board`:
/// - at least one tile, all on empty squares of the board, no square used twice,
///   every blank given a letter;
/// - all tiles in one row or one column, without gaps that are not filled by tiles
///   already on the board;
/// - the first move covers the start square, later moves touch a tile on the board.
///
/// Returns the direction of the placement, or `None` for a single tile.
/// ## Errors
/// The first rule that is broken.
pub fn check_placement(placed: &[PlacedTile], board: &Board) -> Result<Option<Direction>, Error> {
    if placed.is_empty() {
        return Err(Error::NoTilesPlaced);
    }
    let mut seen = HashSet::new();
    for tile in placed {
        let pos = tile.position();
        let (row, col) = (tile.row, tile.col);
        if !pos.on_board() {
            return Err(Error::OutOfBounds { row, col });
        }
        if board.is_occupied(pos) {
            return Err(Error::CellOccupied { row, col });
        }
        if !seen.insert(pos) {
            return Err(Error::DuplicatePosition { row, col });
        }
        if tile.letter.trim().is_empty() {
            return Err(Error::UnassignedBlank { row, col });
        }
    }

    let line = direction(placed)?;
    if let Some(direction) = line {
        check_contiguous(placed, board, direction, &seen)?;
    }

    if board.is_empty() {
        if !seen.contains(&Position::CENTER) {
            return Err(Error::MustCoverCenter);
        }
    } else if !seen
        .iter()
        .any(|pos| pos.neighbours().any(|n| board.is_occupied(n)))
    {
        return Err(Error::NotConnected);
    }
    Ok(line)
}

fn check_contiguous(
    placed: &[PlacedTile],
    board: &Board,
    direction: Direction,
    seen: &HashSet<Position>,
) -> Result<(), Error> {
    let along = |tile: &PlacedTile| match direction {
        Direction::Horizontal => tile.col,
        Direction::Vertical => tile.row,
    };
    let first = &placed[0];
    let start = placed.iter().map(along).min().unwrap_or(0);
    let end = placed.iter().map(along).max().unwrap_or(0);
    for i in start..=end {
        let pos = match direction {
            Direction::Horizontal => Position::new(first.row, i),
            Direction::Vertical => Position::new(i, first.col),
        };
        if !seen.contains(&pos) && !board.is_occupied(pos) {
            return Err(Error::NotContiguous);
        }
    }
    Ok(())
}
