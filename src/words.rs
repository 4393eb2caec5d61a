//! Find the words formed by a move.
use crate::board::Board;
use crate::tiles::{Direction, PlacedTile, Position, N};
use crate::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tinyvec::ArrayVec;

/// The squares of one word, at most a full row or column.
pub type Positions = ArrayVec<[Position; N]>;

/// A word on the board: its text as looked up in the dictionary, and the squares it covers.
/// The number of squares can differ from the number of characters in `text` when tiles hold digraphs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Word {
    pub text: String,
    pub positions: Positions,
    pub direction: Direction,
}

impl Word {
    /// Number of tiles in the word
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Return the direction shared by all `placed` tiles, or `None` for a single tile
/// that could be read either way.
/// ## Errors
/// `NotInLine` if the tiles share neither a row nor a column.
pub fn direction(placed: &[PlacedTile]) -> Result<Option<Direction>, Error> {
    let first = match placed {
        [] | [_] => return Ok(None),
        [first, ..] => first,
    };
    if placed.iter().all(|tile| tile.row == first.row) {
        Ok(Some(Direction::Horizontal))
    } else if placed.iter().all(|tile| tile.col == first.col) {
        Ok(Some(Direction::Vertical))
    } else {
        Err(Error::NotInLine)
    }
}

fn read_word(board: &Board, pos: Position, direction: Direction, q_as_qu: bool) -> Word {
    let mut text = String::new();
    let mut positions = Positions::new();
    for square in board.run_through(pos, direction) {
        if let Some(tile) = board.tile_at(square) {
            if q_as_qu && tile.letter == "Q" {
                text.push_str("QU");
            } else {
                text.push_str(&tile.letter);
            }
            positions.push(square);
        }
    }
    Word {
        text,
        positions,
        direction,
    }
}

/// Return the words formed by putting `placed` on `board`: the main word along the line
/// of the placement first (if it is longer than one tile), then the crossing word through
/// each placed tile, in placement order. Words of a single tile are left out.
///
/// With `q_as_qu`, a `Q` tile is read as `QU`; the board and the word positions are not affected.
/// ## Errors
/// `NotInLine` if the tiles share neither a row nor a column.
/// ## Examples
/// ```
/// # use wordgame_engine::{extract_words, Board, Error, PlacedTile};
/// let placed = [
///     PlacedTile::new(7, 7, "c", 3),
///     PlacedTile::new(7, 8, "a", 1),
///     PlacedTile::new(7, 9, "t", 1),
/// ];
/// let words = extract_words(&placed, &Board::new(), false)?;
/// assert_eq!(words.len(), 1);
/// assert_eq!(words[0].text, "CAT");
/// # Ok::<(), Error>(())
/// ```
pub fn extract_words(
    placed: &[PlacedTile],
    board: &Board,
    q_as_qu: bool,
) -> Result<Vec<Word>, Error> {
    let first = match placed.first() {
        Some(tile) => tile.position(),
        None => return Ok(Vec::new()),
    };
    let after = board.with_placed(placed);
    let main_direction = match direction(placed)? {
        Some(direction) => direction,
        None if after.run_through(first, Direction::Horizontal).len() > 1 => Direction::Horizontal,
        None => Direction::Vertical,
    };

    let mut words = Vec::new();
    let main = read_word(&after, first, main_direction, q_as_qu);
    if main.len() > 1 {
        words.push(main);
    }
    for tile in placed {
        let cross = read_word(&after, tile.position(), main_direction.cross(), q_as_qu);
        if cross.len() > 1 {
            words.push(cross);
        }
    }
    Ok(words)
}
