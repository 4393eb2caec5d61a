use crate::board::Board;
use crate::grid::Grid;
use crate::tiles::{PlacedTile, Position};
use crate::words::{extract_words, Word};
use crate::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of tiles on a full rack
pub const RACK_SIZE: usize = 7;

/// Extra points for playing a full rack in one move
pub const BINGO_BONUS: i32 = 50;

/// Points for a single word of a move
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordScore {
    pub word: String,
    pub score: i32,
}

/// Points for a whole move
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveScore {
    pub words: Vec<WordScore>,
    pub bingo: bool,
    pub total: i32,
}

/// Score one word on `after`, the board with the move on it.
///
/// Letter bonuses only count for squares in `new`; letters already on the board keep their
/// base value. Word bonuses of new squares multiply together.
fn word_points(word: &Word, after: &Board, grid: &Grid, new: &HashSet<Position>) -> i32 {
    let mut word_multiplier = 1;
    let mut points = 0;
    for &pos in word.positions.iter() {
        let mut letter_points = after.tile_at(pos).map_or(0, |tile| tile.value);
        if new.contains(&pos) {
            let square = grid.square(pos);
            letter_points *= square.letter_multiplier();
            word_multiplier *= square.word_multiplier();
        }
        points += letter_points;
    }
    (points * word_multiplier) as i32
}

/// Score `words`, already extracted for `placed`, on `after`, the board with the move on it.
/// A move of a full rack gets the [`BINGO_BONUS`].
pub fn score_words(words: &[Word], placed: &[PlacedTile], after: &Board, grid: &Grid) -> MoveScore {
    let new: HashSet<Position> = placed.iter().map(PlacedTile::position).collect();
    let words: Vec<WordScore> = words
        .iter()
        .map(|word| WordScore {
            word: word.text.clone(),
            score: word_points(word, after, grid, &new),
        })
        .collect();
    let bingo = placed.len() == RACK_SIZE;
    let mut total: i32 = words.iter().map(|w| w.score).sum();
    if bingo {
        total += BINGO_BONUS;
    }
    MoveScore {
        words,
        bingo,
        total,
    }
}

/// Calculate the score of putting `placed` on `board`, which does not hold the move yet.
/// The dictionary is not consulted; validate the move first.
/// ## Errors
/// `NotInLine` if the tiles share neither a row nor a column.
/// ## Examples
/// ```
/// # use wordgame_engine::{calculate_score, Board, Error, Grid, PlacedTile};
/// let placed = [
///     PlacedTile::new(7, 7, "c", 3),
///     PlacedTile::new(7, 8, "a", 1),
///     PlacedTile::new(7, 9, "t", 1),
/// ];
/// let score = calculate_score(&placed, &Board::new(), Grid::standard())?;
/// // the start square doubles the word
/// assert_eq!(score.total, 10);
/// # Ok::<(), Error>(())
/// ```
pub fn calculate_score(placed: &[PlacedTile], board: &Board, grid: &Grid) -> Result<MoveScore, Error> {
    let words = extract_words(placed, board, false)?;
    let after = board.with_placed(placed);
    Ok(score_words(&words, placed, &after, grid))
}
