use crate::board::Board;
use crate::dictionary::Lexicon;
use crate::tiles::PlacedTile;
use crate::words::{extract_words, Word};
use crate::{Error, Language};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of checking the words of a move against the dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Validation {
    pub is_valid: bool,
    pub valid_words: Vec<Word>,
    pub invalid_words: Vec<Word>,
}

impl Validation {
    /// Texts of the words that are not in the dictionary
    pub fn invalid_texts(&self) -> Vec<String> {
        self.invalid_words.iter().map(|w| w.text.clone()).collect()
    }

    /// All formed words, valid ones first
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.valid_words.iter().chain(self.invalid_words.iter())
    }
}

/// Check the words formed by putting `placed` on `board` against `lexicon`.
/// A move that forms no word of two or more tiles is valid.
/// ## Errors
/// `NotInLine` if the tiles share neither a row nor a column.
pub fn validate_move<L: Lexicon + ?Sized>(
    placed: &[PlacedTile],
    board: &Board,
    language: Language,
    q_as_qu: bool,
    lexicon: &L,
) -> Result<Validation, Error> {
    let (valid_words, invalid_words): (Vec<Word>, Vec<Word>) =
        extract_words(placed, board, q_as_qu)?
            .into_iter()
            .partition(|word| lexicon.is_valid_word(&word.text, language));
    Ok(Validation {
        is_valid: invalid_words.is_empty(),
        valid_words,
        invalid_words,
    })
}
