use crate::tiles::{normalize_letter, Tile};
use crate::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod ca;
mod en;
mod es;

/// These languages are supported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Language {
    /// English
    EN,
    /// Spanish
    ES,
    /// Catalan
    CA,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 3] = [Language::EN, Language::ES, Language::CA];

    /// The lowercase language code, as used in word file names.
    pub fn code(self) -> &'static str {
        match self {
            Language::EN => "en",
            Language::ES => "es",
            Language::CA => "ca",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::EN),
            "es" => Ok(Language::ES),
            "ca" => Ok(Language::CA),
            _ => Err(Error::UnknownLanguage(String::from(s))),
        }
    }
}

/// letter, count, points
type TileInfo = (&'static str, u32, u32);

/// The tile distribution for a supported language: the letters, how many of each
/// go into the bag, and what each is worth. Every set holds 100 tiles including blanks.
#[derive(Debug, Clone)]
pub struct TileSet {
    language: Language,
    tiles: &'static [TileInfo],
    blanks: u32,
}

impl TileSet {
    /// Return a new `TileSet` for language.
    pub fn new(language: Language) -> TileSet {
        let (tiles, blanks) = match language {
            Language::EN => (en::TILESET, en::BLANKS),
            Language::ES => (es::TILESET, es::BLANKS),
            Language::CA => (ca::TILESET, ca::BLANKS),
        };
        TileSet {
            language,
            tiles,
            blanks,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn info(&self, letter: &str) -> Option<&TileInfo> {
        let letter = normalize_letter(letter);
        self.tiles.iter().find(|(label, _, _)| *label == letter)
    }

    /// Return the points for letter, or 0 if not found
    /// ## Examples
    /// ```
    /// use wordgame_engine::{Language, TileSet};
    /// let tileset = TileSet::new(Language::EN);
    /// assert_eq!(tileset.points("q"), 10);
    /// assert_eq!(tileset.points("ñ"), 0);
    /// ```
    pub fn points(&self, letter: &str) -> u32 {
        self.info(letter).map_or(0, |&(_, _, points)| points)
    }

    /// Return the number of tiles with this letter in the tileset, or 0 if not found
    pub fn count(&self, letter: &str) -> u32 {
        self.info(letter).map_or(0, |&(_, count, _)| count)
    }

    /// Check if `letter` is one of the letters of the tileset; digraphs like "LL" count as one letter
    pub fn contains(&self, letter: &str) -> bool {
        self.info(letter).is_some()
    }

    /// Return the number of blank tiles in the tileset
    pub fn blanks(&self) -> u32 {
        self.blanks
    }

    /// Total number of tiles, blanks included
    pub fn total(&self) -> usize {
        let letters: u32 = self.tiles.iter().map(|&(_, count, _)| count).sum();
        (letters + self.blanks) as usize
    }

    /// Expand the distribution into individual tiles, in table order.
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(self.total());
        for &(letter, count, points) in self.tiles {
            for _ in 0..count {
                tiles.push(Tile::new(letter, points));
            }
        }
        for _ in 0..self.blanks {
            tiles.push(Tile::blank());
        }
        tiles
    }
}

/// Return the points for `letter` in `language`, or 0 if the letter is not in its tile set.
pub fn letter_value(letter: &str, language: Language) -> u32 {
    TileSet::new(language).points(letter)
}
