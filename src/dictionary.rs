use crate::{Error, Language};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::read_to_string;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Answers whether a word is valid in a language.
///
/// Lookups are case-insensitive. A language that was never loaded has no valid words.
pub trait Lexicon: Send + Sync {
    fn is_valid_word(&self, word: &str, language: Language) -> bool;
}

/// The word lists for all loaded languages, kept as sets of uppercase words.
///
/// Word lists can be replaced or extended at runtime through a shared reference,
/// so one `Dictionary` can serve all games of a process.
#[derive(Debug, Default)]
pub struct Dictionary {
    words: RwLock<HashMap<Language, HashSet<String>>>,
}

#[cfg(feature = "rayon")]
fn normalize<S: AsRef<str> + Sync>(words: &[S]) -> HashSet<String> {
    words
        .par_iter()
        .map(|word| word.as_ref().trim().to_uppercase())
        .filter(|word| !word.is_empty())
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn normalize<S: AsRef<str> + Sync>(words: &[S]) -> HashSet<String> {
    words
        .iter()
        .map(|word| word.as_ref().trim().to_uppercase())
        .filter(|word| !word.is_empty())
        .collect()
}

fn read_words<P: AsRef<Path>>(wordfile: P) -> Result<Vec<String>, Error> {
    let path = wordfile.as_ref();
    let contents = read_to_string(path).map_err(|source| Error::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    Ok(contents.lines().map(String::from).collect())
}

impl Dictionary {
    /// Return a new dictionary without any languages loaded
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    /// Build a dictionary with one language loaded from a list of words.
    /// ## Examples
    /// ```
    /// use wordgame_engine::{Dictionary, Language, Lexicon};
    /// let dictionary = Dictionary::from_words(Language::EN, &["cat", "Dog"]);
    /// assert!(dictionary.is_valid_word("DOG", Language::EN));
    /// assert!(!dictionary.is_valid_word("cat", Language::ES));
    /// ```
    pub fn from_words<S: AsRef<str> + Sync>(language: Language, words: &[S]) -> Dictionary {
        let dictionary = Dictionary::new();
        dictionary.load_words(language, words);
        dictionary
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Language, HashSet<String>>> {
        self.words.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Language, HashSet<String>>> {
        self.words.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the word list of `language`. Returns the number of distinct words loaded.
    pub fn load_words<S: AsRef<str> + Sync>(&self, language: Language, words: &[S]) -> usize {
        let set = normalize(words);
        let count = set.len();
        self.write().insert(language, set);
        info!(%language, words = count, "loaded dictionary");
        count
    }

    /// Add words to the word list of `language`, loading it if needed.
    /// Returns the number of words that were not yet present.
    pub fn append_words<S: AsRef<str> + Sync>(&self, language: Language, words: &[S]) -> usize {
        let set = normalize(words);
        let mut guard = self.write();
        let entry = guard.entry(language).or_default();
        let before = entry.len();
        entry.extend(set);
        let added = entry.len() - before;
        info!(%language, added, words = entry.len(), "appended to dictionary");
        added
    }

    /// Read the word list of `language` from a file with one word per line,
    /// replacing any list loaded before.
    /// ## Errors
    /// If the file can not be read. The loaded list is left untouched in that case.
    pub fn load_file<P: AsRef<Path>>(&self, language: Language, wordfile: P) -> Result<usize, Error> {
        let words = read_words(wordfile)?;
        Ok(self.load_words(language, &words))
    }

    /// Read extra words for `language` from a file with one word per line.
    /// ## Errors
    /// If the file can not be read.
    pub fn append_file<P: AsRef<Path>>(
        &self,
        language: Language,
        wordfile: P,
    ) -> Result<usize, Error> {
        let words = read_words(wordfile)?;
        Ok(self.append_words(language, &words))
    }

    /// Load every supported language that has a `<code>.txt` file in `dir`
    /// (for example `en.txt`). Returns the languages that were loaded.
    /// ## Errors
    /// If a word file exists but can not be read.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<Language>, Error> {
        let mut loaded = Vec::new();
        for &language in &Language::ALL {
            let wordfile = dir.as_ref().join(format!("{}.txt", language.code()));
            if wordfile.is_file() {
                self.load_file(language, &wordfile)?;
                loaded.push(language);
            }
        }
        Ok(loaded)
    }

    /// Drop the word list of `language`. Afterwards every word in it is invalid.
    pub fn unload(&self, language: Language) -> bool {
        self.write().remove(&language).is_some()
    }

    /// Check if a word list is loaded for `language`
    pub fn is_loaded(&self, language: Language) -> bool {
        self.read().contains_key(&language)
    }

    /// The number of words loaded for `language`
    pub fn word_count(&self, language: Language) -> usize {
        self.read().get(&language).map_or(0, HashSet::len)
    }
}

impl Lexicon for Dictionary {
    fn is_valid_word(&self, word: &str, language: Language) -> bool {
        match self.read().get(&language) {
            Some(words) => words.contains(&word.trim().to_uppercase()),
            None => {
                warn!(%language, word, "dictionary not loaded, rejecting word");
                false
            }
        }
    }
}
