//! A rules engine for multiplayer Scrabble-like word games.
//! <br>
//! This crate keeps the state of a game and enforces its rules: seating players, dealing
//! racks from a shuffled bag, checking where tiles are placed, looking up the formed words
//! in a dictionary, scoring with the bonus squares of the board, and ending the game with
//! rack deductions.
//! Tile sets are included for English, Spanish and Catalan. Spanish and Catalan digraphs
//! like `CH`, `LL` and `NY` are single tiles on a single square.
//!
//! # How to use `wordgame_engine`
//! Load the word lists into a [`Dictionary`] and create an [`Engine`] with it. The engine
//! creates [`Game`] values, which the caller owns and passes back for every operation.
//! Send [`Game::state_for_player`] to participants: it hides the racks of other players.
//! The word lists must be in utf-8 and contain one word per line.
//!
//! # Basic usage
//!  ```
//! use std::sync::Arc;
//! use wordgame_engine::{Dictionary, Engine, GameOptions, Language, PlacedTile};
//!
//! let dictionary = Arc::new(Dictionary::from_words(Language::EN, &["rust", "rest"]));
//! let mut engine = Engine::new(dictionary.clone()).with_seed(1);
//! let mut game = engine.create_game("game-1", "en", "alice", "Alice", GameOptions::default())?;
//! engine.add_player(&mut game, "bob", "Bob")?;
//! engine.start_game(&mut game)?;
//!
//! // the first move must cover the center square
//! let placed = [PlacedTile::new(0, 0, "r", 0)];
//! assert!(engine.make_move(&mut game, "alice", &placed).is_err());
//!
//! let view = game.state_for_player("bob");
//! assert_eq!(view.players[1].tiles.len(), 7);
//! println!("{}", game.board);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! # Features
//! - `rayon` (default): normalize large word lists in parallel.
//! - `serde` (default): serialize games, views and moves.
//! - `bincode`: binary game snapshots with [`Game::to_snapshot`].
mod board;
mod clock;
mod dictionary;
mod engine;
mod error;
mod game;
mod grid;
mod placement;
mod scoring;
mod tilebag;
mod tiles;
mod tilesets;
mod validator;
mod words;

pub use board::{Board, Cell};
pub use clock::{Clock, SystemClock};
pub use dictionary::{Dictionary, Lexicon};
pub use engine::Engine;
pub use error::Error;
pub use game::{
    Game, GameOptions, GameStatus, GameSummary, GameView, HistoryLog, MoveRecord, MoveResult,
    Player, PlayerView, MAX_PLAYERS, MIN_PLAYERS,
};
pub use grid::{Grid, Square};
pub use placement::check_placement;
pub use scoring::{calculate_score, score_words, MoveScore, WordScore, BINGO_BONUS, RACK_SIZE};
pub use tilebag::TileBag;
pub use tiles::{Direction, PlacedTile, Position, Tile, BLANK, N};
pub use tilesets::{letter_value, Language, TileSet};
pub use validator::{validate_move, Validation};
pub use words::{direction, extract_words, Positions, Word};
