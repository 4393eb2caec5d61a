//! The state of one game. Operations on it live in [`Engine`](crate::Engine).
use crate::board::Board;
use crate::scoring::WordScore;
use crate::tilebag::TileBag;
use crate::tiles::{PlacedTile, Tile};
use crate::Language;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of players in a game
pub const MAX_PLAYERS: usize = 4;

/// Minimum number of players to start a game
pub const MIN_PLAYERS: usize = 2;

/// Lifecycle of a game. It only moves forward: waiting, playing, finished.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameStatus::Waiting => write!(f, "waiting"),
            GameStatus::Playing => write!(f, "playing"),
            GameStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Settings chosen when a game is created
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameOptions {
    /// An invalid word costs the turn instead of allowing a retry
    pub strict_mode: bool,
    /// Seconds per turn, `None` for untimed play
    pub time_limit: Option<u64>,
    pub enable_chat: bool,
    /// Keep user-facing history lines
    pub enable_history: bool,
    /// Read a `Q` tile as `QU` when looking up words
    pub q_as_qu: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            strict_mode: false,
            time_limit: None,
            enable_chat: true,
            enable_history: true,
            q_as_qu: false,
        }
    }
}

/// A seated player
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Player {
    pub id: String,
    pub name: String,
    /// The rack, at most 7 tiles between operations
    pub tiles: Vec<Tile>,
    pub score: i32,
    pub connected: bool,
}

impl Player {
    pub fn new(id: &str, name: &str, tiles: Vec<Tile>) -> Player {
        Player {
            id: String::from(id),
            name: String::from(name),
            tiles,
            score: 0,
            connected: true,
        }
    }

    /// Sum of the values of the tiles on the rack
    pub fn rack_value(&self) -> i32 {
        self.tiles.iter().map(|tile| tile.value as i32).sum()
    }

    /// Remove one tile with `key` (a letter, or `*` for a blank) from the rack.
    pub(crate) fn take_tile(&mut self, key: &str) -> Option<Tile> {
        let index = self.tiles.iter().position(|tile| tile.key() == key)?;
        Some(self.tiles.remove(index))
    }
}

/// Structural record of everything that happened in a game
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MoveRecord {
    Move {
        player_id: String,
        tiles: Vec<PlacedTile>,
        words: Vec<WordScore>,
        score: i32,
        timestamp: u64,
    },
    Pass {
        player_id: String,
        timestamp: u64,
    },
    Exchange {
        player_id: String,
        count: usize,
        timestamp: u64,
    },
    Penalty {
        player_id: String,
        invalid_words: Vec<String>,
        timestamp: u64,
    },
    End {
        /// Index of the player who emptied their rack, if any
        finisher: Option<usize>,
        /// Rack values subtracted, per player
        deductions: Vec<i32>,
        winner: String,
        timestamp: u64,
    },
}

/// A user-facing history line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryLog {
    pub timestamp: u64,
    pub player_id: Option<String>,
    pub message: String,
}

/// The fields of a game that a store may index on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameSummary {
    pub id: String,
    pub status: GameStatus,
    pub language: Language,
    pub player_ids: Vec<String>,
}

/// One game: board, bag, players and turn.
///
/// The game value is owned by the caller and changed only through an [`Engine`](crate::Engine).
/// Operations on one game must not run concurrently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Game {
    pub id: String,
    pub language: Language,
    pub status: GameStatus,
    pub options: GameOptions,
    pub board: Board,
    pub tile_bag: TileBag,
    /// Players in turn order
    pub players: Vec<Player>,
    /// Set while the game is playing
    pub current_player_index: Option<usize>,
    pub pass_count: usize,
    pub move_history: Vec<MoveRecord>,
    pub history_logs: Vec<HistoryLog>,
    /// Epoch milliseconds when the current turn started
    pub turn_start_time: Option<u64>,
    pub winner: Option<String>,
    pub created_at: u64,
}

impl Game {
    pub fn strict_mode(&self) -> bool {
        self.options.strict_mode
    }

    pub fn time_limit(&self) -> Option<u64> {
        self.options.time_limit
    }

    /// The player whose turn it is
    pub fn current_player(&self) -> Option<&Player> {
        self.current_player_index.and_then(|i| self.players.get(i))
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub(crate) fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// Tiles on racks, in the bag and on the board. Constant for the life of a game.
    pub fn tile_count(&self) -> usize {
        let racks: usize = self.players.iter().map(|p| p.tiles.len()).sum();
        racks + self.tile_bag.len() + self.board.occupied_count()
    }

    /// Epoch milliseconds at which the current turn runs out, for timed games in progress
    pub fn turn_deadline(&self) -> Option<u64> {
        if self.status != GameStatus::Playing {
            return None;
        }
        let limit = self.options.time_limit?;
        let start = self.turn_start_time?;
        Some(start.saturating_add(limit.saturating_mul(1000)))
    }

    /// Check if the time for the current turn is up at `now` (epoch milliseconds)
    pub fn turn_expired(&self, now: u64) -> bool {
        self.turn_deadline().map_or(false, |deadline| now >= deadline)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            status: self.status,
            language: self.language,
            player_ids: self.players.iter().map(|p| p.id.clone()).collect(),
        }
    }

    /// The game as `player_id` may see it: the bag is reduced to a count, and the racks
    /// of other players are replaced by hidden tiles.
    pub fn state_for_player(&self, player_id: &str) -> GameView {
        let players = self
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id.clone(),
                name: p.name.clone(),
                tiles: if p.id == player_id {
                    p.tiles.clone()
                } else {
                    vec![Tile::hidden(); p.tiles.len()]
                },
                tile_count: p.tiles.len(),
                score: p.score,
                connected: p.connected,
            })
            .collect();
        GameView {
            id: self.id.clone(),
            language: self.language,
            status: self.status,
            options: self.options.clone(),
            board: self.board.clone(),
            tile_bag_count: self.tile_bag.len(),
            players,
            current_player_index: self.current_player_index,
            pass_count: self.pass_count,
            history_logs: self.history_logs.clone(),
            turn_start_time: self.turn_start_time,
            winner: self.winner.clone(),
        }
    }

    #[cfg(feature = "bincode")]
    /// Encode the game as a binary snapshot for storage.
    /// ## Errors
    /// If the game can not be serialized.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, crate::Error> {
        bincode::serialize(self).map_err(|e| crate::Error::SnapshotError(e.to_string()))
    }

    #[cfg(feature = "bincode")]
    /// Decode a game from a snapshot made by [`to_snapshot`](Game::to_snapshot).
    /// ## Errors
    /// If the bytes are not a valid snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Game, crate::Error> {
        bincode::deserialize(bytes).map_err(|e| crate::Error::SnapshotError(e.to_string()))
    }
}

/// A player as seen by one participant
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub tiles: Vec<Tile>,
    pub tile_count: usize,
    pub score: i32,
    pub connected: bool,
}

/// The game as seen by one participant. The only view of a game that should leave the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameView {
    pub id: String,
    pub language: Language,
    pub status: GameStatus,
    pub options: GameOptions,
    pub board: Board,
    pub tile_bag_count: usize,
    pub players: Vec<PlayerView>,
    pub current_player_index: Option<usize>,
    pub pass_count: usize,
    pub history_logs: Vec<HistoryLog>,
    pub turn_start_time: Option<u64>,
    pub winner: Option<String>,
}

/// Outcome of a move
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveResult {
    /// Points scored, bingo bonus included; 0 for a penalty
    pub score: i32,
    pub words: Vec<WordScore>,
    pub bingo: bool,
    /// Set when an invalid word cost the turn in strict mode
    pub penalty: bool,
    pub invalid_words: Vec<String>,
    /// Set when this move ended the game
    pub game_over: bool,
}
