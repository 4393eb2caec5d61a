use crate::game::GameStatus;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can be returned
pub enum Error {
    /// Error reading a word file
    #[error("Wordfile \"{path}\" could not be read")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// No tile set is configured for this language code
    #[error("Unknown language \"{0}\"")]
    UnknownLanguage(String),

    /// The operation is not allowed in the current game status
    #[error("Operation not allowed while game is {0}")]
    InvalidState(GameStatus),

    /// Error parsing bonus square
    #[error("Invalid grid bonus square: \"{0}\"")]
    GridParseError(String),

    /// Error parsing a board layout from strings
    #[error("Invalid number of rows {0} (expect 15)")]
    InvalidRowCount(usize),

    /// Parsing a row of the board layout needs 15 squares
    #[error("Invalid row \"{0}\": length {1}, expect 15")]
    InvalidRowLength(String, usize),

    /// The game already has the maximum number of players
    #[error("Game is full")]
    GameFull,

    /// Players can only join a game that is waiting
    #[error("Game already started")]
    GameAlreadyStarted,

    /// A player with this id is already seated
    #[error("Player \"{0}\" already joined")]
    DuplicatePlayer(String),

    /// A game needs at least two players to start
    #[error("Not enough players to start ({0})")]
    NotEnoughPlayers(usize),

    /// Moves, passes and exchanges need a game in progress
    #[error("Game is not in progress")]
    NotInProgress,

    /// The player is not seated at the current turn
    #[error("Not the turn of player \"{0}\"")]
    NotYourTurn(String),

    /// The player is not seated in this game
    #[error("Player \"{0}\" not found")]
    PlayerNotFound(String),

    /// A move must place at least one tile, an exchange must name at least one
    #[error("No tiles placed")]
    NoTilesPlaced,

    /// Attempt to place a tile outside the board
    #[error("Tile at row {row}, col {col} is outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// Attempt to replace a tile already on the board
    #[error("Attempt to replace tile at row {row}, col {col}")]
    CellOccupied { row: usize, col: usize },

    /// Two tiles placed on the same square
    #[error("Two tiles placed at row {row}, col {col}")]
    DuplicatePosition { row: usize, col: usize },

    /// A blank tile must be given a letter when it is placed
    #[error("Blank at row {row}, col {col} has no letter")]
    UnassignedBlank { row: usize, col: usize },

    /// A blank must stand for one of the letters of the tile set
    #[error("Blank at row {row}, col {col} can not be \"{letter}\"")]
    InvalidBlankLetter {
        row: usize,
        col: usize,
        letter: String,
    },

    /// Placed tiles do not share a single row or column
    #[error("Tiles are not in one line")]
    NotInLine,

    /// Placed tiles leave a gap in the line
    #[error("Tiles are not contiguous")]
    NotContiguous,

    /// The first move must cover the start square
    #[error("First move must cover the center square")]
    MustCoverCenter,

    /// Moves after the first must touch a tile on the board
    #[error("Tiles are not connected to the board")]
    NotConnected,

    /// One or more formed words are not in the dictionary
    #[error("Invalid word(s): {}", .words.join(", "))]
    InvalidWord { words: Vec<String> },

    /// The bag holds fewer tiles than the player wants to exchange
    #[error("Not enough tiles in bag: requested {requested}, available {available}")]
    NotEnoughTilesInBag { requested: usize, available: usize },

    /// The player does not hold this tile
    #[error("Tile \"{0}\" not found in rack")]
    TileNotFound(String),

    /// Error (de)serializing a game snapshot
    #[cfg(feature = "bincode")]
    #[error("Game snapshot could not be encoded or decoded: {0}")]
    SnapshotError(String),
}
