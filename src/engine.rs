use crate::clock::{Clock, SystemClock};
use crate::dictionary::Lexicon;
use crate::game::{
    Game, GameOptions, GameStatus, HistoryLog, MoveRecord, MoveResult, Player, MAX_PLAYERS,
    MIN_PLAYERS,
};
use crate::grid::Grid;
use crate::placement::check_placement;
use crate::scoring::{score_words, RACK_SIZE};
use crate::tilebag::TileBag;
use crate::tiles::{normalize_key, normalize_letter, PlacedTile, Tile};
use crate::validator::validate_move;
use crate::{Error, Language, TileSet};
use multiset::HashMultiSet;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs the rules of the game on [`Game`] values.
///
/// The engine holds what is shared between games: the dictionary, the board layout,
/// the clock and the random source for the bags. A game is passed in by mutable
/// reference for every operation; failed operations leave it untouched.
/// ## Examples
/// ```
/// use std::sync::Arc;
/// use wordgame_engine::{Dictionary, Engine, GameOptions, GameStatus, Language};
///
/// let dictionary = Arc::new(Dictionary::from_words(Language::EN, &["cat"]));
/// let mut engine = Engine::new(dictionary).with_seed(7);
/// let mut game = engine.create_game("g1", "en", "alice", "Alice", GameOptions::default())?;
/// engine.add_player(&mut game, "bob", "Bob")?;
/// engine.start_game(&mut game)?;
/// assert_eq!(game.status, GameStatus::Playing);
/// engine.pass_turn(&mut game, "alice")?;
/// assert_eq!(game.current_player().map(|p| p.id.as_str()), Some("bob"));
/// # Ok::<(), wordgame_engine::Error>(())
/// ```
pub struct Engine {
    lexicon: Arc<dyn Lexicon>,
    grid: Grid,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

/// Add a user-facing history line if the game keeps them
fn log(game: &mut Game, now: u64, player_id: Option<&str>, message: String) {
    if game.options.enable_history {
        game.history_logs.push(HistoryLog {
            timestamp: now,
            player_id: player_id.map(String::from),
            message,
        });
    }
}

/// Check that the game is in progress and that it is the turn of `player_id`.
/// Returns the index of the player.
fn check_turn(game: &Game, player_id: &str) -> Result<usize, Error> {
    if game.status != GameStatus::Playing {
        return Err(Error::NotInProgress);
    }
    match game.player_index(player_id) {
        Some(index) if Some(index) == game.current_player_index => Ok(index),
        _ => Err(Error::NotYourTurn(String::from(player_id))),
    }
}

/// Check that `player` holds a tile for each of `keys`, counting duplicates.
fn check_rack<I: IntoIterator<Item = String>>(player: &Player, keys: I) -> Result<(), Error> {
    let mut held: HashMultiSet<String> = player.tiles.iter().map(Tile::key).collect();
    for key in keys {
        if !held.remove(&key) {
            return Err(Error::TileNotFound(key));
        }
    }
    Ok(())
}

/// Pass the turn to the next player in seat order.
fn advance_turn(game: &mut Game, now: u64, restart_clock: bool) {
    if let Some(index) = game.current_player_index {
        game.current_player_index = Some((index + 1) % game.players.len());
    }
    if restart_clock {
        game.turn_start_time = Some(now);
    }
}

impl Engine {
    /// Return a new engine that checks words with `lexicon`, on the standard board,
    /// with wall clock time and an entropy-seeded random source.
    pub fn new(lexicon: Arc<dyn Lexicon>) -> Engine {
        Engine {
            lexicon,
            grid: Grid::default(),
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed the random source used to shuffle bags, and return the modified engine.
    pub fn with_seed(mut self, seed: u64) -> Engine {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Use `clock` for turn and history timestamps, and return the modified engine.
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Engine {
        self.clock = Box::new(clock);
        self
    }

    /// Play on a custom board layout, and return the modified engine.
    pub fn with_grid(mut self, grid: Grid) -> Engine {
        self.grid = grid;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Create a game waiting for players, with the creator seated first with a full rack.
    /// ## Errors
    /// `UnknownLanguage` if there is no tile set for `language`.
    pub fn create_game(
        &mut self,
        id: &str,
        language: &str,
        creator_id: &str,
        creator_name: &str,
        options: GameOptions,
    ) -> Result<Game, Error> {
        let language: Language = language.parse()?;
        let mut tile_bag = TileBag::new(&TileSet::new(language), &mut self.rng);
        let rack = tile_bag.draw(RACK_SIZE);
        let now = self.clock.now();
        let mut game = Game {
            id: String::from(id),
            language,
            status: GameStatus::Waiting,
            options,
            board: Default::default(),
            tile_bag,
            players: vec![Player::new(creator_id, creator_name, rack)],
            current_player_index: None,
            pass_count: 0,
            move_history: Vec::new(),
            history_logs: Vec::new(),
            turn_start_time: None,
            winner: None,
            created_at: now,
        };
        log(
            &mut game,
            now,
            Some(creator_id),
            format!("{} created the game", creator_name),
        );
        info!(game_id = id, %language, creator = creator_id, "created game");
        Ok(game)
    }

    /// Seat a player in a waiting game and deal a full rack from the bag.
    /// ## Errors
    /// `GameAlreadyStarted`, `GameFull` or `DuplicatePlayer`.
    pub fn add_player(
        &mut self,
        game: &mut Game,
        player_id: &str,
        player_name: &str,
    ) -> Result<(), Error> {
        if game.status != GameStatus::Waiting {
            return Err(Error::GameAlreadyStarted);
        }
        if game.players.len() >= MAX_PLAYERS {
            return Err(Error::GameFull);
        }
        if game.player_index(player_id).is_some() {
            return Err(Error::DuplicatePlayer(String::from(player_id)));
        }
        let rack = game.tile_bag.draw(RACK_SIZE);
        game.players.push(Player::new(player_id, player_name, rack));
        let now = self.clock.now();
        log(
            game,
            now,
            Some(player_id),
            format!("{} joined the game", player_name),
        );
        debug!(game_id = %game.id, player = player_id, "player joined");
        Ok(())
    }

    /// Start a waiting game: the first seated player has the turn and the turn clock starts.
    /// ## Errors
    /// `InvalidState` if the game is not waiting, `NotEnoughPlayers` with fewer than two players.
    pub fn start_game(&mut self, game: &mut Game) -> Result<(), Error> {
        if game.status != GameStatus::Waiting {
            return Err(Error::InvalidState(game.status));
        }
        if game.players.len() < MIN_PLAYERS {
            return Err(Error::NotEnoughPlayers(game.players.len()));
        }
        let now = self.clock.now();
        game.status = GameStatus::Playing;
        game.current_player_index = Some(0);
        game.pass_count = 0;
        game.turn_start_time = Some(now);
        log(game, now, None, String::from("The game has started"));
        info!(game_id = %game.id, players = game.players.len(), "started game");
        Ok(())
    }

    /// Play tiles from the rack of `player_id` on the board.
    ///
    /// The placement rules are checked first, then the formed words. A valid move is scored,
    /// put on the board, the rack is refilled from the bag and the turn passes on. The game
    /// ends when the player empties the rack while the bag is empty.
    ///
    /// With an invalid word in a strict game the move is not played, but the turn is lost:
    /// the result has `penalty` set and lists the invalid words.
    /// ## Errors
    /// - `NotInProgress`, `NotYourTurn` for precondition failures;
    /// - a placement error from [`check_placement`](crate::check_placement);
    /// - `InvalidBlankLetter` if a blank stands for something that is not a letter of the tile set;
    /// - `TileNotFound` if the player does not hold the placed tiles;
    /// - `InvalidWord` with the invalid words, if the game is not strict.
    ///
    /// The game is unchanged after an error.
    pub fn make_move(
        &mut self,
        game: &mut Game,
        player_id: &str,
        placed: &[PlacedTile],
    ) -> Result<MoveResult, Error> {
        let index = check_turn(game, player_id)?;
        check_placement(placed, &game.board)?;

        let tileset = TileSet::new(game.language);
        if let Some(tile) = placed
            .iter()
            .find(|tile| tile.is_blank && !tileset.contains(&tile.letter))
        {
            return Err(Error::InvalidBlankLetter {
                row: tile.row,
                col: tile.col,
                letter: normalize_letter(&tile.letter),
            });
        }
        let placed: Vec<PlacedTile> = placed
            .iter()
            .map(|tile| {
                let letter = normalize_letter(&tile.letter);
                PlacedTile {
                    row: tile.row,
                    col: tile.col,
                    value: if tile.is_blank {
                        0
                    } else {
                        tileset.points(&letter)
                    },
                    letter,
                    is_blank: tile.is_blank,
                }
            })
            .collect();
        check_rack(&game.players[index], placed.iter().map(PlacedTile::key))?;

        let validation = validate_move(
            &placed,
            &game.board,
            game.language,
            game.options.q_as_qu,
            self.lexicon.as_ref(),
        )?;
        if !validation.is_valid {
            let invalid_words = validation.invalid_texts();
            if !game.options.strict_mode {
                return Err(Error::InvalidWord {
                    words: invalid_words,
                });
            }
            return Ok(self.penalize(game, index, invalid_words));
        }

        let after = game.board.with_placed(&placed);
        let score = score_words(&validation.valid_words, &placed, &after, &self.grid);
        let now = self.clock.now();
        game.board = after;

        let player = &mut game.players[index];
        for tile in &placed {
            player.take_tile(&tile.key());
        }
        player.tiles.extend(game.tile_bag.draw(placed.len()));
        player.score += score.total;
        let name = player.name.clone();
        let rack_empty = player.tiles.is_empty();

        game.pass_count = 0;
        game.move_history.push(MoveRecord::Move {
            player_id: String::from(player_id),
            tiles: placed.clone(),
            words: score.words.clone(),
            score: score.total,
            timestamp: now,
        });
        let texts: Vec<&str> = score.words.iter().map(|w| w.word.as_str()).collect();
        log(
            game,
            now,
            Some(player_id),
            format!("{} played {} for {} points", name, texts.join(", "), score.total),
        );
        debug!(game_id = %game.id, player = player_id, score = score.total, words = ?texts, "move played");

        let game_over = rack_empty && game.tile_bag.is_empty();
        if game_over {
            self.finish(game, Some(index), now);
        } else {
            advance_turn(game, now, true);
        }
        Ok(MoveResult {
            score: score.total,
            words: score.words,
            bingo: score.bingo,
            penalty: false,
            invalid_words: Vec::new(),
            game_over,
        })
    }

    /// An invalid word in a strict game: the turn is lost, board and rack stay as they are.
    fn penalize(&mut self, game: &mut Game, index: usize, invalid_words: Vec<String>) -> MoveResult {
        let now = self.clock.now();
        let player = &game.players[index];
        let (player_id, name) = (player.id.clone(), player.name.clone());
        game.pass_count = 0;
        game.move_history.push(MoveRecord::Penalty {
            player_id: player_id.clone(),
            invalid_words: invalid_words.clone(),
            timestamp: now,
        });
        log(
            game,
            now,
            Some(player_id.as_str()),
            format!(
                "{} played an invalid word ({}) and lost the turn",
                name,
                invalid_words.join(", ")
            ),
        );
        debug!(game_id = %game.id, player = %player_id, words = ?invalid_words, "penalty");
        advance_turn(game, now, true);
        MoveResult {
            score: 0,
            words: Vec::new(),
            bingo: false,
            penalty: true,
            invalid_words,
            game_over: false,
        }
    }

    /// Pass the turn. The game ends without a finisher once consecutive passes
    /// reach twice the number of players.
    /// ## Errors
    /// `NotInProgress` or `NotYourTurn`.
    pub fn pass_turn(&mut self, game: &mut Game, player_id: &str) -> Result<(), Error> {
        let index = check_turn(game, player_id)?;
        let now = self.clock.now();
        game.pass_count += 1;
        game.move_history.push(MoveRecord::Pass {
            player_id: String::from(player_id),
            timestamp: now,
        });
        let name = game.players[index].name.clone();
        log(game, now, Some(player_id), format!("{} passed", name));
        debug!(game_id = %game.id, player = player_id, passes = game.pass_count, "passed");

        if game.pass_count >= game.players.len() * 2 {
            self.finish(game, None, now);
        } else {
            advance_turn(game, now, true);
        }
        Ok(())
    }

    /// Swap rack tiles named by `letters` (a letter, or `*` / `""` for a blank) for tiles
    /// from the bag. Replacements are drawn before the discarded tiles go back into the bag,
    /// which is then reshuffled. Costs the turn; the turn clock only restarts in timed games.
    /// ## Errors
    /// `NotInProgress`, `NotYourTurn`, `NoTilesPlaced` when no letters are named,
    /// `NotEnoughTilesInBag` or `TileNotFound`. The game is unchanged after an error.
    pub fn exchange_tiles<S: AsRef<str>>(
        &mut self,
        game: &mut Game,
        player_id: &str,
        letters: &[S],
    ) -> Result<(), Error> {
        let index = check_turn(game, player_id)?;
        if letters.is_empty() {
            return Err(Error::NoTilesPlaced);
        }
        let keys: Vec<String> = letters.iter().map(|l| normalize_key(l.as_ref())).collect();
        let available = game.tile_bag.len();
        if available < keys.len() {
            return Err(Error::NotEnoughTilesInBag {
                requested: keys.len(),
                available,
            });
        }
        check_rack(&game.players[index], keys.iter().cloned())?;

        let now = self.clock.now();
        let drawn = game.tile_bag.draw(keys.len());
        let player = &mut game.players[index];
        let discards: Vec<Tile> = keys.iter().filter_map(|key| player.take_tile(key)).collect();
        player.tiles.extend(drawn);
        let name = player.name.clone();
        game.tile_bag.put_back(discards, &mut self.rng);

        game.move_history.push(MoveRecord::Exchange {
            player_id: String::from(player_id),
            count: keys.len(),
            timestamp: now,
        });
        log(
            game,
            now,
            Some(player_id),
            format!("{} exchanged {} tiles", name, keys.len()),
        );
        debug!(game_id = %game.id, player = player_id, count = keys.len(), "exchanged tiles");
        let timed = game.options.time_limit.is_some();
        advance_turn(game, now, timed);
        Ok(())
    }

    /// Pass the turn of the current player if its time limit has run out.
    /// Returns whether a pass was made.
    /// ## Errors
    /// As [`pass_turn`](Engine::pass_turn).
    pub fn expire_turn(&mut self, game: &mut Game) -> Result<bool, Error> {
        if !game.turn_expired(self.clock.now()) {
            return Ok(false);
        }
        let player_id = match game.current_player() {
            Some(player) => player.id.clone(),
            None => return Ok(false),
        };
        debug!(game_id = %game.id, player = %player_id, "turn timed out");
        self.pass_turn(game, &player_id)?;
        Ok(true)
    }

    /// Mark a seated player as connected or disconnected.
    /// ## Errors
    /// `InvalidState` for a finished game, `PlayerNotFound` if the player is not seated.
    pub fn set_connected(
        &mut self,
        game: &mut Game,
        player_id: &str,
        connected: bool,
    ) -> Result<(), Error> {
        if game.status == GameStatus::Finished {
            return Err(Error::InvalidState(game.status));
        }
        let index = game
            .player_index(player_id)
            .ok_or_else(|| Error::PlayerNotFound(String::from(player_id)))?;
        game.players[index].connected = connected;
        Ok(())
    }

    /// End the game: every player loses the value of the tiles left on the rack, a player
    /// who went out gains the sum of those values, and the first player with the highest
    /// score wins.
    fn finish(&mut self, game: &mut Game, finisher: Option<usize>, now: u64) {
        let deductions: Vec<i32> = game.players.iter().map(Player::rack_value).collect();
        for (player, deduction) in game.players.iter_mut().zip(&deductions) {
            player.score -= deduction;
        }
        if let Some(index) = finisher {
            game.players[index].score += deductions.iter().sum::<i32>();
        }
        // ties go to the first player in seat order
        let mut winner = &game.players[0];
        for player in &game.players[1..] {
            if player.score > winner.score {
                winner = player;
            }
        }
        let (winner_id, winner_name, winner_score) =
            (winner.id.clone(), winner.name.clone(), winner.score);

        game.status = GameStatus::Finished;
        game.current_player_index = None;
        game.turn_start_time = None;
        game.winner = Some(winner_id.clone());
        game.move_history.push(MoveRecord::End {
            finisher,
            deductions,
            winner: winner_id.clone(),
            timestamp: now,
        });
        log(
            game,
            now,
            None,
            format!("Game over: {} wins with {} points", winner_name, winner_score),
        );
        let scores: Vec<(&str, i32)> = game
            .players
            .iter()
            .map(|p| (p.id.as_str(), p.score))
            .collect();
        info!(game_id = %game.id, winner = %winner_id, scores = ?scores, "finished game");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dictionary;
    use std::sync::atomic::{AtomicU64, Ordering};

    type Result<T> = std::result::Result<T, Error>;

    const WORDS: &[&str] = &[
        "cat", "cats", "at", "ta", "dealing", "quit", "zoo", "ne", "xe", "catsup",
    ];

    #[derive(Clone, Default)]
    struct TestClock(Arc<AtomicU64>);

    impl TestClock {
        fn advance(&self, millis: u64) {
            self.0.fetch_add(millis, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn engine(clock: &TestClock) -> Engine {
        let dictionary = Arc::new(Dictionary::from_words(Language::EN, WORDS));
        Engine::new(dictionary)
            .with_seed(42)
            .with_clock(clock.clone())
    }

    fn started(engine: &mut Engine, options: GameOptions) -> Result<Game> {
        let mut game = engine.create_game("g1", "en", "p0", "Ann", options)?;
        engine.add_player(&mut game, "p1", "Bob")?;
        engine.start_game(&mut game)?;
        Ok(game)
    }

    /// Give every player the named tiles, taking them from the racks and the bag.
    fn deal(game: &mut Game, racks: &[&[&str]]) {
        let mut pool: Vec<Tile> = game.tile_bag.to_vec();
        for player in game.players.iter_mut() {
            pool.append(&mut player.tiles);
        }
        for (player, rack) in game.players.iter_mut().zip(racks) {
            for &key in rack.iter() {
                let pos = pool
                    .iter()
                    .position(|tile| tile.key() == key)
                    .expect("tile available");
                player.tiles.push(pool.remove(pos));
            }
        }
        game.tile_bag = TileBag::from_tiles(pool);
    }

    fn row(row: usize, col: usize, letters: &[&str]) -> Vec<PlacedTile> {
        letters
            .iter()
            .enumerate()
            .map(|(i, &letter)| PlacedTile::new(row, col + i, letter, 0))
            .collect()
    }

    #[test]
    fn test_create_game() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let game = engine.create_game("g1", "en", "p0", "Ann", GameOptions::default())?;
        assert_eq!(game.status, GameStatus::Waiting);
        assert_eq!(game.players[0].tiles.len(), 7);
        assert_eq!(game.tile_bag.len(), 93);
        assert_eq!(game.current_player_index, None);
        assert_eq!(game.tile_count(), 100);
        assert!(matches!(
            engine.create_game("g2", "xx", "p0", "Ann", GameOptions::default()),
            Err(Error::UnknownLanguage(_))
        ));
        Ok(())
    }

    #[test]
    fn test_lobby_errors() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = engine.create_game("g1", "en", "p0", "Ann", GameOptions::default())?;
        assert!(matches!(
            engine.start_game(&mut game),
            Err(Error::NotEnoughPlayers(1))
        ));
        assert!(matches!(
            engine.add_player(&mut game, "p0", "Ann"),
            Err(Error::DuplicatePlayer(_))
        ));
        for i in 1..4 {
            engine.add_player(&mut game, &format!("p{}", i), "Guest")?;
        }
        assert!(matches!(
            engine.add_player(&mut game, "p4", "Late"),
            Err(Error::GameFull)
        ));
        assert_eq!(game.tile_bag.len(), 100 - 4 * 7);
        engine.start_game(&mut game)?;
        assert!(matches!(
            engine.add_player(&mut game, "p5", "Later"),
            Err(Error::GameAlreadyStarted)
        ));
        assert!(matches!(
            engine.start_game(&mut game),
            Err(Error::InvalidState(GameStatus::Playing))
        ));
        Ok(())
    }

    #[test]
    fn test_turn_errors() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = engine.create_game("g1", "en", "p0", "Ann", GameOptions::default())?;
        assert!(matches!(
            engine.pass_turn(&mut game, "p0"),
            Err(Error::NotInProgress)
        ));
        engine.add_player(&mut game, "p1", "Bob")?;
        engine.start_game(&mut game)?;
        let before = game.clone();
        assert!(matches!(
            engine.pass_turn(&mut game, "p1"),
            Err(Error::NotYourTurn(_))
        ));
        assert!(matches!(
            engine.exchange_tiles(&mut game, "nobody", &["A"]),
            Err(Error::NotYourTurn(_))
        ));
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn test_first_move() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(
            &mut game,
            &[&["C", "A", "T", "E", "E", "E", "E"], &["Z", "O", "O", "E", "E", "E", "E"]],
        );
        clock.advance(5_000);
        let result = engine.make_move(&mut game, "p0", &row(7, 7, &["c", "a", "t"]))?;
        assert_eq!(result.score, 10);
        assert_eq!(result.words.len(), 1);
        assert_eq!(result.words[0].word, "CAT");
        assert!(!result.penalty);
        assert_eq!(game.players[0].score, 10);
        assert_eq!(game.players[0].tiles.len(), 7);
        assert_eq!(game.board.occupied_count(), 3);
        assert_eq!(game.current_player_index, Some(1));
        assert_eq!(game.turn_start_time, Some(5_000));
        assert_eq!(game.tile_count(), 100);
        assert!(matches!(game.move_history.last(), Some(MoveRecord::Move { score: 10, .. })));
        Ok(())
    }

    #[test]
    fn test_placement_errors_leave_game_unchanged() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["C", "A", "T", "E", "E", "E", "E"], &[]]);
        let before = game.clone();
        assert!(matches!(
            engine.make_move(&mut game, "p0", &row(0, 0, &["c", "a", "t"])),
            Err(Error::MustCoverCenter)
        ));
        assert!(matches!(
            engine.make_move(&mut game, "p0", &row(7, 7, &["z", "o", "o"])),
            Err(Error::TileNotFound(_))
        ));
        let placed = [PlacedTile::new(7, 7, "c", 3), PlacedTile::new(8, 8, "a", 1)];
        assert!(matches!(
            engine.make_move(&mut game, "p0", &placed),
            Err(Error::NotInLine)
        ));
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn test_lenient_invalid_word() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["C", "A", "E", "E", "E", "E", "E"], &[]]);
        let before = game.clone();
        match engine.make_move(&mut game, "p0", &row(7, 7, &["a", "c", "e"])) {
            Err(Error::InvalidWord { words }) => assert_eq!(words, vec!["ACE"]),
            other => panic!("expected InvalidWord, got {:?}", other),
        }
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn test_strict_penalty() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let options = GameOptions {
            strict_mode: true,
            ..GameOptions::default()
        };
        let mut game = started(&mut engine, options)?;
        deal(&mut game, &[&["C", "A", "Z", "E", "E", "E", "E"], &[]]);
        engine.pass_turn(&mut game, "p0")?;
        engine.pass_turn(&mut game, "p1")?;
        assert_eq!(game.pass_count, 2);
        let rack = game.players[0].tiles.clone();
        let bag = game.tile_bag.clone();

        let result = engine.make_move(&mut game, "p0", &row(7, 7, &["c", "a", "z"]))?;
        assert!(result.penalty);
        assert_eq!(result.invalid_words, vec!["CAZ"]);
        assert_eq!(result.score, 0);
        assert!(game.board.is_empty());
        assert_eq!(game.players[0].tiles, rack);
        assert_eq!(game.tile_bag, bag);
        assert_eq!(game.current_player_index, Some(1));
        assert_eq!(game.pass_count, 0);
        assert!(matches!(game.move_history.last(), Some(MoveRecord::Penalty { .. })));
        Ok(())
    }

    #[test]
    fn test_bingo() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        let letters = ["D", "E", "A", "L", "I", "N", "G"];
        deal(&mut game, &[&letters, &[]]);
        let result = engine.make_move(&mut game, "p0", &row(7, 4, &letters))?;
        // D2 E1 A1 L1 I1 N1 G2 doubled by the start square, plus the bonus
        assert!(result.bingo);
        assert_eq!(result.score, 18 + 50);
        assert_eq!(game.players[0].tiles.len(), 7);
        Ok(())
    }

    #[test]
    fn test_blank_and_q_as_qu() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let options = GameOptions {
            q_as_qu: true,
            ..GameOptions::default()
        };
        let mut game = started(&mut engine, options)?;
        deal(&mut game, &[&["Q", "I", "*", "E", "E", "E", "E"], &[]]);
        let placed = [
            PlacedTile::new(7, 7, "q", 0),
            PlacedTile::new(7, 8, "i", 0),
            PlacedTile::blank(7, 9, "t"),
        ];
        let result = engine.make_move(&mut game, "p0", &placed)?;
        assert_eq!(result.words[0].word, "QUIT");
        // Q10 I1 and a blank, doubled
        assert_eq!(result.score, 22);
        let tile = game.board.tile_at(crate::Position::new(7, 9)).cloned();
        assert_eq!(tile.map(|t| (t.letter, t.value, t.is_blank)), Some((String::from("T"), 0, true)));
        Ok(())
    }

    #[test]
    fn test_blank_stands_for_one_letter() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["C", "*", "E", "E", "E", "E", "E"], &[]]);
        let before = game.clone();
        let placed = [
            PlacedTile::new(7, 7, "c", 0),
            PlacedTile::blank(7, 8, "atsup"),
        ];
        match engine.make_move(&mut game, "p0", &placed) {
            Err(Error::InvalidBlankLetter { row, col, letter }) => {
                assert_eq!((row, col, letter.as_str()), (7, 8, "ATSUP"))
            }
            other => panic!("expected InvalidBlankLetter, got {:?}", other),
        }
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn test_single_tile_forms_two_words() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["E", "E", "E", "E", "E", "E", "E"], &[]]);
        game.board = crate::Board::new().with_placed(&[
            PlacedTile::new(7, 7, "o", 1),
            PlacedTile::new(7, 8, "x", 8),
            PlacedTile::new(8, 7, "n", 1),
        ]);
        let result = engine.make_move(&mut game, "p0", &[PlacedTile::new(8, 8, "e", 0)])?;
        let words: Vec<(&str, i32)> = result
            .words
            .iter()
            .map(|w| (w.word.as_str(), w.score))
            .collect();
        // (8,8) doubles the E in both words
        assert_eq!(words, vec![("NE", 3), ("XE", 10)]);
        assert_eq!(result.score, 13);
        Ok(())
    }

    #[test]
    fn test_exchange() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["Z", "Q", "A", "A", "A", "A", "A"], &[]]);
        // leave exactly two E's in the bag: the player must get them, not the discards
        let mut pool: Vec<Tile> = game.tile_bag.to_vec();
        let mut keep = Vec::new();
        for _ in 0..2 {
            let pos = pool.iter().position(|t| t.key() == "E").expect("an E");
            keep.push(pool.remove(pos));
        }
        game.players[1].tiles.extend(pool);
        game.tile_bag = TileBag::from_tiles(keep);
        let start = game.turn_start_time;
        clock.advance(1_000);

        engine.exchange_tiles(&mut game, "p0", &["z", "Q"])?;
        let keys: Vec<String> = game.players[0].tiles.iter().map(Tile::key).collect();
        assert_eq!(keys.iter().filter(|k| *k == "E").count(), 2);
        assert!(!keys.contains(&String::from("Z")));
        assert!(!keys.contains(&String::from("Q")));
        let mut bag: Vec<String> = game.tile_bag.iter().map(Tile::key).collect();
        bag.sort();
        assert_eq!(bag, vec!["Q", "Z"]);
        assert_eq!(game.current_player_index, Some(1));
        // untimed game: the turn clock is not restarted
        assert_eq!(game.turn_start_time, start);
        Ok(())
    }

    #[test]
    fn test_exchange_errors() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["A", "B", "C", "D", "E", "F", "G"], &[]]);
        let before = game.clone();
        assert!(matches!(
            engine.exchange_tiles(&mut game, "p0", &["Z"]),
            Err(Error::TileNotFound(_))
        ));
        assert!(matches!(
            engine.exchange_tiles::<&str>(&mut game, "p0", &[]),
            Err(Error::NoTilesPlaced)
        ));
        assert_eq!(game, before);

        let five = game.tile_bag[..5].to_vec();
        game.tile_bag = TileBag::from_tiles(five);
        let before = game.clone();
        let all = ["A", "B", "C", "D", "E", "F", "G"];
        assert!(matches!(
            engine.exchange_tiles(&mut game, "p0", &all),
            Err(Error::NotEnoughTilesInBag {
                requested: 7,
                available: 5
            })
        ));
        assert_eq!(game, before);
        Ok(())
    }

    #[test]
    fn test_timed_exchange_restarts_clock() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let options = GameOptions {
            time_limit: Some(60),
            ..GameOptions::default()
        };
        let mut game = started(&mut engine, options)?;
        clock.advance(2_000);
        let letter = game.players[0].tiles[0].key();
        engine.exchange_tiles(&mut game, "p0", &[letter])?;
        assert_eq!(game.turn_start_time, Some(2_000));
        assert_eq!(game.tile_count(), 100);
        Ok(())
    }

    #[test]
    fn test_expire_turn() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let options = GameOptions {
            time_limit: Some(30),
            ..GameOptions::default()
        };
        let mut game = started(&mut engine, options)?;
        clock.advance(29_999);
        assert!(!engine.expire_turn(&mut game)?);
        clock.advance(1);
        assert!(engine.expire_turn(&mut game)?);
        assert_eq!(game.pass_count, 1);
        assert_eq!(game.current_player_index, Some(1));
        assert_eq!(game.turn_deadline(), Some(60_000));

        let mut untimed = started(&mut engine, GameOptions::default())?;
        clock.advance(1_000_000);
        assert!(!engine.expire_turn(&mut untimed)?);
        Ok(())
    }

    #[test]
    fn test_huge_time_limit() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let options = GameOptions {
            time_limit: Some(u64::MAX / 10),
            ..GameOptions::default()
        };
        let mut game = started(&mut engine, options)?;
        clock.advance(1_000);
        assert_eq!(game.turn_deadline(), Some(u64::MAX));
        assert!(!engine.expire_turn(&mut game)?);
        Ok(())
    }

    #[test]
    fn test_passes_end_game() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        let values: Vec<i32> = game.players.iter().map(Player::rack_value).collect();
        for _ in 0..2 {
            engine.pass_turn(&mut game, "p0")?;
            engine.pass_turn(&mut game, "p1")?;
        }
        assert_eq!(game.status, GameStatus::Finished);
        assert_eq!(game.current_player_index, None);
        assert_eq!(game.players[0].score, -values[0]);
        assert_eq!(game.players[1].score, -values[1]);
        let expected = if values[1] < values[0] { "p1" } else { "p0" };
        assert_eq!(game.winner.as_deref(), Some(expected));
        assert!(matches!(
            game.move_history.last(),
            Some(MoveRecord::End { finisher: None, .. })
        ));
        assert!(matches!(
            engine.pass_turn(&mut game, "p0"),
            Err(Error::NotInProgress)
        ));
        Ok(())
    }

    #[test]
    fn test_going_out_ends_game() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["C", "A", "T"], &["Z", "Q"]]);
        game.tile_bag = TileBag::from_tiles(Vec::new());
        let result = engine.make_move(&mut game, "p0", &row(7, 7, &["c", "a", "t"]))?;
        assert!(result.game_over);
        assert_eq!(game.status, GameStatus::Finished);
        // 10 for CAT plus the 20 left on the other rack
        assert_eq!(game.players[0].score, 30);
        assert_eq!(game.players[1].score, -20);
        assert_eq!(game.winner.as_deref(), Some("p0"));
        Ok(())
    }

    #[test]
    fn test_tie_goes_to_first_seat() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        deal(&mut game, &[&["A"], &["E"]]);
        for _ in 0..2 {
            engine.pass_turn(&mut game, "p0")?;
            engine.pass_turn(&mut game, "p1")?;
        }
        assert_eq!(game.players[0].score, game.players[1].score);
        assert_eq!(game.winner.as_deref(), Some("p0"));
        Ok(())
    }

    #[test]
    fn test_turn_order_and_conservation() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = engine.create_game("g1", "en", "p0", "Ann", GameOptions::default())?;
        engine.add_player(&mut game, "p1", "Bob")?;
        engine.add_player(&mut game, "p2", "Cid")?;
        engine.start_game(&mut game)?;
        deal(
            &mut game,
            &[
                &["C", "A", "T", "S", "E", "E", "E"],
                &["T", "A", "O", "O", "E", "E", "E"],
                &["I", "I", "I", "N", "N", "R", "R"],
            ],
        );
        let mut expected = 0;
        let mut check = |game: &Game| {
            assert_eq!(game.tile_count(), 100);
            assert_eq!(game.current_player_index, Some(expected % 3));
            expected += 1;
        };
        check(&game);
        engine.make_move(&mut game, "p0", &row(7, 7, &["c", "a", "t"]))?;
        check(&game);
        engine.make_move(
            &mut game,
            "p1",
            &[PlacedTile::new(8, 8, "t", 0), PlacedTile::new(8, 9, "a", 0)],
        )?;
        check(&game);
        let letter = game.players[2].tiles[0].key();
        engine.exchange_tiles(&mut game, "p2", &[letter])?;
        check(&game);
        engine.pass_turn(&mut game, "p0")?;
        check(&game);
        assert_eq!(game.players[1].score, 8);
        Ok(())
    }

    #[test]
    fn test_state_for_player() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        let view = game.state_for_player("p0");
        assert_eq!(view, game.state_for_player("p0"));
        assert_eq!(view.tile_bag_count, 86);
        assert_eq!(view.players[0].tiles, game.players[0].tiles);
        assert!(view.players[1].tiles.iter().all(|t| *t == Tile::hidden()));
        assert_eq!(view.players[1].tile_count, 7);

        engine.set_connected(&mut game, "p1", false)?;
        assert!(!game.state_for_player("p1").players[1].connected);
        assert!(matches!(
            engine.set_connected(&mut game, "p9", false),
            Err(Error::PlayerNotFound(_))
        ));
        let summary = game.summary();
        assert_eq!(summary.player_ids, vec!["p0", "p1"]);
        assert_eq!(summary.status, GameStatus::Playing);
        Ok(())
    }

    #[test]
    fn test_history_logs() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        engine.pass_turn(&mut game, "p0")?;
        assert!(game
            .history_logs
            .last()
            .map_or(false, |log| log.message == "Ann passed"));

        let options = GameOptions {
            enable_history: false,
            ..GameOptions::default()
        };
        let mut quiet = started(&mut engine, options)?;
        engine.pass_turn(&mut quiet, "p0")?;
        assert!(quiet.history_logs.is_empty());
        assert_eq!(quiet.move_history.len(), 1);
        Ok(())
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_snapshot() -> Result<()> {
        let clock = TestClock::default();
        let mut engine = engine(&clock);
        let mut game = started(&mut engine, GameOptions::default())?;
        engine.pass_turn(&mut game, "p0")?;
        let bytes = game.to_snapshot()?;
        assert_eq!(Game::from_snapshot(&bytes)?, game);
        Ok(())
    }
}
