use crate::tiles::Tile;
use crate::TileSet;
use multiset::HashMultiSet;
use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Keeps track of the undrawn tiles, in random order.
/// Tiles are drawn from the end.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileBag(Vec<Tile>);

impl Deref for TileBag {
    type Target = [Tile];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TileBag {
    /// Fill a bag with every tile of `tileset`, shuffled.
    pub fn new<R: Rng + ?Sized>(tileset: &TileSet, rng: &mut R) -> TileBag {
        let mut bag = TileBag(tileset.tiles());
        bag.shuffle(rng);
        bag
    }

    /// A bag holding `tiles` in the given order; the last tile is drawn first.
    pub fn from_tiles(tiles: Vec<Tile>) -> TileBag {
        TileBag(tiles)
    }

    /// Fisher-Yates shuffle of the whole bag.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.shuffle(rng);
    }

    /// Remove up to `n` tiles from the end of the bag. Drawing from an
    /// empty bag returns no tiles.
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let at = self.0.len().saturating_sub(n);
        let mut drawn = self.0.split_off(at);
        drawn.reverse();
        drawn
    }

    /// Put `tiles` back and reshuffle the bag.
    pub fn put_back<R: Rng + ?Sized>(&mut self, tiles: Vec<Tile>, rng: &mut R) {
        self.0.extend(tiles);
        self.shuffle(rng);
    }

    /// The tiles in the bag by rack key, ignoring order.
    pub fn distribution(&self) -> HashMultiSet<String> {
        self.0.iter().map(Tile::key).collect()
    }
}
