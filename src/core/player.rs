//! Player identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! Type-safe identifier for the two seats of a duel.
//!
//! ## PerPlayer
//!
//! Per-seat data storage backed by a fixed two-element array.
//! Supports iteration and indexing by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Identifier for one of the two duel seats.
///
/// Seat indices are 0-based. Which seat starts is decided at setup,
/// not by the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID. Only 0 and 1 are meaningful in a duel.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Check that this id names a real seat.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 < 2
    }

    /// Iterate over both seats.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        (0..2u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// Backed by a `[T; 2]` with one entry per seat.
///
/// ## Example
///
/// ```
/// use duelbound::core::{PlayerId, PerPlayer};
///
/// let mut score: PerPlayer<i32> = PerPlayer::with_value(0);
/// score[PlayerId::new(1)] = 3;
/// assert_eq!(score[PlayerId::new(0)], 0);
/// assert_eq!(score[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    data: [T; 2],
}

impl<T> PerPlayer<T> {
    /// Create with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p0.opponent(), p1);
        assert_eq!(p1.opponent(), p0);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_player_id_validity() {
        assert!(PlayerId::new(0).is_valid());
        assert!(PlayerId::new(1).is_valid());
        assert!(!PlayerId::new(2).is_valid());
    }

    #[test]
    fn test_both_seats() {
        let players: Vec<_> = PlayerId::both().collect();
        assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1)]);
    }

    #[test]
    fn test_per_player_factory() {
        let map: PerPlayer<i32> = PerPlayer::new(|p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(1)], 10);
    }

    #[test]
    fn test_per_player_mutation() {
        let mut map: PerPlayer<i32> = PerPlayer::with_value(0);

        map[PlayerId::new(0)] = 10;
        map[PlayerId::new(1)] = 20;

        assert_eq!(map[PlayerId::new(0)], 10);
        assert_eq!(map[PlayerId::new(1)], 20);
    }

    #[test]
    fn test_per_player_iter() {
        let map: PerPlayer<i32> = PerPlayer::new(|p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &0), (PlayerId::new(1), &1)]);
    }

    #[test]
    fn test_per_player_default() {
        let map: PerPlayer<Vec<i32>> = PerPlayer::with_default();
        assert!(map[PlayerId::new(0)].is_empty());
        assert!(map[PlayerId::new(1)].is_empty());
    }

    #[test]
    fn test_per_player_serialization() {
        let map: PerPlayer<i32> = PerPlayer::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PerPlayer<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
