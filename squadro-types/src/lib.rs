#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::must_use_candidate)]

//! Shared primitive types for the Squadro engine: [`Player`], [`Status`],
//! [`PieceId`], [`Move`] and the search [`Score`] type. Kept in their own
//! crate so both the engine and any future front-end (CLI, bridge) can
//! depend on a small, stable vocabulary without pulling in the search code.

use std::{
    fmt::Display,
    ops::{Add, AddAssign, Index, IndexMut, Neg, Sub, SubAssign},
};

pub use num_enum::{IntoPrimitive, TryFromPrimitive};

pub const PIECES_PER_PLAYER: usize = 5;
pub const NUM_PIECES: usize = 2 * PIECES_PER_PLAYER;
pub const BOARD_SIZE: usize = 7;
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

macro_rules! impl_array_indexing {
    ($type:ty, $len:expr) => {
        impl<T> Index<$type> for [T; $len] {
            type Output = T;

            fn index(&self, index: $type) -> &Self::Output {
                &self[usize::from(index)]
            }
        }

        impl<T> IndexMut<$type> for [T; $len] {
            fn index_mut(&mut self, index: $type) -> &mut Self::Output {
                &mut self[usize::from(index)]
            }
        }
    };
}

/// One of the two sides. Player 1 travels along columns, Player 2 along rows.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Player {
    One,
    Two,
}

impl Player {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The global piece-id offset for this player's rank (`0` or `5`).
    #[must_use]
    pub fn id_offset(self) -> u8 {
        match self {
            Player::One => 0,
            Player::Two => PIECES_PER_PLAYER as u8,
        }
    }
}

impl From<Player> for usize {
    fn from(value: Player) -> usize {
        u8::from(value) as usize
    }
}

impl_array_indexing!(Player, 2);

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "P1"),
            Player::Two => write!(f, "P2"),
        }
    }
}

/// Which leg of its lane a piece is currently travelling, or whether it has
/// completed both legs and left the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Status {
    Forward,
    Backward,
    Finished,
}

impl Status {
    /// Index into direction-keyed tables (`0` forward, `1` backward). Only
    /// meaningful for on-board pieces; callers never look this up for a
    /// `Finished` piece because finished pieces contribute nothing to the
    /// hash.
    #[must_use]
    pub fn direction_index(self) -> usize {
        match self {
            Status::Forward => 0,
            Status::Backward => 1,
            Status::Finished => 0,
        }
    }
}

/// A global piece identity, `0..=4` for Player 1 and `5..=9` for Player 2.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct PieceId(u8);

impl PieceId {
    #[must_use]
    pub fn new(id: u8) -> Self {
        assert!((id as usize) < NUM_PIECES, "piece id out of range: {id}");
        Self(id)
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn player(self) -> Player {
        if (self.0 as usize) < PIECES_PER_PLAYER {
            Player::One
        } else {
            Player::Two
        }
    }

    /// This piece's index within its own player's rank, `0..=4`.
    #[must_use]
    pub fn player_index(self) -> usize {
        self.0 as usize % PIECES_PER_PLAYER
    }

    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..NUM_PIECES as u8).map(PieceId)
    }

    pub fn for_player(player: Player) -> impl Iterator<Item = PieceId> {
        let offset = player.id_offset();
        (0..PIECES_PER_PLAYER as u8).map(move |i| PieceId(offset + i))
    }
}

impl From<PieceId> for usize {
    fn from(value: PieceId) -> usize {
        value.0 as usize
    }
}

impl_array_indexing!(PieceId, NUM_PIECES);

impl Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.player(), self.player_index() + 1)
    }
}

/// A move: the global id of the piece to advance. `Move::NULL` is a
/// distinguished sentinel used for initialization and as an empty
/// move-ordering slot; it is never a legal move.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Move(u8);

const NULL_MOVE_REPR: u8 = u8::MAX;

impl Move {
    pub const NULL: Self = Self(NULL_MOVE_REPR);

    #[must_use]
    pub fn new(piece: PieceId) -> Self {
        Self(piece.as_u8())
    }

    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == NULL_MOVE_REPR
    }

    #[must_use]
    pub fn piece(self) -> Option<PieceId> {
        if self.is_null() {
            None
        } else {
            Some(PieceId::new(self.0))
        }
    }

    /// Converts to the player-relative index `1..=5` used on the external
    /// boundary (spec.md §6). Panics on the null move, which never crosses
    /// that boundary.
    #[must_use]
    pub fn to_relative(self) -> u8 {
        self.piece()
            .expect("null move has no relative encoding")
            .player_index() as u8
            + 1
    }

    /// Inverse of [`Self::to_relative`]: combines a `1..=5` relative index
    /// with the side that is to move.
    #[must_use]
    pub fn from_relative(relative: u8, player: Player) -> Self {
        assert!((1..=PIECES_PER_PLAYER as u8).contains(&relative), "relative index out of range: {relative}");
        Self::new(PieceId::new(player.id_offset() + relative - 1))
    }
}

impl Default for PieceId {
    fn default() -> Self {
        Self(0)
    }
}

/// Hand-written rather than derived: `u8::default()` is `0`, a perfectly
/// legal piece id, not the sentinel. `Move::default()` must be the same
/// "no move" value as `Move::NULL`, matching the teacher's `ChessMove`.
impl Default for Move {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<PieceId> for Move {
    fn from(value: PieceId) -> Self {
        Move::new(value)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.piece() {
            Some(p) => write!(f, "{p}"),
            None => write!(f, "NULL"),
        }
    }
}

/// A search score in arbitrary centi-progress units, from the perspective of
/// whichever player the search was asked to evaluate for. Mirrors the
/// mate-distance encoding a chess engine's `Eval` type would use, adapted to
/// Squadro's win condition (no draws, see spec.md §9).
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Self = Self(0);
    /// The absolute maximum representable score. Must exceed any realistic
    /// non-terminal evaluation by more than the maximum search depth so
    /// that win-distance adjustments (`mate_in`) never alias with a huge
    /// but genuine positional score.
    pub const WIN: Self = Self(20_000);
    const WIN_RANGE_START: Self = Self(19_000);
    /// The alpha-beta search window's initial bound (spec §4.6.1 step 3:
    /// "alpha-beta at the root with (-inf, +inf)"). Set well past `WIN` so
    /// it never collides with a genuine mate-distance score.
    pub const INF: Self = Self(1_000_000);

    #[must_use]
    pub fn win_in(ply: u16) -> Self {
        Self(Self::WIN.0 - ply as i32)
    }

    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[must_use]
    pub fn is_decisive(self) -> bool {
        self.abs() >= Self::WIN_RANGE_START
    }

    #[must_use]
    pub fn inner(self) -> i32 {
        self.0
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add<Score> for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub<Score> for Score {
    type Output = Score;

    fn sub(self, rhs: Score) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Add<i32> for Score {
    type Output = Score;

    fn add(self, rhs: i32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl Sub<i32> for Score {
    type Output = Score;

    fn sub(self, rhs: i32) -> Self::Output {
        Self(self.0 - rhs)
    }
}

impl<T> AddAssign<T> for Score
where
    Score: Add<T, Output = Score>,
{
    fn add_assign(&mut self, rhs: T) {
        *self = *self + rhs;
    }
}

impl<T> SubAssign<T> for Score
where
    Score: Sub<T, Output = Score>,
{
    fn sub_assign(&mut self, rhs: T) {
        *self = *self - rhs;
    }
}

impl From<i32> for Score {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl rand::distributions::Distribution<Score> for rand::distributions::Standard {
    fn sample<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Score {
        Score::from(rng.gen_range(-(Score::WIN.0)..=Score::WIN.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_id_player_split() {
        assert_eq!(PieceId::new(0).player(), Player::One);
        assert_eq!(PieceId::new(4).player(), Player::One);
        assert_eq!(PieceId::new(5).player(), Player::Two);
        assert_eq!(PieceId::new(9).player(), Player::Two);
    }

    #[test]
    fn move_relative_roundtrip() {
        for player in [Player::One, Player::Two] {
            for relative in 1..=5u8 {
                let mv = Move::from_relative(relative, player);
                assert_eq!(mv.to_relative(), relative);
                assert_eq!(mv.piece().unwrap().player(), player);
            }
        }
    }

    #[test]
    fn null_move_has_no_piece() {
        assert!(Move::NULL.is_null());
        assert_eq!(Move::NULL.piece(), None);
        assert_eq!(Move::default(), Move::NULL);
    }

    #[test]
    fn score_win_dominates_progress() {
        // No realistic non-terminal evaluation (bounded by finish bonus *
        // pieces + max progress) should be able to alias with a win score
        // adjusted for depth.
        let max_plausible_eval = 2_500 * 5 + 120 * 5;
        assert!(Score::WIN.inner() - 64 > max_plausible_eval);
    }

    #[test]
    fn score_is_decisive_near_win() {
        assert!(Score::win_in(3).is_decisive());
        assert!((-Score::win_in(3)).is_decisive());
        assert!(!Score::from(500).is_decisive());
    }
}
