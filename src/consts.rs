//! Fixed game constants resolved from `Include/Constants.h` and
//! `Src/Heuristics.cpp` in the original implementation.

use squadro_types::{PIECES_PER_PLAYER, Score};

/// Per-player-index power schedule, identical for both players. See
/// DESIGN.md for why this is indexed `0..4` rather than by the global
/// `0..9` id: the source declares a wider table but only ever reads it
/// through `id % 5`.
pub const FORWARD_POWERS: [u8; PIECES_PER_PLAYER] = [1, 3, 2, 3, 1];
pub const BACKWARD_POWERS: [u8; PIECES_PER_PLAYER] = [3, 1, 2, 1, 3];

/// Score a finished piece contributes to its owner's evaluation sum.
pub const FINISH_BONUS: i32 = 2_500;

/// Score contributed by an on-board piece, indexed by its cumulative
/// progress along its lane: `0` at the entry edge, `6` at the turn,
/// `12` one step from finishing. Linear here (progress * 10), matching
/// the original heuristic's `PIECE_PROGRESS_WEIGHT`, but kept as an
/// explicit table so a future non-linear shaping only touches this array.
pub const PROGRESS_TABLE: [i32; 13] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];

/// The win score. Must exceed any realistic non-terminal sum
/// (`FINISH_BONUS * 5 + PROGRESS_TABLE[12] * 5 == 13,100`) by more than
/// the deepest depth the search will ever reach, so that `WIN - depth`
/// distance-to-win adjustments never alias with a genuine positional
/// score. See `squadro_types::Score::WIN` for the representable value.
pub const WIN: Score = Score::WIN;

pub const MAX_PLY: usize = 64;

/// Quiescence search depth cap (spec §4.6.2 step 3 / §4.6.3 `Q_MAX`):
/// capture chains in Squadro are short (at most 5 bumps per move, and a
/// bumped piece always resets off the capturing lane), so a handful of
/// plies is enough to resolve any tactical sequence; this mirrors typical
/// chess-engine quiescence depth caps used defensively against pathological
/// capture chains.
pub const Q_MAX: u8 = 8;

/// Default transposition table size in megabytes for the CLI binary and
/// benchmarks. The board and move count are tiny compared to chess, so even
/// a modest table comfortably covers a full game's worth of positions.
pub const DEFAULT_TT_SIZE_MB: usize = 16;
