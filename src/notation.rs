//! The boundary protocol's move encoding (spec §6): the external referee/
//! GUI speaks in a player-relative piece index `1..=5`, never the engine's
//! internal global id `0..=9`. Grounded on the teacher's `notation.rs`,
//! which performs the analogous translation at the UCI boundary (`ChessMove`
//! to/from Smith/algebraic strings) — here the "wire form" is a bare
//! integer rather than a string, so this module is just the conversion
//! helpers, kept out of `board.rs`/`game.rs` so neither ever has to reason
//! about the external index convention.

use squadro_types::Move;

use crate::error::IllegalMove;
use crate::game::GameState;

/// Converts an internal move to the player-relative index the referee
/// expects on egress (spec §6: `relative = global - 5*player_offset`).
#[must_use]
pub fn to_relative(mv: Move) -> u8 {
    mv.to_relative()
}

/// Applies a move reported by the referee, encoded as a player-relative
/// index `1..=5` for whichever side is currently to move (spec §6:
/// `global = relative + 5*player_offset`). A rejected move here means the
/// reported state and this engine's state have desynchronized (spec §7:
/// treated as fatal by the caller).
pub fn apply_relative_move(state: &mut GameState, relative: u8) -> Result<(), IllegalMove> {
    let side = state.side_to_move();
    let mv = Move::from_relative(relative, side);
    state.apply_move(mv)?;
    Ok(())
}
