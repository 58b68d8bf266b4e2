//! Static position evaluation (spec §4.4). Stateless and side-effect-free:
//! a pure function of a [`GameState`] and the perspective to score from.

use squadro_types::{PieceId, Player, Score, Status};

use crate::consts::{FINISH_BONUS, PROGRESS_TABLE, WIN};
use crate::game::GameState;

/// `progress` is the piece's cumulative distance along its full lane: `0`
/// at the entry edge, `6` at the turn, `12` one step from finishing.
/// Grounded on `Src/Heuristics.cpp`'s linear progress formula, expressed
/// here as an explicit table (spec §4.4: "a concrete 13-entry table may be
/// used").
fn progress(owner: Player, row: u8, col: u8, status: Status) -> u8 {
    let travel = match owner {
        Player::One => col,
        Player::Two => row,
    };
    match status {
        Status::Forward => travel,
        Status::Backward => 6 + (6 - travel),
        Status::Finished => unreachable!("finished pieces are scored by FINISH_BONUS, not progress"),
    }
}

fn piece_score(owner: Player, row: u8, col: u8, status: Status) -> i32 {
    if status == Status::Finished {
        FINISH_BONUS
    } else {
        PROGRESS_TABLE[progress(owner, row, col, status) as usize]
    }
}

/// Returns the evaluation of `state` from `perspective`'s point of view.
/// Positive favors `perspective`. Terminal positions return `±WIN`
/// (undiluted by depth — the search layer subtracts ply itself, mirroring
/// [`Score::win_in`]); non-terminal positions return `mine - theirs` summed
/// per-piece.
#[must_use]
pub fn evaluate(state: &GameState, perspective: Player) -> Score {
    if let Some(winner) = state.winner() {
        return if winner == perspective { WIN } else { -WIN };
    }

    let opponent = perspective.flipped();
    let mine: i32 = PieceId::for_player(perspective)
        .map(|id| {
            let p = state.board().piece(id);
            piece_score(p.owner, p.row, p.col, p.status)
        })
        .sum();
    let theirs: i32 = PieceId::for_player(opponent)
        .map(|id| {
            let p = state.board().piece(id);
            piece_score(p.owner, p.row, p.col, p.status)
        })
        .sum();

    Score::from(mine - theirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_position_is_symmetric() {
        let state = GameState::new();
        assert_eq!(evaluate(&state, Player::One), Score::ZERO);
        assert_eq!(evaluate(&state, Player::Two), Score::ZERO);
    }

    #[test]
    fn forward_progress_increases_with_travel() {
        assert!(progress(Player::One, 1, 3, Status::Forward) > progress(Player::One, 1, 1, Status::Forward));
    }

    #[test]
    fn backward_progress_continues_past_the_turn() {
        // Just turned (col 6) scores less than one step from finishing (col 1).
        let just_turned = progress(Player::One, 1, 6, Status::Backward);
        let almost_home = progress(Player::One, 1, 1, Status::Backward);
        assert!(almost_home > just_turned);
    }

    #[test]
    fn finished_dominates_any_on_board_progress() {
        assert!(FINISH_BONUS > PROGRESS_TABLE[12]);
    }
}
