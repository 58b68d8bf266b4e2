//! Legal and capture-only move enumeration (spec §4.1's enumeration entry
//! points), built directly on `makemove`'s read-only `simulate`.

use smallvec::SmallVec;
use squadro_types::{Move, PieceId, Player, Status, PIECES_PER_PLAYER};

use super::Board;

pub type MoveList = SmallVec<[Move; PIECES_PER_PLAYER]>;

impl Board {
    /// Every move available to `side`'s non-finished pieces, in piece-id
    /// order. Ties in move ordering later are broken by this order (spec
    /// §4.6.4).
    #[must_use]
    pub fn generate_legal_moves(&self, side: Player) -> MoveList {
        let mut moves = MoveList::new();
        for id in PieceId::for_player(side) {
            if self.piece(id).status == Status::Finished {
                continue;
            }
            if self.simulate(id, side).is_ok() {
                moves.push(Move::new(id));
            }
        }
        moves
    }

    /// The subset of legal moves whose simulation captures at least one
    /// opponent piece, used by quiescence search.
    #[must_use]
    pub fn generate_capture_moves(&self, side: Player) -> MoveList {
        let mut moves = MoveList::new();
        for id in PieceId::for_player(side) {
            if self.piece(id).status == Status::Finished {
                continue;
            }
            if let Ok(outcome) = self.simulate(id, side) {
                if !outcome.captures.is_empty() {
                    moves.push(Move::new(id));
                }
            }
        }
        moves
    }

    /// Whether `mv` would capture at least one opponent piece, without
    /// mutating the board. Used by move ordering (spec §4.6.4 rule 2).
    #[must_use]
    pub fn move_captures(&self, mv: Move, side: Player) -> bool {
        mv.piece()
            .and_then(|id| self.simulate(id, side).ok())
            .is_some_and(|outcome| !outcome.captures.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_position_has_five_moves_per_side() {
        let board = Board::new();
        assert_eq!(board.generate_legal_moves(Player::One).len(), 5);
        assert_eq!(board.generate_legal_moves(Player::Two).len(), 5);
        assert!(board.generate_capture_moves(Player::One).is_empty());
    }
}
