//! Game state: the board plus whose turn it is, a turn counter, and the
//! cached winner (spec §4.3). A thin wrapper — almost all the interesting
//! behavior lives in [`crate::board::Board`]; this module's whole job is to
//! keep the three derived fields (side, turn, winner) in lockstep with it.

use squadro_types::{Move, Player};

use crate::board::{Board, MoveList, MoveRecord};
use crate::error::IllegalMove;
use crate::hasher;

/// A player has won once at least four of their five pieces have finished
/// (spec §3). No draws are defined (spec §9).
const PIECES_TO_WIN: usize = 4;

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Player,
    turn: u32,
    winner: Option<Player>,
    position_key: u64,
}

impl GameState {
    /// A fresh game: empty board, Player 1 to move, regardless of which
    /// side the host agent is playing (spec §6).
    #[must_use]
    pub fn new() -> Self {
        let board = Board::new();
        let side_to_move = Player::One;
        let position_key = board.zobrist_pieces() ^ hasher::side_term(side_to_move);
        Self {
            board,
            side_to_move,
            turn: 0,
            winner: None,
            position_key,
        }
    }

    /// Builds a game state around an already-constructed [`Board`] (e.g.
    /// [`Board::from_scenario`]), for literal scenario tests (spec §8).
    /// Re-derives the winner and position key rather than trusting the
    /// caller to have kept them consistent.
    #[must_use]
    pub fn from_board(board: Board, side_to_move: Player, turn: u32) -> Self {
        let position_key = board.zobrist_pieces() ^ hasher::side_term(side_to_move);
        let winner = [Player::One, Player::Two].into_iter().find(|&p| board.finished_count(p) >= PIECES_TO_WIN);
        Self {
            board,
            side_to_move,
            turn,
            winner,
            position_key,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    #[must_use]
    pub fn position_key(&self) -> u64 {
        self.position_key
    }

    #[must_use]
    pub fn generate_legal_moves(&self) -> MoveList {
        self.board.generate_legal_moves(self.side_to_move)
    }

    #[must_use]
    pub fn generate_capture_moves(&self) -> MoveList {
        self.board.generate_capture_moves(self.side_to_move)
    }

    /// Applies `mv` for the current side to move, flips the turn, and
    /// re-derives the winner. On failure the state is left untouched,
    /// matching `Board::apply_move`'s own all-or-nothing contract.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveRecord, IllegalMove> {
        let mover_side = self.side_to_move;
        let record = self.board.apply_move(mv, mover_side)?;

        self.side_to_move = mover_side.flipped();
        self.turn += 1;
        self.position_key = self.board.zobrist_pieces() ^ hasher::side_term(self.side_to_move);

        // A move can finish at most one piece, so at most one side's count
        // crosses the win threshold on any single move. If both already
        // sat at the threshold (shouldn't happen in practice — a prior
        // apply would already have ended the game — but is cheap to
        // resolve), the mover wins (spec §4.3: ties broken towards the
        // side that just moved).
        let mover_finished = self.board.finished_count(mover_side) >= PIECES_TO_WIN;
        let opponent_finished = self.board.finished_count(mover_side.flipped()) >= PIECES_TO_WIN;
        self.winner = match (mover_finished, opponent_finished) {
            (true, _) => Some(mover_side),
            (false, true) => Some(mover_side.flipped()),
            (false, false) => None,
        };

        Ok(record)
    }

    /// Inverse of [`Self::apply_move`]: undoes the board mutation, flips
    /// the side back, decrements the turn counter, and re-derives the
    /// winner (clearing it if neither player has ≥4 finished pieces).
    pub fn undo_move(&mut self, record: &MoveRecord) {
        self.board.undo_move(record);
        self.side_to_move = self.side_to_move.flipped();
        self.turn -= 1;
        self.position_key = self.board.zobrist_pieces() ^ hasher::side_term(self.side_to_move);

        self.winner = [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.board.finished_count(p) >= PIECES_TO_WIN);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_game_has_player_one_to_move_and_no_winner() {
        let game = GameState::new();
        assert_eq!(game.side_to_move(), Player::One);
        assert_eq!(game.turn(), 0);
        assert!(!game.is_terminal());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn apply_then_undo_restores_every_derived_field() {
        let mut game = GameState::new();
        let before_key = game.position_key();
        let mv = game.generate_legal_moves()[0];
        let record = game.apply_move(mv).unwrap();

        assert_eq!(game.side_to_move(), Player::Two);
        assert_eq!(game.turn(), 1);

        game.undo_move(&record);

        assert_eq!(game.side_to_move(), Player::One);
        assert_eq!(game.turn(), 0);
        assert_eq!(game.position_key(), before_key);
        assert_eq!(game.winner(), None);
    }
}
