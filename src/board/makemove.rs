//! `apply_move` / `undo_move`: the reversible, allocation-free heart of the
//! engine (spec §4.1). Grounded on the teacher's `board/makemove.rs`
//! make/take pattern — record-then-mutate on apply, replay-in-reverse on
//! undo — adapted from chess's flat history stack to Squadro's bump chain.
//!
//! Legality is decided by a pure, read-only walk over the board
//! (`simulate`), shared between `apply_move` and move enumeration (spec
//! §4.1: "perform the simulation read-only ... to decide legality"). This
//! means `apply_move` never has to partially mutate and then roll back: it
//! only starts mutating once `simulate` has already proven the move legal.

use smallvec::SmallVec;
use squadro_types::{Move, PieceId, Player, Status};

use super::{Board, Piece, cell_index};
use crate::error::IllegalMove;
use crate::hasher;

pub type CaptureList = SmallVec<[CaptureRecord; 5]>;

/// A captured piece's identity and pre-bump position, enough to undo the
/// capture without re-deriving its reset square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRecord {
    pub id: PieceId,
    pub row: u8,
    pub col: u8,
}

/// Everything `undo_move` needs to exactly reverse an `apply_move`. The
/// sole output of `apply_move` and sole input to `undo_move` (spec §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub mover: PieceId,
    pub start: (u8, u8),
    pub destination: (u8, u8),
    pub original_status: Status,
    pub final_status: Status,
    pub captures: CaptureList,
}

/// Outcome of a read-only legality simulation: where the mover ends up,
/// what status it ends in, and who it captured along the way. Shared with
/// move enumeration, which only needs `captures.is_empty()`.
pub(crate) struct SimOutcome {
    pub(crate) destination: (u8, u8),
    pub(crate) final_status: Status,
    pub(crate) captures: CaptureList,
}

/// A tiny vacate/occupy overlay on top of the real grid, consulted instead
/// of `Board::at` while a simulation is in flight. Cells touched more than
/// once (a bump's origin doubling as another bump's reset square) resolve
/// to the most recent write, which is what makes the self-reset-square
/// edge case (a piece bumped back onto its own just-vacated start cell)
/// come out correctly with no special-casing.
struct Overlay {
    writes: SmallVec<[(usize, Option<PieceId>); 6]>,
}

impl Overlay {
    fn new() -> Self {
        Self { writes: SmallVec::new() }
    }

    fn set(&mut self, cell: usize, value: Option<PieceId>) {
        self.writes.push((cell, value));
    }

    fn get(&self, cell: usize, grid_fallback: Option<PieceId>) -> Option<PieceId> {
        self.writes.iter().rev().find(|(c, _)| *c == cell).map_or(grid_fallback, |(_, v)| *v)
    }
}

impl Board {
    pub fn apply_move(&mut self, mv: Move, side: Player) -> Result<MoveRecord, IllegalMove> {
        let mover = mv.piece().ok_or(IllegalMove::NotOwned(mv))?;
        let outcome = self.simulate(mover, side)?;
        let start_piece = self.piece(mover);
        let start = (start_piece.row, start_piece.col);
        let original_status = start_piece.status;

        self.clear_cell(start.0, start.1);
        self.zobrist_pieces ^= hasher::piece_term(mover.into(), start.0, start.1, original_status);

        for cap in &outcome.captures {
            let victim = self.piece(cap.id);
            self.clear_cell(victim.row, victim.col);
            self.zobrist_pieces ^= hasher::piece_term(cap.id.into(), victim.row, victim.col, victim.status);

            let reset = Self::reset_square(victim.owner, cap.id.player_index(), victim.status);
            self.pieces[cap.id] = Piece { row: reset.0, col: reset.1, ..victim };
            self.set_cell(reset.0, reset.1, cap.id);
            self.zobrist_pieces ^= hasher::piece_term(cap.id.into(), reset.0, reset.1, victim.status);
        }

        self.pieces[mover] = Piece {
            row: outcome.destination.0,
            col: outcome.destination.1,
            status: outcome.final_status,
            ..start_piece
        };
        if outcome.final_status != Status::Finished {
            self.set_cell(outcome.destination.0, outcome.destination.1, mover);
            self.zobrist_pieces ^= hasher::piece_term(mover.into(), outcome.destination.0, outcome.destination.1, outcome.final_status);
        }

        Ok(MoveRecord {
            mover,
            start,
            destination: outcome.destination,
            original_status,
            final_status: outcome.final_status,
            captures: outcome.captures,
        })
    }

    pub fn undo_move(&mut self, record: &MoveRecord) {
        let mover = record.mover;
        let current = self.piece(mover);

        if record.final_status != Status::Finished {
            self.clear_cell(current.row, current.col);
            self.zobrist_pieces ^= hasher::piece_term(mover.into(), current.row, current.col, record.final_status);
        }

        self.pieces[mover] = Piece {
            row: record.start.0,
            col: record.start.1,
            status: record.original_status,
            ..current
        };
        self.set_cell(record.start.0, record.start.1, mover);
        self.zobrist_pieces ^= hasher::piece_term(mover.into(), record.start.0, record.start.1, record.original_status);

        for cap in record.captures.iter().rev() {
            let bumped = self.piece(cap.id);
            self.clear_cell(bumped.row, bumped.col);
            self.zobrist_pieces ^= hasher::piece_term(cap.id.into(), bumped.row, bumped.col, bumped.status);

            self.pieces[cap.id] = Piece { row: cap.row, col: cap.col, ..bumped };
            self.set_cell(cap.row, cap.col, cap.id);
            self.zobrist_pieces ^= hasher::piece_term(cap.id.into(), cap.row, cap.col, bumped.status);
        }
    }

    /// Read-only legality + outcome simulation, shared by `apply_move` and
    /// move enumeration.
    pub(crate) fn simulate(&self, mover: PieceId, side: Player) -> Result<SimOutcome, IllegalMove> {
        let mv = Move::new(mover);
        if mover.player() != side {
            return Err(IllegalMove::NotOwned(mv));
        }
        let piece = self.piece(mover);
        if piece.status == Status::Finished {
            return Err(IllegalMove::AlreadyFinished(mv));
        }

        let owner = piece.owner;
        let status = piece.status;
        let power = Self::power_for(mover, status);

        let mut overlay = Overlay::new();
        let mut pos = (piece.row, piece.col);
        overlay.set(cell_index(pos.0, pos.1), None);

        let mut captures = CaptureList::new();

        'motion: for _ in 0..power {
            match Self::advance_one(owner, status, pos) {
                None => {
                    pos = Self::edge_clamp(owner, status, pos);
                    break 'motion;
                }
                Some(next) => {
                    let next_cell = cell_index(next.0, next.1);
                    match overlay.get(next_cell, self.at(next.0, next.1)) {
                        None => pos = next,
                        Some(occupant) => {
                            if self.piece(occupant).owner == side {
                                return Err(IllegalMove::FriendlyCapture(mv));
                            }
                            pos = next;
                            self.resolve_capture_chain(owner, side, status, mv, &mut pos, &mut overlay, &mut captures, occupant)?;
                            break 'motion;
                        }
                    }
                }
            }
        }

        let travel = Self::travel_coord(owner, pos.0, pos.1);
        let final_status = match status {
            Status::Forward if travel == super::EDGE => Status::Backward,
            Status::Backward if travel == super::ENTRY => Status::Finished,
            other => other,
        };

        if final_status != Status::Finished {
            let dest_cell = cell_index(pos.0, pos.1);
            if overlay.get(dest_cell, self.at(pos.0, pos.1)).is_some() {
                return Err(IllegalMove::BlockedDestination(mv));
            }
        }

        Ok(SimOutcome {
            destination: pos,
            final_status,
            captures,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_capture_chain(
        &self,
        owner: Player,
        side: Player,
        mover_status: Status,
        mv: Move,
        pos: &mut (u8, u8),
        overlay: &mut Overlay,
        captures: &mut CaptureList,
        mut occupant: PieceId,
    ) -> Result<(), IllegalMove> {
        loop {
            let victim = self.piece(occupant);
            captures.push(CaptureRecord {
                id: occupant,
                row: victim.row,
                col: victim.col,
            });
            overlay.set(cell_index(victim.row, victim.col), None);

            let reset = Self::reset_square(victim.owner, occupant.player_index(), victim.status);
            let reset_cell = cell_index(reset.0, reset.1);
            if let Some(blocker) = overlay.get(reset_cell, self.at(reset.0, reset.1)) {
                if blocker != occupant {
                    return Err(IllegalMove::BlockedReset(mv));
                }
            }
            overlay.set(reset_cell, Some(occupant));

            match Self::advance_one(owner, mover_status, *pos) {
                None => {
                    *pos = Self::edge_clamp(owner, mover_status, *pos);
                    return Ok(());
                }
                Some(next) => {
                    let next_cell = cell_index(next.0, next.1);
                    match overlay.get(next_cell, self.at(next.0, next.1)) {
                        None => {
                            *pos = next;
                            return Ok(());
                        }
                        Some(next_occupant) => {
                            if self.piece(next_occupant).owner == side {
                                return Err(IllegalMove::FriendlyCapture(mv));
                            }
                            *pos = next;
                            occupant = next_occupant;
                        }
                    }
                }
            }
        }
    }
}
