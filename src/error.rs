use squadro_types::Move;
use thiserror::Error;

/// Why a move was rejected by [`crate::board::Board::apply_move`]. Mirrors the
/// teacher's `FenError` in spirit: one typed error surface, no panics, no
/// partial mutation on any variant.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum IllegalMove {
    #[error("move {0} does not name a piece owned by the side to move")]
    NotOwned(Move),

    #[error("piece for move {0} has already finished")]
    AlreadyFinished(Move),

    #[error("move {0} would capture a piece of the mover's own side")]
    FriendlyCapture(Move),

    #[error("move {0} bumps a piece onto an occupied reset square")]
    BlockedReset(Move),

    #[error("move {0} ends on an occupied destination square")]
    BlockedDestination(Move),
}

/// The search core's own fatal error: no legal move existed in a state the
/// caller claimed was non-terminal. Should be unreachable; see spec §7.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("search found no legal move in a non-terminal position")]
pub struct NoLegalMove;
