//! Zobrist-style position hashing (spec §4.2). The teacher generates its
//! magic bitboard and Zobrist tables at build time via `build.rs` and loads
//! them with `include_bytes!`; Squadro's tables are three orders of
//! magnitude smaller, so they are filled once at process start instead, the
//! way `rsarvar1a-blits-rs`'s `board::zobrist` module does it.

use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use squadro_types::{NUM_PIECES, Player, Status};

/// Fixed so that games (and the test suite's determinism checks) are
/// reproducible across runs, matching the original `Zobrist.cpp`'s
/// `std::mt19937_64` seeded construction.
const ZOBRIST_SEED: u64 = 0x5371_4144_524F_0042;

pub struct ZobristTables {
    piece_square: [[[u64; 7]; 7]; NUM_PIECES],
    piece_direction: [[u64; 2]; NUM_PIECES],
    side_to_move: [u64; 2],
}

impl ZobristTables {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_square = [[[0u64; 7]; 7]; NUM_PIECES];
        for piece in piece_square.iter_mut() {
            for row in piece.iter_mut() {
                for cell in row.iter_mut() {
                    *cell = rng.gen();
                }
            }
        }

        let mut piece_direction = [[0u64; 2]; NUM_PIECES];
        for dirs in piece_direction.iter_mut() {
            for dir in dirs.iter_mut() {
                *dir = rng.gen();
            }
        }

        let side_to_move = [rng.gen(), rng.gen()];

        Self {
            piece_square,
            piece_direction,
            side_to_move,
        }
    }
}

lazy_static! {
    static ref ZOBRIST: ZobristTables = ZobristTables::new(ZOBRIST_SEED);
}

/// The XOR term contributed by a single on-board piece at `(row, col)` with
/// the given direction status. Callers incrementally XOR this in/out of
/// [`crate::board::Board`]'s running key as pieces move; [`Status::Finished`]
/// must never be passed in, since finished pieces contribute nothing.
pub fn piece_term(id: usize, row: u8, col: u8, status: Status) -> u64 {
    debug_assert_ne!(status, Status::Finished, "finished pieces contribute no hash term");
    ZOBRIST.piece_square[id][row as usize][col as usize]
        ^ ZOBRIST.piece_direction[id][status.direction_index()]
}

/// The XOR term for whichever side is to move.
pub fn side_term(side: Player) -> u64 {
    ZOBRIST.side_to_move[usize::from(side)]
}
