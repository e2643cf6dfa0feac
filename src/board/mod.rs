//! Board representation and rules: bitboards with a mailbox shadow,
//! make/unmake with incremental hashing and evaluator updates, move
//! generation, draw detection and static exchange evaluation.

pub mod attacks;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod see;
mod state;
mod types;
pub mod zobrist;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError};
pub use see::SEE_VALUES;
pub use state::{flipped, Board};
pub use types::{
    castle_bit, Color, DenseMove, Move, MoveKind, Piece, Square, CASTLE_ALL, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q, COLORS, MAX_MOVES, MAX_PLY, NULL_DMOVE, PIECES,
};
