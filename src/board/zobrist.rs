//! Zobrist hashing.
//!
//! Keys are generated once from a fixed seed so hashes are reproducible
//! across runs and across the test suite. The incremental `diff` of a move
//! must always match a full recompute; the board asserts this in debug
//! builds.

use once_cell::sync::Lazy;
use rand::prelude::*;

use super::state::Board;
use super::types::{
    Color, Move, MoveKind, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K,
    CASTLE_WHITE_Q,
};

/// Fixed generator seed (digits of pi).
const ZOBRIST_SEED: u64 = 0x3243_f6a8_885a_308d;

pub struct ZobristKeys {
    /// One key per (colour, piece, square).
    pub piece: [[[u64; 64]; 6]; 2],
    /// One key per castling right, indexed by the right's bit position.
    pub castling: [u64; 4],
    /// One key per side; toggling both flips the side to move.
    pub side: [u64; 2],
    /// One key per en-passant file.
    pub ep_file: [u64; 8],
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut keys = ZobristKeys {
        piece: [[[0; 64]; 6]; 2],
        castling: [0; 4],
        side: [0; 2],
        ep_file: [0; 8],
    };
    for colour in &mut keys.piece {
        for piece in colour.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }
    }
    for key in &mut keys.castling {
        *key = rng.gen();
    }
    for key in &mut keys.side {
        *key = rng.gen();
    }
    for key in &mut keys.ep_file {
        *key = rng.gen();
    }
    keys
});

/// Full hash of a position: XOR-fold of every present piece, the side to
/// move, the valid castling rights and the en-passant file if set.
#[must_use]
pub fn hash(board: &Board) -> u64 {
    let keys = &*ZOBRIST;
    let mut h = 0u64;

    for color in [Color::White, Color::Black] {
        for piece in 0..6 {
            let mut bb = board.pieces_bb(color, Piece::from_index(piece));
            while bb != 0 {
                let sq = bb.trailing_zeros() as usize;
                bb &= bb - 1;
                h ^= keys.piece[color.index()][piece][sq];
            }
        }
    }

    h ^= keys.side[board.side_to_move().index()];

    let rights = board.castling_rights();
    for bit in 0..4 {
        if rights & (1 << bit) != 0 {
            h ^= keys.castling[bit];
        }
    }

    if let Some(file) = board.en_passant_file() {
        h ^= keys.ep_file[file as usize];
    }

    h
}

/// The XOR delta transforming the pre-move hash into the post-move hash.
///
/// `old_ep_file` is the en-passant file before the move; `castling_change`
/// is the mask of rights removed by the move.
#[must_use]
pub fn diff(m: Move, us: Color, old_ep_file: Option<u8>, castling_change: u8) -> u64 {
    let keys = &*ZOBRIST;
    let them = !us;
    let mut h = 0u64;

    h ^= keys.piece[us.index()][m.piece.index()][m.origin.index()];
    h ^= keys.piece[us.index()][m.piece.index()][m.target.index()];

    if let Some(file) = old_ep_file {
        h ^= keys.ep_file[file as usize];
    }
    if m.is_double_push() {
        h ^= keys.ep_file[m.origin.file() as usize];
    }

    for bit in 0..4 {
        if castling_change & (1 << bit) != 0 {
            h ^= keys.castling[bit];
        }
    }

    if m.is_en_passant() {
        let victim = m.en_passant_victim_square();
        h ^= keys.piece[them.index()][Piece::Pawn.index()][victim.index()];
    } else if m.is_capture() {
        let captured = m.captured.expect("capture without captured piece");
        h ^= keys.piece[them.index()][captured.index()][m.target.index()];
    }

    if m.is_castle() {
        let (rook_from, rook_to) = castling_rook_squares(us, m.kind == MoveKind::KingCastle);
        h ^= keys.piece[us.index()][Piece::Rook.index()][rook_from.index()];
        h ^= keys.piece[us.index()][Piece::Rook.index()][rook_to.index()];
    }

    if let Some(promoted) = m.promotion() {
        // The pawn key toggled in at the target above is swapped for the
        // promoted piece's key.
        h ^= keys.piece[us.index()][Piece::Pawn.index()][m.target.index()];
        h ^= keys.piece[us.index()][promoted.index()][m.target.index()];
    }

    h ^= keys.side[us.index()];
    h ^= keys.side[them.index()];

    h
}

/// Hash delta for a null move.
#[must_use]
pub fn null_diff(us: Color, old_ep_file: Option<u8>) -> u64 {
    let keys = &*ZOBRIST;
    let mut h = 0u64;
    if let Some(file) = old_ep_file {
        h ^= keys.ep_file[file as usize];
    }
    h ^= keys.side[us.index()];
    h ^= keys.side[(!us).index()];
    h
}

/// Rook origin and target for a castle of `us`.
#[must_use]
pub fn castling_rook_squares(us: Color, kingside: bool) -> (Square, Square) {
    let rank = us.relative_rank(0);
    if kingside {
        (Square::new(rank, 7), Square::new(rank, 5))
    } else {
        (Square::new(rank, 0), Square::new(rank, 3))
    }
}

/// Rights lost when a piece moves from or to `sq`.
#[must_use]
pub fn castling_rights_touched(sq: Square) -> u8 {
    match sq.index() {
        0 => CASTLE_WHITE_Q,
        4 => CASTLE_WHITE_K | CASTLE_WHITE_Q,
        7 => CASTLE_WHITE_K,
        56 => CASTLE_BLACK_Q,
        60 => CASTLE_BLACK_K | CASTLE_BLACK_Q,
        63 => CASTLE_BLACK_K,
        _ => 0,
    }
}
