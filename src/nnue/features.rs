//! Board-state feature encoding for the evaluator.
//!
//! Each colour sees a 384-wide vector: one entry per (piece type, square),
//! with the square taken relative to the viewer (Black's board is
//! vertically reflected so its own pieces sit on the low ranks). `diff`
//! produces the sparse +1/-1 changes a move causes, per viewer, in both the
//! forward and reverse direction.

use crate::board::{Board, Color, Move, Piece, Square, COLORS, PIECES};

use super::linalg::{Dense, Sparse};

/// 6 piece types x 64 viewer-relative squares.
pub const N_FEATURES: usize = 384;

pub type FeatureValue = i8;
pub type FeatureVector = Dense<FeatureValue, N_FEATURES>;
pub type FeatureDiff = Sparse<FeatureValue, N_FEATURES>;

#[inline(always)]
fn feature_index(piece: Piece, sq: Square, viewer: Color) -> usize {
    piece.index() * 64 + sq.relative(viewer).index()
}

/// Encode a position as one feature vector per viewer colour, indexed by
/// [`Color::index`]. Entry semantics: the viewer's *own* pieces.
#[must_use]
pub fn encode(board: &Board) -> [FeatureVector; 2] {
    let mut features = [FeatureVector::zeros(), FeatureVector::zeros()];
    for viewer in COLORS {
        for piece in PIECES {
            let mut bb = board.pieces_bb(viewer, piece);
            while bb != 0 {
                let sq = Square(bb.trailing_zeros() as u8);
                bb &= bb - 1;
                features[viewer.index()][feature_index(piece, sq, viewer)] = 1;
            }
        }
    }
    features
}

/// Sparse feature changes for `m` played by `us`, per viewer colour.
///
/// `forward = true` builds the delta that applies the move; `false` builds
/// the one that reverts it. The two sum to zero.
#[must_use]
pub fn diff(m: Move, us: Color, forward: bool) -> [FeatureDiff; 2] {
    let them = !us;
    let inc: FeatureValue = if forward { 1 } else { -1 };
    let mut diffs = [FeatureDiff::new(), FeatureDiff::new()];

    // Mover leaves the origin.
    diffs[us.index()].set(feature_index(m.piece, m.origin, us), -inc);

    // Mover (or the promoted piece) arrives at the target.
    let arriving = m.promotion().unwrap_or(m.piece);
    diffs[us.index()].set(feature_index(arriving, m.target, us), inc);

    // Captured material leaves, seen from the opponent's viewpoint.
    if m.is_en_passant() {
        let victim_sq = m.en_passant_victim_square();
        diffs[them.index()].set(feature_index(Piece::Pawn, victim_sq, them), -inc);
    } else if m.is_capture() {
        let captured = m.captured.expect("capture without captured piece");
        diffs[them.index()].set(feature_index(captured, m.target, them), -inc);
    }

    // Castling moves the rook as well.
    if m.is_castle() {
        let kingside = m.kind == crate::board::MoveKind::KingCastle;
        let (rook_from, rook_to) = crate::board::zobrist::castling_rook_squares(us, kingside);
        diffs[us.index()].set(feature_index(Piece::Rook, rook_from, us), -inc);
        diffs[us.index()].set(feature_index(Piece::Rook, rook_to, us), inc);
    }

    diffs
}
