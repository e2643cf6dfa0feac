//! Static exchange evaluation.
//!
//! Simulates the capture sequence on one square by repeatedly picking the
//! smallest attacker, masking captured pieces out of consideration (which
//! also resolves sliding xrays), then backing the balance up with a minimax
//! swap. The threshold form has the two standard early exits.

use crate::search::constants::MAX_SCORE;

use super::attacks;
use super::types::{Color, Move, Piece, Square};
use super::Board;

/// SEE material values; distinct from evaluation values by design of the
/// exchange model (the king can never be profitably captured).
pub const SEE_VALUES: [i32; 6] = [100, 320, 350, 500, 900, MAX_SCORE as i32];

impl Board {
    /// Bitboard of the smallest attacker of `target` for `side`, limited to
    /// `mask`. Sliders are queried against the masked occupancy so removed
    /// attackers expose the xray behind them.
    fn smallest_attacker(&self, target: Square, mask: u64, side: Color) -> u64 {
        let atk = attacks::pawn_attacks(!side, target) & self.pieces_bb(side, Piece::Pawn) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }
        let atk = attacks::knight_attacks(target) & self.pieces_bb(side, Piece::Knight) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }

        let occ = self.occupied() & mask;
        let diag = attacks::bishop_attacks(occ, target);
        let atk = diag & self.pieces_bb(side, Piece::Bishop) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }
        let straight = attacks::rook_attacks(occ, target);
        let atk = straight & self.pieces_bb(side, Piece::Rook) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }
        let atk = (diag | straight) & self.pieces_bb(side, Piece::Queen) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }
        let atk = attacks::king_attacks(target) & self.pieces_bb(side, Piece::King) & mask;
        if atk != 0 {
            return atk & atk.wrapping_neg();
        }
        0
    }

    /// Exchange value of trading on `target`, with `side` to recapture a
    /// piece of type `occupant` and only pieces in `mask` participating.
    fn see_exchange(&self, target: Square, mut side: Color, occupant: Piece, mut mask: u64) -> i32 {
        let mut gain: Vec<i32> = Vec::with_capacity(16);
        gain.push(SEE_VALUES[occupant.index()]);

        let mut attacker_bb = self.smallest_attacker(target, mask, side);
        while attacker_bb != 0 {
            let attacker_sq = Square(attacker_bb.trailing_zeros() as u8);
            let attacker = self
                .piece_type_at(attacker_sq)
                .expect("attacker square empty");
            let last = *gain.last().expect("gain never empty");
            gain.push(SEE_VALUES[attacker.index()] - last);
            mask ^= attacker_bb;
            side = !side;
            attacker_bb = self.smallest_attacker(target, mask, side);
        }

        if gain.len() == 1 {
            // No capture available at all.
            return 0;
        }

        // Each side may decline to continue the exchange, so fold from the
        // deepest balance: the last entry is the gain if the final piece
        // were captured, which it cannot be.
        for d in (0..gain.len() - 2).rev() {
            gain[d] = gain[d].min(-gain[d + 1]);
        }
        gain[0].max(0)
    }

    /// Exact SEE of a capture: captured value minus the best recapture
    /// sequence against us.
    #[must_use]
    pub fn see_capture(&self, m: Move) -> i32 {
        debug_assert!(m.is_capture());
        let mut mask = !m.origin.bb();
        let captured_gain = if m.is_en_passant() {
            mask &= !m.en_passant_victim_square().bb();
            SEE_VALUES[Piece::Pawn.index()]
        } else {
            SEE_VALUES[m.captured.expect("capture without captured piece").index()]
        };
        let recapture = self.see_exchange(m.target, !self.side_to_move(), m.piece, mask);
        captured_gain - recapture
    }

    /// Threshold SEE: does the capture meet `threshold`? Early-outs when
    /// the optimistic bound already fails or the pessimistic bound already
    /// holds.
    #[must_use]
    pub fn see_ge(&self, m: Move, threshold: i32) -> bool {
        debug_assert!(m.is_capture());
        let mut mask = !m.origin.bb();
        let mut gain = if m.is_en_passant() {
            mask &= !m.en_passant_victim_square().bb();
            SEE_VALUES[Piece::Pawn.index()] - threshold
        } else {
            SEE_VALUES[m.captured.expect("capture without captured piece").index()] - threshold
        };

        // Just taking the piece is the upper bound.
        if gain < 0 {
            return false;
        }
        let mut last_attacker_value = SEE_VALUES[m.piece.index()];
        // Losing our capturing piece outright is the lower bound.
        if gain >= last_attacker_value {
            return true;
        }

        let mut side = !self.side_to_move();
        let mut attacker_bb = self.smallest_attacker(m.target, mask, side);
        while attacker_bb != 0 {
            let attacker_sq = Square(attacker_bb.trailing_zeros() as u8);
            let attacker = self
                .piece_type_at(attacker_sq)
                .expect("attacker square empty");
            gain = last_attacker_value - gain - 1;
            last_attacker_value = SEE_VALUES[attacker.index()];
            if gain - last_attacker_value >= 0 {
                // Even after a recapture we stay above the threshold.
                side = !side;
                break;
            }
            mask ^= attacker_bb;
            side = !side;
            attacker_bb = self.smallest_attacker(m.target, mask, side);
        }

        // Whoever cannot recapture loses the argument.
        side != self.side_to_move()
    }
}
