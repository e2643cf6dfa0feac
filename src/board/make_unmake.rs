//! Applying and reverting moves.
//!
//! The Zobrist key is maintained exclusively through [`zobrist::diff`] so
//! the incremental path and the full recompute can be checked against each
//! other; the accumulator is updated through its own sparse diffs. After
//! `make(m); unmake(m)` the entire state is bit-equal to the pre-call
//! state.

use super::state::Snapshot;
use super::types::{Color, Move, MoveKind, Piece};
use super::zobrist;
use super::Board;

impl Board {
    pub fn make(&mut self, m: Move) {
        let us = self.side_to_move;

        self.key_history.push(self.hash);
        self.stack.push(Snapshot {
            castling_rights: self.castling_rights,
            en_passant_file: self.en_passant_file,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            last_move: self.last_move,
        });

        self.accumulator.make(m, us);

        // Remove captured material first so the target square is free.
        if m.is_en_passant() {
            let victim_sq = m.en_passant_victim_square();
            self.take_piece(victim_sq, !us, Piece::Pawn);
        } else if m.is_capture() {
            let captured = m.captured.expect("capture without captured piece");
            self.take_piece(m.target, !us, captured);
        }

        self.take_piece(m.origin, us, m.piece);
        self.put_piece(m.target, us, m.promotion().unwrap_or(m.piece));

        if m.is_castle() {
            let (rook_from, rook_to) =
                zobrist::castling_rook_squares(us, m.kind == MoveKind::KingCastle);
            self.take_piece(rook_from, us, Piece::Rook);
            self.put_piece(rook_to, us, Piece::Rook);
        }

        // Rights are lost when a king or rook leaves its home square, or a
        // rook is captured on one.
        let touched = zobrist::castling_rights_touched(m.origin)
            | zobrist::castling_rights_touched(m.target);
        let castling_change = self.castling_rights & touched;
        self.castling_rights &= !touched;

        let old_ep_file = self.en_passant_file;
        self.en_passant_file = if m.is_double_push() {
            Some(m.origin.file())
        } else {
            None
        };

        self.hash ^= zobrist::diff(m, us, old_ep_file, castling_change);

        if m.piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_counter += 1;
        }

        self.side_to_move = !us;
        self.ply += 1;
        self.last_move = Some(m);
    }

    pub fn unmake(&mut self, m: Move) {
        let snapshot = self.stack.pop().expect("unmake without make");
        self.key_history.pop();

        self.side_to_move = !self.side_to_move;
        let us = self.side_to_move;

        self.castling_rights = snapshot.castling_rights;
        self.en_passant_file = snapshot.en_passant_file;
        self.halfmove_clock = snapshot.halfmove_clock;
        self.hash = snapshot.hash;
        self.last_move = snapshot.last_move;
        if us == Color::Black {
            self.fullmove_counter -= 1;
        }
        self.ply -= 1;

        if m.is_castle() {
            let (rook_from, rook_to) =
                zobrist::castling_rook_squares(us, m.kind == MoveKind::KingCastle);
            self.take_piece(rook_to, us, Piece::Rook);
            self.put_piece(rook_from, us, Piece::Rook);
        }

        self.take_piece(m.target, us, m.promotion().unwrap_or(m.piece));
        self.put_piece(m.origin, us, m.piece);

        if m.is_en_passant() {
            let victim_sq = m.en_passant_victim_square();
            self.put_piece(victim_sq, !us, Piece::Pawn);
        } else if m.is_capture() {
            let captured = m.captured.expect("capture without captured piece");
            self.put_piece(m.target, !us, captured);
        }

        self.accumulator.unmake(m, us);
    }

    /// Flip the side to move without moving: clears en passant, updates the
    /// hash, leaves the accumulator (and the key history) untouched.
    pub fn make_null(&mut self) {
        let us = self.side_to_move;
        self.stack.push(Snapshot {
            castling_rights: self.castling_rights,
            en_passant_file: self.en_passant_file,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            last_move: self.last_move,
        });
        self.hash ^= zobrist::null_diff(us, self.en_passant_file);
        self.en_passant_file = None;
        self.side_to_move = !us;
        self.ply += 1;
        self.last_move = None;
    }

    pub fn unmake_null(&mut self) {
        let snapshot = self.stack.pop().expect("unmake_null without make_null");
        self.side_to_move = !self.side_to_move;
        self.en_passant_file = snapshot.en_passant_file;
        self.hash = snapshot.hash;
        self.last_move = snapshot.last_move;
        self.ply -= 1;
    }
}
