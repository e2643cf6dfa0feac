//! Legal move generation: pseudo-legal per piece type, then a king-safety
//! filter that simulates the move on copies of the occupancy masks instead
//! of mutating the board.

use super::attacks::{self, pop_lsb};
use super::error::MoveParseError;
use super::types::{Color, Move, MoveKind, Piece, Square};
use super::zobrist;
use super::Board;

const PROMO_KINDS: [MoveKind; 4] = [
    MoveKind::QueenPromo,
    MoveKind::RookPromo,
    MoveKind::BishopPromo,
    MoveKind::KnightPromo,
];
const PROMO_CAPTURE_KINDS: [MoveKind; 4] = [
    MoveKind::QueenPromoCapture,
    MoveKind::RookPromoCapture,
    MoveKind::BishopPromoCapture,
    MoveKind::KnightPromoCapture,
];

impl Board {
    /// All legal moves in the position.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        self.pseudo_legal(&mut moves, false);
        moves.retain(|&m| self.is_legal(m));
        moves
    }

    /// Captures (including en passant and capturing promotions) plus quiet
    /// promotions, for quiescence.
    #[must_use]
    pub fn capture_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(16);
        self.pseudo_legal(&mut moves, true);
        moves.retain(|&m| self.is_legal(m));
        moves
    }

    fn pseudo_legal(&self, moves: &mut Vec<Move>, captures_only: bool) {
        let us = self.side_to_move;
        let them = !us;
        let own = self.occupancy(us);
        let enemy = self.occupancy(them);
        let occ = self.occupied();

        self.pawn_moves(moves, captures_only);

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
            let mut from_bb = self.pieces_bb(us, piece);
            while from_bb != 0 {
                let origin = pop_lsb(&mut from_bb);
                let mut targets = attacks::attacks(piece, us, origin, occ) & !own;
                if captures_only {
                    targets &= enemy;
                }
                while targets != 0 {
                    let target = pop_lsb(&mut targets);
                    if enemy & target.bb() != 0 {
                        let mut m = Move::new(origin, target, piece, MoveKind::Capture);
                        m.captured = self.piece_type_at(target);
                        moves.push(m);
                    } else {
                        moves.push(Move::new(origin, target, piece, MoveKind::Quiet));
                    }
                }
            }
        }

        if !captures_only {
            self.castling_moves(moves);
        }
    }

    fn pawn_moves(&self, moves: &mut Vec<Move>, captures_only: bool) {
        let us = self.side_to_move;
        let them = !us;
        let occ = self.occupied();
        let enemy = self.occupancy(them);
        let (push, start_rank, promo_rank) = match us {
            Color::White => (8i8, 1u8, 7u8),
            Color::Black => (-8i8, 6u8, 0u8),
        };

        let mut pawns = self.pieces_bb(us, Piece::Pawn);
        while pawns != 0 {
            let origin = pop_lsb(&mut pawns);
            let single = Square((origin.0 as i8 + push) as u8);

            // Pushes.
            if occ & single.bb() == 0 {
                if single.rank() == promo_rank {
                    for kind in PROMO_KINDS {
                        moves.push(Move::new(origin, single, Piece::Pawn, kind));
                    }
                } else if !captures_only {
                    moves.push(Move::new(origin, single, Piece::Pawn, MoveKind::Quiet));
                    if origin.rank() == start_rank {
                        let double = Square((single.0 as i8 + push) as u8);
                        if occ & double.bb() == 0 {
                            moves.push(Move::new(
                                origin,
                                double,
                                Piece::Pawn,
                                MoveKind::DoublePush,
                            ));
                        }
                    }
                }
            }

            // Captures.
            let mut targets = attacks::pawn_attacks(us, origin) & enemy;
            while targets != 0 {
                let target = pop_lsb(&mut targets);
                if target.rank() == promo_rank {
                    for kind in PROMO_CAPTURE_KINDS {
                        let mut m = Move::new(origin, target, Piece::Pawn, kind);
                        m.captured = self.piece_type_at(target);
                        moves.push(m);
                    }
                } else {
                    let mut m = Move::new(origin, target, Piece::Pawn, MoveKind::Capture);
                    m.captured = self.piece_type_at(target);
                    moves.push(m);
                }
            }

            // En passant.
            if let Some(ep_sq) = self.en_passant_square() {
                if attacks::pawn_attacks(us, origin) & ep_sq.bb() != 0 {
                    let mut m = Move::new(origin, ep_sq, Piece::Pawn, MoveKind::EnPassant);
                    m.captured = Some(Piece::Pawn);
                    moves.push(m);
                }
            }
        }
    }

    fn castling_moves(&self, moves: &mut Vec<Move>) {
        let us = self.side_to_move;
        let them = !us;
        let occ = self.occupied();
        let rank = us.relative_rank(0);
        let king_from = Square::new(rank, 4);

        if self.pieces_bb(us, Piece::King) & king_from.bb() == 0 {
            return;
        }
        if self.square_attacked(king_from, them) {
            return;
        }

        for kingside in [true, false] {
            if self.castling_rights & super::types::castle_bit(us, kingside) == 0 {
                continue;
            }
            let (between, king_path, king_to) = if kingside {
                (
                    Square::new(rank, 5).bb() | Square::new(rank, 6).bb(),
                    [Square::new(rank, 5), Square::new(rank, 6)],
                    Square::new(rank, 6),
                )
            } else {
                (
                    Square::new(rank, 1).bb()
                        | Square::new(rank, 2).bb()
                        | Square::new(rank, 3).bb(),
                    [Square::new(rank, 3), Square::new(rank, 2)],
                    Square::new(rank, 2),
                )
            };
            if occ & between != 0 {
                continue;
            }
            if king_path.iter().any(|&sq| self.square_attacked(sq, them)) {
                continue;
            }
            let kind = if kingside {
                MoveKind::KingCastle
            } else {
                MoveKind::QueenCastle
            };
            moves.push(Move::new(king_from, king_to, Piece::King, kind));
        }
    }

    /// Would our king be attacked after `m`? Simulated on occupancy copies.
    fn is_legal(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;

        let mut occ = self.occupied();
        occ &= !m.origin.bb();
        occ |= m.target.bb();

        let mut enemy_sets = self.pieces[them.index()];
        if m.is_en_passant() {
            let victim = m.en_passant_victim_square();
            occ &= !victim.bb();
            enemy_sets[Piece::Pawn.index()] &= !victim.bb();
        } else if m.is_capture() {
            if let Some(captured) = m.captured {
                enemy_sets[captured.index()] &= !m.target.bb();
            }
        }

        let king_sq = if m.piece == Piece::King {
            m.target
        } else {
            self.king_square(us)
        };

        !self.square_attacked_by_sets(king_sq, them, occ, &enemy_sets)
    }

    /// Does `m` check the opponent? Computed on simulated masks; ordering
    /// and the search's extension logic call this once per move.
    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let enemy_king = self.king_square(them);

        let mut occ = self.occupied();
        occ &= !m.origin.bb();
        occ |= m.target.bb();

        let mut our_sets = self.pieces[us.index()];
        let arriving = m.promotion().unwrap_or(m.piece);
        our_sets[m.piece.index()] &= !m.origin.bb();
        our_sets[arriving.index()] |= m.target.bb();

        if m.is_en_passant() {
            occ &= !m.en_passant_victim_square().bb();
        }
        if m.is_castle() {
            let (rook_from, rook_to) =
                zobrist::castling_rook_squares(us, m.kind == MoveKind::KingCastle);
            occ &= !rook_from.bb();
            occ |= rook_to.bb();
            our_sets[Piece::Rook.index()] &= !rook_from.bb();
            our_sets[Piece::Rook.index()] |= rook_to.bb();
        }

        self.square_attacked_by_sets(enemy_king, us, occ, &our_sets)
    }

    /// Resolve a long-algebraic move string against the legal move list.
    pub fn parse_uci_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if text.len() < 4 || text.len() > 5 {
            return Err(MoveParseError::BadFormat(text.to_string()));
        }
        let origin = Square::parse(&text[0..2])
            .ok_or_else(|| MoveParseError::BadFormat(text.to_string()))?;
        let target = Square::parse(&text[2..4])
            .ok_or_else(|| MoveParseError::BadFormat(text.to_string()))?;
        let promotion = match text.as_bytes().get(4) {
            Some(&c) => Some(
                Piece::from_letter(c as char)
                    .filter(|p| !matches!(p, Piece::Pawn | Piece::King))
                    .ok_or_else(|| MoveParseError::BadFormat(text.to_string()))?,
            ),
            None => None,
        };

        self.legal_moves()
            .into_iter()
            .find(|m| m.origin == origin && m.target == target && m.promotion() == promotion)
            .ok_or_else(|| MoveParseError::Illegal(text.to_string()))
    }
}
