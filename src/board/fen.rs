//! FEN round-trip. Not on the hot path; the test harness and the UCI
//! `position fen` command go through here.

use super::error::FenError;
use super::types::{
    Color, Piece, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
use super::zobrist;
use super::Board;

impl Board {
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::WrongFieldCount(fields.len()));
        }

        let mut board = Board::empty();

        for (rank_down, rank_text) in fields[0].split('/').enumerate() {
            if rank_down >= 8 {
                return Err(FenError::BadRankWidth {
                    rank: rank_down,
                    width: 0,
                });
            }
            let rank = 7 - rank_down as u8;
            let mut file = 0u8;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_letter(c).ok_or(FenError::BadPiece(c))?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::BadRankWidth {
                            rank: rank_down,
                            width: file as usize,
                        });
                    }
                    board.put_piece(Square::new(rank, file), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankWidth {
                    rank: rank_down,
                    width: file as usize,
                });
            }
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::BadSideToMove(other.to_string())),
        };

        board.castling_rights = 0;
        if fields[2] != "-" {
            for c in fields[2].chars() {
                board.castling_rights |= match c {
                    'K' => CASTLE_WHITE_K,
                    'Q' => CASTLE_WHITE_Q,
                    'k' => CASTLE_BLACK_K,
                    'q' => CASTLE_BLACK_Q,
                    _ => return Err(FenError::BadCastling(fields[2].to_string())),
                };
            }
        }

        board.en_passant_file = match fields[3] {
            "-" => None,
            text => {
                let sq = Square::parse(text)
                    .ok_or_else(|| FenError::BadEnPassant(text.to_string()))?;
                Some(sq.file())
            }
        };

        board.halfmove_clock = match fields.get(4) {
            Some(text) => text
                .parse()
                .map_err(|_| FenError::BadCounter((*text).to_string()))?,
            None => 0,
        };
        board.fullmove_counter = match fields.get(5) {
            Some(text) => text
                .parse()
                .map_err(|_| FenError::BadCounter((*text).to_string()))?,
            None => 1,
        };

        if board.pieces_bb(Color::White, Piece::King).count_ones() != 1
            || board.pieces_bb(Color::Black, Piece::King).count_ones() != 1
        {
            return Err(FenError::MissingKing);
        }

        board.hash = zobrist::hash(&board);
        board.refresh_accumulator();
        Ok(board)
    }

    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::new(rank, file);
                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            out.push(char::from_digit(empty, 10).unwrap_or('0'));
                            empty = 0;
                        }
                        let c = piece.letter();
                        out.push(if color == Color::White {
                            c.to_ascii_uppercase()
                        } else {
                            c
                        });
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from_digit(empty, 10).unwrap_or('0'));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(if self.side_to_move == Color::White {
            'w'
        } else {
            'b'
        });

        out.push(' ');
        if self.castling_rights == 0 {
            out.push('-');
        } else {
            for (bit, c) in [
                (CASTLE_WHITE_K, 'K'),
                (CASTLE_WHITE_Q, 'Q'),
                (CASTLE_BLACK_K, 'k'),
                (CASTLE_BLACK_Q, 'q'),
            ] {
                if self.castling_rights & bit != 0 {
                    out.push(c);
                }
            }
        }

        out.push(' ');
        match self.en_passant_square() {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }

        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock, self.fullmove_counter
        ));
        out
    }
}

impl std::str::FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
