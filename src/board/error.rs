//! Error types surfaced to the UCI driver. Nothing on the search's hot
//! path constructs these; they exist for the text boundary only.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount(usize),
    BadPiece(char),
    BadRankWidth { rank: usize, width: usize },
    BadSideToMove(String),
    BadCastling(String),
    BadEnPassant(String),
    BadCounter(String),
    MissingKing,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount(n) => write!(f, "expected 4-6 FEN fields, got {n}"),
            FenError::BadPiece(c) => write!(f, "unknown piece character '{c}'"),
            FenError::BadRankWidth { rank, width } => {
                write!(f, "rank {rank} describes {width} files")
            }
            FenError::BadSideToMove(s) => write!(f, "bad side to move '{s}'"),
            FenError::BadCastling(s) => write!(f, "bad castling field '{s}'"),
            FenError::BadEnPassant(s) => write!(f, "bad en-passant field '{s}'"),
            FenError::BadCounter(s) => write!(f, "bad move counter '{s}'"),
            FenError::MissingKing => write!(f, "each side needs exactly one king"),
        }
    }
}

impl std::error::Error for FenError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    BadFormat(String),
    Illegal(String),
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::BadFormat(s) => write!(f, "unparseable move '{s}'"),
            MoveParseError::Illegal(s) => write!(f, "illegal move '{s}'"),
        }
    }
}

impl std::error::Error for MoveParseError {}
