//! Core board vocabulary: squares, colours, pieces and moves.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A square index in 0..64, a1 = 0, h1 = 7, a8 = 56.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(pub u8);

impl Square {
    #[must_use]
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8);
        Square(rank * 8 + file)
    }

    #[inline(always)]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    #[must_use]
    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    #[must_use]
    pub fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline(always)]
    #[must_use]
    pub fn bb(self) -> u64 {
        1u64 << self.0
    }

    /// The square as seen from `viewer`'s side of the board: Black sees the
    /// ranks vertically reflected so its own pieces sit on the low ranks.
    #[inline(always)]
    #[must_use]
    pub fn relative(self, viewer: Color) -> Square {
        match viewer {
            Color::White => self,
            Color::Black => Square(self.0 ^ 56),
        }
    }

    /// Parse a coordinate like `e4`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].checked_sub(b'a')?;
        let rank = bytes[1].checked_sub(b'1')?;
        if file < 8 && rank < 8 {
            Some(Square::new(rank, file))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline(always)]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The rank `r` as seen from this colour's side (rank 0 is home).
    #[inline(always)]
    #[must_use]
    pub fn relative_rank(self, r: u8) -> u8 {
        match self {
            Color::White => r,
            Color::Black => 7 - r,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline(always)]
    fn not(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

pub const COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    #[inline(always)]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(idx: usize) -> Piece {
        PIECES[idx]
    }

    /// Lower-case letter used in FEN and promotion suffixes.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    #[must_use]
    pub fn from_letter(c: char) -> Option<Piece> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }
}

pub const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

// Castling right bits.
pub const CASTLE_WHITE_K: u8 = 1 << 0;
pub const CASTLE_WHITE_Q: u8 = 1 << 1;
pub const CASTLE_BLACK_K: u8 = 1 << 2;
pub const CASTLE_BLACK_Q: u8 = 1 << 3;
pub const CASTLE_ALL: u8 = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

#[must_use]
pub fn castle_bit(color: Color, kingside: bool) -> u8 {
    match (color, kingside) {
        (Color::White, true) => CASTLE_WHITE_K,
        (Color::White, false) => CASTLE_WHITE_Q,
        (Color::Black, true) => CASTLE_BLACK_K,
        (Color::Black, false) => CASTLE_BLACK_Q,
    }
}

/// The kind of a move, packed into 4 bits inside [`DenseMove`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MoveKind {
    Quiet = 0,
    DoublePush = 1,
    KingCastle = 2,
    QueenCastle = 3,
    Capture = 4,
    EnPassant = 5,
    KnightPromo = 8,
    BishopPromo = 9,
    RookPromo = 10,
    QueenPromo = 11,
    KnightPromoCapture = 12,
    BishopPromoCapture = 13,
    RookPromoCapture = 14,
    QueenPromoCapture = 15,
}

impl MoveKind {
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<MoveKind> {
        match bits {
            0 => Some(MoveKind::Quiet),
            1 => Some(MoveKind::DoublePush),
            2 => Some(MoveKind::KingCastle),
            3 => Some(MoveKind::QueenCastle),
            4 => Some(MoveKind::Capture),
            5 => Some(MoveKind::EnPassant),
            8 => Some(MoveKind::KnightPromo),
            9 => Some(MoveKind::BishopPromo),
            10 => Some(MoveKind::RookPromo),
            11 => Some(MoveKind::QueenPromo),
            12 => Some(MoveKind::KnightPromoCapture),
            13 => Some(MoveKind::BishopPromoCapture),
            14 => Some(MoveKind::RookPromoCapture),
            15 => Some(MoveKind::QueenPromoCapture),
            _ => None,
        }
    }
}

/// A move, carrying everything make/unmake and the evaluator diffs need.
///
/// `score` is transient move-ordering state and is ignored by equality.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub origin: Square,
    pub target: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    pub score: i32,
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin && self.target == other.target && self.kind == other.kind
    }
}

impl Eq for Move {}

impl Move {
    #[must_use]
    pub fn new(origin: Square, target: Square, piece: Piece, kind: MoveKind) -> Self {
        Move {
            origin,
            target,
            piece,
            captured: None,
            kind,
            score: 0,
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn is_capture(self) -> bool {
        self.kind as u8 & 0b0100 != 0
    }

    #[inline(always)]
    #[must_use]
    pub fn is_promotion(self) -> bool {
        self.kind as u8 & 0b1000 != 0
    }

    /// Quiet here means neither a capture nor a promotion; double pushes and
    /// castles count as quiet for the ordering heuristics.
    #[inline(always)]
    #[must_use]
    pub fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_en_passant(self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[inline(always)]
    #[must_use]
    pub fn is_castle(self) -> bool {
        matches!(self.kind, MoveKind::KingCastle | MoveKind::QueenCastle)
    }

    #[inline(always)]
    #[must_use]
    pub fn is_double_push(self) -> bool {
        self.kind == MoveKind::DoublePush
    }

    #[must_use]
    pub fn promotion(self) -> Option<Piece> {
        match self.kind {
            MoveKind::KnightPromo | MoveKind::KnightPromoCapture => Some(Piece::Knight),
            MoveKind::BishopPromo | MoveKind::BishopPromoCapture => Some(Piece::Bishop),
            MoveKind::RookPromo | MoveKind::RookPromoCapture => Some(Piece::Rook),
            MoveKind::QueenPromo | MoveKind::QueenPromoCapture => Some(Piece::Queen),
            _ => None,
        }
    }

    /// For an en-passant capture, the square of the captured pawn.
    #[must_use]
    pub fn en_passant_victim_square(self) -> Square {
        debug_assert!(self.is_en_passant());
        Square::new(self.origin.rank(), self.target.file())
    }

    #[must_use]
    pub fn pack(self) -> DenseMove {
        DenseMove(
            u16::from(self.origin.0)
                | u16::from(self.target.0) << 6
                | u16::from(self.kind as u8) << 12,
        )
    }

    /// Long-algebraic wire form: origin, target, optional promotion letter.
    #[must_use]
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(p) => format!("{}{}{}", self.origin, self.target, p.letter()),
            None => format!("{}{}", self.origin, self.target),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Compact 16-bit move for transposition-table and counter-move storage:
/// origin (6 bits), target (6 bits), kind (4 bits). All-zero is the null
/// marker (a1a1 quiet is never a legal move).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DenseMove(pub u16);

pub const NULL_DMOVE: DenseMove = DenseMove(0);

impl DenseMove {
    #[inline(always)]
    #[must_use]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn origin(self) -> Square {
        Square((self.0 & 0x3f) as u8)
    }

    #[must_use]
    pub fn target(self) -> Square {
        Square((self.0 >> 6 & 0x3f) as u8)
    }

    #[must_use]
    pub fn kind(self) -> Option<MoveKind> {
        MoveKind::from_bits((self.0 >> 12) as u8)
    }

    /// Re-validate a stored move against the current legal move list. A
    /// packed move from a hash collision or a stale entry silently fails to
    /// match and is dropped.
    #[must_use]
    pub fn unpack(self, legal_moves: &[Move]) -> Option<Move> {
        if self.is_null() {
            return None;
        }
        legal_moves.iter().copied().find(|m| m.pack() == self)
    }
}

/// Maximum game-tree height the search and the snapshot stack support.
pub const MAX_PLY: usize = 512;

/// Upper bound on moves in any legal position, used to size ordering tables.
pub const MAX_MOVES: usize = 256;
