//! Attack generation: jump tables for knights, kings and pawns plus
//! classical ray scans for the sliders.

use once_cell::sync::Lazy;

use super::types::{Color, Piece, Square};

// Ray directions, indexed as rays[dir][square]. The first four run towards
// higher square indices and resolve blockers with the lowest set bit; the
// last four run the other way and use the highest.
const N_DIRS: usize = 8;
const DIR_OFFSETS: [(i8, i8); N_DIRS] = [
    (1, 0),   // north
    (0, 1),   // east
    (1, 1),   // north-east
    (1, -1),  // north-west
    (-1, 0),  // south
    (0, -1),  // west
    (-1, -1), // south-west
    (-1, 1),  // south-east
];

struct Tables {
    rays: [[u64; 64]; N_DIRS],
    knight: [u64; 64],
    king: [u64; 64],
    pawn: [[u64; 64]; 2],
}

static TABLES: Lazy<Tables> = Lazy::new(|| {
    let mut rays = [[0u64; 64]; N_DIRS];
    for (d, &(dr, df)) in DIR_OFFSETS.iter().enumerate() {
        for sq in 0..64u8 {
            let mut bb = 0u64;
            let (mut r, mut f) = ((sq / 8) as i8, (sq % 8) as i8);
            loop {
                r += dr;
                f += df;
                if !(0..8).contains(&r) || !(0..8).contains(&f) {
                    break;
                }
                bb |= 1u64 << (r * 8 + f);
            }
            rays[d][sq as usize] = bb;
        }
    }

    let mut knight = [0u64; 64];
    let mut king = [0u64; 64];
    let mut pawn = [[0u64; 64]; 2];
    for sq in 0..64i8 {
        let (r, f) = (sq / 8, sq % 8);
        let mut set = |bb: &mut u64, dr: i8, df: i8| {
            let (nr, nf) = (r + dr, f + df);
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                *bb |= 1u64 << (nr * 8 + nf);
            }
        };
        for (dr, df) in [
            (2, 1),
            (2, -1),
            (-2, 1),
            (-2, -1),
            (1, 2),
            (1, -2),
            (-1, 2),
            (-1, -2),
        ] {
            set(&mut knight[sq as usize], dr, df);
        }
        for (dr, df) in [
            (1, 0),
            (1, 1),
            (1, -1),
            (0, 1),
            (0, -1),
            (-1, 0),
            (-1, 1),
            (-1, -1),
        ] {
            set(&mut king[sq as usize], dr, df);
        }
        set(&mut pawn[0][sq as usize], 1, 1);
        set(&mut pawn[0][sq as usize], 1, -1);
        set(&mut pawn[1][sq as usize], -1, 1);
        set(&mut pawn[1][sq as usize], -1, -1);
    }

    Tables {
        rays,
        knight,
        king,
        pawn,
    }
});

#[inline]
fn ray_attack(dir: usize, sq: usize, occupancy: u64) -> u64 {
    let ray = TABLES.rays[dir][sq];
    let blockers = ray & occupancy;
    if blockers == 0 {
        return ray;
    }
    let blocker = if dir < 4 {
        blockers.trailing_zeros() as usize
    } else {
        63 - blockers.leading_zeros() as usize
    };
    ray & !TABLES.rays[dir][blocker]
}

#[inline]
#[must_use]
pub fn rook_attacks(occupancy: u64, sq: Square) -> u64 {
    let i = sq.index();
    ray_attack(0, i, occupancy)
        | ray_attack(1, i, occupancy)
        | ray_attack(4, i, occupancy)
        | ray_attack(5, i, occupancy)
}

#[inline]
#[must_use]
pub fn bishop_attacks(occupancy: u64, sq: Square) -> u64 {
    let i = sq.index();
    ray_attack(2, i, occupancy)
        | ray_attack(3, i, occupancy)
        | ray_attack(6, i, occupancy)
        | ray_attack(7, i, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(occupancy: u64, sq: Square) -> u64 {
    rook_attacks(occupancy, sq) | bishop_attacks(occupancy, sq)
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> u64 {
    TABLES.knight[sq.index()]
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> u64 {
    TABLES.king[sq.index()]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> u64 {
    TABLES.pawn[color.index()][sq.index()]
}

/// The attack oracle: squares attacked by `piece` of `color` standing on
/// `sq` given `occupancy`.
#[inline]
#[must_use]
pub fn attacks(piece: Piece, color: Color, sq: Square, occupancy: u64) -> u64 {
    match piece {
        Piece::Pawn => pawn_attacks(color, sq),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(occupancy, sq),
        Piece::Rook => rook_attacks(occupancy, sq),
        Piece::Queen => queen_attacks(occupancy, sq),
        Piece::King => king_attacks(sq),
    }
}

#[inline]
#[must_use]
pub fn pop_lsb(bb: &mut u64) -> Square {
    debug_assert!(*bb != 0);
    let sq = Square(bb.trailing_zeros() as u8);
    *bb &= *bb - 1;
    sq
}

/// All squares on `rank` (0-based).
#[inline]
#[must_use]
pub fn rank_bb(rank: u8) -> u64 {
    0xffu64 << (8 * rank)
}
