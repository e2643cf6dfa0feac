//! Auxiliary move-ordering tables: killers, history and counter-moves.

use crate::board::{DenseMove, Move, Piece, Square, MAX_PLY, NULL_DMOVE};

/// Per-ply ring of the two most recent quiet cutoff moves.
pub struct KillerTable {
    rows: Box<[[DenseMove; 2]; MAX_PLY]>,
    cursor: Box<[u8; MAX_PLY]>,
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable {
            rows: Box::new([[NULL_DMOVE; 2]; MAX_PLY]),
            cursor: Box::new([0; MAX_PLY]),
        }
    }
}

impl KillerTable {
    /// Record a quiet cutoff move. Captures, promotions and duplicates are
    /// rejected here so the search can call this unconditionally.
    pub fn store(&mut self, ply: usize, m: Move) {
        if ply >= MAX_PLY || m.is_capture() || m.is_promotion() {
            return;
        }
        let dmove = m.pack();
        if self.rows[ply].contains(&dmove) {
            return;
        }
        let slot = self.cursor[ply] as usize;
        self.rows[ply][slot] = dmove;
        self.cursor[ply] = (self.cursor[ply] + 1) % 2;
    }

    /// Quiescence can run past the main tree's ply ceiling; beyond it
    /// there are simply no killers.
    #[must_use]
    pub fn probe(&self, ply: usize) -> [DenseMove; 2] {
        if ply >= MAX_PLY {
            return [NULL_DMOVE; 2];
        }
        self.rows[ply]
    }

    pub fn clear(&mut self) {
        self.rows.fill([NULL_DMOVE; 2]);
        self.cursor.fill(0);
    }
}

/// `[piece][target]` counters bumped by depth^2 on quiet cutoffs. Cleared
/// at the start of every root search; the headroom assertion documents the
/// no-overflow argument rather than defending it at runtime.
pub struct HistoryTable {
    counts: Box<[[u32; 64]; 6]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        HistoryTable {
            counts: Box::new([[0; 64]; 6]),
        }
    }
}

impl HistoryTable {
    pub fn store(&mut self, depth: u8, m: Move) {
        if !m.is_quiet() {
            return;
        }
        let entry = &mut self.counts[m.piece.index()][m.target.index()];
        debug_assert!(*entry < 4_290_000_000, "history counter near overflow");
        *entry += u32::from(depth) * u32::from(depth);
    }

    #[must_use]
    pub fn probe(&self, m: Move) -> u32 {
        self.counts[m.piece.index()][m.target.index()]
    }

    #[must_use]
    pub fn probe_raw(&self, piece: Piece, target: Square) -> u32 {
        self.counts[piece.index()][target.index()]
    }

    pub fn clear(&mut self) {
        for row in self.counts.iter_mut() {
            row.fill(0);
        }
    }
}

/// One packed reply per (previous piece, previous target).
pub struct CountermoveTable {
    replies: Box<[[DenseMove; 64]; 6]>,
}

impl Default for CountermoveTable {
    fn default() -> Self {
        CountermoveTable {
            replies: Box::new([[NULL_DMOVE; 64]; 6]),
        }
    }
}

impl CountermoveTable {
    pub fn store(&mut self, previous: Option<Move>, m: Move) {
        let Some(prev) = previous else { return };
        if !m.is_quiet() {
            return;
        }
        self.replies[prev.piece.index()][prev.target.index()] = m.pack();
    }

    #[must_use]
    pub fn probe(&self, previous: Option<Move>) -> DenseMove {
        match previous {
            Some(prev) => self.replies[prev.piece.index()][prev.target.index()],
            None => NULL_DMOVE,
        }
    }

    pub fn clear(&mut self) {
        for row in self.replies.iter_mut() {
            row.fill(NULL_DMOVE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MoveKind;

    fn quiet(from: u8, to: u8) -> Move {
        Move::new(Square(from), Square(to), Piece::Knight, MoveKind::Quiet)
    }

    fn capture(from: u8, to: u8) -> Move {
        let mut m = Move::new(Square(from), Square(to), Piece::Knight, MoveKind::Capture);
        m.captured = Some(Piece::Pawn);
        m
    }

    #[test]
    fn killers_rotate_through_two_slots() {
        let mut killers = KillerTable::default();
        let (a, b, c) = (quiet(1, 18), quiet(6, 21), quiet(57, 42));
        killers.store(4, a);
        killers.store(4, b);
        assert_eq!(killers.probe(4), [a.pack(), b.pack()]);
        // A third killer evicts the oldest.
        killers.store(4, c);
        assert_eq!(killers.probe(4), [c.pack(), b.pack()]);
    }

    #[test]
    fn killers_reject_captures_and_duplicates() {
        let mut killers = KillerTable::default();
        killers.store(2, capture(1, 18));
        assert_eq!(killers.probe(2), [NULL_DMOVE, NULL_DMOVE]);
        let m = quiet(1, 18);
        killers.store(2, m);
        killers.store(2, m);
        assert_eq!(killers.probe(2), [m.pack(), NULL_DMOVE]);
    }

    #[test]
    fn history_accumulates_depth_squared() {
        let mut history = HistoryTable::default();
        let m = quiet(1, 18);
        history.store(3, m);
        history.store(5, m);
        assert_eq!(history.probe(m), 9 + 25);
        history.store(2, capture(1, 18));
        assert_eq!(history.probe(m), 34, "captures must not score history");
        history.clear();
        assert_eq!(history.probe(m), 0);
    }

    #[test]
    fn countermove_keys_on_the_previous_move() {
        let mut counters = CountermoveTable::default();
        let prev = quiet(1, 18);
        let reply = quiet(57, 40);
        counters.store(Some(prev), reply);
        assert_eq!(counters.probe(Some(prev)), reply.pack());
        assert_eq!(counters.probe(None), NULL_DMOVE);
        let other = quiet(6, 21);
        assert_eq!(counters.probe(Some(other)), NULL_DMOVE);
    }
}
