//! Endgame tablebase oracle.
//!
//! The probing interface, guards and score mapping are fixed here; the
//! actual Syzygy decompression is a pluggable backend. Without one the
//! oracle is disabled and every probe misses, which is also what a failed
//! load degrades to.

use log::warn;

use crate::board::{Board, Move};
use crate::eval;
use crate::search::constants::{Score, TBWIN};

use super::tt::Bound;

/// Win/draw/loss from the side to move's view, with distance-to-zero.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Wdl {
    Loss,
    BlessedLoss,
    Draw,
    CursedWin,
    Win,
}

/// A backend answers raw WDL questions; all scoring policy stays here.
pub trait SyzygyBackend: Send + Sync {
    fn probe_wdl(&self, board: &Board) -> Option<Wdl>;
    /// Best root move with its WDL and distance-to-zero.
    fn probe_root(&self, board: &Board) -> Option<(Move, Wdl, u32)>;
    /// Largest piece count the loaded files cover.
    fn max_men(&self) -> u32;
}

pub struct Tablebase {
    backend: Option<Box<dyn SyzygyBackend>>,
}

impl Default for Tablebase {
    fn default() -> Self {
        Tablebase::disabled()
    }
}

impl Tablebase {
    #[must_use]
    pub fn disabled() -> Self {
        Tablebase { backend: None }
    }

    #[must_use]
    pub fn with_backend(backend: Box<dyn SyzygyBackend>) -> Self {
        Tablebase {
            backend: Some(backend),
        }
    }

    /// Load tablebase files from `path`. No decompression backend is built
    /// into the engine, so this reports the failure and leaves probing
    /// disabled; the engine plays on without it.
    #[must_use]
    pub fn load(path: &str) -> Self {
        if !path.is_empty() && path != "<empty>" {
            warn!("no tablebase backend available for '{path}'; running without tablebases");
        }
        Tablebase::disabled()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// WDL probe with the standard guards: only just after a zeroing move,
    /// never with castling rights, and only within the files' piece count.
    #[must_use]
    pub fn probe_wdl(&self, board: &Board, contempt: Score) -> Option<(Score, Bound)> {
        let backend = self.backend.as_ref()?;
        if board.halfmove_clock() != 0 {
            return None;
        }
        if board.castling_rights() != 0 {
            return None;
        }
        if board.occupied().count_ones() > backend.max_men() {
            return None;
        }
        let wdl = backend.probe_wdl(board)?;
        let drawn = eval::drawn_score(board, contempt);
        Some(match wdl {
            // A true win may still hide a faster mate: lower bound only.
            Wdl::Win => (TBWIN, Bound::Lower),
            Wdl::CursedWin => (drawn + 2, Bound::Exact),
            Wdl::Draw => (drawn, Bound::Exact),
            Wdl::BlessedLoss => (drawn - 2, Bound::Exact),
            Wdl::Loss => (-TBWIN, Bound::Upper),
        })
    }

    /// Root probe: on a hit, replace the move list with the tablebase's
    /// best move, its score attached.
    #[must_use]
    pub fn probe_root(&self, board: &Board, moves: &mut Vec<Move>, contempt: Score) -> bool {
        let Some(backend) = self.backend.as_ref() else {
            return false;
        };
        if board.occupied().count_ones() > backend.max_men() {
            return false;
        }
        let Some((best, wdl, dtz)) = backend.probe_root(board) else {
            return false;
        };
        let Some(mut found) = moves.iter().copied().find(|&m| m == best) else {
            return false;
        };
        let drawn = eval::drawn_score(board, contempt);
        found.score = i32::from(match wdl {
            Wdl::Win => TBWIN - dtz as Score,
            Wdl::CursedWin => drawn + 2,
            Wdl::Draw => drawn,
            Wdl::BlessedLoss => drawn - 2,
            Wdl::Loss => -TBWIN + dtz as Score,
        });
        moves.clear();
        moves.push(found);
        true
    }
}
