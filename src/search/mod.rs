//! The search subsystem: transposition table, ordering heuristics, the
//! alpha-beta core and the iterative deepening driver.

pub mod alpha_beta;
pub mod constants;
pub mod iterative;
pub mod ordering;
pub mod params;
pub mod tablebase;
pub mod tables;
pub mod time;
pub mod tt;

pub use alpha_beta::{NodeType, Search};
pub use iterative::{iterate, IterationReport, SearchLimits, SearchOutcome};
pub use params::SearchParams;

use params::ReductionsTable;
use tablebase::Tablebase;
use tables::{CountermoveTable, HistoryTable, KillerTable};
use tt::TranspositionTable;

/// Default transposition table size in MiB.
pub const DEFAULT_TT_MB: usize = 16;

#[derive(Default, Clone, Copy, Debug)]
pub struct SearchStats {
    pub nodes: u64,
    pub tbhits: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }
}

/// State that outlives a single `go`: the transposition table, the
/// ordering heuristics, tunables and the tablebase oracle. Owned by the
/// UCI driver and lent to the worker for the duration of a search.
pub struct SearchContext {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
    pub counters: CountermoveTable,
    pub params: SearchParams,
    pub reductions: ReductionsTable,
    pub tablebase: Tablebase,
    pub stats: SearchStats,
}

impl SearchContext {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        let params = SearchParams::default();
        let reductions = params.build_reductions();
        SearchContext {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            counters: CountermoveTable::default(),
            params,
            reductions,
            tablebase: Tablebase::disabled(),
            stats: SearchStats::default(),
        }
    }

    /// Re-derive the reductions table after a parameter change.
    pub fn rebuild_reductions(&mut self) {
        self.reductions = self.params.build_reductions();
    }

    /// Swap in a new transposition table; only legal between searches.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }
}

impl Default for SearchContext {
    fn default() -> Self {
        SearchContext::new(DEFAULT_TT_MB)
    }
}
