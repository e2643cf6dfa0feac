//! Principal-variation search with null-window scouting and quiescence.
//!
//! `pv_search` handles the exact-window spine of the tree and threads the
//! principal line; `scout_search` proves bounds with a null window and
//! carries the pruning catalogue; `quiesce` resolves captures at the
//! leaves. Scores are always from the side to move's point of view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::board::{Board, Move, Piece, MAX_PLY, NULL_DMOVE};
use crate::eval;

use super::constants::{
    is_mating, ply_to_mate_score, Score, MAX_DEPTH, MAX_SCORE, MIN_SCORE, TBWIN_MIN,
};
use super::ordering::{self, OrderingInputs};
use super::params::{EFP_MAX_DEPTH, RFP_MAX_DEPTH};
use super::tt::Bound;
use super::SearchContext;

/// Expected node character for the scout search; alternates down the tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    Cut,
    All,
}

impl NodeType {
    fn child(self) -> NodeType {
        match self {
            NodeType::Cut => NodeType::All,
            NodeType::All => NodeType::Cut,
        }
    }
}

/// Principal line, deepest move first (the root move is `last()`).
pub type PrincipalLine = Vec<Move>;

/// One search run: borrows the position, the persistent search state and
/// the driver's stop flag for the duration of a `go`.
pub struct Search<'a> {
    pub board: &'a mut Board,
    pub ctx: &'a mut SearchContext,
    stop: &'a AtomicBool,
    start: Instant,
    /// Elapsed milliseconds after which the search unwinds, once
    /// `allow_cutoff` is set by the deepening driver.
    pub hard_cutoff_ms: u64,
    pub allow_cutoff: bool,
    stopped: bool,
}

impl<'a> Search<'a> {
    pub fn new(board: &'a mut Board, ctx: &'a mut SearchContext, stop: &'a AtomicBool) -> Self {
        Search {
            board,
            ctx,
            stop,
            start: Instant::now(),
            hard_cutoff_ms: u64::MAX,
            allow_cutoff: false,
            stopped: false,
        }
    }

    #[must_use]
    pub fn millis(&self) -> u64 {
        1 + self.start.elapsed().as_millis() as u64
    }

    /// The one-shot stop: either the driver's atomic or our own time
    /// sentinel. Polled cheaply after every child.
    #[inline]
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stopped || self.stop.load(Ordering::Relaxed)
    }

    fn poll_clock(&mut self) {
        if self.allow_cutoff
            && self.ctx.stats.nodes % (1 << 10) == 0
            && self.millis() > self.hard_cutoff_ms
        {
            self.stopped = true;
        }
    }

    // ------------------------------------------------------------------
    // Null-window scout
    // ------------------------------------------------------------------

    /// Search with the implicit window `[alpha, alpha + 1]`. Returns
    /// `MAX_SCORE` as a sentinel when unwinding on stop.
    pub fn scout_search(
        &mut self,
        depth: i32,
        alpha: Score,
        allow_null: bool,
        mut node: NodeType,
    ) -> Score {
        let beta = alpha + 1;
        let in_check = self.board.is_check();
        let depth = if in_check { depth + 1 } else { depth };

        let hash = self.board.hash();
        self.ctx.tt.prefetch(hash);

        let mut legal_moves = self.board.legal_moves();
        if legal_moves.is_empty() {
            return eval::terminal(self.board, self.ctx.params.contempt);
        }

        if self.board.is_draw() {
            return eval::drawn_score(self.board, self.ctx.params.contempt);
        }

        // Compress the window against the absolute mate bounds here.
        let mate_bound = ply_to_mate_score(self.board.ply());
        if mate_bound <= alpha {
            return mate_bound;
        }
        if -mate_bound >= beta {
            return -mate_bound;
        }

        if self.board.ply() >= MAX_PLY {
            return eval::eval(self.board);
        }

        if depth <= 0 {
            return self.quiesce(alpha, beta);
        }

        let ply = self.board.ply();
        let mut hash_dmove = NULL_DMOVE;
        if let Some(entry) = self.ctx.tt.probe(hash) {
            if i32::from(entry.depth()) >= depth {
                let tt_score = entry.score(ply);
                match entry.bound() {
                    Bound::Lower if tt_score >= beta => return tt_score,
                    Bound::Upper if tt_score <= alpha => return tt_score,
                    Bound::Exact => return tt_score,
                    _ => {}
                }
            }
            hash_dmove = entry.best_move();
        }

        self.poll_clock();
        if self.should_stop() {
            return MAX_SCORE;
        }

        // Tablebase probes can bound the score from either side.
        let mut score_ub = MAX_SCORE;
        let mut best_score = MIN_SCORE;
        if let Some((tb_score, bound)) =
            self.ctx.tablebase.probe_wdl(self.board, self.ctx.params.contempt)
        {
            self.ctx.stats.tbhits += 1;
            match bound {
                Bound::Upper => {
                    if tb_score <= alpha {
                        self.tt_store_tb(hash, tb_score, bound, ply);
                        return tb_score;
                    }
                    score_ub = tb_score;
                }
                Bound::Lower => {
                    if tb_score >= beta {
                        self.tt_store_tb(hash, tb_score, bound, ply);
                        return tb_score;
                    }
                    best_score = tb_score;
                }
                Bound::Exact => {
                    self.tt_store_tb(hash, tb_score, bound, ply);
                    return tb_score;
                }
            }
        }

        // Periodic accumulator refresh; belt and braces against drift.
        if self.ctx.stats.nodes % (1 << 14) == 0 {
            self.board.refresh_accumulator();
        }

        let node_eval = eval::eval(self.board);

        // Reverse futility pruning: almost certainly failing high anyway.
        if !self.board.is_endgame()
            && allow_null
            && depth <= RFP_MAX_DEPTH as i32
            && !in_check
        {
            let margin = self.ctx.params.reverse_futility_margins[depth as usize];
            if node_eval - margin >= beta {
                return node_eval - margin;
            }
        }

        // Null-move pruning: passing should be the worst option, so a fail
        // high after a null move is close to conclusive.
        let null_reduction = i32::from(self.ctx.params.null_move_depth_reduction);
        if !self.board.is_endgame() && allow_null && depth > null_reduction && !in_check {
            self.board.make_null();
            let score = -self.scout_search(
                depth - 1 - null_reduction,
                -alpha - 1,
                false,
                NodeType::Cut,
            );
            self.board.unmake_null();
            if self.should_stop() {
                return MAX_SCORE;
            }
            if score >= beta {
                return score;
            }
        }

        // Probcut: a reduced-depth search clearing beta by a margin is a
        // good enough proxy for the real cutoff, outside tablebase bands.
        if depth >= i32::from(self.ctx.params.probcut_min_depth)
            && beta < TBWIN_MIN
            && beta > -TBWIN_MIN
        {
            let threshold = beta + self.ctx.params.probcut_margin;
            let reduced = depth - i32::from(self.ctx.params.probcut_depth_reduction);
            let probcut_score = self.scout_search(reduced, threshold - 1, allow_null, node);
            if self.should_stop() {
                return MAX_SCORE;
            }
            if probcut_score >= threshold {
                return probcut_score;
            }
        }

        let previous_move = self.board.last_move();
        let mut best_move: Option<Move> = None;

        // Try the hash move before paying for move ordering; a cutoff here
        // skips the sort entirely.
        let hash_move = hash_dmove.unpack(&legal_moves);
        if let Some(hm) = hash_move {
            self.board.make(hm);
            self.ctx.stats.nodes += 1;
            best_score = -self.scout_search(depth - 1, -alpha - 1, true, node.child());
            self.board.unmake(hm);
            best_move = Some(hm);

            if self.should_stop() {
                return MAX_SCORE;
            }

            if best_score >= beta {
                self.record_cutoff(ply, depth, previous_move, hm);
                best_score = best_score.min(score_ub);
                self.ctx
                    .tt
                    .store(hash, best_score, Bound::Lower, depth as u8, hm.pack(), ply);
                return best_score;
            }
        }

        let inputs = OrderingInputs {
            hash_move: hash_dmove,
            killers: &self.ctx.killers,
            history: &self.ctx.history,
            counters: &self.ctx.counters,
            params: &self.ctx.params,
        };
        ordering::rank_and_sort(self.board, &mut legal_moves, &inputs);

        let mut counter = 0u32;
        for m in legal_moves {
            if Some(m) == hash_move {
                continue;
            }
            counter += 1;

            let gives_check = self.board.gives_check(m);

            // A cut node that survives several moves was mislabelled.
            if node == NodeType::Cut && counter >= 5 {
                node = NodeType::All;
            }
            let child = node.child();

            let mut search_depth = depth - 1;

            // No pruning for checks, evasions or promotions.
            if !gives_check && !in_check && !m.is_promotion() {
                let depth_idx = (depth as usize).min(MAX_DEPTH - 1);
                let count_idx = (counter as usize).min(crate::board::MAX_MOVES - 1);

                // Late move reductions at expected all nodes.
                if node == NodeType::All && counter >= 2 && m.is_quiet() {
                    search_depth -= i32::from(self.ctx.reductions[0][depth_idx][count_idx]);
                }
                if node == NodeType::All && counter >= 3 && m.is_capture() {
                    search_depth -= i32::from(self.ctx.reductions[1][depth_idx][count_idx]);
                }

                // A clearly losing capture is unlikely to cut.
                if node == NodeType::All && m.is_capture() && !self.board.see_ge(m, -100) {
                    search_depth -= 1;
                }

                // History pruning: late quiet moves with a cold history.
                if node == NodeType::All
                    && counter > 3
                    && m.is_quiet()
                    && search_depth < i32::from(self.ctx.params.history_max_depth)
                    && m.score < self.ctx.params.history_prune_threshold
                {
                    continue;
                }

                // Extended futility pruning at frontier depths.
                if depth <= EFP_MAX_DEPTH as i32 && counter > 1 {
                    let margin = self.ctx.params.extended_futility_margins[depth as usize];
                    let futility_threshold =
                        i32::from(alpha) - i32::from(node_eval) - i32::from(margin);
                    if m.is_capture() && !self.board.see_ge(m, futility_threshold) {
                        continue;
                    }
                    if m.is_quiet() && node_eval + margin <= alpha {
                        continue;
                    }
                }
            }

            let search_depth = search_depth.clamp(0, depth - 1);

            self.board.make(m);
            self.ctx.stats.nodes += 1;
            let mut score = -self.scout_search(search_depth, -beta, true, child);

            // A reduced search that raised alpha must be proven at full
            // depth before we trust it.
            if node == NodeType::All && score > alpha && search_depth < depth - 1 {
                score = -self.scout_search(depth - 1, -beta, true, child);
            }
            self.board.unmake(m);

            if self.should_stop() {
                return MAX_SCORE;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(m);
            }
            if best_score >= beta {
                self.record_cutoff(ply, depth, previous_move, m);
                break;
            }
        }

        best_score = best_score.min(score_ub);
        let bound = if best_score <= alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        let best_dmove = best_move.map_or(NULL_DMOVE, Move::pack);
        self.ctx
            .tt
            .store(hash, best_score, bound, depth as u8, best_dmove, ply);
        best_score
    }

    // ------------------------------------------------------------------
    // Principal variation search
    // ------------------------------------------------------------------

    /// Full-window search. Scores from the TT are only mined for the hash
    /// move here; cutting a PV node on a stored score would cost us the
    /// re-searched line.
    pub fn pv_search(
        &mut self,
        depth: i32,
        alpha_start: Score,
        beta: Score,
        line: &mut PrincipalLine,
    ) -> Score {
        let mut alpha = alpha_start;
        let in_check = self.board.is_check();
        let depth = if in_check { depth + 1 } else { depth };

        let hash = self.board.hash();
        self.ctx.tt.prefetch(hash);

        let mut legal_moves = self.board.legal_moves();
        if legal_moves.is_empty() {
            return eval::terminal(self.board, self.ctx.params.contempt);
        }

        // At the root the tablebase can simply hand us the move.
        if self.board.is_root()
            && self
                .ctx
                .tablebase
                .probe_root(self.board, &mut legal_moves, self.ctx.params.contempt)
        {
            self.ctx.stats.tbhits += 1;
            let best = legal_moves[0];
            line.push(best);
            return best.score as Score;
        }

        if !self.board.is_root() && self.board.is_draw() {
            return eval::drawn_score(self.board, self.ctx.params.contempt);
        }

        let mate_bound = ply_to_mate_score(self.board.ply());
        if mate_bound <= alpha {
            return mate_bound;
        }
        if -mate_bound >= beta {
            return -mate_bound;
        }

        if self.board.ply() >= MAX_PLY {
            return eval::eval(self.board);
        }

        if depth <= 0 {
            return self.quiesce(alpha, beta);
        }

        let ply = self.board.ply();
        let mut hash_dmove = NULL_DMOVE;
        if let Some(entry) = self.ctx.tt.probe(hash) {
            hash_dmove = entry.best_move();
        }

        self.poll_clock();
        if self.should_stop() {
            return MAX_SCORE;
        }

        let mut score_ub = MAX_SCORE;
        let mut best_score = MIN_SCORE;
        if !self.board.is_root() {
            if let Some((tb_score, bound)) =
                self.ctx.tablebase.probe_wdl(self.board, self.ctx.params.contempt)
            {
                self.ctx.stats.tbhits += 1;
                match bound {
                    Bound::Upper => {
                        if tb_score <= alpha {
                            self.tt_store_tb(hash, tb_score, bound, ply);
                            return tb_score;
                        }
                        score_ub = tb_score;
                    }
                    Bound::Lower => {
                        if tb_score >= beta {
                            self.tt_store_tb(hash, tb_score, bound, ply);
                            return tb_score;
                        }
                        best_score = tb_score;
                        alpha = alpha.max(tb_score);
                    }
                    Bound::Exact => {
                        self.tt_store_tb(hash, tb_score, bound, ply);
                        return tb_score;
                    }
                }
            }
        }

        let previous_move = self.board.last_move();
        let mut pv: PrincipalLine = Vec::new();
        let mut is_first_child = true;

        let hash_move = hash_dmove.unpack(&legal_moves);
        if let Some(hm) = hash_move {
            self.board.make(hm);
            self.ctx.stats.nodes += 1;
            let score = -self.pv_search(depth - 1, -beta, -alpha, &mut pv);
            self.board.unmake(hm);
            pv.push(hm);

            if self.should_stop() {
                return MAX_SCORE;
            }

            best_score = best_score.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.record_cutoff(ply, depth, previous_move, hm);
                *line = pv;
                best_score = best_score.min(score_ub);
                self.ctx
                    .tt
                    .store(hash, best_score, Bound::Lower, depth as u8, hm.pack(), ply);
                return best_score;
            }
            is_first_child = false;
        }

        let inputs = OrderingInputs {
            hash_move: hash_dmove,
            killers: &self.ctx.killers,
            history: &self.ctx.history,
            counters: &self.ctx.counters,
            params: &self.ctx.params,
        };
        ordering::rank_and_sort(self.board, &mut legal_moves, &inputs);

        for m in legal_moves {
            if Some(m) == hash_move {
                continue;
            }
            let mut child_line: PrincipalLine = Vec::with_capacity(16);

            self.board.make(m);
            self.ctx.stats.nodes += 1;
            let score = if is_first_child {
                -self.pv_search(depth - 1, -beta, -alpha, &mut child_line)
            } else {
                // Scout with a null window; re-search on an inside score.
                let scout = -self.scout_search(depth - 1, -alpha - 1, true, NodeType::Cut);
                if scout > alpha && scout < beta {
                    -self.pv_search(depth - 1, -beta, -alpha, &mut child_line)
                } else {
                    scout
                }
            };
            self.board.unmake(m);

            if self.should_stop() {
                return MAX_SCORE;
            }

            if score > best_score {
                best_score = score;
                pv = child_line;
                pv.push(m);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                self.record_cutoff(ply, depth, previous_move, m);
                break;
            }
            is_first_child = false;
        }

        *line = pv.clone();
        if let Some(&best) = pv.last() {
            best_score = best_score.min(score_ub);
            let bound = if best_score <= alpha_start {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.ctx
                .tt
                .store(hash, best_score, bound, depth as u8, best.pack(), ply);
        }
        best_score
    }

    // ------------------------------------------------------------------
    // Quiescence
    // ------------------------------------------------------------------

    /// Resolve captures (or evasions when in check) until the position is
    /// quiet enough for the static evaluation to stand.
    pub fn quiesce(&mut self, alpha_start: Score, beta: Score) -> Score {
        let mut alpha = alpha_start;
        let in_check = self.board.is_check();

        let mut moves = Vec::new();
        if in_check {
            moves = self.board.legal_moves();
            if moves.is_empty() {
                return eval::terminal(self.board, self.ctx.params.contempt);
            }
        }

        if self.board.is_draw() {
            return eval::drawn_score(self.board, self.ctx.params.contempt);
        }

        let stand_pat = eval::eval(self.board);
        alpha = alpha.max(stand_pat);

        // Stand-pat cutoff, never while in check.
        if !in_check && stand_pat >= beta {
            return stand_pat;
        }

        // Delta pruning: even the biggest plausible swing cannot reach
        // alpha. A pawn on the seventh widens the margin for promotion.
        let us = self.board.side_to_move();
        let seventh = crate::board::attacks::rank_bb(us.relative_rank(6));
        let mut delta: Score = 900;
        if self.board.pieces_bb(us, Piece::Pawn) & seventh != 0 {
            delta += 500;
        }
        if stand_pat + delta <= alpha {
            return stand_pat;
        }

        if !in_check {
            moves = self.board.capture_moves();
        }
        if moves.is_empty() {
            return stand_pat;
        }

        let inputs = OrderingInputs {
            hash_move: NULL_DMOVE,
            killers: &self.ctx.killers,
            history: &self.ctx.history,
            counters: &self.ctx.counters,
            params: &self.ctx.params,
        };
        ordering::rank_and_sort(self.board, &mut moves, &inputs);

        for m in moves {
            // Skip losing captures, and captures with no real chance of
            // raising alpha.
            if !in_check && m.is_capture() && !self.board.see_ge(m, 0) {
                continue;
            }
            const SEE_MARGIN: i32 = 100;
            let futility_threshold = i32::from(alpha) - i32::from(stand_pat) - SEE_MARGIN;
            if !in_check && m.is_capture() && !self.board.see_ge(m, futility_threshold) {
                continue;
            }

            self.board.make(m);
            self.ctx.stats.nodes += 1;
            let score = -self.quiesce(-beta, -alpha);
            self.board.unmake(m);

            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        alpha
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn record_cutoff(&mut self, ply: usize, depth: i32, previous: Option<Move>, m: Move) {
        self.ctx.killers.store(ply, m);
        self.ctx.history.store(depth.clamp(0, 255) as u8, m);
        self.ctx.counters.store(previous, m);
    }

    fn tt_store_tb(&mut self, hash: u64, score: Score, bound: Bound, ply: usize) {
        self.ctx
            .tt
            .store(hash, score, bound, MAX_DEPTH as u8, NULL_DMOVE, ply);
    }

    pub fn set_clock(&mut self, start: Instant, hard_cutoff_ms: u64) {
        self.start = start;
        self.hard_cutoff_ms = hard_cutoff_ms;
    }
}

/// Sanity helper for the driver: mate distances are reported from the root.
#[must_use]
pub fn mate_distance_moves(score: Score) -> Option<i32> {
    if is_mating(score) {
        Some((i32::from(super::constants::MATING_SCORE) - i32::from(score) + 1) / 2)
    } else if is_mating(-score) {
        Some(-((i32::from(super::constants::MATING_SCORE) + i32::from(score) + 1) / 2))
    } else {
        None
    }
}

