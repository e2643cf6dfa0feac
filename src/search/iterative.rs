//! Iterative deepening with aspiration windows and time control.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use crate::board::{Board, Move};

use super::alpha_beta::{PrincipalLine, Search};
use super::constants::{is_mating, mate_score_to_ply, Score, MATING_SCORE, MAX_DEPTH};
use super::time::TimeBudget;
use super::SearchContext;

/// Aspiration window offsets around the previous iteration's score; past
/// the ladder the failing bound drops straight to the mate score.
const ASPIRATION_WINDOWS: [Score; 4] = [30, 80, 200, 500];

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchLimits {
    pub max_depth: Option<u32>,
    pub budget: Option<TimeBudget>,
    /// `go mate N`: stop once a mate within N moves is proven.
    pub mate_in_moves: Option<u32>,
}

/// Everything one completed iteration reports upward.
#[derive(Clone, Debug)]
pub struct IterationReport {
    pub depth: u32,
    pub score: Score,
    pub nodes: u64,
    pub tbhits: u64,
    pub nps: u64,
    pub time_ms: u64,
    /// Principal variation in play order.
    pub pv: Vec<Move>,
}

/// Outcome of a full `go`: final score and principal variation (in play
/// order; the best move is `pv.first()`).
pub struct SearchOutcome {
    pub score: Score,
    pub pv: Vec<Move>,
}

/// Run iterative deepening on `board`. `on_iteration` fires after every
/// completed depth, in time for a UCI `info` line.
pub fn iterate(
    board: &mut Board,
    ctx: &mut SearchContext,
    stop: &AtomicBool,
    limits: &SearchLimits,
    mut on_iteration: impl FnMut(&IterationReport),
) -> SearchOutcome {
    ctx.tt.mark_stale();
    ctx.history.clear();
    ctx.stats.reset();
    board.set_root();

    let start = Instant::now();
    let budget = limits.budget.unwrap_or(TimeBudget::INFINITE);
    let hard_cutoff = budget.hard_ms.unwrap_or(u64::MAX);
    let mut soft_cutoff = budget.soft_ms.unwrap_or(u64::MAX);
    let max_depth = limits
        .max_depth
        .map_or(MAX_DEPTH as u32, |d| d.min(MAX_DEPTH as u32));
    let mate_in_ply = limits.mate_in_moves.map(|n| 2 * n as usize);

    let mut search = Search::new(board, ctx, stop);
    search.set_clock(start, hard_cutoff);

    let mut score: Score = 0;
    let mut principal: PrincipalLine = Vec::new();
    let mut millis_last: u64 = 1;
    // Effective branching factor, estimated from successive iterations.
    let mut branching_factor: f64 = 2.5;
    let mut last_best: Option<Move> = None;

    for depth in 2..=max_depth {
        let mut iteration_line: PrincipalLine = Vec::new();
        let mut new_score;

        // Aspiration: open with a narrow window around the last score and
        // widen the failing side through the ladder.
        let mut alpha = score.saturating_sub(ASPIRATION_WINDOWS[0]).max(-MATING_SCORE);
        let mut beta = score.saturating_add(ASPIRATION_WINDOWS[0]).min(MATING_SCORE);
        let mut fail_lows = 0usize;
        let mut fail_highs = 0usize;
        loop {
            iteration_line.clear();
            new_score = search.pv_search(depth as i32, alpha, beta, &mut iteration_line);

            if search.should_stop() {
                break;
            }

            if new_score <= alpha {
                fail_lows += 1;
                alpha = if is_mating(-new_score) || fail_lows >= ASPIRATION_WINDOWS.len() {
                    -MATING_SCORE
                } else {
                    score
                        .saturating_sub(ASPIRATION_WINDOWS[fail_lows])
                        .max(-MATING_SCORE)
                };
            } else if new_score >= beta {
                fail_highs += 1;
                beta = if is_mating(new_score) || fail_highs >= ASPIRATION_WINDOWS.len() {
                    MATING_SCORE
                } else {
                    score
                        .saturating_add(ASPIRATION_WINDOWS[fail_highs])
                        .min(MATING_SCORE)
                };
            } else {
                break;
            }
        }

        if search.should_stop() {
            break;
        }

        // Only a completed iteration may update the answer.
        score = new_score;
        principal = iteration_line;
        // One usable line exists now; the hard cutoff may fire from here.
        search.allow_cutoff = true;

        let millis_now = 1 + start.elapsed().as_millis() as u64;
        let nodes = search.ctx.stats.nodes;
        let report = IterationReport {
            depth,
            score,
            nodes,
            tbhits: search.ctx.stats.tbhits,
            nps: 1000 * nodes / millis_now,
            time_ms: millis_now,
            pv: principal.iter().rev().copied().collect(),
        };
        on_iteration(&report);

        // Shrink the soft budget while the best move stays stable.
        if principal.last() == last_best.as_ref() {
            soft_cutoff -= soft_cutoff / 10;
        } else {
            last_best = principal.last().copied();
        }

        // Stop if the projected next iteration blows the hard cutoff.
        let millis_next = (branching_factor * millis_now as f64) as u64;
        if millis_next > hard_cutoff {
            break;
        }
        if millis_now > soft_cutoff {
            break;
        }

        if depth >= 5 {
            const WEIGHT: f64 = 0.5;
            branching_factor = (1.0 - WEIGHT) * branching_factor
                + WEIGHT * (millis_now as f64 / millis_last as f64);
        }
        millis_last = millis_now;

        // Mate found within the requested distance: done.
        if let Some(bound) = mate_in_ply {
            if is_mating(score) && mate_score_to_ply(score) <= bound {
                break;
            }
        }
    }

    SearchOutcome {
        score,
        pv: principal.iter().rev().copied().collect(),
    }
}
