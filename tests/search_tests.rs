//! End-to-end search behaviour: mate scores, draw handling, stop-flag
//! responsiveness and time budgeting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use meridian::board::Board;
use meridian::eval;
use meridian::search::constants::MATING_SCORE;
use meridian::search::time::TimeBudget;
use meridian::search::{iterate, SearchContext, SearchLimits};

fn search_to_depth(fen: &str, depth: u32) -> (i16, Vec<String>) {
    let mut board = Board::from_fen(fen).expect("bad fen");
    let mut ctx = SearchContext::new(8);
    let stop = AtomicBool::new(false);
    let limits = SearchLimits {
        max_depth: Some(depth),
        ..Default::default()
    };
    let outcome = iterate(&mut board, &mut ctx, &stop, &limits, |_| {});
    let pv = outcome.pv.iter().map(|m| m.to_uci()).collect();
    (outcome.score, pv)
}

#[test]
fn finds_mate_in_one() {
    // Back-rank mate: Ra8#.
    let (score, pv) = search_to_depth("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 4);
    assert_eq!(score, MATING_SCORE - 1);
    assert_eq!(pv.first().map(String::as_str), Some("a1a8"));
}

#[test]
fn finds_mate_in_two() {
    // The score for a mate on our third half-move is MATING_SCORE - 3.
    let (score, _) = search_to_depth(
        "r2q1b1r/1pN1n1pp/p1n3k1/4Pb2/2BP4/8/PPP3PP/R1BQ1RK1 w - - 1 0",
        6,
    );
    assert_eq!(score, MATING_SCORE - 3);
}

#[test]
fn sees_the_mate_arriving_against_us() {
    // Black's king is boxed in; after either pawn move, Rg8 mates. The
    // defender's score is the mate two plies out, negated.
    let (score, _) = search_to_depth("7k/p7/5N1K/8/8/8/8/6R1 b - - 0 1", 5);
    assert_eq!(score, -(MATING_SCORE - 2));
}

#[test]
fn bare_kings_are_drawn() {
    let board = Board::from_fen("8/5k2/8/2K5/8/8/8/8 b - - 0 1").expect("bad fen");
    assert!(board.is_draw());
    let contempt = 10;
    assert_eq!(eval::terminal(&board, contempt), eval::drawn_score(&board, contempt));
}

#[test]
fn startpos_search_returns_a_legal_move_with_level_score() {
    let mut board = Board::new();
    let mut ctx = SearchContext::new(8);
    let stop = AtomicBool::new(false);
    let limits = SearchLimits {
        max_depth: Some(5),
        ..Default::default()
    };
    let mut depths = Vec::new();
    let outcome = iterate(&mut board, &mut ctx, &stop, &limits, |report| {
        depths.push(report.depth);
    });

    let best = outcome.pv.first().expect("a best move");
    assert!(board.legal_moves().contains(best));
    assert!(outcome.score.abs() <= 50, "startpos score {}", outcome.score);
    // Depth reports arrive monotonically increasing.
    assert!(depths.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn preset_stop_flag_aborts_immediately() {
    let mut board = Board::new();
    let mut ctx = SearchContext::new(8);
    let stop = AtomicBool::new(true);
    let limits = SearchLimits {
        max_depth: Some(64),
        ..Default::default()
    };
    let start = Instant::now();
    let _ = iterate(&mut board, &mut ctx, &stop, &limits, |_| {});
    assert!(start.elapsed() < Duration::from_millis(50));
    assert!(stop.load(Ordering::Relaxed), "stop stays set until acknowledged");
}

#[test]
fn hard_cutoff_bounds_the_search() {
    let mut board = Board::new();
    let mut ctx = SearchContext::new(8);
    let stop = AtomicBool::new(false);
    let limits = SearchLimits {
        budget: Some(TimeBudget {
            soft_ms: Some(100),
            hard_ms: Some(300),
        }),
        ..Default::default()
    };
    let start = Instant::now();
    let outcome = iterate(&mut board, &mut ctx, &stop, &limits, |_| {});
    assert!(start.elapsed() < Duration::from_millis(1500));
    assert!(outcome.pv.first().is_some());
}

#[test]
fn repeated_search_with_resized_hash_still_works() {
    let mut board = Board::new();
    let mut ctx = SearchContext::new(8);
    let stop = AtomicBool::new(false);
    let limits = SearchLimits {
        max_depth: Some(4),
        ..Default::default()
    };
    let first = iterate(&mut board, &mut ctx, &stop, &limits, |_| {});
    ctx.resize_tt(64);
    let second = iterate(&mut board, &mut ctx, &stop, &limits, |_| {});
    assert_eq!(first.score, second.score);
}
