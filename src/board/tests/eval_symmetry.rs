//! Colour-symmetry properties of the feature encoder and the evaluator,
//! plus the contempt parity rule.

use crate::board::{flipped, Board, Color};
use crate::eval;
use crate::nnue::features;

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "4k3/8/8/8/8/8/PPP5/4K3 w - - 0 1",
];

#[test]
fn encoder_swaps_viewpoints_under_flip() {
    for fen in POSITIONS {
        let board = Board::from_fen(fen).expect("bad fen");
        let mirror = flipped(&board);
        let original = features::encode(&board);
        let reflected = features::encode(&mirror);
        assert_eq!(
            original[Color::White.index()],
            reflected[Color::Black.index()],
            "white/black viewpoint mismatch for {fen}"
        );
        assert_eq!(
            original[Color::Black.index()],
            reflected[Color::White.index()]
        );
    }
}

#[test]
fn forward_and_reverse_diffs_cancel() {
    let board = Board::from_fen(POSITIONS[1]).expect("bad fen");
    for m in board.legal_moves() {
        let forward = features::diff(m, board.side_to_move(), true);
        let reverse = features::diff(m, board.side_to_move(), false);
        for viewer in [Color::White, Color::Black] {
            let mut sum = forward[viewer.index()].to_dense();
            sum.add_assign(&reverse[viewer.index()].to_dense());
            assert!(
                sum.iter().all(|&v| v == 0),
                "diffs of {m} do not cancel for {viewer:?}"
            );
        }
    }
}

#[test]
fn eval_is_colour_symmetric() {
    for fen in POSITIONS {
        let board = Board::from_fen(fen).expect("bad fen");
        let mirror = flipped(&board);
        assert_eq!(
            eval::eval(&board),
            eval::eval(&mirror),
            "eval asymmetry for {fen}"
        );
    }
}

#[test]
fn startpos_evaluates_level() {
    let board = Board::new();
    assert_eq!(eval::eval(&board), 0);
}

#[test]
fn material_network_counts_material() {
    // White is a clean rook up.
    let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("bad fen");
    let score = eval::eval(&board);
    assert!(
        (450..=550).contains(&score),
        "rook-up eval out of band: {score}"
    );
    // Same position from Black's seat is the same amount worse.
    let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").expect("bad fen");
    assert_eq!(eval::eval(&board), -score);
}

#[test]
fn contempt_alternates_with_null_moves() {
    let mut board = Board::new();
    board.set_root();
    let contempt = 10;
    let at_root = eval::drawn_score(&board, contempt);
    assert_eq!(at_root, -contempt);

    board.make_null();
    assert_eq!(eval::drawn_score(&board, contempt), contempt);
    board.make_null();
    assert_eq!(eval::drawn_score(&board, contempt), -contempt);
    board.unmake_null();
    assert_eq!(eval::drawn_score(&board, contempt), contempt);
    board.unmake_null();
    assert_eq!(eval::drawn_score(&board, contempt), at_root);
}
