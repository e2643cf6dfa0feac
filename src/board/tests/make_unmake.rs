//! Make/unmake round-trip invariants.

use proptest::prelude::*;
use rand::prelude::*;

use crate::board::{Board, Move, Piece, Square};

fn find_move(board: &Board, from: &str, to: &str, promotion: Option<Piece>) -> Move {
    let from = Square::parse(from).expect("bad from square");
    let to = Square::parse(to).expect("bad to square");
    board
        .legal_moves()
        .into_iter()
        .find(|m| m.origin == from && m.target == to && m.promotion() == promotion)
        .expect("expected move not found")
}

/// Every legal move from `fen` must round-trip the full state, including
/// the accumulator bytes and the history stack depth.
fn assert_round_trip(fen: &str) {
    let mut board = Board::from_fen(fen).expect("bad fen");
    let reference = board.clone();
    let depth_before = board.stack_depth();
    for m in board.legal_moves() {
        board.make(m);
        board.unmake(m);
        assert_eq!(board, reference, "state drift after {m}");
        assert_eq!(board.stack_depth(), depth_before);
    }
}

#[test]
fn round_trip_from_assorted_positions() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        // Kiwipete: castles, en passant, promotions all on the table.
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ] {
        assert_round_trip(fen);
    }
}

#[test]
fn en_passant_round_trip() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .expect("bad fen");
    let reference = board.clone();
    let m = find_move(&board, "e5", "f6", None);
    assert!(m.is_en_passant());
    board.make(m);
    assert_eq!(board.piece_at(Square::parse("f5").unwrap()), None);
    board.unmake(m);
    assert_eq!(board, reference);
}

#[test]
fn promotion_round_trip() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").expect("bad fen");
    let reference = board.clone();
    let m = find_move(&board, "a7", "a8", Some(Piece::Queen));
    board.make(m);
    assert_eq!(
        board.piece_type_at(Square::parse("a8").unwrap()),
        Some(Piece::Queen)
    );
    board.unmake(m);
    assert_eq!(board, reference);
}

#[test]
fn castling_round_trip_moves_the_rook() {
    let mut board =
        Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("bad fen");
    let reference = board.clone();
    let m = find_move(&board, "e1", "g1", None);
    board.make(m);
    assert_eq!(
        board.piece_type_at(Square::parse("f1").unwrap()),
        Some(Piece::Rook)
    );
    assert_eq!(board.piece_type_at(Square::parse("h1").unwrap()), None);
    board.unmake(m);
    assert_eq!(board, reference);
}

#[test]
fn null_move_round_trip() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .expect("bad fen");
    let hash = board.hash();
    let ep = board.en_passant_file();
    let side = board.side_to_move();

    board.make_null();
    assert_eq!(board.en_passant_file(), None);
    assert_ne!(board.hash(), hash);
    assert_ne!(board.side_to_move(), side);

    board.unmake_null();
    assert_eq!(board.hash(), hash);
    assert_eq!(board.en_passant_file(), ep);
    assert_eq!(board.side_to_move(), side);
}

#[test]
fn accumulator_matches_scratch_rebuild_along_a_game() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..80 {
        let moves = board.legal_moves();
        if moves.is_empty() || board.is_draw() {
            break;
        }
        let m = *moves.choose(&mut rng).expect("non-empty");
        board.make(m);

        let incremental = board.accumulator().clone();
        board.refresh_accumulator();
        assert_eq!(incremental, *board.accumulator(), "accumulator drift after {m}");
    }
}

#[test]
fn mailbox_stays_consistent_along_a_game() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    for _ in 0..60 {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        board.make(*moves.choose(&mut rng).expect("non-empty"));
        board.assert_consistent();
    }
}

proptest! {
    /// Random move chains unwind to the exact starting state.
    #[test]
    fn random_chains_round_trip(seed in any::<u64>(), length in 1usize..40) {
        let mut board = Board::new();
        let reference = board.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut played = Vec::new();
        for _ in 0..length {
            let moves = board.legal_moves();
            if moves.is_empty() {
                break;
            }
            let m = *moves.choose(&mut rng).expect("non-empty");
            board.make(m);
            played.push(m);
        }
        for m in played.into_iter().rev() {
            board.unmake(m);
        }
        prop_assert_eq!(board, reference);
    }
}
