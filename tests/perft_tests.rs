//! Deep perft references; the shallow set lives with the board unit tests.

use meridian::board::Board;
use meridian::perft::perft;

#[test]
fn startpos_depth_five() {
    let mut board = Board::new();
    assert_eq!(perft(&mut board, 5), 4_865_609);
}

#[test]
fn kiwipete_depth_four() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("bad fen");
    assert_eq!(perft(&mut board, 4), 4_085_603);
}

#[test]
fn symmetric_middlegame_depth_four() {
    // CPW position 6.
    let mut board =
        Board::from_fen("r4rk1/1pp1qppp/p1np1n2/2b1p1b1/2B1P1B1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10")
            .expect("bad fen");
    assert_eq!(perft(&mut board, 4), 3_894_594);
}
