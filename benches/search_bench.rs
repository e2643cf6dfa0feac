use std::sync::atomic::AtomicBool;

use criterion::{criterion_group, criterion_main, Criterion};

use meridian::board::Board;
use meridian::eval;
use meridian::perft::perft;
use meridian::search::{iterate, SearchContext, SearchLimits};

fn perft_startpos(c: &mut Criterion) {
    c.bench_function("perft 4 startpos", |b| {
        let mut board = Board::new();
        b.iter(|| perft(&mut board, 4));
    });
}

fn eval_kiwipete(c: &mut Criterion) {
    let board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("bad fen");
    c.bench_function("eval kiwipete", |b| b.iter(|| eval::eval(&board)));
}

fn make_unmake_cycle(c: &mut Criterion) {
    c.bench_function("make/unmake 20 root moves", |b| {
        let mut board = Board::new();
        let moves = board.legal_moves();
        b.iter(|| {
            for &m in &moves {
                board.make(m);
                board.unmake(m);
            }
        });
    });
}

fn search_depth_five(c: &mut Criterion) {
    c.bench_function("search depth 5 startpos", |b| {
        b.iter(|| {
            let mut board = Board::new();
            let mut ctx = SearchContext::new(16);
            let stop = AtomicBool::new(false);
            let limits = SearchLimits {
                max_depth: Some(5),
                ..Default::default()
            };
            iterate(&mut board, &mut ctx, &stop, &limits, |_| {})
        });
    });
}

criterion_group!(
    benches,
    perft_startpos,
    eval_kiwipete,
    make_unmake_cycle,
    search_depth_five
);
criterion_main!(benches);
