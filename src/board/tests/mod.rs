mod eval_symmetry;
mod make_unmake;
mod perft;
mod see;
mod zobrist;
