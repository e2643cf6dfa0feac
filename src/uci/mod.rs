//! The UCI driver: a line loop on stdin that stays responsive while a
//! single worker thread searches.
//!
//! Exactly two atomics couple the two: `stop` (driver -> search, relaxed)
//! and `running` (search -> driver, release/acquire). The position and the
//! search context are handed to the worker for the duration of a `go` and
//! taken back when it is joined; the driver never mutates either while the
//! worker holds them.

mod command;
mod options;
mod report;

pub use command::{parse, Command, GoParams};
pub use options::{apply, print_registry, OptionEffect, OptionKind, OptionSpec, REGISTRY};

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::warn;
use parking_lot::Mutex;

use crate::board::{Board, Color};
use crate::eval;
use crate::perft::perft;
use crate::search::time::{budget, ClockState};
use crate::search::{iterate, SearchContext, SearchLimits, DEFAULT_TT_MB};

pub const ENGINE_NAME: &str = "meridian";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const ENGINE_AUTHOR: &str = "the meridian authors";

/// Worker thread stack size; the search recursion plus its move lists
/// want more room than the platform default guarantees.
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

pub struct UciDriver {
    board: Option<Board>,
    ctx: Arc<Mutex<SearchContext>>,
    stop: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Board>>,
    hash_mb: usize,
}

impl Default for UciDriver {
    fn default() -> Self {
        UciDriver::new()
    }
}

impl UciDriver {
    #[must_use]
    pub fn new() -> Self {
        UciDriver {
            board: Some(Board::new()),
            ctx: Arc::new(Mutex::new(SearchContext::default())),
            stop: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            hash_mb: DEFAULT_TT_MB,
        }
    }

    /// Serve until `quit`.
    pub fn run(&mut self, input: impl BufRead) {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if !self.dispatch(&line) {
                break;
            }
        }
        // EOF behaves like quit: stop any search and unwind cleanly.
        self.stop.store(true, Ordering::Relaxed);
        self.await_worker();
    }

    /// Handle one command; returns false on `quit`.
    pub fn dispatch(&mut self, line: &str) -> bool {
        match command::parse(line) {
            Command::Uci => {
                println!("id name {ENGINE_NAME} {ENGINE_VERSION}");
                println!("id author {ENGINE_AUTHOR}");
                options::print_registry();
                println!("uciok");
            }
            Command::IsReady => {
                self.await_worker();
                println!("readyok");
            }
            Command::UciNewGame => {
                self.await_worker();
                self.board = Some(Board::new());
            }
            Command::Position { fen, moves } => {
                self.await_worker();
                self.set_position(fen.as_deref(), &moves);
            }
            Command::Go(params) => self.go(&params),
            Command::Stop => {
                self.stop.store(true, Ordering::Relaxed);
                self.await_worker();
            }
            Command::Quit => {
                self.stop.store(true, Ordering::Relaxed);
                self.await_worker();
                return false;
            }
            Command::SetOption { name, value } => {
                self.await_worker();
                let mut ctx = self.ctx.lock();
                match options::apply(&name, value.as_deref(), &mut ctx) {
                    OptionEffect::ResizeHash(mb) => {
                        if mb != self.hash_mb {
                            self.hash_mb = mb;
                            ctx.resize_tt(mb);
                        }
                    }
                    OptionEffect::None => {}
                }
            }
            Command::Eval => {
                self.await_worker();
                if let Some(board) = &self.board {
                    println!("info string eval cp {}", eval::eval(board));
                }
            }
            Command::Print => {
                self.await_worker();
                if let Some(board) = &self.board {
                    eprintln!("{board}");
                }
            }
            Command::Perft(depth) => {
                self.await_worker();
                if let Some(board) = self.board.as_mut() {
                    let start = std::time::Instant::now();
                    let nodes = perft(board, depth);
                    println!(
                        "info string perft {depth} nodes {nodes} time {}",
                        start.elapsed().as_millis()
                    );
                }
            }
            Command::Unknown(text) => {
                if !text.is_empty() {
                    warn!("dropping unrecognised command '{text}'");
                }
            }
        }
        true
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The current position, when no worker holds it.
    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Join the worker (if any) and take the position back.
    fn await_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(board) => self.board = Some(board),
                Err(_) => {
                    warn!("search worker panicked; restoring the start position");
                    self.board = Some(Board::new());
                }
            }
        }
    }

    fn set_position(&mut self, fen: Option<&str>, moves: &[String]) {
        let mut board = match fen {
            None => Board::new(),
            Some(fen) => match Board::from_fen(fen) {
                Ok(board) => board,
                Err(e) => {
                    warn!("ignoring position command: {e}");
                    return;
                }
            },
        };
        for text in moves {
            match board.parse_uci_move(text) {
                Ok(m) => board.make(m),
                Err(e) => {
                    // Truncate at the first bad token; the prefix stands.
                    warn!("truncating move list: {e}");
                    break;
                }
            }
        }
        self.board = Some(board);
    }

    fn go(&mut self, params: &GoParams) {
        self.await_worker();
        let Some(board) = self.board.take() else {
            return;
        };

        let us = board.side_to_move();
        let clock = ClockState {
            remaining_ms: match us {
                Color::White => params.wtime,
                Color::Black => params.btime,
            },
            increment_ms: match us {
                Color::White => params.winc,
                Color::Black => params.binc,
            },
            moves_to_go: params.movestogo,
            movetime_ms: params.movetime,
            infinite: params.infinite,
        };
        let limits = SearchLimits {
            max_depth: params.depth,
            budget: Some(budget(clock)),
            mate_in_moves: params.mate,
        };

        self.stop.store(false, Ordering::Relaxed);
        let stop = Arc::clone(&self.stop);
        let running = Arc::clone(&self.running);
        let ctx = Arc::clone(&self.ctx);

        let handle = std::thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || search_worker(board, ctx, &stop, &running, limits))
            .expect("failed to spawn search worker");
        self.worker = Some(handle);
    }
}

/// Body of the worker thread: run the search, emit `info` and `bestmove`,
/// hand the position back through the join.
fn search_worker(
    mut board: Board,
    ctx: Arc<Mutex<SearchContext>>,
    stop: &AtomicBool,
    running: &AtomicBool,
    limits: SearchLimits,
) -> Board {
    running.store(true, Ordering::Release);
    {
        let mut ctx = ctx.lock();
        let outcome = iterate(&mut board, &mut ctx, stop, &limits, |report| {
            println!("{}", report::info_line(report));
        });

        // Sanity-check the stored best move against a fresh legal list
        // before emitting it.
        let legal = board.legal_moves();
        let stored = outcome.pv.first().copied();
        let best = match stored {
            Some(m) if legal.contains(&m) => Some(m),
            Some(m) => {
                warn!("best move {m} is not legal here; falling back");
                legal.first().copied()
            }
            None => legal.first().copied(),
        };
        match best {
            Some(m) => println!("{}", report::bestmove_line(m)),
            None => println!("bestmove 0000"),
        }
    }
    running.store(false, Ordering::Release);
    board
}
