//! Evaluation entry points over the neural network.

use crate::board::Board;
use crate::search::constants::{ply_to_mate_score, Score, MIN_MATE_SCORE};

/// Scale from raw network output to centipawns.
const EVAL_SCALE: f32 = 400.0;

/// Static evaluation from the side to move's point of view, clamped inside
/// the mate band.
#[must_use]
pub fn eval(board: &Board) -> Score {
    let nn = board
        .accumulator()
        .weights()
        .forward(board.accumulator(), board.side_to_move());
    let centipawns = (nn * EVAL_SCALE) as i32;
    centipawns.clamp(i32::from(1 - MIN_MATE_SCORE), i32::from(MIN_MATE_SCORE - 1)) as Score
}

/// Score of a position with no legal moves: checkmate against the side to
/// move, or a contempt-adjusted stalemate.
#[must_use]
pub fn terminal(board: &Board, contempt: Score) -> Score {
    if board.is_check() {
        -ply_to_mate_score(board.ply())
    } else {
        drawn_score(board, contempt)
    }
}

/// The score we assign a draw, biased so the root player would rather play
/// on: negative when the draw is "our" choice (even ply from root).
#[must_use]
pub fn drawn_score(board: &Board, contempt: Score) -> Score {
    let root_player = board.ply() % 2 == 0;
    if root_player {
        -contempt
    } else {
        contempt
    }
}
