//! Move ordering: assign every move a score band, then sort descending.
//!
//! Bands, highest first: hash move, winning captures (SEE tiebreak),
//! killers, neutral captures, promotions, quiets by history (plus a check
//! bonus and a small counter-move bump, the total clamped below the killer
//! band), losing captures last.

use crate::board::{Board, DenseMove, Move, SEE_VALUES};

use super::params::SearchParams;
use super::tables::{CountermoveTable, HistoryTable, KillerTable};

pub const HASH_MOVE_SCORE: i32 = 1_000_000;
pub const GOOD_CAPTURE_SCORE: i32 = 400_000;
pub const KILLER_SCORE: i32 = 200_000;
pub const NEUTRAL_CAPTURE_SCORE: i32 = 150_000;
pub const PROMOTION_SCORE: i32 = 100_000;
pub const QUIET_HISTORY_CAP: i32 = 100_000;
pub const QUIET_CHECK_BONUS: i32 = 100_000;
pub const COUNTERMOVE_BONUS: i32 = 1_000;
pub const LOSING_CAPTURE_SCORE: i32 = -400_000;

pub struct OrderingInputs<'a> {
    pub hash_move: DenseMove,
    pub killers: &'a KillerTable,
    pub history: &'a HistoryTable,
    pub counters: &'a CountermoveTable,
    pub params: &'a SearchParams,
}

/// Score and sort `moves` in place. The hash move is ranked first so a
/// caller that already searched it can simply skip it while iterating.
pub fn rank_and_sort(board: &Board, moves: &mut [Move], inputs: &OrderingInputs<'_>) {
    let killer_row = inputs.killers.probe(board.ply());
    let counter = inputs.counters.probe(board.last_move());
    let see_threshold = inputs.params.see_prune_threshold;

    for m in moves.iter_mut() {
        let dmove = m.pack();
        m.score = if dmove == inputs.hash_move {
            HASH_MOVE_SCORE
        } else if killer_row.contains(&dmove) && m.is_quiet() {
            KILLER_SCORE
        } else if m.is_capture() {
            if board.see_ge(*m, see_threshold) {
                GOOD_CAPTURE_SCORE + board.see_capture(*m)
            } else if board.see_ge(*m, -see_threshold) {
                NEUTRAL_CAPTURE_SCORE
            } else {
                LOSING_CAPTURE_SCORE
            }
        } else if let Some(promoted) = m.promotion() {
            PROMOTION_SCORE + SEE_VALUES[promoted.index()]
        } else {
            let mut score = inputs.history.probe(*m).min(QUIET_HISTORY_CAP as u32) as i32;
            if board.gives_check(*m) {
                score += QUIET_CHECK_BONUS;
            }
            if dmove == counter && !counter.is_null() {
                score += COUNTERMOVE_BONUS;
            }
            // A saturated history plus both bonuses must still rank below
            // a killer.
            score.min(KILLER_SCORE - 1)
        };
    }

    moves.sort_unstable_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, NULL_DMOVE};
    use crate::search::tables::{CountermoveTable, HistoryTable, KillerTable};
    use crate::search::SearchParams;

    fn rank(board: &Board, hash_move: DenseMove, killers: &KillerTable) -> Vec<Move> {
        let history = HistoryTable::default();
        let counters = CountermoveTable::default();
        let params = SearchParams::default();
        let inputs = OrderingInputs {
            hash_move,
            killers,
            history: &history,
            counters: &counters,
            params: &params,
        };
        let mut moves = board.legal_moves();
        rank_and_sort(board, &mut moves, &inputs);
        moves
    }

    #[test]
    fn hash_move_outranks_everything() {
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("bad fen");
        let killers = KillerTable::default();
        // Pick an arbitrary quiet move as the hash move.
        let quiet = board
            .legal_moves()
            .into_iter()
            .find(|m| m.is_quiet())
            .expect("quiet move exists");
        let ranked = rank(&board, quiet.pack(), &killers);
        assert_eq!(ranked[0], quiet);
        assert_eq!(ranked[0].score, HASH_MOVE_SCORE);
    }

    #[test]
    fn winning_captures_outrank_killers_and_quiets() {
        // White can win a pawn on e5 with the rook.
        let board =
            Board::from_fen("1k1r4/1pp4p/p7/4p3/8/P5P1/1PP4P/2K1R3 w - - 0 1").expect("bad fen");
        let mut killers = KillerTable::default();
        let quiet = board
            .legal_moves()
            .into_iter()
            .find(|m| m.is_quiet() && !board.gives_check(*m))
            .expect("quiet move exists");
        killers.store(0, quiet);
        let ranked = rank(&board, NULL_DMOVE, &killers);

        let winning_capture = ranked
            .iter()
            .find(|m| m.is_capture())
            .expect("capture exists");
        assert!(winning_capture.score >= GOOD_CAPTURE_SCORE);
        let killer_rank = ranked.iter().position(|m| *m == quiet).expect("killer");
        let capture_rank = ranked
            .iter()
            .position(|m| m.is_capture())
            .expect("capture");
        assert!(capture_rank < killer_rank);
        assert_eq!(ranked[killer_rank].score, KILLER_SCORE);
    }

    #[test]
    fn killers_outrank_saturated_quiet_scores() {
        // A quiet move that gives check, carries a capped history score and
        // matches the counter-move slot collects every quiet bonus at once;
        // a killer at the same ply must still rank above it.
        let mut board = Board::from_fen("3k4/8/8/8/8/8/8/R3K3 b - - 0 1").expect("bad fen");
        let prev = board.parse_uci_move("d8e8").expect("legal king step");
        board.make(prev);

        let checking_quiet = board
            .legal_moves()
            .into_iter()
            .find(|m| m.is_quiet() && board.gives_check(*m))
            .expect("quiet check exists");
        let killer_quiet = board
            .legal_moves()
            .into_iter()
            .find(|m| m.is_quiet() && !board.gives_check(*m) && *m != checking_quiet)
            .expect("quiet move exists");

        let mut killers = KillerTable::default();
        killers.store(board.ply(), killer_quiet);
        let mut history = HistoryTable::default();
        // Three depth-255 cutoffs push the counter well past the cap.
        for _ in 0..3 {
            history.store(255, checking_quiet);
        }
        let mut counters = CountermoveTable::default();
        counters.store(Some(prev), checking_quiet);
        let params = SearchParams::default();
        let inputs = OrderingInputs {
            hash_move: NULL_DMOVE,
            killers: &killers,
            history: &history,
            counters: &counters,
            params: &params,
        };

        let mut moves = board.legal_moves();
        rank_and_sort(&board, &mut moves, &inputs);

        let killer_rank = moves
            .iter()
            .position(|m| *m == killer_quiet)
            .expect("killer present");
        let quiet_rank = moves
            .iter()
            .position(|m| *m == checking_quiet)
            .expect("quiet present");
        assert!(killer_rank < quiet_rank, "killer must outrank the quiet");
        assert_eq!(moves[killer_rank].score, KILLER_SCORE);
        assert!(moves[quiet_rank].score < KILLER_SCORE);
    }

    #[test]
    fn losing_captures_sink_to_the_bottom() {
        // Knight takes a defended pawn and is lost for it.
        let board =
            Board::from_fen("1k1r3q/1ppn3p/p4b2/4p3/8/P2N2P1/1PP1R1BP/2K1Q3 w - - 0 1")
                .expect("bad fen");
        let killers = KillerTable::default();
        let ranked = rank(&board, NULL_DMOVE, &killers);
        let last = ranked.last().expect("non-empty");
        assert!(last.is_capture());
        assert_eq!(last.score, LOSING_CAPTURE_SCORE);
    }
}
