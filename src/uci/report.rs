//! Protocol emissions: `info` lines and `bestmove`.

use crate::board::Move;
use crate::search::alpha_beta::mate_distance_moves;
use crate::search::IterationReport;

/// Format one completed iteration. Mate distances are reported in moves
/// from the root, negative when we are the one being mated.
#[must_use]
pub fn info_line(report: &IterationReport) -> String {
    let score = match mate_distance_moves(report.score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", report.score),
    };
    let pv: Vec<String> = report.pv.iter().map(|m| m.to_uci()).collect();
    format!(
        "info depth {} score {} nodes {} tbhits {} nps {} pv {} time {}",
        report.depth,
        score,
        report.nodes,
        report.tbhits,
        report.nps,
        pv.join(" "),
        report.time_ms,
    )
}

#[must_use]
pub fn bestmove_line(m: Move) -> String {
    format!("bestmove {}", m.to_uci())
}
