//! The engine's option registry: a flat list of tagged Spin/Text options.
//! Printing and setting dispatch on the tag; spin values clamp to their
//! declared range with a log line.

use log::warn;

use crate::search::constants::TBWIN_MIN;
use crate::search::tablebase::Tablebase;
use crate::search::SearchContext;

#[derive(Clone, Copy, Debug)]
pub enum OptionKind {
    Spin { min: i64, max: i64, default: i64 },
    Text { default: &'static str },
}

#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
}

const fn spin(name: &'static str, min: i64, max: i64, default: i64) -> OptionSpec {
    OptionSpec {
        name,
        kind: OptionKind::Spin { min, max, default },
    }
}

const fn text(name: &'static str, default: &'static str) -> OptionSpec {
    OptionSpec {
        name,
        kind: OptionKind::Text { default },
    }
}

/// Every option the engine advertises, in `uci` listing order.
pub const REGISTRY: &[OptionSpec] = &[
    spin("Hash", 1, 1024, crate::search::DEFAULT_TT_MB as i64),
    text("SyzygyPath", "<empty>"),
    spin("Contempt", 0, 1000, 10),
    spin("efp_margin_1", 0, TBWIN_MIN as i64 - 1, 200),
    spin("efp_margin_2", 0, TBWIN_MIN as i64 - 1, 700),
    spin("rfp_margin_1", 0, TBWIN_MIN as i64 - 1, 200),
    spin("rfp_margin_2", 0, TBWIN_MIN as i64 - 1, 400),
    spin("rfp_margin_3", 0, TBWIN_MIN as i64 - 1, 800),
    spin("reductions_quiet_scale", -1000, 1000, 400),
    spin("reductions_capture_scale", -1000, 1000, 250),
    spin("probcut_margin", 0, 1000, 300),
    spin("probcut_min_depth", 0, 12, 6),
    spin("probcut_depth_reduction", 0, 12, 3),
    spin("null_move_depth_reduction", 0, 12, 2),
    spin("history_max_depth", 0, 12, 3),
    spin("history_prune_threshold", 0, 1000, 15),
    spin("see_prune_threshold", 0, 1000, 50),
];

/// Emit the `option name ...` block of the `uci` handshake.
pub fn print_registry() {
    for spec in REGISTRY {
        match spec.kind {
            OptionKind::Spin { min, max, default } => println!(
                "option name {} type spin default {default} min {min} max {max}",
                spec.name
            ),
            OptionKind::Text { default } => {
                println!("option name {} type string default {default}", spec.name);
            }
        }
    }
}

/// Result of applying an option that the driver itself must act on.
pub enum OptionEffect {
    None,
    ResizeHash(usize),
}

/// Apply `setoption name <name> value <value>` to the search context.
/// Unknown names and malformed values are logged and dropped; spins clamp.
pub fn apply(
    name: &str,
    value: Option<&str>,
    ctx: &mut SearchContext,
) -> OptionEffect {
    let Some(spec) = REGISTRY
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
    else {
        warn!("ignoring unknown option '{name}'");
        return OptionEffect::None;
    };

    match spec.kind {
        OptionKind::Text { .. } => {
            let value = value.unwrap_or_default();
            if spec.name == "SyzygyPath" {
                ctx.tablebase = Tablebase::load(value);
            }
            OptionEffect::None
        }
        OptionKind::Spin { min, max, .. } => {
            let Some(parsed) = value.and_then(|v| v.parse::<i64>().ok()) else {
                warn!("option '{name}' needs an integer value");
                return OptionEffect::None;
            };
            let clamped = parsed.clamp(min, max);
            if clamped != parsed {
                warn!("option '{name}' value {parsed} clamped to {clamped}");
            }
            apply_spin(spec.name, clamped, ctx)
        }
    }
}

fn apply_spin(name: &str, value: i64, ctx: &mut SearchContext) -> OptionEffect {
    let params = &mut ctx.params;
    match name {
        "Hash" => return OptionEffect::ResizeHash(value as usize),
        "Contempt" => params.contempt = value as i16,
        "efp_margin_1" => params.extended_futility_margins[1] = value as i16,
        "efp_margin_2" => params.extended_futility_margins[2] = value as i16,
        "rfp_margin_1" => params.reverse_futility_margins[1] = value as i16,
        "rfp_margin_2" => params.reverse_futility_margins[2] = value as i16,
        "rfp_margin_3" => params.reverse_futility_margins[3] = value as i16,
        "reductions_quiet_scale" => {
            params.reductions_quiet_scale = value as i16;
            ctx.rebuild_reductions();
        }
        "reductions_capture_scale" => {
            params.reductions_capture_scale = value as i16;
            ctx.rebuild_reductions();
        }
        "probcut_margin" => params.probcut_margin = value as i16,
        "probcut_min_depth" => params.probcut_min_depth = value as u8,
        "probcut_depth_reduction" => params.probcut_depth_reduction = value as u8,
        "null_move_depth_reduction" => params.null_move_depth_reduction = value as u8,
        "history_max_depth" => params.history_max_depth = value as u8,
        "history_prune_threshold" => params.history_prune_threshold = value as i32,
        "see_prune_threshold" => params.see_prune_threshold = value as i32,
        _ => {}
    }
    OptionEffect::None
}
