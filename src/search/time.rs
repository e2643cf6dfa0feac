//! Time budgeting for a `go` command.

/// Soft and hard cutoffs in milliseconds; `None` means unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBudget {
    pub soft_ms: Option<u64>,
    pub hard_ms: Option<u64>,
}

impl TimeBudget {
    pub const INFINITE: TimeBudget = TimeBudget {
        soft_ms: None,
        hard_ms: None,
    };
}

/// Clock state for the side to move, straight from the `go` arguments.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockState {
    pub remaining_ms: Option<u64>,
    pub increment_ms: u64,
    pub moves_to_go: u32,
    pub movetime_ms: Option<u64>,
    pub infinite: bool,
}

/// Budget the move. Sudden death spends a twentieth of the clock; with a
/// known number of moves to the time control we spread more generously. The
/// hard cutoff is what actually aborts the search mid-iteration.
#[must_use]
pub fn budget(clock: ClockState) -> TimeBudget {
    if clock.infinite {
        return TimeBudget::INFINITE;
    }

    let Some(remaining) = clock.remaining_ms else {
        // Analysis with only a movetime bound (or nothing at all).
        return TimeBudget {
            soft_ms: None,
            hard_ms: clock.movetime_ms,
        };
    };

    let (soft, hard) = if clock.moves_to_go == 0 {
        let soft = remaining / 20 + clock.increment_ms;
        (soft, soft * 3)
    } else {
        let soft = (remaining as f64 / (0.5 * f64::from(clock.moves_to_go) + 1.0)) as u64
            + clock.increment_ms;
        (soft, (soft as f64 * 2.5) as u64)
    };

    let mut hard = hard.min(remaining * 8 / 10);
    if let Some(movetime) = clock.movetime_ms {
        hard = hard.min(movetime);
    }

    TimeBudget {
        soft_ms: Some(soft),
        hard_ms: Some(hard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sudden_death_spends_a_twentieth() {
        let b = budget(ClockState {
            remaining_ms: Some(60_000),
            increment_ms: 1000,
            ..Default::default()
        });
        assert_eq!(b.soft_ms, Some(4000));
        assert_eq!(b.hard_ms, Some(12_000));
    }

    #[test]
    fn moves_to_go_spreads_the_clock() {
        let b = budget(ClockState {
            remaining_ms: Some(60_000),
            moves_to_go: 38,
            ..Default::default()
        });
        assert_eq!(b.soft_ms, Some(3000));
        assert_eq!(b.hard_ms, Some(7500));
    }

    #[test]
    fn hard_cutoff_never_exceeds_most_of_the_clock() {
        let b = budget(ClockState {
            remaining_ms: Some(1000),
            increment_ms: 5000,
            ..Default::default()
        });
        assert!(b.hard_ms.unwrap() <= 800);
    }

    #[test]
    fn movetime_caps_the_hard_cutoff() {
        let b = budget(ClockState {
            remaining_ms: Some(60_000),
            movetime_ms: Some(500),
            ..Default::default()
        });
        assert_eq!(b.hard_ms, Some(500));
    }

    #[test]
    fn infinite_analysis_has_no_cutoffs() {
        let b = budget(ClockState {
            remaining_ms: Some(60_000),
            infinite: true,
            ..Default::default()
        });
        assert_eq!(b, TimeBudget::INFINITE);
    }
}
