use crate::config::GoalConfig;

/// Time-based progress of each tier, all in `[0, 1)`.
///
/// Counters advance with elapsed time regardless of whether the goal is
/// being achieved. A wrapping counter resets to zero and promotes a fixed
/// increment to the tier above; a wrapping strategic counter just resets.
/// Counters are not reset when goals change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressCounters {
    pub strategic: f32,
    pub tactical: f32,
    pub actionable: f32,
}

impl ProgressCounters {
    // TODO: advance on goal outcomes once the host reports completions.
    pub fn advance(&mut self, dt: f32, config: &GoalConfig) {
        self.actionable += config.actionable_progress_rate * dt;
        if self.actionable >= 1.0 {
            self.actionable = 0.0;
            self.tactical += config.promotion_increment;
        }

        self.tactical += config.tactical_progress_rate * dt;
        if self.tactical >= 1.0 {
            self.tactical = 0.0;
            self.strategic += config.promotion_increment;
        }

        self.strategic += config.strategic_progress_rate * dt;
        if self.strategic >= 1.0 {
            self.strategic = 0.0;
        }
    }

    /// `[strategic, tactical, actionable]`, the encoding order.
    pub fn to_array(&self) -> [f32; 3] {
        [self.strategic, self.tactical, self.actionable]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actionable_wrap_promotes_tactical() {
        let config = GoalConfig::default();
        let mut progress = ProgressCounters {
            actionable: 0.95,
            ..ProgressCounters::default()
        };
        progress.advance(0.5, &config);
        assert_eq!(progress.actionable, 0.0);
        assert!((progress.tactical - 0.125).abs() < 1e-6, "{progress:?}");
        assert!((progress.strategic - 0.005).abs() < 1e-6, "{progress:?}");
    }

    #[test]
    fn strategic_wraps_to_zero() {
        let config = GoalConfig {
            strategic_progress_rate: 1.0,
            ..GoalConfig::default()
        };
        let mut progress = ProgressCounters {
            strategic: 0.95,
            ..ProgressCounters::default()
        };
        progress.advance(0.1, &config);
        assert_eq!(progress.strategic, 0.0);
    }

    #[test]
    fn counters_stay_below_one() {
        let config = GoalConfig::default();
        let mut progress = ProgressCounters::default();
        for _ in 0..10_000 {
            progress.advance(0.05, &config);
            for value in progress.to_array() {
                assert!((0.0..1.0).contains(&value), "{progress:?}");
            }
        }
    }
}
