/// Corrective hints for the downstream policy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSuggestion {
    pub should_random_move: bool,
    pub random_move_strength: f32,
    pub should_add_noise: bool,
    pub noise_level: f32,
    pub should_change_strategy: bool,
    pub strategy_change_urgency: f32,
}

impl ActionSuggestion {
    pub const NOISE_LEVEL: f32 = 0.3;
    /// Effectiveness below which a strategy change is suggested.
    pub const STRATEGY_CHANGE_BELOW: f32 = 0.3;

    pub fn derive(is_stuck: bool, is_repeating: bool, effectiveness: f32) -> Self {
        let mut suggestion = Self::default();
        if is_stuck {
            suggestion.should_random_move = true;
            suggestion.random_move_strength = 1.0;
        }
        if is_repeating {
            suggestion.should_add_noise = true;
            suggestion.noise_level = Self::NOISE_LEVEL;
        }
        if effectiveness < Self::STRATEGY_CHANGE_BELOW {
            suggestion.should_change_strategy = true;
            suggestion.strategy_change_urgency = 1.0 - effectiveness;
        }
        suggestion
    }

    /// True when any corrective hint is raised.
    pub fn any(&self) -> bool {
        self.should_random_move || self.should_add_noise || self.should_change_strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_agent_gets_no_hints() {
        let suggestion = ActionSuggestion::derive(false, false, 0.6);
        assert_eq!(suggestion, ActionSuggestion::default());
        assert!(!suggestion.any());
    }

    #[test]
    fn every_hint_fires_together() {
        let suggestion = ActionSuggestion::derive(true, true, 0.1);
        assert!(suggestion.should_random_move);
        assert_eq!(suggestion.random_move_strength, 1.0);
        assert_eq!(suggestion.noise_level, 0.3);
        assert!((suggestion.strategy_change_urgency - 0.9).abs() < 1e-6);
    }
}
