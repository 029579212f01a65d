//! Raw offense/defense roll-value series.

use crate::roll::TrialSummary;

/// Offense and defense roll values, aligned with trial order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RollDistribution {
    pub offense_values: Vec<f64>,
    pub defense_values: Vec<f64>,
    /// Trial to highlight in both series. Passed through unchanged since the
    /// series keep trial order.
    pub selected_index: Option<usize>,
}

impl RollDistribution {
    pub fn len(&self) -> usize {
        self.offense_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offense_values.is_empty()
    }
}

/// Project each trial into its offense value (floored score) and defense value
/// (score times the effective multiplier, troops not included).
pub fn extract(trials: &[TrialSummary], selected_trial_index: Option<usize>) -> RollDistribution {
    let (offense_values, defense_values): (Vec<f64>, Vec<f64>) = trials
        .iter()
        .map(|trial| {
            (
                trial.summarized_offense.offensive_score(),
                trial.summarized_defense.scaled_score(),
            )
        })
        .unzip();

    RollDistribution {
        offense_values,
        defense_values,
        selected_index: selected_trial_index,
    }
}
