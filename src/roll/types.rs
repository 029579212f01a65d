use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Troop counts for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollInputs {
    pub attacking_troops: i64,
    pub defending_troops: i64,
}

impl RollInputs {
    pub fn new(attacking_troops: i64, defending_troops: i64) -> Self {
        Self {
            attacking_troops,
            defending_troops,
        }
    }

    /// Attackers still standing after a roll that cost `immediate_losses`.
    /// Never below zero; extreme inputs saturate instead of overflowing.
    pub fn available_after(&self, immediate_losses: i64) -> i64 {
        self.attacking_troops.saturating_sub(immediate_losses).max(0)
    }
}

/// Offense side of a trial. Serialized as `[roll_score, immediate_losses]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, i64)", into = "(f64, i64)")]
pub struct OffenseSummary {
    pub roll_score: f64,
    pub immediate_losses: i64,
}

impl OffenseSummary {
    pub fn new(roll_score: f64, immediate_losses: i64) -> Self {
        Self {
            roll_score,
            immediate_losses,
        }
    }

    /// Offense roll value as plotted and compared: the floored score.
    pub fn offensive_score(&self) -> f64 {
        self.roll_score.floor()
    }
}

impl From<(f64, i64)> for OffenseSummary {
    fn from((roll_score, immediate_losses): (f64, i64)) -> Self {
        Self::new(roll_score, immediate_losses)
    }
}

impl From<OffenseSummary> for (f64, i64) {
    fn from(summary: OffenseSummary) -> Self {
        (summary.roll_score, summary.immediate_losses)
    }
}

/// Defense side of a trial. Serialized as `[roll_score, multiplier]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, i64)", into = "(f64, i64)")]
pub struct DefenseSummary {
    pub roll_score: f64,
    pub multiplier: i64,
}

impl DefenseSummary {
    pub fn new(roll_score: f64, multiplier: i64) -> Self {
        Self {
            roll_score,
            multiplier,
        }
    }

    /// Multiplier used for scaling. A zero (or negative) multiplier counts as 1.
    pub fn effective_multiplier(&self) -> i64 {
        self.multiplier.max(1)
    }

    /// Defense roll value scaled by the effective multiplier, without troops.
    pub fn scaled_score(&self) -> f64 {
        self.roll_score * self.effective_multiplier() as f64
    }
}

impl From<(f64, i64)> for DefenseSummary {
    fn from((roll_score, multiplier): (f64, i64)) -> Self {
        Self::new(roll_score, multiplier)
    }
}

impl From<DefenseSummary> for (f64, i64) {
    fn from(summary: DefenseSummary) -> Self {
        (summary.roll_score, summary.multiplier)
    }
}

/// One simulated trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialSummary {
    pub summarized_offense: OffenseSummary,
    pub summarized_defense: DefenseSummary,
}

impl TrialSummary {
    pub fn new(offense: OffenseSummary, defense: DefenseSummary) -> Self {
        Self {
            summarized_offense: offense,
            summarized_defense: defense,
        }
    }

    /// Shorthand for `[offense_score, immediate_losses]` / `[defense_score, multiplier]`.
    pub fn from_parts(
        offense_score: f64,
        immediate_losses: i64,
        defense_score: f64,
        multiplier: i64,
    ) -> Self {
        Self::new(
            OffenseSummary::new(offense_score, immediate_losses),
            DefenseSummary::new(defense_score, multiplier),
        )
    }
}

/// A complete simulation result: inputs plus the ordered trials.
///
/// Trial order is significant; a trial's index is its identity for selection.
/// On the wire this is the two-element message `[inputs, trials]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    from = "(RollInputs, Vec<TrialSummary>)",
    into = "(RollInputs, Vec<TrialSummary>)"
)]
pub struct SimulationPayload {
    pub inputs: RollInputs,
    pub trials: Vec<TrialSummary>,
}

impl SimulationPayload {
    pub fn new(inputs: RollInputs, trials: Vec<TrialSummary>) -> Self {
        Self { inputs, trials }
    }

    /// Decode a `[inputs, trials]` message.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a `[inputs, trials]` message.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }
}

impl From<(RollInputs, Vec<TrialSummary>)> for SimulationPayload {
    fn from((inputs, trials): (RollInputs, Vec<TrialSummary>)) -> Self {
        Self::new(inputs, trials)
    }
}

impl From<SimulationPayload> for (RollInputs, Vec<TrialSummary>) {
    fn from(payload: SimulationPayload) -> Self {
        (payload.inputs, payload.trials)
    }
}
