//! Data handed to the rendering layer.

use crate::analysis::{Bucket, BucketSelection, OutcomeSeries, RollDistribution};

/// Plot-ready series plus optional highlight metadata.
///
/// Carries no styling. The renderer owns colors, binning and layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderPayload {
    pub offense_values: Vec<f64>,
    pub defense_values: Vec<f64>,
    pub wins: Vec<f64>,
    pub losses: Vec<f64>,
    /// Selected trial in the offense/defense series (trial order).
    pub selected_offense_defense_index: Option<usize>,
    /// Selected trial in the win/loss series (bucket order).
    pub selected_outcome: Option<BucketSelection>,
}

impl RenderPayload {
    pub fn from_parts(distribution: RollDistribution, outcomes: OutcomeSeries) -> Self {
        Self {
            offense_values: distribution.offense_values,
            defense_values: distribution.defense_values,
            wins: outcomes.wins,
            losses: outcomes.losses,
            selected_offense_defense_index: distribution.selected_index,
            selected_outcome: outcomes.selection,
        }
    }

    pub fn selected_bucket(&self) -> Option<Bucket> {
        self.selected_outcome.map(|s| s.bucket)
    }

    pub fn selected_position_in_bucket(&self) -> Option<usize> {
        self.selected_outcome.map(|s| s.position)
    }

    pub fn has_selection(&self) -> bool {
        self.selected_offense_defense_index.is_some() || self.selected_outcome.is_some()
    }

    pub fn trial_count(&self) -> usize {
        self.offense_values.len()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// Highlight fields are emitted only when present.
impl serde::Serialize for RenderPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("RenderPayload", 7)?;
        state.serialize_field("offenseValues", &self.offense_values)?;
        state.serialize_field("defenseValues", &self.defense_values)?;
        state.serialize_field("wins", &self.wins)?;
        state.serialize_field("losses", &self.losses)?;
        match self.selected_offense_defense_index {
            Some(idx) => state.serialize_field("selectedOffenseDefenseIndex", &idx)?,
            None => state.skip_field("selectedOffenseDefenseIndex")?,
        }
        match self.selected_outcome {
            Some(selection) => {
                state.serialize_field("selectedBucket", &selection.bucket)?;
                state.serialize_field("selectedPositionInBucket", &selection.position)?;
            }
            None => {
                state.skip_field("selectedBucket")?;
                state.skip_field("selectedPositionInBucket")?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_without_selection_omits_highlight() {
        let payload = RenderPayload {
            offense_values: vec![8.0],
            defense_values: vec![3.0],
            wins: vec![3.0],
            losses: vec![],
            ..Default::default()
        };
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["offenseValues"][0], 8.0);
        assert_eq!(value["wins"][0], 3.0);
        assert!(value["losses"].as_array().unwrap().is_empty());
        assert!(value.get("selectedOffenseDefenseIndex").is_none());
        assert!(value.get("selectedBucket").is_none());
        assert!(value.get("selectedPositionInBucket").is_none());
    }

    #[test]
    fn test_json_with_selection() {
        let payload = RenderPayload {
            offense_values: vec![2.0, 8.0],
            defense_values: vec![10.0, 3.0],
            wins: vec![3.0],
            losses: vec![7.0],
            selected_offense_defense_index: Some(0),
            selected_outcome: Some(BucketSelection {
                bucket: Bucket::Loss,
                position: 0,
            }),
        };
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["selectedOffenseDefenseIndex"], 0);
        assert_eq!(value["selectedBucket"], "loss");
        assert_eq!(value["selectedPositionInBucket"], 0);
        assert_eq!(payload.selected_bucket(), Some(Bucket::Loss));
        assert_eq!(payload.selected_position_in_bucket(), Some(0));
        assert!(payload.has_selection());
    }
}
