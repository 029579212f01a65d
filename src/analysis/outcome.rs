//! Win/loss classification of trials with expected casualty counts.
//!
//! Each trial is one of three outcomes:
//! - clear win: the floored offense score alone beats the defense
//! - win with attrition: offense plus the attackers left after the roll beats
//!   the defense; each point of the gap (plus one) costs a troop
//! - guaranteed loss: even throwing every remaining attacker in falls short;
//!   the attacker is expected to lose half of what is left
//!
//! Inputs are trusted. Negative troop counts or non-finite scores are not
//! rejected; they flow through the formulas and show up as negative or NaN
//! casualties. Validating the payload is the caller's job.

use serde::{Deserialize, Serialize};

use crate::roll::{RollInputs, TrialSummary};

/// Series a trial's casualty count lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Win,
    Loss,
}

/// How a single trial resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    ClearWin,
    WinWithAttrition,
    GuaranteedLoss,
}

impl OutcomeKind {
    pub fn bucket(self) -> Bucket {
        match self {
            OutcomeKind::ClearWin | OutcomeKind::WinWithAttrition => Bucket::Win,
            OutcomeKind::GuaranteedLoss => Bucket::Loss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::ClearWin => "Clear win",
            OutcomeKind::WinWithAttrition => "Win with attrition",
            OutcomeKind::GuaranteedLoss => "Guaranteed loss",
        }
    }
}

/// Outcome of one trial before it is placed into a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialOutcome {
    pub kind: OutcomeKind,
    pub casualties: f64,
}

/// A trial after it has been appended to its bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedTrial {
    pub kind: OutcomeKind,
    pub bucket: Bucket,
    pub casualties: f64,
    /// Index of this trial's value inside its bucket's series.
    pub position_in_bucket: usize,
}

/// Where a selected raw trial ended up after bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSelection {
    pub bucket: Bucket,
    pub position: usize,
}

/// Casualty series split by bucket, in trial order within each bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeSeries {
    pub wins: Vec<f64>,
    pub losses: Vec<f64>,
    pub selection: Option<BucketSelection>,
}

impl OutcomeSeries {
    pub fn series(&self, bucket: Bucket) -> &[f64] {
        match bucket {
            Bucket::Win => &self.wins,
            Bucket::Loss => &self.losses,
        }
    }

    pub fn total(&self) -> usize {
        self.wins.len() + self.losses.len()
    }

    /// Append a casualty count and return its position in the bucket.
    fn push(&mut self, bucket: Bucket, casualties: f64) -> usize {
        let series = match bucket {
            Bucket::Win => &mut self.wins,
            Bucket::Loss => &mut self.losses,
        };
        series.push(casualties);
        series.len() - 1
    }
}

/// Decide a single trial and its casualty count.
pub fn classify_trial(inputs: &RollInputs, trial: &TrialSummary) -> TrialOutcome {
    let offense = &trial.summarized_offense;
    let offensive_score = offense.offensive_score();
    let defensive_score =
        trial.summarized_defense.scaled_score() + inputs.defending_troops as f64;

    let immediate_losses = offense.immediate_losses as f64;
    let available = inputs.available_after(offense.immediate_losses);

    if offensive_score > defensive_score {
        TrialOutcome {
            kind: OutcomeKind::ClearWin,
            casualties: immediate_losses,
        }
    } else if offensive_score + available as f64 > defensive_score {
        let losses_to_win = (defensive_score - offensive_score) + 1.0;
        TrialOutcome {
            kind: OutcomeKind::WinWithAttrition,
            casualties: immediate_losses + losses_to_win,
        }
    } else {
        // Half of the remaining force, rounded down. There is no further
        // clamp against the troops actually committed.
        TrialOutcome {
            kind: OutcomeKind::GuaranteedLoss,
            casualties: immediate_losses + (available / 2) as f64,
        }
    }
}

/// Classify every trial into the win/loss series.
///
/// When `selected_trial_index` names a trial, the result records which bucket
/// it went to and its position there. Indices past the end match nothing.
pub fn classify(
    inputs: &RollInputs,
    trials: &[TrialSummary],
    selected_trial_index: Option<usize>,
) -> OutcomeSeries {
    let mut series = OutcomeSeries::default();

    for (i, trial) in trials.iter().enumerate() {
        let outcome = classify_trial(inputs, trial);
        let bucket = outcome.kind.bucket();
        let position = series.push(bucket, outcome.casualties);

        if Some(i) == selected_trial_index {
            series.selection = Some(BucketSelection { bucket, position });
        }
    }

    tracing::trace!(
        trials = trials.len(),
        wins = series.wins.len(),
        losses = series.losses.len(),
        "classified trials"
    );

    series
}

/// Classify every trial, keeping the per-trial detail in trial order.
pub fn classify_all(inputs: &RollInputs, trials: &[TrialSummary]) -> Vec<ClassifiedTrial> {
    let mut wins = 0usize;
    let mut losses = 0usize;

    trials
        .iter()
        .map(|trial| {
            let outcome = classify_trial(inputs, trial);
            let bucket = outcome.kind.bucket();
            let counter = match bucket {
                Bucket::Win => &mut wins,
                Bucket::Loss => &mut losses,
            };
            let position_in_bucket = *counter;
            *counter += 1;

            ClassifiedTrial {
                kind: outcome.kind,
                bucket,
                casualties: outcome.casualties,
                position_in_bucket,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> RollInputs {
        RollInputs::new(10, 5)
    }

    #[test]
    fn test_tie_resolves_as_win_with_attrition() {
        // defense 3*1+5 = 8, offense 8: not a clear win, 8 + 8 available > 8
        let trial = TrialSummary::from_parts(8.0, 2, 3.0, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::WinWithAttrition);
        assert_eq!(outcome.casualties, 3.0);

        let series = classify(&inputs(), &[trial], None);
        assert_eq!(series.wins, vec![3.0]);
        assert!(series.losses.is_empty());
    }

    #[test]
    fn test_guaranteed_loss_costs_half_remaining() {
        // defense 5*2+5 = 15, offense 2, available 6: 2 + 6 = 8 <= 15
        let trial = TrialSummary::from_parts(2.0, 4, 5.0, 2);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::GuaranteedLoss);
        assert_eq!(outcome.casualties, 7.0);

        let series = classify(&inputs(), &[trial], None);
        assert!(series.wins.is_empty());
        assert_eq!(series.losses, vec![7.0]);
    }

    #[test]
    fn test_clear_win_costs_only_immediate_losses() {
        let trial = TrialSummary::from_parts(20.9, 3, 4.0, 2);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::ClearWin);
        assert_eq!(outcome.casualties, 3.0);
    }

    #[test]
    fn test_offense_is_floored_before_comparing() {
        // 13.9 floors to 13, defense 13: not a clear win
        let trial = TrialSummary::from_parts(13.9, 0, 8.0, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::WinWithAttrition);
        assert_eq!(outcome.casualties, 1.0);
    }

    #[test]
    fn test_zero_multiplier_does_not_zero_defense() {
        // defense 10*max(1,0)+5 = 15
        let trial = TrialSummary::from_parts(16.0, 0, 10.0, 0);
        assert_eq!(classify_trial(&inputs(), &trial).kind, OutcomeKind::ClearWin);

        let trial = TrialSummary::from_parts(15.0, 0, 10.0, 0);
        assert_eq!(
            classify_trial(&inputs(), &trial).kind,
            OutcomeKind::WinWithAttrition
        );
    }

    #[test]
    fn test_no_troops_left_adds_no_extra_casualties() {
        let trial = TrialSummary::from_parts(1.0, 12, 9.0, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::GuaranteedLoss);
        assert_eq!(outcome.casualties, 12.0);
    }

    #[test]
    fn test_odd_remaining_force_rounds_down() {
        // available 7 -> 3 extra
        let trial = TrialSummary::from_parts(0.0, 3, 20.0, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::GuaranteedLoss);
        assert_eq!(outcome.casualties, 6.0);
    }

    #[test]
    fn test_fractional_defense_gap_carries_into_casualties() {
        // defense 2.5*1+5 = 7.5, offense 7: gap 0.5 + 1
        let trial = TrialSummary::from_parts(7.0, 1, 2.5, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::WinWithAttrition);
        assert_eq!(outcome.casualties, 2.5);
    }

    #[test]
    fn test_nan_score_propagates() {
        // NaN comparisons are false, so the trial falls through to a loss
        let trial = TrialSummary::from_parts(f64::NAN, 1, 3.0, 1);
        let outcome = classify_trial(&inputs(), &trial);
        assert_eq!(outcome.kind, OutcomeKind::GuaranteedLoss);

        let trial = TrialSummary::from_parts(20.0, 1, f64::NAN, 1);
        let outcome = classify_trial(&inputs(), &trial);
        assert_eq!(outcome.kind, OutcomeKind::GuaranteedLoss);
        assert_eq!(outcome.casualties, 1.0 + 4.0);
    }

    #[test]
    fn test_negative_immediate_losses_pass_through() {
        let trial = TrialSummary::from_parts(30.0, -2, 1.0, 1);
        let outcome = classify_trial(&inputs(), &trial);

        assert_eq!(outcome.kind, OutcomeKind::ClearWin);
        assert_eq!(outcome.casualties, -2.0);
    }

    #[test]
    fn test_selection_tracks_position_in_bucket() {
        let trials = vec![
            TrialSummary::from_parts(2.0, 4, 5.0, 2),  // loss #0
            TrialSummary::from_parts(20.0, 1, 1.0, 1), // win #0
            TrialSummary::from_parts(1.0, 0, 9.0, 1),  // loss #1
            TrialSummary::from_parts(8.0, 2, 3.0, 1),  // win #1
        ];

        let series = classify(&inputs(), &trials, Some(2));
        assert_eq!(
            series.selection,
            Some(BucketSelection {
                bucket: Bucket::Loss,
                position: 1
            })
        );

        let series = classify(&inputs(), &trials, Some(3));
        assert_eq!(
            series.selection,
            Some(BucketSelection {
                bucket: Bucket::Win,
                position: 1
            })
        );
        assert_eq!(series.series(Bucket::Win)[1], 3.0);
    }

    #[test]
    fn test_selecting_first_trial_is_recorded() {
        let trials = vec![TrialSummary::from_parts(20.0, 1, 1.0, 1)];
        let series = classify(&inputs(), &trials, Some(0));

        assert_eq!(
            series.selection,
            Some(BucketSelection {
                bucket: Bucket::Win,
                position: 0
            })
        );
    }

    #[test]
    fn test_out_of_range_selection_matches_nothing() {
        let trials = vec![TrialSummary::from_parts(20.0, 1, 1.0, 1)];
        let series = classify(&inputs(), &trials, Some(5));

        assert_eq!(series.selection, None);
        assert_eq!(series.total(), 1);
    }

    #[test]
    fn test_empty_trials() {
        let series = classify(&inputs(), &[], Some(0));
        assert_eq!(series, OutcomeSeries::default());
        assert!(classify_all(&inputs(), &[]).is_empty());
    }

    #[test]
    fn test_classify_all_agrees_with_classify() {
        let trials = vec![
            TrialSummary::from_parts(2.0, 4, 5.0, 2),
            TrialSummary::from_parts(20.0, 1, 1.0, 1),
            TrialSummary::from_parts(8.0, 2, 3.0, 1),
            TrialSummary::from_parts(1.0, 0, 9.0, 1),
        ];
        let detailed = classify_all(&inputs(), &trials);

        for (i, trial) in detailed.iter().enumerate() {
            let series = classify(&inputs(), &trials, Some(i));
            let selection = series.selection.unwrap();
            assert_eq!(selection.bucket, trial.bucket);
            assert_eq!(selection.position, trial.position_in_bucket);
            assert_eq!(series.series(trial.bucket)[selection.position], trial.casualties);
        }

        assert_eq!(detailed[2].kind, OutcomeKind::WinWithAttrition);
        assert_eq!(detailed[1].kind.label(), "Clear win");
    }
}
