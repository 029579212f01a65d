//! Text and JSON reports over a classified simulation.

mod config;

pub use config::ReportConfig;

use serde::Serialize;

use crate::analysis::{
    classify_all, Bucket, ClassifiedTrial, Histogram, OutcomeKind, SeriesSummary,
};
use crate::orchestrator::derive;
use crate::render::RenderPayload;
use crate::roll::SimulationPayload;

/// The highlighted trial, resolved against both series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectedTrial {
    pub index: usize,
    pub offense_value: f64,
    pub defense_value: f64,
    pub kind: OutcomeKind,
    pub bucket: Bucket,
    pub casualties: f64,
    pub position_in_bucket: usize,
}

/// Aggregated figures for one simulation.
#[derive(Debug, Clone, Serialize)]
pub struct RollReport {
    pub attacking_troops: i64,
    pub defending_troops: i64,
    pub trial_count: usize,

    pub clear_wins: usize,
    pub attrition_wins: usize,
    pub guaranteed_losses: usize,
    pub win_rate: f64,

    pub offense: Option<SeriesSummary>,
    pub defense: Option<SeriesSummary>,
    pub win_casualties: Option<SeriesSummary>,
    pub loss_casualties: Option<SeriesSummary>,
    /// Mean casualties over every trial with a finite count.
    pub expected_casualties: Option<f64>,

    pub offense_histogram: Histogram,
    pub defense_histogram: Histogram,
    pub win_histogram: Histogram,
    pub loss_histogram: Histogram,

    pub selected: Option<SelectedTrial>,

    #[serde(skip)]
    trials: Vec<ClassifiedTrial>,
    #[serde(skip)]
    config: ReportConfig,
}

impl RollReport {
    /// Build a report, optionally resolving `selected_trial_index`.
    pub fn from_payload(
        payload: &SimulationPayload,
        selected_trial_index: Option<usize>,
        config: &ReportConfig,
    ) -> Self {
        Self::from_render(payload, &derive(payload, selected_trial_index), config)
    }

    /// Build a report from series already derived for `payload`. The selection
    /// is taken from `render`.
    pub fn from_render(
        payload: &SimulationPayload,
        render: &RenderPayload,
        config: &ReportConfig,
    ) -> Self {
        let trials = classify_all(&payload.inputs, &payload.trials);

        let count_kind = |kind: OutcomeKind| trials.iter().filter(|t| t.kind == kind).count();
        let clear_wins = count_kind(OutcomeKind::ClearWin);
        let attrition_wins = count_kind(OutcomeKind::WinWithAttrition);
        let guaranteed_losses = count_kind(OutcomeKind::GuaranteedLoss);

        let trial_count = trials.len();
        let win_rate = if trial_count == 0 {
            0.0
        } else {
            (clear_wins + attrition_wins) as f64 / trial_count as f64
        };

        let all_casualties: Vec<f64> = trials.iter().map(|t| t.casualties).collect();
        let expected_casualties = SeriesSummary::from_values(&all_casualties).map(|s| s.mean);

        let selected = resolve_selection(render, &trials);

        Self {
            attacking_troops: payload.inputs.attacking_troops,
            defending_troops: payload.inputs.defending_troops,
            trial_count,
            clear_wins,
            attrition_wins,
            guaranteed_losses,
            win_rate,
            offense: SeriesSummary::from_values(&render.offense_values),
            defense: SeriesSummary::from_values(&render.defense_values),
            win_casualties: SeriesSummary::from_values(&render.wins),
            loss_casualties: SeriesSummary::from_values(&render.losses),
            expected_casualties,
            offense_histogram: Histogram::from_values(&render.offense_values, config.bin_width),
            defense_histogram: Histogram::from_values(&render.defense_values, config.bin_width),
            win_histogram: Histogram::from_values(&render.wins, config.bin_width),
            loss_histogram: Histogram::from_values(&render.losses, config.bin_width),
            selected,
            trials,
            config: config.clone(),
        }
    }

    /// One line: trials, win rate, expected casualties.
    pub fn summary_line(&self) -> String {
        format!(
            "{} trials | {} vs {} troops | win {:.1}% | expected casualties {}",
            self.trial_count,
            self.attacking_troops,
            self.defending_troops,
            self.win_rate * 100.0,
            format_optional(self.expected_casualties),
        )
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        if self.config.verbosity == 0 {
            return format!("{}\n", self.summary_line());
        }

        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                       ROLL REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Trials: {}   Attackers: {}   Defenders: {}\n\n",
            self.trial_count, self.attacking_troops, self.defending_troops
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Clear wins:          {}\n", self.clear_wins));
        report.push_str(&format!("  Wins with attrition: {}\n", self.attrition_wins));
        report.push_str(&format!("  Guaranteed losses:   {}\n", self.guaranteed_losses));
        report.push_str(&format!(
            "  Win rate:            {:.1}%\n",
            self.win_rate * 100.0
        ));
        report.push_str(&format!(
            "  Expected casualties: {}\n\n",
            format_optional(self.expected_casualties)
        ));

        report.push_str("── SERIES ───────────────────────────────────────────────────────\n");
        report.push_str("  Series        Count      Min   Median     Mean   StdDev      Max\n");
        for (name, summary) in [
            ("Offense", &self.offense),
            ("Defense", &self.defense),
            ("Win losses", &self.win_casualties),
            ("Loss losses", &self.loss_casualties),
        ] {
            report.push_str(&format_summary_row(name, summary.as_ref()));
        }
        report.push('\n');

        if let Some(sel) = &self.selected {
            report.push_str("── SELECTED TRIAL ───────────────────────────────────────────────\n");
            report.push_str(&format!(
                "  Trial #{}: offense {} vs defense {}\n",
                sel.index, sel.offense_value, sel.defense_value
            ));
            report.push_str(&format!(
                "  {} with {} casualties (entry {} of the {} series)\n\n",
                sel.kind.label(),
                sel.casualties,
                sel.position_in_bucket,
                bucket_name(sel.bucket)
            ));
        }

        if self.config.show_histograms {
            let selected = self.selected.as_ref();
            self.push_histogram(
                &mut report,
                "OFFENSE ROLLS",
                &self.offense_histogram,
                selected.map(|s| s.offense_value),
            );
            self.push_histogram(
                &mut report,
                "DEFENSE ROLLS",
                &self.defense_histogram,
                selected.map(|s| s.defense_value),
            );
            self.push_histogram(
                &mut report,
                "CASUALTIES (WIN)",
                &self.win_histogram,
                selected
                    .filter(|s| s.bucket == Bucket::Win)
                    .map(|s| s.casualties),
            );
            self.push_histogram(
                &mut report,
                "CASUALTIES (LOSS)",
                &self.loss_histogram,
                selected
                    .filter(|s| s.bucket == Bucket::Loss)
                    .map(|s| s.casualties),
            );
        }

        if self.config.verbosity >= 2 {
            report.push_str("── TRIALS ───────────────────────────────────────────────────────\n");
            report.push_str("  Trial  Outcome               Casualties  Bucket  Pos\n");
            for (i, trial) in self.trials.iter().enumerate() {
                report.push_str(&format!(
                    "  {:5}  {:<20}  {:>10}  {:<6}  {:>3}\n",
                    i,
                    trial.kind.label(),
                    trial.casualties,
                    bucket_name(trial.bucket),
                    trial.position_in_bucket
                ));
            }
            report.push('\n');
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");

        report
    }

    fn push_histogram(
        &self,
        report: &mut String,
        title: &str,
        histogram: &Histogram,
        highlight: Option<f64>,
    ) {
        report.push_str(&format!("── {} ", title));
        report.push_str(&"─".repeat(60usize.saturating_sub(title.len())));
        report.push('\n');

        if histogram.bins.is_empty() {
            report.push_str("  (no values)\n\n");
            return;
        }

        let highlighted_bin = highlight.and_then(|v| histogram.bin_of(v));
        let max_count = histogram.max_count().max(1);
        for (idx, bin) in histogram.bins.iter().enumerate() {
            let bar_len = bin.count * self.config.max_bar_width / max_count;
            let marker = if Some(idx) == highlighted_bin { " ◄" } else { "" };
            report.push_str(&format!(
                "  {:>7.1} {:>5.1}% {}{}\n",
                bin.start,
                histogram.percent(idx),
                "█".repeat(bar_len),
                marker
            ));
        }
        if histogram.is_sparse() {
            report.push_str("  (empty bins omitted)\n");
        }
        if histogram.skipped > 0 {
            report.push_str(&format!(
                "  ({} values below zero, not finite or out of range)\n",
                histogram.skipped
            ));
        }
        report.push('\n');
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn resolve_selection(render: &RenderPayload, trials: &[ClassifiedTrial]) -> Option<SelectedTrial> {
    let index = render.selected_offense_defense_index?;
    let trial = trials.get(index)?;
    Some(SelectedTrial {
        index,
        offense_value: *render.offense_values.get(index)?,
        defense_value: *render.defense_values.get(index)?,
        kind: trial.kind,
        bucket: trial.bucket,
        casualties: trial.casualties,
        position_in_bucket: trial.position_in_bucket,
    })
}

fn bucket_name(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Win => "win",
        Bucket::Loss => "loss",
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn format_summary_row(name: &str, summary: Option<&SeriesSummary>) -> String {
    match summary {
        Some(s) => format!(
            "  {:<12} {:>6} {:>8.1} {:>8.1} {:>8.2} {:>8.2} {:>8.1}\n",
            name, s.count, s.min, s.median, s.mean, s.std_dev, s.max
        ),
        None => format!("  {:<12} {:>6}        -\n", name, 0),
    }
}
