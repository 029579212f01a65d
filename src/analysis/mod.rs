//! Pure transforms from trial summaries to plot-ready series.
//!
//! `distribution` and `outcome` are independent of each other; `summary`
//! works on any series either of them produces.

pub mod distribution;
pub mod outcome;
pub mod summary;

pub use distribution::{extract, RollDistribution};
pub use outcome::{
    classify, classify_all, classify_trial, Bucket, BucketSelection, ClassifiedTrial,
    OutcomeKind, OutcomeSeries, TrialOutcome,
};
pub use summary::{Histogram, HistogramBin, SeriesSummary};
