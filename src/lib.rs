//! rollstats - classification and aggregation of combat roll simulations.
//!
//! Takes the per-trial roll summaries produced by a simulation engine and
//! turns them into plot-ready series:
//! - offense/defense roll-value distributions (`analysis::distribution`)
//! - win/loss casualty series with per-trial classification (`analysis::outcome`)
//!
//! [`Orchestrator`] keeps the last simulation so a selection change can be
//! re-derived without resupplying the trials. Rendering is left to the caller;
//! [`RenderPayload`] carries data only.

pub mod analysis;
pub mod build_info;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod report;
pub mod roll;

pub use analysis::{Bucket, BucketSelection, OutcomeKind};
pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, SelectionState, SharedOrchestrator};
pub use render::RenderPayload;
pub use report::{ReportConfig, RollReport};
pub use roll::{DefenseSummary, OffenseSummary, RollInputs, SimulationPayload, TrialSummary};
