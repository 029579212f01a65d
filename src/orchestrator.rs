//! Remembers the last simulation result so a selection change can be
//! re-derived without resupplying the trials.

use std::sync::{Mutex, PoisonError};

use crate::analysis::{classify, extract};
use crate::error::{Error, Result};
use crate::render::RenderPayload;
use crate::roll::SimulationPayload;

/// Single-slot holder for the most recent payload.
///
/// Each new simulation replaces the previous one; there is no history.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Option<SimulationPayload>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload`, returning whatever was there before.
    pub fn replace(&mut self, payload: SimulationPayload) -> Option<SimulationPayload> {
        self.current.replace(payload)
    }

    pub fn current(&self) -> Option<&SimulationPayload> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

/// Run both analyses over one payload with an optional selection.
pub fn derive(payload: &SimulationPayload, selected_trial_index: Option<usize>) -> RenderPayload {
    RenderPayload::from_parts(
        extract(&payload.trials, selected_trial_index),
        classify(&payload.inputs, &payload.trials, selected_trial_index),
    )
}

/// Entry point for simulation results and selection changes.
#[derive(Debug, Default)]
pub struct Orchestrator {
    state: SelectionState,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `payload` as the current simulation and derive its series with
    /// nothing selected.
    pub fn run_simulation(&mut self, payload: SimulationPayload) -> RenderPayload {
        let render = derive(&payload, None);
        let previous = self.state.replace(payload);
        tracing::debug!(
            trials = render.trial_count(),
            replaced = previous.is_some(),
            "stored simulation result"
        );
        render
    }

    /// Re-derive the stored simulation with `selected_trial_index` highlighted.
    ///
    /// Fails with [`Error::NoActiveSimulation`] if nothing has been run yet.
    /// An index past the last trial is not an error; it highlights nothing in
    /// the outcome series.
    pub fn reselect(&self, selected_trial_index: usize) -> Result<RenderPayload> {
        let payload = self.state.current().ok_or(Error::NoActiveSimulation)?;
        tracing::debug!(
            index = selected_trial_index,
            trials = payload.len(),
            "reselecting trial"
        );
        Ok(derive(payload, Some(selected_trial_index)))
    }

    pub fn current(&self) -> Option<&SimulationPayload> {
        self.state.current()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }
}

/// [`Orchestrator`] behind a mutex, for callers on more than one thread.
///
/// Storing a payload is a single locked swap, so concurrent runs resolve to
/// last-write-wins and a reselect never observes a half-written slot.
#[derive(Debug, Default)]
pub struct SharedOrchestrator {
    inner: Mutex<Orchestrator>,
}

impl SharedOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_simulation(&self, payload: SimulationPayload) -> RenderPayload {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .run_simulation(payload)
    }

    pub fn reselect(&self, selected_trial_index: usize) -> Result<RenderPayload> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reselect(selected_trial_index)
    }
}
