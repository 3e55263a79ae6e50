//! The integration driver: owns the time loop, the state hand-off to the
//! stepper, and the emission of every record to the sink.

use crate::trajectory::{ProgressObserver, TrajectorySink};
use crate::traits::Stepper;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// The fixed time grid of a run. Immutable once integration starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeParameters {
    pub t_start: f64,
    pub t_end: f64,
    /// Step size; strictly positive, so the loop always terminates.
    pub h: f64,
}

/// What a completed run looked like.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationSummary {
    /// Number of stepper invocations.
    pub steps: usize,
    /// The time of the trailing sample, the first grid point at or past
    /// `t_end`.
    pub t_final: f64,
    pub final_state: Vec<f64>,
}

/// Integrates from `t_start` until the horizon is crossed.
///
/// Each pass emits the committed `(t, state)` record, advances one step, and
/// moves time forward by `h`; one trailing record is emitted after the loop
/// condition fails, so a run over `[0, 5]` with `h = 0.01` produces
/// `floor(5 / 0.01) + 2` records. The stepper writes into a scratch buffer
/// and the state is only swapped in once the step succeeded, so a failing
/// step aborts the run with the sink ending at the last good record.
pub fn integrate(
    stepper: &mut impl Stepper,
    time: TimeParameters,
    initial_state: &[f64],
    sink: &mut impl TrajectorySink,
    mut progress: Option<&mut dyn ProgressObserver>,
) -> Result<IntegrationSummary> {
    if !(time.h > 0.0) {
        bail!("Step size h must be positive (got {}).", time.h);
    }
    if !(time.t_start < time.t_end) {
        bail!(
            "t_start must precede t_end (got [{}, {}]).",
            time.t_start,
            time.t_end
        );
    }
    if initial_state.is_empty() {
        bail!("Initial state must have positive dimension.");
    }
    if initial_state.len() != stepper.dimension() {
        bail!(
            "Initial state dimension mismatch. Expected {}, got {}.",
            stepper.dimension(),
            initial_state.len()
        );
    }

    let mut t = time.t_start;
    let mut state = initial_state.to_vec();
    let mut next = vec![0.0; state.len()];
    let mut iteration = 0usize;

    loop {
        if let Some(observer) = progress.as_deref_mut() {
            observer.on_step(iteration, t);
        }
        sink.record(t, &state)
            .context("Failed to write trajectory record.")?;

        stepper
            .advance(t, time.h, &state, &mut next)
            .with_context(|| format!("Step {iteration} at t = {t} failed."))?;
        std::mem::swap(&mut state, &mut next);

        t += time.h;
        iteration += 1;
        if !(t < time.t_end) {
            break;
        }
    }

    // One trailing sample after the loop condition fails.
    if let Some(observer) = progress.as_deref_mut() {
        observer.on_step(iteration, t);
    }
    sink.record(t, &state)
        .context("Failed to write trajectory record.")?;

    Ok(IntegrationSummary {
        steps: iteration,
        t_final: t,
        final_state: state,
    })
}
