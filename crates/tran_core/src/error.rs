use thiserror::Error;

/// Failure modes of a single time step.
///
/// All three are fatal for the run: a step whose nonlinear or linear solve
/// failed leaves every later state meaningless, so the driver never skips a
/// step and continues. Output already flushed to the sink stays valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    /// Newton derivative too flat to make reliable progress.
    #[error(
        "Newton derivative magnitude {magnitude:e} fell below {threshold:e} on iteration {iteration}"
    )]
    DegenerateDerivative {
        iteration: usize,
        magnitude: f64,
        threshold: f64,
    },

    /// Newton iteration budget exhausted with the residual still outside
    /// tolerance. Remediation is a larger budget or a smaller step, never
    /// the unconverged value.
    #[error(
        "Newton did not converge within {max_iterations} iterations (last |f| = {residual:e}, tolerance {tolerance:e})"
    )]
    NonConvergence {
        max_iterations: usize,
        residual: f64,
        tolerance: f64,
    },

    /// Implicit-linear step matrix not invertible within tolerance.
    #[error("step matrix is singular (|det| = {determinant:e} <= {threshold:e})")]
    SingularSystem { determinant: f64, threshold: f64 },
}
