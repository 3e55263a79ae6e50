use crate::error::StepError;
use crate::traits::ScalarImplicitForm;
use serde::{Deserialize, Serialize};

/// Knobs for the scalar Newton-Raphson solve.
///
/// The defaults are the values the trapezoidal circuit examples run with.
/// The iteration cap in particular is a tight budget on purpose: with the
/// warm start at `x_n` and a sane step size, convergence takes one or two
/// iterations, and a step that needs many more is a step that should fail.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewtonSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub singularity_threshold: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 1e-8,
            singularity_threshold: 1e-10,
        }
    }
}

/// Finds `x_{n+1}` such that the step residual is within tolerance.
///
/// The guess is warm-started at `x_n`. Each iteration checks the residual
/// before touching the derivative, so an exact initial guess converges with
/// zero update steps. A derivative flatter than `singularity_threshold` is
/// a `DegenerateDerivative` failure, not a retry; running out of iterations
/// is `NonConvergence`.
pub fn newton_raphson<F: ScalarImplicitForm>(
    form: &F,
    h: f64,
    t_n: f64,
    x_n: f64,
    settings: NewtonSettings,
) -> Result<f64, StepError> {
    let t_next = t_n + h;
    let mut x_next = x_n;
    let mut residual = form.residual(h, t_n, t_next, x_n, x_next);

    for iteration in 0..settings.max_iterations {
        if residual.abs() <= settings.tolerance {
            return Ok(x_next);
        }

        let derivative = form.derivative(h, t_next, x_next);
        if derivative.abs() < settings.singularity_threshold {
            return Err(StepError::DegenerateDerivative {
                iteration,
                magnitude: derivative.abs(),
                threshold: settings.singularity_threshold,
            });
        }

        x_next -= residual / derivative;
        residual = form.residual(h, t_n, t_next, x_n, x_next);
    }

    if residual.abs() <= settings.tolerance {
        return Ok(x_next);
    }

    Err(StepError::NonConvergence {
        max_iterations: settings.max_iterations,
        residual: residual.abs(),
        tolerance: settings.tolerance,
    })
}
