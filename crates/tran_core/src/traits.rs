use crate::error::StepError;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// An ODE in explicit form, dx/dt = f(t, x).
pub trait OdeSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer to write dx/dt into
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A single-step, fixed-step update strategy.
///
/// The driver hands in the committed state and a scratch buffer for the next
/// one; `state` is never written, so it remains available for diagnostics if
/// the step fails. Implicit disciplines can fail (Newton divergence, singular
/// step matrix); the explicit discipline never does.
pub trait Stepper {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Computes the state at `t + h` from the state at `t`, writing it to
    /// `next`.
    fn advance(&mut self, t: f64, h: f64, state: &[f64], next: &mut [f64]) -> Result<(), StepError>;
}

/// The implicit equation of one scalar time step, in residual form.
///
/// `residual` is f(h, t_n, t_{n+1}, x_n, x_{n+1}); the step is correct when
/// it is zero in x_{n+1}. `derivative` is df/dx_{n+1}. The two must stay
/// algebraically consistent: a factor simplified out of one but not the
/// other changes the Newton ratio f/df and the solver converges to the
/// wrong point.
pub trait ScalarImplicitForm {
    fn residual(&self, h: f64, t_n: f64, t_next: f64, x_n: f64, x_next: f64) -> f64;

    fn derivative(&self, h: f64, t_next: f64, x_next: f64) -> f64;
}

/// The implicit equation of one multi-variable time step, as the linear
/// system A·x_{n+1} = b.
///
/// Both A and b are rebuilt every step: the forcing term is evaluated at
/// `t_next`, so neither is constant over the run.
pub trait LinearImplicitForm {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Fills `a` (dimension × dimension, row-major) and `b` with the
    /// coefficients of the step system.
    fn assemble(&self, h: f64, t_next: f64, state: &[f64], a: &mut [f64], b: &mut [f64]);
}
