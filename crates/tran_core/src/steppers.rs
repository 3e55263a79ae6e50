//! The three stepping disciplines behind the `Stepper` trait.

use crate::error::StepError;
use crate::linalg;
use crate::newton::{newton_raphson, NewtonSettings};
use crate::traits::{LinearImplicitForm, OdeSystem, ScalarImplicitForm, Stepper};

/// Explicit discipline: x₊ = x + h·f(t, x).
///
/// One right-hand-side evaluation per step, never fails. Stability is the
/// caller's problem; for stiff systems this needs an impractically small h
/// and the implicit disciplines are the right tool.
pub struct ForwardEuler<S: OdeSystem<f64>> {
    system: S,
    rhs: Vec<f64>,
}

impl<S: OdeSystem<f64>> ForwardEuler<S> {
    pub fn new(system: S) -> Self {
        let dim = system.dimension();
        Self {
            system,
            rhs: vec![0.0; dim],
        }
    }
}

impl<S: OdeSystem<f64>> Stepper for ForwardEuler<S> {
    fn dimension(&self) -> usize {
        self.system.dimension()
    }

    fn advance(&mut self, t: f64, h: f64, state: &[f64], next: &mut [f64]) -> Result<(), StepError> {
        self.system.apply(t, state, &mut self.rhs);
        for i in 0..state.len() {
            next[i] = state[i] + h * self.rhs[i];
        }
        Ok(())
    }
}

/// Implicit nonlinear discipline for scalar problems: the trapezoidal rule,
/// with the step equation resolved by Newton-Raphson.
///
/// Solver failures propagate unchanged; there is no fallback to an
/// unconverged value.
pub struct TrapezoidalNewton<F: ScalarImplicitForm> {
    form: F,
    settings: NewtonSettings,
}

impl<F: ScalarImplicitForm> TrapezoidalNewton<F> {
    pub fn new(form: F, settings: NewtonSettings) -> Self {
        Self { form, settings }
    }
}

impl<F: ScalarImplicitForm> Stepper for TrapezoidalNewton<F> {
    fn dimension(&self) -> usize {
        1
    }

    fn advance(&mut self, t: f64, h: f64, state: &[f64], next: &mut [f64]) -> Result<(), StepError> {
        next[0] = newton_raphson(&self.form, h, t, state[0], self.settings)?;
        Ok(())
    }
}

/// Implicit linear discipline: backward Euler for systems whose step
/// equation is linear in the unknown, A·x₊ = b.
///
/// A and b are reassembled every step because the forcing term is evaluated
/// at t + h. A singular step matrix propagates unchanged.
pub struct BackwardEulerLinear<F: LinearImplicitForm> {
    form: F,
    singular_threshold: f64,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl<F: LinearImplicitForm> BackwardEulerLinear<F> {
    pub fn new(form: F, singular_threshold: f64) -> Self {
        let dim = form.dimension();
        Self {
            form,
            singular_threshold,
            a: vec![0.0; dim * dim],
            b: vec![0.0; dim],
        }
    }
}

impl<F: LinearImplicitForm> Stepper for BackwardEulerLinear<F> {
    fn dimension(&self) -> usize {
        self.form.dimension()
    }

    fn advance(&mut self, t: f64, h: f64, state: &[f64], next: &mut [f64]) -> Result<(), StepError> {
        let dim = self.form.dimension();
        self.form.assemble(h, t + h, state, &mut self.a, &mut self.b);
        let solution = linalg::solve(&self.a, &self.b, dim, self.singular_threshold)?;
        next.copy_from_slice(&solution);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackwardEulerLinear, ForwardEuler, TrapezoidalNewton};
    use crate::error::StepError;
    use crate::models::{QuadraticGrowth, RcLadder};
    use crate::newton::NewtonSettings;
    use crate::traits::{LinearImplicitForm, ScalarImplicitForm, Stepper};

    #[test]
    fn forward_euler_satisfies_the_update_identity() {
        let mut stepper = ForwardEuler::new(QuadraticGrowth);
        let (t, h, x) = (2.0, 0.01, -0.5);

        let mut next = [0.0];
        stepper
            .advance(t, h, &[x], &mut next)
            .expect("explicit step cannot fail");

        // x₊ == x + h·f(t, x) exactly.
        assert_eq!(next[0], x + h * (5.0 * t * t * x * x));
    }

    #[test]
    fn trapezoidal_step_leaves_the_residual_within_tolerance() {
        let settings = NewtonSettings::default();
        let mut stepper = TrapezoidalNewton::new(QuadraticGrowth, settings);
        let (t, h, x) = (1.0, 0.01, -0.3);

        let mut next = [0.0];
        stepper
            .advance(t, h, &[x], &mut next)
            .expect("step should converge");

        let residual = QuadraticGrowth.residual(h, t, t + h, x, next[0]);
        assert!(residual.abs() <= settings.tolerance);
    }

    #[test]
    fn backward_euler_matches_a_hand_solved_step() {
        let circuit = RcLadder::default();
        let h = 1e-5;
        let state = [0.2, 0.05];

        let mut a = [0.0; 4];
        let mut b = [0.0; 2];
        circuit.assemble(h, h, &state, &mut a, &mut b);
        let det = a[0] * a[3] - a[1] * a[2];
        let expected = [
            (a[3] * b[0] - a[1] * b[1]) / det,
            (a[0] * b[1] - a[2] * b[0]) / det,
        ];

        let mut stepper = BackwardEulerLinear::new(circuit, 1e-10);
        let mut next = [0.0; 2];
        stepper
            .advance(0.0, h, &state, &mut next)
            .expect("circuit matrix is well-conditioned");

        assert!((next[0] - expected[0]).abs() < 1e-12);
        assert!((next[1] - expected[1]).abs() < 1e-12);
    }

    /// A degenerate circuit form whose step matrix is rank 1.
    struct CollapsedForm;

    impl LinearImplicitForm for CollapsedForm {
        fn dimension(&self) -> usize {
            2
        }

        fn assemble(&self, _h: f64, _t_next: f64, state: &[f64], a: &mut [f64], b: &mut [f64]) {
            a.copy_from_slice(&[1.0, 2.0, 2.0, 4.0]);
            b.copy_from_slice(state);
        }
    }

    #[test]
    fn backward_euler_propagates_singular_matrices() {
        let mut stepper = BackwardEulerLinear::new(CollapsedForm, 1e-10);
        let mut next = [0.0; 2];
        let err = stepper
            .advance(0.0, 1e-5, &[1.0, 1.0], &mut next)
            .expect_err("rank-1 matrix must fail the step");
        assert!(matches!(err, StepError::SingularSystem { .. }));
    }

    #[test]
    fn steppers_do_not_touch_the_committed_state() {
        let mut stepper = ForwardEuler::new(QuadraticGrowth);
        let state = [-1.0];
        let mut next = [0.0];
        stepper
            .advance(0.0, 0.01, &state, &mut next)
            .expect("explicit step cannot fail");
        assert_eq!(state[0], -1.0);
    }
}
