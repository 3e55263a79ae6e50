//! The concrete problems the engine ships with: a scalar nonlinear growth
//! equation and a two-node RC ladder circuit.

use crate::traits::{LinearImplicitForm, OdeSystem, Scalar, ScalarImplicitForm};
use serde::{Deserialize, Serialize};

/// The scalar test equation dx/dt = 5 t² x².
///
/// Grows fast enough to exercise both disciplines: forward Euler tracks it
/// directly, the trapezoidal rule needs a Newton solve per step.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticGrowth;

impl<T: Scalar> OdeSystem<T> for QuadraticGrowth {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        let five = T::from_f64(5.0).unwrap();
        out[0] = five * t * t * x[0] * x[0];
    }
}

// Trapezoidal discretization of dx/dt = 5 t² x²:
//   f  = 5h·t₊²x₊² − 2x₊ + 5h·t²x² + 2x
//   df = 10h·t₊²x₊ − 2
// f and df are kept term-for-term consistent; factoring something out of
// one side only would change the ratio f/df that Newton follows.
impl ScalarImplicitForm for QuadraticGrowth {
    fn residual(&self, h: f64, t_n: f64, t_next: f64, x_n: f64, x_next: f64) -> f64 {
        let t_n_sq = t_n * t_n;
        let x_n_sq = x_n * x_n;
        let t_next_sq = t_next * t_next;
        let x_next_sq = x_next * x_next;

        5.0 * h * t_next_sq * x_next_sq - 2.0 * x_next + 5.0 * h * t_n_sq * x_n_sq + 2.0 * x_n
    }

    fn derivative(&self, h: f64, t_next: f64, x_next: f64) -> f64 {
        let t_next_sq = t_next * t_next;
        10.0 * h * t_next_sq * x_next - 2.0
    }
}

/// A two-node RC ladder driven by a sinusoidal source.
///
/// Node 1 sits behind R1 from the source and couples to node 2 through R2;
/// each node has a capacitor to ground. State is the pair of node voltages
/// (v1, v2).
///
///   dv1/dt = ( (vs − v1)·g1 + (v2 − v1)·g2 ) / c1
///   dv2/dt = −( (v2 − v1)·g2 ) / c2
///
/// with g = 1/r. The backward-Euler step solves A·v₊ = b with the forcing
/// evaluated at t₊.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RcLadder {
    pub r1: f64,
    pub r2: f64,
    pub c1: f64,
    pub c2: f64,
    /// Source amplitude, volts.
    pub vm: f64,
    /// Source frequency, hertz.
    pub vf: f64,
}

impl Default for RcLadder {
    fn default() -> Self {
        // R = 1 kΩ, C = 1 µF, 1 V at 1 kHz.
        Self {
            r1: 1.0e3,
            r2: 1.0e3,
            c1: 1.0e-6,
            c2: 1.0e-6,
            vm: 1.0,
            vf: 1.0e3,
        }
    }
}

impl RcLadder {
    /// The smaller RC product, a lower bound on the circuit time constants.
    /// Forward Euler needs h below twice this to stay stable.
    pub fn tau(&self) -> f64 {
        (self.r1 * self.c1).min(self.r2 * self.c2)
    }

    /// The source voltage vs(t) = vm·sin(2π·vf·t).
    pub fn source_voltage(&self, t: f64) -> f64 {
        let omega = std::f64::consts::TAU * self.vf;
        self.vm * (omega * t).sin()
    }
}

impl OdeSystem<f64> for RcLadder {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, t: f64, x: &[f64], out: &mut [f64]) {
        let g1 = 1.0 / self.r1;
        let g2 = 1.0 / self.r2;
        let vs = self.source_voltage(t);
        let (v1, v2) = (x[0], x[1]);

        out[0] = ((vs - v1) * g1 + (v2 - v1) * g2) / self.c1;
        out[1] = -((v2 - v1) * g2) / self.c2;
    }
}

impl LinearImplicitForm for RcLadder {
    fn dimension(&self) -> usize {
        2
    }

    fn assemble(&self, h: f64, t_next: f64, state: &[f64], a: &mut [f64], b: &mut [f64]) {
        let g1 = 1.0 / self.r1;
        let g2 = 1.0 / self.r2;
        let vs_next = self.source_voltage(t_next);

        a[0] = 1.0 + (h / self.c1) * (g1 + g2); // v1 coefficient, node 1
        a[1] = -(h / self.c1) * g2; // v2 coefficient, node 1
        a[2] = -(h / self.c2) * g2; // v1 coefficient, node 2
        a[3] = 1.0 + (h / self.c2) * g2; // v2 coefficient, node 2

        b[0] = state[0] + (h / self.c1) * g1 * vs_next;
        b[1] = state[1];
    }
}
