pub mod driver;
pub mod error;
/// The `tran_core` crate is the numerical engine for fixed-step transient
/// simulation of ODE initial-value problems.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `OdeSystem` (explicit
///   right-hand sides), `Stepper` (single-step disciplines) and the implicit
///   step forms (`ScalarImplicitForm`, `LinearImplicitForm`).
/// - **Steppers**: `ForwardEuler`, `TrapezoidalNewton`, `BackwardEulerLinear`.
/// - **Newton**: the scalar Newton-Raphson root solver behind the implicit
///   nonlinear discipline.
/// - **Linalg**: small dense solves for the implicit linear discipline, with
///   a closed-form 2×2 fast path.
/// - **Driver**: the time loop, handing each `(t, state)` record to a
///   `TrajectorySink` as it is produced.
pub mod linalg;
pub mod models;
pub mod newton;
pub mod steppers;
pub mod traits;
pub mod trajectory;
