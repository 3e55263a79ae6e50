//! Command-line frontend: runs the bundled scenarios and writes their
//! trajectories as `.dat` plot files.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufWriter;
use tran_core::driver::{integrate, IntegrationSummary, TimeParameters};
use tran_core::models::{QuadraticGrowth, RcLadder};
use tran_core::newton::NewtonSettings;
use tran_core::steppers::{BackwardEulerLinear, ForwardEuler, TrapezoidalNewton};
use tran_core::trajectory::{ProgressObserver, WriterSink};
use tran_core::traits::Stepper;

/// Prints the running iteration count, like the original analysis scripts
/// expected to see while a long run progressed.
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_step(&mut self, iteration: usize, _t: f64) {
        println!("Iteration: {iteration}");
    }
}

fn run_scenario(
    stepper: &mut impl Stepper,
    time: TimeParameters,
    initial_state: &[f64],
    output: &str,
) -> Result<IntegrationSummary> {
    let file = File::create(output).with_context(|| format!("Failed to create {output}."))?;
    let mut sink = WriterSink::new(BufWriter::new(file));
    let mut progress = ConsoleProgress;

    let summary = integrate(stepper, time, initial_state, &mut sink, Some(&mut progress))?;
    println!(
        "{output}: {} steps, t_final = {:.6e}",
        summary.steps, summary.t_final
    );
    Ok(summary)
}

fn growth_time_grid() -> TimeParameters {
    TimeParameters {
        t_start: 0.0,
        t_end: 5.0,
        h: 0.01,
    }
}

fn rc_time_grid(circuit: &RcLadder) -> TimeParameters {
    let tau = circuit.tau();
    TimeParameters {
        t_start: 0.0,
        // Beyond tau the transient has died out; fifteen time constants is
        // plenty of margin.
        t_end: 15.0 * tau,
        // Forward Euler needs h < 2·min(tau1, tau2) for stability.
        h: 0.01 * tau,
    }
}

fn main() -> Result<()> {
    let scenario = std::env::args().nth(1).unwrap_or_default();

    match scenario.as_str() {
        "growth-fe" => {
            let mut stepper = ForwardEuler::new(QuadraticGrowth);
            run_scenario(&mut stepper, growth_time_grid(), &[-1.0], "growth-fe.dat")?;
        }
        "growth-trap" => {
            let mut stepper = TrapezoidalNewton::new(QuadraticGrowth, NewtonSettings::default());
            run_scenario(&mut stepper, growth_time_grid(), &[-1.0], "growth-trap.dat")?;
        }
        "rc-fe" => {
            let circuit = RcLadder::default();
            let time = rc_time_grid(&circuit);
            let mut stepper = ForwardEuler::new(circuit);
            run_scenario(&mut stepper, time, &[0.0, 0.0], "rc-fe.dat")?;
        }
        "rc-be" => {
            let circuit = RcLadder::default();
            let time = rc_time_grid(&circuit);
            let settings = NewtonSettings::default();
            let mut stepper = BackwardEulerLinear::new(circuit, settings.singularity_threshold);
            run_scenario(&mut stepper, time, &[0.0, 0.0], "rc-be.dat")?;
        }
        other => {
            bail!(
                "Unknown scenario \"{other}\". Available: growth-fe, growth-trap, rc-fe, rc-be."
            );
        }
    }

    Ok(())
}
