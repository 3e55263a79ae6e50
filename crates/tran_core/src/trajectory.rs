//! Where the computed trajectory goes and how progress is observed.

use std::io::{self, Write};

/// An append-only stream of `(t, state)` records.
///
/// The driver hands each record over as soon as it is produced; nothing is
/// retained. Column order is t first, then the state components in their
/// fixed order, so downstream plotting stays stable.
pub trait TrajectorySink {
    fn record(&mut self, t: f64, state: &[f64]) -> io::Result<()>;
}

/// Per-step notification. Purely observational; nothing downstream of it
/// affects the integration.
pub trait ProgressObserver {
    fn on_step(&mut self, iteration: usize, t: f64);
}

/// Writes records as whitespace-separated fixed-width scientific columns
/// with a `# t  x` comment header, the format the gnuplot scripts expect.
pub struct WriterSink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Unwraps the inner writer, e.g. to flush or inspect it.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TrajectorySink for WriterSink<W> {
    fn record(&mut self, t: f64, state: &[f64]) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "# t  x")?;
            self.header_written = true;
        }
        write!(self.writer, "{t:>14.6e}")?;
        for value in state {
            write!(self.writer, " {value:>14.6e}")?;
        }
        writeln!(self.writer)
    }
}

/// Captures the full trajectory in memory. Test support.
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<(f64, Vec<f64>)>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrajectorySink for VecSink {
    fn record(&mut self, t: f64, state: &[f64]) -> io::Result<()> {
        self.records.push((t, state.to_vec()));
        Ok(())
    }
}
