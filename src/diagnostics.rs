//! The user-visible diagnostic text: either the adapter report as JSON
//! or a one-line failure message.

use std::fmt::Display;
use std::io::{self, Write};

use crate::gpu::AdapterReport;

pub struct Diagnostics<W: Write> {
    out: W,
}

impl Diagnostics<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Diagnostics<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn adapter(&mut self, report: &AdapterReport) -> anyhow::Result<()> {
        let json = serde_json::to_string(report)?;
        writeln!(self.out, "{json}")?;
        Ok(())
    }

    pub fn failure(&mut self, error: &dyn Display) -> io::Result<()> {
        writeln!(self.out, "{error}")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Writes `error` to the diagnostic output before handing it back.
pub fn reported<T, E: Display, W: Write>(
    diagnostics: &mut Diagnostics<W>,
    result: Result<T, E>,
) -> Result<T, E> {
    if let Err(error) = &result {
        if let Err(io_error) = diagnostics.failure(error) {
            log::error!("Could not write diagnostic output: {io_error}");
        }
    }
    result
}
