//! Terminal "LED" — a one-cell lamp redrawn in place on stdout.

use std::io::{self, Write};

use pharos_core::{error::Result, Level, OutputSink};

pub struct TerminalSink {
    stdout: io::Stdout,
}

impl TerminalSink {
    /// Acquire the lamp cell and initialize it to low.
    pub fn new() -> Result<Self> {
        let mut sink = Self {
            stdout: io::stdout(),
        };
        sink.set(Level::Low)?;
        Ok(sink)
    }

    fn draw(&mut self, cell: &str) -> io::Result<()> {
        self.stdout.write_all(cell.as_bytes())?;
        self.stdout.flush()
    }
}

impl OutputSink for TerminalSink {
    fn set(&mut self, level: Level) -> Result<()> {
        let cell = if level.is_high() { "\r[\u{25CF}]" } else { "\r[ ]" };
        self.draw(cell)?;
        Ok(())
    }
}

impl Drop for TerminalSink {
    // Teardown: leave the lamp low and move past the lamp line.
    fn drop(&mut self) {
        let _ = self.draw("\r[ ]\n");
    }
}
