//! Console renderer for board views.

use std::io::Write;
use std::sync::Mutex;

use vtbatch_core::board::BoardView;
use vtbatch_runner::board::Renderer;

/// Renders each tick as a block of plain lines on stdout.
///
/// All writes go through one mutex so board frames never interleave
/// mid-line with each other or with the final summary.
pub struct ConsoleRenderer {
    out: Mutex<std::io::Stdout>,
}

impl ConsoleRenderer {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(std::io::stdout()),
        }
    }
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&self, view: &BoardView) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(out, "[{}/{}] jobs finished", view.completed, view.total);
        for job in &view.jobs {
            let _ = writeln!(out, "  {:<32} {:<10} {}", job.source_name, job.state, job.message);
        }
        let _ = out.flush();
    }
}
