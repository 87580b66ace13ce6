use super::{
    Formatter, GREEN, RED, Tally, YELLOW, fg, reset, write_colored_failures, write_colored_tally,
};
use crossterm::terminal;
use std::io::{self, Write};
use testwire::{FailedTestCase, FinishedTestCase, FinishedTestSuite, TestState, TimedEvent};

/// Truecolor formatter: one colored dot per finished case, wrapped at the
/// terminal width.
pub struct ColorFormatter {
    dot_count: usize,
    cols: u16,
    tally: Tally,
    failures: Vec<FailedTestCase>,
}

impl ColorFormatter {
    pub fn new() -> Self {
        let cols = terminal::size().map(|(w, _)| w).unwrap_or(80);
        Self {
            dot_count: 0,
            cols,
            tally: Tally::default(),
            failures: Vec::new(),
        }
    }

    fn emit_dot(&mut self, ch: char, color: (u8, u8, u8), w: &mut dyn Write) -> io::Result<()> {
        if self.dot_count > 0 && self.dot_count.is_multiple_of(self.cols as usize) {
            writeln!(w)?;
        }
        fg(w, color.0, color.1, color.2)?;
        write!(w, "{ch}")?;
        reset(w)?;
        w.flush()?;
        self.dot_count += 1;
        Ok(())
    }
}

impl Formatter for ColorFormatter {
    fn suite_started(&mut self, start: &TimedEvent, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "\nRunning {}\n", start.name)?;
        Ok(())
    }

    fn case_started(&mut self, _start: &TimedEvent, _w: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }

    fn case_failed(&mut self, failure: &FailedTestCase, _w: &mut dyn Write) -> io::Result<()> {
        self.failures.push(failure.clone());
        Ok(())
    }

    fn case_finished(&mut self, result: &FinishedTestCase, w: &mut dyn Write) -> io::Result<()> {
        self.tally.record(result.state);
        let (ch, color) = match result.state {
            TestState::Passed => ('.', GREEN),
            TestState::Failed => ('X', RED),
            TestState::Skipped => ('*', YELLOW),
        };
        self.emit_dot(ch, color, w)
    }

    fn suite_finished(
        &mut self,
        summary: &FinishedTestSuite,
        w: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(w, "\n")?;

        write_colored_tally(&self.tally, w)?;
        writeln!(
            w,
            "{} executed, {} failures, {} unexpected",
            summary.execution_count,
            summary.total_failure_count,
            summary.unexpected_exception_count
        )?;
        writeln!(
            w,
            "Finished in {:.2}s ({:.2}s total)",
            summary.test_duration, summary.total_duration
        )?;
        writeln!(w)?;

        write_colored_failures(&self.failures, w)?;

        w.flush()?;

        self.dot_count = 0;
        self.tally.clear();
        self.failures.clear();
        Ok(())
    }
}
