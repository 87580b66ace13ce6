use super::{Formatter, Tally, failure_location};
use std::io::{self, Write};
use testwire::{FailedTestCase, FinishedTestCase, FinishedTestSuite, TestState, TimedEvent};

/// No-color formatter for piped/non-TTY output.
pub struct PlainFormatter {
    dot_count: usize,
    tally: Tally,
    failures: Vec<FailedTestCase>,
}

impl PlainFormatter {
    pub fn new() -> Self {
        Self {
            dot_count: 0,
            tally: Tally::default(),
            failures: Vec::new(),
        }
    }

    fn emit_dot(&mut self, ch: char, w: &mut dyn Write) -> io::Result<()> {
        if self.dot_count > 0 && self.dot_count.is_multiple_of(80) {
            writeln!(w)?;
        }
        write!(w, "{ch}")?;
        w.flush()?;
        self.dot_count += 1;
        Ok(())
    }
}

impl Formatter for PlainFormatter {
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
        let ch = match result.state {
            TestState::Passed => '.',
            TestState::Failed => 'X',
            TestState::Skipped => '*',
        };
        self.emit_dot(ch, w)
    }

    fn suite_finished(
        &mut self,
        summary: &FinishedTestSuite,
        w: &mut dyn Write,
    ) -> io::Result<()> {
        writeln!(w, "\n")?;

        writeln!(
            w,
            "{} passed, {} failed, {} skipped",
            self.tally.passed, self.tally.failed, self.tally.skipped
        )?;
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

        if !self.failures.is_empty() {
            writeln!(w, "Failures:\n")?;
            for (i, failure) in self.failures.iter().enumerate() {
                writeln!(w, "  {}. {}", i + 1, failure_location(failure))?;
                for line in failure.description.lines() {
                    writeln!(w, "     {line}")?;
                }
                writeln!(w)?;
            }
        }

        w.flush()?;

        // A finished suite closes its reporting scope; nested or sequential
        // suites each get a fresh tally and failure replay.
        self.dot_count = 0;
        self.tally.clear();
        self.failures.clear();
        Ok(())
    }
}
