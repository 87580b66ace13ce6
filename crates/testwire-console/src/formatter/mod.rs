pub mod color;
pub mod plain;

use std::io::{self, Write};

use testwire::{FailedTestCase, FinishedTestCase, FinishedTestSuite, TestState, TimedEvent};

/// Pluggable renderer for a decoded event stream.
pub trait Formatter {
    fn suite_started(&mut self, start: &TimedEvent, w: &mut dyn Write) -> io::Result<()>;
    fn case_started(&mut self, start: &TimedEvent, w: &mut dyn Write) -> io::Result<()>;
    fn case_failed(&mut self, failure: &FailedTestCase, w: &mut dyn Write) -> io::Result<()>;
    fn case_finished(&mut self, result: &FinishedTestCase, w: &mut dyn Write) -> io::Result<()>;
    fn suite_finished(
        &mut self,
        summary: &FinishedTestSuite,
        w: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Create a formatter by name.
pub fn create(name: &str) -> Box<dyn Formatter> {
    match name {
        "color" => Box::new(color::ColorFormatter::new()),
        "plain" => Box::new(plain::PlainFormatter::new()),
        _ => {
            eprintln!("Unknown formatter: {name}, falling back to color");
            Box::new(color::ColorFormatter::new())
        }
    }
}

/// Per-suite case counts, tallied from case-finished events.
#[derive(Default)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn record(&mut self, state: TestState) {
        match state {
            TestState::Passed => self.passed += 1,
            TestState::Failed => self.failed += 1,
            TestState::Skipped => self.skipped += 1,
        }
    }

    pub fn clear(&mut self) {
        *self = Tally::default();
    }
}

/// One line locating a failure: `name (File.ext:42)`, or `name (line 42)`
/// when the producer had no file path.
pub fn failure_location(failure: &FailedTestCase) -> String {
    match failure.file_path.as_deref() {
        Some(path) => format!("{} ({path}:{})", failure.name, failure.line_number),
        None => format!("{} (line {})", failure.name, failure.line_number),
    }
}

// ANSI helpers shared with the colored formatter.

pub fn fg(w: &mut dyn Write, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

pub fn reset(w: &mut dyn Write) -> io::Result<()> {
    write!(w, "\x1b[0m")
}

pub const GREEN: (u8, u8, u8) = (100, 200, 120);
pub const RED: (u8, u8, u8) = (210, 90, 90);
pub const YELLOW: (u8, u8, u8) = (200, 180, 80);

/// Write the colored tally line: green passed, red failed, yellow skipped.
pub fn write_colored_tally(tally: &Tally, w: &mut dyn Write) -> io::Result<()> {
    fg(w, GREEN.0, GREEN.1, GREEN.2)?;
    write!(w, "{} passed", tally.passed)?;
    reset(w)?;
    write!(w, ", ")?;
    fg(w, RED.0, RED.1, RED.2)?;
    write!(w, "{} failed", tally.failed)?;
    reset(w)?;
    write!(w, ", ")?;
    fg(w, YELLOW.0, YELLOW.1, YELLOW.2)?;
    write!(w, "{} skipped", tally.skipped)?;
    reset(w)?;
    writeln!(w)?;
    Ok(())
}

/// Replay captured failures with red coloring.
pub fn write_colored_failures(failures: &[FailedTestCase], w: &mut dyn Write) -> io::Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(w, "Failures:\n")?;
    for (i, failure) in failures.iter().enumerate() {
        fg(w, RED.0, RED.1, RED.2)?;
        write!(w, "  {}. {}", i + 1, failure_location(failure))?;
        reset(w)?;
        writeln!(w)?;
        for line in failure.description.lines() {
            writeln!(w, "     {line}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}
