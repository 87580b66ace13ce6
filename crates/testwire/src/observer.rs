use std::io::{self, Write};

use crate::codec;
use crate::event::{Event, FailedTestCase, FinishedTestCase, FinishedTestSuite, TimedEvent};

/// The producer seam: one callback per test-lifecycle transition, each taking
/// the payload that transition carries. A host test runner drives this;
/// implementations decide what to do with the payloads.
pub trait TestObserver {
    fn suite_started(&mut self, start: TimedEvent) -> io::Result<()>;
    fn case_started(&mut self, start: TimedEvent) -> io::Result<()>;
    fn case_failed(&mut self, failure: FailedTestCase) -> io::Result<()>;
    fn case_finished(&mut self, result: FinishedTestCase) -> io::Result<()>;
    fn suite_finished(&mut self, summary: FinishedTestSuite) -> io::Result<()>;
}

/// Writes each event to the sink as one encoded JSON object per line.
///
/// No buffering or retrying on the sink's behalf; if callbacks arrive from
/// multiple threads, serializing them is the caller's discipline.
pub struct JsonObserver<W: Write> {
    sink: W,
}

impl<W: Write> JsonObserver<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, event: Event) -> io::Result<()> {
        self.sink.write_all(&codec::encode(&event))?;
        self.sink.write_all(b"\n")
    }
}

impl<W: Write> TestObserver for JsonObserver<W> {
    fn suite_started(&mut self, start: TimedEvent) -> io::Result<()> {
        self.emit(Event::SuiteStarted(start))
    }

    fn case_started(&mut self, start: TimedEvent) -> io::Result<()> {
        self.emit(Event::CaseStarted(start))
    }

    fn case_failed(&mut self, failure: FailedTestCase) -> io::Result<()> {
        self.emit(Event::CaseFailed(failure))
    }

    fn case_finished(&mut self, result: FinishedTestCase) -> io::Result<()> {
        self.emit(Event::CaseFinished(result))
    }

    fn suite_finished(&mut self, summary: FinishedTestSuite) -> io::Result<()> {
        self.emit(Event::SuiteFinished(summary))
    }
}
