use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use testwire::{Event, TestState, codec};

use crate::formatter::Formatter;

/// Reads one encoded event per line from the input and drives the formatter.
pub fn run(
    input: &mut dyn BufRead,
    formatter: &mut dyn Formatter,
    w: &mut dyn Write,
) -> io::Result<ExitCode> {
    if render(input, formatter, w)? {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Returns whether any failure was observed in the stream.
fn render(
    input: &mut dyn BufRead,
    formatter: &mut dyn Formatter,
    w: &mut dyn Write,
) -> io::Result<bool> {
    let mut any_failure = false;

    for line in input.lines() {
        let line = line?;

        let event = match codec::decode(line.as_bytes()) {
            Ok(event) => event,
            Err(_) => continue, // skip non-event lines (e.g. harness output leaking through)
        };

        match event {
            Event::SuiteStarted(start) => formatter.suite_started(&start, w)?,
            Event::CaseStarted(start) => formatter.case_started(&start, w)?,
            Event::CaseFailed(failure) => formatter.case_failed(&failure, w)?,
            Event::CaseFinished(result) => {
                if result.state == TestState::Failed {
                    any_failure = true;
                }
                formatter.case_finished(&result, w)?;
            }
            Event::SuiteFinished(summary) => {
                if summary.total_failure_count > 0 || summary.unexpected_exception_count > 0 {
                    any_failure = true;
                }
                formatter.suite_finished(&summary, w)?;
            }
        }
    }

    Ok(any_failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::plain::PlainFormatter;
    use chrono::{TimeZone, Utc};
    use testwire::{
        FailedTestCase, FinishedTestCase, FinishedTestSuite, JsonObserver, TestObserver,
        TimedEvent,
    };

    fn timed(name: &str) -> TimedEvent {
        TimedEvent {
            name: String::from(name),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn stream_with_failure() -> Vec<u8> {
        let mut observer = JsonObserver::new(Vec::new());
        observer.suite_started(timed("MySuite")).unwrap();
        observer.case_started(timed("testPasses")).unwrap();
        observer
            .case_finished(FinishedTestCase {
                state: TestState::Passed,
                duration_in_seconds: 0.01,
            })
            .unwrap();
        observer.case_started(timed("testFails")).unwrap();
        observer
            .case_failed(FailedTestCase {
                file_path: Some(String::from("File.ext")),
                line_number: 42,
                name: String::from("testFails"),
                description: String::from("testFails failed"),
            })
            .unwrap();
        observer
            .case_finished(FinishedTestCase {
                state: TestState::Failed,
                duration_in_seconds: 0.02,
            })
            .unwrap();
        observer
            .suite_finished(FinishedTestSuite {
                execution_count: 2,
                total_failure_count: 1,
                unexpected_exception_count: 0,
                test_duration: 0.03,
                total_duration: 0.05,
            })
            .unwrap();
        observer.into_inner()
    }

    #[test]
    fn failing_stream_reports_failure() {
        let stream = stream_with_failure();
        let mut input = stream.as_slice();
        let mut fmt = PlainFormatter::new();
        let mut out = Vec::new();

        let any_failure = render(&mut input, &mut fmt, &mut out).unwrap();
        assert!(any_failure);

        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.contains("Running MySuite"));
        assert!(rendered.contains(".X"));
        assert!(rendered.contains("testFails (File.ext:42)"));
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"warning: something unrelated\n");
        stream.extend_from_slice(&stream_with_failure());
        stream.extend_from_slice(b"{\"version\": 99, \"kind\": \"testCaseStarted\"}\n");

        let mut input = stream.as_slice();
        let mut fmt = PlainFormatter::new();
        let mut out = Vec::new();

        let any_failure = render(&mut input, &mut fmt, &mut out).unwrap();
        assert!(any_failure);
        assert!(String::from_utf8(out).unwrap().contains("Running MySuite"));
    }

    #[test]
    fn clean_stream_reports_success() {
        let mut observer = JsonObserver::new(Vec::new());
        observer.suite_started(timed("MySuite")).unwrap();
        observer
            .case_finished(FinishedTestCase {
                state: TestState::Passed,
                duration_in_seconds: 0.01,
            })
            .unwrap();
        observer
            .suite_finished(FinishedTestSuite {
                execution_count: 1,
                total_failure_count: 0,
                unexpected_exception_count: 0,
                test_duration: 0.01,
                total_duration: 0.02,
            })
            .unwrap();

        let stream = observer.into_inner();
        let mut input = stream.as_slice();
        let mut fmt = PlainFormatter::new();
        let mut out = Vec::new();

        assert!(!render(&mut input, &mut fmt, &mut out).unwrap());
    }
}
