use chrono::{DateTime, Utc};
use serde::Serialize;

/// Durations are observed wall-clock measurements, so equality on them is
/// closeness, not bit-exactness.
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// Marks a suite or case start.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedEvent {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// One failure observation. A case may report several of these before it
/// finishes, or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTestCase {
    pub file_path: Option<String>,
    pub line_number: i64,
    pub name: String,
    pub description: String,
}

/// Terminal state of a finished test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Skipped,
    Passed,
    Failed,
}

impl TestState {
    pub const ALL: [TestState; 3] = [TestState::Skipped, TestState::Passed, TestState::Failed];

    pub fn as_str(self) -> &'static str {
        match self {
            TestState::Skipped => "skipped",
            TestState::Passed => "passed",
            TestState::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<TestState> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }
}

/// Terminal record for a case.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTestCase {
    pub state: TestState,
    pub duration_in_seconds: f64,
}

impl PartialEq for FinishedTestCase {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && close(self.duration_in_seconds, other.duration_in_seconds)
    }
}

/// Terminal record for a suite. The counters are non-negative by producer
/// convention; nothing here enforces that.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTestSuite {
    pub execution_count: i64,
    pub total_failure_count: i64,
    pub unexpected_exception_count: i64,
    pub test_duration: f64,
    pub total_duration: f64,
}

impl PartialEq for FinishedTestSuite {
    fn eq(&self, other: &Self) -> bool {
        self.execution_count == other.execution_count
            && self.total_failure_count == other.total_failure_count
            && self.unexpected_exception_count == other.unexpected_exception_count
            && close(self.test_duration, other.test_duration)
            && close(self.total_duration, other.total_duration)
    }
}

/// Wire tag identifying one [`Event`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    SuiteStarted,
    CaseStarted,
    CaseFailed,
    CaseFinished,
    SuiteFinished,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::SuiteStarted,
        Kind::CaseStarted,
        Kind::CaseFailed,
        Kind::CaseFinished,
        Kind::SuiteFinished,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::SuiteStarted => "testSuiteStarted",
            Kind::CaseStarted => "testCaseStarted",
            Kind::CaseFailed => "testCaseFailed",
            Kind::CaseFinished => "testCaseFinished",
            Kind::SuiteFinished => "testSuiteFinished",
        }
    }

    pub fn parse(s: &str) -> Option<Kind> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }
}

/// A single test-lifecycle event: exactly one variant, tagged on the wire by
/// its [`Kind`]. The tag-to-payload mapping is fixed; no payload is valid for
/// more than one tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SuiteStarted(TimedEvent),
    CaseStarted(TimedEvent),
    CaseFailed(FailedTestCase),
    CaseFinished(FinishedTestCase),
    SuiteFinished(FinishedTestSuite),
}

impl Event {
    /// The wire tag of the held variant.
    pub fn kind(&self) -> Kind {
        match self {
            Event::SuiteStarted(_) => Kind::SuiteStarted,
            Event::CaseStarted(_) => Kind::CaseStarted,
            Event::CaseFailed(_) => Kind::CaseFailed,
            Event::CaseFinished(_) => Kind::CaseFinished,
            Event::SuiteFinished(_) => Kind::SuiteFinished,
        }
    }
}
