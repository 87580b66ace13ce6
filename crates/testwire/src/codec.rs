//! The envelope codec: every event crosses the wire as one UTF-8 JSON object
//! of the shape `{ "version": <int>, "kind": "<tag>", "value": {...} }`.
//!
//! Encoding is total. Decoding is strict: it either returns a fully valid
//! [`Event`] or exactly one [`DecodeError`], with no coercion, no
//! best-effort fallback, and a hard version gate.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::event::{
    Event, FailedTestCase, FinishedTestCase, FinishedTestSuite, Kind, TestState, TimedEvent,
};

/// The single protocol version this build speaks. Any schema change that is
/// not purely additive bumps this, and older decoders reject the new bytes
/// outright instead of misreading them.
pub const PROTOCOL_VERSION: i64 = 1;

/// Why a decode call failed. Every case is terminal for that call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown event kind `{0}`")]
    UnknownKind(String),

    #[error("unsupported protocol version {found}, supported version is {}", PROTOCOL_VERSION)]
    InvalidVersion { found: i64 },
}

/// Encodes an event into its versioned envelope. Never fails for in-memory
/// events: there is no I/O here and every payload field has a JSON
/// representation.
pub fn encode(event: &Event) -> Vec<u8> {
    let envelope = json!({
        "version": PROTOCOL_VERSION,
        "kind": event.kind().as_str(),
        "value": payload_value(event),
    });
    envelope.to_string().into_bytes()
}

fn payload_value(event: &Event) -> Value {
    match event {
        Event::SuiteStarted(start) | Event::CaseStarted(start) => json!(start),
        Event::CaseFailed(failure) => json!(failure),
        Event::CaseFinished(result) => json!(result),
        Event::SuiteFinished(summary) => json!(summary),
    }
}

/// Decodes an envelope back into an event.
///
/// Validation order: JSON well-formedness, then the `version` gate, then the
/// `kind` tag, then the payload fields dictated by that tag. The first
/// violation is returned and nothing is constructed.
pub fn decode(bytes: &[u8]) -> Result<Event, DecodeError> {
    let root: Value =
        serde_json::from_slice(bytes).map_err(|err| DecodeError::MalformedJson(err.to_string()))?;
    let Value::Object(envelope) = root else {
        return Err(DecodeError::TypeMismatch {
            field: "envelope",
            expected: "an object",
        });
    };

    let version = int_field(&envelope, "version")?;
    if version != PROTOCOL_VERSION {
        return Err(DecodeError::InvalidVersion { found: version });
    }

    let raw_kind = str_field(&envelope, "kind")?;
    let kind =
        Kind::parse(raw_kind).ok_or_else(|| DecodeError::UnknownKind(raw_kind.to_string()))?;

    let value = object_field(&envelope, "value")?;

    let event = match kind {
        Kind::SuiteStarted => Event::SuiteStarted(timed_event(value)?),
        Kind::CaseStarted => Event::CaseStarted(timed_event(value)?),
        Kind::CaseFailed => Event::CaseFailed(failed_test_case(value)?),
        Kind::CaseFinished => Event::CaseFinished(finished_test_case(value)?),
        Kind::SuiteFinished => Event::SuiteFinished(finished_test_suite(value)?),
    };
    Ok(event)
}

// ===== payload decoders =====

fn timed_event(value: &Map<String, Value>) -> Result<TimedEvent, DecodeError> {
    Ok(TimedEvent {
        name: str_field(value, "name")?.to_string(),
        timestamp: timestamp_field(value, "timestamp")?,
    })
}

fn failed_test_case(value: &Map<String, Value>) -> Result<FailedTestCase, DecodeError> {
    Ok(FailedTestCase {
        file_path: optional_str_field(value, "filePath")?,
        line_number: int_field(value, "lineNumber")?,
        name: str_field(value, "name")?.to_string(),
        description: str_field(value, "description")?.to_string(),
    })
}

fn finished_test_case(value: &Map<String, Value>) -> Result<FinishedTestCase, DecodeError> {
    Ok(FinishedTestCase {
        state: state_field(value, "state")?,
        duration_in_seconds: float_field(value, "durationInSeconds")?,
    })
}

fn finished_test_suite(value: &Map<String, Value>) -> Result<FinishedTestSuite, DecodeError> {
    Ok(FinishedTestSuite {
        execution_count: int_field(value, "executionCount")?,
        total_failure_count: int_field(value, "totalFailureCount")?,
        unexpected_exception_count: int_field(value, "unexpectedExceptionCount")?,
        test_duration: float_field(value, "testDuration")?,
        total_duration: float_field(value, "totalDuration")?,
    })
}

// ===== field extraction =====

fn field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, DecodeError> {
    obj.get(name).ok_or(DecodeError::MissingField(name))
}

fn int_field(obj: &Map<String, Value>, name: &'static str) -> Result<i64, DecodeError> {
    // as_i64 is None for fractional numbers, so 4.2 where an integer is
    // expected is a mismatch, never a truncation.
    field(obj, name)?.as_i64().ok_or(DecodeError::TypeMismatch {
        field: name,
        expected: "an integer",
    })
}

fn float_field(obj: &Map<String, Value>, name: &'static str) -> Result<f64, DecodeError> {
    field(obj, name)?.as_f64().ok_or(DecodeError::TypeMismatch {
        field: name,
        expected: "a number",
    })
}

fn str_field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Result<&'a str, DecodeError> {
    field(obj, name)?.as_str().ok_or(DecodeError::TypeMismatch {
        field: name,
        expected: "a string",
    })
}

fn object_field<'a>(
    obj: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Map<String, Value>, DecodeError> {
    field(obj, name)?
        .as_object()
        .ok_or(DecodeError::TypeMismatch {
            field: name,
            expected: "an object",
        })
}

fn optional_str_field(
    obj: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<String>, DecodeError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::TypeMismatch {
            field: name,
            expected: "a string or null",
        }),
    }
}

fn timestamp_field(
    obj: &Map<String, Value>,
    name: &'static str,
) -> Result<DateTime<Utc>, DecodeError> {
    let raw = str_field(obj, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| DecodeError::TypeMismatch {
            field: name,
            expected: "an RFC 3339 timestamp",
        })
}

fn state_field(obj: &Map<String, Value>, name: &'static str) -> Result<TestState, DecodeError> {
    let raw = str_field(obj, name)?;
    TestState::parse(raw).ok_or(DecodeError::TypeMismatch {
        field: name,
        expected: "one of skipped, passed, failed",
    })
}
