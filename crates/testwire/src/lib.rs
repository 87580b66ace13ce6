//! Versioned JSON wire protocol for test-lifecycle events.
//!
//! A producer observes a test run (suite start, case start, failures, case
//! and suite finish) and emits one self-describing JSON object per event; a
//! consumer decodes the stream back into [`Event`] values with strict
//! version and shape checking.
//!
//! The codec pair is pure, synchronous, and stateless: [`encode`] is total,
//! [`decode`] returns either a fully valid event or one [`DecodeError`].
//! Transport and ordering are the surrounding system's concern.

pub mod codec;
pub mod event;
pub mod observer;

pub use codec::{DecodeError, PROTOCOL_VERSION, decode, encode};
pub use event::{
    Event, FailedTestCase, FinishedTestCase, FinishedTestSuite, Kind, TestState, TimedEvent,
};
pub use observer::{JsonObserver, TestObserver};
