//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`stream`] - Mock [`StreamSource`](crate::port::StreamSource) and
//!   [`EventHandler`](crate::application::EventHandler): `ScriptedSource`,
//!   `RecordingHandler`.
//! - [`exchange`] - `MockExchange` with scripted responses and a call log.
//! - [`notifier`] - `RecordingNotifier`.
//! - [`classifier`] - `StubClassifier` with per-URL results.
//! - [`domain`] - Builders for trade parameters, orders and stream records.

pub mod classifier;
pub mod domain;
pub mod exchange;
pub mod notifier;
pub mod stream;
