//! Image classifier adapters.

pub mod http;

pub use http::HttpClassifier;
