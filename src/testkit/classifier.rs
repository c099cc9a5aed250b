//! Classifier with canned answers per image URL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::port::{Classification, ImageClassifier};

/// Returns the configured classification for each URL and records calls.
///
/// URLs without an answer fail with a classifier error.
#[derive(Clone, Default)]
pub struct StubClassifier {
    answers: HashMap<String, std::result::Result<Classification, String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, url: &str, label: &str, score: f64) -> Self {
        self.answers
            .insert(url.to_string(), Ok(Classification::new(label, score)));
        self
    }

    #[must_use]
    pub fn failing(mut self, url: &str, reason: &str) -> Self {
        self.answers.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    /// URLs classified so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock classifier calls").clone()
    }
}

#[async_trait]
impl ImageClassifier for StubClassifier {
    async fn classify(&self, image_url: &str) -> Result<Classification> {
        self.calls
            .lock()
            .expect("lock classifier calls")
            .push(image_url.to_string());

        match self.answers.get(image_url) {
            Some(Ok(classification)) => Ok(classification.clone()),
            Some(Err(reason)) => Err(Error::Classifier(reason.clone())),
            None => Err(Error::Classifier(format!("no answer for {image_url}"))),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
