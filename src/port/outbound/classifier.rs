//! Image classification port.

use async_trait::async_trait;

use crate::error::Result;

/// Best label for an image and its confidence score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f64,
}

impl Classification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Whether this classification names `label` with at least `threshold`
    /// confidence.
    #[must_use]
    pub fn matches(&self, label: &str, threshold: f64) -> bool {
        self.label == label && self.score >= threshold
    }
}

#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classify the image behind `image_url`.
    async fn classify(&self, image_url: &str) -> Result<Classification>;

    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        assert!(Classification::new("doge", 0.32).matches("doge", 0.32));
        assert!(!Classification::new("doge", 0.319).matches("doge", 0.32));
        assert!(!Classification::new("cat", 0.99).matches("doge", 0.32));
    }
}
