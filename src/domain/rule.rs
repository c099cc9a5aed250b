//! Stream rules and the routing tags they carry.

use serde::{Deserialize, Serialize};

/// Tag for rules that exist only to observe the stream.
pub const DEV_ONLY_TAG: &str = "dev-only";

/// Tag for rules whose matches are gated on image classification.
pub const HAS_MEDIA_TAG: &str = "has-media";

/// A filtered stream rule as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Stream query, e.g. `(doge OR dogecoin) from:44196397 -is:retweet`.
    #[serde(rename = "value")]
    pub pattern: String,
    pub tag: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            tag: tag.into(),
        }
    }

    #[must_use]
    pub fn route(&self) -> RouteTag<'_> {
        RouteTag::parse(&self.tag)
    }
}

/// Interpretation of a rule tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTag<'a> {
    DevOnly,
    HasMedia,
    Symbol(&'a str),
}

impl<'a> RouteTag<'a> {
    #[must_use]
    pub fn parse(tag: &'a str) -> Self {
        match tag {
            DEV_ONLY_TAG => Self::DevOnly,
            HAS_MEDIA_TAG => Self::HasMedia,
            symbol => Self::Symbol(symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_tags_are_recognised() {
        assert_eq!(RouteTag::parse("dev-only"), RouteTag::DevOnly);
        assert_eq!(RouteTag::parse("has-media"), RouteTag::HasMedia);
        assert_eq!(RouteTag::parse("DOGEUSDT"), RouteTag::Symbol("DOGEUSDT"));
    }

    #[test]
    fn rule_serializes_with_wire_field_names() {
        let rule = Rule::new("bitcoin -is:retweet", "BTCUSDT");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["value"], "bitcoin -is:retweet");
        assert_eq!(json["tag"], "BTCUSDT");
        assert_eq!(rule.route(), RouteTag::Symbol("BTCUSDT"));
    }
}
