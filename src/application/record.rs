//! Parsing of a single filtered-stream record into a [`StreamEvent`].

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Media, MediaKind, StreamEvent, TweetId};

/// Why a non-blank line did not yield an event.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("record has no data payload")]
    MissingPayload,

    #[error("record has no tagged matching rule")]
    NoMatchingRule,
}

#[derive(Deserialize)]
struct RawRecord {
    data: Option<RawTweet>,
    #[serde(default)]
    includes: RawIncludes,
    #[serde(default)]
    matching_rules: Vec<RawMatchingRule>,
}

#[derive(Deserialize)]
struct RawTweet {
    id: String,
    #[serde(default)]
    text: String,
    attachments: Option<RawAttachments>,
}

#[derive(Deserialize)]
struct RawAttachments {
    #[serde(default)]
    media_keys: Vec<String>,
}

#[derive(Deserialize, Default)]
struct RawIncludes {
    #[serde(default)]
    media: Vec<RawMedia>,
}

#[derive(Deserialize)]
struct RawMedia {
    media_key: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    url: Option<String>,
}

#[derive(Deserialize)]
struct RawMatchingRule {
    tag: Option<String>,
}

impl From<&RawMedia> for Media {
    fn from(raw: &RawMedia) -> Self {
        Self {
            kind: MediaKind::parse(&raw.kind),
            url: raw.url.clone(),
        }
    }
}

/// Parse one non-blank stream line.
///
/// Only the first matching rule's tag is kept.
pub fn parse_record(line: &str) -> Result<StreamEvent, RecordError> {
    let record: RawRecord = serde_json::from_str(line)?;
    let tweet = record.data.ok_or(RecordError::MissingPayload)?;
    let matching_tag = record
        .matching_rules
        .into_iter()
        .next()
        .and_then(|rule| rule.tag)
        .ok_or(RecordError::NoMatchingRule)?;

    let media = ordered_media(tweet.attachments.as_ref(), &record.includes.media);

    Ok(StreamEvent {
        id: TweetId::new(tweet.id),
        text: tweet.text,
        media,
        matching_tag,
    })
}

/// Media in the tweet's attachment order when it lists keys, otherwise in the
/// order the expansion delivered them.
fn ordered_media(attachments: Option<&RawAttachments>, included: &[RawMedia]) -> Vec<Media> {
    let keys = attachments.map(|a| a.media_keys.as_slice()).unwrap_or_default();
    if keys.is_empty() {
        return included.iter().map(Media::from).collect();
    }

    let by_key: HashMap<&str, &RawMedia> = included
        .iter()
        .filter_map(|m| m.media_key.as_deref().map(|key| (key, m)))
        .collect();
    keys.iter()
        .filter_map(|key| by_key.get(key.as_str()).copied())
        .map(Media::from)
        .collect()
}
