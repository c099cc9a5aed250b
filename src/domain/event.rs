//! Events delivered by the filtered stream.

use super::id::TweetId;

/// Kind of media attached to a tweet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    AnimatedGif,
    Other(String),
}

impl MediaKind {
    /// Parse the media `type` field as delivered on the stream.
    #[must_use]
    pub fn parse(kind: &str) -> Self {
        match kind {
            "photo" => Self::Photo,
            "video" => Self::Video,
            "animated_gif" => Self::AnimatedGif,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A single media attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub kind: MediaKind,
    /// Absent for videos, which only expose a preview image.
    pub url: Option<String>,
}

impl Media {
    /// URL of the attachment if it is a photo that can be classified.
    #[must_use]
    pub fn photo_url(&self) -> Option<&str> {
        match self.kind {
            MediaKind::Photo => self.url.as_deref(),
            _ => None,
        }
    }
}

/// One parsed stream record.
///
/// Built from a single line of the stream and discarded once dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub id: TweetId,
    pub text: String,
    pub media: Vec<Media>,
    /// Tag of the first matching rule. When several rules match, only the
    /// first one decides the route; the ordering itself carries no meaning.
    pub matching_tag: String,
}

impl StreamEvent {
    /// Photo URLs in attachment order.
    pub fn photo_urls(&self) -> impl Iterator<Item = &str> {
        self.media.iter().filter_map(Media::photo_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_photos_are_classifiable() {
        let event = StreamEvent {
            id: TweetId::from("1"),
            text: "look".into(),
            media: vec![
                Media { kind: MediaKind::Video, url: None },
                Media { kind: MediaKind::Photo, url: Some("https://img/1.jpg".into()) },
                Media { kind: MediaKind::parse("animated_gif"), url: Some("https://img/2.gif".into()) },
                Media { kind: MediaKind::Photo, url: Some("https://img/3.jpg".into()) },
            ],
            matching_tag: "has-media".into(),
        };

        let urls: Vec<_> = event.photo_urls().collect();
        assert_eq!(urls, vec!["https://img/1.jpg", "https://img/3.jpg"]);
    }
}
