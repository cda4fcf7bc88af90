use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Document,
    Video,
    Forum,
    News,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentType::Document => write!(f, "document"),
            ContentType::Video => write!(f, "video"),
            ContentType::Forum => write!(f, "forum"),
            ContentType::News => write!(f, "news"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Certification {
    Verified,
    Partial,
    Unverified,
}

impl std::fmt::Display for Certification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Certification::Verified => write!(f, "verified"),
            Certification::Partial => write!(f, "partial"),
            Certification::Unverified => write!(f, "unverified"),
        }
    }
}

// --- Search results ---

/// The three projections of a result the viewer can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResultContent {
    /// Main content in "data" mode: structured text, a transcript, or the accepted answer.
    pub data: String,
    /// URL of an image directly relevant to the content. Avoid generic placeholders.
    pub image: String,
    /// Full content. For videos a YouTube embed URL (https://www.youtube.com/embed/VIDEO_ID),
    /// for documents a URL to an online PDF, otherwise the full text.
    pub full: String,
}

/// One search hit. Immutable once received from the content service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// A unique identifier for the result, e.g. doc1.
    pub id: String,
    /// Main title of the resource.
    pub title: String,
    /// Where the content comes from (university, YouTube channel, DOI, ISSN).
    pub source: String,
    /// Kind of content.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Certification level of the source.
    pub certification: Certification,
    /// A short, engaging summary (at most 200 characters).
    pub snippet: String,
    pub content: ResultContent,
}

impl SearchResult {
    /// Whether `content.full` can be shown as an embedded video player.
    pub fn has_video_embed(&self) -> bool {
        self.content_type == ContentType::Video && is_video_embed_url(&self.content.full)
    }
}

/// A link is treated as a playable embed when it points at a YouTube
/// `/embed/<id>` path. No other check of embeddability is made.
pub fn is_video_embed_url(candidate: &str) -> bool {
    let Ok(url) = Url::parse(candidate.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let host = url.host_str().unwrap_or_default();
    let known_host = matches!(
        host,
        "youtube.com" | "www.youtube.com" | "youtube-nocookie.com" | "www.youtube-nocookie.com"
    );
    let video_id = url.path().strip_prefix("/embed/").unwrap_or_default();
    known_host && !video_id.is_empty()
}

// --- Flashcards ---

/// A two-sided study card. Outlives the viewer that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
    pub thumbnail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_uses_type_key() {
        let json = serde_json::json!({
            "id": "vid1",
            "title": "Foxes",
            "source": "Nature channel",
            "type": "video",
            "certification": "partial",
            "snippet": "All about foxes",
            "content": {
                "data": "Transcript",
                "image": "https://img.example/fox.jpg",
                "full": "https://www.youtube.com/embed/abc123"
            }
        });
        let result: SearchResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.content_type, ContentType::Video);
        assert_eq!(result.certification, Certification::Partial);
        assert!(result.has_video_embed());
    }

    #[test]
    fn labels_match_wire_names() {
        assert_eq!(Certification::Verified.to_string(), "verified");
        assert_eq!(Certification::Unverified.to_string(), "unverified");
        assert_eq!(ContentType::News.to_string(), "news");
        assert_eq!(
            serde_json::to_value(Certification::Partial).unwrap(),
            Certification::Partial.to_string()
        );
    }

    #[test]
    fn embed_detection() {
        assert!(is_video_embed_url("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(is_video_embed_url("https://www.youtube-nocookie.com/embed/x?start=3"));
        assert!(!is_video_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_video_embed_url("https://www.youtube.com/embed/"));
        assert!(!is_video_embed_url("https://evil.example/youtube.com/embed/x"));
        assert!(!is_video_embed_url("just a transcript"));
    }
}
