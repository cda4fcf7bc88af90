//! What the content pane shows for the current view mode.

use lectern_common::ContentType;

use super::{ResultViewer, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPane<'a> {
    /// Plain text: `content.data` in data mode, or the full-text fallback.
    /// `translated` is set when the text shown is a translation.
    Text { text: &'a str, translated: bool },
    /// Generated image if any, else the result's own image, with the prompt box below.
    Image {
        src: &'a str,
        generated: bool,
        generating: bool,
        prompt: &'a str,
    },
    VideoEmbed { url: &'a str, title: &'a str },
    DocumentEmbed { url: &'a str, title: &'a str },
}

impl ContentPane<'_> {
    /// Only text panes accept a selection for flashcards.
    pub fn is_selectable(&self) -> bool {
        matches!(self, ContentPane::Text { .. })
    }
}

pub(super) fn project(viewer: &ResultViewer) -> ContentPane<'_> {
    let result = viewer.result();
    let translation = viewer
        .translation()
        .map(|t| t.as_str())
        .filter(|t| !t.is_empty());

    match viewer.mode() {
        ViewMode::Data => text_pane(translation, &result.content.data),
        ViewMode::Image => ContentPane::Image {
            src: viewer
                .generated_image()
                .unwrap_or(result.content.image.as_str()),
            generated: viewer.generated_image().is_some(),
            generating: viewer.is_generating_image(),
            prompt: viewer.prompt(),
        },
        ViewMode::Full => {
            if result.has_video_embed() {
                ContentPane::VideoEmbed {
                    url: &result.content.full,
                    title: &result.title,
                }
            } else if result.content_type == ContentType::Document {
                ContentPane::DocumentEmbed {
                    url: &result.content.full,
                    title: &result.title,
                }
            } else {
                text_pane(translation, &result.content.full)
            }
        }
    }
}

fn text_pane<'a>(translation: Option<&'a str>, original: &'a str) -> ContentPane<'a> {
    match translation {
        Some(text) => ContentPane::Text {
            text,
            translated: true,
        },
        None => ContentPane::Text {
            text: original,
            translated: false,
        },
    }
}
