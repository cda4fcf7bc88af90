//! Prompt texts and fallback wording for the content service.

use ai_client::truncate_to_char_boundary;
use lectern_common::{Flashcard, Language};

/// Prefix of a translation that could not be produced.
pub const TRANSLATION_FAILED_MARKER: &str = "[TRANSLATION FAILED]";

/// Bytes of the selection quoted on the front of a fallback flashcard.
pub const FALLBACK_FRONT_PREFIX_BYTES: usize = 50;

pub const SEARCH_SYSTEM_PROMPT: &str = "You are a world-class semantic search engine. \
     Your task is to index and return a list of certified, varied sources \
     (documents, videos, forum posts, news) that answer the user's query. \
     Provide realistic, directly renderable image and content URLs. \
     Follow the JSON schema strictly.";

pub const FLASHCARD_SYSTEM_PROMPT: &str = "Your role is to create study material. \
     Generate a question (front) and an answer (back) based on the provided text. \
     Follow the JSON schema.";

pub fn search_prompt(query: &str, count: usize, language: Language) -> String {
    format!(
        "Based on the following user query, find {count} diverse, high-quality sources \
         of information. Act as a semantic search engine. Write the results in {}. \
         Query: \"{query}\"",
        language.name(),
    )
}

pub fn translation_system_prompt(language: Language) -> String {
    format!(
        "You are a professional translator. \
         Translate the user's text into {} (language code \"{}\"). \
         Return ONLY the translated text, with no preamble. \
         Preserve proper nouns and URLs as-is.",
        language.name(),
        language.code(),
    )
}

pub fn flashcard_prompt(text: &str) -> String {
    format!("Create the content of a study flashcard from the following text fragment. Text: \"{text}\"")
}

pub fn failed_translation(text: &str) -> String {
    format!("{TRANSLATION_FAILED_MARKER} {text}")
}

/// Best-effort card used when the provider cannot produce one.
pub fn fallback_flashcard(text: &str, image: &str) -> Flashcard {
    let prefix = truncate_to_char_boundary(text, FALLBACK_FRONT_PREFIX_BYTES);
    Flashcard {
        front: format!("What can be inferred from this fragment?: \"{prefix}...\""),
        back: text.to_string(),
        thumbnail: image.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_translation_is_marked() {
        assert_eq!(failed_translation("hola"), "[TRANSLATION FAILED] hola");
    }

    #[test]
    fn fallback_front_truncates() {
        let text = "a".repeat(80);
        let card = fallback_flashcard(&text, "https://img.example/a.png");
        assert_eq!(
            card.front,
            format!("What can be inferred from this fragment?: \"{}...\"", "a".repeat(50))
        );
        assert_eq!(card.back, text);
        assert_eq!(card.thumbnail, "https://img.example/a.png");
    }

    #[test]
    fn search_prompt_mentions_count_and_language() {
        let prompt = search_prompt("black holes", 10, Language::Es);
        assert!(prompt.contains("find 10"));
        assert!(prompt.contains("Spanish"));
        assert!(prompt.contains("\"black holes\""));
    }
}
