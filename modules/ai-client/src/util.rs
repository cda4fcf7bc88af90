use base64::Engine;

use crate::error::{AiError, Result};

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip markdown code blocks from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Turn a base64 image payload into a `data:` URL.
///
/// The payload is decoded to reject empty or corrupt bodies and to pick the
/// MIME type from the magic bytes (PNG when unrecognised).
pub fn image_data_url(b64: &str) -> Result<String> {
    let b64 = b64.trim();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| AiError::Parse(format!("invalid base64 image payload: {e}")))?;
    if bytes.is_empty() {
        return Err(AiError::NoImage);
    }
    Ok(format!("data:{};base64,{}", sniff_image_mime(&bytes), b64))
}

fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hola 世界";
        let truncated = truncate_to_char_boundary(text, 7);
        assert_eq!(truncated, "Hola ");
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn test_truncate_within_bounds() {
        assert_eq!(truncate_to_char_boundary("fox", 50), "fox");
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{\"front\":\"Q\"}\n```"), "{\"front\":\"Q\"}");
        assert_eq!(strip_code_blocks("  {}  "), "{}");
    }

    #[test]
    fn test_image_data_url_detects_png() {
        let png = base64::engine::general_purpose::STANDARD
            .encode([0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let url = image_data_url(&png).unwrap();
        assert_eq!(url, format!("data:image/png;base64,{png}"));
    }

    #[test]
    fn test_image_data_url_detects_jpeg() {
        let jpeg = base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
        assert!(image_data_url(&jpeg).unwrap().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_image_data_url_rejects_empty_and_garbage() {
        assert!(matches!(image_data_url(""), Err(AiError::NoImage)));
        assert!(matches!(image_data_url("not base64!"), Err(AiError::Parse(_))));
    }
}
