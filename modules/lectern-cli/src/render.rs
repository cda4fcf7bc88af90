//! Plain-text rendering of the app state for the terminal.

use lectern_app::{App, CardFace, ContentPane, FlashcardPresenter, ResultViewer};
use lectern_common::SearchResult;

pub fn screen(app: &App) {
    if let Some(line) = app.status_line() {
        println!("{line}");
    }
    results(app.results());
    if let Some(viewer) = app.viewer() {
        viewer_panel(viewer);
    }
    if let Some(presenter) = app.flashcard() {
        flashcard(presenter);
    }
}

pub fn results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        println!(
            "{:>2}. [{}] {} ({}, {})",
            i + 1,
            result.content_type,
            result.title,
            result.source,
            result.certification
        );
        println!("    {}", result.snippet);
    }
}

pub fn viewer_panel(viewer: &ResultViewer) {
    let result = viewer.result();
    println!();
    println!(
        "== {} [{} | lang {}] ==",
        result.title,
        viewer.mode(),
        viewer.language()
    );

    match viewer.pane() {
        ContentPane::Text { text, translated } => {
            if translated {
                println!("(translated)");
            }
            println!("{text}");
        }
        ContentPane::Image {
            src,
            generated,
            generating,
            prompt,
        } => {
            let origin = if generated { "generated" } else { "original" };
            println!("image ({origin}): {}", abbreviate(src));
            if generating {
                println!("generating...");
            }
            if let Some(reason) = viewer.image_failure() {
                println!("last generation failed: {reason}");
            }
            if !prompt.is_empty() {
                println!("prompt: {prompt}");
            }
        }
        ContentPane::VideoEmbed { url, title } => println!("video \"{title}\": {url}"),
        ContentPane::DocumentEmbed { url, title } => println!("document \"{title}\": {url}"),
    }

    if let Some(panel) = viewer.translation_panel() {
        println!("-- translated content --");
        println!("{}", panel.as_str());
    }
    if let Some(selection) = viewer.selection() {
        println!("selection: \"{selection}\"");
    }
    if viewer.is_translating() {
        println!("translating...");
    }
    if viewer.is_creating_flashcard() {
        println!("creating flashcard...");
    }
}

pub fn flashcard(presenter: &FlashcardPresenter) {
    println!();
    match presenter.face() {
        CardFace::Front { text, thumbnail } => {
            println!("[flashcard front] {text}");
            println!("  thumbnail: {}", abbreviate(thumbnail));
        }
        CardFace::Back { text } => println!("[flashcard back] {text}"),
    }
    println!("  (flip / dismiss)");
}

/// Data URLs can be megabytes long.
fn abbreviate(src: &str) -> String {
    const MAX: usize = 80;
    if src.len() <= MAX {
        return src.to_string();
    }
    let head = ai_client::truncate_to_char_boundary(src, MAX);
    format!("{head}... ({} bytes)", src.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_sources_are_abbreviated() {
        let data_url = format!("data:image/png;base64,{}", "A".repeat(500));
        let shown = abbreviate(&data_url);
        assert!(shown.starts_with("data:image/png;base64,"));
        assert!(shown.ends_with("(522 bytes)"));
        assert_eq!(abbreviate("https://img.example/a.png"), "https://img.example/a.png");
    }
}
