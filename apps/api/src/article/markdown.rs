//! Metadata and plain-text views of a generated Markdown article.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").expect("title pattern is valid"));
static SUBTITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^##\s+(.+)$").expect("subtitle pattern is valid"));
static HEADING_MARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#{1,6}\s+").expect("heading mark pattern is valid"));

/// Headings pulled out of an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleOutline {
    /// Text of the first `# ` heading, if any.
    pub title: Option<String>,
    /// Text of every `## ` heading, in order.
    pub subtitles: Vec<String>,
}

pub fn parse_outline(markdown: &str) -> ArticleOutline {
    let title = TITLE_RE
        .captures(markdown)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty());
    let subtitles = SUBTITLE_RE
        .captures_iter(markdown)
        .map(|c| c[1].trim().to_string())
        .collect();
    ArticleOutline { title, subtitles }
}

/// The article as it should be read aloud: heading marks and bold markers removed.
pub fn narration_text(markdown: &str) -> String {
    HEADING_MARK_RE.replace_all(markdown, "").replace("**", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "# Green Cities\n\nIntro text.\n\n## Why Trees Matter\nShade.\n\n## What You Can Do\n- **Plant** one\n";

    #[test]
    fn test_parse_outline_finds_title_and_subtitles() {
        let outline = parse_outline(ARTICLE);
        assert_eq!(outline.title.as_deref(), Some("Green Cities"));
        assert_eq!(outline.subtitles, vec!["Why Trees Matter", "What You Can Do"]);
    }

    #[test]
    fn test_parse_outline_without_headings() {
        let outline = parse_outline("just text\n### deep");
        assert_eq!(outline, ArticleOutline::default());
    }

    #[test]
    fn test_subtitle_is_not_taken_as_title() {
        let outline = parse_outline("## Only Sub\nbody");
        assert_eq!(outline.title, None);
        assert_eq!(outline.subtitles, vec!["Only Sub"]);
    }

    #[test]
    fn test_narration_text_strips_markup() {
        assert_eq!(
            narration_text(ARTICLE),
            "Green Cities\n\nIntro text.\n\nWhy Trees Matter\nShade.\n\nWhat You Can Do\n- Plant one\n"
        );
    }
}
