//! Page Layout Engine — places a classified article body onto fixed-size pages.
//!
//! # Stepping model
//! Layout state is an explicit `LayoutCursor { page_index, y_mm }`. Each source
//! line goes through `LayoutEngine::step`, which takes the cursor by value,
//! appends runs to the document, and returns the advanced cursor.
//!
//! # Pagination
//! - Sub-heading: breaks first when `y > H - heading_reserve`.
//! - Paragraph / list item: the whole wrapped block is checked up front and
//!   moved to a fresh page when `y + rows × line_height > H - margin_bottom`.
//!   A block taller than a page starts at the top of a fresh page and then
//!   continues row by row.
//!
//! The engine never fails: lines that match nothing render as plain paragraphs.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::classifier::extract_article_body;
use crate::layout::font_metrics::{default_page_config, get_metrics, FontFace, PageConfig};
use crate::layout::wrap::split_text_to_size;

/// Title used when the article has no `# ` heading.
pub const FALLBACK_TITLE: &str = "Daily English Reading";

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Align {
    /// `x_mm` is the left edge of the text.
    Left,
    /// `x_mm` is the horizontal centre of the text.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunKind {
    Title,
    Date,
    Heading,
    Paragraph,
    ListItem,
}

/// A single placed line of text. `y_mm` is the baseline, measured from the page top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    pub kind: RunKind,
    pub x_mm: f32,
    pub y_mm: f32,
    pub face: FontFace,
    pub size_pt: f32,
    pub align: Align,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub runs: Vec<Run>,
}

/// A laid-out article, ready to be handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub date: String,
    pub config: PageConfig,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All runs in placement order, paired with their page index.
    pub fn runs(&self) -> impl Iterator<Item = (usize, &Run)> {
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(i, page)| page.runs.iter().map(move |run| (i, run)))
    }
}

/// Where the next line goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub page_index: usize,
    pub y_mm: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Line classification
// ────────────────────────────────────────────────────────────────────────────

static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\s+").expect("title pattern is valid"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##\s+").expect("heading pattern is valid"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[*-]\s+").expect("bullet pattern is valid"));

/// How a single trimmed source line is typeset.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Blank,
    /// `# ...`, already rendered as the document title.
    Title,
    Heading(String),
    ListItem(String),
    Paragraph(String),
}

/// Removes `**bold**` markers and replaces every non-ASCII character with one space.
pub fn clean_body_line(line: &str) -> String {
    BOLD_RE
        .replace_all(line, "$1")
        .chars()
        .map(|c| if c.is_ascii() { c } else { ' ' })
        .collect()
}

pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if TITLE_RE.is_match(line) {
        return LineKind::Title;
    }
    if HEADING_RE.is_match(line) {
        return LineKind::Heading(HEADING_RE.replace(line, "").into_owned());
    }

    let plain = clean_body_line(line);
    if BULLET_RE.is_match(&plain) {
        LineKind::ListItem(BULLET_RE.replace(&plain, "• ").into_owned())
    } else {
        LineKind::Paragraph(plain)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct LayoutEngine<'a> {
    config: &'a PageConfig,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a PageConfig) -> Self {
        Self { config }
    }

    /// Creates page 1 with the centred title and date, and the cursor below them.
    pub fn start(&self, title: &str, date: &str) -> (Document, LayoutCursor) {
        let title = if title.trim().is_empty() {
            FALLBACK_TITLE
        } else {
            title
        };
        let cfg = self.config;
        let header = vec![
            Run {
                text: title.to_string(),
                kind: RunKind::Title,
                x_mm: cfg.center_x_mm(),
                y_mm: cfg.title_y_mm,
                face: FontFace::HelveticaBold,
                size_pt: cfg.title_size_pt,
                align: Align::Center,
            },
            Run {
                text: format!("Date: {date}"),
                kind: RunKind::Date,
                x_mm: cfg.center_x_mm(),
                y_mm: cfg.date_y_mm,
                face: FontFace::Helvetica,
                size_pt: cfg.date_size_pt,
                align: Align::Center,
            },
        ];

        let doc = Document {
            title: title.to_string(),
            date: date.to_string(),
            config: cfg.clone(),
            pages: vec![Page { runs: header }],
        };
        let cursor = LayoutCursor {
            page_index: 0,
            y_mm: cfg.body_start_mm,
        };
        (doc, cursor)
    }

    /// Lays out one source line and returns the advanced cursor.
    pub fn step(&self, doc: &mut Document, cursor: LayoutCursor, line: &str) -> LayoutCursor {
        let cfg = self.config;
        match classify_line(line) {
            LineKind::Blank => LayoutCursor {
                y_mm: cursor.y_mm + cfg.blank_advance_mm,
                ..cursor
            },
            LineKind::Title => cursor,
            LineKind::Heading(text) => {
                let mut cursor = cursor;
                if cursor.y_mm > cfg.page_height_mm - cfg.heading_reserve_mm {
                    cursor = self.new_page(doc);
                }
                place(
                    doc,
                    cursor,
                    Run {
                        text,
                        kind: RunKind::Heading,
                        x_mm: cfg.margin_left_mm,
                        y_mm: cursor.y_mm,
                        face: FontFace::HelveticaBold,
                        size_pt: cfg.heading_size_pt,
                        align: Align::Left,
                    },
                );
                LayoutCursor {
                    y_mm: cursor.y_mm + cfg.heading_advance_mm,
                    ..cursor
                }
            }
            LineKind::ListItem(text) => {
                self.place_block(doc, cursor, &text, RunKind::ListItem, cfg.list_indent_mm)
            }
            LineKind::Paragraph(text) => {
                self.place_block(doc, cursor, &text, RunKind::Paragraph, cfg.margin_left_mm)
            }
        }
    }

    fn place_block(
        &self,
        doc: &mut Document,
        cursor: LayoutCursor,
        text: &str,
        kind: RunKind,
        x_mm: f32,
    ) -> LayoutCursor {
        let cfg = self.config;
        let metrics = get_metrics(FontFace::Helvetica);
        let rows = split_text_to_size(text, metrics, cfg.body_size_pt, cfg.content_width_mm);
        let bottom = cfg.page_height_mm - cfg.margin_bottom_mm;
        let block_height = rows.len() as f32 * cfg.line_height_mm;

        let mut cursor = cursor;
        if cursor.y_mm + block_height > bottom && !self.at_page_top(cursor) {
            cursor = self.new_page(doc);
        }

        for row in rows {
            // Only an oversized block reaches this break.
            if cursor.y_mm + cfg.line_height_mm > bottom && !self.at_page_top(cursor) {
                cursor = self.new_page(doc);
            }
            place(
                doc,
                cursor,
                Run {
                    text: row,
                    kind,
                    x_mm,
                    y_mm: cursor.y_mm,
                    face: FontFace::Helvetica,
                    size_pt: cfg.body_size_pt,
                    align: Align::Left,
                },
            );
            cursor.y_mm += cfg.line_height_mm;
        }
        cursor
    }

    fn at_page_top(&self, cursor: LayoutCursor) -> bool {
        cursor.page_index > 0 && cursor.y_mm <= self.config.margin_top_mm
    }

    fn new_page(&self, doc: &mut Document) -> LayoutCursor {
        doc.pages.push(Page::default());
        debug!(page = doc.pages.len(), "layout: new page");
        LayoutCursor {
            page_index: doc.pages.len() - 1,
            y_mm: self.config.margin_top_mm,
        }
    }
}

fn place(doc: &mut Document, cursor: LayoutCursor, run: Run) {
    doc.pages[cursor.page_index].runs.push(run);
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Lays out an already-classified body under the title/date header.
pub fn layout_body(body: &str, title: &str, date: &str, config: &PageConfig) -> Document {
    let engine = LayoutEngine::new(config);
    let (mut doc, mut cursor) = engine.start(title, date);
    for line in body.split('\n') {
        cursor = engine.step(&mut doc, cursor, line);
    }
    doc
}

/// Classifies `markdown`, drops its vocabulary section, and lays out the rest on A4 pages.
pub fn render_article_document(markdown: &str, title: &str, date: &str) -> Document {
    let body = extract_article_body(markdown);
    layout_body(&body, title, date, &default_page_config())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_runs(doc: &Document) -> Vec<(usize, &Run)> {
        doc.runs()
            .filter(|(_, r)| !matches!(r.kind, RunKind::Title | RunKind::Date))
            .collect()
    }

    fn long_paragraph(sentences: usize) -> String {
        "Cities around the world are testing new ways to move people quickly. ".repeat(sentences)
    }

    #[test]
    fn test_example_article_renders_heading_and_paragraph() {
        let md = "# Title\n\n## Intro\nHello world.\n\n## Vocabulary\n1. arduous (adj.)\n";
        let doc = render_article_document(md, "Title", "2024-05-01");

        assert_eq!(doc.page_count(), 1);
        let header: Vec<&str> = doc.pages[0].runs[..2].iter().map(|r| r.text.as_str()).collect();
        assert_eq!(header, vec!["Title", "Date: 2024-05-01"]);

        let body = body_runs(&doc);
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].1.kind, RunKind::Heading);
        assert_eq!(body[0].1.text, "Intro");
        assert_eq!(body[0].1.y_mm, 45.0); // 40 + blank line
        assert_eq!(body[1].1.kind, RunKind::Paragraph);
        assert_eq!(body[1].1.text, "Hello world.");
        assert_eq!(body[1].1.y_mm, 55.0);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let md = format!("# T\n## A\n{}\n- one\n- two\n", long_paragraph(30));
        let first = render_article_document(&md, "T", "2024-05-01");
        let second = render_article_document(&md, "T", "2024-05-01");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        let doc = render_article_document("", "", "2024-05-01");
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].runs.len(), 2);
        assert_eq!(doc.title, FALLBACK_TITLE);
        assert_eq!(doc.pages[0].runs[0].align, Align::Center);
    }

    #[test]
    fn test_clean_body_line_replaces_each_non_ascii_char() {
        let cleaned = clean_body_line("café 你好");
        assert_eq!(cleaned, "caf    ");
        assert_eq!(cleaned.chars().count(), "café 你好".chars().count());
        assert_eq!(clean_body_line("a **bold** move"), "a bold move");
    }

    #[test]
    fn test_classify_line_kinds() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("# Title"), LineKind::Title);
        assert_eq!(classify_line("## Part"), LineKind::Heading("Part".into()));
        assert_eq!(
            classify_line("- **key** point"),
            LineKind::ListItem("• key point".into())
        );
        assert_eq!(classify_line("* item"), LineKind::ListItem("• item".into()));
        assert_eq!(
            classify_line("### Deeper"),
            LineKind::Paragraph("### Deeper".into())
        );
        assert_eq!(classify_line("-no space"), LineKind::Paragraph("-no space".into()));
    }

    #[test]
    fn test_list_items_are_indented() {
        let doc = render_article_document("- first\nplain", "T", "2024-05-01");
        let body = body_runs(&doc);
        assert_eq!(body[0].1.x_mm, 20.0);
        assert_eq!(body[0].1.text, "• first");
        assert_eq!(body[1].1.x_mm, 15.0);
        assert_eq!(body[1].1.y_mm, 47.0);
    }

    #[test]
    fn test_block_that_does_not_fit_moves_to_new_page() {
        let config = default_page_config();
        let engine = LayoutEngine::new(&config);
        let (mut doc, _) = engine.start("T", "2024-05-01");

        let text = long_paragraph(4); // wraps to three rows
        let cursor = LayoutCursor { page_index: 0, y_mm: 260.0 };
        let cursor = engine.step(&mut doc, cursor, &text);

        assert_eq!(doc.page_count(), 2);
        let ys: Vec<f32> = doc.pages[1].runs.iter().map(|r| r.y_mm).collect();
        assert_eq!(ys, vec![20.0, 27.0, 34.0]);
        assert_eq!(cursor, LayoutCursor { page_index: 1, y_mm: 41.0 });
    }

    #[test]
    fn test_list_item_that_does_not_fit_moves_to_new_page() {
        let config = default_page_config();
        let engine = LayoutEngine::new(&config);
        let (mut doc, _) = engine.start("T", "2024-05-01");

        let line = format!("- {}", long_paragraph(4).trim_end());
        let cursor = LayoutCursor { page_index: 0, y_mm: 270.0 };
        let cursor = engine.step(&mut doc, cursor, &line);

        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[0].runs.iter().all(|r| r.kind != RunKind::ListItem));
        let rows = &doc.pages[1].runs;
        assert!(rows.len() >= 2, "expected a wrapped item, got {} rows", rows.len());
        assert!(rows[0].text.starts_with("• Cities"));
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.kind, RunKind::ListItem);
            assert_eq!(row.x_mm, 20.0);
            assert_eq!(row.y_mm, 20.0 + 7.0 * i as f32);
        }
        assert_eq!(
            cursor,
            LayoutCursor { page_index: 1, y_mm: 20.0 + 7.0 * rows.len() as f32 }
        );
    }

    #[test]
    fn test_block_that_fits_stays_on_page() {
        let config = default_page_config();
        let engine = LayoutEngine::new(&config);
        let (mut doc, _) = engine.start("T", "2024-05-01");

        let cursor = LayoutCursor { page_index: 0, y_mm: 263.0 };
        let cursor = engine.step(&mut doc, cursor, "One short line.");
        assert_eq!(doc.page_count(), 1);
        assert_eq!(cursor.y_mm, 270.0);
    }

    #[test]
    fn test_heading_near_bottom_moves_to_new_page() {
        let config = default_page_config();
        let engine = LayoutEngine::new(&config);
        let (mut doc, _) = engine.start("T", "2024-05-01");

        let kept = engine.step(&mut doc, LayoutCursor { page_index: 0, y_mm: 267.0 }, "## Kept");
        assert_eq!(kept, LayoutCursor { page_index: 0, y_mm: 277.0 });

        let pushed = engine.step(&mut doc, LayoutCursor { page_index: 0, y_mm: 268.0 }, "## Pushed");
        assert_eq!(pushed, LayoutCursor { page_index: 1, y_mm: 30.0 });
        assert_eq!(doc.pages[1].runs[0].text, "Pushed");
        assert_eq!(doc.pages[1].runs[0].y_mm, 20.0);
    }

    #[test]
    fn test_long_article_never_crosses_bottom_margin() {
        let para = long_paragraph(5);
        let md: String = (0..40).map(|i| format!("## Part {i}\n{para}\n\n")).collect();
        let doc = render_article_document(&md, "T", "2024-05-01");
        let config = default_page_config();

        assert!(doc.page_count() > 3);
        for (_, run) in body_runs(&doc) {
            match run.kind {
                RunKind::Heading => {
                    assert!(run.y_mm <= config.page_height_mm - config.heading_reserve_mm)
                }
                _ => assert!(
                    run.y_mm + config.line_height_mm
                        <= config.page_height_mm - config.margin_bottom_mm
                ),
            }
        }
    }

    #[test]
    fn test_wrapped_block_is_never_split_across_pages() {
        let para = long_paragraph(5);
        let md: String = (0..30).map(|_| format!("{para}\n")).collect();
        let config = default_page_config();
        let doc = layout_body(&md, "T", "2024-05-01", &config);

        // Every block wraps to the same number of rows, so consecutive
        // groups of that size must share a page.
        let rows_per_block = split_text_to_size(
            &clean_body_line(para.trim()),
            get_metrics(FontFace::Helvetica),
            config.body_size_pt,
            config.content_width_mm,
        )
        .len();
        let body = body_runs(&doc);
        assert_eq!(body.len(), rows_per_block * 30);
        for block in body.chunks(rows_per_block) {
            let page = block[0].0;
            assert!(block.iter().all(|(p, _)| *p == page));
        }
    }

    #[test]
    fn test_oversized_block_continues_on_following_pages() {
        let config = default_page_config();
        let doc = layout_body(&long_paragraph(200), "T", "2024-05-01", &config);
        assert!(doc.page_count() >= 3);
        // Page 1 holds only the header; the block starts at the top of page 2.
        assert_eq!(doc.pages[0].runs.len(), 2);
        assert_eq!(doc.pages[1].runs[0].y_mm, config.margin_top_mm);
        assert!(doc.pages.iter().all(|p| !p.runs.is_empty()));
    }
}
