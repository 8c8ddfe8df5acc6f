//! Serialises a laid-out `Document` to PDF bytes.
//!
//! Text is set in the base-14 Helvetica faces with WinAnsi encoding, so no
//! font program is embedded. Layout coordinates are millimetres from the top
//! edge; PDF user space is points from the bottom edge.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use crate::layout::font_metrics::PT_PER_MM;
use crate::layout::{get_metrics, Align, Document, FontFace};

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

fn resource_name(face: FontFace) -> Name<'static> {
    match face {
        FontFace::Helvetica => REGULAR_FONT,
        FontFace::HelveticaBold => BOLD_FONT,
    }
}

/// Maps text onto WinAnsi bytes. Latin-1 and the list bullet survive; anything
/// else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '•' => 0x95,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Renders every page of `doc` and returns the finished file.
pub fn render_pdf(doc: &Document) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();

    let n = doc.page_count();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .subject(TextStr(&format!("Daily reading for {}", doc.date)));

    pdf.type1_font(regular_id)
        .base_font(Name(FontFace::Helvetica.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(FontFace::HelveticaBold.base_font().as_bytes()))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let cfg = &doc.config;
    let width_pt = cfg.page_width_mm * PT_PER_MM;
    let height_pt = cfg.page_height_mm * PT_PER_MM;

    for (i, page) in doc.pages.iter().enumerate() {
        let mut content = Content::new();
        for run in &page.runs {
            let x_mm = match run.align {
                Align::Left => run.x_mm,
                Align::Center => {
                    run.x_mm - get_metrics(run.face).width_mm(&run.text, run.size_pt) / 2.0
                }
            };
            let bytes = encode_win_ansi(&run.text);
            content
                .begin_text()
                .set_font(resource_name(run.face), run.size_pt)
                .next_line(x_mm * PT_PER_MM, (cfg.page_height_mm - run.y_mm) * PT_PER_MM)
                .show(Str(&bytes))
                .end_text();
        }
        pdf.stream(content_ids[i], &content.finish());

        let mut page_writer = pdf.page(page_ids[i]);
        page_writer
            .media_box(Rect::new(0.0, 0.0, width_pt, height_pt))
            .parent(pages_id)
            .contents(content_ids[i]);
        page_writer
            .resources()
            .fonts()
            .pair(REGULAR_FONT, regular_id)
            .pair(BOLD_FONT, bold_id);
    }

    let bytes = pdf.finish();
    debug!(pages = n, runs = doc.runs().count(), bytes = bytes.len(), "PDF rendered");
    bytes
}
