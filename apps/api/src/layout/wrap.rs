//! Greedy word wrap against a millimetre width.
//!
//! Words are separated by single spaces, so a run of spaces survives as a
//! sequence of empty words and the wrapped rows keep the source's column
//! positions. Spaces at a row break are dropped, so continuation rows start
//! flush with the margin. A word wider than the whole line is broken between
//! characters.

use crate::layout::font_metrics::{FontMetricTable, PT_PER_MM};

/// Splits `text` into visual rows no wider than `max_width_mm` at `size_pt`.
///
/// Always returns at least one row; an empty input yields `[""]`.
pub fn split_text_to_size(
    text: &str,
    metrics: &FontMetricTable,
    size_pt: f32,
    max_width_mm: f32,
) -> Vec<String> {
    let space_w = metrics.space_width * size_pt / PT_PER_MM;
    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    let mut first_on_line = true;
    let mut at_break = false;

    for word in text.split(' ') {
        if at_break && word.is_empty() {
            continue;
        }
        at_break = false;

        let word_w = metrics.width_mm(word, size_pt);
        let sep_w = if first_on_line { 0.0 } else { space_w };

        if !first_on_line && current_width + sep_w + word_w > max_width_mm {
            rows.push(std::mem::take(&mut current));
            current_width = 0.0;
            first_on_line = true;
            if word.is_empty() {
                at_break = true;
                continue;
            }
        }

        if word_w > max_width_mm {
            // Only reachable at the start of a row.
            for ch in word.chars() {
                let ch_w = metrics.width_mm(ch.encode_utf8(&mut [0; 4]), size_pt);
                if !current.is_empty() && current_width + ch_w > max_width_mm {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(ch);
                current_width += ch_w;
            }
            first_on_line = false;
            continue;
        }

        if !first_on_line {
            current.push(' ');
            current_width += sep_w;
        }
        current.push_str(word);
        current_width += word_w;
        first_on_line = false;
    }
    rows.push(current);
    rows
}
