//! Static font-metric tables for the two base-14 faces the article PDF uses.
//!
//! Widths are in em units (AFM widths ÷ 1000), so a string's printed width is
//! `Σ width × font size`. Helvetica is a standard PDF font, so these tables are
//! exact for the glyphs we emit and the wrapped rows match what a viewer draws.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// Points per millimetre (72pt per inch, 25.4mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Font face enum
// ────────────────────────────────────────────────────────────────────────────

/// Font faces used by the article renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    /// Body text and the date line.
    Helvetica,
    /// Title and sub-headings.
    HelveticaBold,
}

impl FontFace {
    /// The PDF base-font name for this face.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry and typography of an article page. All lengths are millimetres
/// measured from the top-left corner; font sizes are points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Left edge of paragraphs and sub-headings.
    pub margin_left_mm: f32,
    /// Left edge of list items.
    pub list_indent_mm: f32,
    /// Horizontal span available to wrapped text.
    pub content_width_mm: f32,
    /// Cursor position after a page break.
    pub margin_top_mm: f32,
    /// Cursor position on page 1, below the title and date.
    pub body_start_mm: f32,
    /// Space kept free at the bottom of each page for body rows.
    pub margin_bottom_mm: f32,
    /// Space a sub-heading needs above the bottom edge to stay on the page.
    pub heading_reserve_mm: f32,
    pub title_y_mm: f32,
    pub date_y_mm: f32,
    pub title_size_pt: f32,
    pub date_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    /// Vertical advance per wrapped body row.
    pub line_height_mm: f32,
    /// Vertical advance after a sub-heading.
    pub heading_advance_mm: f32,
    /// Vertical advance for a blank source line.
    pub blank_advance_mm: f32,
}

impl PageConfig {
    /// Horizontal centre of the page, used for the title block.
    pub fn center_x_mm(&self) -> f32 {
        self.page_width_mm / 2.0
    }
}

/// Returns the default article page: A4 portrait, 15mm left margin, 180mm text width.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width_mm: 210.0,
        page_height_mm: 297.0,
        margin_left_mm: 15.0,
        list_indent_mm: 20.0,
        content_width_mm: 180.0,
        margin_top_mm: 20.0,
        body_start_mm: 40.0,
        margin_bottom_mm: 20.0,
        heading_reserve_mm: 30.0,
        title_y_mm: 20.0,
        date_y_mm: 30.0,
        title_size_pt: 18.0,
        date_size_pt: 12.0,
        heading_size_pt: 14.0,
        body_size_pt: 11.0,
        line_height_mm: 7.0,
        heading_advance_mm: 10.0,
        blank_advance_mm: 5.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Width of the list bullet `•` (WinAnsi 0x95).
    pub bullet_width: f32,
    /// Fallback width for any other non-ASCII character.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '•' {
            self.bullet_width
        } else {
            self.average_char_width
        }
    }

    /// Width of `s` in millimetres when set at `size_pt`.
    pub fn width_mm(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt / PT_PER_MM
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFace::Helvetica);
        // "Read" = R(0.722) + e(0.556) + a(0.556) + d(0.556) = 2.390
        let width = metrics.measure_str("Read");
        assert!(
            (width - 2.390).abs() < 1e-3,
            "Read width should be ~2.390, got {width}"
        );
    }

    #[test]
    fn test_bullet_uses_its_own_width() {
        let metrics = get_metrics(FontFace::Helvetica);
        assert!((metrics.measure_str("•") - 0.350).abs() < 1e-4);
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = get_metrics(FontFace::Helvetica);
        let width = metrics.measure_str("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Daily English Reading";
        let regular = get_metrics(FontFace::Helvetica).measure_str(text);
        let bold = get_metrics(FontFace::HelveticaBold).measure_str(text);
        assert!(bold > regular, "bold {bold} should exceed regular {regular}");
    }

    #[test]
    fn test_width_mm_converts_from_points() {
        let metrics = get_metrics(FontFace::Helvetica);
        // Ten spaces at 10pt = 27.8pt ≈ 9.807mm
        let width = metrics.width_mm(&" ".repeat(10), 10.0);
        assert!((width - 9.807).abs() < 1e-2, "got {width}");
    }

    #[test]
    fn test_default_page_config_sanity() {
        let config = default_page_config();
        assert_eq!(config.page_height_mm, 297.0);
        assert_eq!(
            config.margin_left_mm + config.content_width_mm,
            config.page_width_mm - config.margin_left_mm
        );
        assert_eq!(config.center_x_mm(), 105.0);
        assert!(config.body_start_mm > config.date_y_mm);
    }

    #[test]
    fn test_base_font_names() {
        assert_eq!(FontFace::Helvetica.base_font(), "Helvetica");
        assert_eq!(FontFace::HelveticaBold.base_font(), "Helvetica-Bold");
    }
}
