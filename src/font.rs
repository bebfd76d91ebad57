//! Metrics for the standard-14 Helvetica family.
//!
//! Reports only use the built-in PDF fonts, so nothing is embedded and widths
//! come from the Adobe AFM tables (units of 1/1000 em).

use crate::types::Pt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl StandardFont {
    pub const ALL: [StandardFont; 4] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
    ];

    pub fn pdf_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    pub fn from_pdf_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|font| font.pdf_name() == name)
    }

    pub fn is_bold(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    pub fn is_italic(self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaOblique | StandardFont::HelveticaBoldOblique
        )
    }

    pub fn with_traits(self, bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }

    pub fn bold(self) -> Self {
        self.with_traits(true, self.is_italic())
    }

    pub fn italic(self) -> Self {
        self.with_traits(self.is_bold(), true)
    }

    fn advance(self, ch: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_ASCII
        } else {
            &HELVETICA_ASCII
        };
        let code = ch as u32;
        if (32..=126).contains(&code) {
            return table[(code - 32) as usize];
        }
        let extra = if self.is_bold() {
            bold_extra_width(ch)
        } else {
            regular_extra_width(ch)
        };
        extra.unwrap_or(MISSING_WIDTH)
    }
}

const MISSING_WIDTH: u16 = 556;

/// Helvetica, space (32) through tilde (126).
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold, space (32) through tilde (126).
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

fn regular_extra_width(ch: char) -> Option<u16> {
    Some(match ch {
        '\u{00A0}' => 278,
        '\u{2018}' | '\u{2019}' | '\u{201A}' => 222,
        '\u{201C}' | '\u{201D}' | '\u{201E}' => 333,
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' | '\u{2030}' | '\u{2122}' => 1000,
        '\u{20AC}' | '\u{00A2}' | '\u{00A3}' | '\u{00A5}' | '\u{00A7}' => 556,
        '\u{00A9}' | '\u{00AE}' => 737,
        '\u{00B0}' => 400,
        '\u{00B1}' | '\u{00D7}' | '\u{00F7}' => 584,
        '\u{00B7}' => 278,
        _ => return None,
    })
}

fn bold_extra_width(ch: char) -> Option<u16> {
    Some(match ch {
        '\u{00A0}' => 278,
        '\u{2018}' | '\u{2019}' | '\u{201A}' => 278,
        '\u{201C}' | '\u{201D}' | '\u{201E}' => 500,
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' | '\u{2030}' | '\u{2122}' => 1000,
        '\u{20AC}' | '\u{00A2}' | '\u{00A3}' | '\u{00A5}' | '\u{00A7}' => 556,
        '\u{00A9}' | '\u{00AE}' => 737,
        '\u{00B0}' => 400,
        '\u{00B1}' | '\u{00D7}' | '\u{00F7}' => 584,
        '\u{00B7}' => 278,
        _ => return None,
    })
}

pub fn text_width(font: StandardFont, font_size: Pt, text: &str) -> Pt {
    let units: i64 = text.chars().map(|ch| font.advance(ch) as i64).sum();
    Pt::from_milli_i64(font_size.to_milli_i64().saturating_mul(units) / 1000)
}

/// Distance from the baseline to the top of the tallest glyphs.
pub fn ascent(font_size: Pt) -> Pt {
    font_size.mul_ratio(718, 1000)
}

pub fn descent(font_size: Pt) -> Pt {
    font_size.mul_ratio(207, 1000)
}

/// Baseline offset for a line box of height `leading` starting at its top edge.
pub fn baseline_offset(font_size: Pt, leading: Pt) -> Pt {
    let glyph_height = ascent(font_size) + descent(font_size);
    (leading - glyph_height).max(Pt::ZERO).mul_ratio(1, 2) + ascent(font_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_afm_tables() {
        let ten = Pt::from_f32(10.0);
        // H = 722, i = 222
        assert_eq!(
            text_width(StandardFont::Helvetica, ten, "Hi").to_milli_i64(),
            9_440
        );
        // Bold i is wider than regular i.
        assert!(
            text_width(StandardFont::HelveticaBold, ten, "i")
                > text_width(StandardFont::Helvetica, ten, "i")
        );
        assert_eq!(
            text_width(StandardFont::HelveticaOblique, ten, "Hi"),
            text_width(StandardFont::Helvetica, ten, "Hi")
        );
    }

    #[test]
    fn unknown_glyphs_use_missing_width() {
        let size = Pt::from_f32(1000.0);
        assert_eq!(
            text_width(StandardFont::Helvetica, size, "\u{2588}").to_milli_i64(),
            556_000
        );
        assert_eq!(
            text_width(StandardFont::Helvetica, size, "\u{2014}").to_milli_i64(),
            1_000_000
        );
    }

    #[test]
    fn traits_round_trip_through_variants() {
        assert_eq!(StandardFont::Helvetica.bold(), StandardFont::HelveticaBold);
        assert_eq!(
            StandardFont::HelveticaBold.italic(),
            StandardFont::HelveticaBoldOblique
        );
        assert_eq!(
            StandardFont::from_pdf_name("Helvetica-Oblique"),
            Some(StandardFont::HelveticaOblique)
        );
        assert_eq!(StandardFont::from_pdf_name("Times-Roman"), None);
    }

    #[test]
    fn baseline_sits_inside_line_box() {
        let size = Pt::from_f32(10.0);
        let leading = Pt::from_f32(14.0);
        let offset = baseline_offset(size, leading);
        assert!(offset > ascent(size));
        assert!(offset + descent(size) < leading);
    }
}
