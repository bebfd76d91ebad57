//! Brand palette, paragraph style sheet and the stock table styles.

use crate::flowable::TextAlign;
use crate::font::StandardFont;
use crate::table::{CellRange, TableStyle, VerticalAlign};
use crate::types::{Color, Pt};

pub const NAVY: Color = Color::from_rgb8(0x1a, 0x36, 0x5d);
pub const GOLD: Color = Color::from_rgb8(0xd6, 0x9e, 0x2e);
pub const GREEN: Color = Color::from_rgb8(0x38, 0xa1, 0x69);
pub const RED: Color = Color::from_rgb8(0xe5, 0x3e, 0x3e);
pub const GRAY: Color = Color::from_rgb8(0x71, 0x80, 0x96);
pub const LIGHT_GRAY: Color = Color::from_rgb8(0xf7, 0xfa, 0xfc);
pub const MEDIUM_GRAY: Color = Color::from_rgb8(0xe2, 0xe8, 0xf0);
pub const BLUE: Color = Color::from_rgb8(0x31, 0x82, 0xce);
pub const PURPLE: Color = Color::from_rgb8(0x80, 0x5a, 0xd5);
pub const BLACK: Color = Color::BLACK;
pub const WHITE: Color = Color::WHITE;

/// Palette lookup by name (case-insensitive), falling back to `#rrggbb`.
pub fn resolve_color(name: &str) -> Option<Color> {
    let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    let named = match key.as_str() {
        "navy" => NAVY,
        "gold" => GOLD,
        "green" => GREEN,
        "red" => RED,
        "gray" | "grey" => GRAY,
        "light_gray" | "light_grey" => LIGHT_GRAY,
        "medium_gray" | "medium_grey" => MEDIUM_GRAY,
        "blue" => BLUE,
        "purple" => PURPLE,
        "black" => BLACK,
        "white" => WHITE,
        _ => return Color::from_hex(name),
    };
    Some(named)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub name: &'static str,
    pub font: StandardFont,
    pub font_size: Pt,
    pub leading: Pt,
    pub text_color: Color,
    pub alignment: TextAlign,
    pub space_before: Pt,
    pub space_after: Pt,
    pub left_indent: Pt,
}

impl ParagraphStyle {
    /// Plain 10pt Helvetica on 12pt leading.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            font: StandardFont::Helvetica,
            font_size: Pt::from_i32(10),
            leading: Pt::from_i32(12),
            text_color: BLACK,
            alignment: TextAlign::Left,
            space_before: Pt::ZERO,
            space_after: Pt::ZERO,
            left_indent: Pt::ZERO,
        }
    }

    /// Sets the size and resets leading to 1.2x; call `leading` afterwards to override.
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = Pt::from_f32(size);
        self.leading = self.font_size.mul_ratio(6, 5);
        self
    }

    pub fn leading(mut self, leading: f32) -> Self {
        self.leading = Pt::from_f32(leading);
        self
    }

    pub fn font(mut self, font: StandardFont) -> Self {
        self.font = font;
        self
    }

    pub fn bold(self) -> Self {
        let font = self.font.bold();
        self.font(font)
    }

    pub fn color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    pub fn align(mut self, alignment: TextAlign) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn space_before(mut self, space: f32) -> Self {
        self.space_before = Pt::from_f32(space);
        self
    }

    pub fn space_after(mut self, space: f32) -> Self {
        self.space_after = Pt::from_f32(space);
        self
    }

    pub fn left_indent(mut self, indent: f32) -> Self {
        self.left_indent = Pt::from_f32(indent);
        self
    }
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        Self::new("Normal")
    }
}

/// Every paragraph style used by the reports.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    pub title: ParagraphStyle,
    pub subtitle: ParagraphStyle,
    pub h1: ParagraphStyle,
    pub h2: ParagraphStyle,
    pub h3: ParagraphStyle,
    pub body: ParagraphStyle,
    pub body_bold: ParagraphStyle,
    pub small: ParagraphStyle,
    pub bullet: ParagraphStyle,
    pub verdict: ParagraphStyle,
    pub metric_value: ParagraphStyle,
    pub metric_label: ParagraphStyle,
    pub footer: ParagraphStyle,
}

impl StyleSheet {
    pub const KEYS: [&'static str; 13] = [
        "title",
        "subtitle",
        "h1",
        "h2",
        "h3",
        "body",
        "body_bold",
        "small",
        "bullet",
        "verdict",
        "metric_value",
        "metric_label",
        "footer",
    ];

    pub fn brand() -> Self {
        Self {
            title: ParagraphStyle::new("Title")
                .font_size(24.0)
                .bold()
                .color(NAVY)
                .align(TextAlign::Center)
                .space_after(6.0),
            subtitle: ParagraphStyle::new("Subtitle")
                .font_size(12.0)
                .color(GRAY)
                .align(TextAlign::Center)
                .space_after(20.0),
            h1: ParagraphStyle::new("H1")
                .font_size(16.0)
                .bold()
                .color(NAVY)
                .space_before(20.0)
                .space_after(12.0),
            h2: ParagraphStyle::new("H2")
                .font_size(13.0)
                .bold()
                .color(NAVY)
                .space_before(15.0)
                .space_after(8.0),
            h3: ParagraphStyle::new("H3")
                .font_size(11.0)
                .bold()
                .color(BLUE)
                .space_before(10.0)
                .space_after(6.0),
            body: ParagraphStyle::new("Body")
                .font_size(10.0)
                .leading(14.0)
                .space_after(8.0),
            body_bold: ParagraphStyle::new("BodyBold")
                .font_size(10.0)
                .leading(14.0)
                .bold()
                .space_after(8.0),
            small: ParagraphStyle::new("Small")
                .font_size(8.0)
                .leading(10.0)
                .color(GRAY)
                .space_after(4.0),
            bullet: ParagraphStyle::new("Bullet")
                .font_size(10.0)
                .leading(14.0)
                .left_indent(20.0)
                .space_after(4.0),
            verdict: ParagraphStyle::new("Verdict")
                .font_size(14.0)
                .bold()
                .color(WHITE)
                .align(TextAlign::Center)
                .space_before(10.0)
                .space_after(10.0),
            metric_value: ParagraphStyle::new("MetricValue")
                .font_size(18.0)
                .bold()
                .color(NAVY)
                .align(TextAlign::Center),
            metric_label: ParagraphStyle::new("MetricLabel")
                .font_size(9.0)
                .color(GRAY)
                .align(TextAlign::Center),
            footer: ParagraphStyle::new("Footer")
                .font_size(8.0)
                .color(GRAY)
                .align(TextAlign::Center),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParagraphStyle> {
        Some(match key {
            "title" => &self.title,
            "subtitle" => &self.subtitle,
            "h1" => &self.h1,
            "h2" => &self.h2,
            "h3" => &self.h3,
            "body" => &self.body,
            "body_bold" => &self.body_bold,
            "small" => &self.small,
            "bullet" => &self.bullet,
            "verdict" => &self.verdict,
            "metric_value" => &self.metric_value,
            "metric_label" => &self.metric_label,
            "footer" => &self.footer,
            _ => return None,
        })
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::brand()
    }
}

/// Header row in `header`, zebra data rows, gray grid, generous padding.
pub fn standard_table_style(header: Color) -> TableStyle {
    data_table_style(header, 10.0, 9.0, 8.0, 8.0)
}

/// Same layout as [`standard_table_style`] with smaller type and padding.
pub fn compact_table_style(header: Color) -> TableStyle {
    data_table_style(header, 9.0, 8.0, 4.0, 6.0)
}

fn data_table_style(
    header: Color,
    header_size: f32,
    body_size: f32,
    vertical_padding: f32,
    horizontal_padding: f32,
) -> TableStyle {
    let all = CellRange::all();
    let header_row = CellRange::new((0, 0), (-1, 0));
    let body = CellRange::new((0, 1), (-1, -1));
    TableStyle::new()
        .background(header_row, header)
        .text_color(header_row, WHITE)
        .font(header_row, StandardFont::HelveticaBold)
        .font_size(header_row, header_size)
        .font_size(body, body_size)
        .align(all, TextAlign::Left)
        .align(CellRange::new((1, 0), (-1, -1)), TextAlign::Center)
        .valign(all, VerticalAlign::Middle)
        .grid(all, 0.5, GRAY)
        .row_backgrounds(body, vec![WHITE, LIGHT_GRAY])
        .padding(all, vertical_padding, horizontal_padding)
}

/// Layout-only style: centred, top aligned, no rules.
pub fn borderless_table_style() -> TableStyle {
    TableStyle::new()
        .align(CellRange::all(), TextAlign::Center)
        .valign(CellRange::all(), VerticalAlign::Top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_brand_hex_values() {
        assert_eq!(Color::from_hex("#1a365d"), Some(NAVY));
        assert_eq!(Color::from_hex("#d69e2e"), Some(GOLD));
        assert_eq!(Color::from_hex("#38a169"), Some(GREEN));
        assert_eq!(Color::from_hex("#e53e3e"), Some(RED));
        assert_eq!(Color::from_hex("#805ad5"), Some(PURPLE));
    }

    #[test]
    fn colors_resolve_by_name_or_hex() {
        assert_eq!(resolve_color("Green"), Some(GREEN));
        assert_eq!(resolve_color("light-gray"), Some(LIGHT_GRAY));
        assert_eq!(resolve_color("#3182ce"), Some(BLUE));
        assert_eq!(resolve_color("chartreuse"), None);
    }

    #[test]
    fn every_key_resolves() {
        let sheet = StyleSheet::brand();
        for key in StyleSheet::KEYS {
            assert!(sheet.get(key).is_some(), "missing style {key}");
        }
        assert!(sheet.get("h4").is_none());
    }

    #[test]
    fn brand_styles_carry_expected_typography() {
        let sheet = StyleSheet::brand();
        assert_eq!(sheet.title.font_size, Pt::from_i32(24));
        assert_eq!(sheet.title.font, StandardFont::HelveticaBold);
        assert_eq!(sheet.title.alignment, TextAlign::Center);
        assert_eq!(sheet.h3.text_color, BLUE);
        assert_eq!(sheet.body.leading, Pt::from_i32(14));
        assert_eq!(sheet.bullet.left_indent, Pt::from_i32(20));
        assert_eq!(sheet.verdict.text_color, WHITE);
        // Unspecified leading follows the font size.
        assert_eq!(sheet.h1.leading.to_milli_i64(), 19_200);
    }

    #[test]
    fn standard_and_compact_styles_differ_only_in_scale() {
        let standard = standard_table_style(NAVY);
        let compact = compact_table_style(NAVY);
        assert_eq!(standard.commands().len(), compact.commands().len());
        assert_ne!(standard, compact);
        assert!(borderless_table_style().commands().len() == 2);
    }
}
