//! Reusable report widgets: KPI boxes, banners, risk visuals and page chrome.

use crate::canvas::Canvas;
use crate::doc_context::DocContext;
use crate::flowable::{Flowable, Pagination, TextAlign};
use crate::font::StandardFont;
use crate::style::{
    BLUE, GOLD, GRAY, GREEN, LIGHT_GRAY, MEDIUM_GRAY, NAVY, RED, WHITE, borderless_table_style,
};
use crate::table::{CellContent, CellRange, Edge, Table, TableStyle, VerticalAlign};
use crate::types::{Color, Pt, Size};

pub const METRIC_BOX_WIDTH_IN: f32 = 1.4;
pub const METRICS_ROW_BOX_WIDTH_IN: f32 = 1.6;
pub const VERDICT_BANNER_WIDTH_IN: f32 = 6.5;
pub const TIER_HEADER_WIDTH_IN: f32 = 6.8;
pub const CALLOUT_BOX_WIDTH_IN: f32 = 6.8;
pub const SCORE_BADGE_WIDTH_IN: f32 = 1.2;
pub const RISK_SCALE_MAX: u32 = 10;

/// One KPI for [`metrics_row`]; the border defaults to navy.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTile {
    pub value: String,
    pub label: String,
    pub color: Color,
}

impl MetricTile {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: NAVY,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Large value over a small label inside a bordered light-gray box.
pub fn metric_box(value: &str, label: &str, color: Color, width_in: f32) -> Table {
    let all = CellRange::all();
    let value_cell = CellRange::cell(0, 0);
    let label_cell = CellRange::cell(0, 1);
    let style = TableStyle::new()
        .background(all, LIGHT_GRAY)
        .outline(all, 2.0, color)
        .align(all, TextAlign::Center)
        .valign(all, VerticalAlign::Middle)
        .font(value_cell, StandardFont::HelveticaBold)
        .font_size(value_cell, 16.0)
        .font_size(label_cell, 8.0)
        .text_color(value_cell, NAVY)
        .text_color(label_cell, GRAY)
        .padding_edge(all, Edge::Top, 12.0)
        .padding_edge(all, Edge::Bottom, 12.0);
    Table::from_text(vec![vec![value], vec![label]], vec![Pt::inches(width_in)]).with_style(&style)
}

/// Metric boxes side by side in a borderless layout table.
pub fn metrics_row(metrics: &[MetricTile], box_width_in: f32) -> Table {
    let boxes: Vec<CellContent> = metrics
        .iter()
        .map(|tile| {
            CellContent::flowable(metric_box(
                &tile.value,
                &tile.label,
                tile.color,
                METRIC_BOX_WIDTH_IN,
            ))
        })
        .collect();
    let widths = vec![Pt::inches(box_width_in); boxes.len()];
    Table::new(vec![boxes], widths).with_style(&borderless_table_style())
}

fn filled_segments(score: f64, max: u32) -> u32 {
    if !score.is_finite() || score <= 0.0 {
        return 0;
    }
    (score.trunc() as u64).min(u64::from(max)) as u32
}

/// Text bar: one `█` per whole point, `░` for the rest of the scale.
pub fn risk_bar(score: f64, max: u32) -> String {
    let filled = filled_segments(score, max) as usize;
    let empty = max as usize - filled;
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(empty))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    pub fn glyph(self) -> &'static str {
        match self {
            TrafficLight::Green => "\u{1F7E2}",
            TrafficLight::Yellow => "\u{1F7E1}",
            TrafficLight::Red => "\u{1F534}",
        }
    }

    pub fn color(self) -> Color {
        match self {
            TrafficLight::Green => GREEN,
            TrafficLight::Yellow => GOLD,
            TrafficLight::Red => RED,
        }
    }
}

/// 7 and up is green, 5 and up yellow, anything lower red.
pub fn risk_indicator(score: f64) -> TrafficLight {
    if score >= 7.0 {
        TrafficLight::Green
    } else if score >= 5.0 {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

/// [`risk_bar`] drawn as filled/empty segments, for use inside table cells.
#[derive(Debug, Clone)]
pub struct RiskMeter {
    filled: u32,
    max: u32,
    filled_color: Color,
    empty_color: Color,
}

impl RiskMeter {
    const SEGMENT_WIDTH: f32 = 7.0;
    const SEGMENT_HEIGHT: f32 = 9.0;
    const GAP: f32 = 1.5;

    pub fn new(score: f64, max: u32) -> Self {
        Self {
            filled: filled_segments(score, max),
            max,
            filled_color: NAVY,
            empty_color: MEDIUM_GRAY,
        }
    }

    pub fn filled(&self) -> u32 {
        self.filled
    }
}

impl Flowable for RiskMeter {
    fn wrap(&self, _avail_width: Pt, _avail_height: Pt) -> Size {
        let segments = self.max as i32;
        let gaps = (segments - 1).max(0);
        Size {
            width: Pt::from_f32(Self::SEGMENT_WIDTH) * segments + Pt::from_f32(Self::GAP) * gaps,
            height: Pt::from_f32(Self::SEGMENT_HEIGHT),
        }
    }

    fn split(
        &self,
        _avail_width: Pt,
        _avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        None
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, _avail_width: Pt, _avail_height: Pt) {
        let width = Pt::from_f32(Self::SEGMENT_WIDTH);
        let height = Pt::from_f32(Self::SEGMENT_HEIGHT);
        let step = width + Pt::from_f32(Self::GAP);
        for idx in 0..self.max {
            let color = if idx < self.filled {
                self.filled_color
            } else {
                self.empty_color
            };
            canvas.set_fill_color(color);
            canvas.fill_rect(x + step * (idx as i32), y, width, height);
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::default()
    }

    fn debug_name(&self) -> &'static str {
        "RiskMeter"
    }
}

fn banner(text: &str, background: Color, font_size: f32, padding: f32, width_in: f32) -> Table {
    let all = CellRange::all();
    let style = TableStyle::new()
        .background(all, background)
        .text_color(all, WHITE)
        .align(all, TextAlign::Center)
        .font(all, StandardFont::HelveticaBold)
        .font_size(all, font_size)
        .padding_edge(all, Edge::Top, padding)
        .padding_edge(all, Edge::Bottom, padding);
    Table::from_text(vec![vec![text]], vec![Pt::inches(width_in)]).with_style(&style)
}

/// Full-width status banner: white bold 14pt on `color`.
pub fn verdict_banner(text: &str, color: Color, width_in: f32) -> Table {
    banner(text, color, 14.0, 12.0, width_in)
}

pub fn tier_color(tier: u8) -> Color {
    match tier {
        1 => GREEN,
        2 => BLUE,
        3 => GOLD,
        _ => GRAY,
    }
}

pub fn tier_header(text: &str, tier: u8, width_in: f32) -> Table {
    banner(text, tier_color(tier), 11.0, 8.0, width_in)
}

/// Highlighted note with a coloured outline.
pub fn callout_box(text: &str, border: Color, width_in: f32) -> Table {
    let all = CellRange::all();
    let style = TableStyle::new()
        .background(all, LIGHT_GRAY)
        .outline(all, 2.0, border)
        .align(all, TextAlign::Left)
        .font_size(all, 10.0)
        .padding(all, 12.0, 12.0);
    Table::from_text(vec![vec![text]], vec![Pt::inches(width_in)]).with_style(&style)
}

/// Colour for a match quality tier name.
pub fn quality_tier_color(tier: &str) -> Color {
    match tier {
        "Excellent" => GREEN,
        "Good" => BLUE,
        _ => GOLD,
    }
}

/// Score on the tier colour next to the tier name, split 5:7.
pub fn score_badge(score: f64, tier: &str, width_in: f32) -> Table {
    let color = quality_tier_color(tier);
    let score_cell = CellRange::cell(0, 0);
    let tier_cell = CellRange::cell(1, 0);
    let all = CellRange::all();
    let style = TableStyle::new()
        .background(score_cell, color)
        .background(tier_cell, LIGHT_GRAY)
        .text_color(score_cell, WHITE)
        .text_color(tier_cell, color)
        .align(all, TextAlign::Center)
        .font(all, StandardFont::HelveticaBold)
        .font_size(all, 9.0)
        .outline(all, 1.0, color)
        .padding_edge(all, Edge::Top, 4.0)
        .padding_edge(all, Edge::Bottom, 4.0);
    let width = Pt::inches(width_in);
    Table::from_text(
        vec![vec![format!("{:.2}", score), tier.to_string()]],
        vec![width.mul_ratio(5, 12), width.mul_ratio(7, 12)],
    )
    .with_style(&style)
}

pub fn footer_text(brand: &str, company: &str, report_type: &str, page_number: usize) -> String {
    if report_type.is_empty() {
        format!("{brand} | {company} | Page {page_number}")
    } else {
        format!("{brand} | {company} {report_type} | Page {page_number}")
    }
}

/// Gray 8pt line centred half an inch above the bottom edge.
pub fn page_footer(
    canvas: &mut Canvas,
    ctx: &DocContext,
    brand: &str,
    company: &str,
    report_type: &str,
) {
    let page = canvas.page_size();
    canvas.save_state();
    canvas.set_font(StandardFont::Helvetica, Pt::from_i32(8));
    canvas.set_fill_color(GRAY);
    canvas.draw_centred_string(
        page.width.mul_ratio(1, 2),
        page.height - Pt::inches(0.5),
        &footer_text(brand, company, report_type, ctx.page_number),
    );
    canvas.restore_state();
}

/// Running title with a gold rule; skipped on the first page.
pub fn page_header(canvas: &mut Canvas, ctx: &DocContext, title: &str) {
    if ctx.is_first_page() {
        return;
    }
    let page = canvas.page_size();
    let margin = Pt::inches(0.6);
    canvas.save_state();
    canvas.set_font(StandardFont::HelveticaBold, Pt::from_i32(10));
    canvas.set_fill_color(NAVY);
    canvas.draw_string(margin, Pt::inches(0.4), title);
    canvas.set_stroke_color(GOLD);
    canvas.set_line_width(Pt::from_i32(1));
    let rule_y = Pt::inches(0.5);
    canvas.line(margin, rule_y, page.width - margin, rule_y);
    canvas.restore_state();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;

    fn render(flowable: &dyn Flowable) -> Vec<Command> {
        let mut canvas = Canvas::new(Size::letter());
        let size = flowable.wrap(Pt::inches(6.8), Pt::from_i32(700));
        flowable.draw(&mut canvas, Pt::ZERO, Pt::ZERO, size.width, size.height);
        canvas.into_commands()
    }

    #[test]
    fn risk_bar_fills_whole_points() {
        assert_eq!(risk_bar(7.5, 10), "███████░░░");
        assert_eq!(risk_bar(0.0, 10), "░".repeat(10));
        assert_eq!(risk_bar(12.0, 10), "█".repeat(10));
        assert_eq!(risk_bar(-3.0, 5), "░".repeat(5));
        assert_eq!(risk_bar(3.0, 5).chars().count(), 5);
    }

    #[test]
    fn indicator_thresholds() {
        assert_eq!(risk_indicator(7.0), TrafficLight::Green);
        assert_eq!(risk_indicator(6.9), TrafficLight::Yellow);
        assert_eq!(risk_indicator(5.0), TrafficLight::Yellow);
        assert_eq!(risk_indicator(4.99), TrafficLight::Red);
        assert_eq!(TrafficLight::Green.glyph(), "🟢");
        assert_eq!(TrafficLight::Red.color(), RED);
    }

    #[test]
    fn meter_draws_one_rect_per_segment() {
        let meter = RiskMeter::new(6.0, RISK_SCALE_MAX);
        assert_eq!(meter.filled(), 6);
        let rects = render(&meter)
            .into_iter()
            .filter(|cmd| matches!(cmd, Command::FillRect { .. }))
            .count();
        assert_eq!(rects, 10);
        assert_eq!(meter.wrap(Pt::ZERO, Pt::ZERO).width.to_milli_i64(), 83_500);
    }

    #[test]
    fn metric_box_stacks_value_over_label() {
        let tile = metric_box("$2.4M", "ARR", GREEN, METRIC_BOX_WIDTH_IN);
        let size = tile.wrap(Pt::inches(6.8), Pt::from_i32(700));
        assert_eq!(size.width, Pt::inches(1.4));
        // 16pt and 8pt lines at 1.2 leading plus 24pt padding per row.
        assert_eq!(size.height.to_milli_i64(), 19_200 + 24_000 + 9_600 + 24_000);
        let strings: Vec<String> = render(&tile)
            .into_iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(strings, vec!["$2.4M".to_string(), "ARR".to_string()]);
    }

    #[test]
    fn metrics_row_lays_boxes_side_by_side() {
        let tiles = vec![
            MetricTile::new("$2.4M", "ARR"),
            MetricTile::new("140%", "NRR").with_color(GREEN),
            MetricTile::new("18mo", "Runway").with_color(RED),
        ];
        let row = metrics_row(&tiles, METRICS_ROW_BOX_WIDTH_IN);
        assert_eq!(row.column_count(), 3);
        assert_eq!(row.row_count(), 1);
        assert_eq!(row.wrap(Pt::inches(6.8), Pt::from_i32(700)).width, Pt::inches(4.8));
    }

    #[test]
    fn tier_colours() {
        assert_eq!(tier_color(1), GREEN);
        assert_eq!(tier_color(2), BLUE);
        assert_eq!(tier_color(3), GOLD);
        assert_eq!(tier_color(9), GRAY);
        assert_eq!(quality_tier_color("Excellent"), GREEN);
        assert_eq!(quality_tier_color("Good"), BLUE);
        assert_eq!(quality_tier_color("Fair"), GOLD);
    }

    #[test]
    fn score_badge_formats_two_decimals() {
        let badge = score_badge(0.8765, "Excellent", SCORE_BADGE_WIDTH_IN);
        assert_eq!(badge.cell(0, 0).and_then(CellContent::as_text), Some("0.88"));
        assert_eq!(badge.wrap(Pt::inches(6.8), Pt::ZERO).width, Pt::inches(1.2));
    }

    #[test]
    fn banner_text_is_white_and_centred() {
        let banner = verdict_banner("PASS", GREEN, VERDICT_BANNER_WIDTH_IN);
        let commands = render(&banner);
        assert!(commands.contains(&Command::SetFillColor(GREEN)));
        assert!(commands.contains(&Command::SetFillColor(WHITE)));
        assert!(commands.contains(&Command::SetFont {
            font: StandardFont::HelveticaBold,
            size: Pt::from_i32(14),
        }));
    }

    #[test]
    fn footer_text_variants() {
        assert_eq!(
            footer_text("Crowley Capital", "Acme", "", 3),
            "Crowley Capital | Acme | Page 3"
        );
        assert_eq!(
            footer_text("Crowley Capital", "Acme", "Assessment", 1),
            "Crowley Capital | Acme Assessment | Page 1"
        );
    }

    #[test]
    fn footer_sits_half_an_inch_above_the_bottom() {
        let mut canvas = Canvas::new(Size::letter());
        page_footer(&mut canvas, &DocContext::new(2, 3, "later"), "Crowley Capital", "Acme", "");
        let baseline = canvas.into_commands().into_iter().find_map(|cmd| match cmd {
            Command::DrawString { y, text, .. } => Some((y, text)),
            _ => None,
        });
        assert_eq!(
            baseline,
            Some((Pt::from_i32(756), "Crowley Capital | Acme | Page 2".to_string()))
        );
    }

    #[test]
    fn header_skips_first_page() {
        let mut canvas = Canvas::new(Size::letter());
        page_header(&mut canvas, &DocContext::new(1, 2, "first"), "Title");
        assert!(canvas.is_current_empty());

        let mut canvas = Canvas::new(Size::letter());
        page_header(&mut canvas, &DocContext::new(2, 2, "later"), "Title");
        let commands = canvas.into_commands();
        assert!(commands.contains(&Command::Line {
            x1: Pt::inches(0.6),
            y1: Pt::inches(0.5),
            x2: Pt::from_i32(612) - Pt::inches(0.6),
            y2: Pt::inches(0.5),
        }));
    }
}
