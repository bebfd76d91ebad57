use crate::canvas::Canvas;
use crate::font::{self, StandardFont};
use crate::markup::{self, Span};
use crate::style::ParagraphStyle;
use crate::types::{Pt, Size};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakBefore {
    Auto,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakAfter {
    Auto,
    Page,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakInside {
    Auto,
    Avoid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub break_before: BreakBefore,
    pub break_after: BreakAfter,
    pub break_inside: BreakInside,
    pub orphans: usize,
    pub widows: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            break_before: BreakBefore::Auto,
            break_after: BreakAfter::Auto,
            break_inside: BreakInside::Auto,
            orphans: 2,
            widows: 2,
        }
    }
}

impl Pagination {
    fn resolved_orphans(self) -> usize {
        self.orphans.max(1)
    }

    fn resolved_widows(self) -> usize {
        self.widows.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Horizontal offset of content `width` wide inside `avail`.
    pub fn offset(self, avail: Pt, width: Pt) -> Pt {
        let slack = (avail - width).max(Pt::ZERO);
        match self {
            TextAlign::Left => Pt::ZERO,
            TextAlign::Center => slack.mul_ratio(1, 2),
            TextAlign::Right => slack,
        }
    }
}

/// Anything the frame can lay out. Coordinates passed to `draw` are the
/// top-left corner of the box the flowable occupies.
pub trait Flowable: FlowableClone + Send + Sync {
    fn wrap(&self, avail_width: Pt, avail_height: Pt) -> Size;
    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)>;
    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, avail_height: Pt);

    fn space_before(&self) -> Pt {
        Pt::ZERO
    }

    fn space_after(&self) -> Pt {
        Pt::ZERO
    }

    fn pagination(&self) -> Pagination {
        Pagination::default()
    }

    fn debug_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

pub trait FlowableClone {
    fn clone_box(&self) -> Box<dyn Flowable>;
}

impl<T> FlowableClone for T
where
    T: 'static + Flowable + Clone,
{
    fn clone_box(&self) -> Box<dyn Flowable> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Flowable> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    font: StandardFont,
    text: String,
    width: Pt,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LineLayout {
    runs: Vec<Run>,
    width: Pt,
}

impl LineLayout {
    pub(crate) fn width(&self) -> Pt {
        self.width
    }

    pub(crate) fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    fn push_word(&mut self, word: Word, size: Pt) {
        if let Some(last) = self.runs.last_mut() {
            last.text.push(' ');
            let space = font::text_width(last.font, size, " ");
            last.width += space;
            self.width += space;
        }
        for fragment in word.fragments {
            self.width += fragment.width;
            match self.runs.last_mut() {
                Some(last) if last.font == fragment.font => {
                    last.text.push_str(&fragment.text);
                    last.width += fragment.width;
                }
                _ => self.runs.push(fragment),
            }
        }
    }

    /// Draws the line with its first glyph at `x`.
    pub(crate) fn draw(&self, canvas: &mut Canvas, x: Pt, baseline: Pt, size: Pt) {
        let mut cursor = x;
        for run in &self.runs {
            canvas.set_font(run.font, size);
            canvas.draw_string(cursor, baseline, run.text.clone());
            cursor += run.width;
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Word {
    fragments: Vec<Run>,
    width: Pt,
}

enum Token {
    Word(Word),
    Break,
}

fn tokenize(spans: &[Span], base: StandardFont, size: Pt) -> Vec<Token> {
    fn finish(tokens: &mut Vec<Token>, word: &mut Option<Word>, size: Pt) {
        if let Some(mut done) = word.take() {
            for fragment in &mut done.fragments {
                fragment.width = font::text_width(fragment.font, size, &fragment.text);
            }
            done.width = done.fragments.iter().map(|fragment| fragment.width).sum();
            tokens.push(Token::Word(done));
        }
    }

    let mut tokens = Vec::new();
    let mut word: Option<Word> = None;
    for span in spans {
        if span.text == "\n" {
            finish(&mut tokens, &mut word, size);
            tokens.push(Token::Break);
            continue;
        }
        let span_font = base.with_traits(base.is_bold() || span.bold, base.is_italic() || span.italic);
        for ch in span.text.chars() {
            if ch.is_whitespace() && ch != '\u{00A0}' {
                finish(&mut tokens, &mut word, size);
                continue;
            }
            let current = word.get_or_insert_with(Word::default);
            match current.fragments.last_mut() {
                Some(run) if run.font == span_font => run.text.push(ch),
                _ => current.fragments.push(Run {
                    font: span_font,
                    text: ch.to_string(),
                    width: Pt::ZERO,
                }),
            }
        }
    }
    finish(&mut tokens, &mut word, size);
    tokens
}

fn break_lines(tokens: Vec<Token>, size: Pt, max_width: Pt) -> Vec<LineLayout> {
    let mut lines = Vec::new();
    let mut line = LineLayout::default();
    for token in tokens {
        match token {
            Token::Break => lines.push(std::mem::take(&mut line)),
            Token::Word(word) => {
                if let Some(last) = line.runs.last() {
                    let space = font::text_width(last.font, size, " ");
                    if line.width + space + word.width > max_width {
                        lines.push(std::mem::take(&mut line));
                    }
                }
                line.push_word(word, size);
            }
        }
    }
    if !line.runs.is_empty() {
        lines.push(line);
    }
    lines
}

/// Greedy word wrap of marked-up spans. Words wider than `max_width` get a
/// line of their own.
pub(crate) fn layout_spans(
    spans: &[Span],
    base: StandardFont,
    size: Pt,
    max_width: Pt,
) -> Vec<LineLayout> {
    break_lines(tokenize(spans, base, size), size, max_width)
}

/// Wraps plain text (no markup) in a single font.
pub(crate) fn layout_plain(
    text: &str,
    font: StandardFont,
    size: Pt,
    max_width: Pt,
) -> Vec<LineLayout> {
    let mut spans = Vec::new();
    for (idx, part) in text.split('\n').enumerate() {
        if idx > 0 {
            spans.push(Span {
                text: "\n".to_string(),
                bold: false,
                italic: false,
            });
        }
        spans.push(Span {
            text: part.to_string(),
            bold: false,
            italic: false,
        });
    }
    layout_spans(&spans, font, size, max_width)
}

#[derive(Debug, Default)]
struct TextLayoutCache {
    entries: Vec<(i64, Arc<Vec<LineLayout>>)>,
}

impl TextLayoutCache {
    fn get(&self, key: i64) -> Option<Arc<Vec<LineLayout>>> {
        self.entries
            .iter()
            .find_map(|(k, lines)| (*k == key).then(|| lines.clone()))
    }

    fn insert(&mut self, key: i64, lines: Arc<Vec<LineLayout>>) {
        if self.entries.len() >= 4 {
            self.entries.remove(0);
        }
        self.entries.push((key, lines));
    }
}

/// Styled, word-wrapped text with inline `<b>`/`<i>`/`<br/>` markup.
#[derive(Clone)]
pub struct Paragraph {
    spans: Arc<Vec<Span>>,
    style: ParagraphStyle,
    pagination: Pagination,
    keep_space_before: bool,
    keep_space_after: bool,
    layout_cache: Arc<Mutex<TextLayoutCache>>,
}

impl Paragraph {
    pub fn new(text: &str, style: &ParagraphStyle) -> Self {
        Self::from_spans(markup::parse(text), style.clone())
    }

    fn from_spans(spans: Vec<Span>, style: ParagraphStyle) -> Self {
        Self {
            spans: Arc::new(spans),
            style,
            pagination: Pagination::default(),
            keep_space_before: true,
            keep_space_after: true,
            layout_cache: Arc::new(Mutex::new(TextLayoutCache::default())),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn style(&self) -> &ParagraphStyle {
        &self.style
    }

    /// The text with markup removed.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    fn text_width_limit(&self, avail_width: Pt) -> Pt {
        (avail_width - self.style.left_indent).max(Pt::ZERO)
    }

    fn layout_lines(&self, avail_width: Pt) -> Arc<Vec<LineLayout>> {
        let limit = self.text_width_limit(avail_width);
        let key = limit.to_milli_i64();
        if let Ok(cache) = self.layout_cache.lock() {
            if let Some(lines) = cache.get(key) {
                return lines;
            }
        }
        let lines = Arc::new(layout_spans(
            &self.spans,
            self.style.font,
            self.style.font_size,
            limit,
        ));
        if let Ok(mut cache) = self.layout_cache.lock() {
            cache.insert(key, lines.clone());
        }
        lines
    }

    fn part(&self, lines: &[LineLayout], keep_before: bool, keep_after: bool) -> Paragraph {
        let mut spans = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                spans.push(Span {
                    text: "\n".to_string(),
                    bold: false,
                    italic: false,
                });
            }
            for run in &line.runs {
                spans.push(Span {
                    text: run.text.clone(),
                    bold: run.font.is_bold() && !self.style.font.is_bold(),
                    italic: run.font.is_italic() && !self.style.font.is_italic(),
                });
            }
        }
        let mut part = Paragraph::from_spans(spans, self.style.clone());
        part.keep_space_before = keep_before;
        part.keep_space_after = keep_after;
        part
    }
}

impl Flowable for Paragraph {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        let lines = self.layout_lines(avail_width);
        Size {
            width: avail_width,
            height: self.style.leading * (lines.len() as i32),
        }
    }

    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        let lines = self.layout_lines(avail_width);
        let lh = self.style.leading.to_milli_i64();
        let ah = avail_height.to_milli_i64();
        if lh <= 0 || ah <= 0 {
            return None;
        }
        let max_lines = (ah / lh) as usize;
        let total_lines = lines.len();
        if max_lines == 0 || max_lines >= total_lines {
            return None;
        }

        let orphans = self.pagination.resolved_orphans();
        let widows = self.pagination.resolved_widows();
        let mut split_at = max_lines;
        if total_lines - split_at < widows {
            split_at = total_lines.saturating_sub(widows);
        }
        if split_at < orphans {
            return None;
        }

        let first = Paragraph {
            pagination: Pagination {
                break_after: BreakAfter::Auto,
                ..self.pagination
            },
            ..self.part(&lines[..split_at], self.keep_space_before, false)
        };
        let second = Paragraph {
            pagination: Pagination {
                break_before: BreakBefore::Auto,
                ..self.pagination
            },
            ..self.part(&lines[split_at..], false, self.keep_space_after)
        };
        Some((Box::new(first), Box::new(second)))
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, _avail_height: Pt) {
        let lines = self.layout_lines(avail_width);
        if lines.is_empty() {
            return;
        }
        let size = self.style.font_size;
        let leading = self.style.leading;
        let limit = self.text_width_limit(avail_width);
        let left = x + self.style.left_indent;
        canvas.set_fill_color(self.style.text_color);
        let mut line_top = y;
        for line in lines.iter() {
            let baseline = line_top + font::baseline_offset(size, leading);
            let line_x = left + self.style.alignment.offset(limit, line.width);
            line.draw(canvas, line_x, baseline, size);
            line_top += leading;
        }
    }

    fn space_before(&self) -> Pt {
        if self.keep_space_before {
            self.style.space_before
        } else {
            Pt::ZERO
        }
    }

    fn space_after(&self) -> Pt {
        if self.keep_space_after {
            self.style.space_after
        } else {
            Pt::ZERO
        }
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn debug_name(&self) -> &'static str {
        "Paragraph"
    }
}

/// Fixed vertical gap.
#[derive(Clone)]
pub struct Spacer {
    height: Pt,
    pagination: Pagination,
}

impl Spacer {
    pub fn new(height: f32) -> Self {
        Self::new_pt(Pt::from_f32(height))
    }

    pub fn new_pt(height: Pt) -> Self {
        Self {
            height,
            pagination: Pagination::default(),
        }
    }
}

impl Flowable for Spacer {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        Size {
            width: avail_width,
            height: self.height.max(Pt::ZERO),
        }
    }

    // A gap that runs off the bottom of a frame is truncated there rather
    // than pushed onto the next page.
    fn split(
        &self,
        _avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        if avail_height <= Pt::ZERO || avail_height >= self.height {
            return None;
        }
        Some((
            Box::new(Spacer::new_pt(avail_height)),
            Box::new(Spacer::new_pt(Pt::ZERO)),
        ))
    }

    fn draw(&self, _canvas: &mut Canvas, _x: Pt, _y: Pt, _avail_width: Pt, _avail_height: Pt) {}

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn debug_name(&self) -> &'static str {
        "Spacer"
    }
}

/// Forces the following content onto a fresh page.
#[derive(Clone, Default)]
pub struct PageBreak;

impl PageBreak {
    pub fn new() -> Self {
        Self
    }
}

impl Flowable for PageBreak {
    fn wrap(&self, _avail_width: Pt, _avail_height: Pt) -> Size {
        Size {
            width: Pt::ZERO,
            height: Pt::ZERO,
        }
    }

    fn split(
        &self,
        _avail_width: Pt,
        _avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        None
    }

    fn draw(&self, _canvas: &mut Canvas, _x: Pt, _y: Pt, _avail_width: Pt, _avail_height: Pt) {}

    fn pagination(&self) -> Pagination {
        Pagination {
            break_before: BreakBefore::Page,
            ..Pagination::default()
        }
    }

    fn debug_name(&self) -> &'static str {
        "PageBreak"
    }
}
