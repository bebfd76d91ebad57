//! Grid flowable with a ReportLab-style command list for cell styling.

use crate::canvas::Canvas;
use crate::flowable::{self, Flowable, Pagination, TextAlign};
use crate::font::{self, StandardFont};
use crate::types::{Color, Pt, Size};
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Block of cells addressed by `(column, row)` corners. Negative indices
/// count from the end, so `(0, 0)..(-1, -1)` covers the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    start: (i32, i32),
    end: (i32, i32),
}

impl CellRange {
    pub fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    pub fn all() -> Self {
        Self::new((0, 0), (-1, -1))
    }

    pub fn row(row: i32) -> Self {
        Self::new((0, row), (-1, row))
    }

    pub fn cell(col: i32, row: i32) -> Self {
        Self::new((col, row), (col, row))
    }

    fn resolve(
        &self,
        columns: usize,
        rows: usize,
    ) -> Option<(RangeInclusive<usize>, RangeInclusive<usize>)> {
        let c0 = resolve_index(self.start.0, columns)?;
        let c1 = resolve_index(self.end.0, columns)?;
        let r0 = resolve_index(self.start.1, rows)?;
        let r1 = resolve_index(self.end.1, rows)?;
        if c0 > c1 || r0 > r1 {
            return None;
        }
        Some((c0..=c1, r0..=r1))
    }
}

fn resolve_index(idx: i32, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let idx = i64::from(idx);
    let resolved = if idx < 0 { len + idx } else { idx };
    (0..len).contains(&resolved).then_some(resolved as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableStyleCommand {
    Background(CellRange, Color),
    TextColor(CellRange, Color),
    Font(CellRange, StandardFont),
    FontSize(CellRange, Pt),
    Align(CellRange, TextAlign),
    VAlign(CellRange, VerticalAlign),
    /// Every edge of every cell in the range.
    Grid(CellRange, Pt, Color),
    /// Outline of the range only.
    Box(CellRange, Pt, Color),
    /// Backgrounds cycled row by row from the start of the range.
    RowBackgrounds(CellRange, Vec<Color>),
    Padding(CellRange, Edge, Pt),
}

/// Ordered command list; later commands override earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStyle {
    commands: Vec<TableStyleCommand>,
}

impl TableStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, command: TableStyleCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn commands(&self) -> &[TableStyleCommand] {
        &self.commands
    }

    pub fn background(self, range: CellRange, color: Color) -> Self {
        self.push(TableStyleCommand::Background(range, color))
    }

    pub fn text_color(self, range: CellRange, color: Color) -> Self {
        self.push(TableStyleCommand::TextColor(range, color))
    }

    pub fn font(self, range: CellRange, font: StandardFont) -> Self {
        self.push(TableStyleCommand::Font(range, font))
    }

    pub fn font_size(self, range: CellRange, size: f32) -> Self {
        self.push(TableStyleCommand::FontSize(range, Pt::from_f32(size)))
    }

    pub fn align(self, range: CellRange, align: TextAlign) -> Self {
        self.push(TableStyleCommand::Align(range, align))
    }

    pub fn valign(self, range: CellRange, valign: VerticalAlign) -> Self {
        self.push(TableStyleCommand::VAlign(range, valign))
    }

    pub fn grid(self, range: CellRange, width: f32, color: Color) -> Self {
        self.push(TableStyleCommand::Grid(range, Pt::from_f32(width), color))
    }

    pub fn outline(self, range: CellRange, width: f32, color: Color) -> Self {
        self.push(TableStyleCommand::Box(range, Pt::from_f32(width), color))
    }

    pub fn row_backgrounds(self, range: CellRange, colors: Vec<Color>) -> Self {
        self.push(TableStyleCommand::RowBackgrounds(range, colors))
    }

    pub fn padding_edge(self, range: CellRange, edge: Edge, amount: f32) -> Self {
        self.push(TableStyleCommand::Padding(range, edge, Pt::from_f32(amount)))
    }

    /// Sets top/bottom to `vertical` and left/right to `horizontal`.
    pub fn padding(self, range: CellRange, vertical: f32, horizontal: f32) -> Self {
        self.padding_edge(range, Edge::Top, vertical)
            .padding_edge(range, Edge::Bottom, vertical)
            .padding_edge(range, Edge::Left, horizontal)
            .padding_edge(range, Edge::Right, horizontal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Border {
    width: Pt,
    color: Color,
}

#[derive(Debug, Clone, PartialEq)]
struct CellStyle {
    background: Option<Color>,
    text_color: Color,
    font: StandardFont,
    font_size: Pt,
    align: TextAlign,
    valign: VerticalAlign,
    pad_top: Pt,
    pad_bottom: Pt,
    pad_left: Pt,
    pad_right: Pt,
    top: Option<Border>,
    bottom: Option<Border>,
    left: Option<Border>,
    right: Option<Border>,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background: None,
            text_color: Color::BLACK,
            font: StandardFont::Helvetica,
            font_size: Pt::from_i32(10),
            align: TextAlign::Left,
            valign: VerticalAlign::Bottom,
            pad_top: Pt::from_i32(3),
            pad_bottom: Pt::from_i32(3),
            pad_left: Pt::from_i32(6),
            pad_right: Pt::from_i32(6),
            top: None,
            bottom: None,
            left: None,
            right: None,
        }
    }
}

impl CellStyle {
    fn leading(&self) -> Pt {
        self.font_size.mul_ratio(6, 5)
    }

    fn inner_width(&self, column_width: Pt) -> Pt {
        (column_width - self.pad_left - self.pad_right).max(Pt::ZERO)
    }
}

/// Cell content: plain text (wrapped to the column) or a nested flowable.
#[derive(Clone)]
pub enum CellContent {
    Text(String),
    Flowable(Box<dyn Flowable>),
}

impl CellContent {
    pub fn flowable(flowable: impl Flowable + 'static) -> Self {
        CellContent::Flowable(Box::new(flowable))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellContent::Text(text) => Some(text),
            CellContent::Flowable(_) => None,
        }
    }
}

impl From<&str> for CellContent {
    fn from(value: &str) -> Self {
        CellContent::Text(value.to_string())
    }
}

impl From<String> for CellContent {
    fn from(value: String) -> Self {
        CellContent::Text(value)
    }
}

impl From<Box<dyn Flowable>> for CellContent {
    fn from(value: Box<dyn Flowable>) -> Self {
        CellContent::Flowable(value)
    }
}

#[derive(Clone)]
struct TableData {
    cells: Vec<Vec<CellContent>>,
    styles: Vec<Vec<CellStyle>>,
    col_widths: Vec<Pt>,
    columns: usize,
}

impl TableData {
    fn apply(&mut self, style: &TableStyle) {
        let rows = self.cells.len();
        for command in style.commands() {
            let range = match command {
                TableStyleCommand::Background(range, _)
                | TableStyleCommand::TextColor(range, _)
                | TableStyleCommand::Font(range, _)
                | TableStyleCommand::FontSize(range, _)
                | TableStyleCommand::Align(range, _)
                | TableStyleCommand::VAlign(range, _)
                | TableStyleCommand::Grid(range, _, _)
                | TableStyleCommand::Box(range, _, _)
                | TableStyleCommand::RowBackgrounds(range, _)
                | TableStyleCommand::Padding(range, _, _) => range,
            };
            let Some((cols, row_range)) = range.resolve(self.columns, rows) else {
                continue;
            };
            for row in row_range.clone() {
                for col in cols.clone() {
                    let cell = &mut self.styles[row][col];
                    match command {
                        TableStyleCommand::Background(_, color) => cell.background = Some(*color),
                        TableStyleCommand::TextColor(_, color) => cell.text_color = *color,
                        TableStyleCommand::Font(_, font) => cell.font = *font,
                        TableStyleCommand::FontSize(_, size) => cell.font_size = *size,
                        TableStyleCommand::Align(_, align) => cell.align = *align,
                        TableStyleCommand::VAlign(_, valign) => cell.valign = *valign,
                        TableStyleCommand::Grid(_, width, color) => {
                            let border = Some(Border {
                                width: *width,
                                color: *color,
                            });
                            cell.top = border;
                            cell.bottom = border;
                            cell.left = border;
                            cell.right = border;
                        }
                        TableStyleCommand::Box(_, width, color) => {
                            let border = Some(Border {
                                width: *width,
                                color: *color,
                            });
                            if row == *row_range.start() {
                                cell.top = border;
                            }
                            if row == *row_range.end() {
                                cell.bottom = border;
                            }
                            if col == *cols.start() {
                                cell.left = border;
                            }
                            if col == *cols.end() {
                                cell.right = border;
                            }
                        }
                        TableStyleCommand::RowBackgrounds(_, colors) => {
                            if !colors.is_empty() {
                                let idx = (row - row_range.start()) % colors.len();
                                cell.background = Some(colors[idx]);
                            }
                        }
                        TableStyleCommand::Padding(_, edge, amount) => match edge {
                            Edge::Top => cell.pad_top = *amount,
                            Edge::Bottom => cell.pad_bottom = *amount,
                            Edge::Left => cell.pad_left = *amount,
                            Edge::Right => cell.pad_right = *amount,
                        },
                    }
                }
            }
        }
    }

    fn column_widths(&self, avail_width: Pt) -> Vec<Pt> {
        let fixed: Pt = self.col_widths.iter().take(self.columns).sum();
        let missing = self.columns.saturating_sub(self.col_widths.len());
        let share = if missing == 0 {
            Pt::ZERO
        } else {
            (avail_width - fixed).max(Pt::ZERO) / (missing as i32)
        };
        (0..self.columns)
            .map(|col| self.col_widths.get(col).copied().unwrap_or(share))
            .collect()
    }

    fn cell_height(&self, row: usize, col: usize, width: Pt) -> Pt {
        let style = &self.styles[row][col];
        let inner = style.inner_width(width);
        let content = match &self.cells[row][col] {
            CellContent::Text(text) => {
                let lines = flowable::layout_plain(text, style.font, style.font_size, inner);
                style.leading() * (lines.len().max(1) as i32)
            }
            CellContent::Flowable(item) => item.wrap(inner, Pt::from_f32(1.0e6)).height,
        };
        content + style.pad_top + style.pad_bottom
    }

    fn row_height(&self, row: usize, widths: &[Pt]) -> Pt {
        widths
            .iter()
            .enumerate()
            .map(|(col, width)| self.cell_height(row, col, *width))
            .fold(Pt::ZERO, Pt::max)
    }
}

#[derive(Clone)]
pub struct Table {
    data: Arc<TableData>,
    body: Range<usize>,
    header_rows: usize,
    include_header: bool,
    h_align: TextAlign,
    pagination: Pagination,
}

impl Table {
    /// Short rows are padded with empty cells. Columns without an explicit
    /// width share whatever the frame has left.
    pub fn new(rows: Vec<Vec<CellContent>>, col_widths: Vec<Pt>) -> Self {
        let columns = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(col_widths.len());
        let cells: Vec<Vec<CellContent>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize_with(columns, || CellContent::Text(String::new()));
                row
            })
            .collect();
        let styles = vec![vec![CellStyle::default(); columns]; cells.len()];
        let row_count = cells.len();
        Self {
            data: Arc::new(TableData {
                cells,
                styles,
                col_widths,
                columns,
            }),
            body: 0..row_count,
            header_rows: 0,
            include_header: false,
            h_align: TextAlign::Center,
            pagination: Pagination::default(),
        }
    }

    /// Convenience for all-text tables.
    pub fn from_text<S: Into<String>>(rows: Vec<Vec<S>>, col_widths: Vec<Pt>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| CellContent::Text(cell.into())).collect())
            .collect();
        Self::new(rows, col_widths)
    }

    pub fn with_style(mut self, style: &TableStyle) -> Self {
        Arc::make_mut(&mut self.data).apply(style);
        self
    }

    pub fn with_h_align(mut self, align: TextAlign) -> Self {
        self.h_align = align;
        self
    }

    /// Repeats the first `rows` rows at the top of every continuation.
    pub fn repeat_rows(mut self, rows: usize) -> Self {
        let total = self.data.cells.len();
        self.header_rows = rows.min(total);
        self.include_header = self.header_rows > 0;
        self.body = self.header_rows..total;
        self
    }

    pub fn row_count(&self) -> usize {
        self.data.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.data.columns
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&CellContent> {
        self.data.cells.get(row)?.get(col)
    }

    fn drawn_rows(&self) -> impl Iterator<Item = usize> + '_ {
        let header = if self.include_header {
            0..self.header_rows
        } else {
            0..0
        };
        header.chain(self.body.clone())
    }

    fn draw_text_cell(
        canvas: &mut Canvas,
        text: &str,
        style: &CellStyle,
        inner_x: Pt,
        inner_y: Pt,
        inner_w: Pt,
        inner_h: Pt,
    ) {
        let lines = flowable::layout_plain(text, style.font, style.font_size, inner_w);
        if lines.is_empty() {
            return;
        }
        let leading = style.leading();
        let text_h = leading * (lines.len() as i32);
        let top = inner_y + valign_offset(style.valign, inner_h, text_h);
        canvas.set_fill_color(style.text_color);
        for (idx, line) in lines.iter().enumerate() {
            let baseline = top + leading * (idx as i32) + font::baseline_offset(style.font_size, leading);
            let x = inner_x + style.align.offset(inner_w, line.width());
            line.draw(canvas, x, baseline, style.font_size);
        }
    }
}

fn valign_offset(valign: VerticalAlign, avail: Pt, content: Pt) -> Pt {
    let slack = (avail - content).max(Pt::ZERO);
    match valign {
        VerticalAlign::Top => Pt::ZERO,
        VerticalAlign::Middle => slack.mul_ratio(1, 2),
        VerticalAlign::Bottom => slack,
    }
}

fn stroke(canvas: &mut Canvas, border: Option<Border>, from: (Pt, Pt), to: (Pt, Pt)) {
    if let Some(border) = border {
        if border.width <= Pt::ZERO {
            return;
        }
        canvas.set_stroke_color(border.color);
        canvas.set_line_width(border.width);
        canvas.line(from.0, from.1, to.0, to.1);
    }
}

impl Flowable for Table {
    fn wrap(&self, avail_width: Pt, _avail_height: Pt) -> Size {
        let widths = self.data.column_widths(avail_width);
        Size {
            width: widths.iter().sum(),
            height: self
                .drawn_rows()
                .map(|row| self.data.row_height(row, &widths))
                .sum(),
        }
    }

    fn split(
        &self,
        avail_width: Pt,
        avail_height: Pt,
    ) -> Option<(Box<dyn Flowable>, Box<dyn Flowable>)> {
        let widths = self.data.column_widths(avail_width);
        let header: Pt = if self.include_header {
            (0..self.header_rows)
                .map(|row| self.data.row_height(row, &widths))
                .sum()
        } else {
            Pt::ZERO
        };
        let mut used = header;
        let mut fit = 0usize;
        for row in self.body.clone() {
            let height = self.data.row_height(row, &widths);
            if used + height > avail_height {
                break;
            }
            used += height;
            fit += 1;
        }
        if fit == 0 || fit >= self.body.len() {
            return None;
        }
        let cut = self.body.start + fit;
        let mut first = self.clone();
        first.body = self.body.start..cut;
        let mut second = self.clone();
        second.body = cut..self.body.end;
        second.include_header = self.header_rows > 0;
        Some((Box::new(first), Box::new(second)))
    }

    fn draw(&self, canvas: &mut Canvas, x: Pt, y: Pt, avail_width: Pt, _avail_height: Pt) {
        let data = &self.data;
        let widths = data.column_widths(avail_width);
        let table_width: Pt = widths.iter().sum();
        let left = x + self.h_align.offset(avail_width, table_width);

        let mut col_x = Vec::with_capacity(widths.len());
        let mut cursor = left;
        for width in &widths {
            col_x.push(cursor);
            cursor += *width;
        }

        let mut rows = Vec::new();
        let mut top = y;
        for row in self.drawn_rows() {
            let height = data.row_height(row, &widths);
            rows.push((row, top, height));
            top += height;
        }

        for &(row, top, height) in &rows {
            for col in 0..data.columns {
                if let Some(background) = data.styles[row][col].background {
                    canvas.set_fill_color(background);
                    canvas.fill_rect(col_x[col], top, widths[col], height);
                }
            }
        }

        for &(row, top, height) in &rows {
            for col in 0..data.columns {
                let style = &data.styles[row][col];
                let inner_x = col_x[col] + style.pad_left;
                let inner_y = top + style.pad_top;
                let inner_w = style.inner_width(widths[col]);
                let inner_h = (height - style.pad_top - style.pad_bottom).max(Pt::ZERO);
                match &data.cells[row][col] {
                    CellContent::Text(text) => {
                        Self::draw_text_cell(canvas, text, style, inner_x, inner_y, inner_w, inner_h)
                    }
                    CellContent::Flowable(item) => {
                        let size = item.wrap(inner_w, inner_h);
                        let item_x = inner_x + style.align.offset(inner_w, size.width);
                        let item_y = inner_y + valign_offset(style.valign, inner_h, size.height);
                        item.draw(canvas, item_x, item_y, size.width, size.height);
                    }
                }
            }
        }

        for &(row, top, height) in &rows {
            for col in 0..data.columns {
                let style = &data.styles[row][col];
                let (x0, x1) = (col_x[col], col_x[col] + widths[col]);
                let (y0, y1) = (top, top + height);
                stroke(canvas, style.top, (x0, y0), (x1, y0));
                stroke(canvas, style.bottom, (x0, y1), (x1, y1));
                stroke(canvas, style.left, (x0, y0), (x0, y1));
                stroke(canvas, style.right, (x1, y0), (x1, y1));
            }
        }
    }

    fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn debug_name(&self) -> &'static str {
        "Table"
    }
}
