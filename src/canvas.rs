use crate::font::{self, StandardFont};
use crate::types::{Color, Pt, Size};

/// Drawing operations recorded per page. Coordinates have their origin at the
/// top-left corner of the page with y growing downwards; the PDF writer flips
/// them into PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    /// Page annotation for tooling; never rendered.
    Meta {
        key: String,
        value: String,
    },
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(Pt),
    SetFont {
        font: StandardFont,
        size: Pt,
    },
    /// `y` is the text baseline.
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
    FillRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    StrokeRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
    },
    Line {
        x1: Pt,
        y1: Pt,
        x2: Pt,
        y2: Pt,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    line_width: Pt,
    font: StandardFont,
    font_size: Pt,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: Pt::from_f32(1.0),
            font: StandardFont::Helvetica,
            font_size: Pt::from_f32(12.0),
        }
    }
}

pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    saved: Vec<GraphicsState>,
    state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::default(),
            saved: Vec::new(),
            state: GraphicsState::default(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    fn push(&mut self, command: Command) {
        self.current.commands.push(command);
    }

    pub fn save_state(&mut self) {
        self.saved.push(self.state.clone());
        self.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
            self.push(Command::RestoreState);
        }
    }

    pub fn meta(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.push(Command::Meta {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != color {
            self.state.fill_color = color;
            self.push(Command::SetFillColor(color));
        }
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color != color {
            self.state.stroke_color = color;
            self.push(Command::SetStrokeColor(color));
        }
    }

    pub fn set_line_width(&mut self, width: Pt) {
        let width = width.max(Pt::ZERO);
        if self.state.line_width == width {
            return;
        }
        self.state.line_width = width;
        self.push(Command::SetLineWidth(width));
    }

    pub fn set_font(&mut self, font: StandardFont, size: Pt) {
        if self.state.font == font && self.state.font_size == size {
            return;
        }
        self.state.font = font;
        self.state.font_size = size;
        self.push(Command::SetFont { font, size });
    }

    pub fn draw_string(&mut self, x: Pt, baseline: Pt, text: impl Into<String>) {
        self.push(Command::DrawString {
            x,
            y: baseline,
            text: text.into(),
        });
    }

    /// Draws `text` centred on `center_x` in the current font.
    pub fn draw_centred_string(&mut self, center_x: Pt, baseline: Pt, text: &str) {
        let width = font::text_width(
            self.state.font,
            self.state.font_size,
            text,
        );
        self.draw_string(center_x - width.mul_ratio(1, 2), baseline, text);
    }

    pub fn fill_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.push(Command::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn stroke_rect(&mut self, x: Pt, y: Pt, width: Pt, height: Pt) {
        self.push(Command::StrokeRect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn line(&mut self, x1: Pt, y1: Pt, x2: Pt, y2: Pt) {
        self.push(Command::Line { x1, y1, x2, y2 });
    }

    /// Closes the current page; graphics state starts over on the next one.
    pub fn show_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.saved.clear();
        self.state = GraphicsState::default();
    }

    pub fn current_command_count(&self) -> usize {
        self.current.commands.len()
    }

    pub fn is_current_empty(&self) -> bool {
        self.current.commands.is_empty()
    }

    /// Commands recorded on the current (unfinished) page.
    pub fn into_commands(self) -> Vec<Command> {
        self.current.commands
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }

    pub fn finish_without_show(self) -> Document {
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}
