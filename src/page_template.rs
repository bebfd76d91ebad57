use crate::canvas::Canvas;
use crate::doc_context::DocContext;
use crate::frame::Frame;
use crate::types::{Margins, Rect, Size};
use std::sync::Arc;

#[derive(Clone, Copy)]
pub struct FrameSpec {
    pub rect: Rect,
}

/// Page decoration hook, run once layout has finished.
pub type OnPageCallback = Arc<dyn Fn(&mut Canvas, &DocContext) + Send + Sync>;

#[derive(Clone)]
pub struct PageTemplate {
    pub name: String,
    pub page_size: Size,
    frames: Vec<FrameSpec>,
    on_page: Option<OnPageCallback>,
}

impl PageTemplate {
    pub fn new(name: impl Into<String>, page_size: Size) -> Self {
        Self {
            name: name.into(),
            page_size,
            frames: Vec::new(),
            on_page: None,
        }
    }

    pub fn with_frame(mut self, rect: Rect) -> Self {
        self.frames.push(FrameSpec { rect });
        self
    }

    /// Single frame covering the page inside `margins`.
    pub fn with_margins(self, margins: Margins) -> Self {
        let rect = margins.content_rect(self.page_size);
        self.with_frame(rect)
    }

    pub fn set_on_page<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Canvas, &DocContext) + Send + Sync + 'static,
    {
        self.on_page = Some(Arc::new(callback));
        self
    }

    pub fn on_page(&self) -> Option<&OnPageCallback> {
        self.on_page.as_ref()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn instantiate_frames(&self) -> Vec<Frame> {
        self.frames
            .iter()
            .map(|spec| Frame::new(spec.rect))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pt;

    #[test]
    fn margins_produce_one_content_frame() {
        let margins = Margins {
            top: Pt::inches(0.6),
            right: Pt::inches(0.6),
            bottom: Pt::inches(0.75),
            left: Pt::inches(0.6),
        };
        let template = PageTemplate::new("first", Size::letter()).with_margins(margins);
        assert_eq!(template.frame_count(), 1);
        let frames = template.instantiate_frames();
        assert_eq!(frames[0].rect(), margins.content_rect(Size::letter()));
        assert!(template.on_page().is_none());
    }
}
