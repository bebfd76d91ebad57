use crate::canvas::Canvas;
use crate::flowable::{BreakInside, Flowable};
use crate::types::{Pt, Rect};

pub enum AddResult {
    Placed,
    Split(Box<dyn Flowable>),
    Overflow(Box<dyn Flowable>),
}

/// Fills a rectangle top-down. Paragraph spacing collapses at the top edge.
pub struct Frame {
    rect: Rect,
    cursor_y: Pt,
    placed: usize,
}

impl Frame {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_y: Pt::ZERO,
            placed: 0,
        }
    }

    pub fn remaining_height(&self) -> Pt {
        (self.rect.height - self.cursor_y).max(Pt::ZERO)
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_empty(&self) -> bool {
        self.cursor_y <= Pt::ZERO
    }

    /// Number of flowables (or split parts) drawn into this frame.
    pub fn placed_count(&self) -> usize {
        self.placed
    }

    fn place(&mut self, flowable: &dyn Flowable, canvas: &mut Canvas, before: Pt, height: Pt) {
        let top = self.rect.y + self.cursor_y + before;
        let avail_height = (self.remaining_height() - before).max(Pt::ZERO);
        flowable.draw(canvas, self.rect.x, top, self.rect.width, avail_height);
        self.cursor_y = self.cursor_y + before + height;
        self.placed += 1;
    }

    pub fn add(&mut self, flowable: Box<dyn Flowable>, canvas: &mut Canvas) -> AddResult {
        let avail_width = self.rect.width;
        let before = if self.is_empty() {
            Pt::ZERO
        } else {
            flowable.space_before()
        };
        let avail_height = self.remaining_height() - before;
        if avail_height <= Pt::ZERO {
            return AddResult::Overflow(flowable);
        }

        let pagination = flowable.pagination();
        let size = flowable.wrap(avail_width, avail_height);
        if pagination.break_inside == BreakInside::Avoid
            && size.height > avail_height
            && size.height <= self.rect.height
            && !self.is_empty()
        {
            return AddResult::Overflow(flowable);
        }

        if size.height <= avail_height {
            self.place(flowable.as_ref(), canvas, before, size.height);
            self.cursor_y = self.cursor_y + flowable.space_after();
            return AddResult::Placed;
        }

        if let Some((first, second)) = flowable.split(avail_width, avail_height) {
            let first_size = first.wrap(avail_width, avail_height);
            if first_size.height > Pt::ZERO && first_size.height <= avail_height {
                self.place(first.as_ref(), canvas, before, first_size.height);
                tracing::debug!(
                    flowable = flowable.debug_name(),
                    height = first_size.height.to_f32(),
                    "split across frames"
                );
                return AddResult::Split(second);
            }
        }

        // Taller than a whole frame and unsplittable: draw it anyway on an
        // empty frame so layout keeps moving.
        if self.is_empty() {
            tracing::debug!(
                flowable = flowable.debug_name(),
                height = size.height.to_f32(),
                "oversized flowable placed on empty frame"
            );
            self.place(flowable.as_ref(), canvas, before, size.height);
            self.cursor_y = self.rect.height;
            return AddResult::Placed;
        }

        AddResult::Overflow(flowable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowable::{Paragraph, Spacer};
    use crate::style::StyleSheet;
    use crate::types::Size;

    fn frame(height: f32) -> Frame {
        Frame::new(Rect {
            x: Pt::from_i32(36),
            y: Pt::from_i32(36),
            width: Pt::from_i32(400),
            height: Pt::from_f32(height),
        })
    }

    #[test]
    fn space_before_is_suppressed_at_the_top() {
        let styles = StyleSheet::brand();
        let mut canvas = Canvas::new(Size::letter());
        let mut frame = frame(500.0);
        assert!(matches!(
            frame.add(Box::new(Paragraph::new("Heading", &styles.h1)), &mut canvas),
            AddResult::Placed
        ));
        // 19.2pt line plus 12pt space after, no space before.
        assert_eq!(frame.remaining_height().to_milli_i64(), 500_000 - 31_200);

        frame.add(Box::new(Paragraph::new("Next", &styles.h1)), &mut canvas);
        assert_eq!(
            frame.remaining_height().to_milli_i64(),
            500_000 - 31_200 * 2 - 20_000
        );
        assert_eq!(frame.placed_count(), 2);
    }

    #[test]
    fn overflow_when_it_does_not_fit() {
        let mut canvas = Canvas::new(Size::letter());
        let mut frame = frame(30.0);
        frame.add(Box::new(Spacer::new(10.0)), &mut canvas);
        let styles = StyleSheet::brand();
        let para = Paragraph::new("one two", &styles.title);
        assert!(matches!(
            frame.add(Box::new(para), &mut canvas),
            AddResult::Overflow(_)
        ));
    }

    #[test]
    fn oversized_flowable_lands_on_an_empty_frame() {
        let mut canvas = Canvas::new(Size::letter());
        let mut frame = frame(20.0);
        assert!(matches!(
            frame.add(Box::new(Paragraph::new("Title", &StyleSheet::brand().title)), &mut canvas),
            AddResult::Placed
        ));
        assert_eq!(frame.remaining_height(), Pt::ZERO);
    }
}
