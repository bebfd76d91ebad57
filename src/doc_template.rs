use crate::canvas::{Canvas, Command, Document};
use crate::doc_context::DocContext;
use crate::error::ReportError;
use crate::flowable::{BreakAfter, BreakBefore, Flowable};
use crate::frame::{AddResult, Frame};
use crate::metrics::{DocumentMetrics, PageMetrics};
use crate::page_template::PageTemplate;
use std::collections::VecDeque;
use std::time::Instant;

pub const META_PAGE_TEMPLATE_KEY: &str = "page_template";

pub struct DocTemplate {
    page_templates: Vec<PageTemplate>,
    story: Vec<Box<dyn Flowable>>,
}

struct PageRecord {
    template: usize,
    flowables: usize,
    render_ms: f64,
}

/// Layout state while the story is poured into pages.
struct Pager<'a> {
    templates: &'a [PageTemplate],
    canvas: Canvas,
    frames: Vec<Frame>,
    frame_index: usize,
    placed_on_page: bool,
    page_flowables: usize,
    page_start: Instant,
    records: Vec<PageRecord>,
}

impl<'a> Pager<'a> {
    fn new(templates: &'a [PageTemplate]) -> Self {
        let first = &templates[0];
        Self {
            templates,
            canvas: Canvas::new(first.page_size),
            frames: first.instantiate_frames(),
            frame_index: 0,
            placed_on_page: false,
            page_flowables: 0,
            page_start: Instant::now(),
            records: Vec::new(),
        }
    }

    fn page_number(&self) -> usize {
        self.records.len() + 1
    }

    // page 1 -> templates[0], page n -> templates[min(n-1, last)]
    fn template_index(&self, page_number: usize) -> usize {
        page_number
            .saturating_sub(1)
            .min(self.templates.len().saturating_sub(1))
    }

    fn start_page(&mut self) {
        let template = &self.templates[self.template_index(self.page_number())];
        self.frames = template.instantiate_frames();
        self.frame_index = 0;
        self.placed_on_page = false;
        self.page_flowables = 0;
        self.page_start = Instant::now();
    }

    fn finish_page(&mut self, reason: &'static str) {
        let page_number = self.page_number();
        if self.canvas.is_current_empty() {
            tracing::debug!(page = page_number, reason, "discarding empty page");
        } else {
            self.records.push(PageRecord {
                template: self.template_index(page_number),
                flowables: self.page_flowables,
                render_ms: self.page_start.elapsed().as_secs_f64() * 1000.0,
            });
            self.canvas.show_page();
            tracing::debug!(from = page_number, to = page_number + 1, reason, "page break");
        }
        self.start_page();
    }
}

impl DocTemplate {
    pub fn new(page_templates: Vec<PageTemplate>) -> Self {
        Self {
            page_templates,
            story: Vec::new(),
        }
    }

    pub fn add_flowable(&mut self, flowable: Box<dyn Flowable>) {
        self.story.push(flowable);
    }

    pub fn build(self) -> Result<Document, ReportError> {
        Ok(self.build_with_metrics()?.0)
    }

    pub fn build_with_metrics(self) -> Result<(Document, DocumentMetrics), ReportError> {
        if self.page_templates.is_empty() {
            return Err(ReportError::MissingPageTemplate);
        }
        let templates = self.page_templates.as_slice();
        let mut pager = Pager::new(templates);
        let mut story: VecDeque<Box<dyn Flowable>> = self.story.into_iter().collect();

        while let Some(flowable) = story.pop_front() {
            let mut current = flowable;
            let mut suppress_break_before = false;
            loop {
                let pagination = current.pagination();
                if !suppress_break_before
                    && pagination.break_before == BreakBefore::Page
                    && (pager.placed_on_page || pager.frame_index > 0)
                {
                    pager.finish_page("break_before_page");
                }

                if pager.frame_index >= pager.frames.len() {
                    pager.finish_page("frame_exhausted");
                }
                if pager.frames.is_empty() {
                    return Err(ReportError::MissingPageTemplate);
                }

                let is_last_frame = pager.frame_index + 1 >= pager.frames.len();
                let unplaced = !pager.placed_on_page && is_last_frame;
                let name = current.debug_name();
                let frame = &mut pager.frames[pager.frame_index];
                let frame_rect = frame.rect();
                match frame.add(current, &mut pager.canvas) {
                    AddResult::Placed => {
                        pager.placed_on_page = true;
                        pager.page_flowables += 1;
                        if pagination.break_after == BreakAfter::Page {
                            pager.finish_page("break_after_page");
                        }
                        break;
                    }
                    AddResult::Split(remaining) => {
                        pager.placed_on_page = true;
                        pager.page_flowables += 1;
                        suppress_break_before = true;
                        current = remaining;
                        pager.frame_index += 1;
                    }
                    AddResult::Overflow(remaining) => {
                        if unplaced {
                            return Err(ReportError::UnplaceableFlowable(format!(
                                "{name} frame={}x{}pt",
                                frame_rect.width.to_f32(),
                                frame_rect.height.to_f32()
                            )));
                        }
                        current = remaining;
                        pager.frame_index += 1;
                    }
                }
            }
        }

        if !pager.canvas.is_current_empty() {
            pager.finish_page("end_of_story");
        }
        if pager.records.is_empty() {
            // An empty story still yields one (decorated) page.
            pager.records.push(PageRecord {
                template: 0,
                flowables: 0,
                render_ms: 0.0,
            });
            pager.canvas.show_page();
        }

        let records = std::mem::take(&mut pager.records);
        let mut document = pager.canvas.finish_without_show();
        let metrics = decorate_pages(&mut document, templates, &records);
        Ok((document, metrics))
    }
}

fn decorate_pages(
    document: &mut Document,
    templates: &[PageTemplate],
    records: &[PageRecord],
) -> DocumentMetrics {
    let mut metrics = DocumentMetrics::default();
    let page_count = document.pages.len();
    for (idx, (page, record)) in document.pages.iter_mut().zip(records).enumerate() {
        let started = Instant::now();
        let template = &templates[record.template];
        let mut commands = vec![Command::Meta {
            key: META_PAGE_TEMPLATE_KEY.to_string(),
            value: template.name.clone(),
        }];
        if let Some(callback) = template.on_page() {
            let mut overlay = Canvas::new(document.page_size);
            overlay.save_state();
            callback(
                &mut overlay,
                &DocContext::new(idx + 1, page_count, template.name.as_str()),
            );
            overlay.restore_state();
            commands.extend(overlay.into_commands());
        }
        commands.append(&mut page.commands);
        page.commands = commands;

        let render_ms = record.render_ms + started.elapsed().as_secs_f64() * 1000.0;
        metrics.total_render_ms += render_ms;
        metrics.pages.push(PageMetrics {
            page_number: idx + 1,
            render_ms,
            command_count: page.commands.len(),
            flowable_count: record.flowables,
        });
    }
    metrics
}
