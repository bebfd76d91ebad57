#[derive(Debug, Clone, Default)]
pub struct PageMetrics {
    pub page_number: usize,
    pub render_ms: f64,
    pub command_count: usize,
    pub flowable_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetrics {
    pub pages: Vec<PageMetrics>,
    pub total_render_ms: f64,
    /// Size of the written PDF; zero until the document has been serialised.
    pub total_bytes: usize,
}

impl DocumentMetrics {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total_flowables(&self) -> usize {
        self.pages.iter().map(|page| page.flowable_count).sum()
    }
}
