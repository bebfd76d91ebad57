/// What a page decoration knows about the page it is drawing on.
#[derive(Debug, Clone)]
pub struct DocContext {
    pub page_number: usize,
    pub page_count: usize,
    pub template_name: String,
}

impl DocContext {
    pub fn new(page_number: usize, page_count: usize, template_name: impl Into<String>) -> Self {
        Self {
            page_number,
            page_count,
            template_name: template_name.into(),
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.page_number <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.page_number >= self.page_count
    }
}
