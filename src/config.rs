use crate::error::ReportError;
use crate::types::{Margins, Pt, Size};

pub const DEFAULT_BRAND: &str = "Crowley Capital";
pub const DEFAULT_REPORT_DATE: &str = "January 2026";

/// Page geometry and branding shared by every report.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub page_size: Size,
    pub margins: Margins,
    pub brand: String,
    pub report_date: String,
    /// Draw the running title and rule on pages after the first.
    pub running_header: bool,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }

    /// Letter paper, 0.6in margins with 0.75in at the bottom.
    pub fn default_margins() -> Margins {
        Margins {
            top: Pt::inches(0.6),
            right: Pt::inches(0.6),
            bottom: Pt::inches(0.75),
            left: Pt::inches(0.6),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_size: Size::letter(),
            margins: Self::default_margins(),
            brand: DEFAULT_BRAND.to_string(),
            report_date: DEFAULT_REPORT_DATE.to_string(),
            running_header: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, size: Size) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.config.margins = margins;
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.config.brand = brand.into();
        self
    }

    pub fn report_date(mut self, date: impl Into<String>) -> Self {
        self.config.report_date = date.into();
        self
    }

    pub fn running_header(mut self, enabled: bool) -> Self {
        self.config.running_header = enabled;
        self
    }

    pub fn build(self) -> Result<RenderConfig, ReportError> {
        let config = self.config;
        if config.page_size.width <= Pt::ZERO || config.page_size.height <= Pt::ZERO {
            return Err(ReportError::InvalidConfiguration(
                "page size must be positive".to_string(),
            ));
        }
        let margins = [
            config.margins.top,
            config.margins.right,
            config.margins.bottom,
            config.margins.left,
        ];
        if margins.iter().any(|margin| *margin < Pt::ZERO) {
            return Err(ReportError::InvalidConfiguration(
                "margins must not be negative".to_string(),
            ));
        }
        let content = config.margins.content_rect(config.page_size);
        if content.width <= Pt::ZERO || content.height <= Pt::ZERO {
            return Err(ReportError::InvalidConfiguration(
                "margins leave no room for content".to_string(),
            ));
        }
        if config.brand.trim().is_empty() {
            return Err(ReportError::InvalidConfiguration(
                "brand must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}
