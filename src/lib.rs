//! Branded investment-assessment and investor-match PDF reports.
//!
//! A report is a story of flowables (paragraphs, tables, spacers and
//! widgets) poured into page frames by [`DocTemplate`], decorated with a
//! footer, and written as a PDF using the standard Helvetica faces.

mod canvas;
pub mod components;
pub mod config;
pub mod data;
mod doc_context;
mod doc_template;
mod error;
mod flowable;
mod font;
mod frame;
pub mod inspect;
pub mod markup;
mod metrics;
mod page_template;
pub mod pdf;
pub mod report;
pub mod style;
mod table;
mod types;

pub use canvas::{Canvas, Command, Document, Page};
pub use config::{RenderConfig, RenderConfigBuilder};
pub use doc_context::DocContext;
pub use doc_template::{DocTemplate, META_PAGE_TEMPLATE_KEY};
pub use error::ReportError;
pub use flowable::{
    BreakAfter, BreakBefore, BreakInside, Flowable, PageBreak, Pagination, Paragraph, Spacer,
    TextAlign,
};
pub use font::StandardFont;
pub use frame::{AddResult, Frame};
pub use inspect::{PdfInspectError, PdfInspectErrorCode, PdfInspectReport};
pub use metrics::{DocumentMetrics, PageMetrics};
pub use page_template::{FrameSpec, OnPageCallback, PageTemplate};
pub use pdf::PdfOptions;
pub use report::{
    InvestmentAssessmentReport, InvestorMatchesReport, ReportGenerator, ReportKind, ReportOutput,
    render_report,
};
pub use style::{ParagraphStyle, StyleSheet};
pub use table::{CellContent, CellRange, Edge, Table, TableStyle, TableStyleCommand, VerticalAlign};
pub use types::{Color, INCH, Margins, Pt, Rect, Size};
