use crate::inspect::PdfInspectError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no page template available")]
    MissingPageTemplate,
    #[error("flowable cannot fit on any page: {0}")]
    UnplaceableFlowable(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to decode {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf inspection failed: {0}")]
    Inspect(#[from] PdfInspectError),
}
