//! Re-reads written PDFs with lopdf to confirm they parse.

use lopdf::{Document as LoDocument, Object as LoObject};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfInspectErrorCode {
    PdfParseFailed,
    PdfEncryptedUnsupported,
    PdfEmptyOrNoPages,
    PdfIoError,
}

impl PdfInspectErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfInspectErrorCode::PdfParseFailed => "PDF_PARSE_FAILED",
            PdfInspectErrorCode::PdfEncryptedUnsupported => "PDF_ENCRYPTED_UNSUPPORTED",
            PdfInspectErrorCode::PdfEmptyOrNoPages => "PDF_EMPTY_OR_NO_PAGES",
            PdfInspectErrorCode::PdfIoError => "PDF_IO_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .code.as_str())]
pub struct PdfInspectError {
    pub code: PdfInspectErrorCode,
    pub message: String,
}

impl PdfInspectError {
    fn new(code: PdfInspectErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfInspectReport {
    pub pdf_version: String,
    pub page_count: usize,
    pub encrypted: bool,
    pub file_size_bytes: usize,
    pub title: Option<String>,
    /// `BaseFont` names of every font dictionary, sorted.
    pub fonts: Vec<String>,
}

pub fn inspect_pdf_bytes(bytes: &[u8]) -> Result<PdfInspectReport, PdfInspectError> {
    let pdf = LoDocument::load_mem(bytes)
        .map_err(|err| PdfInspectError::new(PdfInspectErrorCode::PdfParseFailed, err.to_string()))?;

    Ok(PdfInspectReport {
        pdf_version: pdf.version.clone(),
        page_count: pdf.get_pages().len(),
        encrypted: pdf.is_encrypted(),
        file_size_bytes: bytes.len(),
        title: info_title(&pdf),
        fonts: base_fonts(&pdf),
    })
}

pub fn inspect_pdf_path(path: &Path) -> Result<PdfInspectReport, PdfInspectError> {
    let data = std::fs::read(path)
        .map_err(|err| PdfInspectError::new(PdfInspectErrorCode::PdfIoError, err.to_string()))?;
    inspect_pdf_bytes(&data)
}

fn info_title(pdf: &LoDocument) -> Option<String> {
    let info = pdf.trailer.get(b"Info").ok()?.as_reference().ok()?;
    match pdf.get_dictionary(info).ok()?.get(b"Title").ok()? {
        LoObject::String(bytes, _) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn base_fonts(pdf: &LoDocument) -> Vec<String> {
    let mut fonts: Vec<String> = pdf
        .objects
        .values()
        .filter_map(|object| match object {
            LoObject::Dictionary(dict) => Some(dict),
            _ => None,
        })
        .filter(|dict| matches!(dict.get(b"Type"), Ok(LoObject::Name(name)) if name.as_slice() == b"Font"))
        .filter_map(|dict| match dict.get(b"BaseFont") {
            Ok(LoObject::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        })
        .collect();
    fonts.sort();
    fonts.dedup();
    fonts
}

pub fn output_issues(report: &PdfInspectReport) -> Vec<PdfInspectErrorCode> {
    let mut issues = Vec::new();
    if report.encrypted {
        issues.push(PdfInspectErrorCode::PdfEncryptedUnsupported);
    }
    if report.page_count == 0 {
        issues.push(PdfInspectErrorCode::PdfEmptyOrNoPages);
    }
    issues
}

/// Fails on the first problem [`output_issues`] finds.
pub fn require_valid_output(report: &PdfInspectReport) -> Result<(), PdfInspectError> {
    match output_issues(report).first() {
        Some(PdfInspectErrorCode::PdfEncryptedUnsupported) => Err(PdfInspectError::new(
            PdfInspectErrorCode::PdfEncryptedUnsupported,
            "report pdf is encrypted",
        )),
        Some(PdfInspectErrorCode::PdfEmptyOrNoPages) => Err(PdfInspectError::new(
            PdfInspectErrorCode::PdfEmptyOrNoPages,
            "report pdf has no pages",
        )),
        _ => Ok(()),
    }
}
