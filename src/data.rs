//! JSON input records for the two report kinds.

use crate::error::ReportError;
use crate::style::resolve_color;
use crate::types::Color;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A scalar table cell as written in the input.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct CellValue(pub serde_json::Value);

impl CellValue {
    pub fn text(text: impl Into<String>) -> Self {
        Self(serde_json::Value::String(text.into()))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use serde_json::Value;
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(text) => f.write_str(text),
            Value::Number(number) => write!(f, "{number}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            other => write!(f, "{other}"),
        }
    }
}

/// Rows of cells; the first row is styled as the header.
pub type TableRows = Vec<Vec<CellValue>>;

pub fn rows_to_text(rows: &[Vec<CellValue>]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

/// A numeric score, displayed the way the input wrote it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Score(pub serde_json::Number);

impl Score {
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or(0.0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self(serde_json::Number::from(0))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `[value, label]` or `[value, label, colour]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<CellValue>")]
pub struct Metric {
    pub value: String,
    pub label: String,
    pub color: Option<String>,
}

impl Metric {
    /// Border colour; unknown names fall back to `default`.
    pub fn resolved_color(&self, default: Color) -> Color {
        self.color
            .as_deref()
            .and_then(resolve_color)
            .unwrap_or(default)
    }
}

impl TryFrom<Vec<CellValue>> for Metric {
    type Error = String;

    fn try_from(entries: Vec<CellValue>) -> Result<Self, Self::Error> {
        match entries.as_slice() {
            [value, label] => Ok(Self {
                value: value.to_string(),
                label: label.to_string(),
                color: None,
            }),
            [value, label, color] => Ok(Self {
                value: value.to_string(),
                label: label.to_string(),
                color: Some(color.to_string()).filter(|name| !name.is_empty()),
            }),
            other => Err(format!(
                "metric must have 2 or 3 entries, found {}",
                other.len()
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Risk {
    pub category: String,
    pub score: Score,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub terms: Vec<String>,
}

impl Recommendation {
    /// No status, verdict, rationale or terms; rendered as if absent.
    pub fn is_empty(&self) -> bool {
        let blank = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);
        blank(&self.status)
            && blank(&self.verdict)
            && blank(&self.rationale)
            && self.terms.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct AssessmentData {
    #[serde(default)]
    pub verdict: Option<String>,
    #[serde(default)]
    pub verdict_color: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<Metric>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: TableRows,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue_projections: TableRows,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub overall_risk_score: Option<Score>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct InvestorMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub check_range: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hq: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thesis: String,
    #[serde(default)]
    pub fit_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OutreachTiers {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier1: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier2: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier3: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct InvestorMatchesData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile: TableRows,
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<InvestorMatch>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outreach_tiers: OutreachTiers,
    #[serde(default)]
    pub insight: Option<String>,
}

/// Reads and decodes one JSON record from `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let raw = std::fs::read(path)?;
    serde_json::from_slice(&raw).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}
