//! Dashboard configuration: where a source lives and how to read it.
//!
//! Each observed dashboard variant is a [`Preset`]. Anything a preset fixes
//! (delimiter, date convention, header aliases, program sentinel) can also be
//! given as a JSON file:
//!
//! ```json
//! {
//!   "name": "EE rounds",
//!   "source": { "format": "csv", "location": "Canada.csv", "delimiter": ";" },
//!   "dateOrder": "day-first",
//!   "programSentinel": "Unspecified",
//!   "fieldRules": [
//!     { "field": "date", "exact": ["Date"], "anyOf": ["date"] }
//!   ]
//! }
//! ```

use crate::error::{LoadError, Result};
use crate::normalize::DateOrder;
use crate::schema::{default_rules, CanonicalField, FieldRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Express Entry rounds feed published by IRCC.
pub const EE_FEED_URL: &str =
    "https://www.canada.ca/content/dam/ircc/documents/json/ee_rounds_123_en.json";

pub const DEFAULT_SENTINEL: &str = "Unspecified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Delimited text with a header row.
    Csv,
    /// Object with a `rounds` array of objects.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    pub format: SourceFormat,
    /// File path, or an `http://` / `https://` URL.
    pub location: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl SourceSpec {
    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

fn default_delimiter() -> char {
    ';'
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub name: String,
    pub source: SourceSpec,
    #[serde(default)]
    pub date_order: DateOrder,
    #[serde(default = "default_sentinel")]
    pub program_sentinel: String,
    #[serde(default = "default_rules")]
    pub field_rules: Vec<FieldRule>,
    /// Timeout for remote fetches, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DashboardConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Same configuration, reading from another file or URL.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.source.location = location.into();
        self
    }
}

/// Built-in configurations for the observed dashboard variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Express Entry CSV export (`Canada.csv`).
    ExpressEntry,
    /// Manitoba PNP CSV export (`MPNP.csv`).
    Mpnp,
    /// Express Entry JSON feed.
    EeFeed,
}

impl Preset {
    pub fn config(self) -> DashboardConfig {
        match self {
            Preset::ExpressEntry => DashboardConfig {
                name: "Express Entry".to_string(),
                source: SourceSpec {
                    format: SourceFormat::Csv,
                    location: "Canada.csv".to_string(),
                    delimiter: ';',
                },
                date_order: DateOrder::DayFirst,
                program_sentinel: DEFAULT_SENTINEL.to_string(),
                field_rules: vec![
                    FieldRule::heuristic(CanonicalField::Date).with_exact(&["Date", "Fecha"]),
                    FieldRule::heuristic(CanonicalField::Score).with_exact(&[
                        "CRS score of lowest-ranked candidate invited",
                        "CRS mínimo",
                    ]),
                    FieldRule::heuristic(CanonicalField::InvitationCount)
                        .with_exact(&["Invitations issued", "Invitaciones"]),
                    FieldRule::heuristic(CanonicalField::ProgramName)
                        .with_exact(&["Round type", "Tipo de Ronda"]),
                    FieldRule::heuristic(CanonicalField::DrawNumber).with_exact(&["#", "Round"]),
                ],
                timeout_secs: default_timeout(),
            },
            Preset::Mpnp => DashboardConfig {
                name: "Manitoba Provincial Nominee Program".to_string(),
                source: SourceSpec {
                    format: SourceFormat::Csv,
                    location: "MPNP.csv".to_string(),
                    delimiter: ';',
                },
                date_order: DateOrder::DayFirst,
                program_sentinel: "General".to_string(),
                field_rules: vec![
                    FieldRule::heuristic(CanonicalField::Date).with_exact(&["Fecha"]),
                    FieldRule::heuristic(CanonicalField::Score).with_exact(&[
                        "Ranking score of lowest-ranked candidate invited",
                        "Puntaje mínimo",
                    ]),
                    FieldRule::heuristic(CanonicalField::InvitationCount).with_exact(&[
                        "Number of Letters of Advice to Apply issued",
                        "Invitaciones",
                    ]),
                    FieldRule::heuristic(CanonicalField::ProgramName).with_exact(&["Tipo"]),
                    FieldRule::heuristic(CanonicalField::DrawNumber).with_exact(&["Draw", "Ronda"]),
                    FieldRule::heuristic(CanonicalField::Subtype).with_exact(&["Subtipo"]),
                ],
                timeout_secs: default_timeout(),
            },
            Preset::EeFeed => DashboardConfig {
                name: "Express Entry (feed)".to_string(),
                source: SourceSpec {
                    format: SourceFormat::Json,
                    location: EE_FEED_URL.to_string(),
                    delimiter: default_delimiter(),
                },
                date_order: DateOrder::YearFirst,
                program_sentinel: DEFAULT_SENTINEL.to_string(),
                field_rules: default_rules(),
                timeout_secs: default_timeout(),
            },
        }
    }
}
