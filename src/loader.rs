use crate::config::{DashboardConfig, SourceFormat, SourceSpec};
use crate::error::{LoadError, Result};
use crate::normalize::{NormalizeStats, RowNormalizer};
use crate::record_set::RecordSet;
use crate::schema::{map_columns, SchemaMap};
use csv::ReaderBuilder;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source contents as untyped cells; `None` is an empty or missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub location: String,
    pub total_rows: usize,
    pub row_errors: usize,
    pub dropped_undated: usize,
    pub invalid_scores: usize,
    pub invalid_counts: usize,
    pub loaded_rows: usize,
    pub schema: SchemaMap,
}

#[derive(Debug, Clone)]
pub struct Loaded {
    pub records: RecordSet,
    pub report: LoadReport,
}

/// One full load: read the source, map its columns, normalize every row and
/// build the record set. Any structural failure aborts with no partial data.
pub fn load(config: &DashboardConfig) -> Result<Loaded> {
    let text = read_source(&config.source, config.timeout_secs)?;
    load_from_str(&text, config)
}

/// Like [`load`], for source text already in memory.
pub fn load_from_str(text: &str, config: &DashboardConfig) -> Result<Loaded> {
    let location = config.source.location.as_str();
    let (table, row_errors) = match config.source.format {
        SourceFormat::Csv => parse_csv(text, config.source.delimiter, location)?,
        SourceFormat::Json => parse_json(text, location)?,
    };

    let schema = map_columns(&table.headers, &config.field_rules);
    if !schema.is_complete() {
        let missing: Vec<&str> = schema.unresolved().iter().map(|f| f.name()).collect();
        warn!(source = location, fields = ?missing, "unresolved fields; continuing without them");
    }
    debug!(mapping = ?schema.mapping(), "column mapping");

    let normalizer = RowNormalizer::new(
        &schema,
        config.date_order,
        &config.program_sentinel,
    );
    let mut stats = NormalizeStats::default();
    let drafts: Vec<_> = table
        .rows
        .iter()
        .map(|row| normalizer.normalize(row, &mut stats))
        .collect();
    let total_rows = drafts.len() + row_errors;
    let records = RecordSet::from_drafts(drafts);

    let report = LoadReport {
        location: location.to_string(),
        total_rows,
        row_errors,
        dropped_undated: stats.invalid_dates,
        invalid_scores: stats.invalid_scores,
        invalid_counts: stats.invalid_counts,
        loaded_rows: records.len(),
        schema,
    };
    info!(
        source = location,
        rows = report.total_rows,
        loaded = report.loaded_rows,
        dropped = report.dropped_undated,
        "source loaded"
    );
    Ok(Loaded { records, report })
}

/// Fetch or read the raw source text.
///
/// Files are decoded lossily so a stray Latin-1 byte in an export degrades one
/// cell instead of failing the whole load.
pub fn read_source(source: &SourceSpec, timeout_secs: u64) -> Result<String> {
    if source.is_remote() {
        return fetch(&source.location, timeout_secs);
    }
    let path = PathBuf::from(&source.location);
    let bytes = fs::read(&path).map_err(|source| LoadError::FileRead { path, source })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn fetch(url: &str, timeout_secs: u64) -> Result<String> {
    info!(url, "fetching remote source");
    let wrap = |source: reqwest::Error| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(wrap)?;
    client
        .get(url)
        .send()
        .and_then(|resp| resp.error_for_status())
        .and_then(|resp| resp.text())
        .map_err(wrap)
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse delimited text. Returns the table and the number of records that
/// could not be decoded (those rows are skipped).
pub fn parse_csv(text: &str, delimiter: char, location: &str) -> Result<(RawTable, usize)> {
    if !delimiter.is_ascii() {
        return Err(LoadError::InvalidDelimiter { delimiter });
    }
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|source| LoadError::CsvParse {
            location: location.to_string(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(LoadError::MissingHeader {
            location: location.to_string(),
        });
    }

    let mut rows = Vec::new();
    let mut row_errors = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors += 1;
                debug!(record = idx + 1, error = %e, "skipping unreadable record");
                continue;
            }
        };
        rows.push(record.iter().map(cell).collect());
    }
    Ok((RawTable { headers, rows }, row_errors))
}

fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => cell(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse a `{ "rounds": [ {...}, ... ] }` document.
///
/// Columns are the union of keys across all rounds, in first-seen order.
/// Returns the table and the number of `rounds` elements that were not
/// objects (those are skipped).
pub fn parse_json(text: &str, location: &str) -> Result<(RawTable, usize)> {
    let doc: Value = serde_json::from_str(text).map_err(|source| LoadError::JsonParse {
        location: location.to_string(),
        source,
    })?;
    let rounds = doc
        .get("rounds")
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::MissingRounds {
            location: location.to_string(),
        })?;

    let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(rounds.len());
    let mut row_errors = 0usize;
    for (index, value) in rounds.iter().enumerate() {
        match value.as_object() {
            Some(obj) => objects.push(obj),
            None => {
                row_errors += 1;
                debug!(round = index, "skipping round that is not a JSON object");
            }
        }
    }

    let mut headers: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(json_cell))
                .collect()
        })
        .collect();
    Ok((RawTable { headers, rows }, row_errors))
}
