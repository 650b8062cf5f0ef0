use crate::loader::LoadReport;
use crate::metrics::Report;
use crate::schema::CanonicalField;
use crate::types::{ProgramRow, RoundRow, YearRow};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// What `summary.json` holds: the report plus enough load context to tell a
/// degraded source apart from a quiet one.
#[derive(Debug, Serialize)]
pub struct SummaryDocument<'a> {
    pub source: &'a str,
    pub loaded_rows: usize,
    pub dropped_undated: usize,
    pub unresolved: Vec<CanonicalField>,
    #[serde(flatten)]
    pub report: &'a Report,
}

impl<'a> SummaryDocument<'a> {
    pub fn new(load: &'a LoadReport, report: &'a Report) -> Self {
        Self {
            source: &load.location,
            loaded_rows: load.loaded_rows,
            dropped_undated: load.dropped_undated,
            unresolved: load.schema.unresolved().iter().copied().collect(),
            report,
        }
    }
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown rendering of the first `max_rows` rows, or `(no rows)`.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", render_table(rows, max_rows));
    if rows.len() > max_rows {
        println!("({} more rows not shown)\n", rows.len() - max_rows);
    }
}

pub fn program_rows(report: &Report) -> Vec<ProgramRow> {
    report.programs.iter().map(ProgramRow::from).collect()
}

pub fn year_rows(report: &Report) -> Vec<YearRow> {
    report.years.iter().map(YearRow::from).collect()
}

pub fn round_rows<'a, I>(rounds: I) -> Vec<RoundRow>
where
    I: IntoIterator<Item = &'a crate::types::Round>,
{
    rounds.into_iter().map(RoundRow::from).collect()
}
