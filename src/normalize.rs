// Field coercion from raw cell text to typed round values.
//
// Nothing in here fails: a value that cannot be coerced becomes `None`, and
// the caller decides whether to count it, drop the row, or keep going.
use crate::schema::{CanonicalField, SchemaMap};
use crate::types::RoundDraft;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field order of numeric dates in a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `dd/mm/yyyy`, as in the IRCC and MPNP exports.
    #[default]
    DayFirst,
    /// `mm/dd/yyyy`.
    MonthFirst,
    /// `yyyy/mm/dd`.
    YearFirst,
}

impl DateOrder {
    fn formats(self) -> &'static [&'static str] {
        match self {
            DateOrder::DayFirst => &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"],
            DateOrder::MonthFirst => &["%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y"],
            DateOrder::YearFirst => &["%Y/%m/%d", "%Y.%m.%d"],
        }
    }
}

// Spelled-out month names are unambiguous, so they are tried for every order.
const LONG_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];

/// Parse a date cell under the given convention.
///
/// ISO `YYYY-MM-DD` (with or without a trailing time part) is always tried
/// first, which keeps the function idempotent over its own output. The year
/// must be written with four digits; chrono's `%Y` alone would read `25` as
/// the year 25.
pub fn normalize_date(raw: Option<&str>, order: DateOrder) -> Option<NaiveDate> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    let date = parse_iso(s).or_else(|| {
        order
            .formats()
            .iter()
            .chain(LONG_FORMATS)
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    })?;
    (1000..=9999).contains(&date.year()).then_some(date)
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    let (head, tail) = (s.get(..10)?, s.get(10..)?);
    if tail.starts_with(['T', ' ']) {
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    } else {
        None
    }
}

/// Parse a cutoff score. `0` is a real score; only unusable text is `None`.
///
/// Text containing letters other than an exponent marker is rejected up
/// front so that `NaN` and `inf`, which `f64::from_str` accepts, never reach
/// the metrics.
pub fn normalize_score(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() || s.chars().any(|c| c.is_alphabetic() && !matches!(c, 'e' | 'E')) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_grouping(c: char) -> bool {
    matches!(c, ',' | '\'' | '_' | '\u{a0}' | '\u{202f}') || c.is_whitespace()
}

/// Parse an invitation count after stripping grouping separators.
///
/// Integral float text (`"1200.0"`, as some feeds emit) is accepted; negative
/// or fractional counts are not.
pub fn normalize_count(raw: Option<&str>) -> Option<u64> {
    let cleaned: String = raw?.chars().filter(|c| !is_grouping(*c)).collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(n) = cleaned.parse::<u64>() {
        return Some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    // `u64::MAX as f64` rounds up to 2^64, which no u64 can hold.
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

/// Trimmed program label, or `sentinel` when absent or blank.
pub fn normalize_program(raw: Option<&str>, sentinel: &str) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => sentinel.to_string(),
    }
}

/// Trimmed free text, `None` when blank.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Counters for values that degraded to `None` while normalizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub invalid_dates: usize,
    pub invalid_scores: usize,
    pub invalid_counts: usize,
}

/// Turns raw rows into [`RoundDraft`]s using a resolved [`SchemaMap`].
///
/// Column positions come from the schema map; an unresolved field simply
/// reads as absent for every row.
#[derive(Debug, Clone)]
pub struct RowNormalizer<'a> {
    date: Option<usize>,
    score: Option<usize>,
    count: Option<usize>,
    program: Option<usize>,
    draw_number: Option<usize>,
    subtype: Option<usize>,
    date_order: DateOrder,
    sentinel: &'a str,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(schema: &SchemaMap, date_order: DateOrder, sentinel: &'a str) -> Self {
        Self {
            date: schema.index(CanonicalField::Date),
            score: schema.index(CanonicalField::Score),
            count: schema.index(CanonicalField::InvitationCount),
            program: schema.index(CanonicalField::ProgramName),
            draw_number: schema.index(CanonicalField::DrawNumber),
            subtype: schema.index(CanonicalField::Subtype),
            date_order,
            sentinel,
        }
    }

    pub fn normalize(&self, row: &[Option<String>], stats: &mut NormalizeStats) -> RoundDraft {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(|c| c.as_deref());

        let raw_date = cell(self.date);
        let draw_date = normalize_date(raw_date, self.date_order);
        if draw_date.is_none() {
            stats.invalid_dates += 1;
            debug!(value = ?raw_date, "unparseable draw date");
        }

        let raw_score = cell(self.score);
        let score = normalize_score(raw_score);
        if score.is_none() && has_text(raw_score) {
            stats.invalid_scores += 1;
            debug!(value = ?raw_score, "invalid score");
        }

        let raw_count = cell(self.count);
        let invitation_count = normalize_count(raw_count);
        if invitation_count.is_none() && has_text(raw_count) {
            stats.invalid_counts += 1;
            debug!(value = ?raw_count, "invalid invitation count");
        }

        RoundDraft {
            draw_number: normalize_text(cell(self.draw_number)),
            draw_date,
            program_name: normalize_program(cell(self.program), self.sentinel),
            subtype: normalize_text(cell(self.subtype)),
            score,
            invitation_count,
        }
    }
}

fn has_text(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| !s.trim().is_empty())
}
