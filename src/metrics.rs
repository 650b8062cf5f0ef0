use crate::record_set::RecordSet;
use crate::types::Round;
use crate::util::format_number;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Headline figures over a filtered selection.
///
/// `None` means the metric is undefined for the selection (no scores, too few
/// points, no rounds at all). It is never folded into zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub round_count: usize,
    pub total_invitations: u64,
    pub mean_score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub days_since_last_round: Option<i64>,
    pub score_invitation_correlation: Option<f64>,
}

/// How a user's own score compares with a program's latest cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BenchmarkOutcome {
    /// Benchmark at or above the cutoff, by `margin` points.
    Meets { margin: f64 },
    /// Benchmark below the cutoff, by `gap` points.
    ShortBy { gap: f64 },
    NoComparison,
}

impl BenchmarkOutcome {
    /// Compare `benchmark` with `score` via `benchmark - score`.
    pub fn compare(benchmark: Option<f64>, score: Option<f64>) -> Self {
        match (benchmark, score) {
            (Some(b), Some(s)) => {
                let diff = b - s;
                if diff >= 0.0 {
                    BenchmarkOutcome::Meets { margin: diff }
                } else {
                    BenchmarkOutcome::ShortBy { gap: -diff }
                }
            }
            _ => BenchmarkOutcome::NoComparison,
        }
    }
}

impl fmt::Display for BenchmarkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkOutcome::Meets { margin } => {
                write!(f, "meets threshold (+{})", format_number(*margin, 0))
            }
            BenchmarkOutcome::ShortBy { gap } => {
                write!(f, "short by {}", format_number(*gap, 0))
            }
            BenchmarkOutcome::NoComparison => f.write_str("-"),
        }
    }
}

/// Latest state of one program within a selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramBreakdown {
    pub program: String,
    pub rounds: usize,
    pub invitations: u64,
    pub latest_date: NaiveDate,
    pub latest_score: Option<f64>,
    pub outcome: BenchmarkOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearTotals {
    pub year: i32,
    pub rounds: usize,
    pub invitations: u64,
}

/// Everything the summary view shows for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub programs: Vec<ProgramBreakdown>,
    pub years: Vec<YearTotals>,
}

pub fn build_report(
    filtered: &[&Round],
    all: &RecordSet,
    today: NaiveDate,
    benchmark: Option<f64>,
) -> Report {
    Report {
        summary: summarize(filtered, all, today),
        programs: program_breakdown(filtered, benchmark),
        years: yearly_totals(filtered),
    }
}

pub fn summarize(filtered: &[&Round], all: &RecordSet, today: NaiveDate) -> Summary {
    let scores = present_scores(filtered);
    Summary {
        round_count: filtered.len(),
        total_invitations: total_invitations(filtered),
        mean_score: mean(&scores),
        min_score: scores.iter().copied().reduce(f64::min),
        max_score: scores.iter().copied().reduce(f64::max),
        days_since_last_round: days_since_last_round(filtered, all, today),
        score_invitation_correlation: correlation(filtered),
    }
}

/// Sum of invitation counts; absent counts contribute nothing.
///
/// Saturates at `u64::MAX` instead of overflowing.
pub fn total_invitations(rounds: &[&Round]) -> u64 {
    rounds
        .iter()
        .filter_map(|r| r.invitation_count)
        .fold(0, u64::saturating_add)
}

fn present_scores(rounds: &[&Round]) -> Vec<f64> {
    rounds.iter().filter_map(|r| r.score).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Days from the latest round in `filtered` to `today`.
///
/// An empty selection falls back to the latest round of the whole set; only
/// an empty set yields `None`.
pub fn days_since_last_round(filtered: &[&Round], all: &RecordSet, today: NaiveDate) -> Option<i64> {
    let latest = filtered
        .iter()
        .map(|r| r.draw_date)
        .max()
        .or_else(|| all.latest_date())?;
    Some((today - latest).num_days())
}

/// Per-program latest cutoff, in order of each program's most recent round.
pub fn program_breakdown(rounds: &[&Round], benchmark: Option<f64>) -> Vec<ProgramBreakdown> {
    let mut out: Vec<ProgramBreakdown> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in rounds {
        match index.get(r.program_name.as_str()) {
            Some(&i) => {
                let e = &mut out[i];
                e.rounds += 1;
                e.invitations = e.invitations.saturating_add(r.invitation_count.unwrap_or(0));
                // Input is date-descending, but a caller may hand us any order.
                if r.draw_date > e.latest_date {
                    e.latest_date = r.draw_date;
                    e.latest_score = r.score;
                }
            }
            None => {
                index.insert(r.program_name.as_str(), out.len());
                out.push(ProgramBreakdown {
                    program: r.program_name.clone(),
                    rounds: 1,
                    invitations: r.invitation_count.unwrap_or(0),
                    latest_date: r.draw_date,
                    latest_score: r.score,
                    outcome: BenchmarkOutcome::NoComparison,
                });
            }
        }
    }
    for e in &mut out {
        e.outcome = BenchmarkOutcome::compare(benchmark, e.latest_score);
    }
    out
}

/// Pearson correlation between score and invitation count.
///
/// Defined only over more than two rounds carrying both values, and only when
/// neither series is constant.
pub fn correlation(rounds: &[&Round]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = rounds
        .iter()
        .filter_map(|r| Some((r.score?, r.invitation_count? as f64)))
        .collect();
    if pairs.len() <= 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then_some(r)
}

/// Round and invitation totals per calendar year, ascending.
pub fn yearly_totals(rounds: &[&Round]) -> Vec<YearTotals> {
    let mut map: BTreeMap<i32, (usize, u64)> = BTreeMap::new();
    for r in rounds {
        let e = map.entry(r.year()).or_insert((0, 0));
        e.0 += 1;
        e.1 = e.1.saturating_add(r.invitation_count.unwrap_or(0));
    }
    map.into_iter()
        .map(|(year, (rounds, invitations))| YearTotals {
            year,
            rounds,
            invitations,
        })
        .collect()
}
