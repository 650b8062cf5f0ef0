use crate::metrics::{ProgramBreakdown, YearTotals};
use crate::util::{format_int, format_optional};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

/// A normalized round whose date may still be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundDraft {
    pub draw_number: Option<String>,
    pub draw_date: Option<NaiveDate>,
    pub program_name: String,
    pub subtype: Option<String>,
    pub score: Option<f64>,
    pub invitation_count: Option<u64>,
}

impl RoundDraft {
    /// Promote to a stored round; `None` when the date never parsed.
    pub fn into_round(self) -> Option<Round> {
        Some(Round {
            draw_number: self.draw_number,
            draw_date: self.draw_date?,
            program_name: self.program_name,
            subtype: self.subtype,
            score: self.score,
            invitation_count: self.invitation_count,
        })
    }
}

/// One invitation round as stored in a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Round {
    pub draw_number: Option<String>,
    pub draw_date: NaiveDate,
    pub program_name: String,
    pub subtype: Option<String>,
    pub score: Option<f64>,
    pub invitation_count: Option<u64>,
}

impl Round {
    pub fn year(&self) -> i32 {
        self.draw_date.year()
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RoundRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: String,
    #[serde(rename = "Draw")]
    #[tabled(rename = "Draw")]
    pub draw_number: String,
    #[serde(rename = "Program")]
    #[tabled(rename = "Program")]
    pub program: String,
    #[serde(rename = "Subtype")]
    #[tabled(rename = "Subtype")]
    pub subtype: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
    #[serde(rename = "Invitations")]
    #[tabled(rename = "Invitations")]
    pub invitations: String,
}

impl From<&Round> for RoundRow {
    fn from(r: &Round) -> Self {
        RoundRow {
            date: r.draw_date.to_string(),
            draw_number: r.draw_number.clone().unwrap_or_default(),
            program: r.program_name.clone(),
            subtype: r.subtype.clone().unwrap_or_default(),
            score: r.score.map(|s| s.to_string()).unwrap_or_default(),
            invitations: r.invitation_count.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProgramRow {
    #[serde(rename = "Program")]
    #[tabled(rename = "Program")]
    pub program: String,
    #[serde(rename = "Rounds")]
    #[tabled(rename = "Rounds")]
    pub rounds: usize,
    #[serde(rename = "Invitations")]
    #[tabled(rename = "Invitations")]
    pub invitations: String,
    #[serde(rename = "LastRound")]
    #[tabled(rename = "LastRound")]
    pub last_round: String,
    #[serde(rename = "LastScore")]
    #[tabled(rename = "LastScore")]
    pub last_score: String,
    #[serde(rename = "MyScore")]
    #[tabled(rename = "MyScore")]
    pub comparison: String,
}

impl From<&ProgramBreakdown> for ProgramRow {
    fn from(p: &ProgramBreakdown) -> Self {
        ProgramRow {
            program: p.program.clone(),
            rounds: p.rounds,
            invitations: format_int(p.invitations),
            last_round: p.latest_date.to_string(),
            last_score: format_optional(p.latest_score, 0),
            comparison: p.outcome.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Rounds")]
    #[tabled(rename = "Rounds")]
    pub rounds: usize,
    #[serde(rename = "Invitations")]
    #[tabled(rename = "Invitations")]
    pub invitations: String,
}

impl From<&YearTotals> for YearRow {
    fn from(y: &YearTotals) -> Self {
        YearRow {
            year: y.year,
            rounds: y.rounds,
            invitations: format_int(y.invitations),
        }
    }
}
