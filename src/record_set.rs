//! The immutable, date-ordered collection of rounds every filter and metric reads.

use crate::types::{Round, RoundDraft};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Rounds sorted by draw date, most recent first.
///
/// Every member has a valid date: drafts without one are dropped on
/// construction. There are no mutating methods; a fresh load builds a new set
/// and filtering borrows a subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    rounds: Vec<Round>,
}

impl RecordSet {
    /// Drop undated drafts and stable-sort the rest by date, descending.
    ///
    /// Rounds sharing a date keep their input order.
    pub fn from_drafts<I>(drafts: I) -> Self
    where
        I: IntoIterator<Item = RoundDraft>,
    {
        let mut rounds: Vec<Round> = drafts
            .into_iter()
            .filter_map(RoundDraft::into_round)
            .collect();
        rounds.sort_by(|a, b| b.draw_date.cmp(&a.draw_date));
        Self { rounds }
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Round> {
        self.rounds.iter()
    }

    /// Every round as a borrowed view, in set order.
    pub fn all(&self) -> Vec<&Round> {
        self.rounds.iter().collect()
    }

    /// Distinct program names, sorted.
    pub fn programs(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rounds.iter().map(|r| r.program_name.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Distinct draw years, ascending.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.rounds.iter().map(Round::year).collect();
        set.into_iter().collect()
    }

    /// Distinct non-empty subtypes, sorted.
    pub fn subtypes(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .rounds
            .iter()
            .filter_map(|r| r.subtype.as_deref())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rounds.first().map(|r| r.draw_date)
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.rounds.last().map(|r| r.draw_date)
    }

    /// `(earliest, latest)` draw dates.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.earliest_date()?, self.latest_date()?))
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Round;
    type IntoIter = std::slice::Iter<'a, Round>;

    fn into_iter(self) -> Self::IntoIter {
        self.rounds.iter()
    }
}
