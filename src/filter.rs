//! Filter selection and its application over a record set.
//!
//! A [`FilterSelection`] is a plain value built from caller input. The
//! dashboards' "reset filters" button is [`FilterSelection::defaults`].

use crate::record_set::RecordSet;
use crate::types::Round;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start > end`. Such a range admits nothing; it is never swapped.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Program checkboxes plus the "select all" toggle.
///
/// With the toggle on every program passes, whatever the explicit set holds.
/// With it off an empty set admits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSelection {
    pub select_all: bool,
    pub selected: BTreeSet<String>,
}

impl ProgramSelection {
    pub fn all() -> Self {
        Self {
            select_all: true,
            selected: BTreeSet::new(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn only<I, S>(programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            select_all: false,
            selected: programs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn admits(&self, program: &str) -> bool {
        self.select_all || self.selected.contains(program)
    }
}

/// Everything a user can pick before a render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    /// `None` leaves dates unrestricted.
    pub date_range: Option<DateRange>,
    pub programs: ProgramSelection,
    /// `None` leaves years unrestricted; `Some(empty)` admits nothing.
    pub years: Option<BTreeSet<i32>>,
    /// Empty leaves subtypes unrestricted. Rounds without a subtype always pass.
    pub subtypes: BTreeSet<String>,
}

impl FilterSelection {
    /// Initial dashboard state for `records`: the full date span, no program
    /// checked, every year checked, no subtype restriction.
    pub fn defaults(records: &RecordSet) -> Self {
        Self {
            date_range: records
                .date_bounds()
                .map(|(start, end)| DateRange::new(start, end)),
            programs: ProgramSelection::none(),
            years: Some(records.years().into_iter().collect()),
            subtypes: BTreeSet::new(),
        }
    }

    pub fn admits(&self, round: &Round) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(round.draw_date) {
                return false;
            }
        }
        if !self.programs.admits(&round.program_name) {
            return false;
        }
        if let Some(years) = &self.years {
            if !years.contains(&round.year()) {
                return false;
            }
        }
        if !self.subtypes.is_empty() {
            if let Some(subtype) = &round.subtype {
                if !self.subtypes.contains(subtype) {
                    return false;
                }
            }
        }
        true
    }

    /// Shorthand for [`filter`].
    pub fn apply<'a>(&self, records: &'a RecordSet) -> Vec<&'a Round> {
        filter(records, self)
    }
}

/// Rounds of `records` admitted by `selection`, in record set order.
pub fn filter<'a>(records: &'a RecordSet, selection: &FilterSelection) -> Vec<&'a Round> {
    if let Some(range) = &selection.date_range {
        if range.is_inverted() {
            warn!(
                start = %range.start,
                end = %range.end,
                "date range starts after it ends; no rounds selected"
            );
            return Vec::new();
        }
    }
    let out: Vec<&Round> = records.iter().filter(|r| selection.admits(r)).collect();
    debug!(kept = out.len(), total = records.len(), "filter applied");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundDraft;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn round(date: NaiveDate, program: &str, subtype: Option<&str>) -> RoundDraft {
        RoundDraft {
            draw_number: None,
            draw_date: Some(date),
            program_name: program.to_string(),
            subtype: subtype.map(str::to_string),
            score: Some(500.0),
            invitation_count: Some(1000),
        }
    }

    fn sample() -> RecordSet {
        RecordSet::from_drafts(vec![
            round(ymd(2025, 3, 1), "CEC", None),
            round(ymd(2025, 1, 15), "PNP", None),
            round(ymd(2024, 11, 2), "CEC", None),
            round(ymd(2024, 6, 20), "French", None),
            round(ymd(2023, 8, 8), "PNP", None),
        ])
    }

    fn programs_of(rounds: &[&Round]) -> Vec<String> {
        rounds.iter().map(|r| r.program_name.clone()).collect()
    }

    #[test]
    fn empty_program_set_admits_nothing() {
        let set = sample();
        let selection = FilterSelection {
            programs: ProgramSelection::none(),
            ..FilterSelection::default()
        };
        assert!(filter(&set, &selection).is_empty());
    }

    #[test]
    fn select_all_matches_every_program_checked() {
        let set = sample();
        let all = FilterSelection {
            programs: ProgramSelection::all(),
            ..FilterSelection::default()
        };
        let explicit = FilterSelection {
            programs: ProgramSelection::only(set.programs()),
            ..FilterSelection::default()
        };
        assert_eq!(filter(&set, &all), filter(&set, &explicit));
        assert_eq!(filter(&set, &all).len(), set.len());
    }

    #[test]
    fn select_all_overrides_explicit_set() {
        let set = sample();
        let selection = FilterSelection {
            programs: ProgramSelection {
                select_all: true,
                selected: ["CEC".to_string()].into_iter().collect(),
            },
            ..FilterSelection::default()
        };
        assert_eq!(filter(&set, &selection).len(), set.len());
    }

    #[test]
    fn date_range_is_inclusive_and_order_preserved() {
        let set = sample();
        let selection = FilterSelection {
            date_range: Some(DateRange::new(ymd(2024, 6, 20), ymd(2025, 1, 15))),
            programs: ProgramSelection::all(),
            ..FilterSelection::default()
        };
        let out = filter(&set, &selection);
        assert_eq!(programs_of(&out), vec!["PNP", "CEC", "French"]);
    }

    #[test]
    fn inverted_range_is_empty_not_swapped() {
        let set = sample();
        let selection = FilterSelection {
            date_range: Some(DateRange::new(ymd(2025, 1, 15), ymd(2024, 6, 20))),
            programs: ProgramSelection::all(),
            ..FilterSelection::default()
        };
        assert!(filter(&set, &selection).is_empty());
    }

    #[test]
    fn predicates_combine_with_and() {
        let set = sample();
        let selection = FilterSelection {
            programs: ProgramSelection::only(["CEC", "PNP"]),
            years: Some([2024, 2025].into_iter().collect()),
            ..FilterSelection::default()
        };
        let out = filter(&set, &selection);
        assert_eq!(programs_of(&out), vec!["CEC", "PNP", "CEC"]);
        assert!(out.iter().all(|r| r.year() >= 2024));
    }

    #[test]
    fn empty_year_set_admits_nothing() {
        let set = sample();
        let selection = FilterSelection {
            programs: ProgramSelection::all(),
            years: Some(BTreeSet::new()),
            ..FilterSelection::default()
        };
        assert!(filter(&set, &selection).is_empty());
    }

    #[test]
    fn subtype_filter_keeps_rounds_without_subtype() {
        let set = RecordSet::from_drafts(vec![
            round(ymd(2025, 2, 1), "Skilled Worker", Some("Overseas")),
            round(ymd(2025, 1, 1), "Skilled Worker", Some("In Manitoba")),
            round(ymd(2024, 12, 1), "Skilled Worker", None),
        ]);
        let selection = FilterSelection {
            programs: ProgramSelection::all(),
            subtypes: ["In Manitoba".to_string()].into_iter().collect(),
            ..FilterSelection::default()
        };
        let out = filter(&set, &selection);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].subtype.as_deref(), Some("In Manitoba"));
        assert_eq!(out[1].subtype, None);
    }

    #[test]
    fn defaults_check_every_year_but_no_program() {
        let set = sample();
        let defaults = FilterSelection::defaults(&set);
        assert_eq!(
            defaults.date_range,
            Some(DateRange::new(ymd(2023, 8, 8), ymd(2025, 3, 1)))
        );
        assert_eq!(
            defaults.years,
            Some([2023, 2024, 2025].into_iter().collect())
        );
        assert!(filter(&set, &defaults).is_empty());

        // Ticking select-all on top of the defaults shows everything.
        let mut reset = defaults.clone();
        reset.programs.select_all = true;
        assert_eq!(filter(&set, &reset).len(), set.len());
        assert_eq!(FilterSelection::defaults(&set), defaults);
    }
}
