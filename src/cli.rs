use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};
use draws_report::config::Preset;
use draws_report::filter::{DateRange, FilterSelection, ProgramSelection};
use draws_report::record_set::RecordSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Express Entry CSV export (Canada.csv).
    ExpressEntry,
    /// Manitoba PNP CSV export (MPNP.csv).
    Mpnp,
    /// Express Entry JSON feed from canada.ca.
    EeFeed,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::ExpressEntry => Preset::ExpressEntry,
            PresetArg::Mpnp => Preset::Mpnp,
            PresetArg::EeFeed => Preset::EeFeed,
        }
    }
}

/// Summarize Express Entry and MPNP invitation rounds.
///
/// Nothing is shown until at least one program is selected (`--program` or
/// `--all-programs`), the same as the dashboards' unchecked boxes.
#[derive(Parser, Debug, Clone)]
#[command(name = "draws-report", version, about, long_about = None)]
pub struct Args {
    /// Built-in source layout.
    #[arg(long, value_enum, default_value = "express-entry")]
    pub preset: PresetArg,

    /// JSON dashboard configuration; replaces --preset.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read rounds from this file or URL instead of the configured location.
    #[arg(short, long, value_name = "PATH_OR_URL")]
    pub input: Option<String>,

    /// First draw date to include (YYYY-MM-DD); defaults to the earliest round.
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last draw date to include (YYYY-MM-DD); defaults to the latest round.
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Program to include (repeatable).
    #[arg(short, long = "program", value_name = "NAME")]
    pub programs: Vec<String>,

    /// Include every program, whatever --program says.
    #[arg(long)]
    pub all_programs: bool,

    /// Year to include (repeatable); all years when omitted.
    #[arg(short, long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    /// Subtype to include (repeatable); rounds without a subtype always pass.
    #[arg(long = "subtype", value_name = "NAME")]
    pub subtypes: Vec<String>,

    /// Your own score, compared against each program's latest cutoff.
    #[arg(short, long, value_name = "SCORE")]
    pub benchmark: Option<f64>,

    /// Number of rounds to preview.
    #[arg(long, default_value_t = 10)]
    pub rows: usize,

    /// Write rounds.csv and summary.json into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// List the programs, years and subtypes in the source, then exit.
    #[arg(long)]
    pub list: bool,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Start from the dashboard defaults for `records` and apply every
    /// selection given on the command line.
    pub fn selection(&self, records: &RecordSet) -> FilterSelection {
        let mut selection = FilterSelection::defaults(records);

        let bounds = records.date_bounds();
        let start = self.from.or(bounds.map(|b| b.0));
        let end = self.to.or(bounds.map(|b| b.1));
        if let (Some(start), Some(end)) = (start, end) {
            selection.date_range = Some(DateRange::new(start, end));
        }

        selection.programs = ProgramSelection {
            select_all: self.all_programs,
            selected: self.programs.iter().cloned().collect(),
        };
        if !self.years.is_empty() {
            selection.years = Some(self.years.iter().copied().collect());
        }
        selection.subtypes = self.subtypes.iter().cloned().collect();
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draws_report::types::RoundDraft;

    fn records() -> RecordSet {
        let draft = |y, m, d, p: &str| RoundDraft {
            draw_number: None,
            draw_date: NaiveDate::from_ymd_opt(y, m, d),
            program_name: p.to_string(),
            subtype: None,
            score: None,
            invitation_count: None,
        };
        RecordSet::from_drafts(vec![draft(2025, 2, 1, "CEC"), draft(2023, 5, 1, "PNP")])
    }

    #[test]
    fn bare_invocation_keeps_dashboard_defaults() {
        let args = Args::parse_from(["draws-report"]);
        let set = records();
        assert_eq!(args.selection(&set), FilterSelection::defaults(&set));
    }

    #[test]
    fn flags_fill_the_selection() {
        let args = Args::parse_from([
            "draws-report",
            "--from",
            "2024-01-01",
            "-p",
            "CEC",
            "--all-programs",
            "-y",
            "2025",
            "--subtype",
            "Overseas",
            "-b",
            "500",
        ]);
        let set = records();
        let selection = args.selection(&set);
        let range = selection.date_range.unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert!(selection.programs.select_all);
        assert!(selection.programs.selected.contains("CEC"));
        assert_eq!(selection.years, Some([2025].into_iter().collect()));
        assert!(selection.subtypes.contains("Overseas"));
        assert_eq!(args.benchmark, Some(500.0));
        assert_eq!(args.preset, PresetArg::ExpressEntry);
    }
}
