//! End-to-end passes over the sample sources in `data/`.

use chrono::NaiveDate;
use draws_report::config::{DashboardConfig, Preset};
use draws_report::filter::{FilterSelection, ProgramSelection};
use draws_report::loader::{self, Loaded};
use draws_report::metrics::{build_report, BenchmarkOutcome};
use draws_report::schema::CanonicalField;
use draws_report::LoadError;

fn data(name: &str) -> String {
    format!("{}/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn load_preset(preset: Preset, file: &str) -> Loaded {
    loader::load(&preset.config().with_location(data(file))).expect("sample source loads")
}

#[test]
fn express_entry_csv() {
    let loaded = load_preset(Preset::ExpressEntry, "Canada.csv");
    let records = &loaded.records;

    assert_eq!(loaded.report.total_rows, 11);
    assert_eq!(loaded.report.dropped_undated, 1);
    assert_eq!(records.len(), 10);
    assert!(records
        .rounds()
        .windows(2)
        .all(|w| w[0].draw_date >= w[1].draw_date));

    let latest = &records.rounds()[0];
    assert_eq!(latest.draw_date, ymd(2025, 7, 8));
    assert_eq!(latest.program_name, "Canadian Experience Class");
    assert_eq!(latest.invitation_count, Some(3000));
    assert_eq!(latest.score, Some(518.0));

    let trades = &records.rounds()[9];
    assert_eq!(trades.program_name, "Trade occupations");
    assert_eq!(trades.score, None);
    assert_eq!(trades.invitation_count, None);

    let unresolved: Vec<_> = loaded.report.schema.unresolved().iter().copied().collect();
    assert_eq!(unresolved, vec![CanonicalField::DrawNumber]);
}

#[test]
fn express_entry_summary_for_2025() {
    let loaded = load_preset(Preset::ExpressEntry, "Canada.csv");
    let records = &loaded.records;
    let selection = FilterSelection {
        programs: ProgramSelection::all(),
        years: Some([2025].into_iter().collect()),
        ..FilterSelection::default()
    };
    let filtered = selection.apply(records);
    assert_eq!(filtered.len(), 9);

    let report = build_report(&filtered, records, ymd(2025, 7, 18), Some(520.0));
    assert_eq!(report.summary.total_invitations, 22_706);
    assert_eq!(report.summary.days_since_last_round, Some(10));
    assert_eq!(report.summary.min_score, Some(410.0));
    assert_eq!(report.summary.max_score, Some(784.0));

    let cec = report
        .programs
        .iter()
        .find(|p| p.program == "Canadian Experience Class")
        .unwrap();
    assert_eq!(cec.rounds, 3);
    assert_eq!(cec.latest_score, Some(518.0));
    assert_eq!(cec.outcome, BenchmarkOutcome::Meets { margin: 2.0 });

    let pnp = report
        .programs
        .iter()
        .find(|p| p.program == "Provincial Nominee Program")
        .unwrap();
    assert_eq!(pnp.outcome, BenchmarkOutcome::ShortBy { gap: 230.0 });
}

#[test]
fn nothing_checked_shows_nothing_but_still_dates_the_last_round() {
    let loaded = load_preset(Preset::ExpressEntry, "Canada.csv");
    let selection = FilterSelection::defaults(&loaded.records);
    let filtered = selection.apply(&loaded.records);
    assert!(filtered.is_empty());

    let report = build_report(&filtered, &loaded.records, ymd(2025, 7, 18), None);
    assert_eq!(report.summary.total_invitations, 0);
    assert_eq!(report.summary.mean_score, None);
    assert_eq!(report.summary.days_since_last_round, Some(10));
    assert!(report.programs.is_empty());
}

#[test]
fn mpnp_csv_with_subtypes() {
    let loaded = load_preset(Preset::Mpnp, "MPNP.csv");
    let records = &loaded.records;

    assert_eq!(records.len(), 7);
    assert_eq!(loaded.report.invalid_scores, 1);
    assert!(loaded.report.schema.is_complete());
    assert_eq!(
        records.programs(),
        vec![
            "General",
            "International Education Stream",
            "Skilled Worker Overseas",
            "Skilled Worker in Manitoba",
        ]
    );

    // Same-day rounds keep file order.
    assert_eq!(records.rounds()[0].program_name, "Skilled Worker in Manitoba");
    assert_eq!(records.rounds()[1].program_name, "Skilled Worker Overseas");
    assert_eq!(records.rounds()[0].draw_number.as_deref(), Some("251"));

    let selection = FilterSelection {
        programs: ProgramSelection::all(),
        subtypes: ["Occupation In-Demand".to_string()].into_iter().collect(),
        ..FilterSelection::default()
    };
    let filtered = selection.apply(records);
    assert_eq!(filtered.len(), 5);
    assert!(filtered
        .iter()
        .all(|r| r.subtype.is_none() || r.subtype.as_deref() == Some("Occupation In-Demand")));

    let general = records.iter().find(|r| r.program_name == "General").unwrap();
    assert_eq!(general.invitation_count, Some(1015));
    assert_eq!(general.score, None);
}

#[test]
fn express_entry_json_feed() {
    let loaded = load_preset(Preset::EeFeed, "ee_rounds.json");
    let records = &loaded.records;

    assert!(loaded.report.schema.is_complete());
    assert_eq!(
        loaded.report.schema.column(CanonicalField::Date),
        Some("drawDate")
    );
    assert_eq!(records.len(), 5);
    assert_eq!(loaded.report.dropped_undated, 1);

    let numeric = records
        .iter()
        .find(|r| r.draw_number.as_deref() == Some("352"))
        .unwrap();
    assert_eq!(numeric.invitation_count, Some(3000));
    assert_eq!(numeric.score, Some(529.0));

    let unnamed = records.rounds().last().unwrap();
    assert_eq!(unnamed.draw_date, ymd(2025, 6, 2));
    assert_eq!(unnamed.program_name, "Unspecified");
}

#[test]
fn config_file_drives_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("rounds.csv");
    std::fs::write(
        &csv_path,
        "date,program,score,invitations\n\
         01/03/2025,A,450,\"1,200\"\n\
         bad,B,400,800\n",
    )
    .unwrap();

    let config_path = dir.path().join("dashboard.json");
    let config_json = serde_json::json!({
        "name": "scenario",
        "source": {
            "format": "csv",
            "location": csv_path.to_string_lossy(),
            "delimiter": ","
        },
        "dateOrder": "day-first"
    });
    std::fs::write(&config_path, config_json.to_string()).unwrap();

    let config = DashboardConfig::from_path(&config_path).unwrap();
    let loaded = loader::load(&config).unwrap();
    assert_eq!(loaded.records.len(), 1);
    let only = &loaded.records.rounds()[0];
    assert_eq!(only.draw_date, ymd(2025, 3, 1));
    assert_eq!(only.invitation_count, Some(1200));
    assert_eq!(only.program_name, "A");
}

#[test]
fn structural_failures_return_no_records() {
    let missing = Preset::Mpnp.config().with_location(data("missing.csv"));
    assert!(matches!(
        loader::load(&missing),
        Err(LoadError::FileRead { .. })
    ));

    // The CSV sample is not a JSON document.
    let wrong_format = Preset::EeFeed.config().with_location(data("Canada.csv"));
    assert!(matches!(
        loader::load(&wrong_format),
        Err(LoadError::JsonParse { .. })
    ));
}
