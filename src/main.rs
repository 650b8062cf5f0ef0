// Command-line front end: one load → filter → summarize pass per invocation.
//
// The dashboards showed the same figures as cards and charts; here they are
// printed as a short summary followed by markdown tables, with optional
// CSV/JSON exports of the filtered rounds and the summary.
mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use cli::Args;
use draws_report::config::{DashboardConfig, Preset};
use draws_report::loader::{self, LoadReport};
use draws_report::metrics::{build_report, Report};
use draws_report::output::{self, SummaryDocument};
use draws_report::record_set::RecordSet;
use draws_report::types::Round;
use draws_report::{logging, util};
use std::fs;
use std::path::Path;

fn load_config(args: &Args) -> Result<DashboardConfig> {
    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => Preset::from(args.preset).config(),
    };
    Ok(match &args.input {
        Some(location) => config.with_location(location.clone()),
        None => config,
    })
}

fn print_load(name: &str, load: &LoadReport) {
    println!("{}", name);
    println!(
        "Source: {} ({} rows read, {} rounds loaded)",
        load.location,
        util::format_int(load.total_rows),
        util::format_int(load.loaded_rows)
    );
    if load.dropped_undated > 0 || load.row_errors > 0 {
        println!(
            "Note: {} rows skipped ({} unparseable dates, {} unreadable records).",
            util::format_int(load.dropped_undated + load.row_errors),
            util::format_int(load.dropped_undated),
            util::format_int(load.row_errors)
        );
    }
    if load.invalid_scores > 0 || load.invalid_counts > 0 {
        println!(
            "Note: {} invalid scores and {} invalid invitation counts left blank.",
            util::format_int(load.invalid_scores),
            util::format_int(load.invalid_counts)
        );
    }
    if !load.schema.is_complete() {
        let missing: Vec<&str> = load.schema.unresolved().iter().map(|f| f.name()).collect();
        println!("Note: no column found for {}.", missing.join(", "));
    }
    println!();
}

fn print_categories(records: &RecordSet) {
    println!("Programs:");
    for program in records.programs() {
        println!("  {}", program);
    }
    let years: Vec<String> = records.years().iter().map(i32::to_string).collect();
    println!("Years: {}", years.join(", "));
    let subtypes = records.subtypes();
    if !subtypes.is_empty() {
        println!("Subtypes:");
        for subtype in subtypes {
            println!("  {}", subtype);
        }
    }
}

fn print_report(report: &Report, filtered: &[&Round], max_rows: usize) {
    let s = &report.summary;
    println!("Rounds:                 {}", util::format_int(s.round_count));
    println!("Invitations:            {}", util::format_int(s.total_invitations));
    println!(
        "Days since last round:  {}",
        s.days_since_last_round
            .map(util::format_int)
            .unwrap_or_else(|| util::NOT_AVAILABLE.to_string())
    );
    println!("Avg. score:             {}", util::format_optional(s.mean_score, 0));
    println!(
        "Min / max score:        {} / {}",
        util::format_optional(s.min_score, 0),
        util::format_optional(s.max_score, 0)
    );
    println!(
        "Score vs. invitations:  {}\n",
        util::format_optional(s.score_invitation_correlation, 2)
    );

    println!("Latest cutoff by program\n");
    output::preview_table_rows(&output::program_rows(report), usize::MAX);
    println!("Invitations by year\n");
    output::preview_table_rows(&output::year_rows(report), usize::MAX);
    println!("Rounds (most recent first)\n");
    output::preview_table_rows(&output::round_rows(filtered.iter().copied()), max_rows);
}

fn export(dir: &Path, filtered: &[&Round], doc: &SummaryDocument<'_>) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let rounds_path = dir.join("rounds.csv");
    if let Err(e) = output::write_csv(&rounds_path, &output::round_rows(filtered.iter().copied())) {
        eprintln!("Write error: {}", e);
    }
    let summary_path = dir.join("summary.json");
    if let Err(e) = output::write_json(&summary_path, doc) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "(Exported to {} and {})",
        rounds_path.display(),
        summary_path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let config = load_config(&args)?;
    let loaded = loader::load(&config)
        .with_context(|| format!("loading {} rounds", config.name))?;
    print_load(&config.name, &loaded.report);

    if args.list {
        print_categories(&loaded.records);
        return Ok(());
    }

    let selection = args.selection(&loaded.records);
    let filtered = selection.apply(&loaded.records);
    if !selection.programs.select_all && selection.programs.selected.is_empty() {
        println!("No program selected; pass --program NAME or --all-programs.\n");
    }

    let today = Local::now().date_naive();
    let report = build_report(&filtered, &loaded.records, today, args.benchmark);
    print_report(&report, &filtered, args.rows);

    if let Some(dir) = &args.export_dir {
        let doc = SummaryDocument::new(&loaded.report, &report);
        export(dir, &filtered, &doc)?;
    }
    Ok(())
}
