//! Human-readable run output: progress on stdout, failures on stderr.

use teddl_core::pipeline::{EntryOutcome, EntryReport, RunReport};

pub fn print_report(report: &RunReport) {
    for entry in &report.entries {
        let line = entry_line(entry);
        if entry.outcome.is_failed() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
    println!("{}", summary_line(report));
}

pub(super) fn entry_line(report: &EntryReport) -> String {
    let name = report.entry.title.as_deref().unwrap_or(&report.entry.url);
    match &report.outcome {
        EntryOutcome::Skipped { resolved_url } => format!("skip   {name} ({resolved_url})"),
        EntryOutcome::WouldFetch {
            resolved_url,
            destination,
        } => format!("would  {resolved_url} -> {}", destination.display()),
        EntryOutcome::Recorded {
            destination, bytes, ..
        } => format!(
            "saved  {} ({:.1} MiB)",
            destination.display(),
            *bytes as f64 / 1_048_576.0
        ),
        EntryOutcome::Failed(err) => format!("failed {name}: {err}"),
    }
}

pub(super) fn summary_line(report: &RunReport) -> String {
    if report.entries.is_empty() {
        return "Feed has no downloadable episodes.".to_string();
    }
    format!(
        "{} downloaded, {} skipped, {} failed",
        report.recorded(),
        report.skipped(),
        report.failed()
    )
}
