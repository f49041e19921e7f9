//! End-of-run summary.

use emk_core::scheduler::{BatchReport, BatchStats};

/// Failures listed individually; the rest are only counted.
pub(super) const MAX_FAILURES_SHOWN: usize = 20;

pub(super) fn summary_lines(stats: &BatchStats) -> Vec<String> {
    let row = |label: &str, n: usize| format!("{:<11}{:>7}  ({:.1}%)", label, n, stats.percent(n));
    vec![
        row("Downloaded", stats.successes),
        row("Skipped", stats.skipped),
        row("Not found", stats.not_found),
        row("Failed", stats.failures),
        format!(
            "{:<11}{:>7}  in {:.1}s ({:.1}/s)",
            "Total",
            stats.total,
            stats.duration.as_secs_f64(),
            stats.items_per_sec()
        ),
    ]
}

pub(super) fn failure_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.failures.is_empty() {
        return lines;
    }
    let shown = report.failures.len().min(MAX_FAILURES_SHOWN);
    if shown < report.failures.len() {
        lines.push(format!("Failures (showing {} of {}):", shown, report.failures.len()));
    } else {
        lines.push(format!("Failures ({}):", shown));
    }
    for f in report.failures.iter().take(shown) {
        let status = f.status.map(|s| format!(" [{}]", s)).unwrap_or_default();
        lines.push(format!("  {}  {}{}: {}", f.item.pair, f.error_type, status, f.message));
    }
    lines
}

/// Prints totals; in quiet mode only the one-line total and failures go out.
pub(super) fn print_summary(report: &BatchReport, quiet: bool) {
    let lines = summary_lines(&report.stats);
    if quiet {
        if let Some(total) = lines.last() {
            println!("{}", total);
        }
    } else {
        for line in &lines {
            println!("{}", line);
        }
    }
    for line in failure_lines(report) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emk_core::emoji::EmojiPair;
    use emk_core::scheduler::{DownloadItem, FailedItem};
    use std::time::Duration;

    fn failed(n: usize) -> FailedItem {
        FailedItem {
            item: DownloadItem {
                pair: EmojiPair::new("😀", "🐶"),
                url: format!("http://test/{}", n),
            },
            error_type: "ServerError".into(),
            message: "HTTP 503".into(),
            status: Some(503),
        }
    }

    #[test]
    fn summary_shows_percentages_and_rate() {
        let stats = BatchStats {
            total: 4,
            successes: 2,
            skipped: 1,
            not_found: 1,
            failures: 0,
            duration: Duration::from_secs(2),
        };
        let lines = summary_lines(&stats);
        assert!(lines[0].starts_with("Downloaded"));
        assert!(lines[0].ends_with("(50.0%)"));
        assert!(lines[2].ends_with("(25.0%)"));
        assert!(lines[4].contains("(2.0/s)"));
    }

    #[test]
    fn failure_table_is_capped() {
        let report = BatchReport {
            stats: BatchStats::default(),
            failures: (0..25).map(failed).collect(),
        };
        let lines = failure_lines(&report);
        assert_eq!(lines.len(), MAX_FAILURES_SHOWN + 1);
        assert_eq!(lines[0], "Failures (showing 20 of 25):");
        assert_eq!(lines[1], "  😀 + 🐶  ServerError [503]: HTTP 503");
    }

    #[test]
    fn no_failures_no_table() {
        assert!(failure_lines(&BatchReport::default()).is_empty());
    }
}
