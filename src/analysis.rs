use anyhow::Result;
use csv::StringRecord;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::args::{Args, OutputFormat};
use crate::error::SourceError;
use crate::loader;
use crate::record::{parse_record, Rejection};
use crate::report::{DayReport, ReportOptions};
use crate::stats::StatsByDay;

/// Row counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub lines: usize,
    pub accepted: usize,
    pub rejected_header: usize,
    pub rejected_fields: usize,
    pub rejected_timestamp: usize,
    pub rejected_unreadable: usize,
}

impl IngestSummary {
    pub fn rejected(&self) -> usize {
        self.rejected_header
            + self.rejected_fields
            + self.rejected_timestamp
            + self.rejected_unreadable
    }

    fn reject(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::Header => self.rejected_header += 1,
            Rejection::FieldCount(_) => self.rejected_fields += 1,
            Rejection::TimestampFormat(_) | Rejection::Timestamp(_) => {
                self.rejected_timestamp += 1
            }
            Rejection::Unreadable(_) => self.rejected_unreadable += 1,
        }
    }
}

#[derive(Debug)]
pub struct Analysis {
    pub stats: StatsByDay,
    pub summary: IngestSummary,
}

/// Parse and tally every row into `stats`. Malformed rows are skipped; an
/// I/O error stops the run early.
pub fn ingest_lines<I>(rows: I, stats: &mut StatsByDay) -> IngestSummary
where
    I: IntoIterator<Item = csv::Result<StringRecord>>,
{
    let mut summary = IngestSummary::default();

    for row in rows {
        let parsed = match row {
            Ok(row) => {
                let line_number = row.position().map(|p| p.line());
                parse_record(&row).map_err(|rejection| (line_number, rejection))
            }
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                let line_number = e.position().map(|p| p.line());
                error!(action = "abort", component = "ingest", line_number, error = %e, "Read failed, stopping ingestion");
                break;
            }
            Err(e) => {
                let line_number = e.position().map(|p| p.line());
                Err((line_number, Rejection::Unreadable(e.to_string())))
            }
        };
        summary.lines += 1;

        match parsed {
            Ok(record) => {
                stats.tally(&record);
                summary.accepted += 1;
            }
            Err((line_number, rejection)) => {
                debug!(action = "skip", component = "ingest", line_number, reason = %rejection, "Skipping malformed row");
                summary.reject(&rejection);
            }
        }
    }

    summary
}

/// Load, validate and aggregate the access log at `path`.
pub fn analyze_log(path: &Path) -> Result<Analysis, SourceError> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", file_path = ?path, "Starting access log analysis");

    let lines = loader::open_log(path)?;

    let mut stats = StatsByDay::new();
    let summary = ingest_lines(lines, &mut stats);

    if summary.rejected() > 0 {
        warn!(
            action = "ingest",
            component = "analysis",
            rejected = summary.rejected(),
            header = summary.rejected_header,
            fields = summary.rejected_fields,
            timestamp = summary.rejected_timestamp,
            unreadable = summary.rejected_unreadable,
            "Skipped malformed lines"
        );
    }

    info!(
        action = "complete",
        component = "analysis",
        lines = summary.lines,
        accepted = summary.accepted,
        days = stats.len(),
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed"
    );

    Ok(Analysis { stats, summary })
}

/// Build the reports selected by `args`, in date order.
pub fn collect_reports(stats: &StatsByDay, args: &Args) -> Vec<DayReport> {
    let options = ReportOptions {
        top: args.top,
        redact: args.redact,
    };

    stats
        .iter()
        .filter(|day| args.date.map_or(true, |date| day.date == date))
        .map(|day| DayReport::build(day, &options))
        .collect()
}

pub fn write_report<W: Write>(
    out: &mut W,
    reports: &[DayReport],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                for line in report.lines() {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

pub fn print_analysis_results(analysis: &Analysis, args: &Args) -> Result<()> {
    let reports = collect_reports(&analysis.stats, args);

    if reports.is_empty() {
        if let Some(date) = args.date {
            warn!(action = "report", component = "analysis", date = %date, "No records for requested date");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &reports, args.format)
}
