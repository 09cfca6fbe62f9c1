use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "visitlog",
    about = "Rank the most visited URLs and most active users per day from a CSV access log",
    version,
    long_about = None
)]
pub struct Args {
    /// Access log to analyze (header: Path,User,Timestamp)
    #[arg(default_value = "log.csv")]
    pub file: PathBuf,

    /// Number of top URLs and users to display per day
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Only report this day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Redact user identifiers for privacy
    #[arg(long)]
    pub redact: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["visitlog"]).unwrap();
        assert_eq!(args.file, PathBuf::from("log.csv"));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.top.is_none());
        assert!(!args.redact);
    }

    #[test]
    fn test_parses_date_and_format() {
        let args = Args::try_parse_from([
            "visitlog",
            "access.csv",
            "--date",
            "2023-05-01",
            "--format",
            "json",
            "-t",
            "5",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("access.csv"));
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.top, Some(5));
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Args::try_parse_from(["visitlog", "--date", "May 1"]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top() {
        let args = Args::try_parse_from(["visitlog", "--top", "0"]).unwrap();
        assert!(crate::utils::validate_args(&args).is_err());
    }
}
