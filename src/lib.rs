pub mod analysis;
pub mod args;
pub mod error;
pub mod loader;
pub mod record;
pub mod report;
pub mod stats;
pub mod utils;

pub use analysis::{analyze_log, print_analysis_results, Analysis, IngestSummary};
pub use args::Args;
pub use error::SourceError;
pub use record::{parse_line, parse_record, LogRecord, Rejection};
pub use report::{render, DayReport};
pub use stats::{DailyStats, StatsByDay, UrlStat, UserStat};
