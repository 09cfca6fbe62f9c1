use anyhow::Result;
use clap::Parser;
use tracing::info;

use visitlog::{analyze_log, print_analysis_results, utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    match analyze_log(&args.file) {
        Ok(analysis) => print_analysis_results(&analysis, &args),
        Err(e) => {
            info!(action = "abort", component = "main", error = %e, "Access log unavailable");
            eprintln!("File does not exist or is formatted incorrectly. ({})", e);
            std::process::exit(1);
        }
    }
}
