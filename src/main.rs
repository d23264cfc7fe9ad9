/*!
 * Command-line interface for revdump
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use revdump::config::{Args, Config};
use revdump::error::Result;
use revdump::report::{ReportFormat, Reporter};
use revdump::ReportAssembler;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "revdump", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] Failed to generate report: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let dump_policy = args.dump_policy;
    let format = if args.plain {
        ReportFormat::Plain
    } else {
        ReportFormat::ConsoleTable
    };

    // Create configuration
    let config = Config::from_args(args)?;

    if dump_policy {
        println!("{}", config.policy.to_json()?);
        return Ok(());
    }

    // Validate configuration
    config.validate()?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos} files ⏱️  {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Scanning");
    progress.set_message(format!(
        "📂 Scanning directory: {}",
        config.target_dir.display()
    ));

    let assembler = ReportAssembler::new(config, Arc::new(progress.clone()));
    let result = assembler.run();

    // Clear the progress bar before printing anything else
    progress.finish_and_clear();

    let report = result?;
    Reporter::new(format).print_report(&report);

    Ok(())
}
