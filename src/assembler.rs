/*!
 * One full report generation run: scan, classify, render
 */

use std::fs;
use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::config::Config;
use crate::error::Result;
use crate::report::ScanReport;
use crate::scanner::Scanner;
use crate::writer::ReportWriter;

/// Drives a single run from a validated configuration
pub struct ReportAssembler {
    config: Config,
    progress: Arc<ProgressBar>,
}

impl ReportAssembler {
    /// Create an assembler; pass `ProgressBar::hidden()` for silent runs
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Generate the report file and return the run statistics
    pub fn run(&self) -> Result<ScanReport> {
        self.config.validate()?;
        let start_time = Instant::now();

        let scanner = Scanner::new(self.config.clone(), Arc::clone(&self.progress));
        let scan = scanner.scan()?;

        self.progress.set_message("Writing report...");
        let writer = ReportWriter::new(self.config.clone())?;
        let render = writer.write(&scan)?;

        let report_bytes = fs::metadata(&self.config.output_file)?.len();

        Ok(ScanReport {
            output_file: self.config.output_file.display().to_string(),
            duration: start_time.elapsed(),
            report_bytes,
            tier_counts: scan.statistics.tier_counts,
            files_excluded: scan.statistics.files_excluded,
            redacted: render.redacted,
            placeholders: render.not_found + render.undecodable,
            denied_dirs: scan.statistics.denied_dirs,
            file_details: render.file_details,
        })
    }
}
