/*!
 * Console summary for revdump runs
 *
 * Renders the run statistics as tables with the tabled library.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::Tier;
use crate::utils::format_file_size;

/// Information about a file emitted into the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines emitted
    pub lines: usize,
    /// Number of characters emitted
    pub chars: usize,
}

/// Statistics for one report generation run
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Size of the written report
    pub report_bytes: u64,
    /// Included files per tier
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Files dropped by the classifier
    pub files_excluded: usize,
    /// Files whose content was redacted
    pub redacted: usize,
    /// Files emitted with a not-found or decode-error placeholder
    pub placeholders: usize,
    /// Directories that could not be listed
    pub denied_dirs: usize,
    /// Details for each emitted file
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl ScanReport {
    /// Total number of included files
    pub fn files_included(&self) -> usize {
        self.tier_counts.values().sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
    /// Two plain lines: file count and size
    Plain,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
            ReportFormat::Plain => format!(
                "Files included: {}\nReport size: {}",
                report.files_included(),
                format_file_size(report.report_bytes)
            ),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ScanReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Keep the tail of long paths, which carries the file name
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.chars().count() <= max_len {
            return path.to_string();
        }

        let mut kept = Vec::new();
        let mut len = 3; // "..."
        for part in path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if len + part_len > max_len {
                break;
            }
            kept.push(part);
            len += part_len;
        }

        if kept.is_empty() {
            let tail: String = path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        kept.reverse();
        format!(".../{}", kept.join("/"))
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let count = |tier: Tier| report.tier_counts.get(&tier).copied().unwrap_or(0);

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Included".to_string(),
                value: format!(
                    "{} (critical {}, important {}, documentation {})",
                    self.format_number(report.files_included()),
                    count(Tier::Critical),
                    count(Tier::Important),
                    count(Tier::Documentation)
                ),
            },
            SummaryRow {
                key: "🚫 Files Excluded".to_string(),
                value: self.format_number(report.files_excluded),
            },
            SummaryRow {
                key: "💾 Report Size".to_string(),
                value: format_file_size(report.report_bytes),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.report_bytes as usize / 4)
                ),
            },
        ];

        if report.redacted > 0 {
            rows.push(SummaryRow {
                key: "🔒 Redacted Files".to_string(),
                value: report.redacted.to_string(),
            });
        }
        if report.placeholders > 0 || report.denied_dirs > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Unreadable".to_string(),
                value: format!(
                    "{} files, {} directories",
                    report.placeholders, report.denied_dirs
                ),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  REVIEW REPORT GENERATED";
        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  INCLUDED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
