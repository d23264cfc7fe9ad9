/*!
 * Text report writer for revdump
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use chrono::Local;
use tracing::{debug, info};

use crate::compactor::Compactor;
use crate::config::{Config, GroupBy};
use crate::encoding::{read_text, FileContent};
use crate::error::{Result, ResultExt};
use crate::report::FileReportInfo;
use crate::sanitizer::Sanitizer;
use crate::scanner::ScanResult;
use crate::types::{FileRecord, Tier, TreeNode};

/// Marker written in place of content for files that are gone
pub const FILE_NOT_FOUND: &str = "[FILE NOT FOUND]";

const WIDE_RULE: usize = 80;
const NARROW_RULE: usize = 40;

/// Per-run rendering counters
#[derive(Debug, Clone, Default)]
pub struct RenderStatistics {
    /// Line and character counts per emitted file
    pub file_details: Vec<(String, FileReportInfo)>,
    /// Files whose content was redacted
    pub redacted: usize,
    /// Files emitted with the not-found marker
    pub not_found: usize,
    /// Files emitted with the decode-error placeholder
    pub undecodable: usize,
}

/// Writes the review report
pub struct ReportWriter {
    /// Writer configuration
    config: Config,
    sanitizer: Sanitizer,
    compactor: Option<Compactor>,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(config: Config) -> Result<Self> {
        let sanitizer = Sanitizer::new(config.policy.sensitive_files.iter().cloned());
        let compactor = if config.compact {
            Some(Compactor::new()?)
        } else {
            None
        };
        Ok(Self {
            config,
            sanitizer,
            compactor,
        })
    }

    /// Write the report to the configured output file, replacing any previous one
    pub fn write(&self, scan: &ScanResult) -> Result<RenderStatistics> {
        let file = File::create(&self.config.output_file).with_context(|| {
            format!(
                "Failed to create report {}",
                self.config.output_file.display()
            )
        })?;
        let mut out = BufWriter::new(file);
        let stats = self.write_to(scan, &mut out)?;
        out.flush()?;

        info!(
            "Wrote {} files to {}",
            stats.file_details.len(),
            self.config.output_file.display()
        );
        Ok(stats)
    }

    /// Render the report into any writer
    pub fn write_to<W: Write>(&self, scan: &ScanResult, out: &mut W) -> Result<RenderStatistics> {
        let mut stats = RenderStatistics::default();

        self.write_header(scan, out)?;
        self.write_tree(scan, out)?;

        let groups = self.group(&scan.records);
        self.write_manifest(&groups, out)?;

        writeln!(out, "### SOURCE CODE CONTENT ###")?;
        writeln!(out, "{}\n", "-".repeat(WIDE_RULE))?;

        for (title, records) in &groups {
            if records.is_empty() {
                continue;
            }
            writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
            writeln!(out, "### {} ###", title.to_uppercase())?;
            writeln!(out, "{}\n", "=".repeat(WIDE_RULE))?;

            for record in records {
                self.write_file(record, out, &mut stats)?;
            }
        }

        writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(out, "CODE REVIEW GENERATION COMPLETE")?;
        writeln!(out, "{}", "=".repeat(WIDE_RULE))?;

        Ok(stats)
    }

    fn write_header<W: Write>(&self, scan: &ScanResult, out: &mut W) -> Result<()> {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(out, "{} - CODE REVIEW", scan.root_name.to_uppercase())?;
        writeln!(out, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(
            out,
            "Generated on: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out, "Host: {}", hostname)?;
        writeln!(out, "Strategy: {}", self.config.policy.strategy())?;
        writeln!(out, "Grouping: {}", self.config.group_by)?;
        writeln!(
            out,
            "Compaction: {}\n",
            if self.compactor.is_some() { "on" } else { "off" }
        )?;

        let stats = &scan.statistics;
        writeln!(out, "### FILE STATISTICS BY PRIORITY ###")?;
        writeln!(out, "{}", "-".repeat(WIDE_RULE))?;
        for tier in Tier::INCLUDED {
            let count = stats.tier_counts.get(&tier).copied().unwrap_or(0);
            let label = format!("{} ({}):", tier, tier.label());
            writeln!(out, "{:<48}{:>4} files", label, count)?;
        }
        writeln!(out, "{}", "-".repeat(WIDE_RULE))?;
        writeln!(
            out,
            "{:<48}{:>4} files",
            "Total files included:",
            scan.records.len()
        )?;
        writeln!(
            out,
            "{:<48}{:>4} files\n",
            "Files excluded:", stats.files_excluded
        )?;
        Ok(())
    }

    fn write_tree<W: Write>(&self, scan: &ScanResult, out: &mut W) -> Result<()> {
        writeln!(out, "### PROJECT FILE TREE ###")?;
        writeln!(out, "{}", "-".repeat(NARROW_RULE))?;
        writeln!(out, "{}", scan.tree.display_name())?;
        for line in render_tree(&scan.tree) {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "\n")?;
        Ok(())
    }

    fn write_manifest<W: Write>(
        &self,
        groups: &[(String, Vec<&FileRecord>)],
        out: &mut W,
    ) -> Result<()> {
        writeln!(
            out,
            "### INCLUDED FILES BY {} ###",
            self.config.group_by.to_string().to_uppercase()
        )?;
        writeln!(out, "{}", "-".repeat(WIDE_RULE))?;

        for (title, records) in groups {
            writeln!(out, "\n## {} ({}):", title, records.len())?;
            for record in records {
                if record.missing {
                    writeln!(out, "  - {} {}", record.rel_path, FILE_NOT_FOUND)?;
                } else {
                    writeln!(out, "  - {}", record.rel_path)?;
                }
            }
        }
        writeln!(out, "\n")?;
        Ok(())
    }

    fn write_file<W: Write>(
        &self,
        record: &FileRecord,
        out: &mut W,
        stats: &mut RenderStatistics,
    ) -> Result<()> {
        writeln!(out, "{}", "-".repeat(WIDE_RULE))?;
        writeln!(out, "### FILE: {}", record.rel_path)?;
        writeln!(out, "{}\n", "-".repeat(WIDE_RULE))?;

        let content = if record.missing {
            FileContent::NotFound
        } else {
            read_text(&record.abs_path, &self.config.encodings)
        };

        match content {
            FileContent::Text(text) => {
                let text = match &self.compactor {
                    Some(compactor) => compactor.compact(&text),
                    None => text,
                };
                if self.sanitizer.is_sensitive(&record.rel_path) {
                    debug!("Redacting {}", record.rel_path);
                    stats.redacted += 1;
                }
                let body = self.sanitizer.sanitize(&record.rel_path, &text);
                let body = body.trim();

                stats.file_details.push((
                    record.rel_path.clone(),
                    FileReportInfo {
                        lines: body.lines().count(),
                        chars: body.chars().count(),
                    },
                ));
                writeln!(out, "{}\n\n", body)?;
            }
            FileContent::NotFound => {
                stats.not_found += 1;
                stats
                    .file_details
                    .push((record.rel_path.clone(), FileReportInfo::default()));
                writeln!(out, "{}\n\n", FILE_NOT_FOUND)?;
            }
            FileContent::Undecodable => {
                stats.undecodable += 1;
                stats
                    .file_details
                    .push((record.rel_path.clone(), FileReportInfo::default()));
                writeln!(
                    out,
                    "[Error: Unable to decode file '{}']\n\n",
                    record.file_name()
                )?;
            }
        }
        Ok(())
    }

    /// Split records into titled groups, in output order
    fn group<'a>(&self, records: &'a [FileRecord]) -> Vec<(String, Vec<&'a FileRecord>)> {
        match self.config.group_by {
            GroupBy::Tier => Tier::INCLUDED
                .iter()
                .map(|&tier| {
                    let members = records.iter().filter(|r| r.tier == tier).collect();
                    (format!("{} files", tier), members)
                })
                .collect(),
            GroupBy::Directory => {
                let mut by_dir: BTreeMap<Option<&str>, Vec<&FileRecord>> = BTreeMap::new();
                for record in records {
                    by_dir.entry(record.top_level_dir()).or_default().push(record);
                }
                by_dir
                    .into_iter()
                    .map(|(dir, mut members)| {
                        members.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
                        let title = match dir {
                            Some(dir) => format!("{}/ files", dir),
                            None => "root files".to_string(),
                        };
                        (title, members)
                    })
                    .collect()
            }
        }
    }
}

/// Render the children of `root` with box-drawing connectors
pub fn render_tree(root: &TreeNode) -> Vec<String> {
    let mut lines = Vec::new();
    if let TreeNode::Directory { children, .. } = root {
        render_children(children, "", &mut lines);
    }
    lines
}

fn render_children(children: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, connector, child.display_name()));

        if let TreeNode::Directory { children, .. } = child {
            let extension = if is_last { "    " } else { "│   " };
            render_children(children, &format!("{}{}", prefix, extension), lines);
        }
    }
}
