/*!
 * Walks the project tree and classifies every file it reaches
 */

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::classifier::Classifier;
use crate::config::Config;
use crate::ensure;
use crate::error::{Result, ResultExt};
use crate::types::{FileRecord, Tier, TreeNode, WalkStep};
use crate::utils::normalize_rel_path;
use crate::walker::TreeWalker;

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScannerStatistics {
    /// Files reached by the walk
    pub files_seen: usize,
    /// Files dropped by the classifier
    pub files_excluded: usize,
    /// Included files per tier
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Directories that could not be listed
    pub denied_dirs: usize,
    /// Expected files that were not found
    pub missing: usize,
}

/// Everything the writer needs from a scan
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Name of the scanned root directory
    pub root_name: String,
    /// Directory tree of everything the walk reached
    pub tree: TreeNode,
    /// Included records, sorted by tier then path
    pub records: Vec<FileRecord>,
    /// Counters gathered along the way
    pub statistics: ScannerStatistics,
}

enum Listed {
    Entries {
        subdirs: Vec<String>,
        files: Vec<String>,
    },
    Denied,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    /// Classifier built from the configured policy
    classifier: Classifier,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        let classifier = Classifier::new(&config.policy);
        Self {
            config,
            classifier,
            progress,
        }
    }

    /// Scan the target directory
    pub fn scan(&self) -> Result<ScanResult> {
        let root = fs::canonicalize(&self.config.target_dir).with_context(|| {
            format!(
                "Failed to resolve target directory {}",
                self.config.target_dir.display()
            )
        })?;
        ensure!(
            root.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            root.display()
        );

        let root_name = root
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mut walker = TreeWalker::new(&root, &self.config.policy);
        let output_rel = self.output_rel_path(&root);
        if let Some(rel) = &output_rel {
            walker = walker.skip_file(rel.clone());
        }

        let mut statistics = ScannerStatistics::default();
        let mut records = Vec::new();
        let mut listed: HashMap<String, Listed> = HashMap::new();

        for step in walker {
            match step {
                WalkStep::PermissionDenied { rel_dir } => {
                    statistics.denied_dirs += 1;
                    listed.insert(rel_dir, Listed::Denied);
                }
                WalkStep::Dir(listing) => {
                    for name in &listing.files {
                        let rel_path = listing.child_rel_path(name);
                        self.progress.inc(1);
                        self.progress.set_message(format!("Classifying {}", rel_path));
                        statistics.files_seen += 1;

                        let verdict = self.classifier.classify(&rel_path);
                        debug!(
                            "{} -> {} ({})",
                            rel_path,
                            verdict.tier,
                            verdict.rule.as_deref().unwrap_or("no rule matched")
                        );

                        if verdict.tier.is_included() {
                            let mut record =
                                FileRecord::new(rel_path, listing.abs_dir.join(name));
                            record.tier = verdict.tier;
                            records.push(record);
                        } else {
                            statistics.files_excluded += 1;
                        }
                    }
                    listed.insert(
                        listing.rel_dir,
                        Listed::Entries {
                            subdirs: listing.subdirs,
                            files: listing.files,
                        },
                    );
                }
            }
        }

        if self.config.report_missing {
            let found: HashSet<String> = records.iter().map(|r| r.rel_path.clone()).collect();
            for (path, tier) in self.config.policy.expected_paths() {
                if found.contains(&path) || output_rel.as_deref() == Some(path.as_str()) {
                    continue;
                }
                let mut record = FileRecord::new(path.clone(), root.join(&path));
                record.tier = tier;
                record.missing = true;
                records.push(record);
                statistics.missing += 1;
            }
        }

        records.sort_by(|a, b| (a.tier, &a.rel_path).cmp(&(b.tier, &b.rel_path)));
        for record in &records {
            *statistics.tier_counts.entry(record.tier).or_insert(0) += 1;
        }

        info!(
            "Scanned {} files: {} included, {} excluded",
            statistics.files_seen,
            records.len(),
            statistics.files_excluded
        );

        let mut tree = build_tree(root_name.clone(), "", &mut listed);
        tree.sort();

        Ok(ScanResult {
            root_name,
            tree,
            records,
            statistics,
        })
    }

    /// Relative path of the report file when it lives inside the root
    fn output_rel_path(&self, root: &Path) -> Option<String> {
        let output = &self.config.output_file;
        let parent = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let parent = fs::canonicalize(parent).ok()?;
        let full = parent.join(output.file_name()?);
        let rel = full.strip_prefix(root).ok()?;
        Some(normalize_rel_path(rel))
    }
}

fn build_tree(name: String, rel_dir: &str, listed: &mut HashMap<String, Listed>) -> TreeNode {
    let children = match listed.remove(rel_dir) {
        Some(Listed::Entries { subdirs, files }) => {
            let mut children = Vec::with_capacity(subdirs.len() + files.len());
            for dir in subdirs {
                let child_rel = if rel_dir.is_empty() {
                    dir.clone()
                } else {
                    format!("{}/{}", rel_dir, dir)
                };
                children.push(build_tree(dir, &child_rel, listed));
            }
            children.extend(files.into_iter().map(|name| TreeNode::File { name }));
            children
        }
        Some(Listed::Denied) => vec![TreeNode::PermissionDenied],
        None => Vec::new(),
    };
    TreeNode::Directory { name, children }
}
