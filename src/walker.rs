/*!
 * Lazy, pruning, depth-first directory walker
 */

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::policy::Policy;
use crate::types::{DirListing, WalkStep};

/// Yields one [`WalkStep`] per directory, pre-order
///
/// Excluded and hidden subdirectories are dropped from each listing before
/// they are queued, so nothing beneath them is ever read.
pub struct TreeWalker {
    excluded_dirs: HashSet<String>,
    skip_hidden_dirs: bool,
    skip_files: HashSet<String>,
    // (relative, absolute) directories still to list; top of stack is next
    pending: Vec<(String, PathBuf)>,
}

impl TreeWalker {
    /// Walk `root` under the directory rules of `policy`
    pub fn new(root: &Path, policy: &Policy) -> Self {
        Self {
            excluded_dirs: policy.excluded_dirs.iter().cloned().collect(),
            skip_hidden_dirs: policy.skip_hidden_dirs,
            skip_files: HashSet::new(),
            pending: vec![(String::new(), root.to_path_buf())],
        }
    }

    /// Never list the file at this relative path (the report itself)
    pub fn skip_file(mut self, rel_path: impl Into<String>) -> Self {
        self.skip_files.insert(rel_path.into());
        self
    }

    /// Whether a directory named `name` is pruned
    pub fn is_pruned(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name) || (self.skip_hidden_dirs && name.starts_with('.'))
    }

    fn list(&self, rel_dir: String, abs_dir: PathBuf) -> Option<WalkStep> {
        let mut listing = DirListing {
            rel_dir,
            abs_dir,
            subdirs: Vec::new(),
            files: Vec::new(),
        };

        let entries = WalkDir::new(&listing.abs_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                // depth 0 means the directory itself could not be opened
                Err(err) if err.depth() == 0 => {
                    let kind = err.io_error().map(io::Error::kind);
                    if kind == Some(io::ErrorKind::PermissionDenied) {
                        warn!("Permission denied: {}", listing.abs_dir.display());
                        return Some(WalkStep::PermissionDenied {
                            rel_dir: listing.rel_dir,
                        });
                    }
                    warn!("Skipping directory {}: {}", listing.abs_dir.display(), err);
                    return None;
                }
                Err(err) => {
                    warn!("Skipping entry in {}: {}", listing.abs_dir.display(), err);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().is_dir() {
                if self.is_pruned(&name) {
                    debug!("Pruned directory {}", listing.child_rel_path(&name));
                    continue;
                }
                listing.subdirs.push(name);
            } else {
                if self.skip_files.contains(&listing.child_rel_path(&name)) {
                    continue;
                }
                listing.files.push(name);
            }
        }

        Some(WalkStep::Dir(listing))
    }
}

impl Iterator for TreeWalker {
    type Item = WalkStep;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((rel_dir, abs_dir)) = self.pending.pop() {
            let Some(step) = self.list(rel_dir, abs_dir) else {
                continue;
            };
            if let WalkStep::Dir(listing) = &step {
                // reversed so the first subdirectory is popped first
                for name in listing.subdirs.iter().rev() {
                    self.pending
                        .push((listing.child_rel_path(name), listing.abs_dir.join(name)));
                }
            }
            return Some(step);
        }
        None
    }
}
