/*!
 * Core types and data structures for the revdump application
 */

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Priority tag attached to every file seen during a run
///
/// Variants are declared in rank order, so the derived `Ord` puts
/// `Critical` first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Core business logic and architecture
    Critical,
    /// Context needed to understand how the system runs
    Important,
    /// Documentation and executable examples
    Documentation,
    /// Matched a denylist rule or no rule at all
    Excluded,
    /// Not yet classified
    Unclassified,
}

impl Tier {
    /// Tiers that end up in the report, in output order
    pub const INCLUDED: [Tier; 3] = [Tier::Critical, Tier::Important, Tier::Documentation];

    /// Whether files with this tier are emitted
    pub fn is_included(self) -> bool {
        matches!(self, Tier::Critical | Tier::Important | Tier::Documentation)
    }

    /// Human-readable label used in report headings
    pub fn label(self) -> &'static str {
        match self {
            Tier::Critical => "Critical - Core Business Logic",
            Tier::Important => "Important - System Context",
            Tier::Documentation => "Documentation - Examples & Docs",
            Tier::Excluded => "Excluded",
            Tier::Unclassified => "Unclassified",
        }
    }
}

/// A file discovered during the walk
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Relative path from the scan root, always with `/` separators
    pub rel_path: String,
    /// Absolute path on disk
    pub abs_path: PathBuf,
    /// Final priority assigned by the classifier
    pub tier: Tier,
    /// Set when the record was expected but never found on disk
    pub missing: bool,
}

impl FileRecord {
    /// Create an unclassified record
    pub fn new(rel_path: impl Into<String>, abs_path: impl Into<PathBuf>) -> Self {
        Self {
            rel_path: rel_path.into(),
            abs_path: abs_path.into(),
            tier: Tier::Unclassified,
            missing: false,
        }
    }

    /// File name component of the relative path
    pub fn file_name(&self) -> &str {
        self.rel_path.rsplit('/').next().unwrap_or(&self.rel_path)
    }

    /// First path segment, or `None` for files at the root
    pub fn top_level_dir(&self) -> Option<&str> {
        self.rel_path.split_once('/').map(|(head, _)| head)
    }
}

/// One step of the tree walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkStep {
    /// A readable directory with its surviving children
    Dir(DirListing),
    /// A directory whose listing was refused
    PermissionDenied {
        /// Relative path of the directory, `""` for the root
        rel_dir: String,
    },
}

/// Contents of a single directory after pruning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    /// Relative path of the directory, `""` for the root
    pub rel_dir: String,
    /// Absolute path of the directory
    pub abs_dir: PathBuf,
    /// Names of subdirectories that will be descended into
    pub subdirs: Vec<String>,
    /// Names of regular files and symlinks
    pub files: Vec<String>,
}

impl DirListing {
    /// Join a child name onto this directory's relative path
    pub fn child_rel_path(&self, name: &str) -> String {
        if self.rel_dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.rel_dir, name)
        }
    }
}

/// Directory tree folded from the walk, used only for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Directory with its children sorted by name
    Directory {
        /// Directory name
        name: String,
        /// Surviving children
        children: Vec<TreeNode>,
    },
    /// Any non-directory entry
    File {
        /// File name
        name: String,
    },
    /// Stands in for the contents of an unreadable directory
    PermissionDenied,
}

impl TreeNode {
    /// Name shown in the tree, with a trailing `/` for directories
    pub fn display_name(&self) -> String {
        match self {
            TreeNode::Directory { name, .. } => format!("{}/", name),
            TreeNode::File { name } => name.clone(),
            TreeNode::PermissionDenied => "[Permission Denied]".to_string(),
        }
    }

    fn sort_key(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } | TreeNode::File { name } => name,
            TreeNode::PermissionDenied => "",
        }
    }

    /// Sort children by name, recursively
    pub fn sort(&mut self) {
        if let TreeNode::Directory { children, .. } = self {
            children.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
            children.iter_mut().for_each(TreeNode::sort);
        }
    }
}
