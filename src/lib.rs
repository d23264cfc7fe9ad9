/*!
 * revdump - Assemble a single code review report from a project tree
 *
 * The pipeline walks a project root while pruning noise directories,
 * classifies every file against a whitelist-first policy, redacts
 * sensitive files and writes a directory tree, a manifest and the content
 * of every included file into one text report.
 */

pub mod assembler;
pub mod classifier;
pub mod compactor;
pub mod config;
pub mod encoding;
pub mod error;
pub mod policy;
pub mod report;
pub mod sanitizer;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use assembler::ReportAssembler;
pub use classifier::{Classifier, Verdict};
pub use config::{Config, GroupBy};
pub use error::{Result, RevDumpError};
pub use policy::{Action, Matcher, Policy, Rule};
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use sanitizer::Sanitizer;
pub use scanner::{ScanResult, Scanner};
pub use types::{FileRecord, Tier, TreeNode, WalkStep};
pub use walker::TreeWalker;
pub use writer::ReportWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
