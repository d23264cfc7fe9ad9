/*!
 * Configuration handling for revdump
 */

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use clap_complete::Shell;
use strum::Display;

use crate::encoding::{TextEncoding, DEFAULT_ENCODINGS};
use crate::error::Result;
use crate::policy::Policy;
use crate::{bail, ensure};

/// How the manifest and content sections are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum GroupBy {
    /// One group per priority tier (default)
    #[default]
    Tier,
    /// One group per top-level directory, root files first
    Directory,
}

/// Command-line arguments for revdump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "revdump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Assemble a single code review report from a project tree",
    long_about = "Walks a project tree, keeps only whitelisted files, redacts sensitive ones and writes a directory tree, a manifest and every included file into one text report."
)]
pub struct Args {
    /// Project root to review
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Report file name, relative to the project root unless absolute
    #[clap(long, short, default_value = "code_review.txt")]
    pub output: String,

    /// JSON policy document replacing the built-in rules
    #[clap(long)]
    pub policy: Option<String>,

    /// Manifest grouping
    #[clap(long, value_enum, default_value_t = GroupBy::default())]
    pub group_by: GroupBy,

    /// Collapse blank lines and drop plain `//` comments
    #[clap(long)]
    pub compact: bool,

    /// List exact-path whitelist entries that were not found
    #[clap(long)]
    pub report_missing: bool,

    /// Decoding fallback order
    #[clap(long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_ENCODINGS)]
    pub encodings: Vec<TextEncoding>,

    /// Print a two-line summary instead of tables
    #[clap(long)]
    pub plain: bool,

    /// Print the effective policy as JSON and exit
    #[clap(long)]
    pub dump_policy: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project root to walk
    pub target_dir: PathBuf,

    /// Report file path
    pub output_file: PathBuf,

    /// Selection and redaction policy
    pub policy: Policy,

    /// Manifest grouping
    pub group_by: GroupBy,

    /// Whether included content is compacted
    pub compact: bool,

    /// Whether missing exact-path entries are reported
    pub report_missing: bool,

    /// Decoding fallback order
    pub encodings: Vec<TextEncoding>,
}

impl Config {
    /// Default configuration for a project root
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        let target_dir = target_dir.into();
        Self {
            output_file: target_dir.join("code_review.txt"),
            target_dir,
            policy: Policy::default(),
            group_by: GroupBy::default(),
            compact: false,
            report_missing: false,
            encodings: DEFAULT_ENCODINGS.to_vec(),
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let target_dir = PathBuf::from(&args.directory_path);

        let output = PathBuf::from(&args.output);
        let output_file = if output.is_absolute() {
            output
        } else {
            target_dir.join(output)
        };

        let policy = match &args.policy {
            Some(path) => Policy::from_file(&PathBuf::from(path))?,
            None => Policy::default(),
        };

        Ok(Self {
            target_dir,
            output_file,
            policy,
            group_by: args.group_by,
            compact: args.compact,
            report_missing: args.report_missing,
            encodings: args.encodings,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.is_dir() {
            bail!(
                PathNotFound,
                "Target directory not found: {}",
                self.target_dir.display()
            );
        }

        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!(
                    PathNotFound,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        ensure!(
            !self.output_file.is_dir(),
            InvalidArgument,
            "Output path is a directory: {}",
            self.output_file.display()
        );
        ensure!(
            !self.encodings.is_empty(),
            Config,
            "At least one encoding is required"
        );

        self.policy.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevDumpError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["revdump"]);
        assert_eq!(args.directory_path, ".");
        assert_eq!(args.output, "code_review.txt");
        assert_eq!(args.group_by, GroupBy::Tier);
        assert_eq!(args.encodings, DEFAULT_ENCODINGS.to_vec());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "revdump",
            "project",
            "--output",
            "/tmp/out.txt",
            "--group-by",
            "directory",
            "--encodings",
            "utf8,latin1",
            "--compact",
            "-vv",
        ]);
        assert_eq!(args.group_by, GroupBy::Directory);
        assert_eq!(
            args.encodings,
            vec![TextEncoding::Utf8, TextEncoding::Latin1]
        );
        assert!(args.compact);
        assert_eq!(args.verbose, 2);

        let config = Config::from_args(args).unwrap();
        assert_eq!(config.target_dir, PathBuf::from("project"));
        assert_eq!(config.output_file, PathBuf::from("/tmp/out.txt"));
    }

    #[test]
    fn test_relative_output_lands_in_root() {
        let args = Args::parse_from(["revdump", "project"]);
        let config = Config::from_args(args).unwrap();
        assert_eq!(
            config.output_file,
            PathBuf::from("project").join("code_review.txt")
        );
    }

    #[test]
    fn test_policy_file_is_loaded() {
        let dir = tempdir().unwrap();
        let policy_path = dir.path().join("policy.json");
        fs::write(
            &policy_path,
            r#"{ "sensitive_files": ["secrets.env"], "rules": [] }"#,
        )
        .unwrap();

        let args = Args::parse_from([
            "revdump",
            dir.path().to_str().unwrap(),
            "--policy",
            policy_path.to_str().unwrap(),
        ]);
        let config = Config::from_args(args).unwrap();
        assert!(config.policy.rules.is_empty());
        assert_eq!(config.policy.sensitive_files, vec!["secrets.env"]);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_policy_file_is_io_error() {
        let args = Args::parse_from(["revdump", ".", "--policy", "/definitely/not/here.json"]);
        assert!(matches!(
            Config::from_args(args),
            Err(RevDumpError::Io(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_root() {
        let config = Config::new("/definitely/not/here");
        assert!(matches!(
            config.validate(),
            Err(RevDumpError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_encodings() {
        let dir = tempdir().unwrap();
        let mut config = Config::new(dir.path());
        config.encodings.clear();
        assert!(matches!(config.validate(), Err(RevDumpError::Config(_))));
    }
}
