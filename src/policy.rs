/*!
 * Classification policy: the rule data driving the walker, classifier and sanitizer
 *
 * A policy is plain data. It can be loaded from a JSON document or taken from
 * the built-in default, and is handed to each stage at construction time.
 */

use std::fs;
use std::path::Path;

use glob_match::glob_match;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt};
use crate::types::Tier;
use crate::utils::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_EXCLUDED_NAMES};
use crate::{bail, ensure};

/// What a rule tests a file against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    /// Exact relative paths
    Exact { paths: Vec<String> },
    /// Glob patterns matched against the whole relative path
    Glob { patterns: Vec<String> },
    /// Lower-cased extensions with their leading dot
    Extension { extensions: Vec<String> },
    /// Exact file names, wherever they live
    FileName { names: Vec<String> },
    /// A recognised extension AND at least one structural pattern
    Essential {
        extensions: Vec<String>,
        patterns: Vec<String>,
    },
}

impl Matcher {
    /// Test a normalized relative path
    pub fn matches(&self, rel_path: &str, file_name: &str, extension: Option<&str>) -> bool {
        match self {
            Matcher::Exact { paths } => paths.iter().any(|p| p == rel_path),
            Matcher::Glob { patterns } => matches_any(patterns, rel_path),
            Matcher::Extension { extensions } => {
                extension.map_or(false, |ext| extensions.iter().any(|e| e == ext))
            }
            Matcher::FileName { names } => names.iter().any(|n| n == file_name),
            Matcher::Essential {
                extensions,
                patterns,
            } => {
                extension.map_or(false, |ext| extensions.iter().any(|e| e == ext))
                    && matches_any(patterns, rel_path)
            }
        }
    }
}

/// Glob match against any pattern of the set
pub fn matches_any(patterns: &[String], rel_path: &str) -> bool {
    patterns.iter().any(|p| glob_match(p, rel_path))
}

/// What happens to a file once a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Include the file at the given tier
    Include(Tier),
    /// Drop the file
    Exclude,
}

/// One entry of the ordered rule list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Name used in debug logs
    #[serde(default)]
    pub name: String,
    /// Test applied to the file
    #[serde(rename = "match")]
    pub matcher: Matcher,
    /// Outcome when the test passes
    pub action: Action,
}

impl Rule {
    /// Shorthand used by the default policy and tests
    pub fn new(name: &str, matcher: Matcher, action: Action) -> Self {
        Self {
            name: name.to_string(),
            matcher,
            action,
        }
    }

    /// Exact-path and glob includes are explicit whitelist entries and beat
    /// every exclusion regardless of their position in the list.
    pub fn is_explicit_whitelist(&self) -> bool {
        matches!(self.action, Action::Include(_))
            && matches!(
                self.matcher,
                Matcher::Exact { .. } | Matcher::Glob { .. }
            )
    }

    fn validate(&self, index: usize) -> Result<()> {
        let label = if self.name.is_empty() {
            format!("rule #{}", index)
        } else {
            format!("rule '{}'", self.name)
        };

        if let Action::Include(tier) = self.action {
            ensure!(
                tier.is_included(),
                Policy,
                "{} includes files at tier '{}', which is never emitted",
                label,
                tier
            );
        }

        let (lists, extensions): (Vec<&Vec<String>>, Option<&Vec<String>>) = match &self.matcher
        {
            Matcher::Exact { paths } => (vec![paths], None),
            Matcher::Glob { patterns } => (vec![patterns], None),
            Matcher::Extension { extensions } => (vec![extensions], Some(extensions)),
            Matcher::FileName { names } => (vec![names], None),
            Matcher::Essential {
                extensions,
                patterns,
            } => (vec![extensions, patterns], Some(extensions)),
        };

        for list in lists {
            ensure!(!list.is_empty(), Policy, "{} has an empty list", label);
            if let Some(entry) = list.iter().find(|e| e.trim().is_empty()) {
                bail!(Policy, "{} contains a blank entry {:?}", label, entry);
            }
            if let Some(entry) = list.iter().find(|e| e.contains('\\')) {
                bail!(Policy, "{} entry {:?} must use '/' separators", label, entry);
            }
        }

        if let Some(extensions) = extensions {
            for ext in extensions {
                ensure!(
                    ext.starts_with('.') && *ext == ext.to_lowercase(),
                    Policy,
                    "{} extension {:?} must be lower-case and start with '.'",
                    label,
                    ext
                );
            }
        }

        Ok(())
    }
}

/// Complete selection policy for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Directory names pruned before descent
    pub excluded_dirs: Vec<String>,
    /// Prune directories whose name starts with `.`
    pub skip_hidden_dirs: bool,
    /// Ordered classification rules
    pub rules: Vec<Rule>,
    /// Exact relative paths whose content is redacted
    pub sensitive_files: Vec<String>,
}

impl Policy {
    /// Load and validate a policy document
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Parse and validate a policy from JSON text
    pub fn from_json(raw: &str) -> Result<Self> {
        let policy: Policy = serde_json::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Pretty JSON form, used by `--dump-policy`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the policy for entries that could never match or never emit
    pub fn validate(&self) -> Result<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            rule.validate(index)?;
        }
        if let Some(dir) = self
            .excluded_dirs
            .iter()
            .find(|d| d.is_empty() || d.contains('/'))
        {
            bail!(Policy, "excluded directory {:?} must be a plain name", dir);
        }
        if let Some(path) = self
            .sensitive_files
            .iter()
            .find(|p| p.is_empty() || p.contains('\\'))
        {
            bail!(Policy, "sensitive file {:?} must be a '/'-separated path", path);
        }
        Ok(())
    }

    /// Exact-path whitelist entries, used to report expected files that are missing
    pub fn expected_paths(&self) -> Vec<(String, Tier)> {
        let mut expected = Vec::new();
        for rule in &self.rules {
            if let (Matcher::Exact { paths }, Action::Include(tier)) = (&rule.matcher, rule.action)
            {
                for path in paths {
                    if !expected.iter().any(|(p, _)| p == path) {
                        expected.push((path.clone(), tier));
                    }
                }
            }
        }
        expected
    }

    /// Short description of the selection strategy for the report header
    pub fn strategy(&self) -> String {
        let explicit = self
            .rules
            .iter()
            .filter(|r| r.is_explicit_whitelist())
            .count();
        format!(
            "Whitelist-first classification ({} rules, {} explicit whitelist), closed-world default",
            self.rules.len(),
            explicit
        )
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Policy {
    fn default() -> Self {
        let rules = vec![
            Rule::new(
                "critical-files",
                Matcher::Exact {
                    paths: strings(&[
                        "CLAUDE.md",
                        "Cargo.toml",
                        "package.json",
                        "pyproject.toml",
                        "go.mod",
                    ]),
                },
                Action::Include(Tier::Critical),
            ),
            Rule::new(
                "critical-sources",
                Matcher::Glob {
                    patterns: strings(&[
                        "src/**/*.{rs,ts,js,py,go}",
                        "lib/**/*.{rs,ts,js,py,go}",
                        "*/src/**/*.{rs,ts,js,py,go}",
                        "**/*.prisma",
                    ]),
                },
                Action::Include(Tier::Critical),
            ),
            Rule::new(
                "important-config",
                Matcher::Exact {
                    paths: strings(&[".env", "tsconfig.json", "Dockerfile", "Makefile"]),
                },
                Action::Include(Tier::Important),
            ),
            Rule::new(
                "important-context",
                Matcher::Glob {
                    patterns: strings(&["*/package.json", "*/Cargo.toml", "config/**/*.{toml,yaml,yml,json}"]),
                },
                Action::Include(Tier::Important),
            ),
            Rule::new(
                "documentation",
                Matcher::Glob {
                    patterns: strings(&["README.md", "*/README.md", "docs/**/*.md"]),
                },
                Action::Include(Tier::Documentation),
            ),
            Rule::new(
                "noise-extensions",
                Matcher::Extension {
                    extensions: strings(&DEFAULT_EXCLUDED_EXTENSIONS),
                },
                Action::Exclude,
            ),
            Rule::new(
                "noise-names",
                Matcher::FileName {
                    names: strings(&DEFAULT_EXCLUDED_NAMES),
                },
                Action::Exclude,
            ),
            Rule::new(
                "essential-sources",
                Matcher::Essential {
                    extensions: strings(&[".rs", ".ts", ".js", ".py", ".go"]),
                    patterns: strings(&[
                        "**/src/**",
                        "**/app/**",
                        "**/pages/**",
                        "**/utils/**",
                    ]),
                },
                Action::Include(Tier::Important),
            ),
            Rule::new(
                "catch-all-noise",
                Matcher::Glob {
                    patterns: strings(&[
                        "**/*.min.js",
                        "**/*.generated.*",
                        "**/load-test*",
                        "**/__mocks__/**",
                        "**/.env.*",
                    ]),
                },
                Action::Exclude,
            ),
        ];

        Self {
            excluded_dirs: strings(&DEFAULT_EXCLUDED_DIRS),
            skip_hidden_dirs: true,
            rules,
            sensitive_files: strings(&[".env"]),
        }
    }
}
