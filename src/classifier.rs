/*!
 * Whitelist-first file classification
 */

use tracing::trace;

use crate::policy::{Action, Matcher, Policy, Rule};
use crate::types::Tier;
use crate::utils::file_extension;

/// Outcome of classifying one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Final tier, `Tier::Excluded` when dropped
    pub tier: Tier,
    /// Name of the deciding rule, `None` for the closed-world default
    pub rule: Option<String>,
}

/// Evaluates an ordered rule list against relative paths
///
/// Exact-path includes are checked first; when several match, the highest
/// tier wins. Glob includes are checked next, in list order. Every other rule
/// is then checked in list order. A path that nothing matches is excluded.
#[derive(Debug, Clone)]
pub struct Classifier {
    exact: Vec<Rule>,
    globs: Vec<Rule>,
    ordered: Vec<Rule>,
}

fn action_tier(action: Action) -> Tier {
    match action {
        Action::Include(tier) => tier,
        Action::Exclude => Tier::Excluded,
    }
}

impl Classifier {
    /// Build a classifier from a policy's rule list
    pub fn new(policy: &Policy) -> Self {
        let mut classifier = Self {
            exact: Vec::new(),
            globs: Vec::new(),
            ordered: Vec::new(),
        };
        for rule in &policy.rules {
            let phase = match rule.matcher {
                Matcher::Exact { .. } if rule.is_explicit_whitelist() => &mut classifier.exact,
                Matcher::Glob { .. } if rule.is_explicit_whitelist() => &mut classifier.globs,
                _ => &mut classifier.ordered,
            };
            phase.push(rule.clone());
        }
        classifier
    }

    /// Classify a `/`-separated relative path
    pub fn classify(&self, rel_path: &str) -> Verdict {
        let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        let extension = file_extension(file_name);
        let matching =
            |rule: &&Rule| rule.matcher.matches(rel_path, file_name, extension.as_deref());

        // min_by_key keeps the first rule among equal tiers
        let hit = self
            .exact
            .iter()
            .filter(&matching)
            .min_by_key(|rule| action_tier(rule.action))
            .or_else(|| self.globs.iter().chain(self.ordered.iter()).find(&matching));

        let verdict = match hit {
            Some(rule) => Verdict {
                tier: action_tier(rule.action),
                rule: Some(rule.name.clone()),
            },
            None => Verdict {
                tier: Tier::Excluded,
                rule: None,
            },
        };

        trace!(path = rel_path, tier = %verdict.tier, rule = ?verdict.rule, "classified");
        verdict
    }

    /// Tier only
    pub fn tier_of(&self, rel_path: &str) -> Tier {
        self.classify(rel_path).tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Denylists are listed first on purpose: list order must not let them win.
    fn layered_policy() -> Policy {
        Policy {
            rules: vec![
                Rule::new(
                    "catch-all",
                    Matcher::Glob {
                        patterns: list(&["**/tests/**", "**/*.lock", "**/migrations/**"]),
                    },
                    Action::Exclude,
                ),
                Rule::new(
                    "noise-ext",
                    Matcher::Extension {
                        extensions: list(&[".json", ".bak"]),
                    },
                    Action::Exclude,
                ),
                Rule::new(
                    "noise-names",
                    Matcher::FileName {
                        names: list(&["package.json"]),
                    },
                    Action::Exclude,
                ),
                Rule::new(
                    "essential",
                    Matcher::Essential {
                        extensions: list(&[".ts"]),
                        patterns: list(&["app/**"]),
                    },
                    Action::Include(Tier::Important),
                ),
                Rule::new(
                    "core",
                    Matcher::Exact {
                        paths: list(&["backend/package.json", "backend/src/db.ts"]),
                    },
                    Action::Include(Tier::Critical),
                ),
                Rule::new(
                    "services",
                    Matcher::Glob {
                        patterns: list(&["backend/src/services/*.ts"]),
                    },
                    Action::Include(Tier::Critical),
                ),
                Rule::new(
                    "plugins",
                    Matcher::Glob {
                        patterns: list(&["backend/src/plugins/*.ts"]),
                    },
                    Action::Include(Tier::Important),
                ),
                Rule::new(
                    "docs",
                    Matcher::Glob {
                        patterns: list(&["backend/src/tests/*.integration.test.ts", "*.md"]),
                    },
                    Action::Include(Tier::Documentation),
                ),
            ],
            ..Policy::default()
        }
    }

    #[test]
    fn test_exact_whitelist_beats_extension_and_name_denylists() {
        let classifier = Classifier::new(&layered_policy());
        let verdict = classifier.classify("backend/package.json");
        assert_eq!(verdict.tier, Tier::Critical);
        assert_eq!(verdict.rule.as_deref(), Some("core"));
    }

    #[test]
    fn test_lowest_tier_overrides_broadest_denylist() {
        let classifier = Classifier::new(&layered_policy());
        assert_eq!(
            classifier.tier_of("backend/src/tests/order.integration.test.ts"),
            Tier::Documentation
        );
        assert_eq!(
            classifier.tier_of("backend/src/tests/unit.test.ts"),
            Tier::Excluded
        );
    }

    #[test]
    fn test_first_whitelist_match_wins() {
        let mut policy = layered_policy();
        policy.rules.push(Rule::new(
            "late-duplicate",
            Matcher::Glob {
                patterns: list(&["backend/src/services/*.ts"]),
            },
            Action::Include(Tier::Documentation),
        ));
        let classifier = Classifier::new(&policy);
        let verdict = classifier.classify("backend/src/services/order.ts");
        assert_eq!(verdict.tier, Tier::Critical);
        assert_eq!(verdict.rule.as_deref(), Some("services"));
    }

    #[test]
    fn test_essential_requires_extension_and_pattern() {
        let classifier = Classifier::new(&layered_policy());
        assert_eq!(classifier.tier_of("app/pages/index.ts"), Tier::Important);
        assert_eq!(classifier.tier_of("app/pages/index.js"), Tier::Excluded);
        assert_eq!(classifier.tier_of("other/index.ts"), Tier::Excluded);
    }

    #[test]
    fn test_essential_loses_to_earlier_denylist() {
        let classifier = Classifier::new(&layered_policy());
        let verdict = classifier.classify("app/tests/helper.ts");
        assert_eq!(verdict.tier, Tier::Excluded);
        assert_eq!(verdict.rule.as_deref(), Some("catch-all"));
    }

    #[test]
    fn test_closed_world_default() {
        let classifier = Classifier::new(&layered_policy());
        for path in ["main.rs", "notes.txt", "backend/src/index.ts", "Makefile", ".env"] {
            let verdict = classifier.classify(path);
            assert_eq!(verdict.tier, Tier::Excluded, "{}", path);
            assert_eq!(verdict.rule, None, "{}", path);
        }
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let classifier = Classifier::new(&layered_policy());
        assert_eq!(
            classifier.classify("app/notes.BAK").rule.as_deref(),
            Some("noise-ext")
        );
    }

    #[test]
    fn test_empty_policy_excludes_everything() {
        let policy = Policy {
            rules: Vec::new(),
            ..Policy::default()
        };
        let classifier = Classifier::new(&policy);
        assert_eq!(classifier.tier_of("README.md"), Tier::Excluded);
    }

    #[test]
    fn test_default_policy_tiers() {
        let classifier = Classifier::new(&Policy::default());
        assert_eq!(classifier.tier_of("Cargo.toml"), Tier::Critical);
        assert_eq!(classifier.tier_of("src/net/conn.rs"), Tier::Critical);
        assert_eq!(classifier.tier_of(".env"), Tier::Important);
        assert_eq!(classifier.tier_of("README.md"), Tier::Documentation);
        assert_eq!(classifier.tier_of("yarn.lock"), Tier::Excluded);
        assert_eq!(classifier.tier_of("server.log"), Tier::Excluded);
        assert_eq!(classifier.tier_of("random.txt"), Tier::Excluded);
    }

    #[test]
    fn test_exact_include_beats_earlier_glob_include() {
        let policy = Policy {
            rules: vec![
                Rule::new(
                    "docs-glob",
                    Matcher::Glob {
                        patterns: list(&["**/*.ts"]),
                    },
                    Action::Include(Tier::Documentation),
                ),
                Rule::new(
                    "core",
                    Matcher::Exact {
                        paths: list(&["src/db.ts"]),
                    },
                    Action::Include(Tier::Critical),
                ),
            ],
            ..Policy::default()
        };
        let classifier = Classifier::new(&policy);
        let verdict = classifier.classify("src/db.ts");
        assert_eq!(verdict.tier, Tier::Critical);
        assert_eq!(verdict.rule.as_deref(), Some("core"));
        assert_eq!(classifier.tier_of("src/other.ts"), Tier::Documentation);
    }

    #[test]
    fn test_exact_path_takes_highest_listed_tier() {
        let policy = Policy {
            rules: vec![
                Rule::new(
                    "low",
                    Matcher::Exact {
                        paths: list(&["a.ts"]),
                    },
                    Action::Include(Tier::Documentation),
                ),
                Rule::new(
                    "high",
                    Matcher::Exact {
                        paths: list(&["a.ts", "b.ts"]),
                    },
                    Action::Include(Tier::Critical),
                ),
                Rule::new(
                    "also-high",
                    Matcher::Exact {
                        paths: list(&["a.ts"]),
                    },
                    Action::Include(Tier::Critical),
                ),
            ],
            ..Policy::default()
        };
        let verdict = Classifier::new(&policy).classify("a.ts");
        assert_eq!(verdict.tier, Tier::Critical);
        assert_eq!(verdict.rule.as_deref(), Some("high"));
    }
}
