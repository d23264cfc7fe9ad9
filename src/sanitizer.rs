/*!
 * Line-by-line redaction of sensitive `key=value` files
 */

use std::borrow::Cow;
use std::collections::BTreeSet;

/// Replacement for redacted values and unparseable lines
pub const REDACTED: &str = "[REDACTED]";

/// Redacts the content of files listed in the sensitive set
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    sensitive: BTreeSet<String>,
}

impl Sanitizer {
    /// Build a sanitizer over exact relative paths
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensitive: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `rel_path` is redacted on output
    pub fn is_sensitive(&self, rel_path: &str) -> bool {
        self.sensitive.contains(rel_path)
    }

    /// Return `content` untouched, or its redacted form for sensitive paths
    pub fn sanitize<'a>(&self, rel_path: &str, content: &'a str) -> Cow<'a, str> {
        if !self.is_sensitive(rel_path) {
            return Cow::Borrowed(content);
        }

        let lines: Vec<String> = content.trim().lines().map(redact_line).collect();

        Cow::Owned(format!(
            "#\n# CONTENT OF SENSITIVE FILE '{}' HAS BEEN REDACTED\n#\n{}",
            rel_path,
            lines.join("\n")
        ))
    }
}

fn redact_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return line.to_string();
    }
    match line.split_once('=') {
        Some((key, _)) => format!("{}={}", key, REDACTED),
        None => REDACTED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(["secrets.env", "backend/.env"])
    }

    #[test]
    fn test_non_sensitive_content_is_borrowed_unchanged() {
        let content = "API_KEY=abc123\n";
        let out = sanitizer().sanitize("config/.env", content);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, content);
    }

    #[test]
    fn test_keys_survive_values_do_not() {
        let content = "# config\nAPI_KEY=abc123\n\nDATABASE_URL=postgres://u:p@h/db?x=1\n";
        let out = sanitizer().sanitize("secrets.env", content);

        assert!(out.starts_with("#\n# CONTENT OF SENSITIVE FILE 'secrets.env' HAS BEEN REDACTED\n#\n"));
        assert!(out.contains("# config"));
        assert!(out.contains("API_KEY=[REDACTED]"));
        assert!(out.contains("DATABASE_URL=[REDACTED]"));
        assert!(!out.contains("abc123"));
        assert!(!out.contains("postgres"));
        assert!(!out.contains("x=1"));
    }

    #[test]
    fn test_lines_without_separator_are_fully_redacted() {
        let out = sanitizer().sanitize("backend/.env", "-----BEGIN KEY-----\nMIIEvQ\n");
        let body: Vec<&str> = out.lines().skip(3).collect();
        assert_eq!(body, vec![REDACTED, REDACTED]);
    }

    #[test]
    fn test_key_is_kept_verbatim() {
        let out = sanitizer().sanitize("secrets.env", "export  TOKEN = s3cret");
        assert!(out.ends_with("export  TOKEN =[REDACTED]"));
    }

    #[test]
    fn test_indented_comment_and_blank_lines_preserved() {
        let out = sanitizer().sanitize("secrets.env", "A=1\n\n   # keep = me\nB=2");
        let body: Vec<&str> = out.lines().skip(3).collect();
        assert_eq!(body, vec!["A=[REDACTED]", "", "   # keep = me", "B=[REDACTED]"]);
    }

    #[test]
    fn test_second_pass_keeps_key_names() {
        let s = sanitizer();
        let once = s.sanitize("secrets.env", "API_KEY=abc123\nplain\n").into_owned();
        let twice = s.sanitize("secrets.env", &once).into_owned();

        let keys = |text: &str| -> Vec<String> {
            text.lines()
                .filter_map(|l| l.split_once('=').map(|(k, _)| k.to_string()))
                .collect()
        };
        assert_eq!(keys(&once), keys(&twice));
        assert!(twice.contains("API_KEY=[REDACTED]"));
        assert!(!twice.contains("abc123"));
    }
}
