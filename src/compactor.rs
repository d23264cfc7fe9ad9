/*!
 * Optional content compaction for denser reports
 */

use regex::Regex;

use crate::error::Result;

/// Collapses blank-line runs and drops plain `//` line comments
///
/// Marker comments (`// ===`, `// NOTE:`, `// IMPORTANT:`) survive.
#[derive(Debug, Clone)]
pub struct Compactor {
    line_comment: Regex,
    marker: Regex,
}

impl Compactor {
    /// Compile the comment patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            line_comment: Regex::new(r"^\s*//")?,
            marker: Regex::new(r"^\s*//\s*(===|NOTE:|IMPORTANT:)")?,
        })
    }

    /// Compact one file's content
    pub fn compact(&self, content: &str) -> String {
        let mut out: Vec<&str> = Vec::new();
        let mut prev_blank = false;

        for line in content.lines() {
            if line.trim().is_empty() {
                if !prev_blank {
                    out.push("");
                    prev_blank = true;
                }
                continue;
            }
            prev_blank = false;

            if self.line_comment.is_match(line) && !self.marker.is_match(line) {
                continue;
            }
            out.push(line);
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_runs() {
        let compactor = Compactor::new().unwrap();
        assert_eq!(compactor.compact("a\n\n\n\nb\n  \n\t\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_drops_plain_comments_keeps_markers() {
        let compactor = Compactor::new().unwrap();
        let src = "// helper\nfn a() {}\n    // inline note\n// === SECTION ===\n  // NOTE: keep\n// IMPORTANT: keep too\nlet url = \"http://x\"; // trailing";
        let out = compactor.compact(src);
        assert_eq!(
            out,
            "fn a() {}\n// === SECTION ===\n  // NOTE: keep\n// IMPORTANT: keep too\nlet url = \"http://x\"; // trailing"
        );
    }

    #[test]
    fn test_hash_comments_untouched() {
        let compactor = Compactor::new().unwrap();
        assert_eq!(compactor.compact("# comment\nKEY=value"), "# comment\nKEY=value");
    }
}
