//! ACL rewriting
//!
//! The name-server configuration is treated as an ordered list of lines. The
//! only line ever touched is the one right after the first line equal to the
//! marker, which becomes `\t<address>;`:
//!
//! ```text
//! acl "heathcliff26" {        <- marker
//!     203.0.113.7;            <- replaced
//! };
//! ```
//!
//! [`rewrite_lines`] is the pure transformation; [`AclFile`] applies it to a
//! file on disk.

pub mod file;

pub use file::AclFile;

/// Result of rewriting a configuration document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Every line of the document, in order, without terminators
    pub lines: Vec<String>,
    /// Whether the address line was replaced
    pub replaced: bool,
}

impl Rewrite {
    /// Render the document with one `\n` after every line
    pub fn render(&self) -> String {
        let capacity = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

/// Format the ACL entry for `address`
pub fn acl_entry(address: &str) -> String {
    format!("\t{};", address)
}

/// Replace the line after the first `marker` line with the entry for `address`
///
/// Lines are split on `\n` or `\r\n`. If the marker is absent, or is the last
/// line, nothing is replaced and the lines come back as they were read.
pub fn rewrite_lines(content: &str, marker: &str, address: &str) -> Rewrite {
    let mut lines: Vec<String> = content.lines().map(str::to_owned).collect();

    let target = lines
        .iter()
        .position(|line| line == marker)
        .map(|idx| idx + 1)
        .filter(|&idx| idx < lines.len());

    match target {
        Some(idx) => {
            lines[idx] = acl_entry(address);
            Rewrite {
                lines,
                replaced: true,
            }
        }
        None => Rewrite {
            lines,
            replaced: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "acl \"heathcliff26\" {";

    const CONF: &str = "options {\n\
        \tdirectory \"/var/cache/bind\";\n\
        };\n\
        acl \"heathcliff26\" {\n\
        \t198.51.100.1;\n\
        };\n";

    #[test]
    fn test_replaces_only_line_after_marker() {
        let result = rewrite_lines(CONF, MARKER, "10.0.0.5");
        let before: Vec<&str> = CONF.lines().collect();

        assert!(result.replaced);
        assert_eq!(result.lines.len(), before.len());
        for (i, (old, new)) in before.iter().zip(&result.lines).enumerate() {
            if i == 4 {
                assert_eq!(new, "\t10.0.0.5;");
            } else {
                assert_eq!(old, new, "line {} changed", i);
            }
        }
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let once = rewrite_lines(CONF, MARKER, "10.0.0.5").render();
        let twice = rewrite_lines(&once, MARKER, "10.0.0.5").render();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_marker_leaves_document_unchanged() {
        let conf = "options {\n\tlisten-on { any; };\n};\n";
        let result = rewrite_lines(conf, MARKER, "10.0.0.5");

        assert!(!result.replaced);
        assert_eq!(result.render(), conf);
    }

    #[test]
    fn test_marker_on_last_line_is_skipped() {
        let conf = "options {\n};\nacl \"heathcliff26\" {\n";
        let result = rewrite_lines(conf, MARKER, "10.0.0.5");

        assert!(!result.replaced);
        assert_eq!(result.render(), conf);
    }

    #[test]
    fn test_only_first_marker_is_used() {
        let conf = "acl \"heathcliff26\" {\n\t1.1.1.1;\n};\nacl \"heathcliff26\" {\n\t2.2.2.2;\n};\n";
        let result = rewrite_lines(conf, MARKER, "10.0.0.5");

        assert_eq!(result.lines[1], "\t10.0.0.5;");
        assert_eq!(result.lines[4], "\t2.2.2.2;");
    }

    #[test]
    fn test_marker_must_match_exactly() {
        let conf = "  acl \"heathcliff26\" {\n\t1.1.1.1;\n};\n";
        let result = rewrite_lines(conf, MARKER, "10.0.0.5");

        assert!(!result.replaced);
    }

    #[test]
    fn test_crlf_input_is_normalized_to_lf() {
        let conf = "acl \"heathcliff26\" {\r\n\t1.1.1.1;\r\n};\r\n";
        let result = rewrite_lines(conf, MARKER, "10.0.0.5");

        assert_eq!(result.render(), "acl \"heathcliff26\" {\n\t10.0.0.5;\n};\n");
    }

    #[test]
    fn test_ipv6_entry_is_not_normalized() {
        assert_eq!(acl_entry("2001:DB8::1"), "\t2001:DB8::1;");
    }
}
