//! Block comment discovery
//!
//! A single left-to-right regex pass. There is no awareness of the host
//! language: `/*` inside a string literal starts a comment like any other.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// A newline, the shortest text up to `/*`, then the shortest body up to `*/`
static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();

fn comment_regex() -> &'static Regex {
    COMMENT_REGEX.get_or_init(|| {
        Regex::new(r"(?s)(\n.*?)/\*(.*?)\*/").expect("Failed to compile comment regex")
    })
}

/// One comment found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMatch<'a> {
    /// Byte range of the whole match (preceding text through `*/`)
    pub span: Range<usize>,
    /// Text from the anchoring newline up to `/*`
    pub preceding: &'a str,
    /// Text between `/*` and `*/`
    pub raw: &'a str,
}

/// Text after the last newline of `preceding`
pub fn preline(preceding: &str) -> &str {
    preceding
        .rsplit_once('\n')
        .map_or(preceding, |(_, last)| last)
}

/// Iterate over all non-overlapping comments in `text`, in order
pub fn find_comments(text: &str) -> impl Iterator<Item = CommentMatch<'_>> {
    comment_regex().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(CommentMatch {
            span: whole.range(),
            preceding: caps.get(1)?.as_str(),
            raw: caps.get(2)?.as_str(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_comment_on_own_line() {
        let text = "int x;\n/* description */\nint y;\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preceding, "\n");
        assert_eq!(found[0].raw, " description ");
        assert_eq!(preline(found[0].preceding), "");
        assert_eq!(&text[found[0].span.clone()], "\n/* description */");
    }

    #[test]
    fn test_trailing_comment_preline() {
        let text = "struct s {\n    int count; /* the count */\n};\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].preceding, "\n    int count; ");
        assert_eq!(preline(found[0].preceding), "    int count; ");
    }

    #[test]
    fn test_multi_line_body() {
        let text = "\n/*\n * one\n * two\n */\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, "\n * one\n * two\n ");
    }

    #[test]
    fn test_body_ends_at_first_close() {
        let text = "\n/* a */ b */\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, " a ");
    }

    #[test]
    fn test_preceding_spans_lines_since_last_match() {
        let text = "\n/* a */\nint x;\nint y; /* b */\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 2);
        assert_eq!(found[1].preceding, "\nint x;\nint y; ");
        assert_eq!(preline(found[1].preceding), "int y; ");
    }

    #[test]
    fn test_same_line_second_comment_not_matched() {
        // A match needs a newline after the previous one ended
        let text = "\n/* a */ /* b */\n";
        let found: Vec<_> = find_comments(text).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].raw, " a ");
    }

    #[test]
    fn test_comment_on_first_line_not_matched() {
        let text = "/* header */\nint x;\n";
        assert_eq!(find_comments(text).count(), 0);
    }

    #[test]
    fn test_unterminated_comment_not_matched() {
        let text = "int x;\n/* never closed\nint y;\n";
        assert_eq!(find_comments(text).count(), 0);
    }

    #[test]
    fn test_preline_without_newline() {
        assert_eq!(preline("abc"), "abc");
        assert_eq!(preline("x\n  y"), "  y");
    }
}
