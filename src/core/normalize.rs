//! Comment body normalization
//!
//! Turns the raw text between `/*` and `*/` into plain markup: the `*`
//! column that decorates continuation lines is removed, then the block is
//! dedented.

/// Tags marking API annotation comments; never part of the rendered text
const API_TAGS: [&str; 2] = ["NUMPY_API", "UFUNC_API"];

/// Strip `*` decoration from every line, then dedent.
/// CRLF line endings come out as `\n`.
pub fn normalize(raw: &str) -> String {
    let undecorated: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(strip_decoration)
        .collect();
    dedent(&undecorated)
}

/// Remove an API tag (and the whitespace after it) from the start of `text`
pub fn strip_api_tag(text: &str) -> &str {
    let mut text = text;
    for tag in API_TAGS {
        if let Some(rest) = text.strip_prefix(tag) {
            if rest.starts_with(char::is_whitespace) {
                text = rest.trim_start();
            }
        }
    }
    text
}

/// Remove leading whitespace followed by a single `*`, if present
fn strip_decoration(line: &str) -> &str {
    line.trim_start().strip_prefix('*').unwrap_or(line)
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c == ' ' || c == '\t')
}

fn leading_indent(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Remove the longest run of spaces/tabs common to all non-blank lines.
/// Blank lines come out empty.
fn dedent(lines: &[&str]) -> String {
    let mut margin: Option<&str> = None;
    for line in lines.iter().filter(|l| !is_blank(l)) {
        let indent = leading_indent(line);
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    lines
        .iter()
        .map(|line| {
            if is_blank(line) {
                ""
            } else {
                &line[margin.len()..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}
