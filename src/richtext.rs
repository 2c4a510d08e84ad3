//! Inline-markup parser — free-form doc text to typed rich-text segments.
//!
//! The grammar is deliberately small: `` `code` `` spans, `**bold**`,
//! `*italic*`, and `[text](url)` links. The scan runs left to right and
//! never backtracks past a committed segment. Markers never nest; content
//! of an open span is taken verbatim until its closing delimiter. Anything
//! that fails to close degrades to literal text instead of erroring.

/// One typed span of parsed inline markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
}

impl Segment {
    /// The visible text content of the segment.
    pub fn content(&self) -> &str {
        match self {
            Segment::Plain(s) | Segment::Bold(s) | Segment::Italic(s) | Segment::Code(s) => s,
            Segment::Link { text, .. } => text,
        }
    }
}

/// Ordered segments of one parsed string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    pub segments: Vec<Segment>,
}

impl RichText {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flatten to plain text: segment contents only, markup and link
    /// targets dropped.
    pub fn plain(&self) -> String {
        self.segments.iter().map(Segment::content).collect()
    }
}

/// Characters a backslash may escape to suppress their marker meaning.
fn is_marker(b: u8) -> bool {
    matches!(b, b'`' | b'*' | b'[' | b']' | b'\\')
}

/// Parse a raw documentation string into rich-text segments.
///
/// Link URLs are accepted verbatim here; whether a URL may be emitted as a
/// hyperlink is decided at render time by [`crate::escape::is_safe_url`].
pub fn parse(raw: &str) -> RichText {
    let bytes = raw.as_bytes();
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() && is_marker(bytes[i + 1]) => {
                plain.push(bytes[i + 1] as char);
                i += 2;
            }
            b'`' => {
                if let Some((content, next)) = scan_code(raw, i + 1) {
                    flush(&mut segments, &mut plain);
                    segments.push(Segment::Code(content));
                    i = next;
                } else {
                    plain.push('`');
                    i += 1;
                }
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                if let Some((content, next)) = scan_until(raw, i + 2, "**") {
                    flush(&mut segments, &mut plain);
                    segments.push(Segment::Bold(content));
                    i = next;
                } else {
                    plain.push('*');
                    i += 1;
                }
            }
            b'*' => {
                if let Some((content, next)) = scan_until(raw, i + 1, "*") {
                    flush(&mut segments, &mut plain);
                    segments.push(Segment::Italic(content));
                    i = next;
                } else {
                    plain.push('*');
                    i += 1;
                }
            }
            b'[' => {
                if let Some((text, url, next)) = scan_link(raw, i) {
                    flush(&mut segments, &mut plain);
                    segments.push(Segment::Link { text, url });
                    i = next;
                } else {
                    plain.push('[');
                    i += 1;
                }
            }
            _ => {
                // Safe: `i` sits on a non-marker byte, so it is a char start.
                let ch = raw[i..].chars().next().unwrap();
                plain.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    flush(&mut segments, &mut plain);
    RichText { segments }
}

/// Extract the first sentence of the first non-empty doc line and parse it
/// through the same markup rules.
///
/// Sentence boundary: the first `.`, `!` or `?` followed by whitespace or
/// the end of the string.
pub fn summarize(docs: &[String]) -> RichText {
    let line = match docs.iter().find(|l| !l.trim().is_empty()) {
        Some(l) => l.trim(),
        None => return RichText::default(),
    };
    parse(first_sentence(line))
}

fn first_sentence(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?') {
            match bytes.get(i + 1) {
                None => return line,
                Some(next) if next.is_ascii_whitespace() => return &line[..=i],
                _ => {}
            }
        }
    }
    line
}

fn flush(segments: &mut Vec<Segment>, plain: &mut String) {
    if !plain.is_empty() {
        segments.push(Segment::Plain(std::mem::take(plain)));
    }
}

/// Scan a code span body starting just past the opening backtick.
/// `\`` inside the span stands for a literal backtick.
fn scan_code(raw: &str, start: usize) -> Option<(String, usize)> {
    let bytes = raw.as_bytes();
    let mut content = String::new();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b'`') => {
                content.push('`');
                i += 2;
            }
            b'`' => return Some((content, i + 1)),
            _ => {
                let ch = raw[i..].chars().next().unwrap();
                content.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    None
}

/// Scan span content up to the closing delimiter, verbatim.
fn scan_until(raw: &str, start: usize, delim: &str) -> Option<(String, usize)> {
    raw[start..]
        .find(delim)
        .map(|pos| (raw[start..start + pos].to_string(), start + pos + delim.len()))
}

/// Scan a `[text](url)` link at `start` (which sits on the `[`).
/// Text must be non-empty; the URL may be any string, including empty.
fn scan_link(raw: &str, start: usize) -> Option<(String, String, usize)> {
    let close = raw[start + 1..].find(']').map(|p| start + 1 + p)?;
    let text = &raw[start + 1..close];
    if text.is_empty() || !raw[close + 1..].starts_with('(') {
        return None;
    }
    let url_start = close + 2;
    let url_end = raw[url_start..].find(')').map(|p| url_start + p)?;
    Some((
        text.to_string(),
        raw[url_start..url_end].to_string(),
        url_end + 1,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> Segment {
        Segment::Plain(s.to_string())
    }

    #[test]
    fn plain_text_single_segment() {
        let rt = parse("just words");
        assert_eq!(rt.segments, vec![plain("just words")]);
    }

    #[test]
    fn code_span() {
        let rt = parse("run `make all` now");
        assert_eq!(
            rt.segments,
            vec![
                plain("run "),
                Segment::Code("make all".into()),
                plain(" now"),
            ]
        );
    }

    #[test]
    fn bold_and_italic() {
        let rt = parse("**loud** and *soft*");
        assert_eq!(
            rt.segments,
            vec![
                Segment::Bold("loud".into()),
                plain(" and "),
                Segment::Italic("soft".into()),
            ]
        );
    }

    #[test]
    fn link() {
        let rt = parse("see [docs](https://example.com)");
        assert_eq!(
            rt.segments,
            vec![
                plain("see "),
                Segment::Link {
                    text: "docs".into(),
                    url: "https://example.com".into(),
                },
            ]
        );
    }

    #[test]
    fn link_url_not_validated_at_parse_time() {
        let rt = parse("[here](javascript:alert(1)");
        // The first `)` closes the URL; the rest is literal.
        assert_eq!(
            rt.segments,
            vec![
                Segment::Link {
                    text: "here".into(),
                    url: "javascript:alert(1".into(),
                },
            ]
        );
    }

    #[test]
    fn link_empty_text_is_literal() {
        let rt = parse("[](https://example.com)");
        assert_eq!(rt.plain(), "[](https://example.com)");
    }

    #[test]
    fn unterminated_code_degrades() {
        let rt = parse("a `broken span");
        assert_eq!(rt.segments, vec![plain("a `broken span")]);
    }

    #[test]
    fn unterminated_bold_degrades() {
        let rt = parse("**almost bold");
        assert_eq!(rt.segments, vec![plain("**almost bold")]);
    }

    #[test]
    fn lone_bracket_is_literal() {
        let rt = parse("array[0] access");
        assert_eq!(rt.segments, vec![plain("array[0] access")]);
    }

    #[test]
    fn escaped_markers_are_literal() {
        let rt = parse(r"\*not italic\* and \`not code\`");
        assert_eq!(rt.segments, vec![plain("*not italic* and `not code`")]);
    }

    #[test]
    fn backslash_before_non_marker_is_literal() {
        let rt = parse(r"path\to\file");
        assert_eq!(rt.segments, vec![plain(r"path\to\file")]);
    }

    #[test]
    fn escaped_backtick_inside_code_span() {
        let rt = parse(r"`tick \` inside`");
        assert_eq!(rt.segments, vec![Segment::Code("tick ` inside".into())]);
    }

    #[test]
    fn markers_do_not_nest() {
        let rt = parse("*outer **inner* rest**");
        // Italic closes at the first `*`; everything after re-scans.
        assert_eq!(
            rt.segments,
            vec![
                Segment::Italic("outer ".into()),
                Segment::Italic("inner".into()),
                plain(" rest**"),
            ]
        );
    }

    #[test]
    fn code_wins_over_emphasis() {
        let rt = parse("`a * b`");
        assert_eq!(rt.segments, vec![Segment::Code("a * b".into())]);
    }

    #[test]
    fn adjacent_plain_runs_coalesce() {
        let rt = parse("a * b ` c");
        assert_eq!(rt.segments.len(), 1);
        assert_eq!(rt.plain(), "a * b ` c");
    }

    #[test]
    fn plain_flattening_drops_markup() {
        let rt = parse("**x** `y` [z](https://example.com)");
        assert_eq!(rt.plain(), "x y z");
    }

    #[test]
    fn summarize_first_sentence() {
        let docs = vec![
            "Build the project. Produces a binary.".to_string(),
            "Second line.".to_string(),
        ];
        assert_eq!(summarize(&docs).plain(), "Build the project.");
    }

    #[test]
    fn summarize_skips_empty_lines() {
        let docs = vec!["   ".to_string(), "Clean everything!".to_string()];
        assert_eq!(summarize(&docs).plain(), "Clean everything!");
    }

    #[test]
    fn summarize_dot_inside_token_is_not_a_boundary() {
        let docs = vec!["Runs v1.2 of the tool. Then exits.".to_string()];
        assert_eq!(summarize(&docs).plain(), "Runs v1.2 of the tool.");
    }

    #[test]
    fn summarize_whole_line_without_boundary() {
        let docs = vec!["Build everything".to_string()];
        assert_eq!(summarize(&docs).plain(), "Build everything");
    }

    #[test]
    fn summarize_keeps_markup() {
        let docs = vec!["Build with `code` enabled. More.".to_string()];
        let rt = summarize(&docs);
        assert!(rt.segments.contains(&Segment::Code("code".into())));
    }

    #[test]
    fn summarize_empty_docs() {
        assert!(summarize(&[]).is_empty());
    }
}
