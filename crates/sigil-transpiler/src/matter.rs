//! Front and back matter extraction.
//!
//! A document may open with a metadata block ended by a marker line, and may
//! close with a metadata block started by one:
//!
//! ```text
//! title: Post        <- front matter
//! ~~~
//! <h1>\= title</h1>  <- body
//! ~~~
//! layout: wide       <- back matter
//! ```
//!
//! The first marker followed by a line break ends the front matter. The next
//! one starts the back matter, which runs to end of input. A marker that is
//! not followed by a line break is ordinary text.

/// Default matter delimiter.
pub const DEFAULT_MARKER: &str = "~~~";

/// A document split into optional matter blocks and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matter<'a> {
    /// Text before the first marker line.
    pub front: Option<&'a str>,
    /// Text between the matter blocks.
    pub body: &'a str,
    /// Text after the second marker line.
    pub back: Option<&'a str>,
    /// Byte offset of `body` within the input.
    pub body_start: usize,
}

impl Matter<'_> {
    /// Byte offset just past the end of `body` within the input.
    #[must_use]
    pub fn body_end(&self) -> usize {
        self.body_start + self.body.len()
    }
}

/// Split `input` into front matter, body and back matter.
///
/// # Example
///
/// ```
/// use sigil_transpiler::extract_matter;
///
/// let matter = extract_matter("header\n~~~\nbody~~~\nfooter\n", "~~~");
/// assert_eq!(matter.front, Some("header\n"));
/// assert_eq!(matter.body, "body");
/// assert_eq!(matter.back, Some("footer\n"));
/// ```
#[must_use]
pub fn extract<'a>(input: &'a str, marker: &str) -> Matter<'a> {
    let (front, body_start) = match find_marker_line(input, marker) {
        Some((at, after)) => (Some(&input[..at]), after),
        None => (None, 0),
    };

    let rest = &input[body_start..];
    let (back, body_end) = match find_marker_line(rest, marker) {
        Some((at, after)) => (Some(&rest[after..]), body_start + at),
        None => (None, input.len()),
    };

    Matter {
        front,
        body: &input[body_start..body_end],
        back,
        body_start,
    }
}

/// Find the first `marker` directly followed by `\n` or `\r\n`.
///
/// Returns the marker offset and the offset just past the line break.
fn find_marker_line(text: &str, marker: &str) -> Option<(usize, usize)> {
    let step = marker.chars().next()?.len_utf8();
    let mut from = 0;

    while let Some(found) = text[from..].find(marker) {
        let at = from + found;
        let after = at + marker.len();
        let tail = &text[after..];

        if tail.starts_with('\n') {
            return Some((at, after + 1));
        }
        if tail.starts_with("\r\n") {
            return Some((at, after + 2));
        }

        from = at + step;
    }

    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_front_and_back() {
        let matter = extract("header\n~~~\nbody~~~\nfooter\n", DEFAULT_MARKER);
        assert_eq!(matter.front, Some("header\n"));
        assert_eq!(matter.body, "body");
        assert_eq!(matter.back, Some("footer\n"));
        assert_eq!(matter.body_start, 11);
        assert_eq!(matter.body_end(), 15);
    }

    #[test]
    fn test_no_matter() {
        let matter = extract("<h1>Title</h1>\n", DEFAULT_MARKER);
        assert_eq!(matter.front, None);
        assert_eq!(matter.body, "<h1>Title</h1>\n");
        assert_eq!(matter.back, None);
        assert_eq!(matter.body_start, 0);
    }

    #[test]
    fn test_single_marker_is_front_matter() {
        let matter = extract("title: x\n~~~\n<p>body</p>\n", DEFAULT_MARKER);
        assert_eq!(matter.front, Some("title: x\n"));
        assert_eq!(matter.body, "<p>body</p>\n");
        assert_eq!(matter.back, None);
    }

    #[test]
    fn test_empty_front_matter() {
        let matter = extract("~~~\nbody\n~~~\n", DEFAULT_MARKER);
        assert_eq!(matter.front, Some(""));
        assert_eq!(matter.body, "body\n");
        assert_eq!(matter.back, Some(""));
    }

    #[test]
    fn test_marker_without_line_break_is_text() {
        let matter = extract("a ~~~ b\n~~~", DEFAULT_MARKER);
        assert_eq!(matter.front, None);
        assert_eq!(matter.body, "a ~~~ b\n~~~");
        assert_eq!(matter.back, None);
    }

    #[test]
    fn test_third_marker_stays_in_back_matter() {
        let matter = extract("a\n~~~\nb\n~~~\nc\n~~~\nd", DEFAULT_MARKER);
        assert_eq!(matter.front, Some("a\n"));
        assert_eq!(matter.body, "b\n");
        assert_eq!(matter.back, Some("c\n~~~\nd"));
    }

    #[test]
    fn test_crlf_marker_line() {
        let matter = extract("a\r\n~~~\r\nbody\r\n~~~\r\nz", DEFAULT_MARKER);
        assert_eq!(matter.front, Some("a\r\n"));
        assert_eq!(matter.body, "body\r\n");
        assert_eq!(matter.back, Some("z"));
    }

    #[test]
    fn test_longer_run_of_marker_chars() {
        let matter = extract("a~~~~\nb", DEFAULT_MARKER);
        assert_eq!(matter.front, Some("a~"));
        assert_eq!(matter.body, "b");
    }

    #[test]
    fn test_custom_marker() {
        let matter = extract("meta\n---\nbody", "---");
        assert_eq!(matter.front, Some("meta\n"));
        assert_eq!(matter.body, "body");
    }

    #[test]
    fn test_multibyte_marker() {
        let matter = extract("ab§§x§§\nbody", "§§");
        assert_eq!(matter.front, Some("ab§§x"));
        assert_eq!(matter.body, "body");
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let matter = extract("a\nb\n", "");
        assert_eq!(matter.front, None);
        assert_eq!(matter.body, "a\nb\n");
    }
}
