//! Directive name recognition.
//!
//! Matches registered directive names at the scanner cursor. Candidates are
//! tried longest-first so that a longer name always wins over a shorter
//! name it starts with, and a match only counts when it ends on a word
//! boundary.

/// Ordered matcher over a fixed set of directive names.
///
/// Built from a registry's name set and rebuilt whenever that set changes.
///
/// # Example
///
/// ```
/// use sigil_transpiler::Recognizer;
///
/// let recognizer = Recognizer::new(["p", "post"]);
/// assert_eq!(recognizer.match_at("post(1)"), Some("post"));
/// assert_eq!(recognizer.match_at("p(1)"), Some("p"));
/// assert_eq!(recognizer.match_at("pending"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recognizer {
    names: Vec<String>,
}

impl Recognizer {
    /// Create a recognizer for the given names.
    ///
    /// Empty names are ignored; duplicates collapse.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();
        Self { names }
    }

    /// Match a directive name at the start of `text`.
    ///
    /// Returns the matched prefix of `text`, or `None` when no name matches
    /// at a word boundary. Matching is exact and case-sensitive.
    #[must_use]
    pub fn match_at<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.names
            .iter()
            .find(|name| text.starts_with(name.as_str()) && is_word_boundary(text, name.len()))
            .map(|name| &text[..name.len()])
    }

    /// Names in match order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of recognizable names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if no names are recognizable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Word characters as understood by `\w`.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check for a word boundary at byte index `at`.
///
/// Start and end of text count as non-word.
fn is_word_boundary(text: &str, at: usize) -> bool {
    let before = text[..at].chars().next_back().is_some_and(is_word_char);
    let after = text[at..].chars().next().is_some_and(is_word_char);
    before != after
}
