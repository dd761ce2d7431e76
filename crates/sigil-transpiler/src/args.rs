//! Parenthesized argument balancing.
//!
//! Extracts `( ... )` argument lists that may contain nested parentheses,
//! such as a function call passed as a directive argument.

use crate::error::{TranspileError, line_column};

/// Argument text extracted from a balanced parenthesis group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balanced<'a> {
    /// Text between the outer parentheses.
    pub inner: &'a str,
    /// Byte index just past the matching closing parenthesis.
    pub end: usize,
}

/// Balance the parenthesis group opening at `open`.
///
/// `text[open..]` must start with `(`. Walks successive `(` and `)`
/// characters, tracking depth, until the group closes.
///
/// # Example
///
/// ```
/// use sigil_transpiler::balance;
///
/// let text = "p(link_to(post)) rest";
/// let balanced = balance(text, 1).unwrap();
/// assert_eq!(balanced.inner, "link_to(post)");
/// assert_eq!(&text[balanced.end..], " rest");
/// ```
///
/// # Errors
///
/// Returns [`TranspileError::UnbalancedArgument`] with the position of the
/// opening parenthesis if `text` ends before the group closes.
pub fn balance(text: &str, open: usize) -> Result<Balanced<'_>, TranspileError> {
    let mut depth: isize = 0;
    let mut cursor = open;

    while let Some(found) = text[cursor..].find(['(', ')']) {
        let at = cursor + found;
        depth += if text.as_bytes()[at] == b'(' { 1 } else { -1 };
        cursor = at + 1;

        if depth == 0 {
            return Ok(Balanced {
                inner: &text[open + 1..at],
                end: cursor,
            });
        }
    }

    let (line, column) = line_column(text, open);
    Err(TranspileError::UnbalancedArgument {
        offset: open,
        line,
        column,
    })
}
