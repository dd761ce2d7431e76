//! Transpile error types.

/// Error raised while transpiling a document.
///
/// Every variant aborts the current transpile. No partial output is
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranspileError {
    /// A directive name was recognized but has no registry entry.
    #[error("Unknown sigil `{name}`")]
    UnknownSigil {
        /// The directive name that failed to resolve.
        name: String,
    },
    /// A parenthesized argument list was still open at end of input.
    #[error("Unbalanced argument list opened at line {line}, column {column}")]
    UnbalancedArgument {
        /// Byte offset of the opening parenthesis in the source document.
        offset: usize,
        /// Line of the opening parenthesis (1-indexed).
        line: usize,
        /// Column of the opening parenthesis in characters (1-indexed).
        column: usize,
    },
}

/// Convert a byte offset into a 1-indexed (line, column) pair.
pub(crate) fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_first_line() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("abc", 2), (1, 3));
    }

    #[test]
    fn test_line_column_after_newlines() {
        assert_eq!(line_column("a\nbc\nd(", 6), (3, 2));
    }

    #[test]
    fn test_line_column_counts_chars() {
        // "é" is two bytes but one column
        assert_eq!(line_column("é(", 2), (1, 2));
    }

    #[test]
    fn test_unbalanced_message() {
        let err = TranspileError::UnbalancedArgument {
            offset: 7,
            line: 2,
            column: 3,
        };
        assert_eq!(
            err.to_string(),
            "Unbalanced argument list opened at line 2, column 3"
        );
    }

    #[test]
    fn test_unknown_sigil_message() {
        let err = TranspileError::UnknownSigil {
            name: "icon".to_owned(),
        };
        assert_eq!(err.to_string(), "Unknown sigil `icon`");
    }
}
