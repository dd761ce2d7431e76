//! Output emitter.
//!
//! Accumulates transpiled text. Appending is the only operation; nothing is
//! rewritten once emitted.

/// A span of output produced by a single scanner transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Emit<'a> {
    /// Source text copied through unchanged.
    Literal(&'a str),
    /// Output expression, written as `<%=text %>`.
    Expression(&'a str),
    /// Statement, written as `<% text %>`.
    Statement(&'a str),
    /// Expanded sigil text.
    Expansion(String),
}

impl Emit<'_> {
    fn write_to(&self, buffer: &mut String) {
        match self {
            Self::Literal(text) => buffer.push_str(text),
            Self::Expression(code) => {
                buffer.push_str("<%=");
                buffer.push_str(code);
                buffer.push_str(" %>");
            }
            Self::Statement(code) => {
                buffer.push_str("<% ");
                buffer.push_str(code);
                buffer.push_str(" %>");
            }
            Self::Expansion(text) => buffer.push_str(text),
        }
    }
}

/// Append-only buffer for transpiled output.
///
/// # Example
///
/// ```
/// use sigil_transpiler::{Emit, Emitter};
///
/// let mut emitter = Emitter::new();
/// emitter.push(&Emit::Literal("<h1>"));
/// emitter.push(&Emit::Expression(" title"));
/// emitter.push(&Emit::Literal("</h1>"));
///
/// assert_eq!(emitter.directives(), 1);
/// assert_eq!(emitter.finish(), "<h1><%= title %></h1>");
/// ```
#[derive(Debug, Default)]
pub struct Emitter {
    buffer: String,
    directives: usize,
}

impl Emitter {
    /// Create an empty emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
            directives: 0,
        }
    }

    /// Append a span.
    pub fn push(&mut self, emit: &Emit<'_>) {
        if !matches!(emit, Emit::Literal(_)) {
            self.directives += 1;
        }
        emit.write_to(&mut self.buffer);
    }

    /// Text emitted so far.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Number of non-literal spans emitted.
    #[must_use]
    pub fn directives(&self) -> usize {
        self.directives
    }

    /// Length of the emitted text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume the emitter, returning the emitted text.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }
}
