//! Directive scanner.
//!
//! A two-mode state machine over the document body. In [`Mode::Literal`] it
//! copies text up to the next backslash; in [`Mode::Directive`] it decides
//! what the backslash introduces:
//!
//! | After `\`          | Output                              |
//! |--------------------|-------------------------------------|
//! | `#` comment        | nothing, through end of line        |
//! | `=expr`            | `<%=expr %>`, up to `</` or newline |
//! | registered sigil   | the sigil's expansion               |
//! | anything else      | `<% code %>`, up to newline         |
//!
//! Each step is a pure [`Scanner::transition`] returning the next mode, the
//! number of bytes consumed and the span to emit.

use std::sync::LazyLock;

use regex::Regex;

use crate::args::balance;
use crate::error::TranspileError;
use crate::matter::Matter;
use crate::output::{Emit, Emitter};
use crate::registry::SigilRegistry;

/// Character introducing a directive.
pub const ESCAPE: char = '\\';

/// Relative key shorthand for sigils accepting dotted paths: `.a.b`.
static DOTTED_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.[.\w]+").expect("valid dotted path pattern"));

/// Scanner mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copying text, watching for the escape character.
    Literal,
    /// Just consumed an escape character.
    Directive,
}

/// Result of one scanner step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<'a> {
    /// Mode after the step.
    pub next: Mode,
    /// Bytes consumed by the step.
    pub consumed: usize,
    /// Span to append to the output, if any.
    pub emit: Option<Emit<'a>>,
}

impl<'a> Transition<'a> {
    fn literal(consumed: usize, emit: Option<Emit<'a>>) -> Self {
        Self {
            next: Mode::Literal,
            consumed,
            emit,
        }
    }
}

/// Scanner over one document body.
///
/// Positions are byte offsets into the whole source document, so errors
/// point at the right place even when front matter precedes the body.
///
/// # Example
///
/// ```
/// use sigil_transpiler::{Emitter, Scanner, SigilRegistry};
///
/// let registry = SigilRegistry::default();
/// let mut emitter = Emitter::new();
/// Scanner::new(&registry, r"<b>\p(1+1)</b>", 0)
///     .run(&mut emitter)
///     .unwrap();
///
/// assert_eq!(emitter.finish(), "<b><%= 1+1 %></b>");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    registry: &'a SigilRegistry,
    /// Source text, ending where the body ends.
    text: &'a str,
    start: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner over `text[start..]`.
    #[must_use]
    pub fn new(registry: &'a SigilRegistry, text: &'a str, start: usize) -> Self {
        Self {
            registry,
            text,
            start,
        }
    }

    /// Create a scanner over the body of an extracted document.
    #[must_use]
    pub fn for_body(registry: &'a SigilRegistry, input: &'a str, matter: &Matter<'_>) -> Self {
        Self::new(registry, &input[..matter.body_end()], matter.body_start)
    }

    /// Scan the whole body, appending to `emitter`.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`transition`](Self::transition).
    pub fn run(&self, emitter: &mut Emitter) -> Result<(), TranspileError> {
        let mut mode = Mode::Literal;
        let mut pos = self.start;

        while mode == Mode::Directive || pos < self.text.len() {
            let transition = self.transition(mode, pos)?;
            pos += transition.consumed;
            mode = transition.next;
            if let Some(emit) = &transition.emit {
                emitter.push(emit);
            }
        }

        Ok(())
    }

    /// Perform a single step from `mode` at byte offset `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`TranspileError::UnbalancedArgument`] for an unclosed sigil
    /// argument list and [`TranspileError::UnknownSigil`] if the recognizer
    /// and registry disagree.
    pub fn transition(&self, mode: Mode, pos: usize) -> Result<Transition<'a>, TranspileError> {
        let rest = &self.text[pos..];
        match mode {
            Mode::Literal => Ok(Self::literal(rest)),
            Mode::Directive => self.directive(rest, pos),
        }
    }

    fn literal(rest: &'a str) -> Transition<'a> {
        match rest.find(ESCAPE) {
            Some(at) => Transition {
                next: Mode::Directive,
                consumed: at + ESCAPE.len_utf8(),
                emit: (at > 0).then(|| Emit::Literal(&rest[..at])),
            },
            None => Transition::literal(
                rest.len(),
                (!rest.is_empty()).then_some(Emit::Literal(rest)),
            ),
        }
    }

    fn directive(&self, rest: &'a str, pos: usize) -> Result<Transition<'a>, TranspileError> {
        if rest.is_empty() {
            tracing::trace!(offset = pos, "Ignoring escape at end of input");
            return Ok(Transition::literal(0, None));
        }

        if let Some(comment) = rest.strip_prefix('#') {
            let consumed = comment.find('\n').map_or(rest.len(), |i| i + 2);
            return Ok(Transition::literal(consumed, None));
        }

        if let Some(code) = rest.strip_prefix('=') {
            let len = expression_end(code);
            return Ok(Transition::literal(len + 1, Some(Emit::Expression(&code[..len]))));
        }

        if let Some(name) = self.registry.recognizer().match_at(rest) {
            return self.sigil(name, pos);
        }

        let len = line_end(rest);
        Ok(Transition::literal(
            len,
            (len > 0).then(|| Emit::Statement(&rest[..len])),
        ))
    }

    fn sigil(&self, name: &str, pos: usize) -> Result<Transition<'a>, TranspileError> {
        let after = pos + name.len();
        let tail = &self.text[after..];
        let dotted_path = self.registry.get(name).is_some_and(|sigil| sigil.dotted_path);

        let (argument, end) = if dotted_path && let Some(path) = DOTTED_PATH_RE.find(tail) {
            (Some(path.as_str()), after + path.end())
        } else if tail.starts_with('(') {
            let balanced = balance(self.text, after)?;
            (Some(balanced.inner), balanced.end)
        } else {
            (None, after)
        };

        let expansion = self.registry.resolve(name, argument)?;
        Ok(Transition::literal(end - pos, Some(Emit::Expansion(expansion))))
    }
}

/// Length of `text` up to the line break (`\n` or `\r\n`) or end of text.
fn line_end(text: &str) -> usize {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => i - 1,
        Some(i) => i,
        None => text.len(),
    }
}

/// Length of an output expression: up to a closing tag, line break or end.
fn expression_end(text: &str) -> usize {
    let line = line_end(text);
    text[..line].find("</").unwrap_or(line)
}
