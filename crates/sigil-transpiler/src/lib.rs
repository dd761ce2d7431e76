//! Backslash directive transpiler.
//!
//! Rewrites terse backslash directives embedded in HTML-like text into an
//! embedded-expression template (`<% … %>` / `<%= … %>`) for a conventional
//! template compiler. The crate only produces text: it never evaluates the
//! expressions it emits, and the helpers named by built-in sigils
//! (`t`, `dom_id`, `class_names`, `tag.*`) are resolved by whoever compiles
//! the output.
//!
//! # Pipeline
//!
//! 1. [`extract_matter`] strips optional front and back matter blocks.
//! 2. [`Scanner`] walks the body, copying literal text and handing each
//!    backslash directive to the matching rule.
//! 3. Sigils are resolved against a [`SigilRegistry`]; parenthesized
//!    arguments are extracted by [`balance`].
//! 4. [`Emitter`] accumulates the rewritten text.
//!
//! # Example
//!
//! ```
//! use sigil_transpiler::{SigilRegistry, Transpiler};
//!
//! let transpiler = Transpiler::new(SigilRegistry::default());
//! let result = transpiler
//!     .transpile("title: Hi\n~~~\n<h1 \\id(post)>\\t.heading</h1>\n")
//!     .unwrap();
//!
//! assert_eq!(result.front_matter.as_deref(), Some("title: Hi\n"));
//! assert_eq!(
//!     result.body,
//!     "<h1 id=\"<%= dom_id(post) %>\"><%= t \".heading\" %></h1>\n"
//! );
//! ```
//!
//! # Concurrency
//!
//! A [`Transpiler`] is `Send + Sync` and holds no per-call state, so one
//! instance can serve any number of threads by shared reference. Adding
//! sigils requires `&mut`, which rules out changing the registry while a
//! transpile is running.

mod args;
mod error;
mod matter;
mod output;
mod recognizer;
mod registry;
mod scanner;

use std::sync::LazyLock;

pub use args::{Balanced, balance};
pub use error::TranspileError;
pub use matter::{DEFAULT_MARKER, Matter, extract as extract_matter};
pub use output::{Emit, Emitter};
pub use recognizer::Recognizer;
pub use registry::{Expansion, LOREM, PLACEHOLDER, Sigil, SigilRegistry};
pub use scanner::{ESCAPE, Mode, Scanner, Transition};

/// Transpiled document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Transpiled {
    /// Rewritten body.
    pub body: String,
    /// Text before the first marker line, if present.
    pub front_matter: Option<String>,
    /// Text after the second marker line, if present.
    pub back_matter: Option<String>,
}

/// Directive transpiler bound to a registry and matter marker.
#[derive(Debug, Clone)]
pub struct Transpiler {
    registry: SigilRegistry,
    marker: String,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new(SigilRegistry::default())
    }
}

impl Transpiler {
    /// Create a transpiler using the default matter marker.
    #[must_use]
    pub fn new(registry: SigilRegistry) -> Self {
        Self {
            registry,
            marker: DEFAULT_MARKER.to_owned(),
        }
    }

    /// Set the matter marker.
    #[must_use]
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Registry used to resolve sigils.
    #[must_use]
    pub fn registry(&self) -> &SigilRegistry {
        &self.registry
    }

    /// Mutable access to the registry, for registering sigils before use.
    pub fn registry_mut(&mut self) -> &mut SigilRegistry {
        &mut self.registry
    }

    /// Matter marker.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Transpile a document.
    ///
    /// Matter blocks are returned separately and never appear in the body.
    ///
    /// # Errors
    ///
    /// Returns [`TranspileError`] if a sigil argument list is unbalanced or a
    /// recognized sigil cannot be resolved.
    pub fn transpile(&self, input: &str) -> Result<Transpiled, TranspileError> {
        let matter = extract_matter(input, &self.marker);
        let mut emitter = Emitter::with_capacity(matter.body.len());
        Scanner::for_body(&self.registry, input, &matter).run(&mut emitter)?;

        tracing::debug!(
            input_len = input.len(),
            output_len = emitter.len(),
            directives = emitter.directives(),
            front_matter = matter.front.is_some(),
            back_matter = matter.back.is_some(),
            "Transpiled document"
        );

        Ok(Transpiled {
            body: emitter.finish(),
            front_matter: matter.front.map(str::to_owned),
            back_matter: matter.back.map(str::to_owned),
        })
    }
}

/// Shared transpiler with the built-in sigils.
static DEFAULT_TRANSPILER: LazyLock<Transpiler> = LazyLock::new(Transpiler::default);

/// Transpile a document with the built-in sigils and default marker.
///
/// # Example
///
/// ```
/// let result = sigil_transpiler::transpile(r"\p(a) \p(b)").unwrap();
/// assert_eq!(result.body, "<%= a %> <%= b %>");
/// ```
///
/// # Errors
///
/// See [`Transpiler::transpile`].
pub fn transpile(input: &str) -> Result<Transpiled, TranspileError> {
    DEFAULT_TRANSPILER.transpile(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(Transpiler: Send, Sync);
    static_assertions::assert_impl_all!(SigilRegistry: Send, Sync);

    #[test]
    fn test_plain_text_unchanged() {
        let input = "<p>No directives here.</p>\n";
        let result = transpile(input).unwrap();
        assert_eq!(result.body, input);
        assert_eq!(result.front_matter, None);
        assert_eq!(result.back_matter, None);
    }

    #[test]
    fn test_scenarios() {
        assert_eq!(transpile(r"\p(1+1)").unwrap().body, "<%= 1+1 %>");
        assert_eq!(
            transpile(r"\t.greeting").unwrap().body,
            r#"<%= t ".greeting" %>"#
        );
        assert_eq!(
            transpile(r"\id(post)").unwrap().body,
            r#"id="<%= dom_id(post) %>""#
        );
        assert_eq!(
            transpile(r"\p(a) \p(b)").unwrap().body,
            "<%= a %> <%= b %>"
        );
    }

    #[test]
    fn test_template_with_loop() {
        let input = "\\titles.each do |title|\n  <h1>\\= title</h1>\n\\end\n";
        assert_eq!(
            transpile(input).unwrap().body,
            "<% titles.each do |title| %>\n  <h1><%= title %></h1>\n<% end %>\n"
        );
    }

    #[test]
    fn test_attribute_sigils() {
        let input = concat!(
            "<span>\\p(post.title)</span>\n",
            "\\id(post)\n",
            "\\class(active: true)\n",
            "\\aria(describedby: dom_id(post))\n",
            "\\data(controller: \"list\", action: \"order\")\n",
        );
        assert_eq!(
            transpile(input).unwrap().body,
            concat!(
                "<span><%= post.title %></span>\n",
                "id=\"<%= dom_id(post) %>\"\n",
                "class=\"<%= class_names(active: true) %>\"\n",
                "<%= tag.aria(describedby: dom_id(post)) %>\n",
                "<%= tag.data(controller: \"list\", action: \"order\") %>\n",
            )
        );
    }

    #[test]
    fn test_matter_is_not_emitted() {
        let result = transpile("header\n~~~\nbody~~~\nfooter\n").unwrap();
        assert_eq!(result.front_matter.as_deref(), Some("header\n"));
        assert_eq!(result.body, "body");
        assert_eq!(result.back_matter.as_deref(), Some("footer\n"));
    }

    #[test]
    fn test_matter_around_directives() {
        let input = "title: x\n~~~\n\n<h1>\\= @title</h1>\n\n~~~\nnotes\n";
        let result = transpile(input).unwrap();
        assert_eq!(result.body, "\n<h1><%= @title %></h1>\n\n");
        assert_eq!(result.back_matter.as_deref(), Some("notes\n"));
    }

    #[test]
    fn test_error_position_counts_front_matter() {
        let err = transpile("a\n~~~\n\\p(open").unwrap_err();
        assert_eq!(
            err,
            TranspileError::UnbalancedArgument {
                offset: 8,
                line: 3,
                column: 3,
            }
        );
    }

    #[test]
    fn test_directive_cannot_read_into_back_matter() {
        let err = transpile("fm\n~~~\n\\p(a\n~~~\n)").unwrap_err();
        assert_eq!(
            err,
            TranspileError::UnbalancedArgument {
                offset: 9,
                line: 3,
                column: 3,
            }
        );
    }

    #[test]
    fn test_custom_marker() {
        let transpiler = Transpiler::default().with_marker("---");
        let result = transpiler.transpile("a: 1\n---\n\\p(x)").unwrap();
        assert_eq!(transpiler.marker(), "---");
        assert_eq!(result.front_matter.as_deref(), Some("a: 1\n"));
        assert_eq!(result.body, "<%= x %>");
    }

    #[test]
    fn test_custom_sigil() {
        let mut transpiler = Transpiler::default();
        transpiler.registry_mut().register(
            "icon",
            Expansion::with_placeholder("<%= icon(", ") %>"),
        );
        assert_eq!(
            transpiler.transpile(r"\icon(:star)").unwrap().body,
            "<%= icon(:star) %>"
        );
    }

    #[test]
    fn test_custom_dotted_sigil() {
        let mut transpiler = Transpiler::new(SigilRegistry::new());
        transpiler.registry_mut().register(
            "tt",
            Sigil::new(Expansion::with_placeholder("<%= tt \"", "\" %>")).with_dotted_path(),
        );
        assert_eq!(
            transpiler.transpile(r"\tt.a.b").unwrap().body,
            r#"<%= tt ".a.b" %>"#
        );
    }

    #[test]
    fn test_empty_registry_treats_names_as_statements() {
        let transpiler = Transpiler::new(SigilRegistry::new());
        assert_eq!(transpiler.transpile(r"\p(x)").unwrap().body, "<% p(x) %>");
    }

    #[test]
    fn test_shared_across_threads() {
        let transpiler = Transpiler::default();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let transpiler = &transpiler;
                    scope.spawn(move || transpiler.transpile(&format!(r"\p({i})")).unwrap().body)
                })
                .collect();
            for (i, handle) in handles.into_iter().enumerate() {
                assert_eq!(handle.join().unwrap(), format!("<%= {i} %>"));
            }
        });
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_transpiled() {
        let result = transpile("m\n~~~\n\\p(x)").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "body": "<%= x %>",
                "front_matter": "m\n",
                "back_matter": null,
            })
        );
    }
}
