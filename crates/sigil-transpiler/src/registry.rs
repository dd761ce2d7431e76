//! Sigil registry.
//!
//! Maps directive names to the text they expand to. A registry is built once
//! (usually from [`SigilRegistry::default`] plus any custom entries) and then
//! shared read-only by every transpile. Mutation takes `&mut self`, so a
//! registry cannot change while a scan borrows it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::TranspileError;
use crate::recognizer::Recognizer;

/// Placeholder token used when a template is written out as a single string.
pub const PLACEHOLDER: &str = "{arg}";

/// Text emitted by the built-in `lorem` sigil.
pub const LOREM: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod \
tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis aute irure dolor in \
reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla pariatur. Excepteur sint \
occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.\n";

/// Expansion template with at most one argument slot.
///
/// The template is stored pre-split around its slot, so literal text that
/// happens to look like a placeholder is never substituted.
///
/// # Example
///
/// ```
/// use sigil_transpiler::Expansion;
///
/// let expansion = Expansion::parse(r#"id="<%= dom_id({arg}) %>""#, "{arg}");
/// assert_eq!(expansion.render(Some("post")), r#"id="<%= dom_id(post) %>""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Expansion {
    prefix: String,
    placeholder: bool,
    suffix: String,
}

impl Expansion {
    /// Create an expansion without an argument slot.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            prefix: text.into(),
            placeholder: false,
            suffix: String::new(),
        }
    }

    /// Create an expansion whose argument lands between `prefix` and `suffix`.
    pub fn with_placeholder(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            placeholder: true,
            suffix: suffix.into(),
        }
    }

    /// Split a template at the first occurrence of `token`.
    ///
    /// A template without `token` (or an empty `token`) becomes a literal.
    #[must_use]
    pub fn parse(template: &str, token: &str) -> Self {
        match template.split_once(token) {
            Some((prefix, suffix)) if !token.is_empty() => Self::with_placeholder(prefix, suffix),
            _ => Self::literal(template),
        }
    }

    /// Check if the template has an argument slot.
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Render the template, substituting `argument` into the slot.
    ///
    /// Without an argument the slot renders empty.
    #[must_use]
    pub fn render(&self, argument: Option<&str>) -> String {
        let argument = if self.placeholder {
            argument.unwrap_or_default()
        } else {
            ""
        };

        let mut out =
            String::with_capacity(self.prefix.len() + argument.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(argument);
        out.push_str(&self.suffix);
        out
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        if self.placeholder {
            f.write_str(PLACEHOLDER)?;
        }
        f.write_str(&self.suffix)
    }
}

/// A registered directive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sigil {
    /// Text the directive expands to.
    pub expansion: Expansion,
    /// Accept a `.dotted.path` argument in place of parentheses.
    pub dotted_path: bool,
}

impl Sigil {
    /// Create a sigil taking parenthesized arguments only.
    #[must_use]
    pub fn new(expansion: Expansion) -> Self {
        Self {
            expansion,
            dotted_path: false,
        }
    }

    /// Also accept `.dotted.path` arguments.
    #[must_use]
    pub fn with_dotted_path(mut self) -> Self {
        self.dotted_path = true;
        self
    }
}

impl From<Expansion> for Sigil {
    fn from(expansion: Expansion) -> Self {
        Self::new(expansion)
    }
}

/// Registry of directive names and their expansions.
///
/// # Example
///
/// ```
/// use sigil_transpiler::{Expansion, SigilRegistry};
///
/// let mut registry = SigilRegistry::default();
/// registry.register("icon", Expansion::with_placeholder("<%= icon(", ") %>"));
///
/// assert!(registry.names().contains("icon"));
/// assert_eq!(registry.resolve("icon", Some(":star")).unwrap(), "<%= icon(:star) %>");
/// ```
#[derive(Debug, Clone)]
pub struct SigilRegistry {
    sigils: BTreeMap<String, Sigil>,
    recognizer: Recognizer,
}

impl Default for SigilRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for (name, sigil) in builtins() {
            registry.register(name, sigil);
        }
        registry
    }
}

impl SigilRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sigils: BTreeMap::new(),
            recognizer: Recognizer::default(),
        }
    }

    /// Register a sigil, replacing any existing entry with the same name.
    ///
    /// Returns the replaced entry. The name recognizer is rebuilt.
    pub fn register(&mut self, name: impl Into<String>, sigil: impl Into<Sigil>) -> Option<Sigil> {
        let previous = self.sigils.insert(name.into(), sigil.into());
        self.recognizer = Recognizer::new(self.sigils.keys());
        previous
    }

    /// Registered directive names.
    #[must_use]
    pub fn names(&self) -> BTreeSet<&str> {
        self.sigils.keys().map(String::as_str).collect()
    }

    /// Look up a sigil by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Sigil> {
        self.sigils.get(name)
    }

    /// Iterate over registered sigils in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sigil)> {
        self.sigils.iter().map(|(name, sigil)| (name.as_str(), sigil))
    }

    /// Resolve a directive to its expanded text.
    ///
    /// # Errors
    ///
    /// Returns [`TranspileError::UnknownSigil`] if `name` is not registered.
    pub fn resolve(&self, name: &str, argument: Option<&str>) -> Result<String, TranspileError> {
        self.sigils
            .get(name)
            .map(|sigil| sigil.expansion.render(argument))
            .ok_or_else(|| TranspileError::UnknownSigil {
                name: name.to_owned(),
            })
    }

    /// Recognizer over the current name set.
    #[must_use]
    pub fn recognizer(&self) -> &Recognizer {
        &self.recognizer
    }

    /// Number of registered sigils.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sigils.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sigils.is_empty()
    }
}

/// Built-in sigils.
fn builtins() -> [(&'static str, Sigil); 8] {
    let expression =
        |prefix: &str, suffix: &str| Sigil::new(Expansion::with_placeholder(prefix, suffix));

    [
        ("p", expression("<%= ", " %>")),
        ("t", expression("<%= t \"", "\" %>").with_dotted_path()),
        ("id", expression("id=\"<%= dom_id(", ") %>\"")),
        ("class", expression("class=\"<%= class_names(", ") %>\"")),
        ("attributes", expression("<%= tag.attributes(", ") %>")),
        ("aria", expression("<%= tag.aria(", ") %>")),
        ("data", expression("<%= tag.data(", ") %>")),
        ("lorem", Sigil::new(Expansion::literal(LOREM))),
    ]
}
