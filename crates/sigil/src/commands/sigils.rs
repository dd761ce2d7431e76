//! `sigil sigils` command implementation.

use std::path::PathBuf;

use clap::Args;
use sigil_config::Config;
use sigil_transpiler::Sigil;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sigils command.
#[derive(Args)]
pub(crate) struct SigilsArgs {
    /// Path to configuration file (default: auto-discover sigil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SigilsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let registry = config.registry();

        for (name, sigil) in registry.iter() {
            output.entry(name, &describe(sigil));
        }

        Ok(())
    }
}

/// One-line description of a sigil's expansion.
fn describe(sigil: &Sigil) -> String {
    let mut text = sigil.expansion.to_string().trim_end().replace('\n', "\\n");
    if sigil.dotted_path {
        text.push_str("  (accepts .dotted.path)");
    }
    text
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sigil_transpiler::SigilRegistry;

    use super::*;

    #[test]
    fn test_describe_placeholder() {
        let registry = SigilRegistry::default();
        assert_eq!(
            describe(registry.get("id").unwrap()),
            r#"id="<%= dom_id({arg}) %>""#
        );
    }

    #[test]
    fn test_describe_dotted_path() {
        let registry = SigilRegistry::default();
        assert_eq!(
            describe(registry.get("t").unwrap()),
            r#"<%= t "{arg}" %>  (accepts .dotted.path)"#
        );
    }

    #[test]
    fn test_describe_single_line() {
        let registry = SigilRegistry::default();
        let text = describe(registry.get("lorem").unwrap());
        assert!(text.starts_with("Lorem ipsum"));
        assert!(!text.contains('\n'));
    }
}
