//! `sigil transpile` command implementation.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use sigil_config::{CliSettings, Config};
use sigil_transpiler::Transpiled;

use crate::error::CliError;

/// Arguments for the transpile command.
#[derive(Args)]
pub(crate) struct TranspileArgs {
    /// Template to transpile ("-" reads standard input).
    input: PathBuf,

    /// Write the result to a file instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit JSON with the body and the front/back matter blocks.
    #[arg(long)]
    json: bool,

    /// Matter marker (overrides config).
    #[arg(long)]
    marker: Option<String>,

    /// Path to configuration file (default: auto-discover sigil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl TranspileArgs {
    /// Execute the transpile command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read or
    /// the template does not transpile.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            marker: self.marker,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = read_input(&self.input)?;
        let transpiled = config
            .transpiler()
            .transpile(&source)
            .map_err(|source| CliError::Transpile {
                path: self.input.clone(),
                source,
            })?;

        let rendered = render(transpiled, self.json)?;
        match &self.output {
            Some(path) => std::fs::write(path, rendered)?,
            None => io::stdout().lock().write_all(rendered.as_bytes())?,
        }

        Ok(())
    }
}

/// Read the template from a file, or from stdin for `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin().lock().read_to_string(&mut source)?;
        Ok(source)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Render the transpiled document as plain body text or JSON.
fn render(transpiled: Transpiled, json: bool) -> Result<String, CliError> {
    if !json {
        return Ok(transpiled.body);
    }

    let mut rendered = serde_json::to_string_pretty(&transpiled)?;
    rendered.push('\n');
    Ok(rendered)
}
