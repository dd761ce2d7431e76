//! Configuration management for sigil.
//!
//! Parses `sigil.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [matter]
//! marker = "~~~"
//!
//! [build]
//! source_dir = "${APP_ROOT:-.}/templates"
//! output_dir = "build"
//! input_extension = "sigil"
//! output_extension = "erb"
//!
//! [sigils.icon]
//! template = "<%= icon({arg}) %>"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `build.source_dir` and `build.output_dir` support `${VAR}` and
//! `${VAR:-default}` expansion.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sigil_transpiler::{DEFAULT_MARKER, Expansion, PLACEHOLDER, Sigil, SigilRegistry, Transpiler};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override template source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override matter marker.
    pub marker: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sigil.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matter block configuration.
    pub matter: MatterConfig,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Custom sigils, registered over the built-ins.
    pub sigils: BTreeMap<String, SigilConfig>,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Matter block configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MatterConfig {
    /// Marker delimiting front and back matter.
    pub marker: String,
}

impl Default for MatterConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_owned(),
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
    input_extension: Option<String>,
    output_extension: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory searched for templates.
    pub source_dir: PathBuf,
    /// Directory receiving transpiled templates.
    pub output_dir: PathBuf,
    /// Extension of source templates, without the dot.
    pub input_extension: String,
    /// Extension given to transpiled templates, without the dot.
    pub output_extension: String,
}

impl BuildConfig {
    /// Output path for a source template.
    ///
    /// Mirrors the path relative to `source_dir` under `output_dir` and swaps
    /// `input_extension` for `output_extension`. Returns `None` for paths
    /// outside `source_dir`.
    #[must_use]
    pub fn output_path(&self, source: &Path) -> Option<PathBuf> {
        let relative = source.strip_prefix(&self.source_dir).ok()?;
        let file_name = relative.file_name()?.to_str()?;
        let stem = file_name
            .strip_suffix(self.input_extension.as_str())
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(file_name);

        Some(
            self.output_dir
                .join(relative)
                .with_file_name(format!("{stem}.{}", self.output_extension)),
        )
    }
}

/// Custom sigil definition.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct SigilConfig {
    /// Expansion template; the first `{arg}` receives the argument.
    pub template: String,
    /// Accept `.dotted.path` arguments.
    #[serde(default)]
    pub dotted_path: bool,
}

impl SigilConfig {
    /// Convert to a registry entry.
    #[must_use]
    pub fn to_sigil(&self) -> Sigil {
        let sigil = Sigil::new(Expansion::parse(&self.template, PLACEHOLDER));
        if self.dotted_path {
            sigil.with_dotted_path()
        } else {
            sigil
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.source_dir`").
        field: String,
        /// Error message (e.g., "${`TEMPLATES`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a file extension to be given without its leading dot.
fn require_extension(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.starts_with('.') {
        return Err(ConfigError::Validation(format!(
            "{field} must not start with '.'"
        )));
    }
    Ok(())
}

/// Check if a name is a valid sigil name.
///
/// Valid names contain only alphanumeric characters, hyphens, and underscores.
fn is_valid_sigil_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sigil.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(marker) = &settings.marker {
            self.matter.marker.clone_from(marker);
        }
    }

    /// Build a registry holding the built-in sigils plus custom ones.
    #[must_use]
    pub fn registry(&self) -> SigilRegistry {
        let mut registry = SigilRegistry::default();
        for (name, sigil) in &self.sigils {
            registry.register(name.as_str(), sigil.to_sigil());
        }
        registry
    }

    /// Build a transpiler from this configuration.
    #[must_use]
    pub fn transpiler(&self) -> Transpiler {
        Transpiler::new(self.registry()).with_marker(self.matter.marker.as_str())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            matter: MatterConfig::default(),
            build: BuildConfigRaw::default(),
            sigils: BTreeMap::new(),
            build_resolved: BuildConfig {
                source_dir: base.join("templates"),
                output_dir: base.join("build"),
                input_extension: "sigil".to_owned(),
                output_extension: "erb".to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_matter()?;
        self.validate_build()?;
        self.validate_sigils()?;
        Ok(())
    }

    fn validate_matter(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.matter.marker, "matter.marker")?;
        if self.matter.marker.contains(['\n', '\r']) {
            return Err(ConfigError::Validation(
                "matter.marker must be a single line".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        require_extension(
            &self.build_resolved.input_extension,
            "build.input_extension",
        )?;
        require_extension(
            &self.build_resolved.output_extension,
            "build.output_extension",
        )?;
        Ok(())
    }

    fn validate_sigils(&self) -> Result<(), ConfigError> {
        for name in self.sigils.keys() {
            if !is_valid_sigil_name(name) {
                return Err(ConfigError::Validation(format!(
                    "sigils.{name}: name must contain only letters, digits, '-' and '_'"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.build.source_dir {
            self.build.source_dir = Some(expand::expand_env(dir, "build.source_dir")?);
        }
        if let Some(ref dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), "templates"),
            output_dir: resolve(self.build.output_dir.as_deref(), "build"),
            input_extension: self
                .build
                .input_extension
                .clone()
                .unwrap_or_else(|| "sigil".to_owned()),
            output_extension: self
                .build
                .output_extension
                .clone()
                .unwrap_or_else(|| "erb".to_owned()),
        };
    }
}
