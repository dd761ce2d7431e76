//! `sigil build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;
use sigil_config::{BuildConfig, CliSettings, Config};
use sigil_transpiler::Transpiler;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Template source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for transpiled templates (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover sigil.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Every template is attempted; failures are reported individually and
    /// summarized in the returned error.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;

        let sources = find_sources(build)?;
        if sources.is_empty() {
            output.warning(&format!(
                "No *.{} templates found in {}",
                build.input_extension,
                build.source_dir.display()
            ));
            return Ok(());
        }

        output.info(&format!(
            "Transpiling {} templates from {}",
            sources.len(),
            build.source_dir.display()
        ));

        let transpiler = config.transpiler();
        let results: Vec<Result<PathBuf, CliError>> = sources
            .par_iter()
            .map(|source| transpile_file(&transpiler, build, source))
            .collect();

        let total = results.len();
        let mut failed = 0;
        for result in results {
            match result {
                Ok(target) => tracing::debug!(path = %target.display(), "Wrote template"),
                Err(err) => {
                    failed += 1;
                    output.error(&err.to_string());
                }
            }
        }

        if failed > 0 {
            return Err(CliError::Build { failed, total });
        }

        output.success(&format!(
            "Transpiled {total} templates into {}",
            build.output_dir.display()
        ));
        Ok(())
    }
}

/// Glob pattern matching every template under the source directory.
fn source_pattern(build: &BuildConfig) -> String {
    let dir = build.source_dir.display().to_string();
    format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&dir),
        glob::Pattern::escape(&build.input_extension)
    )
}

/// Collect template files under the source directory, sorted by path.
fn find_sources(build: &BuildConfig) -> Result<Vec<PathBuf>, CliError> {
    let mut sources: Vec<PathBuf> = glob::glob(&source_pattern(build))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(
                    path = %e.path().display(),
                    error = %e,
                    "Skipping unreadable path"
                );
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    sources.sort();
    Ok(sources)
}

/// Transpile one template and write it to its output path.
fn transpile_file(
    transpiler: &Transpiler,
    build: &BuildConfig,
    source: &Path,
) -> Result<PathBuf, CliError> {
    let target = build.output_path(source).ok_or_else(|| {
        CliError::Validation(format!(
            "{} is outside {}",
            source.display(),
            build.source_dir.display()
        ))
    })?;

    let input = std::fs::read_to_string(source)?;
    let document = transpiler.transpile(&input).map_err(|err| CliError::Transpile {
        path: source.to_path_buf(),
        source: err,
    })?;

    if document.front_matter.is_some() || document.back_matter.is_some() {
        tracing::debug!(path = %source.display(), "Dropped matter blocks");
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, document.body)?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    fn build_config(root: &Path) -> BuildConfig {
        BuildConfig {
            source_dir: root.join("templates"),
            output_dir: root.join("build"),
            input_extension: "sigil".to_owned(),
            output_extension: "erb".to_owned(),
        }
    }

    #[test]
    fn test_source_pattern() {
        let build = build_config(Path::new("/p"));
        assert_eq!(source_pattern(&build), "/p/templates/**/*.sigil");
    }

    #[test]
    fn test_source_pattern_escapes_directory() {
        let build = build_config(Path::new("/p/[draft]"));
        assert_eq!(source_pattern(&build), "/p/[[]draft[]]/templates/**/*.sigil");
    }

    #[test]
    fn test_find_sources() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = build_config(temp_dir.path());
        fs::create_dir_all(build.source_dir.join("posts")).unwrap();
        fs::write(build.source_dir.join("index.html.sigil"), "").unwrap();
        fs::write(build.source_dir.join("posts/show.html.sigil"), "").unwrap();
        fs::write(build.source_dir.join("notes.txt"), "").unwrap();

        let sources = find_sources(&build).unwrap();
        assert_eq!(
            sources,
            vec![
                build.source_dir.join("index.html.sigil"),
                build.source_dir.join("posts/show.html.sigil"),
            ]
        );
    }

    #[test]
    fn test_transpile_file_writes_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = build_config(temp_dir.path());
        let source = build.source_dir.join("posts/show.html.sigil");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(
            &source,
            "title: Post\n~~~\n<h1 \\id(post)>\\= post.title</h1>\n",
        )
        .unwrap();

        let target = transpile_file(&Transpiler::default(), &build, &source).unwrap();
        assert_eq!(target, build.output_dir.join("posts/show.html.erb"));
        assert_eq!(
            fs::read_to_string(target).unwrap(),
            "<h1 id=\"<%= dom_id(post) %>\"><%= post.title %></h1>\n"
        );
    }

    #[test]
    fn test_transpile_file_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = build_config(temp_dir.path());
        fs::create_dir_all(&build.source_dir).unwrap();
        let source = build.source_dir.join("broken.sigil");
        fs::write(&source, "\\p(oops").unwrap();

        let err = transpile_file(&Transpiler::default(), &build, &source).unwrap_err();
        assert!(matches!(err, CliError::Transpile { .. }));
        assert!(err.to_string().contains("broken.sigil"));
        assert!(!build.output_dir.join("broken.erb").exists());
    }

    #[test]
    fn test_execute_attempts_every_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("sigil.toml");
        fs::write(
            &config_path,
            "[build]\nsource_dir = \"templates\"\noutput_dir = \"build\"\n",
        )
        .unwrap();
        let build = build_config(temp_dir.path());
        fs::create_dir_all(&build.source_dir).unwrap();
        fs::write(build.source_dir.join("a_broken.sigil"), "\\p(oops").unwrap();
        fs::write(build.source_dir.join("b_ok.sigil"), "\\= 1").unwrap();

        let args = BuildArgs {
            source_dir: None,
            output_dir: None,
            config: Some(config_path),
        };
        let err = args.execute().unwrap_err();
        assert!(matches!(err, CliError::Build { failed: 1, total: 2 }));
        assert_eq!(
            fs::read_to_string(build.output_dir.join("b_ok.erb")).unwrap(),
            "<%= 1 %>"
        );
    }

    #[test]
    fn test_transpile_file_outside_source_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let build = build_config(temp_dir.path());
        let err = transpile_file(
            &Transpiler::default(),
            &build,
            Path::new("/elsewhere/x.sigil"),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
    }
}
