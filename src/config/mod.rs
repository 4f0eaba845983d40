//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub use cli::{
    BuildArgs, CliArgs, Command, DemoArgs, ListArgs, LoggingOverrides, RunOverrides, ShowArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "lessonbook";
const DEFAULT_OUTPUT_DIR: &str = "site";
const DEFAULT_RUN_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_RUN_CONCURRENCY: u32 = 4;

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub content: ContentSettings,
    pub output: OutputSettings,
    pub runner: RunnerSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    /// Manifest or content directory; `None` selects the embedded content.
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub directory: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub enabled: bool,
    pub timeout: Duration,
    pub concurrency: NonZeroU32,
    /// Executable for demo targets; `None` means the running binary.
    pub program: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl SettingsError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("LESSONBOOK").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_command_overrides(&cli.command);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    content: RawContentSettings,
    output: RawOutputSettings,
    runner: RawRunnerSettings,
}

impl RawSettings {
    fn apply_command_overrides(&mut self, command: &Command) {
        match command {
            Command::Build(args) => {
                self.apply_source_override(args.source.as_ref());
                if let Some(dir) = args.output_dir.as_ref() {
                    self.output.directory = Some(dir.clone());
                }
                self.apply_run_overrides(&args.run);
                self.apply_logging_overrides(&args.logging);
            }
            Command::List(args) => {
                self.apply_source_override(args.source.as_ref());
                self.apply_logging_overrides(&args.logging);
            }
            Command::Show(args) => {
                self.apply_source_override(args.source.as_ref());
                self.apply_run_overrides(&args.run);
                self.apply_logging_overrides(&args.logging);
            }
            Command::Demo(_) => {}
        }
    }

    fn apply_source_override(&mut self, source: Option<&PathBuf>) {
        if let Some(source) = source {
            self.content.source = Some(source.clone());
        }
    }

    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_run_overrides(&mut self, overrides: &RunOverrides) {
        if overrides.no_run {
            self.runner.enabled = Some(false);
        }
        if let Some(timeout) = overrides.run_timeout_ms {
            self.runner.timeout_ms = Some(timeout);
        }
        if let Some(concurrency) = overrides.run_concurrency {
            self.runner.concurrency = Some(concurrency);
        }
        if let Some(program) = overrides.run_program.as_ref() {
            self.runner.program = Some(program.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, SettingsError> {
        let RawSettings {
            logging,
            content,
            output,
            runner,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            content: build_content_settings(content)?,
            output: build_output_settings(output)?,
            runner: build_runner_settings(runner)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, SettingsError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            SettingsError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, SettingsError> {
    if content
        .source
        .as_ref()
        .is_some_and(|source| source.as_os_str().is_empty())
    {
        return Err(SettingsError::invalid(
            "content.source",
            "path must not be empty",
        ));
    }

    Ok(ContentSettings {
        source: content.source,
    })
}

fn build_output_settings(output: RawOutputSettings) -> Result<OutputSettings, SettingsError> {
    let directory = output
        .directory
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    if directory.as_os_str().is_empty() {
        return Err(SettingsError::invalid(
            "output.directory",
            "path must not be empty",
        ));
    }

    Ok(OutputSettings { directory })
}

fn build_runner_settings(runner: RawRunnerSettings) -> Result<RunnerSettings, SettingsError> {
    let timeout_ms = runner.timeout_ms.unwrap_or(DEFAULT_RUN_TIMEOUT_MS);
    if timeout_ms == 0 {
        return Err(SettingsError::invalid(
            "runner.timeout_ms",
            "must be greater than zero",
        ));
    }

    let concurrency = NonZeroU32::new(runner.concurrency.unwrap_or(DEFAULT_RUN_CONCURRENCY))
        .ok_or_else(|| SettingsError::invalid("runner.concurrency", "must be greater than zero"))?;

    if runner
        .program
        .as_ref()
        .is_some_and(|program| program.as_os_str().is_empty())
    {
        return Err(SettingsError::invalid(
            "runner.program",
            "path must not be empty",
        ));
    }

    Ok(RunnerSettings {
        enabled: runner.enabled.unwrap_or(true),
        timeout: Duration::from_millis(timeout_ms),
        concurrency,
        program: runner.program,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOutputSettings {
    directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRunnerSettings {
    enabled: Option<bool>,
    timeout_ms: Option<u64>,
    concurrency: Option<u32>,
    program: Option<PathBuf>,
}
