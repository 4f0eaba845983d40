use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the lessonbook binary.
#[derive(Debug, Parser)]
#[command(
    name = "lessonbook",
    version,
    about = "Build a browsable site from object-creation lessons and their runnable examples"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "LESSONBOOK_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render every item, run its examples and write the site.
    Build(BuildArgs),
    /// Print the id and title of every item.
    List(ListArgs),
    /// Print the assembled HTML page of one item.
    #[command(allow_missing_positional = true)]
    Show(ShowArgs),
    /// Run a built-in demonstration program.
    Demo(DemoArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RunOverrides {
    /// Skip executing runnable samples.
    #[arg(long = "no-run", action = clap::ArgAction::SetTrue)]
    pub no_run: bool,

    /// Override the per-example time limit in milliseconds.
    #[arg(long = "run-timeout-ms", value_name = "MS")]
    pub run_timeout_ms: Option<u64>,

    /// Override how many examples may run at the same time.
    #[arg(long = "run-concurrency", value_name = "COUNT")]
    pub run_concurrency: Option<u32>,

    /// Override the executable used for `demo` run targets.
    #[arg(long = "run-program", value_name = "PATH", value_hint = ValueHint::ExecutablePath)]
    pub run_program: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct BuildArgs {
    /// Content manifest or a directory containing `items.toml`.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub source: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long = "output-dir", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub run: RunOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ListArgs {
    /// Content manifest or a directory containing `items.toml`.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub source: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Content manifest or a directory containing `items.toml`.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub source: Option<PathBuf>,

    /// Id of the item to show.
    #[arg(value_name = "ID")]
    pub id: u32,

    #[command(flatten)]
    pub run: RunOverrides,

    #[command(flatten)]
    pub logging: LoggingOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Demonstration name, for example `builder`.
    #[arg(value_name = "NAME")]
    pub name: String,
}
