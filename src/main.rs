use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use lessonbook::{
    application::{
        assemble::{assemble, assemble_page},
        error::AppError,
        registry::ItemRegistry,
        render::render_service,
        runner::ExampleRunner,
    },
    config::{self, CliArgs, Command},
    demos,
    infra::{content::ContentSource, error::InfraError, output::SiteWriter, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

/// Exit status for an unknown demonstration name.
const EXIT_UNKNOWN_DEMO: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            report_application_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, error_code = error.code(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, error_code = error.code(), "application error");
    });
}

async fn run(cli: CliArgs) -> Result<ExitCode, AppError> {
    match &cli.command {
        Command::Demo(args) => Ok(run_demo(&args.name)),
        Command::Build(_) => {
            let settings = prepare(&cli)?;
            run_build(&settings).await
        }
        Command::List(_) => {
            let settings = prepare(&cli)?;
            run_list(&settings)
        }
        Command::Show(args) => {
            let settings = prepare(&cli)?;
            run_show(&settings, args.id).await
        }
    }
}

/// Load settings and install telemetry for commands that produce logs.
fn prepare(cli: &CliArgs) -> Result<config::Settings, AppError> {
    let settings = config::load(cli)?;
    telemetry::init(&settings.logging)?;
    Ok(settings)
}

/// Demonstrations print to stdout only, so the runner captures exactly their output.
fn run_demo(name: &str) -> ExitCode {
    let Some(demo) = demos::find(name) else {
        let available: Vec<_> = demos::catalog().iter().map(|demo| demo.name).collect();
        eprintln!(
            "unknown demo `{name}`; available: {}",
            available.join(", ")
        );
        return ExitCode::from(EXIT_UNKNOWN_DEMO);
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match demo.run(&mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo `{name}` failed: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_build(settings: &config::Settings) -> Result<ExitCode, AppError> {
    let source = content_source(settings);
    let runner = example_runner(settings)?;

    info!(
        target = "lessonbook::build",
        op = "build::start",
        source = %source,
        output_dir = %settings.output.directory.display(),
        run_examples = runner.is_some(),
        "Starting build"
    );

    let registry = ItemRegistry::load(&source)?;
    let writer = SiteWriter::create(&settings.output.directory).await?;
    let renderer = render_service();

    let report = assemble(&registry, renderer.as_ref(), runner.as_ref(), &writer).await?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{report}").map_err(InfraError::from)?;

    if report.has_render_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_list(settings: &config::Settings) -> Result<ExitCode, AppError> {
    let registry = ItemRegistry::load(&content_source(settings))?;

    let mut stdout = io::stdout().lock();
    for item in registry.items() {
        writeln!(stdout, "{}\t{}", item.id(), item.title()).map_err(InfraError::from)?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_show(settings: &config::Settings, id: u32) -> Result<ExitCode, AppError> {
    let registry = ItemRegistry::load(&content_source(settings))?;
    let runner = example_runner(settings)?;
    let renderer = render_service();

    let html = assemble_page(&registry, renderer.as_ref(), runner.as_ref(), id).await?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(html.as_bytes())
        .map_err(InfraError::from)?;
    Ok(ExitCode::SUCCESS)
}

fn content_source(settings: &config::Settings) -> ContentSource {
    settings
        .content
        .source
        .clone()
        .map_or(ContentSource::Embedded, ContentSource::from_path)
}

fn example_runner(settings: &config::Settings) -> Result<Option<ExampleRunner>, AppError> {
    let runner = &settings.runner;
    if !runner.enabled {
        return Ok(None);
    }

    let program = match runner.program.clone() {
        Some(program) => program,
        None => std::env::current_exe().map_err(|err| {
            InfraError::configuration(format!("cannot locate the running executable: {err}"))
        })?,
    };

    Ok(Some(
        ExampleRunner::new(program, runner.timeout)
            .with_concurrency(runner.concurrency.get() as usize),
    ))
}
