use std::process;

use argtree::cli::{build_cli, execute, output, render, CliError};
use argtree::config::Settings;
use argtree::exitcode;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    setup_logging();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            process::exit(exitcode::CONFIG);
        }
    };
    settings.color.apply();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&argv, &settings) {
        report(&e, &settings);
        process::exit(e.exit_code());
    }
}

fn run(argv: &[String], settings: &Settings) -> Result<(), CliError> {
    let tree = build_cli(settings.clone())?;
    execute(&tree, argv, settings)
}

fn report(e: &CliError, settings: &Settings) {
    match e {
        CliError::Run(run) => match run.diagnostic() {
            Some(diagnostic) => output::diagnostic(&render::render_diagnostic(diagnostic, settings)),
            None => output::error(run),
        },
        other => output::error(other),
    }
}

/// Log level comes from `ARGTREE_LOG` (EnvFilter syntax), default `warn`.
fn setup_logging() {
    let filter = EnvFilter::try_from_env("ARGTREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!("logging initialized");
}
