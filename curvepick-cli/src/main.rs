use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use curvepick_cli::{Args, Settings, report, run};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> anyhow::Result<()> {
    let settings = Settings::from_args(args)?;
    let outcome = run(&settings)?;

    println!("{}", report::render(&outcome.matches, &outcome.summary));

    if let Some(path) = &settings.image {
        save_plot(&outcome, path)?;
        info!(path = %path.display(), "saved results plot");
    }

    if settings.plot {
        show_plot(&outcome)?;
    }

    Ok(())
}

#[cfg(feature = "plot")]
fn save_plot(outcome: &curvepick_cli::Outcome, path: &std::path::Path) -> anyhow::Result<()> {
    curvepick_cli::plot::save(outcome, path)
}

#[cfg(not(feature = "plot"))]
fn save_plot(_outcome: &curvepick_cli::Outcome, _path: &std::path::Path) -> anyhow::Result<()> {
    anyhow::bail!("saving plot images requires building with the `plot` feature")
}

#[cfg(feature = "plot")]
fn show_plot(outcome: &curvepick_cli::Outcome) -> anyhow::Result<()> {
    curvepick_cli::plot::show(outcome)
}

#[cfg(not(feature = "plot"))]
fn show_plot(_outcome: &curvepick_cli::Outcome) -> anyhow::Result<()> {
    anyhow::bail!("plotting requires building with the `plot` feature")
}

fn init_logging(verbose: u8) {
    // `-v` wins over `RUST_LOG`, which wins over the `info` default.
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into())),
        1 => EnvFilter::default().add_directive(Level::DEBUG.into()),
        _ => EnvFilter::default().add_directive(Level::TRACE.into()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
