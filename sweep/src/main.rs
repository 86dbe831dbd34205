use clap::{Parser, Subcommand};
use rvb_sweep::config::{preflight_checks, ConfigErrors, SweepFile};
use std::{
    fs::File,
    io::{stdout, Write},
    path::{Path, PathBuf},
    process::exit,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Enumerate the jobs of a parameter sweep")]
struct Cli {
    /// log debug output, RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a sweep file and write the job plan as YAML
    Plan {
        file: PathBuf,
        /// write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a sweep file and check the environment it will run in
    Check { file: PathBuf },
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn plan(file: &Path, output: Option<&Path>) -> Result<(), ConfigErrors> {
    let plan = SweepFile::load(file)?.compose()?.plan();

    match output {
        Some(path) => serde_yaml::to_writer(File::create(path)?, &plan)?,
        None => {
            let mut lock = stdout().lock();
            serde_yaml::to_writer(&mut lock, &plan)?;
            lock.flush()?;
        }
    }

    info!("Planned {} jobs", plan.jobs.len());

    Ok(())
}

fn check(file: &Path) -> Result<bool, ConfigErrors> {
    let config = SweepFile::load(file)?.compose()?;
    // relative paths in a sweep file are relative to the file itself
    let root = file.parent().unwrap_or(Path::new("."));

    Ok(preflight_checks(&config, root))
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Plan { file, output } => plan(&file, output.as_deref()),
        Command::Check { file } => check(&file).map(|contains_error| {
            if contains_error {
                error!("Preflight checks failed for {}", file.to_string_lossy());
                exit(1)
            }

            info!("Preflight checks passed");
        }),
    };

    if let Err(error) = result {
        error!("{error}");
        exit(1)
    }
}
