use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinica_core::constants::{DEFAULT_DATA_DIR, DEFAULT_MAX_LOGIN_ATTEMPTS};
use clinica_core::{bootstrap, CoreConfig, Store};

mod shell;

use shell::{SessionEnd, Shell};

#[derive(Parser, Debug)]
#[command(name = "clinica")]
#[command(about = "Clinic appointment scheduling console")]
struct Cli {
    /// Directory holding the data files
    #[arg(long, env = "CLINICA_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Login attempts allowed before access is denied
    #[arg(
        long,
        env = "CLINICA_MAX_LOGIN_ATTEMPTS",
        default_value_t = DEFAULT_MAX_LOGIN_ATTEMPTS
    )]
    max_attempts: u32,
}

/// Entry point for the clinic console.
///
/// Prepares the data directory, loads every collection, then hands stdin/stdout to
/// the interactive shell. Log output goes to stderr so it does not interleave with
/// the menu; set `RUST_LOG` to see more than warnings.
///
/// # Environment Variables
/// - `CLINICA_DATA_DIR`: data directory (default: "db")
/// - `CLINICA_MAX_LOGIN_ATTEMPTS`: login attempts (default: 5)
///
/// # Returns
/// * success after a normal exit, which saves all collections
/// * failure when login attempts are exhausted (nothing is saved)
fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinica_core=warn".parse()?)
                .add_directive("clinica=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(CoreConfig::new(cli.data_dir, cli.max_attempts)?);

    bootstrap::ensure_storage(&cfg).with_context(|| {
        format!(
            "failed to prepare data directory {}",
            cfg.data_dir().display()
        )
    })?;
    let store = Store::load(cfg);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(store, stdin.lock(), stdout.lock());

    match shell.run()? {
        SessionEnd::Exited => Ok(ExitCode::SUCCESS),
        SessionEnd::AccessDenied => Ok(ExitCode::FAILURE),
    }
}
