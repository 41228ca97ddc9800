use clap::Parser;
use color_eyre::eyre::Result;
use seven_dice::GameConfig;
use std::{
    path::{
        Path,
        PathBuf,
    },
    sync::OnceLock,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

mod app;
mod ui;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(version, about = "Bet on two dice landing under, on or over seven")]
struct Args {
    /// JSON config file; defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Milliseconds the dice spend rolling
    #[arg(long)]
    roll_delay_ms: Option<u64>,

    /// Balance at the start of the session
    #[arg(long)]
    starting_balance: Option<u64>,

    /// Enforce the min/max bet limits on every bet
    #[arg(long)]
    strict_limits: bool,

    /// Directory for the rolling log file
    #[arg(long, default_value = ".logs")]
    log_dir: PathBuf,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = GameConfig::load(self.config.as_deref())?;
        if let Some(ms) = self.roll_delay_ms {
            config.roll_delay_ms = ms;
        }
        if let Some(balance) = self.starting_balance {
            config.starting_balance = balance;
        }
        if self.strict_limits {
            config.rules.strict_limits = true;
        }
        Ok(config)
    }
}

// The terminal owns stdout, so logs go to a file.
fn init_tracing(log_dir: &Path) {
    let appender = rolling::daily(log_dir, "seven-dice.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args.log_dir);
    let config = args.game_config()?;
    tracing::debug!(?config, "config loaded");
    app::run_app(config).await
}
