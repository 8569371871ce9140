/*
[INPUT]:  CLI arguments, optional YAML configuration file, OS shutdown signals
[OUTPUT]: Headless focus session runner with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pomo_engine::{CountdownDriver, RunState, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "pomo", version, about = "Headless pomodoro session runner")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(args.config_path.as_deref())?;
    info!(
        pomodoro_secs = config.pomodoro_secs,
        short_break_secs = config.short_break_secs,
        long_break_secs = config.long_break_secs,
        cycles_before_long_break = config.cycles_before_long_break,
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let mut driver = CountdownDriver::new(config).context("build countdown driver")?;
    let mut views = driver.subscribe();

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    driver.start().context("start session")?;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown signal received");
                driver.stop();
                break;
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = *views.borrow_and_update();
                if view.state == RunState::NotStarted {
                    // A rollover landed on the next idle step. The engine
                    // never auto-starts; the runner issues the next start.
                    info!(
                        next_step = ?view.step,
                        completed_cycles = view.completed_cycles,
                        "interval complete"
                    );
                    driver.start().context("start next interval")?;
                }
            }
        }
    }

    info!("session runner exited");
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("load config from {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
