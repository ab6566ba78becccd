//! # WAYFARER Server
//!
//! Headless host for the region engine. Opens the starting town, keeps it
//! alive with a resident session, and reports cache statistics until
//! stopped.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults, run until Ctrl+C
//! ./wayfarer-server
//!
//! # Custom configuration, stop after five minutes
//! RUST_LOG=wayfarer_world=debug ./wayfarer-server --config world.toml --duration 300
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tokio::runtime::{Builder, Handle};
use tracing::{error, info, warn};
use wayfarer_world::{Player, RegionCache, WorldConfig};

const STARTING_REGION: &str = "overworld,field:0:0";
const STATS_INTERVAL: Duration = Duration::from_secs(10);

/// Command line options.
#[derive(Debug, Default)]
struct Args {
    /// TOML configuration file.
    config: Option<PathBuf>,
    /// Stop after this long instead of waiting for Ctrl+C.
    duration: Option<Duration>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--duration" => {
                let secs = args.next().ok_or("--duration needs a number of seconds")?;
                let secs: u64 = secs
                    .parse()
                    .map_err(|_| format!("--duration: not a number of seconds: {secs}"))?;
                parsed.duration = Some(Duration::from_secs(secs));
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(parsed)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<WorldConfig, String> {
    match path {
        Some(path) => WorldConfig::load(path).map_err(|err| format!("{}: {err}", path.display())),
        None => {
            let config = WorldConfig::default();
            config.validate().map_err(|err| err.to_string())?;
            Ok(config)
        }
    }
}

async fn serve(config: WorldConfig, duration: Option<Duration>) {
    let cache = RegionCache::new(config, Handle::current());

    let Some(town) = cache.get_region_by_id(STARTING_REGION) else {
        error!(region = STARTING_REGION, "starting region refused");
        return;
    };

    let (warden, mut events) = Player::new("warden");
    {
        let mut town = town.lock();
        town.add_entity(Box::new(warden));
        info!(
            region = %town.id(),
            entities = town.entity_count(),
            residents = ?town.archetype_counts(),
            "starting region open"
        );
    }

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut stats = tokio::time::interval(STATS_INTERVAL);
    loop {
        tokio::select! {
            _ = stats.tick() => {
                let stats = cache.stats();
                info!(
                    cached = stats.cached,
                    created = stats.created,
                    evicted = stats.evicted,
                    invalid = stats.invalid,
                    "cache stats"
                );
            }
            Some(event) = events.recv() => {
                info!(kind = %event.kind, payload = %event.payload, "warden saw");
            }
            () = &mut deadline => {
                info!("run duration elapsed");
                break;
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "ctrl-c handler failed");
                }
                info!("interrupted");
                break;
            }
        }
    }

    cache.shutdown();
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            error!("{msg}");
            eprintln!("usage: wayfarer-server [--config <path>] [--duration <secs>]");
            return ExitCode::FAILURE;
        }
    };

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(msg) => {
            error!(error = %msg, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        tick_ms = config.tick_interval_ms,
        grace_secs = config.idle_grace_secs,
        "wayfarer server starting"
    );
    runtime.block_on(serve(config, args.duration));
    info!("wayfarer server stopped");
    ExitCode::SUCCESS
}
