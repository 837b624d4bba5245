//! CTF Reminder Bot
//!
//! Polls CTFtime for upcoming CTFs, announces new ones and reminds about
//! those starting within 24 hours. Meant to be run periodically by an
//! external scheduler (e.g. cron every 5 minutes); each invocation does a
//! single pass and exits.

mod config;

use clap::Parser;
use config::{ConfigError, ConfigLoader};
use config::runtime::RuntimeConfig;
use ctfr_core::processors::{
    CtftimeEventSource, CtftimeOrganizerLookup, DryRunNotifier, JsonFileStateStore,
    NotificationEngine, Notifier, TwitterNotifier,
};
use ctfr_sdk::client::{CtftimeClient, TwitterClient, build_http_client};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// CTF Reminder - announces upcoming CTFs and reminds about them
#[derive(Parser, Debug)]
#[command(name = "ctfr-bot")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./ctfr-config.toml")]
    config: PathBuf,

    /// Override the state file location
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Print notifications instead of posting them, even in production mode
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration; failures are logged to stderr since the
    // configured log file is not known yet
    let config_loader = ConfigLoader::new(&args.config, args.state, args.dry_run);
    let config = tracing::subscriber::with_default(bootstrap_subscriber(), || {
        load_config(&config_loader)
    })?;

    // Initialize tracing
    init_tracing(config.bot.log_file.as_deref())?;

    if !args.config.exists() {
        tracing::info!("Config file {:?} not found, using defaults", args.config);
    }

    tracing::info!(
        production = config.bot.production,
        state_path = %config.bot.state_path.display(),
        "Starting ctfr-bot v{}",
        env!("CARGO_PKG_VERSION")
    );

    let report = run_once(&config).await.map_err(|e| {
        tracing::error!(error = %e, "Run aborted");
        e
    })?;

    if !report.failed.is_empty() {
        tracing::warn!(
            failed = report.failed.len(),
            "Some notifications failed and will be retried next run"
        );
    }

    Ok(())
}

fn load_config(loader: &ConfigLoader) -> Result<RuntimeConfig, ConfigError> {
    loader.load().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
    })
}

/// Wire the processors from the configuration and run a single pass.
async fn run_once(config: &RuntimeConfig) -> anyhow::Result<ctfr_core::processors::RunReport> {
    let http_client = build_http_client(&config.bot.user_agent)?;
    let ctftime = CtftimeClient::new(
        http_client.clone(),
        config.source.events_url.clone(),
        config.source.team_url.clone(),
    );

    let source = CtftimeEventSource::new(ctftime.clone(), &config.source);
    let lookup = CtftimeOrganizerLookup::new(ctftime)?;
    let store = JsonFileStateStore::new(&config.bot.state_path);
    let notifier = build_notifier(config, http_client)?;

    let engine = NotificationEngine::new(source, notifier, lookup, store);
    let now = time::OffsetDateTime::now_utc();

    Ok(engine.run(now).await?)
}

fn build_notifier(
    config: &RuntimeConfig,
    http_client: reqwest::Client,
) -> anyhow::Result<Box<dyn Notifier>> {
    if !config.bot.production {
        tracing::info!("Dry run, notifications are printed instead of posted");
        return Ok(Box::new(DryRunNotifier::new()));
    }

    let credentials = config
        .twitter
        .clone()
        .ok_or_else(|| anyhow::anyhow!("production mode requires twitter credentials"))?;
    let twitter = TwitterClient::new(http_client.clone(), credentials)?;
    Ok(Box::new(TwitterNotifier::new(twitter, http_client)))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"))
}

/// Stderr-only subscriber used while the configuration is loaded.
fn bootstrap_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .finish()
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr and, when configured, are appended to `log_file`.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = env_filter();

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_error_is_logged() {
        let path = std::env::temp_dir().join(format!("ctfr-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[source]\nlimit = 0\n").unwrap();
        let loader = ConfigLoader::new(&path, None, false);

        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let result = tracing::subscriber::with_default(subscriber, || load_config(&loader));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Failed to load configuration"), "{logged}");
        assert!(logged.contains("source.limit"), "{logged}");
    }
}
