//! docker-dns daemon entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tokio::signal;

use docker_dns::{
    Config, ContainerInspector, DnsUpdater, DockerApi, DockerCli, EventSource, NsupdateSubmitter,
    Overrides, RuntimeKind, Watcher,
};
use docker_dns::watcher::shutdown_requested;

/// Update DNS entries from docker events.
#[derive(Parser, Debug)]
#[command(name = "docker-dns")]
#[command(version, about, long_about = None)]
struct Args {
    /// Target name server [default: localhost]
    #[arg(long)]
    server: Option<String>,

    /// DNS zone, do not forget the trailing dot [default: named.zone.]
    #[arg(long)]
    zone: Option<String>,

    /// DNS record TTL [default: 60]
    #[arg(long)]
    ttl: Option<u32>,

    /// Scan running containers
    #[arg(long)]
    scan: bool,

    /// Path to configuration file (TOML).
    #[arg(long, default_value = "docker-dns.toml")]
    config: PathBuf,

    /// DNS update key
    #[arg(value_name = "KEY")]
    key: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            server: self.server.clone(),
            zone: self.zone.clone(),
            ttl: self.ttl,
            scan: self.scan.then_some(true),
            key: self.key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let cfg = Config::load(&args.config, &args.overrides())?;

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .init();
    info!(
        "Starting docker-dns: server={} zone={} ttl={} runtime={:?}",
        cfg.server, cfg.zone, cfg.ttl, cfg.runtime
    );

    let (source, inspector): (Arc<dyn EventSource>, Arc<dyn ContainerInspector>) =
        match cfg.runtime {
            RuntimeKind::Cli => {
                let cli = Arc::new(DockerCli::new(&cfg.docker_bin, cfg.network.clone()));
                let source: Arc<dyn EventSource> = cli.clone();
                let inspector: Arc<dyn ContainerInspector> = cli;
                (source, inspector)
            }
            RuntimeKind::Api => {
                let api = Arc::new(DockerApi::connect(cfg.network.clone())?);
                let source: Arc<dyn EventSource> = api.clone();
                let inspector: Arc<dyn ContainerInspector> = api;
                (source, inspector)
            }
        };

    let submitter = NsupdateSubmitter::new(&cfg.nsupdate_bin, &cfg.key);
    let updater = DnsUpdater::new(&cfg.server, &cfg.zone, cfg.ttl, inspector, Box::new(submitter));
    let mut watcher = Watcher::new(source, updater);

    tokio::select! {
        result = watcher.run(cfg.scan) => {
            let stats = result.inspect_err(|e| error!("Watcher failed: {}", e))?;
            info!(
                "Processed events: {} updated, {} skipped, {} failed, {} ignored",
                stats.updated, stats.skipped, stats.failed, stats.ignored
            );
        }
        _ = shutdown_requested(signal::ctrl_c()) => {}
    }

    info!("Shutdown complete.");
    Ok(())
}
