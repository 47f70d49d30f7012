use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Which adapter talks to the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    /// Shell out to the `docker` CLI.
    Cli,
    /// Use the Docker Engine API over its socket.
    Api,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Name server receiving the updates.
    pub server: String,
    /// Zone to update, including the trailing dot.
    pub zone: String,
    pub ttl: u32,
    /// Register already running containers before watching events.
    pub scan: bool,
    /// Key file passed to `nsupdate -k`.
    pub key: String,
    pub runtime: RuntimeKind,
    pub docker_bin: String,
    pub nsupdate_bin: String,
    /// Take addresses from this Docker network only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "localhost".into(),
            zone: "named.zone.".into(),
            ttl: 60,
            scan: false,
            key: String::new(),
            runtime: RuntimeKind::Cli,
            docker_bin: "docker".into(),
            nsupdate_bin: "nsupdate".into(),
            network: None,
            log_level: "info".into(),
        }
    }
}

/// Values given on the command line. Only the ones that are set override
/// the other layers.
#[derive(Debug, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Config {
    /// Defaults, then `<path>` (TOML), `docker-dns.json`, `DOCKER_DNS_*`
    /// environment variables and finally the command line.
    pub fn load(path: &Path, overrides: &Overrides) -> anyhow::Result<Self> {
        let mut config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Json::file("docker-dns.json"))
            .merge(Env::prefixed("DOCKER_DNS_"))
            .merge(Serialized::defaults(overrides))
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        // Support Docker-style secrets
        if overrides.key.is_none() {
            if let Ok(key_file) = std::env::var("DOCKER_DNS_KEY_FILE") {
                config.key = std::fs::read_to_string(key_file)?.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.key.trim().is_empty() {
            anyhow::bail!("No DNS update key configured");
        }
        if self.zone.trim_matches('.').is_empty() {
            anyhow::bail!("Invalid zone {:?}: no domain labels", self.zone);
        }
        Ok(())
    }
}
