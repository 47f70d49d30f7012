//! DNS updater.
//!
//! Turns a container into an `A` record under the configured zone.  The
//! transport that actually reaches the name server sits behind
//! [`DnsTransactionSubmitter`]; the default is [`NsupdateSubmitter`],
//! which drives the `nsupdate` tool from BIND.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use crate::error::{Error, Result};
use crate::hostname::normalize_hostname;
use crate::runtime::ContainerInspector;
use crate::types::UpdateOutcome;

pub mod nsupdate;
pub mod transaction;

pub use nsupdate::NsupdateSubmitter;
pub use transaction::DnsUpdateTransaction;

#[async_trait]
pub trait DnsTransactionSubmitter: Send + Sync {
    /// Apply the transaction as a single unit. Failures are returned, never
    /// retried.
    async fn submit(&self, txn: &DnsUpdateTransaction) -> Result<()>;
}

pub struct DnsUpdater {
    server: String,
    zone: String,
    ttl: u32,
    inspector: Arc<dyn ContainerInspector>,
    submitter: Box<dyn DnsTransactionSubmitter>,
}

impl DnsUpdater {
    pub fn new(
        server: impl Into<String>,
        zone: impl Into<String>,
        ttl: u32,
        inspector: Arc<dyn ContainerInspector>,
        submitter: Box<dyn DnsTransactionSubmitter>,
    ) -> Self {
        Self {
            server: server.into(),
            zone: zone.into(),
            ttl,
            inspector,
            submitter,
        }
    }

    pub fn inspector(&self) -> &dyn ContainerInspector {
        self.inspector.as_ref()
    }

    /// The zone without its root dot, used to build FQDNs.
    pub fn domain(&self) -> &str {
        self.zone.trim_matches('.')
    }

    /// Build the transaction for `hostname` without sending it.
    pub fn transaction(&self, hostname: &str, ip: &str) -> Result<DnsUpdateTransaction> {
        if hostname.trim().is_empty() {
            return Err(Error::EmptyHostname);
        }
        let fqdn = format!("{}.{}", normalize_hostname(hostname), self.domain());
        Ok(DnsUpdateTransaction {
            server: self.server.clone(),
            zone: self.zone.clone(),
            fqdn,
            ttl: self.ttl,
            ip: ip.to_string(),
        })
    }

    /// Replace the `A` record of `hostname` with `ip`.
    ///
    /// Returns the FQDN that was written.
    pub async fn update_host(&self, hostname: &str, ip: &str) -> Result<String> {
        let txn = self.transaction(hostname, ip)?;
        self.submitter.submit(&txn).await?;
        info!("Updated {}", txn);
        Ok(txn.fqdn)
    }

    /// Inspect a container and register its name.
    ///
    /// Containers whose inspection data is unusable are skipped with a log
    /// line. Every other failure is returned to the caller.
    pub async fn update_container(&self, container_id: &str) -> Result<UpdateOutcome> {
        let snapshot = match self.inspector.inspect(container_id).await {
            Ok(snapshot) => snapshot,
            Err(Error::MissingContainerData { reason, .. }) => {
                info!(
                    "failed to fetch container data for {}: {}",
                    container_id, reason
                );
                return Ok(UpdateOutcome::Skipped { reason });
            }
            Err(e) => return Err(e),
        };

        let fqdn = self
            .update_host(&snapshot.name, &snapshot.ip_address)
            .await?;
        Ok(UpdateOutcome::Updated {
            fqdn,
            ip: snapshot.ip_address,
        })
    }
}
