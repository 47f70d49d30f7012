//! Data structures passed between the event source, the container
//! inspector and the DNS updater.
//!
//! All of them are transient: an event is consumed once by the watcher
//! and a snapshot lives for a single update cycle.  Nothing here is
//! cached between events.

use std::fmt;

/// A single container lifecycle event.
///
/// The fields are captured verbatim from the event source; nothing is
/// normalised or validated at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerEvent {
    pub timestamp: String,
    pub container_id: String,
    pub image: String,
    pub action: String,
}

impl DockerEvent {
    /// Only `start` events lead to a DNS update.
    pub fn is_start(&self) -> bool {
        self.action == "start"
    }
}

impl fmt::Display for DockerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.timestamp, self.container_id, self.image, self.action
        )
    }
}

/// The part of a container inspection that the updater needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    /// Container name with the leading `/` stripped.
    pub name: String,
    pub ip_address: String,
}

/// What happened to a container after an update attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record `fqdn` now points at `ip`.
    Updated { fqdn: String, ip: String },
    /// The container could not be inspected usefully, so nothing was sent.
    Skipped { reason: String },
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}
