//! Keep DNS `A` records in step with Docker containers.
//!
//! Container `start` events are read from the runtime, each started
//! container is inspected for its name and address, and the matching
//! record is replaced through a dynamic DNS update (delete, add, send).

pub mod config;
pub mod dns;
pub mod error;
pub mod hostname;
pub mod parser;
pub mod runtime;
pub mod types;
pub mod watcher;

pub use config::{Config, Overrides, RuntimeKind};
pub use dns::{DnsTransactionSubmitter, DnsUpdateTransaction, DnsUpdater, NsupdateSubmitter};
pub use error::{Error, Result};
pub use runtime::{ContainerInspector, DockerApi, DockerCli, EventSource};
pub use types::{ContainerSnapshot, DockerEvent, UpdateOutcome};
pub use watcher::{Stats, Watcher, WatcherState};
