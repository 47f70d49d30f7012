use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::Result;
use crate::types::{ContainerSnapshot, DockerEvent};

pub mod cli;
pub mod docker;
pub mod inspect;

pub use cli::DockerCli;
pub use docker::DockerApi;

/// Lifecycle events in the order the runtime reports them. The stream ends
/// when the runtime closes it; an `Err` item means it cannot continue.
pub type EventStream = BoxStream<'static, Result<DockerEvent>>;

#[async_trait]
pub trait EventSource: Send + Sync {
    /// Subscribe to the runtime's event stream. Each call opens a new
    /// subscription.
    async fn events(&self) -> Result<EventStream>;
}

#[async_trait]
pub trait ContainerInspector: Send + Sync {
    /// Name and address of a container as of now.
    async fn inspect(&self, container_id: &str) -> Result<ContainerSnapshot>;

    /// Ids of the containers currently running.
    async fn running_containers(&self) -> Result<Vec<String>>;
}
