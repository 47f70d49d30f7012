//! Container runtime adapter backed by the Docker Engine API.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{InspectContainerOptions, ListContainersOptions};
use bollard::models::{ContainerInspectResponse, EventMessage};
use bollard::system::EventsOptions;
use bollard::Docker;
use futures_util::stream::StreamExt;
use log::debug;

use super::inspect::{Endpoint, InspectDocument, NetworkSettings};
use super::{ContainerInspector, EventSource, EventStream};
use crate::error::{Error, Result};
use crate::types::{ContainerSnapshot, DockerEvent};

pub struct DockerApi {
    docker: Docker,
    network: Option<String>,
}

impl DockerApi {
    /// Connect to the local Docker daemon using default settings.
    /// This handles the unix socket on Linux and `DOCKER_HOST`.
    pub fn connect(network: Option<String>) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker, network })
    }
}

#[async_trait]
impl ContainerInspector for DockerApi {
    async fn inspect(&self, container_id: &str) -> Result<ContainerSnapshot> {
        let detail = self
            .docker
            .inspect_container(container_id, None::<InspectContainerOptions>)
            .await?;
        inspect_document(detail).into_snapshot(container_id, self.network.as_deref())
    }

    async fn running_containers(&self) -> Result<Vec<String>> {
        let opts = ListContainersOptions::<String> {
            all: false,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(opts)).await?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }
}

#[async_trait]
impl EventSource for DockerApi {
    async fn events(&self) -> Result<EventStream> {
        let opts = EventsOptions::<String> {
            filters: HashMap::from([("type".to_string(), vec!["container".to_string()])]),
            ..Default::default()
        };

        let stream = self.docker.events(Some(opts)).filter_map(|msg| async move {
            match msg {
                Ok(message) => {
                    let event = docker_event(message);
                    if event.is_none() {
                        debug!("skipping event without actor or action");
                    }
                    event.map(Ok)
                }
                Err(e) => Some(Err(Error::from(e))),
            }
        });
        Ok(stream.boxed())
    }
}

/// Map an Engine API event onto the fields the textual stream carries.
fn docker_event(message: EventMessage) -> Option<DockerEvent> {
    let actor = message.actor?;
    let container_id = actor.id?;
    let action = message.action?;
    let image = actor
        .attributes
        .and_then(|mut attrs| attrs.remove("image"))
        .unwrap_or_default();
    Some(DockerEvent {
        timestamp: message.time.map(|t| t.to_string()).unwrap_or_default(),
        container_id,
        image,
        action,
    })
}

fn inspect_document(detail: ContainerInspectResponse) -> InspectDocument {
    InspectDocument {
        name: detail.name,
        network_settings: detail.network_settings.map(|settings| NetworkSettings {
            ip_address: settings.ip_address,
            networks: settings.networks.map(|networks| {
                networks
                    .into_iter()
                    .map(|(name, ep)| {
                        (
                            name,
                            Endpoint {
                                ip_address: ep.ip_address,
                            },
                        )
                    })
                    .collect()
            }),
        }),
    }
}
