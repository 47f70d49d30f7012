//! Container runtime adapter that shells out to the `docker` CLI.

use std::process::{Output, Stdio};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader, Split};
use tokio::process::{Child, ChildStdout, Command};

use super::inspect::parse_inspect_output;
use super::{ContainerInspector, EventSource, EventStream};
use crate::error::{Error, Result};
use crate::parser::parse_event_line;
use crate::types::ContainerSnapshot;

/// Go template that renders every container event as
/// `TIME ID: (from IMAGE) STATUS`, the shape [`parse_event_line`] expects.
const EVENT_FORMAT: &str = "{{.Time}} {{.ID}}: (from {{.From}}) {{.Status}}";

pub struct DockerCli {
    program: String,
    network: Option<String>,
}

impl DockerCli {
    pub fn new(program: impl Into<String>, network: Option<String>) -> Self {
        Self {
            program: program.into(),
            network,
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!("running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(Error::subprocess(&self.program, &output));
        }
        Ok(output)
    }
}

#[async_trait]
impl ContainerInspector for DockerCli {
    async fn inspect(&self, container_id: &str) -> Result<ContainerSnapshot> {
        let output = self.run(&["inspect", container_id]).await?;
        parse_inspect_output(container_id, &output.stdout, self.network.as_deref())
    }

    async fn running_containers(&self) -> Result<Vec<String>> {
        let output = self.run(&["ps", "-q", "--no-trunc"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect())
    }
}

struct Subscription {
    program: String,
    lines: Split<BufReader<ChildStdout>>,
    // Reaped once stdout closes; dropping it kills `docker events`.
    child: Option<Child>,
}

#[async_trait]
impl EventSource for DockerCli {
    async fn events(&self) -> Result<EventStream> {
        let mut child = Command::new(&self.program)
            .args(["events", "--filter", "type=container", "--format", EVENT_FORMAT])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::EventStream("docker events has no stdout".into()))?;

        let subscription = Subscription {
            program: self.program.clone(),
            lines: BufReader::new(stdout).split(b'\n'),
            child: Some(child),
        };

        let events = stream::unfold(subscription, |mut sub| async move {
            loop {
                match sub.lines.next_segment().await {
                    Ok(Some(raw)) => {
                        let event = std::str::from_utf8(&raw).ok().and_then(parse_event_line);
                        match event {
                            Some(event) => return Some((Ok(event), sub)),
                            None => debug!(
                                "skipping unrecognised event line {:?}",
                                String::from_utf8_lossy(&raw)
                            ),
                        }
                    }
                    Ok(None) => {
                        let child = sub.child.take()?;
                        return match child.wait_with_output().await {
                            Ok(output) if output.status.success() => None,
                            Ok(output) => Some((Err(Error::subprocess(&sub.program, &output)), sub)),
                            Err(e) => Some((Err(e.into()), sub)),
                        };
                    }
                    Err(e) => {
                        sub.child = None;
                        return Some((Err(e.into()), sub));
                    }
                }
            }
        });
        Ok(events.boxed())
    }
}
