//! Test doubles for the runtime and DNS seams.
//!
//! Every double is cheaply cloneable and shares its counters between
//! clones, so a test can hand one clone to the watcher and keep another
//! for assertions.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docker_dns::parser::parse_event_line;
use docker_dns::runtime::EventStream;
use docker_dns::{
    ContainerInspector, ContainerSnapshot, DnsTransactionSubmitter, DnsUpdateTransaction,
    DnsUpdater, DockerEvent, Error, EventSource, Result,
};
use futures_util::stream::{self, StreamExt};

/// An event source that replays a fixed script once.
#[derive(Clone)]
pub struct ScriptedEvents {
    items: Arc<Mutex<Option<Vec<Result<DockerEvent>>>>>,
    subscriptions: Arc<AtomicUsize>,
}

impl ScriptedEvents {
    /// Raw event lines, run through the line parser like the CLI adapter
    /// does. Unparseable lines are dropped.
    pub fn from_lines(lines: &[&str]) -> Self {
        let items = lines
            .iter()
            .filter_map(|line| parse_event_line(line))
            .map(Ok)
            .collect();
        Self::new(items)
    }

    pub fn new(items: Vec<Result<DockerEvent>>) -> Self {
        Self {
            items: Arc::new(Mutex::new(Some(items))),
            subscriptions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append a stream failure after the scripted events.
    pub fn then_fail(self, message: &str) -> Self {
        if let Some(items) = self.items.lock().unwrap().as_mut() {
            items.push(Err(Error::EventStream(message.to_string())));
        }
        self
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for ScriptedEvents {
    async fn events(&self) -> Result<EventStream> {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        let items = self
            .items
            .lock()
            .unwrap()
            .take()
            .expect("events() can only be called once");
        Ok(stream::iter(items).boxed())
    }
}

/// Answers inspections from a table.
#[derive(Clone, Default)]
pub struct FakeInspector {
    containers: Arc<Mutex<HashMap<String, ContainerSnapshot>>>,
    broken: Arc<Mutex<HashSet<String>>>,
    running: Arc<Mutex<Vec<String>>>,
    inspect_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, id: &str, name: &str, ip: &str) -> Self {
        self.containers.lock().unwrap().insert(
            id.to_string(),
            ContainerSnapshot {
                name: name.trim_start_matches('/').to_string(),
                ip_address: ip.to_string(),
            },
        );
        self
    }

    /// `docker inspect` for this id exits with status 1.
    pub fn with_broken(self, id: &str) -> Self {
        self.broken.lock().unwrap().insert(id.to_string());
        self
    }

    pub fn with_running(self, ids: &[&str]) -> Self {
        *self.running.lock().unwrap() = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn inspect_calls(&self) -> usize {
        self.inspect_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerInspector for FakeInspector {
    async fn inspect(&self, container_id: &str) -> Result<ContainerSnapshot> {
        self.inspect_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken.lock().unwrap().contains(container_id) {
            return Err(Error::Subprocess {
                program: "docker".into(),
                exit_code: 1,
                stdout: "[]".into(),
                stderr: format!("Error: No such object: {}", container_id),
            });
        }
        self.containers
            .lock()
            .unwrap()
            .get(container_id)
            .cloned()
            .ok_or_else(|| Error::MissingContainerData {
                container_id: container_id.to_string(),
                reason: "empty inspection result".into(),
            })
    }

    async fn running_containers(&self) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.running.lock().unwrap().clone())
    }
}

/// Records every transaction; fails for FQDNs it was told to reject.
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    sent: Arc<Mutex<Vec<DnsUpdateTransaction>>>,
    rejected: Arc<Mutex<HashSet<String>>>,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `nsupdate` exit with status 1 for this FQDN.
    pub fn rejecting(self, fqdn: &str) -> Self {
        self.rejected.lock().unwrap().insert(fqdn.to_string());
        self
    }

    pub fn sent(&self) -> Vec<DnsUpdateTransaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fqdns(&self) -> Vec<String> {
        self.sent().into_iter().map(|txn| txn.fqdn).collect()
    }
}

#[async_trait]
impl DnsTransactionSubmitter for RecordingSubmitter {
    async fn submit(&self, txn: &DnsUpdateTransaction) -> Result<()> {
        self.sent.lock().unwrap().push(txn.clone());
        if self.rejected.lock().unwrap().contains(&txn.fqdn) {
            return Err(Error::Subprocess {
                program: "nsupdate".into(),
                exit_code: 1,
                stdout: String::new(),
                stderr: "update failed: REFUSED".into(),
            });
        }
        Ok(())
    }
}

/// An updater for `example.com.` with a 60 second TTL.
pub fn updater(inspector: &FakeInspector, submitter: &RecordingSubmitter) -> DnsUpdater {
    DnsUpdater::new(
        "localhost",
        "example.com.",
        60,
        Arc::new(inspector.clone()),
        Box::new(submitter.clone()),
    )
}
