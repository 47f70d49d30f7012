//! Line parser for the textual `docker events` stream.
//!
//! Example input:
//!
//! ```text
//! 2015-07-15T10:28:39.000000000+02:00 08dafd55da6b...: (from flinkwork/backend) die
//! ```
//!
//! The stream interleaves other line shapes with this one; those are
//! dropped without error.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::DockerEvent;

const EVENT_PATTERN: &str = r"^([^ ]+) ([0-9a-f]+): \(from (.+)\) (.+)";

static EVENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EVENT_PATTERN).expect("event pattern is a valid regex"));

/// Parses one raw line into an event, or returns `None` if it does not
/// have the `TIMESTAMP ID: (from IMAGE) ACTION` shape.
pub fn parse_event_line(line: &str) -> Option<DockerEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let caps = EVENT_RE.captures(line)?;
    Some(DockerEvent {
        timestamp: caps[1].to_string(),
        container_id: caps[2].to_string(),
        image: caps[3].to_string(),
        action: caps[4].to_string(),
    })
}
