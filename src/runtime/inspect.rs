//! The subset of `docker inspect` output the updater relies on.
//!
//! Both adapters funnel their data through [`InspectDocument`] so that
//! name and address selection behave the same whichever backend is used.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::ContainerSnapshot;

#[derive(Debug, Default, Deserialize)]
pub struct InspectDocument {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "NetworkSettings")]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NetworkSettings {
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "Networks")]
    pub networks: Option<BTreeMap<String, Endpoint>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Endpoint {
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
}

/// Parse the JSON array printed by `docker inspect ID`.
pub fn parse_inspect_output(
    container_id: &str,
    raw: &[u8],
    network: Option<&str>,
) -> Result<ContainerSnapshot> {
    let documents: Vec<InspectDocument> = serde_json::from_slice(raw).map_err(|e| {
        Error::missing_data(container_id, format!("unexpected inspect output: {}", e))
    })?;
    documents
        .into_iter()
        .next()
        .ok_or_else(|| Error::missing_data(container_id, "empty inspection result"))?
        .into_snapshot(container_id, network)
}

impl InspectDocument {
    /// Extract name and address.
    ///
    /// With `network` set, only the address on that network is accepted.
    /// Otherwise the primary `IPAddress` wins, falling back to the first
    /// attached network (by name) that has one.
    pub fn into_snapshot(
        self,
        container_id: &str,
        network: Option<&str>,
    ) -> Result<ContainerSnapshot> {
        let name = self
            .name
            .ok_or_else(|| Error::missing_data(container_id, "no Name field"))?;
        let settings = self
            .network_settings
            .ok_or_else(|| Error::missing_data(container_id, "no NetworkSettings field"))?;

        let networks = settings.networks.unwrap_or_default();
        let ip_address = match network {
            Some(wanted) => networks
                .get(wanted)
                .and_then(|ep| non_empty(ep.ip_address.as_deref()))
                .ok_or_else(|| {
                    Error::missing_data(container_id, format!("no address on network {}", wanted))
                })?,
            None => non_empty(settings.ip_address.as_deref())
                .or_else(|| {
                    networks
                        .values()
                        .find_map(|ep| non_empty(ep.ip_address.as_deref()))
                })
                .ok_or_else(|| Error::missing_data(container_id, "container has no IP address"))?,
        };

        Ok(ContainerSnapshot {
            name: name.trim_start_matches('/').to_string(),
            ip_address,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_and_primary_address() {
        let raw = br#"[{"Id":"08dafd55","Name":"/web-1","NetworkSettings":{"IPAddress":"10.0.0.5","Networks":{"bridge":{"IPAddress":"10.0.0.5"}}}}]"#;
        let snapshot = parse_inspect_output("08dafd55", raw, None).unwrap();
        assert_eq!(
            snapshot,
            ContainerSnapshot {
                name: "web-1".into(),
                ip_address: "10.0.0.5".into(),
            }
        );
    }

    #[test]
    fn falls_back_to_first_network_by_name() {
        let raw = br#"[{"Name":"/db","NetworkSettings":{"IPAddress":"","Networks":{"zeta":{"IPAddress":"172.20.0.9"},"app":{"IPAddress":"172.19.0.3"}}}}]"#;
        let snapshot = parse_inspect_output("abc", raw, None).unwrap();
        assert_eq!(snapshot.ip_address, "172.19.0.3");
    }

    #[test]
    fn configured_network_takes_precedence() {
        let raw = br#"[{"Name":"/db","NetworkSettings":{"IPAddress":"10.0.0.2","Networks":{"bridge":{"IPAddress":"10.0.0.2"},"backend":{"IPAddress":"172.19.0.3"}}}}]"#;
        let snapshot = parse_inspect_output("abc", raw, Some("backend")).unwrap();
        assert_eq!(snapshot.ip_address, "172.19.0.3");

        let err = parse_inspect_output("abc", raw, Some("frontend")).unwrap_err();
        assert!(matches!(err, Error::MissingContainerData { .. }));
    }

    #[test]
    fn malformed_documents_are_missing_data() {
        let cases: [&[u8]; 5] = [
            b"[]",
            b"{}",
            b"not json",
            br#"[{"Name":"/x"}]"#,
            br#"[{"Name":"/x","NetworkSettings":{"IPAddress":""}}]"#,
        ];
        for raw in cases {
            assert!(
                matches!(
                    parse_inspect_output("abc", raw, None),
                    Err(Error::MissingContainerData { .. })
                ),
                "input {:?}",
                String::from_utf8_lossy(raw)
            );
        }
    }

    #[test]
    fn bare_slash_name_becomes_empty() {
        let raw = br#"[{"Name":"/","NetworkSettings":{"IPAddress":"10.0.0.5"}}]"#;
        assert_eq!(parse_inspect_output("abc", raw, None).unwrap().name, "");
    }
}
