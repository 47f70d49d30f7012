use std::fmt;

/// One delete-then-add update of an `A` record, in the form accepted by
/// `nsupdate` on its standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsUpdateTransaction {
    pub server: String,
    pub zone: String,
    pub fqdn: String,
    pub ttl: u32,
    pub ip: String,
}

impl DnsUpdateTransaction {
    /// The five directives of the transaction. The delete always precedes
    /// the add so the old record never survives next to the new one.
    pub fn directives(&self) -> [String; 5] {
        [
            format!("server {}", self.server),
            format!("zone {}", self.zone),
            format!("update delete {}", self.fqdn),
            format!("update add {} {} A {}", self.fqdn, self.ttl, self.ip),
            "send".to_string(),
        ]
    }

    /// Newline-terminated transcript fed to the update tool.
    pub fn transcript(&self) -> String {
        let mut out = self.directives().join("\n");
        out.push('\n');
        out
    }
}

impl fmt::Display for DnsUpdateTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} A {}", self.fqdn, self.ttl, self.ip)
    }
}
