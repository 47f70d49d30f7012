use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{DnsTransactionSubmitter, DnsUpdateTransaction};
use crate::error::{Error, Result};

/// Submits transactions by piping them into `nsupdate -k KEY`.
pub struct NsupdateSubmitter {
    program: String,
    key: String,
}

impl NsupdateSubmitter {
    pub fn new(program: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl DnsTransactionSubmitter for NsupdateSubmitter {
    async fn submit(&self, txn: &DnsUpdateTransaction) -> Result<()> {
        let transcript = txn.transcript();
        debug!("nsupdate:\n{}", transcript);

        let mut child = Command::new(&self.program)
            .arg("-k")
            .arg(&self.key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(transcript.as_bytes()).await {
                Ok(()) => {}
                // The tool gave up before reading everything; its exit
                // status says why.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
            // Dropping stdin closes the pipe so nsupdate sees EOF.
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(Error::subprocess(&self.program, &output));
        }
        Ok(())
    }
}
