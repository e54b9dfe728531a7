use super::OutputHandler;
use crate::analyzer::Analysis;
use crate::error::Result;
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Writes the full analysis as pretty-printed JSON.
pub struct JsonOutput {
    file: File,
}

impl JsonOutput {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self { file })
    }
}

#[async_trait]
impl OutputHandler for JsonOutput {
    async fn write(&mut self, analysis: &Analysis) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.file, analysis)?;
        writeln!(self.file)?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}
