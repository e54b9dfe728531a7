use crate::analyzer::Analysis;
use crate::error::Result;
use async_trait::async_trait;

pub mod console;
pub mod json;

#[async_trait]
pub trait OutputHandler: Send + Sync {
    async fn write(&mut self, analysis: &Analysis) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
