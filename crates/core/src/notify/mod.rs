pub mod digest;
pub mod smtp;

pub use digest::Digest;

use anyhow::Result;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    async fn send(&self, digest: &Digest) -> Result<()>;
}

/// Writes the digest to the log instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    fn channel(&self) -> &'static str {
        "log"
    }

    async fn send(&self, digest: &Digest) -> Result<()> {
        tracing::info!(subject = %digest.subject, "dry-run digest:\n{}", digest.body);
        Ok(())
    }
}
