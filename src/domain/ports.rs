use crate::domain::model::{EmailMessage, SendReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound email capability. Implementations make exactly one delivery
/// attempt per call.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt>;
}
