use crate::{
    error::MomentumError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive commands and
/// send formatted replies (optionally with labeled action buttons).
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages and button presses.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, MomentumError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), MomentumError>;

    /// Send a typing indicator to show the bot is processing.
    async fn send_typing(&self, _target: &str) -> Result<(), MomentumError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), MomentumError>;
}
