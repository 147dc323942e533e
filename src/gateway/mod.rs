//! Gateway — the event loop connecting channels to the command dispatcher.
//!
//! Fans every channel's incoming messages into one queue and handles each
//! message to completion before the next, so all writes for a conversation
//! are serialized. Includes graceful shutdown on ctrl-c.

use crate::commands::{self, Command, CommandContext, Reply};
use momentum_core::{
    config::AdminConfig,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use momentum_store::Store;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// The central gateway that routes messages between channels and the store.
pub struct Gateway {
    channels: HashMap<String, Arc<dyn Channel>>,
    store: Store,
    admin: AdminConfig,
}

impl Gateway {
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        store: Store,
        admin: AdminConfig,
    ) -> Self {
        Self {
            channels,
            store,
            admin,
        }
    }

    /// Run the main event loop.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            "Momentum gateway running | channels: {} | admins: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            self.admin.user_ids.len(),
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        // Messages are handled one at a time; every handler is a short
        // sequence of store round-trips, so ordering costs little and keeps
        // each user's writes serialized.
        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    self.handle_message(incoming).await;
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Dispatch one message: button presses route by callback data, text
    /// routes by command word.
    async fn handle_message(&self, incoming: IncomingMessage) {
        let ctx = CommandContext {
            store: &self.store,
            admin: &self.admin,
            user_id: incoming.user_id,
            sender_name: incoming.sender_name.as_deref(),
            text: &incoming.text,
        };

        let reply = if incoming.is_button_press() {
            commands::handle_callback(&incoming.text, &ctx).await
        } else {
            match Command::parse(&incoming.text) {
                Some(cmd) => {
                    self.send_typing(&incoming).await;
                    commands::handle(cmd, &ctx).await
                }
                None => Reply::text("I only speak commands — see /help for the full list."),
            }
        };

        self.send_reply(&incoming, reply).await;
    }

    /// Best-effort typing indicator while a command runs.
    async fn send_typing(&self, incoming: &IncomingMessage) {
        let Some(target) = incoming.reply_target.as_deref() else {
            return;
        };
        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send_typing(target).await {
                warn!("typing indicator failed: {e}");
            }
        }
    }

    async fn send_reply(&self, incoming: &IncomingMessage, reply: Reply) {
        let msg = OutgoingMessage {
            text: reply.text,
            buttons: reply.buttons,
            reply_target: incoming.reply_target.clone(),
        };

        if let Some(channel) = self.channels.get(&incoming.channel) {
            if let Err(e) = channel.send(msg).await {
                error!("failed to send message: {e}");
            }
        } else {
            warn!("no channel '{}' for outgoing message", incoming.channel);
        }
    }

    /// Stop all channels.
    async fn shutdown(&self) {
        info!("Shutting down...");
        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }
        info!("Shutdown complete.");
    }
}
