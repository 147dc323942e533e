//! Long-polling update loop and Channel trait implementation.

use super::types::{TgResponse, TgUpdate, TgUser};
use super::TelegramChannel;
use async_trait::async_trait;
use momentum_core::{
    error::MomentumError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

fn display_name(user: &TgUser) -> String {
    if let Some(ref un) = user.username {
        format!("@{un}")
    } else if let Some(ref ln) = user.last_name {
        format!("{} {ln}", user.first_name)
    } else {
        user.first_name.clone()
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, MomentumError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!("{base_url}/getUpdates?timeout=30");
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                // Successful poll -- reset backoff.
                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    // Button press: acknowledge it and forward the callback
                    // data as the message text.
                    if let Some(cb) = update.callback_query {
                        // Always acknowledge, even for presses we drop, or the
                        // presser's client keeps its spinner.
                        Self::answer_callback(&client, &base_url, &cb.id).await;

                        let data = match cb.data {
                            Some(d) if !d.is_empty() => d,
                            _ => continue,
                        };

                        if !allowed_users.is_empty() && !allowed_users.contains(&cb.from.id) {
                            warn!("ignoring button press from unauthorized user {}", cb.from.id);
                            continue;
                        }

                        let reply_target = cb.message.map(|m| m.chat.id.to_string());
                        let incoming = IncomingMessage {
                            id: Uuid::new_v4(),
                            channel: "telegram".to_string(),
                            user_id: cb.from.id,
                            sender_name: Some(display_name(&cb.from)),
                            text: data,
                            timestamp: chrono::Utc::now(),
                            reply_target,
                            callback_id: Some(cb.id),
                        };

                        if tx.send(incoming).await.is_err() {
                            info!("telegram channel receiver dropped, stopping poll");
                            return;
                        }
                        continue;
                    }

                    let msg = match update.message {
                        Some(m) => m,
                        None => continue,
                    };

                    let text = match msg.text {
                        Some(t) => t,
                        None => continue,
                    };

                    let user = match msg.from {
                        Some(u) => u,
                        None => continue,
                    };

                    // Auth check.
                    if !allowed_users.is_empty() && !allowed_users.contains(&user.id) {
                        warn!("ignoring message from unauthorized user {}", user.id);
                        continue;
                    }

                    // Drop group messages -- Momentum data is per-person.
                    let is_group = matches!(msg.chat.chat_type.as_str(), "group" | "supergroup");
                    if is_group {
                        debug!("telegram: ignoring group message from chat {}", msg.chat.id);
                        continue;
                    }

                    let incoming = IncomingMessage {
                        id: Uuid::new_v4(),
                        channel: "telegram".to_string(),
                        user_id: user.id,
                        sender_name: Some(display_name(&user)),
                        text,
                        timestamp: chrono::Utc::now(),
                        reply_target: Some(msg.chat.id.to_string()),
                        callback_id: None,
                    };

                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send_typing(&self, target: &str) -> Result<(), MomentumError> {
        let chat_id: i64 = target.parse().map_err(|e| {
            MomentumError::Channel(format!("invalid telegram chat_id '{target}': {e}"))
        })?;
        self.send_chat_action(chat_id, "typing").await
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), MomentumError> {
        let chat_id_str = message
            .reply_target
            .as_deref()
            .ok_or_else(|| MomentumError::Channel("no reply_target on outgoing message".into()))?;

        let chat_id: i64 = chat_id_str.parse().map_err(|e| {
            MomentumError::Channel(format!("invalid telegram chat_id '{chat_id_str}': {e}"))
        })?;

        self.send_text(chat_id, &message.text, &message.buttons).await
    }

    async fn stop(&self) -> Result<(), MomentumError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}
