//! Message sending: text, inline keyboards, chat actions, command registration.

use super::TelegramChannel;
use momentum_core::error::MomentumError;
use momentum_core::message::Button;
use tracing::{info, warn};

/// Telegram's hard limit on message length.
const MAX_MESSAGE_LEN: usize = 4096;

impl TelegramChannel {
    /// Send a text message to a specific chat, attaching `buttons` as an
    /// inline keyboard on the final chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        buttons: &[Vec<Button>],
    ) -> Result<(), MomentumError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
                "parse_mode": "Markdown",
            });

            if i == last && !buttons.is_empty() {
                body["reply_markup"] = serde_json::json!({
                    "inline_keyboard": buttons
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|b| {
                                    serde_json::json!({
                                        "text": b.label,
                                        "callback_data": b.data,
                                    })
                                })
                                .collect::<Vec<_>>()
                        })
                        .collect::<Vec<_>>(),
                });
            }

            let url = format!("{}/sendMessage", self.base_url);
            let resp = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| MomentumError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                if error_text.contains("can't parse entities") {
                    warn!("Markdown parse failed, retrying as plain text: {error_text}");
                    if let Some(obj) = body.as_object_mut() {
                        obj.remove("parse_mode");
                    }
                    let plain_resp = self
                        .client
                        .post(format!("{}/sendMessage", self.base_url))
                        .json(&body)
                        .send()
                        .await
                        .map_err(|e| {
                            MomentumError::Channel(format!("telegram send (plain) failed: {e}"))
                        })?;
                    if !plain_resp.status().is_success() {
                        let plain_err = plain_resp.text().await.unwrap_or_default();
                        return Err(MomentumError::Channel(format!(
                            "telegram send (plain fallback) failed: {plain_err}"
                        )));
                    }
                } else {
                    return Err(MomentumError::Channel(format!(
                        "telegram send failed ({status}): {error_text}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Send a chat action (e.g. "typing") to show the bot is processing.
    pub(crate) async fn send_chat_action(
        &self,
        chat_id: i64,
        action: &str,
    ) -> Result<(), MomentumError> {
        let url = format!("{}/sendChatAction", self.base_url);
        let body = serde_json::json!({ "chat_id": chat_id, "action": action });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MomentumError::Channel(format!("telegram chat action failed: {e}")))?;

        Ok(())
    }

    /// Acknowledge a callback query so the client stops showing a spinner.
    /// Best-effort: failures are logged, not propagated.
    pub(crate) async fn answer_callback(
        client: &reqwest::Client,
        base_url: &str,
        callback_id: &str,
    ) {
        let url = format!("{base_url}/answerCallbackQuery");
        let body = serde_json::json!({ "callback_query_id": callback_id });
        if let Err(e) = client.post(&url).json(&body).send().await {
            warn!("failed to answer callback query: {e}");
        }
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "help", "description": "Show available commands" },
                { "command": "dashboard", "description": "Today's habits and tasks at a glance" },
                { "command": "stats", "description": "Your productivity statistics" },
                { "command": "add_habit", "description": "Add a habit: name | description | category | difficulty" },
                { "command": "habits", "description": "List your habits" },
                { "command": "done", "description": "Mark a habit done by list number" },
                { "command": "add_task", "description": "Add a task: title | description | priority | due" },
                { "command": "tasks", "description": "List your open tasks" },
                { "command": "complete", "description": "Complete a task by list number" },
                { "command": "add_note", "description": "Add a note: title | content | category" },
                { "command": "notes", "description": "List your notes" },
                { "command": "edit_note", "description": "Rewrite a note: number | new content" },
                { "command": "mood", "description": "Log your mood: awesome/happy/neutral/sad/angry" },
                { "command": "moods", "description": "Your mood log for the last 7 days" },
                { "command": "achievements", "description": "Achievements you have unlocked" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}

/// Split a long message into chunks that respect Telegram's limit.
pub(crate) fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // Align the cut with a char boundary so multi-byte text never splits
        // mid-character.
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}
