use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming message from a channel: either command text or a button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific numeric user ID.
    pub user_id: i64,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    /// Message text, or the callback data of a pressed button.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Set when this message is a button press (the platform callback id).
    #[serde(default)]
    pub callback_id: Option<String>,
}

impl IncomingMessage {
    /// Whether this message came from an interactive button rather than typed text.
    pub fn is_button_press(&self) -> bool {
        self.callback_id.is_some()
    }
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Rows of labeled action buttons (rendered as an inline keyboard).
    #[serde(default)]
    pub buttons: Vec<Vec<Button>>,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl OutgoingMessage {
    /// Plain text reply to the sender of `incoming`.
    pub fn reply_to(incoming: &IncomingMessage, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            reply_target: incoming.reply_target.clone(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Vec<Button>>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// A labeled action attached to an outgoing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    /// Opaque payload delivered back as `IncomingMessage::text` when pressed.
    pub data: String,
}

impl Button {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}
