//! Telegram Bot API deserialization types.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TgResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgUpdate {
    pub update_id: i64,
    pub message: Option<TgMessage>,
    pub callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgMessage {
    pub message_id: i64,
    pub from: Option<TgUser>,
    pub chat: TgChat,
    pub text: Option<String>,
}

/// An inline keyboard button press.
#[derive(Debug, Deserialize)]
pub(crate) struct TgCallbackQuery {
    pub id: String,
    pub from: TgUser,
    pub message: Option<TgMessage>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TgChat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup", or "channel".
    #[serde(default, rename = "type")]
    pub chat_type: String,
}
