//! Webhook payloads. Only the fields the bot reads are modelled; updates without a text
//! message are acknowledged and dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::{Chat, Message, MessageDirection, User};

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub edited_message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<IncomingUser>,
    pub chat: IncomingChat,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<IncomingMessage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingChat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl IncomingMessage {
    fn into_core(self) -> Option<Message> {
        let text = self.text?;
        let user = self
            .from
            .map(|u| User {
                id: u.id,
                username: u.username,
                first_name: u.first_name,
                last_name: u.last_name,
            })
            .unwrap_or(User {
                id: 0,
                username: None,
                first_name: None,
                last_name: None,
            });
        Some(Message {
            id: self.message_id.to_string(),
            user,
            chat: Chat {
                id: self.chat.id,
                chat_type: self.chat.kind,
            },
            content: text,
            message_type: "text".to_string(),
            direction: MessageDirection::Incoming,
            created_at: DateTime::<Utc>::from_timestamp(self.date, 0).unwrap_or_else(Utc::now),
            reply_to_message_id: self.reply_to_message.map(|m| m.message_id.to_string()),
        })
    }
}

/// Parses a webhook body. `Ok(None)` for well-formed updates that carry no text message.
pub fn parse_update(body: &[u8]) -> Result<Option<Message>, serde_json::Error> {
    let update: TelegramUpdate = serde_json::from_slice(body)?;
    Ok(update
        .message
        .or(update.edited_message)
        .and_then(IncomingMessage::into_core))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_message() {
        let body = br#"{
            "update_id": 10,
            "message": {
                "message_id": 55,
                "from": {"id": 42, "is_bot": false, "first_name": "Ada", "username": "ada"},
                "chat": {"id": -100, "type": "group"},
                "date": 1700000000,
                "text": "/help",
                "reply_to_message": {"message_id": 54, "chat": {"id": -100, "type": "group"}, "date": 1}
            }
        }"#;
        let msg = parse_update(body).unwrap().unwrap();
        assert_eq!(msg.id, "55");
        assert_eq!(msg.user.id, 42);
        assert_eq!(msg.user.username.as_deref(), Some("ada"));
        assert_eq!(msg.chat.id, -100);
        assert_eq!(msg.chat.chat_type, "group");
        assert_eq!(msg.content, "/help");
        assert_eq!(msg.reply_to_message_id.as_deref(), Some("54"));
        assert_eq!(msg.created_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_non_text_update_is_ignored() {
        let body = br#"{"update_id": 1, "message": {"message_id": 1, "chat": {"id": 1, "type": "private"}, "date": 1, "sticker": {}}}"#;
        assert!(parse_update(body).unwrap().is_none());

        let callback = br#"{"update_id": 2, "callback_query": {"id": "x"}}"#;
        assert!(parse_update(callback).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_update(b"not json").is_err());
    }
}
