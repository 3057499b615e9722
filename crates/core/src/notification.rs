//! # Notification Module
//!
//! Payload gửi cho notification collaborator. Delivery nằm ngoài engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    AnswerAccepted,
    AchievementUnlocked,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AnswerAccepted => "ANSWER_ACCEPTED",
            NotificationKind::AchievementUnlocked => "ACHIEVEMENT_UNLOCKED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default)]
    pub data: Value,
}

impl Notification {
    pub fn new(user_id: &str, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            kind,
            message: message.into(),
            action_url: None,
            data: Value::Null,
        }
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}
