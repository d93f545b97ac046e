//! Dashboard notification models.

use serde::{Deserialize, Serialize};

/// Category of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A request was created
    New,
    /// A request changed state
    Update,
    /// Something needs attention
    Alert,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::New => "new",
            NotificationKind::Update => "update",
            NotificationKind::Alert => "alert",
        }
    }
}

/// An entry in the notification drawer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Unique notification ID
    pub id: String,
    /// Message text
    pub message: String,
    /// Relative display time (e.g., "2 hours ago"), not a real timestamp
    pub time: String,
    /// Category
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        time: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            time: time.into(),
            kind,
        }
    }
}
