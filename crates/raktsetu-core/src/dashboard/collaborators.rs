//! Capabilities the host UI provides to the dashboard.

use thiserror::Error;

/// Which destructive or session action a prompt guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ConfirmAction {
    DeleteRequest,
    ResetData,
    Logout,
}

/// A yes/no question put to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub action: ConfirmAction,
    pub title: String,
    pub text: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmPrompt {
    pub fn delete_request(rtid: &str) -> Self {
        Self {
            action: ConfirmAction::DeleteRequest,
            title: "Delete Request?".into(),
            text: format!("Are you sure you want to delete {rtid}?"),
            confirm_label: "Yes, delete it".into(),
            cancel_label: "Cancel".into(),
        }
    }

    pub fn reset_data() -> Self {
        Self {
            action: ConfirmAction::ResetData,
            title: "Reset Mock Data?".into(),
            text: "This will restore the original mock data.".into(),
            confirm_label: "Yes, reset".into(),
            cancel_label: "Cancel".into(),
        }
    }

    pub fn logout() -> Self {
        Self {
            action: ConfirmAction::Logout,
            title: "Logout Confirmation".into(),
            text: "Are you sure you want to log out?".into(),
            confirm_label: "Yes, logout".into(),
            cancel_label: "Cancel".into(),
        }
    }
}

/// Short informational message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Clipboard write failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Asks the operator to confirm an action.
pub trait Prompter {
    /// `true` only on an affirmative answer.
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

/// Writes text to the system clipboard.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Presents toasts and alerts.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}
