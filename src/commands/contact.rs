use arboard::Clipboard;
use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::ui::ToastType;

/// Puts a reporter's contact email on the clipboard.
///
/// Terminals without a clipboard (SSH sessions, bare consoles) get the address
/// in a toast instead of an error dialog.
pub struct CopyContactCmd {
    email: String,
}

impl CopyContactCmd {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
        }
    }

    fn copied(&self) -> AppMessage {
        AppMessage::ShowToast {
            message: format!("Copied {} to the clipboard", self.email),
            toast_type: ToastType::Success,
        }
    }

    fn unavailable(&self) -> AppMessage {
        AppMessage::ShowToast {
            message: format!("Clipboard unavailable, contact: {}", self.email),
            toast_type: ToastType::Warning,
        }
    }
}

#[async_trait]
impl Command for CopyContactCmd {
    fn name(&self) -> String {
        "Copy contact".to_string()
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let copied = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(self.email.clone()));
        let message = match copied {
            Ok(()) => self.copied(),
            Err(e) => {
                warn!(error = %e, "Clipboard unavailable");
                self.unavailable()
            }
        };
        action_tx.send(message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_trimmed_email() {
        let cmd = CopyContactCmd::new("  ada@campus.edu ");
        assert_eq!(
            cmd.copied(),
            AppMessage::ShowToast {
                message: "Copied ada@campus.edu to the clipboard".to_string(),
                toast_type: ToastType::Success,
            }
        );
        assert_eq!(
            cmd.unavailable(),
            AppMessage::ShowToast {
                message: "Clipboard unavailable, contact: ada@campus.edu".to_string(),
                toast_type: ToastType::Warning,
            }
        );
    }
}
