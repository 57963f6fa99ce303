//! Async commands for side effects.
//!
//! Commands run outside the main event loop. Screens emit requests as
//! [`AppMessage`]s, the App turns them into commands and spawns them; results
//! come back over the same channel.

mod contact;
mod items;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::app::AppMessage;
use crate::store::StoreError;

pub use contact::CopyContactCmd;
pub use items::{CreateItemCmd, DeleteItemCmd, LoadItemsCmd, SetStatusCmd};

/// Async command that performs a side effect.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logs and error messages.
    fn name(&self) -> String;

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()>;
}

/// Log a store failure and show its user-facing message.
fn report_store_error(
    action_tx: &UnboundedSender<AppMessage>,
    command: &str,
    err: &StoreError,
) -> Result<()> {
    warn!(command, error = %err, "Store operation failed");
    action_tx.send(AppMessage::DisplayError(err.user_message()))?;
    Ok(())
}
