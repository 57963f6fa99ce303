use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::{Command, report_store_error};
use crate::model::{Item, ItemStatus};
use crate::store::ItemStore;
use crate::ui::ToastType;

/// Fetch every item from the store.
pub struct LoadItemsCmd {
    store: Arc<dyn ItemStore>,
}

impl LoadItemsCmd {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Command for LoadItemsCmd {
    fn name(&self) -> String {
        "Loading items".to_string()
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        match self.store.load_all().await {
            Ok(items) => action_tx.send(AppMessage::ItemsLoaded(items))?,
            Err(e) => report_store_error(&action_tx, &self.name(), &e)?,
        }
        Ok(())
    }
}

/// Persist a validated item, then reload.
pub struct CreateItemCmd {
    store: Arc<dyn ItemStore>,
    item: Item,
}

impl CreateItemCmd {
    pub fn new(store: Arc<dyn ItemStore>, item: Item) -> Self {
        Self { store, item }
    }
}

#[async_trait]
impl Command for CreateItemCmd {
    fn name(&self) -> String {
        format!("Reporting '{}'", self.item.title)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let name = self.name();
        let status = self.item.status_label().to_lowercase();
        if let Err(e) = self.store.create(self.item).await {
            return report_store_error(&action_tx, &name, &e);
        }
        action_tx.send(AppMessage::ItemCreated)?;
        action_tx.send(AppMessage::ShowToast {
            message: format!("Your {status} item has been posted"),
            toast_type: ToastType::Success,
        })?;
        Box::new(LoadItemsCmd::new(self.store)).execute(action_tx).await
    }
}

/// Mark an item lost or found.
pub struct SetStatusCmd {
    store: Arc<dyn ItemStore>,
    id: String,
    status: ItemStatus,
}

impl SetStatusCmd {
    pub fn new(store: Arc<dyn ItemStore>, id: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            store,
            id: id.into(),
            status,
        }
    }
}

#[async_trait]
impl Command for SetStatusCmd {
    fn name(&self) -> String {
        format!("Marking {} as {}", self.id, self.status)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let name = self.name();
        if let Err(e) = self.store.update_status(&self.id, self.status).await {
            return report_store_error(&action_tx, &name, &e);
        }
        action_tx.send(AppMessage::ShowToast {
            message: format!("Marked as {}", self.status),
            toast_type: ToastType::Info,
        })?;
        Box::new(LoadItemsCmd::new(self.store)).execute(action_tx).await
    }
}

pub struct DeleteItemCmd {
    store: Arc<dyn ItemStore>,
    id: String,
}

impl DeleteItemCmd {
    pub fn new(store: Arc<dyn ItemStore>, id: impl Into<String>) -> Self {
        Self {
            store,
            id: id.into(),
        }
    }
}

#[async_trait]
impl Command for DeleteItemCmd {
    fn name(&self) -> String {
        format!("Deleting {}", self.id)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let name = self.name();
        if let Err(e) = self.store.delete(&self.id).await {
            return report_store_error(&action_tx, &name, &e);
        }
        action_tx.send(AppMessage::ShowToast {
            message: "Report deleted".to_string(),
            toast_type: ToastType::Info,
        })?;
        Box::new(LoadItemsCmd::new(self.store)).execute(action_tx).await
    }
}
