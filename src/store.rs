//! Item persistence and change feed.
//!
//! Reports live in a single JSON array file. [`JsonFileStore`] reads it whole,
//! rewrites it atomically on every mutation, and [`watch`] turns outside edits
//! to the file into [`AppMessage::ItemsLoaded`] pushes.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::AppMessage;
use crate::model::{Item, ItemStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid item file: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode items for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("item {0} not found")]
    NotFound(String),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Message shown in the error dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
                "You don't have permission to perform this action.".to_string()
            }
            Self::Io { .. } => "Item store temporarily unavailable. Please try again later.".to_string(),
            Self::Parse { .. } => "The item file contains invalid data. Please check it and reload.".to_string(),
            Self::Serialize { .. } => "The item could not be saved. Please try again.".to_string(),
            Self::NotFound(_) => "The requested item was not found.".to_string(),
        }
    }
}

/// Source of lost & found reports.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, most recently created first.
    async fn load_all(&self) -> Result<Vec<Item>, StoreError>;

    /// Persist a new item and return its assigned id.
    async fn create(&self, item: Item) -> Result<String, StoreError>;

    async fn update_status(&self, id: &str, status: ItemStatus) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<Item>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, items: &[Item]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }

        let json = serde_json::to_string_pretty(items).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                warn!(path = %tmp.display(), error = %cleanup, "Failed to remove temporary item file");
            }
            return Err(StoreError::io(&self.path, e));
        }
        Ok(())
    }

    async fn modify<F>(&self, id: &str, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<Item>, usize) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read().await?;
        let index = items
            .iter()
            .position(|item| item.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        apply(&mut items, index);
        self.write(&items).await
    }
}

#[async_trait]
impl ItemStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = self.read().await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = items.len(), path = %self.path.display(), "Loaded items");
        Ok(items)
    }

    async fn create(&self, mut item: Item) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.read().await?;

        let id = next_id();
        let now = Utc::now();
        item.id = Some(id.clone());
        item.created_at = now;
        item.updated_at = now;
        items.push(item);

        self.write(&items).await?;
        info!(%id, "Created item");
        Ok(id)
    }

    async fn update_status(&self, id: &str, status: ItemStatus) -> Result<(), StoreError> {
        self.modify(id, |items, index| {
            let item = &mut items[index];
            item.status = Some(status);
            item.updated_at = Utc::now();
        })
        .await?;
        info!(%id, %status, "Updated item status");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.modify(id, |items, index| {
            items.remove(index);
        })
        .await?;
        info!(%id, "Deleted item");
        Ok(())
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique hex id from the current time and a process-wide counter.
fn next_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos());
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{nanos:x}{:04x}", count & 0xffff)
}

/// Change feed over a [`JsonFileStore`].
///
/// Polls the file's modification time every `poll` and pushes the full item
/// list whenever it changes. Runs until `token` is cancelled or the receiver
/// is dropped.
pub async fn watch(
    store: Arc<JsonFileStore>,
    tx: UnboundedSender<AppMessage>,
    poll: Duration,
    token: CancellationToken,
) {
    let mut last_seen = modified(store.path()).await;
    let mut interval = tokio::time::interval(poll);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let current = modified(store.path()).await;
        if current == last_seen {
            continue;
        }
        last_seen = current;

        match store.load_all().await {
            Ok(items) => {
                debug!(count = items.len(), "Item file changed");
                if tx.send(AppMessage::ItemsLoaded(items)).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "Failed to reload items after change"),
        }
    }
    debug!("Item watcher stopped");
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|meta| meta.modified())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    fn store_in(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("data").join("items.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut item = fixtures::lost("", "Black Wallet", "2024-03-01");
        item.id = None;
        let id = store.create(item).await.unwrap();

        let items = store.load_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_deref(), Some(id.as_str()));
        assert_eq!(items[0].title, "Black Wallet");
        assert!(!dir.path().join("data").join("items.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let a = store.create(fixtures::lost("", "A", "2024-01-01")).await.unwrap();
        let b = store.create(fixtures::lost("", "B", "2024-01-01")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_load_all_orders_newest_created_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create(fixtures::lost("", "First", "2024-01-01")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        store.create(fixtures::found("", "Second", "2024-01-01")).await.unwrap();

        let titles: Vec<_> = store
            .load_all()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_update_status_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = store.create(fixtures::lost("", "Keys", "2024-01-01")).await.unwrap();

        store.update_status(&id, ItemStatus::Found).await.unwrap();
        let items = store.load_all().await.unwrap();
        assert_eq!(items[0].status, Some(ItemStatus::Found));

        store.delete(&id).await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.create(fixtures::lost("", "Keys", "2024-01-01")).await.unwrap();

        let err = store.delete("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "missing"));
        assert_eq!(err.user_message(), "The requested item was not found.");
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the item file should be makes the rename fail.
        let path = dir.path().join("items.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store
            .write(&[fixtures::lost("a", "Keys", "2024-01-01")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!dir.path().join("items.json.tmp").exists());
    }

    #[test]
    fn test_encoding_failure_is_not_reported_as_bad_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = StoreError::Serialize {
            path: PathBuf::from("items.json"),
            source,
        };
        assert!(err.to_string().starts_with("cannot encode items for items.json"));
        assert_eq!(err.user_message(), "The item could not be saved. Please try again.");
    }

    #[tokio::test]
    async fn test_reads_externally_written_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(
            &path,
            r#"[{"id":"x1","title":"Umbrella","status":"lost","dateReported":"2024-05-02"}]"#,
        )
        .unwrap();

        let items = JsonFileStore::new(&path).load_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_lost());
        assert_eq!(items[0].category, "");
    }

    #[tokio::test]
    async fn test_watch_pushes_on_change_and_stops_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let task = tokio::spawn(watch(
            store.clone(),
            tx,
            Duration::from_millis(10),
            token.clone(),
        ));

        store.create(fixtures::lost("", "Laptop", "2024-01-01")).await.unwrap();

        let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match message {
            AppMessage::ItemsLoaded(items) => assert_eq!(items[0].title, "Laptop"),
            other => panic!("unexpected message: {other:?}"),
        }

        token.cancel();
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
    }
}
