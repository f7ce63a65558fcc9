use crate::activity::{Activity, StoredActivity};
use crate::entity::activities;
use sea_orm::{Database, DbErr, EntityTrait, QueryOrder, QuerySelect, TransactionTrait};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_LIST_LIMIT: i64 = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Database path cannot be used in a connection URL: {0}")]
    InvalidPath(PathBuf),
}

/// Runs a store call on the blocking pool, folding a failed task into the
/// store's own error.
pub async fn run_blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// File-backed SQLite table of fetched activities.
///
/// Every operation opens its own connection and drops it before returning,
/// so no handle outlives a call.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    db_url: String,
    path: PathBuf,
}

impl ActivityStore {
    /// Opens (creating if needed) the store at `path` and syncs its schema.
    /// Safe to call repeatedly against the same file.
    ///
    /// The path ends up inside a `sqlite:` URL, so `?`, `#` and `%` are
    /// rejected up front.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if path.to_string_lossy().contains(['?', '#', '%']) {
            return Err(StoreError::InvalidPath(path.to_path_buf()));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db_url = format!("sqlite:{}?mode=rwc", path.display());

        let db = Database::connect(&db_url)?;
        db.get_schema_builder()
            .register(activities::Entity)
            .sync(&db)?;

        info!("Activity store ready at {}", path.display());
        Ok(Self {
            db_url,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn insert(&self, activity: &Activity) -> Result<StoredActivity, StoreError> {
        let db = Database::connect(&self.db_url)?;
        let txn = db.begin()?;

        let result = activities::Entity::insert(activity.clone().into_active_model()).exec(&txn)?;
        txn.commit()?;

        debug!("Stored activity #{}", result.last_insert_id);
        Ok(StoredActivity {
            id: result.last_insert_id,
            activity: activity.clone(),
        })
    }

    /// Up to `limit` records, newest first. A non-positive limit yields nothing.
    pub fn list_recent(&self, limit: i64) -> Result<Vec<StoredActivity>, StoreError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let db = Database::connect(&self.db_url)?;
        let rows = activities::Entity::find()
            .order_by_desc(activities::Column::Id)
            .limit(limit as u64)
            .all(&db)?;

        Ok(rows.into_iter().map(StoredActivity::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, ActivityStore) {
        let dir = TempDir::new().unwrap();
        let store = ActivityStore::open(&dir.path().join("activities.db")).unwrap();
        (dir, store)
    }

    fn named(name: &str) -> Activity {
        Activity {
            activity: Some(name.to_string()),
            kind: Some("test".into()),
            participants: Some(1),
            price: Some(0.5),
            accessibility: Some(0.3),
            ..Default::default()
        }
    }

    fn names(records: &[StoredActivity]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.activity.activity.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn insert_then_list_round_trips_every_field() {
        let (_dir, store) = test_store();
        let activity = Activity {
            activity: Some("Learn Express.js".into()),
            kind: Some("education".into()),
            participants: Some(1),
            price: Some(0.1),
            link: Some("https://expressjs.com/".into()),
            key: Some("3943509".into()),
            accessibility: Some(0.1),
        };

        let stored = store.insert(&activity).unwrap();
        let listed = store.list_recent(1).unwrap();

        assert!(stored.id > 0);
        assert_eq!(listed, vec![stored.clone()]);
        assert_eq!(listed[0].activity, activity);
    }

    #[test]
    fn absent_fields_persist_as_null() {
        let (_dir, store) = test_store();
        let activity = Activity {
            activity: Some("Test Activity".into()),
            ..Default::default()
        };

        store.insert(&activity).unwrap();
        let listed = store.list_recent(DEFAULT_LIST_LIMIT).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].activity.link, None);
        assert_eq!(listed[0].activity.key, None);
        assert_eq!(listed[0].activity.price, None);
    }

    #[test]
    fn ids_strictly_increase() {
        let (_dir, store) = test_store();

        let first = store.insert(&named("first")).unwrap();
        let second = store.insert(&named("second")).unwrap();
        let third = store.insert(&named("first")).unwrap();

        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert!(third.id > second.id);
    }

    #[test]
    fn list_recent_returns_newest_first() {
        let (_dir, store) = test_store();
        for name in ["A", "B", "C", "D", "E", "F", "G", "H", "I"] {
            store.insert(&named(name)).unwrap();
        }

        let latest = store.list_recent(5).unwrap();

        assert_eq!(names(&latest), ["I", "H", "G", "F", "E"]);
        assert!(latest.windows(2).all(|w| w[0].id > w[1].id));
    }

    #[test]
    fn list_recent_returns_all_when_fewer_than_limit() {
        let (_dir, store) = test_store();
        store.insert(&named("A")).unwrap();
        store.insert(&named("B")).unwrap();

        assert_eq!(names(&store.list_recent(5).unwrap()), ["B", "A"]);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_dir, store) = test_store();

        assert!(store.list_recent(1).unwrap().is_empty());
    }

    #[test]
    fn non_positive_limit_lists_nothing() {
        let (_dir, store) = test_store();
        store.insert(&named("A")).unwrap();

        assert!(store.list_recent(0).unwrap().is_empty());
        assert!(store.list_recent(-3).unwrap().is_empty());
    }

    #[test]
    fn reopening_keeps_schema_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activities.db");

        let store = ActivityStore::open(&path).unwrap();
        store.insert(&named("A")).unwrap();
        store.insert(&named("B")).unwrap();
        let before = store.list_recent(10).unwrap();

        let reopened = ActivityStore::open(&path).unwrap();
        let after = reopened.list_recent(10).unwrap();
        assert_eq!(before, after);

        let c = reopened.insert(&named("C")).unwrap();
        assert!(c.id > before[0].id);
    }

    #[test]
    fn opening_twice_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("activities.db");

        ActivityStore::open(&path).unwrap();
        let second = ActivityStore::open(&path).unwrap();
        ActivityStore::open(&path).unwrap();

        assert!(second.list_recent(DEFAULT_LIST_LIMIT).unwrap().is_empty());
        assert!(second.insert(&named("A")).unwrap().id > 0);
    }

    #[test]
    fn open_rejects_paths_that_break_the_url() {
        let dir = TempDir::new().unwrap();

        for name in ["what?.db", "a#b.db", "100%.db"] {
            let result = ActivityStore::open(&dir.path().join(name));
            assert!(matches!(result, Err(StoreError::InvalidPath(_))), "{}", name);
        }
    }

    #[tokio::test]
    async fn run_blocking_returns_the_call_result() {
        let value = run_blocking(|| Ok(42)).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn run_blocking_reports_a_panicked_task() {
        let result: Result<(), StoreError> = run_blocking(|| panic!("store call blew up")).await;
        assert!(matches!(result, Err(StoreError::Join(_))));
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("activities.db");

        let store = ActivityStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn open_fails_when_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = ActivityStore::open(&blocker.join("activities.db"));

        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
