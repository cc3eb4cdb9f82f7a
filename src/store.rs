//! Persistence and identity collaborators.
//!
//! The editor core never talks to a database directly. It consumes a
//! [`ComponentStore`] (CRUD keyed by opaque ids) and an [`IdentityProvider`]
//! (present or absent user). Two stores ship with the crate: [`MemoryStore`]
//! for tests and demos, and [`FileStore`], which keeps one JSON document per
//! record in a directory.

use crate::model::{ComponentId, ComponentPatch, ComponentRecord, NewComponent};
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Opaque marker of an authenticated user. The core only checks presence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    /// Subject string, used by stores to record ownership.
    pub fn subject(&self) -> &str {
        &self.0
    }
}

/// Source of the current identity.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<UserToken>;
}

/// Identity fixed at construction. Used by the desktop studio and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<UserToken>);

impl StaticIdentity {
    pub fn signed_in(subject: impl Into<String>) -> Self {
        Self(Some(UserToken::new(subject)))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserToken> {
        self.0.clone()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("component '{0}' not found")]
    NotFound(String),
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed component document: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// CRUD contract of the external document store.
pub trait ComponentStore: Send + Sync {
    /// Fetches a record by id, including records in the trash.
    fn get(&self, id: &str) -> Result<ComponentRecord, StoreError>;

    /// Fetches published catalog entries by catalog identifier. Unknown
    /// identifiers are simply absent from the returned map.
    fn get_many(&self, catalog_ids: &[String]) -> Result<HashMap<String, ComponentRecord>, StoreError>;

    /// Applies a partial update; omitted fields keep their stored values.
    fn update(&self, user: &UserToken, id: &str, patch: &ComponentPatch) -> Result<(), StoreError>;

    fn create(&self, user: &UserToken, component: NewComponent) -> Result<ComponentId, StoreError>;

    /// Moves a record to the trash, stamping it with `now_ms`.
    fn soft_delete(&self, user: &UserToken, id: &str, now_ms: u64) -> Result<(), StoreError>;

    fn restore(&self, user: &UserToken, id: &str) -> Result<(), StoreError>;

    /// Trashed records owned by `user`.
    fn list_trash(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError>;

    /// Published, non-deleted records ordered by name.
    fn list_catalog(&self) -> Result<Vec<ComponentRecord>, StoreError>;

    /// Non-deleted records owned by `user`, ordered by name.
    fn list_owned(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError>;
}

fn new_id() -> ComponentId {
    let mut rng = rand::thread_rng();
    format!("{:016x}", rng.gen::<u64>())
}

fn is_catalog_entry(record: &ComponentRecord) -> bool {
    record.is_public && !record.is_deleted()
}

fn owned_by(record: &ComponentRecord, user: &UserToken) -> bool {
    record.owner.as_deref() == Some(user.subject())
}

// ===== In-memory store =====

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ComponentId, ComponentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with records, keyed by their own ids.
    pub fn with_records(records: impl IntoIterator<Item = ComponentRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { records: Mutex::new(map) }
    }

    /// Inserts or replaces a record as-is.
    pub fn put(&self, record: ComponentRecord) -> Result<(), StoreError> {
        self.lock()?.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<ComponentId, ComponentRecord>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ComponentRecord),
    {
        let mut records = self.lock()?;
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(record);
        Ok(())
    }
}

impl ComponentStore for MemoryStore {
    fn get(&self, id: &str) -> Result<ComponentRecord, StoreError> {
        self.lock()?
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get_many(&self, catalog_ids: &[String]) -> Result<HashMap<String, ComponentRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .values()
            .filter(|r| is_catalog_entry(r))
            .filter_map(|r| {
                let slug = r.catalog_id.as_ref()?;
                catalog_ids.contains(slug).then(|| (slug.clone(), r.clone()))
            })
            .collect())
    }

    fn update(&self, _user: &UserToken, id: &str, patch: &ComponentPatch) -> Result<(), StoreError> {
        self.modify(id, |record| patch.apply_to(record))
    }

    fn create(&self, user: &UserToken, component: NewComponent) -> Result<ComponentId, StoreError> {
        let id = new_id();
        let record = component.into_record(id.clone(), Some(user.subject().to_string()));
        self.lock()?.insert(id.clone(), record);
        Ok(id)
    }

    fn soft_delete(&self, _user: &UserToken, id: &str, now_ms: u64) -> Result<(), StoreError> {
        self.modify(id, |record| record.deleted_at = Some(now_ms))
    }

    fn restore(&self, _user: &UserToken, id: &str) -> Result<(), StoreError> {
        self.modify(id, |record| record.deleted_at = None)
    }

    fn list_trash(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut trash: Vec<ComponentRecord> = self
            .lock()?
            .values()
            .filter(|r| r.is_deleted() && owned_by(r, user))
            .cloned()
            .collect();
        trash.sort_by_key(|r| std::cmp::Reverse(r.deleted_at));
        Ok(trash)
    }

    fn list_catalog(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut catalog: Vec<ComponentRecord> = self
            .lock()?
            .values()
            .filter(|r| is_catalog_entry(r))
            .cloned()
            .collect();
        catalog.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(catalog)
    }

    fn list_owned(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut owned: Vec<ComponentRecord> = self
            .lock()?
            .values()
            .filter(|r| !r.is_deleted() && owned_by(r, user))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }
}

// ===== File-backed store =====

/// One `<id>.json` document per record inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store under the platform data directory (`<data_dir>/uiforge/components`).
    pub fn open_default() -> Result<Self, StoreError> {
        let base = dirs::data_dir()
            .ok_or_else(|| StoreError::Backend("no platform data directory".to_string()))?;
        Self::open(base.join("uiforge").join("components"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    fn read(&self, id: &str) -> Result<ComponentRecord, StoreError> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&self, record: &ComponentRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id)?;
        let text = serde_json::to_string_pretty(record)?;
        // Write to a sibling file first so a crash never leaves half a document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Inserts or replaces a record as-is.
    pub fn put(&self, record: &ComponentRecord) -> Result<(), StoreError> {
        self.write(record)
    }

    /// Every readable record. Unreadable documents are logged and skipped.
    pub fn all(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(StoreError::from)
                .and_then(|text| serde_json::from_str::<ComponentRecord>(&text).map_err(StoreError::from));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping unreadable component document {}: {}", path.display(), e),
            }
        }
        Ok(records)
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut ComponentRecord),
    {
        let mut record = self.read(id)?;
        f(&mut record);
        self.write(&record)
    }
}

impl ComponentStore for FileStore {
    fn get(&self, id: &str) -> Result<ComponentRecord, StoreError> {
        self.read(id)
    }

    fn get_many(&self, catalog_ids: &[String]) -> Result<HashMap<String, ComponentRecord>, StoreError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(is_catalog_entry)
            .filter_map(|r| {
                let slug = r.catalog_id.clone()?;
                catalog_ids.contains(&slug).then_some((slug, r))
            })
            .collect())
    }

    fn update(&self, _user: &UserToken, id: &str, patch: &ComponentPatch) -> Result<(), StoreError> {
        self.modify(id, |record| patch.apply_to(record))
    }

    fn create(&self, user: &UserToken, component: NewComponent) -> Result<ComponentId, StoreError> {
        let id = new_id();
        let record = component.into_record(id.clone(), Some(user.subject().to_string()));
        self.write(&record)?;
        Ok(id)
    }

    fn soft_delete(&self, _user: &UserToken, id: &str, now_ms: u64) -> Result<(), StoreError> {
        self.modify(id, |record| record.deleted_at = Some(now_ms))
    }

    fn restore(&self, _user: &UserToken, id: &str) -> Result<(), StoreError> {
        self.modify(id, |record| record.deleted_at = None)
    }

    fn list_trash(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut trash: Vec<ComponentRecord> = self
            .all()?
            .into_iter()
            .filter(|r| r.is_deleted() && owned_by(r, user))
            .collect();
        trash.sort_by_key(|r| std::cmp::Reverse(r.deleted_at));
        Ok(trash)
    }

    fn list_catalog(&self) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut catalog: Vec<ComponentRecord> = self.all()?.into_iter().filter(is_catalog_entry).collect();
        catalog.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(catalog)
    }

    fn list_owned(&self, user: &UserToken) -> Result<Vec<ComponentRecord>, StoreError> {
        let mut owned: Vec<ComponentRecord> = self
            .all()?
            .into_iter()
            .filter(|r| !r.is_deleted() && owned_by(r, user))
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }
}
