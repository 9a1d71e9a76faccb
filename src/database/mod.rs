use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Booking, Chat, Customer, ItemRequest, Store};
use crate::utils::AppError;

const STORES_FILE: &str = "stores.json";
const CUSTOMERS_FILE: &str = "customers.json";
const BOOKINGS_FILE: &str = "bookings.json";
const REQUESTS_FILE: &str = "requests.json";
const CHATS_FILE: &str = "chats.json";

#[derive(Default)]
struct Collections {
    stores: Vec<Store>,
    customers: Vec<Customer>,
    bookings: Vec<Booking>,
    requests: Vec<ItemRequest>,
    chats: Vec<Chat>,
}

/// Flat-file persistence: one JSON array per collection under a data
/// directory. Everything is held in memory behind one RwLock; each mutation
/// is staged on a copy and committed only after the file rewrite succeeds,
/// so readers never observe unpersisted state.
#[derive(Clone)]
pub struct JsonStore {
    dir: Arc<PathBuf>,
    inner: Arc<RwLock<Collections>>,
}

impl JsonStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| AppError::StorageError(format!("create {}: {}", dir.display(), e)))?;

        let collections = Collections {
            stores: load_collection(&dir.join(STORES_FILE))?,
            customers: load_collection(&dir.join(CUSTOMERS_FILE))?,
            bookings: load_collection(&dir.join(BOOKINGS_FILE))?,
            requests: load_collection(&dir.join(REQUESTS_FILE))?,
            chats: load_collection(&dir.join(CHATS_FILE))?,
        };

        log::info!(
            "📂 Data directory {} loaded: {} stores, {} customers, {} bookings, {} requests, {} chats",
            dir.display(),
            collections.stores.len(),
            collections.customers.len(),
            collections.bookings.len(),
            collections.requests.len(),
            collections.chats.len()
        );

        Ok(JsonStore {
            dir: Arc::new(dir),
            inner: Arc::new(RwLock::new(collections)),
        })
    }

    pub async fn stores(&self) -> Vec<Store> {
        self.inner.read().await.stores.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.inner.read().await.customers.clone()
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.inner.read().await.bookings.clone()
    }

    pub async fn requests(&self) -> Vec<ItemRequest> {
        self.inner.read().await.requests.clone()
    }

    pub async fn chats(&self) -> Vec<Chat> {
        self.inner.read().await.chats.clone()
    }

    pub async fn update_stores<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<Store>) -> Result<R, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut staged = guard.stores.clone();
        let result = f(&mut staged)?;
        persist_collection(&self.dir.join(STORES_FILE), &staged)?;
        guard.stores = staged;
        Ok(result)
    }

    pub async fn update_customers<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<Customer>) -> Result<R, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut staged = guard.customers.clone();
        let result = f(&mut staged)?;
        persist_collection(&self.dir.join(CUSTOMERS_FILE), &staged)?;
        guard.customers = staged;
        Ok(result)
    }

    pub async fn update_bookings<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<Booking>) -> Result<R, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut staged = guard.bookings.clone();
        let result = f(&mut staged)?;
        persist_collection(&self.dir.join(BOOKINGS_FILE), &staged)?;
        guard.bookings = staged;
        Ok(result)
    }

    pub async fn update_requests<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<ItemRequest>) -> Result<R, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut staged = guard.requests.clone();
        let result = f(&mut staged)?;
        persist_collection(&self.dir.join(REQUESTS_FILE), &staged)?;
        guard.requests = staged;
        Ok(result)
    }

    pub async fn update_chats<F, R>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&mut Vec<Chat>) -> Result<R, AppError>,
    {
        let mut guard = self.inner.write().await;
        let mut staged = guard.chats.clone();
        let result = f(&mut staged)?;
        persist_collection(&self.dir.join(CHATS_FILE), &staged)?;
        guard.chats = staged;
        Ok(result)
    }
}

/// Next server-assigned id. Max+1 rather than len+1: len+1 collides once a
/// record has ever been deleted.
pub fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::StorageError(format!("read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::StorageError(format!("parse {}: {}", path.display(), e)))
}

fn persist_collection<T: Serialize>(path: &Path, data: &[T]) -> Result<(), AppError> {
    let raw = serde_json::to_string_pretty(data)
        .map_err(|e| AppError::StorageError(format!("serialize {}: {}", path.display(), e)))?;
    // Write-then-rename so a crash mid-write never truncates the collection.
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, raw)
        .map_err(|e| AppError::StorageError(format!("write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| AppError::StorageError(format!("rename {}: {}", path.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountStatus, Customer};
    use chrono::Utc;

    fn customer(id: u64, phone: &str) -> Customer {
        Customer {
            id,
            name: format!("Customer {}", id),
            phone: phone.to_string(),
            email: format!("c{}@example.com", id),
            location: "Sector 15".to_string(),
            password: None,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        store
            .update_customers(|customers| {
                customers.push(customer(1, "+91 111"));
                Ok(())
            })
            .await
            .unwrap();

        let reopened = JsonStore::open(dir.path()).unwrap();
        let customers = reopened.customers().await;
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].phone, "+91 111");
    }

    #[tokio::test]
    async fn failed_mutation_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();

        let result = store
            .update_customers(|customers| {
                customers.push(customer(1, "+91 111"));
                Err::<(), _>(AppError::InvalidRequest("nope".into()))
            })
            .await;
        assert!(result.is_err());

        // The staged push was discarded: neither memory nor disk changed.
        assert!(store.customers().await.is_empty());
        let reopened = JsonStore::open(dir.path()).unwrap();
        assert!(reopened.customers().await.is_empty());
    }

    #[test]
    fn next_id_skips_reused_slots() {
        assert_eq!(next_id([].into_iter()), 1);
        assert_eq!(next_id([1, 2, 3].into_iter()), 4);
        // After deleting id 2 the next id must not collide with 3.
        assert_eq!(next_id([1, 3].into_iter()), 4);
    }
}
