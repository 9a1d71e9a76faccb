use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{
    Customer, Participant, ParticipantKind, Product, Store, UpdateCustomerRequest,
    UpdateStoreRequest,
};

/// The logged-in user, whichever side of the counter they are on. Persisted
/// verbatim so the next CLI invocation picks up exactly what the server
/// returned at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "current_user_type", content = "current_user", rename_all = "lowercase")]
pub enum SessionUser {
    Customer(Customer),
    Shopkeeper(Store),
}

impl SessionUser {
    pub fn role(&self) -> ParticipantKind {
        match self {
            SessionUser::Customer(_) => ParticipantKind::Customer,
            SessionUser::Shopkeeper(_) => ParticipantKind::Shopkeeper,
        }
    }

    pub fn participant(&self) -> Participant {
        match self {
            SessionUser::Customer(c) => Participant::customer(c.id),
            SessionUser::Shopkeeper(s) => Participant::shopkeeper(s.id),
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            SessionUser::Customer(c) => c.id,
            SessionUser::Shopkeeper(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SessionUser::Customer(c) => &c.name,
            SessionUser::Shopkeeper(s) => &s.owner_name,
        }
    }

    pub fn phone(&self) -> &str {
        match self {
            SessionUser::Customer(c) => &c.phone,
            SessionUser::Shopkeeper(s) => &s.phone,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match self {
            SessionUser::Customer(c) => Some(c),
            SessionUser::Shopkeeper(_) => None,
        }
    }

    pub fn as_store(&self) -> Option<&Store> {
        match self {
            SessionUser::Customer(_) => None,
            SessionUser::Shopkeeper(s) => Some(s),
        }
    }

    /// Mirror a successful profile edit into the cached record so the next
    /// render shows it without a refetch.
    pub fn apply_customer_update(&mut self, update: &UpdateCustomerRequest) {
        if let SessionUser::Customer(c) = self {
            if let Some(name) = &update.name {
                c.name = name.clone();
            }
            if let Some(email) = &update.email {
                c.email = email.clone();
            }
            if let Some(location) = &update.location {
                c.location = location.clone();
            }
        }
    }

    pub fn apply_store_update(&mut self, update: &UpdateStoreRequest) {
        if let SessionUser::Shopkeeper(s) = self {
            if let Some(shop_name) = &update.shop_name {
                s.shop_name = shop_name.clone();
            }
            if let Some(owner_name) = &update.owner_name {
                s.owner_name = owner_name.clone();
            }
            if let Some(email) = &update.email {
                s.email = email.clone();
            }
            if let Some(address) = &update.address {
                s.address = address.clone();
            }
            if let Some(pincode) = &update.pincode {
                s.pincode = pincode.clone();
            }
        }
    }

    /// Mirror catalog edits into the cached store. No-ops for customers.
    pub fn push_product(&mut self, product: Product) {
        if let SessionUser::Shopkeeper(s) = self {
            s.products.push(product);
        }
    }

    pub fn set_product(&mut self, index: usize, product: Product) {
        if let SessionUser::Shopkeeper(s) = self {
            if let Some(slot) = s.products.get_mut(index) {
                let original_id = slot.id;
                *slot = product;
                if original_id.is_some() {
                    slot.id = original_id;
                }
            }
        }
    }

    pub fn remove_product(&mut self, index: usize) {
        if let SessionUser::Shopkeeper(s) = self {
            if index < s.products.len() {
                s.products.remove(index);
            }
        }
    }
}

/// Session persistence: one JSON file, written on login, removed on logout.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> SessionStore {
        SessionStore { path: path.into() }
    }

    /// Platform data dir, e.g. `~/.local/share/kirana-market/session.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kirana-market")
            .join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<SessionUser>, String> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("read {}: {}", self.path.display(), e))?;
        let session = serde_json::from_str(&raw)
            .map_err(|e| format!("parse {}: {}", self.path.display(), e))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &SessionUser) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("create {}: {}", parent.display(), e))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| format!("serialize session: {}", e))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| format!("write {}: {}", self.path.display(), e))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), String> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("remove {}: {}", self.path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountStatus;
    use chrono::Utc;

    fn customer() -> Customer {
        Customer {
            id: 7,
            name: "John Doe".into(),
            phone: "+91 111".into(),
            email: "john@example.com".into(),
            location: "Sector 15".into(),
            password: None,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn saved_session_mirrors_login_result() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&SessionUser::Customer(customer())).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.role(), ParticipantKind::Customer);
        assert_eq!(loaded.id(), 7);
        assert_eq!(loaded.name(), "John Doe");

        // The persisted form carries the role tag alongside the record.
        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["current_user_type"], "customer");
        assert_eq!(value["current_user"]["phone"], "+91 111");
    }

    #[test]
    fn clear_removes_the_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.save(&SessionUser::Customer(customer())).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing an already-cleared session is fine.
        store.clear().unwrap();
    }

    #[test]
    fn product_cache_mutations_track_catalog_edits() {
        let mut session = SessionUser::Shopkeeper(Store {
            id: 1,
            shop_name: "Tech Hub".into(),
            owner_name: "Amit Kumar".into(),
            phone: "+91 555".into(),
            email: "amit@techhub.com".into(),
            address: "789 Electronics Market".into(),
            pincode: "110003".into(),
            category: crate::models::StoreCategory::Electronics,
            password: None,
            status: AccountStatus::Active,
            created_at: Utc::now(),
            products: Vec::new(),
        });

        session.push_product(Product {
            id: Some(1),
            name: "Earphones".into(),
            price: "₹599".into(),
            available: true,
            description: None,
        });
        session.set_product(
            0,
            Product {
                id: None,
                name: "Earphones Pro".into(),
                price: "₹899".into(),
                available: true,
                description: None,
            },
        );

        let store = session.as_store().unwrap();
        assert_eq!(store.products[0].name, "Earphones Pro");
        // Replacement keeps the server-assigned id.
        assert_eq!(store.products[0].id, Some(1));

        session.remove_product(0);
        assert!(session.as_store().unwrap().products.is_empty());
    }
}
