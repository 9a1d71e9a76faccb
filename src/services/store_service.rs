use std::collections::HashMap;

use crate::database::JsonStore;
use crate::models::{Product, Store, StoreCategory, UpdateStoreRequest};
use crate::utils::AppError;

lazy_static::lazy_static! {
    /// Starter catalog handed to newly registered shops, keyed by category.
    static ref DEFAULT_CATALOG: HashMap<StoreCategory, Vec<Product>> = {
        let mut catalog = HashMap::new();
        catalog.insert(StoreCategory::Grocery, starter(&[
            ("Rice (1kg)", "₹80"),
            ("Dal (1kg)", "₹120"),
            ("Oil (1L)", "₹150"),
            ("Sugar (1kg)", "₹45"),
        ]));
        catalog.insert(StoreCategory::Medical, starter(&[
            ("Paracetamol", "₹25"),
            ("Cough Syrup", "₹85"),
            ("Bandages", "₹30"),
            ("Antiseptic", "₹45"),
        ]));
        catalog.insert(StoreCategory::Stationery, starter(&[
            ("Notebook", "₹25"),
            ("Pen Set", "₹50"),
            ("Pencil Box", "₹75"),
            ("Eraser", "₹5"),
        ]));
        catalog.insert(StoreCategory::Electronics, starter(&[
            ("Mobile Charger", "₹299"),
            ("Earphones", "₹599"),
            ("Power Bank", "₹1299"),
            ("Phone Case", "₹199"),
        ]));
        catalog.insert(StoreCategory::General, starter(&[
            ("Soap", "₹30"),
            ("Shampoo", "₹120"),
            ("Toothpaste", "₹45"),
            ("Detergent", "₹80"),
        ]));
        catalog
    };
}

fn starter(items: &[(&str, &str)]) -> Vec<Product> {
    items
        .iter()
        .enumerate()
        .map(|(i, (name, price))| Product {
            id: Some(i as u64 + 1),
            name: (*name).to_string(),
            price: (*price).to_string(),
            available: true,
            description: None,
        })
        .collect()
}

pub fn default_products(category: StoreCategory) -> Vec<Product> {
    DEFAULT_CATALOG
        .get(&category)
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATALOG[&StoreCategory::General].clone())
}

/// All stores with password hashes stripped.
pub async fn list_stores(db: &JsonStore) -> Vec<Store> {
    db.stores().await.iter().map(Store::sanitized).collect()
}

/// Apply a profile edit. Only present fields change; the password field is
/// not part of the request type so it can never change through this path.
pub async fn update_store(db: &JsonStore, request: &UpdateStoreRequest) -> Result<(), AppError> {
    db.update_stores(|stores| {
        let store = stores
            .iter_mut()
            .find(|s| s.id == request.id)
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        if let Some(shop_name) = &request.shop_name {
            store.shop_name = shop_name.clone();
        }
        if let Some(owner_name) = &request.owner_name {
            store.owner_name = owner_name.clone();
        }
        if let Some(email) = &request.email {
            store.email = email.clone();
        }
        if let Some(address) = &request.address {
            store.address = address.clone();
        }
        if let Some(pincode) = &request.pincode {
            store.pincode = pincode.clone();
        }
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_starter_catalog() {
        for category in [
            StoreCategory::Grocery,
            StoreCategory::Medical,
            StoreCategory::Stationery,
            StoreCategory::Electronics,
            StoreCategory::General,
        ] {
            let products = default_products(category);
            assert_eq!(products.len(), 4);
            assert!(products.iter().all(|p| p.available));
        }
    }
}
