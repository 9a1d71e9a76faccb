use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;

use crate::database::{next_id, JsonStore};
use crate::models::{
    AccountStatus, Customer, LoginRequest, RegisterCustomerRequest, RegisterShopRequest, Store,
};
use crate::services::store_service;
use crate::utils::AppError;

/// Register a new customer. Phone and email are unique across customers.
pub async fn register_customer(
    db: &JsonStore,
    request: &RegisterCustomerRequest,
) -> Result<u64, AppError> {
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password required".into()));
    }

    let password = hash_password(&request.password)?;

    db.update_customers(|customers| {
        for customer in customers.iter() {
            if customer.phone == request.phone {
                return Err(AppError::Rejected("Phone number already registered".into()));
            }
            if customer.email == request.email {
                return Err(AppError::Rejected("Email already registered".into()));
            }
        }

        let id = next_id(customers.iter().map(|c| c.id));
        customers.push(Customer {
            id,
            name: request.name.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
            location: request.location.clone(),
            password: Some(password),
            status: AccountStatus::Active,
            created_at: Utc::now(),
        });
        Ok(id)
    })
    .await
}

/// Register a new shop. When no product list is supplied the store starts
/// with the default catalog for its category.
pub async fn register_shop(db: &JsonStore, request: &RegisterShopRequest) -> Result<u64, AppError> {
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password required".into()));
    }

    let password = hash_password(&request.password)?;
    let products = match &request.products {
        Some(products) => products.clone(),
        None => store_service::default_products(request.category),
    };

    db.update_stores(|stores| {
        for store in stores.iter() {
            if store.phone == request.phone {
                return Err(AppError::Rejected("Phone number already registered".into()));
            }
            if store.email == request.email {
                return Err(AppError::Rejected("Email already registered".into()));
            }
        }

        let id = next_id(stores.iter().map(|s| s.id));
        stores.push(Store {
            id,
            shop_name: request.shop_name.clone(),
            owner_name: request.owner_name.clone(),
            phone: request.phone.clone(),
            email: request.email.clone(),
            address: request.address.clone(),
            pincode: request.pincode.clone(),
            category: request.category,
            password: Some(password),
            status: AccountStatus::Active,
            created_at: Utc::now(),
            products: products.clone(),
        });
        Ok(id)
    })
    .await
}

/// Customer login by phone + password. Returns the record with the password
/// hash stripped.
pub async fn login_customer(db: &JsonStore, request: &LoginRequest) -> Result<Customer, AppError> {
    let customers = db.customers().await;
    for customer in &customers {
        if customer.phone == request.phone && password_matches(&request.password, &customer.password)
        {
            return Ok(customer.sanitized());
        }
    }
    Err(AppError::Rejected("Invalid phone number or password".into()))
}

/// Shopkeeper login by phone + password. Returns the record with the
/// password hash stripped.
pub async fn login_shopkeeper(db: &JsonStore, request: &LoginRequest) -> Result<Store, AppError> {
    let stores = db.stores().await;
    for store in &stores {
        if store.phone == request.phone && password_matches(&request.password, &store.password) {
            return Ok(store.sanitized());
        }
    }
    Err(AppError::Rejected("Invalid phone number or password".into()))
}

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    hash(plain, DEFAULT_COST).map_err(|e| AppError::StorageError(format!("bcrypt: {}", e)))
}

fn password_matches(plain: &str, stored: &Option<String>) -> bool {
    match stored {
        Some(hash) => verify(plain, hash).unwrap_or(false),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoreCategory;

    fn customer_request(phone: &str, email: &str) -> RegisterCustomerRequest {
        RegisterCustomerRequest {
            name: "John Doe".into(),
            phone: phone.into(),
            email: email.into(),
            location: "Sector 15, Delhi".into(),
            password: "customer123".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let id = register_customer(&db, &customer_request("+91 111", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(id, 1);

        let user = login_customer(
            &db,
            &LoginRequest {
                phone: "+91 111".into(),
                password: "customer123".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "John Doe");
        // The hash never leaves the service.
        assert!(user.password.is_none());
    }

    #[tokio::test]
    async fn duplicate_phone_and_email_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        register_customer(&db, &customer_request("+91 111", "a@x.com"))
            .await
            .unwrap();

        let dup_phone = register_customer(&db, &customer_request("+91 111", "b@x.com")).await;
        assert!(matches!(dup_phone, Err(AppError::Rejected(m)) if m.contains("Phone number")));

        let dup_email = register_customer(&db, &customer_request("+91 222", "a@x.com")).await;
        assert!(matches!(dup_email, Err(AppError::Rejected(m)) if m.contains("Email")));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        register_customer(&db, &customer_request("+91 111", "a@x.com"))
            .await
            .unwrap();

        let result = login_customer(
            &db,
            &LoginRequest {
                phone: "+91 111".into(),
                password: "wrong".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Rejected(_))));
    }

    #[tokio::test]
    async fn shop_registration_defaults_catalog_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let id = register_shop(
            &db,
            &RegisterShopRequest {
                shop_name: "Sharma General Store".into(),
                owner_name: "Raj Sharma".into(),
                phone: "+91 333".into(),
                email: "raj@sharma.com".into(),
                address: "123 Main Street".into(),
                pincode: "110001".into(),
                category: StoreCategory::Grocery,
                password: "password123".into(),
                products: None,
            },
        )
        .await
        .unwrap();

        let stores = db.stores().await;
        let store = stores.iter().find(|s| s.id == id).unwrap();
        assert!(!store.products.is_empty());
        assert!(store.products.iter().any(|p| p.name.contains("Rice")));
    }
}
