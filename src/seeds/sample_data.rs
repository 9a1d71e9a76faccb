use chrono::{TimeZone, Utc};

use crate::database::JsonStore;
use crate::models::{AccountStatus, Customer, Product, Store, StoreCategory};
use crate::services::auth_service;
use crate::utils::AppError;

/// Seed three demo stores and one demo customer so a fresh install has
/// something to browse. Runs only when both collections are empty.
pub async fn seed_sample_data(db: &JsonStore) -> Result<(), AppError> {
    let has_stores = !db.stores().await.is_empty();
    let has_customers = !db.customers().await.is_empty();
    if has_stores || has_customers {
        log::info!("🌱 Sample data: existing records found — skipping seed");
        return Ok(());
    }

    log::info!("🌱 Sample data: seeding 3 stores and 1 customer...");

    let stores = sample_stores()?;
    db.update_stores(move |existing| {
        existing.extend(stores);
        Ok(())
    })
    .await?;

    let customer = sample_customer()?;
    db.update_customers(move |existing| {
        existing.push(customer);
        Ok(())
    })
    .await?;

    log::info!("   ✅ Demo shopkeeper login: +91 9876543210 / password123");
    log::info!("   ✅ Demo customer login:   +91 9876543213 / customer123");
    Ok(())
}

fn sample_stores() -> Result<Vec<Store>, AppError> {
    let registered = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    let product = |id: u64, name: &str, price: &str, available: bool| Product {
        id: Some(id),
        name: name.to_string(),
        price: price.to_string(),
        available,
        description: None,
    };

    Ok(vec![
        Store {
            id: 1,
            shop_name: "Sharma General Store".into(),
            owner_name: "Raj Sharma".into(),
            phone: "+91 9876543210".into(),
            email: "raj@sharma.com".into(),
            address: "123 Main Street, Sector 15".into(),
            pincode: "110001".into(),
            category: StoreCategory::Grocery,
            password: Some(auth_service::hash_password("password123")?),
            status: AccountStatus::Active,
            created_at: registered,
            products: vec![
                product(1, "Rice (1kg)", "₹80", true),
                product(2, "Dal (1kg)", "₹120", true),
                product(3, "Oil (1L)", "₹150", true),
                product(4, "Sugar (1kg)", "₹45", false),
            ],
        },
        Store {
            id: 2,
            shop_name: "City Medical Store".into(),
            owner_name: "Dr. Priya Patel".into(),
            phone: "+91 9876543211".into(),
            email: "priya@citymedical.com".into(),
            address: "456 Health Plaza, Medical District".into(),
            pincode: "110002".into(),
            category: StoreCategory::Medical,
            password: Some(auth_service::hash_password("medical123")?),
            status: AccountStatus::Active,
            created_at: registered,
            products: vec![
                product(1, "Paracetamol", "₹25", true),
                product(2, "Cough Syrup", "₹85", true),
                product(3, "Bandages", "₹30", true),
                product(4, "Thermometer", "₹200", true),
            ],
        },
        Store {
            id: 3,
            shop_name: "Tech Electronics Hub".into(),
            owner_name: "Amit Kumar".into(),
            phone: "+91 9876543212".into(),
            email: "amit@techhub.com".into(),
            address: "789 Electronics Market, Tech City".into(),
            pincode: "110003".into(),
            category: StoreCategory::Electronics,
            password: Some(auth_service::hash_password("tech123")?),
            status: AccountStatus::Active,
            created_at: registered,
            products: vec![
                product(1, "Mobile Charger", "₹299", true),
                product(2, "Earphones", "₹599", true),
                product(3, "Power Bank", "₹1299", false),
                product(4, "Phone Case", "₹199", true),
            ],
        },
    ])
}

fn sample_customer() -> Result<Customer, AppError> {
    Ok(Customer {
        id: 1,
        name: "John Doe".into(),
        phone: "+91 9876543213".into(),
        email: "john@example.com".into(),
        location: "Sector 15, Delhi".into(),
        password: Some(auth_service::hash_password("customer123")?),
        status: AccountStatus::Active,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoginRequest;

    #[tokio::test]
    async fn seed_runs_once_and_demo_logins_work() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        seed_sample_data(&db).await.unwrap();
        assert_eq!(db.stores().await.len(), 3);
        assert_eq!(db.customers().await.len(), 1);

        // A second pass must not duplicate anything.
        seed_sample_data(&db).await.unwrap();
        assert_eq!(db.stores().await.len(), 3);

        let shopkeeper = auth_service::login_shopkeeper(
            &db,
            &LoginRequest {
                phone: "+91 9876543210".into(),
                password: "password123".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(shopkeeper.shop_name, "Sharma General Store");
    }
}
