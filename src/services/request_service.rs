use chrono::Utc;

use crate::database::{next_id, JsonStore};
use crate::models::{ItemRequest, RequestItemRequest};
use crate::utils::AppError;

/// Create an item request in `pending` state and return its id.
pub async fn request_item(db: &JsonStore, request: &RequestItemRequest) -> Result<u64, AppError> {
    if request.item_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Item name required".into()));
    }

    let id = db
        .update_requests(|requests| {
            let id = next_id(requests.iter().map(|r| r.id));
            requests.push(ItemRequest {
                id,
                item_name: request.item_name.clone(),
                quantity: request.quantity.clone(),
                description: request.description.clone(),
                target_store: request.target_store.clone(),
                customer_name: request.customer_name.clone(),
                customer_phone: request.customer_phone.clone(),
                customer_location: request.customer_location.clone(),
                status: "pending".to_string(),
                created_at: Utc::now(),
            });
            Ok(id)
        })
        .await?;

    notify_matching_stores(db, request).await;
    Ok(id)
}

pub async fn list_requests(db: &JsonStore) -> Vec<ItemRequest> {
    db.requests().await
}

/// Notification hook: log which stores already carry a matching product.
/// A real deployment would push to the shopkeepers here.
async fn notify_matching_stores(db: &JsonStore, request: &RequestItemRequest) {
    let wanted = request.item_name.to_lowercase();
    let matching: Vec<String> = db
        .stores()
        .await
        .iter()
        .filter(|store| {
            store
                .products
                .iter()
                .any(|p| p.name.to_lowercase().contains(&wanted))
        })
        .map(|store| store.shop_name.clone())
        .collect();

    log::info!(
        "🔔 Item '{}' requested by {} — {} matching store(s): {:?}",
        request.item_name,
        request.customer_name,
        matching.len(),
        matching
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ALL_STORES;

    #[tokio::test]
    async fn request_is_created_pending() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let id = request_item(
            &db,
            &RequestItemRequest {
                item_name: "Thermometer".into(),
                quantity: "1".into(),
                description: Some("Digital preferred".into()),
                target_store: ALL_STORES.into(),
                customer_name: "John Doe".into(),
                customer_phone: "+91 111".into(),
                customer_location: "Sector 15".into(),
            },
        )
        .await
        .unwrap();

        let requests = list_requests(&db).await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, id);
        assert_eq!(requests[0].status, "pending");
        assert_eq!(requests[0].target_store, ALL_STORES);
    }

    #[tokio::test]
    async fn empty_item_name_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let result = request_item(
            &db,
            &RequestItemRequest {
                item_name: "  ".into(),
                quantity: "1".into(),
                description: None,
                target_store: ALL_STORES.into(),
                customer_name: "John Doe".into(),
                customer_phone: "+91 111".into(),
                customer_location: "Sector 15".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
