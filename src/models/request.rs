use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel target meaning the request is broadcast to every store.
pub const ALL_STORES: &str = "All Stores";

/// A customer asking for an item no store currently lists. Quantity is
/// free-form text ("2kg", "one strip") so nothing gets lost in parsing.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ItemRequest {
    pub id: u64,
    pub item_name: String,
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_store: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RequestItemRequest {
    pub item_name: String,
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_store: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_location: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RequestItemResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RequestsResponse {
    pub success: bool,
    #[serde(default)]
    pub requests: Vec<ItemRequest>,
}
