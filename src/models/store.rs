use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AccountStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreCategory {
    Grocery,
    Medical,
    Stationery,
    Electronics,
    General,
}

impl StoreCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            StoreCategory::Grocery => "Grocery Store",
            StoreCategory::Medical => "Medical Store",
            StoreCategory::Stationery => "Stationery Shop",
            StoreCategory::Electronics => "Electronics Shop",
            StoreCategory::General => "General Store",
        }
    }
}

impl fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            StoreCategory::Grocery => "grocery",
            StoreCategory::Medical => "medical",
            StoreCategory::Stationery => "stationery",
            StoreCategory::Electronics => "electronics",
            StoreCategory::General => "general",
        };
        f.write_str(tag)
    }
}

impl FromStr for StoreCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grocery" => Ok(StoreCategory::Grocery),
            "medical" => Ok(StoreCategory::Medical),
            "stationery" => Ok(StoreCategory::Stationery),
            "electronics" => Ok(StoreCategory::Electronics),
            "general" => Ok(StoreCategory::General),
            other => Err(format!("unknown store category: {}", other)),
        }
    }
}

/// Catalog entry. Price is a display string ("₹80") because shopkeepers type
/// it free-form and it is only ever shown back, never computed with.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub price: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Store {
    pub id: u64,
    pub shop_name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,
    pub category: StoreCategory,
    /// bcrypt hash. Never serialized once stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Store {
    /// Copy with the password hash removed, safe to put on the wire.
    pub fn sanitized(&self) -> Store {
        Store {
            password: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterShopRequest {
    pub shop_name: String,
    pub owner_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub pincode: String,
    pub category: StoreCategory,
    pub password: String,
    /// Omitted means "seed me the default catalog for my category".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterShopResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ShopkeeperLoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Store>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoresResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub stores: Vec<Store>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateStoreRequest {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AddProductRequest {
    pub store_id: u64,
    pub product: Product,
}

/// Products are addressed by their position in the store's list, matching
/// how the catalog is rendered.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateProductRequest {
    pub store_id: u64,
    pub product_index: usize,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteProductRequest {
    pub store_id: u64,
    pub product_index: usize,
}
