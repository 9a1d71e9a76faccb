use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account lifecycle flag. Nothing deactivates accounts today but the field
/// is persisted so a future admin surface can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    /// bcrypt hash. Never serialized once stripped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Copy with the password hash removed, safe to put on the wire.
    pub fn sanitized(&self) -> Customer {
        Customer {
            password: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegisterCustomerRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub password: String,
}

/// Shared by customer and shopkeeper login. Phone is the login id.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomerLoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Customer>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomersResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateCustomerRequest {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
