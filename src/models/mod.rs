pub mod booking;
pub mod chat;
pub mod customer;
pub mod request;
pub mod store;

pub use booking::*;
pub use chat::*;
pub use customer::*;
pub use request::*;
pub use store::*;

use serde::{Deserialize, Serialize};

/// Plain `{success, message}` envelope used by every mutation endpoint.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> MessageResponse {
        MessageResponse {
            success: true,
            message: Some(message.into()),
        }
    }
}
