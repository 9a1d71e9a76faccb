use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Completed => "completed",
        };
        f.write_str(tag)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "rejected" => Ok(BookingStatus::Rejected),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

/// A reservation of one catalog item. Customer and store are denormalized
/// by name and phone so both dashboards render without joins.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Booking {
    pub id: u64,
    pub item_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub store_name: String,
    pub store_phone: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookItemRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub store_name: String,
    pub store_phone: String,
    pub item_name: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookItemResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BookingsResponse {
    pub success: bool,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub booking_id: u64,
    pub status: BookingStatus,
}
