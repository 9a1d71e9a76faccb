use chrono::Utc;

use crate::database::{next_id, JsonStore};
use crate::models::{BookItemRequest, Booking, BookingStatus, UpdateBookingStatusRequest};
use crate::utils::AppError;

/// Create a booking in `pending` state and return its id.
pub async fn book_item(db: &JsonStore, request: &BookItemRequest) -> Result<u64, AppError> {
    if request.item_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Item name required".into()));
    }

    db.update_bookings(|bookings| {
        let id = next_id(bookings.iter().map(|b| b.id));
        bookings.push(Booking {
            id,
            item_name: request.item_name.clone(),
            customer_name: request.customer_name.clone(),
            customer_phone: request.customer_phone.clone(),
            store_name: request.store_name.clone(),
            store_phone: request.store_phone.clone(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            status_updated_at: None,
        });
        Ok(id)
    })
    .await
}

pub async fn list_bookings(db: &JsonStore) -> Vec<Booking> {
    db.bookings().await
}

/// Set a booking's status and stamp the change time.
pub async fn update_status(
    db: &JsonStore,
    request: &UpdateBookingStatusRequest,
) -> Result<(), AppError> {
    db.update_bookings(|bookings| {
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == request.booking_id)
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))?;

        booking.status = request.status;
        booking.status_updated_at = Some(Utc::now());
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking_request() -> BookItemRequest {
        BookItemRequest {
            customer_name: "John Doe".into(),
            customer_phone: "+91 111".into(),
            store_name: "Sharma General Store".into(),
            store_phone: "+91 333".into(),
            item_name: "Rice (1kg)".into(),
        }
    }

    #[tokio::test]
    async fn booking_starts_pending_and_status_update_stamps_time() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let id = book_item(&db, &booking_request()).await.unwrap();
        let bookings = list_bookings(&db).await;
        assert_eq!(bookings[0].status, BookingStatus::Pending);
        assert!(bookings[0].status_updated_at.is_none());

        update_status(
            &db,
            &UpdateBookingStatusRequest {
                booking_id: id,
                status: BookingStatus::Accepted,
            },
        )
        .await
        .unwrap();

        let bookings = list_bookings(&db).await;
        assert_eq!(bookings[0].status, BookingStatus::Accepted);
        assert!(bookings[0].status_updated_at.is_some());
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let result = update_status(
            &db,
            &UpdateBookingStatusRequest {
                booking_id: 42,
                status: BookingStatus::Rejected,
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
