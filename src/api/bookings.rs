use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{
    BookItemRequest, BookItemResponse, BookingsResponse, MessageResponse,
    UpdateBookingStatusRequest,
};
use crate::services::booking_service;

#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    responses(
        (status = 200, description = "All bookings", body = BookingsResponse)
    )
)]
pub async fn get_bookings(db: web::Data<JsonStore>) -> HttpResponse {
    log::info!("📋 GET /api/bookings");

    let bookings = booking_service::list_bookings(&db).await;
    HttpResponse::Ok().json(BookingsResponse {
        success: true,
        bookings,
    })
}

#[utoipa::path(
    post,
    path = "/api/book-item",
    tag = "Bookings",
    request_body = BookItemRequest,
    responses(
        (status = 200, description = "Item booked", body = BookItemResponse),
        (status = 404, description = "Unknown store id", body = MessageResponse)
    )
)]
pub async fn book_item(
    db: web::Data<JsonStore>,
    request: web::Json<BookItemRequest>,
) -> HttpResponse {
    log::info!(
        "🛒 POST /api/book-item - item: {}, store: {}",
        request.item_name,
        request.store_name
    );

    match booking_service::book_item(&db, &request).await {
        Ok(booking_id) => {
            log::info!("✅ Booking {} created", booking_id);
            HttpResponse::Ok().json(BookItemResponse {
                success: true,
                message: Some("Item booked successfully".to_string()),
                booking_id: Some(booking_id),
            })
        }
        Err(e) => {
            log::warn!("❌ Booking failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/update-booking-status",
    tag = "Bookings",
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 404, description = "Unknown booking id", body = MessageResponse)
    )
)]
pub async fn update_booking_status(
    db: web::Data<JsonStore>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> HttpResponse {
    log::info!(
        "🔄 POST /api/update-booking-status - booking: {}, status: {}",
        request.booking_id,
        request.status
    );

    match booking_service::update_status(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Booking status updated")),
        Err(e) => {
            log::warn!("❌ Status update failed: {}", e);
            error_response(&e)
        }
    }
}
