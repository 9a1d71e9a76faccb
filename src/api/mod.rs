pub mod auth;
pub mod bookings;
pub mod chats;
pub mod customers;
pub mod health;
pub mod products;
pub mod requests;
pub mod stores;
pub mod swagger;

use actix_web::{web, HttpResponse};

use crate::models::MessageResponse;
use crate::utils::AppError;

/// Map a service error onto the wire. Business rejections (duplicate
/// registration, bad credentials) travel as HTTP 200 with `success: false`,
/// which is what the front-end renders; real protocol errors get real
/// status codes.
pub(crate) fn error_response(error: &AppError) -> HttpResponse {
    let body = MessageResponse {
        success: false,
        message: Some(error.to_string()),
    };
    match error {
        AppError::Rejected(_) => HttpResponse::Ok().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
        AppError::StorageError(_) => HttpResponse::InternalServerError().json(body),
    }
}

/// Route table, shared by the server binary and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                // Auth
                .route("/customer-register", web::post().to(auth::customer_register))
                .route("/customer-login", web::post().to(auth::customer_login))
                .route("/register-shop", web::post().to(auth::register_shop))
                .route("/shopkeeper-login", web::post().to(auth::shopkeeper_login))
                // Directory
                .route("/stores", web::get().to(stores::get_stores))
                .route("/update-store", web::post().to(stores::update_store))
                .route("/customers", web::get().to(customers::get_customers))
                .route("/update-customer", web::post().to(customers::update_customer))
                // Catalog
                .route("/add-product", web::post().to(products::add_product))
                .route("/update-product", web::post().to(products::update_product))
                .route("/delete-product", web::post().to(products::delete_product))
                // Bookings
                .route("/bookings", web::get().to(bookings::get_bookings))
                .route("/book-item", web::post().to(bookings::book_item))
                .route(
                    "/update-booking-status",
                    web::post().to(bookings::update_booking_status),
                )
                // Requests
                .route("/requests", web::get().to(requests::get_requests))
                .route("/request-item", web::post().to(requests::request_item))
                // Chats
                .route("/chats", web::get().to(chats::get_chats))
                .route("/save-chat", web::post().to(chats::save_chat)),
        );
}
