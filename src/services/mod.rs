pub mod auth_service;
pub mod booking_service;
pub mod chat_service;
pub mod customer_service;
pub mod product_service;
pub mod request_service;
pub mod store_service;
