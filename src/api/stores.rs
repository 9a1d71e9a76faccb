use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{MessageResponse, StoresResponse, UpdateStoreRequest};
use crate::services::store_service;

#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Stores",
    responses(
        (status = 200, description = "All stores, passwords stripped", body = StoresResponse)
    )
)]
pub async fn get_stores(db: web::Data<JsonStore>) -> HttpResponse {
    let stores = store_service::list_stores(&db).await;
    HttpResponse::Ok().json(StoresResponse {
        success: true,
        message: None,
        stores,
    })
}

#[utoipa::path(
    post,
    path = "/api/update-store",
    tag = "Stores",
    request_body = UpdateStoreRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 404, description = "Unknown store id", body = MessageResponse)
    )
)]
pub async fn update_store(
    db: web::Data<JsonStore>,
    request: web::Json<UpdateStoreRequest>,
) -> HttpResponse {
    log::info!("✏️  POST /api/update-store - id: {}", request.id);

    match store_service::update_store(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Store updated successfully")),
        Err(e) => {
            log::warn!("❌ Store update failed: {}", e);
            error_response(&e)
        }
    }
}
