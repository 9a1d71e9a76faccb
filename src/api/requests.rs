use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{MessageResponse, RequestItemRequest, RequestItemResponse, RequestsResponse};
use crate::services::request_service;

#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "Requests",
    responses(
        (status = 200, description = "All item requests", body = RequestsResponse)
    )
)]
pub async fn get_requests(db: web::Data<JsonStore>) -> HttpResponse {
    log::info!("📋 GET /api/requests");

    let requests = request_service::list_requests(&db).await;
    HttpResponse::Ok().json(RequestsResponse {
        success: true,
        requests,
    })
}

#[utoipa::path(
    post,
    path = "/api/request-item",
    tag = "Requests",
    request_body = RequestItemRequest,
    responses(
        (status = 200, description = "Request recorded", body = RequestItemResponse),
        (status = 400, description = "Missing item name", body = MessageResponse)
    )
)]
pub async fn request_item(
    db: web::Data<JsonStore>,
    request: web::Json<RequestItemRequest>,
) -> HttpResponse {
    log::info!(
        "🙋 POST /api/request-item - item: {}, target: {}",
        request.item_name,
        request.target_store
    );

    match request_service::request_item(&db, &request).await {
        Ok(request_id) => HttpResponse::Ok().json(RequestItemResponse {
            success: true,
            message: Some("Request submitted successfully".to_string()),
            request_id: Some(request_id),
        }),
        Err(e) => {
            log::warn!("❌ Item request failed: {}", e);
            error_response(&e)
        }
    }
}
