use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{AddProductRequest, DeleteProductRequest, MessageResponse, UpdateProductRequest};
use crate::services::product_service;

#[utoipa::path(
    post,
    path = "/api/add-product",
    tag = "Products",
    request_body = AddProductRequest,
    responses(
        (status = 200, description = "Product added", body = MessageResponse),
        (status = 404, description = "Unknown store id", body = MessageResponse)
    )
)]
pub async fn add_product(
    db: web::Data<JsonStore>,
    request: web::Json<AddProductRequest>,
) -> HttpResponse {
    log::info!(
        "➕ POST /api/add-product - store: {}, product: {}",
        request.store_id,
        request.product.name
    );

    match product_service::add_product(&db, &request).await {
        Ok(_) => HttpResponse::Ok().json(MessageResponse::ok("Product added successfully")),
        Err(e) => {
            log::warn!("❌ Add product failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/update-product",
    tag = "Products",
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 404, description = "Unknown store id or product index", body = MessageResponse)
    )
)]
pub async fn update_product(
    db: web::Data<JsonStore>,
    request: web::Json<UpdateProductRequest>,
) -> HttpResponse {
    log::info!(
        "✏️  POST /api/update-product - store: {}, index: {}",
        request.store_id,
        request.product_index
    );

    match product_service::update_product(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Product updated successfully")),
        Err(e) => {
            log::warn!("❌ Update product failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/delete-product",
    tag = "Products",
    request_body = DeleteProductRequest,
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Unknown store id or product index", body = MessageResponse)
    )
)]
pub async fn delete_product(
    db: web::Data<JsonStore>,
    request: web::Json<DeleteProductRequest>,
) -> HttpResponse {
    log::info!(
        "🗑️  POST /api/delete-product - store: {}, index: {}",
        request.store_id,
        request.product_index
    );

    match product_service::delete_product(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Product deleted successfully")),
        Err(e) => {
            log::warn!("❌ Delete product failed: {}", e);
            error_response(&e)
        }
    }
}
