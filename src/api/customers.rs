use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{CustomersResponse, MessageResponse, UpdateCustomerRequest};
use crate::services::customer_service;

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "All customers, passwords stripped", body = CustomersResponse)
    )
)]
pub async fn get_customers(db: web::Data<JsonStore>) -> HttpResponse {
    let customers = customer_service::list_customers(&db).await;
    HttpResponse::Ok().json(CustomersResponse {
        success: true,
        message: None,
        customers,
    })
}

#[utoipa::path(
    post,
    path = "/api/update-customer",
    tag = "Customers",
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 404, description = "Unknown customer id", body = MessageResponse)
    )
)]
pub async fn update_customer(
    db: web::Data<JsonStore>,
    request: web::Json<UpdateCustomerRequest>,
) -> HttpResponse {
    log::info!("✏️  POST /api/update-customer - id: {}", request.id);

    match customer_service::update_customer(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Customer updated successfully")),
        Err(e) => {
            log::warn!("❌ Customer update failed: {}", e);
            error_response(&e)
        }
    }
}
