use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{
    CustomerLoginResponse, LoginRequest, MessageResponse, RegisterCustomerRequest,
    RegisterShopRequest, RegisterShopResponse, ShopkeeperLoginResponse,
};
use crate::services::auth_service;

#[utoipa::path(
    post,
    path = "/api/customer-register",
    tag = "Auth",
    request_body = RegisterCustomerRequest,
    responses(
        (status = 200, description = "Registered, or rejected with success=false", body = MessageResponse)
    )
)]
pub async fn customer_register(
    db: web::Data<JsonStore>,
    request: web::Json<RegisterCustomerRequest>,
) -> HttpResponse {
    log::info!("📝 POST /api/customer-register - phone: {}", request.phone);

    match auth_service::register_customer(&db, &request).await {
        Ok(id) => {
            log::info!("✅ Customer registered: id={}", id);
            HttpResponse::Ok().json(MessageResponse::ok("Customer registered successfully"))
        }
        Err(e) => {
            log::warn!("❌ Customer registration failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/customer-login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login result; user present on success", body = CustomerLoginResponse)
    )
)]
pub async fn customer_login(
    db: web::Data<JsonStore>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /api/customer-login - phone: {}", request.phone);

    match auth_service::login_customer(&db, &request).await {
        Ok(user) => {
            log::info!("✅ Customer login: id={}", user.id);
            HttpResponse::Ok().json(CustomerLoginResponse {
                success: true,
                message: None,
                user: Some(user),
            })
        }
        Err(e) => {
            log::warn!("❌ Customer login failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/register-shop",
    tag = "Auth",
    request_body = RegisterShopRequest,
    responses(
        (status = 200, description = "Registered with shop_id, or rejected with success=false", body = RegisterShopResponse)
    )
)]
pub async fn register_shop(
    db: web::Data<JsonStore>,
    request: web::Json<RegisterShopRequest>,
) -> HttpResponse {
    log::info!(
        "📝 POST /api/register-shop - shop: {}, phone: {}",
        request.shop_name,
        request.phone
    );

    match auth_service::register_shop(&db, &request).await {
        Ok(id) => {
            log::info!("✅ Shop registered: id={}", id);
            HttpResponse::Ok().json(RegisterShopResponse {
                success: true,
                message: Some("Shop registered successfully".into()),
                shop_id: Some(id),
            })
        }
        Err(e) => {
            log::warn!("❌ Shop registration failed: {}", e);
            error_response(&e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/shopkeeper-login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login result; user present on success", body = ShopkeeperLoginResponse)
    )
)]
pub async fn shopkeeper_login(
    db: web::Data<JsonStore>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /api/shopkeeper-login - phone: {}", request.phone);

    match auth_service::login_shopkeeper(&db, &request).await {
        Ok(user) => {
            log::info!("✅ Shopkeeper login: id={}", user.id);
            HttpResponse::Ok().json(ShopkeeperLoginResponse {
                success: true,
                message: None,
                user: Some(user),
            })
        }
        Err(e) => {
            log::warn!("❌ Shopkeeper login failed: {}", e);
            error_response(&e)
        }
    }
}
