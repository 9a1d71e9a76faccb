use actix_web::{web, HttpResponse};

use crate::api::error_response;
use crate::database::JsonStore;
use crate::models::{ChatsResponse, MessageResponse, SaveChatRequest};
use crate::services::chat_service;

#[utoipa::path(
    get,
    path = "/api/chats",
    tag = "Chats",
    responses(
        (status = 200, description = "All conversations, most recent first", body = ChatsResponse)
    )
)]
pub async fn get_chats(db: web::Data<JsonStore>) -> HttpResponse {
    let chats = chat_service::list_chats(&db).await;
    HttpResponse::Ok().json(ChatsResponse {
        success: true,
        chats,
    })
}

#[utoipa::path(
    post,
    path = "/api/save-chat",
    tag = "Chats",
    request_body = SaveChatRequest,
    responses(
        (status = 200, description = "Message appended", body = MessageResponse),
        (status = 400, description = "Malformed chat id or sender not in chat", body = MessageResponse)
    )
)]
pub async fn save_chat(
    db: web::Data<JsonStore>,
    request: web::Json<SaveChatRequest>,
) -> HttpResponse {
    log::info!(
        "💬 POST /api/save-chat - chat: {}, sender: {} {}",
        request.chat_id,
        request.sender_type,
        request.sender_id
    );

    match chat_service::append_message(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::ok("Message saved")),
        Err(e) => {
            log::warn!("❌ Save chat failed: {}", e);
            error_response(&e)
        }
    }
}
