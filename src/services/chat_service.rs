use chrono::Utc;
use uuid::Uuid;

use crate::database::JsonStore;
use crate::models::{Chat, ChatKey, ChatMessage, Participant, SaveChatRequest};
use crate::utils::AppError;

/// Every chat, most recently active first.
pub async fn list_chats(db: &JsonStore) -> Vec<Chat> {
    let mut chats = db.chats().await;
    chats.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
    chats
}

/// Append one message to the conversation named by the chat key, creating
/// the conversation when absent. The key is accepted in either participant
/// order and stored canonicalized, so both sides always land in the same
/// thread.
pub async fn append_message(db: &JsonStore, request: &SaveChatRequest) -> Result<(), AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::InvalidRequest("Message required".into()));
    }

    let key: ChatKey = request
        .chat_id
        .parse()
        .map_err(AppError::InvalidRequest)?;

    let sender = Participant {
        kind: request.sender_type,
        id: request.sender_id,
    };
    if !key.involves(sender) {
        return Err(AppError::InvalidRequest(
            "Sender is not part of this chat".into(),
        ));
    }

    let message = ChatMessage {
        id: Uuid::new_v4(),
        sender_id: request.sender_id,
        sender_type: request.sender_type,
        message: request.message.clone(),
        created_at: Utc::now(),
    };

    db.update_chats(|chats| {
        let canonical = key.to_string();
        let chat = match chats.iter_mut().find(|c| c.chat_id == canonical) {
            Some(chat) => chat,
            None => {
                let (first, second) = key.participants();
                chats.push(Chat {
                    chat_id: canonical.clone(),
                    participant1_type: first.kind,
                    participant1_id: first.id,
                    participant2_type: second.kind,
                    participant2_id: second.id,
                    messages: Vec::new(),
                    last_message: None,
                    last_message_time: None,
                });
                chats.last_mut().expect("just pushed")
            }
        };

        chat.last_message = Some(message.message.clone());
        chat.last_message_time = Some(message.created_at);
        chat.messages.push(message.clone());
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParticipantKind;

    fn save(chat_id: &str, sender: Participant, text: &str) -> SaveChatRequest {
        SaveChatRequest {
            chat_id: chat_id.into(),
            sender_id: sender.id,
            sender_type: sender.kind,
            message: text.into(),
        }
    }

    #[tokio::test]
    async fn both_directions_share_one_conversation() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let customer = Participant::customer(1);
        let shopkeeper = Participant::shopkeeper(2);

        // Customer starts the chat with the key in one order, the shopkeeper
        // replies using the reversed key.
        append_message(&db, &save("customer_1_shopkeeper_2", customer, "Is rice in stock?"))
            .await
            .unwrap();
        append_message(&db, &save("shopkeeper_2_customer_1", shopkeeper, "Yes, 20kg left."))
            .await
            .unwrap();

        let chats = list_chats(&db).await;
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].chat_id, "customer_1_shopkeeper_2");
        assert_eq!(chats[0].messages.len(), 2);
        assert_eq!(chats[0].last_message.as_deref(), Some("Yes, 20kg left."));
        assert_eq!(
            chats[0].messages[1].sender_type,
            ParticipantKind::Shopkeeper
        );
    }

    #[tokio::test]
    async fn sender_must_be_a_participant() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let outsider = Participant::customer(99);
        let result =
            append_message(&db, &save("customer_1_shopkeeper_2", outsider, "hello")).await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn recent_conversations_sort_first() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        append_message(&db, &save("customer_1_shopkeeper_2", Participant::customer(1), "a"))
            .await
            .unwrap();
        append_message(&db, &save("customer_3_shopkeeper_2", Participant::customer(3), "b"))
            .await
            .unwrap();

        let chats = list_chats(&db).await;
        assert_eq!(chats[0].chat_id, "customer_3_shopkeeper_2");
    }

    #[tokio::test]
    async fn malformed_chat_id_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let db = JsonStore::open(dir.path()).unwrap();

        let result = append_message(
            &db,
            &save("not_a_chat", Participant::customer(1), "hello"),
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }
}
