//! Pure render and filter helpers for the terminal front-end. Everything
//! here takes data in and returns strings or slices out, so it is all
//! directly testable.

use std::fmt::Write;

use crate::models::{Booking, Chat, ChatMessage, ItemRequest, Participant, Store, ALL_STORES};

pub fn bookings_for_customer<'a>(bookings: &'a [Booking], phone: &str) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.customer_phone == phone)
        .collect()
}

pub fn bookings_for_store<'a>(bookings: &'a [Booking], phone: &str) -> Vec<&'a Booking> {
    bookings.iter().filter(|b| b.store_phone == phone).collect()
}

pub fn requests_for_customer<'a>(requests: &'a [ItemRequest], phone: &str) -> Vec<&'a ItemRequest> {
    requests
        .iter()
        .filter(|r| r.customer_phone == phone)
        .collect()
}

/// Requests a shopkeeper should see: targeted at their store by name, or
/// broadcast to every store.
pub fn requests_for_store<'a>(
    requests: &'a [ItemRequest],
    shop_name: &str,
) -> Vec<&'a ItemRequest> {
    requests
        .iter()
        .filter(|r| r.target_store == shop_name || r.target_store == ALL_STORES)
        .collect()
}

pub fn chats_for<'a>(chats: &'a [Chat], me: Participant) -> Vec<&'a Chat> {
    chats.iter().filter(|c| c.involves(me)).collect()
}

pub fn render_store_list(stores: &[Store]) -> String {
    if stores.is_empty() {
        return "No stores registered yet.\n".to_string();
    }
    let mut out = String::new();
    for store in stores {
        let _ = writeln!(
            out,
            "#{} {} ({}) - {} | {} products",
            store.id,
            store.shop_name,
            store.category.display_name(),
            store.address,
            store.products.len()
        );
    }
    out
}

pub fn render_store_detail(store: &Store) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", store.shop_name, store.category.display_name());
    let _ = writeln!(out, "Owner: {} | Phone: {}", store.owner_name, store.phone);
    let _ = writeln!(out, "{}, {}", store.address, store.pincode);
    let _ = writeln!(out, "Catalog:");
    out.push_str(&render_products(&store.products));
    out
}

pub fn render_products(products: &[crate::models::Product]) -> String {
    if products.is_empty() {
        return "  (no products listed)\n".to_string();
    }
    let mut out = String::new();
    for (index, product) in products.iter().enumerate() {
        let stock = if product.available {
            "in stock"
        } else {
            "out of stock"
        };
        let _ = writeln!(
            out,
            "  [{}] {} - {} ({})",
            index, product.name, product.price, stock
        );
    }
    out
}

pub fn render_bookings(bookings: &[&Booking]) -> String {
    if bookings.is_empty() {
        return "No bookings.\n".to_string();
    }
    let mut out = String::new();
    for booking in bookings {
        let _ = writeln!(
            out,
            "#{} {} at {} - {} ({})",
            booking.id,
            booking.item_name,
            booking.store_name,
            booking.status,
            booking.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    out
}

pub fn render_requests(requests: &[&ItemRequest]) -> String {
    if requests.is_empty() {
        return "No item requests.\n".to_string();
    }
    let mut out = String::new();
    for request in requests {
        let _ = writeln!(
            out,
            "#{} {} x{} -> {} ({}) from {}",
            request.id,
            request.item_name,
            request.quantity,
            request.target_store,
            request.status,
            request.customer_name
        );
    }
    out
}

pub fn render_chat_list(chats: &[&Chat], me: Participant) -> String {
    if chats.is_empty() {
        return "No conversations yet.\n".to_string();
    }
    let mut out = String::new();
    for chat in chats {
        let other = chat
            .key()
            .ok()
            .and_then(|key| key.other(me))
            .map(|p| format!("{} {}", p.kind, p.id))
            .unwrap_or_else(|| chat.chat_id.clone());
        let last = chat.last_message.as_deref().unwrap_or("");
        let _ = writeln!(out, "{} | {}: {}", chat.chat_id, other, last);
    }
    out
}

/// One conversation, oldest first, with my messages marked `[you]`.
pub fn render_conversation(messages: &[ChatMessage], me: Participant) -> String {
    if messages.is_empty() {
        return "No messages yet. Say hello!\n".to_string();
    }
    let mut out = String::new();
    for message in messages {
        let who = if message.sender_type == me.kind && message.sender_id == me.id {
            "[you]"
        } else {
            "[them]"
        };
        let _ = writeln!(
            out,
            "{} {} {}",
            message.created_at.format("%H:%M"),
            who,
            message.message
        );
    }
    out
}

pub fn render_overview(stores: usize, customers: usize, bookings: usize) -> String {
    format!(
        "Marketplace overview: {} stores, {} customers, {} bookings\n",
        stores, customers, bookings
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, ParticipantKind};
    use chrono::Utc;

    fn booking(id: u64, customer_phone: &str, store_phone: &str) -> Booking {
        Booking {
            id,
            item_name: "Rice (1kg)".into(),
            customer_name: "John Doe".into(),
            customer_phone: customer_phone.into(),
            store_name: "Sharma General Store".into(),
            store_phone: store_phone.into(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            status_updated_at: None,
        }
    }

    fn request(id: u64, target: &str) -> ItemRequest {
        ItemRequest {
            id,
            item_name: "Thermometer".into(),
            quantity: "1".into(),
            description: None,
            target_store: target.into(),
            customer_name: "John Doe".into(),
            customer_phone: "+91 111".into(),
            customer_location: "Sector 15".into(),
            status: "pending".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bookings_filter_by_phone_on_both_sides() {
        let bookings = vec![
            booking(1, "+91 111", "+91 333"),
            booking(2, "+91 222", "+91 333"),
            booking(3, "+91 111", "+91 444"),
        ];

        let mine = bookings_for_customer(&bookings, "+91 111");
        assert_eq!(mine.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 3]);

        let shop = bookings_for_store(&bookings, "+91 333");
        assert_eq!(shop.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn store_sees_targeted_and_broadcast_requests() {
        let requests = vec![
            request(1, "Sharma General Store"),
            request(2, ALL_STORES),
            request(3, "City Medical Store"),
        ];

        let visible = requests_for_store(&requests, "Sharma General Store");
        assert_eq!(visible.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn conversation_marks_my_messages() {
        let me = Participant::customer(3);
        let messages = vec![
            ChatMessage {
                id: uuid::Uuid::new_v4(),
                sender_id: 3,
                sender_type: ParticipantKind::Customer,
                message: "Is rice in stock?".into(),
                created_at: Utc::now(),
            },
            ChatMessage {
                id: uuid::Uuid::new_v4(),
                sender_id: 7,
                sender_type: ParticipantKind::Shopkeeper,
                message: "Yes, 20kg left.".into(),
                created_at: Utc::now(),
            },
        ];

        let rendered = render_conversation(&messages, me);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].contains("[you] Is rice in stock?"));
        assert!(lines[1].contains("[them] Yes, 20kg left."));
    }
}
