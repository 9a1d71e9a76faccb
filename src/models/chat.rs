use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the counter a chat participant stands on. Ordering is part
/// of the wire contract: customers sort before shopkeepers, which is what
/// makes chat keys canonical.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantKind {
    Customer,
    Shopkeeper,
}

impl fmt::Display for ParticipantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantKind::Customer => f.write_str("customer"),
            ParticipantKind::Shopkeeper => f.write_str("shopkeeper"),
        }
    }
}

impl FromStr for ParticipantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(ParticipantKind::Customer),
            "shopkeeper" => Ok(ParticipantKind::Shopkeeper),
            other => Err(format!("unknown participant kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Participant {
    pub kind: ParticipantKind,
    pub id: u64,
}

impl Participant {
    pub fn customer(id: u64) -> Participant {
        Participant {
            kind: ParticipantKind::Customer,
            id,
        }
    }

    pub fn shopkeeper(id: u64) -> Participant {
        Participant {
            kind: ParticipantKind::Shopkeeper,
            id,
        }
    }
}

/// Order-independent conversation id. However the two sides are given, the
/// key renders as `customer_<id>_shopkeeper_<id>`, so a message sent with
/// either ordering lands in the same thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatKey {
    first: Participant,
    second: Participant,
}

impl ChatKey {
    /// Build a key from the two sides in any order. The pair must span both
    /// roles; two customers never chat with each other.
    pub fn new(a: Participant, b: Participant) -> Result<ChatKey, String> {
        if a.kind == b.kind {
            return Err(format!("chat needs one customer and one shopkeeper, got two {}s", a.kind));
        }
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Ok(ChatKey { first, second })
    }

    pub fn participants(&self) -> (Participant, Participant) {
        (self.first, self.second)
    }

    pub fn involves(&self, p: Participant) -> bool {
        self.first == p || self.second == p
    }

    /// The other side of the conversation, if `me` is in it at all.
    pub fn other(&self, me: Participant) -> Option<Participant> {
        if self.first == me {
            Some(self.second)
        } else if self.second == me {
            Some(self.first)
        } else {
            None
        }
    }
}

impl fmt::Display for ChatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.first.kind, self.first.id, self.second.kind, self.second.id
        )
    }
}

impl FromStr for ChatKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 4 {
            return Err(format!("malformed chat id: {}", s));
        }
        let parse_side = |kind: &str, id: &str| -> Result<Participant, String> {
            Ok(Participant {
                kind: kind.parse()?,
                id: id
                    .parse()
                    .map_err(|_| format!("malformed chat id: {}", s))?,
            })
        };
        let a = parse_side(parts[0], parts[1])?;
        let b = parse_side(parts[2], parts[3])?;
        ChatKey::new(a, b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: u64,
    pub sender_type: ParticipantKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// One conversation thread. `chat_id` is the canonical rendering of the
/// chat key; the participant columns are kept denormalized alongside it so
/// stored JSON stays greppable.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Chat {
    pub chat_id: String,
    pub participant1_type: ParticipantKind,
    pub participant1_id: u64,
    pub participant2_type: ParticipantKind,
    pub participant2_id: u64,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_time: Option<DateTime<Utc>>,
}

impl Chat {
    pub fn involves(&self, p: Participant) -> bool {
        (self.participant1_type == p.kind && self.participant1_id == p.id)
            || (self.participant2_type == p.kind && self.participant2_id == p.id)
    }

    pub fn key(&self) -> Result<ChatKey, String> {
        ChatKey::new(
            Participant {
                kind: self.participant1_type,
                id: self.participant1_id,
            },
            Participant {
                kind: self.participant2_type,
                id: self.participant2_id,
            },
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SaveChatRequest {
    pub chat_id: String,
    pub sender_id: u64,
    pub sender_type: ParticipantKind,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatsResponse {
    pub success: bool,
    #[serde(default)]
    pub chats: Vec<Chat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        let customer = Participant::customer(3);
        let shopkeeper = Participant::shopkeeper(7);

        let a = ChatKey::new(customer, shopkeeper).unwrap();
        let b = ChatKey::new(shopkeeper, customer).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.to_string(), "customer_3_shopkeeper_7");
        assert_eq!(b.to_string(), "customer_3_shopkeeper_7");
    }

    #[test]
    fn parse_normalizes_either_order() {
        let forward: ChatKey = "customer_3_shopkeeper_7".parse().unwrap();
        let reversed: ChatKey = "shopkeeper_7_customer_3".parse().unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(reversed.to_string(), "customer_3_shopkeeper_7");
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!("".parse::<ChatKey>().is_err());
        assert!("customer_3".parse::<ChatKey>().is_err());
        assert!("customer_3_shopkeeper_x".parse::<ChatKey>().is_err());
        assert!("admin_3_shopkeeper_7".parse::<ChatKey>().is_err());
        // Two participants of the same role never form a chat.
        assert!("customer_3_customer_7".parse::<ChatKey>().is_err());
    }

    #[test]
    fn other_side_lookup() {
        let key: ChatKey = "customer_3_shopkeeper_7".parse().unwrap();

        assert_eq!(
            key.other(Participant::customer(3)),
            Some(Participant::shopkeeper(7))
        );
        assert_eq!(
            key.other(Participant::shopkeeper(7)),
            Some(Participant::customer(3))
        );
        assert_eq!(key.other(Participant::customer(99)), None);
        assert!(key.involves(Participant::shopkeeper(7)));
        assert!(!key.involves(Participant::shopkeeper(3)));
    }
}
