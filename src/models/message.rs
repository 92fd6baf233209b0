use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ANSWERED: &str = "answered";

/// Support message as stored in the `messages` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Message {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub message_id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_status")]
    pub status: String, // "pending" or "answered"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<BsonDateTime>,
}

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

/// Message shape returned by the API (camelCase, frontend contract).
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageItem {
    pub message_id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<i64>,
}

impl From<Message> for MessageItem {
    fn from(msg: Message) -> Self {
        Self {
            message_id: msg.message_id,
            name: msg.name,
            email: msg.email,
            subject: msg.subject,
            body: msg.body,
            status: msg.status,
            reply: msg.reply,
            created_at: msg.created_at.map(|t| t.timestamp_millis()).unwrap_or(0),
            answered_at: msg.answered_at.map(|t| t.timestamp_millis()),
        }
    }
}
