use crate::{
    database::MongoDB,
    models::{Message, MessageItem, STATUS_ANSWERED, STATUS_PENDING},
    utils::AppError,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::Deserialize;

const COLLECTION: &str = "messages";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateMessageRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub message_id: String,
    pub reply: String,
}

/// Lists all support messages, newest first.
pub async fn list_messages(db: &MongoDB) -> Result<Vec<MessageItem>, AppError> {
    let collection = db.collection::<Message>(COLLECTION);

    let mut cursor = collection
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut items = Vec::new();
    while let Some(message) = cursor
        .try_next()
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
    {
        items.push(MessageItem::from(message));
    }

    Ok(items)
}

/// Stores a new pending support message.
pub async fn create_message(
    db: &MongoDB,
    request: &CreateMessageRequest,
) -> Result<Message, AppError> {
    if request.subject.trim().is_empty() || request.body.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Subject and body are required".to_string(),
        ));
    }

    let collection = db.collection::<Message>(COLLECTION);

    let message = Message {
        _id: None,
        message_id: ObjectId::new().to_hex(),
        name: request.name.clone(),
        email: request.email.clone(),
        subject: request.subject.clone(),
        body: request.body.clone(),
        status: STATUS_PENDING.to_string(),
        reply: None,
        created_at: Some(BsonDateTime::now()),
        answered_at: None,
    };

    collection
        .insert_one(&message)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create message: {}", e)))?;

    log::info!("✉️  Support message received from {}", message.email);

    Ok(message)
}

/// Records an admin reply and marks the message answered.
pub async fn reply_message(db: &MongoDB, request: &ReplyRequest) -> Result<(), AppError> {
    if request.reply.trim().is_empty() {
        return Err(AppError::InvalidRequest("Reply cannot be empty".to_string()));
    }

    let collection = db.collection::<Message>(COLLECTION);

    let filter = doc! { "message_id": &request.message_id };
    let update = doc! {
        "$set": {
            "status": STATUS_ANSWERED,
            "reply": &request.reply,
            "answered_at": BsonDateTime::now(),
        }
    };

    let result = collection
        .update_one(filter, update)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound(format!(
            "Message {} not found",
            request.message_id
        )));
    }

    log::info!("✅ Message {} marked answered", request.message_id);

    Ok(())
}
