use crate::{
    api::metrics,
    database::MongoDB,
    models::MessageItem,
    services::message_service::{self, CreateMessageRequest, ReplyRequest},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

fn error_response(e: AppError) -> HttpResponse {
    metrics::increment_error_count();
    let body = serde_json::json!({
        "success": false,
        "message": e.to_string()
    });
    match e {
        AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(body),
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::DatabaseError(_) => HttpResponse::InternalServerError().json(body),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    responses(
        (status = 200, description = "All support messages, newest first", body = [MessageItem])
    )
)]
pub async fn get_all_messages(db: web::Data<MongoDB>) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("📬 GET /messages");

    match message_service::list_messages(&db).await {
        Ok(items) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "items": items
        })),
        Err(e) => {
            log::error!("❌ Failed to list messages: {}", e);
            error_response(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/messages",
    tag = "Messages",
    request_body = CreateMessageRequest,
    responses(
        (status = 201, description = "Message stored"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_message(
    db: web::Data<MongoDB>,
    request: web::Json<CreateMessageRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("✉️  POST /messages - from: {}", request.email);

    match message_service::create_message(&db, &request).await {
        Ok(_) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "message": "Message received"
        })),
        Err(e) => {
            log::warn!("❌ Message creation failed: {}", e);
            error_response(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/messages/status",
    tag = "Messages",
    request_body = ReplyRequest,
    responses(
        (status = 200, description = "Message marked answered"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn update_message_status(
    db: web::Data<MongoDB>,
    request: web::Json<ReplyRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("💬 POST /messages/status - message: {}", request.message_id);

    match message_service::reply_message(&db, &request).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Message marked answered"
        })),
        Err(e) => {
            log::warn!("❌ Reply failed for {}: {}", request.message_id, e);
            error_response(e)
        }
    }
}
