use crate::{
    api::metrics,
    database::MongoDB,
    jobs::id_assigner::CreationEvent,
    services::user_service::{self, CreateUserRequest},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use tokio::sync::mpsc::UnboundedSender;

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created, student ID assigned asynchronously"),
        (status = 400, description = "Invalid request or user already exists")
    )
)]
pub async fn create_user(
    db: web::Data<MongoDB>,
    events: web::Data<UnboundedSender<CreationEvent>>,
    request: web::Json<CreateUserRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("📝 POST /users - email: {}", request.email);

    match user_service::create_user(&db, &request, &events).await {
        Ok(_) => {
            log::info!("✅ User created: {}", request.email);
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "message": "User created successfully"
            }))
        }
        Err(e) => {
            metrics::increment_error_count();
            log::warn!("❌ User creation failed: {} - {}", request.email, e);
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
    }
}
