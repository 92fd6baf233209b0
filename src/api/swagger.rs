use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Portal Service API",
        version = "1.0.0",
        description = "Backend API for the student portal.\n\n**Features:**\n- User registration with asynchronous sequential student ID assignment\n- Support message inbox with admin replies\n- Health monitoring and metrics",
        contact(
            name = "Student Portal Team",
            email = "support@student-portal.edu"
        )
    ),
    paths(
        // Users
        crate::api::users::create_user,

        // Messages
        crate::api::messages::get_all_messages,
        crate::api::messages::create_message,
        crate::api::messages::update_message_status,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Users
            crate::services::user_service::CreateUserRequest,

            // Messages
            crate::services::message_service::CreateMessageRequest,
            crate::services::message_service::ReplyRequest,
            crate::models::MessageItem,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User registration. Each new user receives a sequential student ID (ST-prefixed, zero-padded) assigned by a background worker."),
        (name = "Messages", description = "Support message endpoints. List messages, submit new ones, and record admin replies."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
