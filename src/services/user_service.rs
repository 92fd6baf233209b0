use crate::{
    database::MongoDB,
    jobs::id_assigner::CreationEvent,
    models::{User, UserSnapshot},
    utils::AppError,
};
use bcrypt::{hash, DEFAULT_COST};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedSender;

const COLLECTION: &str = "users";

const ALLOWED_ROLES: [&str; 2] = ["student", "admin"];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>, // defaults to "student"
}

/// Creates a user record without a student ID and publishes the creation
/// event for the assigner worker. Publishing failure is logged but never
/// fails the registration - the record just stays unassigned until a
/// backfill (same contract as a dropped trigger delivery).
pub async fn create_user(
    db: &MongoDB,
    request: &CreateUserRequest,
    events: &UnboundedSender<CreationEvent>,
) -> Result<User, AppError> {
    let collection = db.collection::<User>(COLLECTION);

    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::InvalidRequest("A valid email is required".to_string()));
    }
    if request.password.len() < 6 {
        return Err(AppError::InvalidRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "First and last name are required".to_string(),
        ));
    }

    let role = request.role.as_deref().unwrap_or("student");
    if !ALLOWED_ROLES.contains(&role) {
        return Err(AppError::InvalidRequest(format!(
            "Invalid role: {}. Supported: student, admin",
            role
        )));
    }

    // Check if user already exists
    let filter = doc! { "email": &request.email };
    if collection
        .find_one(filter)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .is_some()
    {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    let hashed_password = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::DatabaseError(format!("Failed to hash password: {}", e)))?;

    let uid = ObjectId::new().to_hex();

    let new_user = User {
        _id: None,
        uid: uid.clone(),
        email: request.email.clone(),
        password: Some(hashed_password),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        role: role.to_string(),
        student_id: None, // filled in by the assigner worker
        is_active: true,
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

    log::info!("✅ User registered successfully: {} (role: {})", new_user.email, role);

    let event = CreationEvent {
        uid: Some(uid),
        snapshot: Some(UserSnapshot::from(&new_user)),
    };
    if events.send(event).is_err() {
        log::warn!(
            "⚠️  Assigner worker unavailable, user {} created without a student ID",
            new_user.email
        );
    }

    Ok(new_user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: "secret123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_create_user_assigns_no_student_id_inline() {
        dotenv::dotenv().ok();

        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/StudentPortalTest".to_string());
        let db = MongoDB::new(&uri).await.unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let user = create_user(&db, &request("ada@school.edu"), &tx).await.unwrap();

        assert!(user.student_id.is_none());
        // The creation event is published for the worker
        let event = rx.recv().await.unwrap();
        assert_eq!(event.uid.as_deref(), Some(user.uid.as_str()));
    }
}
