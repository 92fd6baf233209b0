use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// User record as stored in the `users` collection.
/// `student_id` is absent at creation time and filled in exactly once by the
/// ID assigner job.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub uid: String, // PRIMARY IDENTIFIER - matches document store structure
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>, // bcrypt hash
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: String, // "student" or "admin"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>, // "ST" + zero-padded sequence, set by the assigner
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

// Default functions for serde
fn default_role() -> String {
    "student".to_string()
}

fn default_is_active() -> bool {
    true
}

/// Field snapshot carried by a creation event, taken at creation time.
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub email: String,
    pub student_id: Option<String>,
}

impl From<&User> for UserSnapshot {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            student_id: user.student_id.clone(),
        }
    }
}
