pub mod message_service;
pub mod student_id;
pub mod user_service;
