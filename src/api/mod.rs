pub mod health;
pub mod messages;
pub mod metrics;
pub mod swagger;
pub mod users;
