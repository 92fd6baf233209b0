use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool tuning
        client_options.max_pool_size = Some(20); // Max 20 simultaneous connections
        client_options.min_pool_size = Some(5); // Keep 5 connections always alive
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300)); // 5min idle

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .unwrap_or("StudentPortal");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };

        // 🚀 Create indexes for performance
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates necessary indexes for optimal query performance
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.database().collection::<mongodb::bson::Document>("users");

        // Index for users: (uid) - primary lookup key
        let uid_index = IndexModel::builder().keys(doc! { "uid": 1 }).build();

        match users.create_index(uid_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(uid)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for users: (email) - duplicate check on registration
        let email_index = IndexModel::builder().keys(doc! { "email": 1 }).build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for users: (student_id desc) - max-lookup of the last issued ID
        let student_id_index = IndexModel::builder()
            .keys(doc! { "student_id": -1 })
            .build();

        match users.create_index(student_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(student_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let messages = self
            .database()
            .collection::<mongodb::bson::Document>("messages");

        // Index for messages: (message_id) - reply lookup
        let message_id_index = IndexModel::builder()
            .keys(doc! { "message_id": 1 })
            .build();

        match messages.create_index(message_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: messages(message_id)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        // Index for messages: (created_at desc) - newest-first listing
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .build();

        match messages.create_index(created_at_index).await {
            Ok(_) => log::info!("   ✅ Index created: messages(created_at)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/StudentPortal".to_string());
        let db = MongoDB::new(&uri).await;
        assert!(db.is_ok());
    }
}
