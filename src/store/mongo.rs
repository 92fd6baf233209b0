use crate::{
    database::MongoDB,
    models::{Counter, User, STUDENT_ID_COUNTER},
    store::{StoreError, UserStore},
};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;

const USERS: &str = "users";
const COUNTERS: &str = "counters";

/// Production `UserStore` over the MongoDB `users` and `counters` collections.
pub struct MongoUserStore {
    db: MongoDB,
}

impl MongoUserStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn highest_student_id(&self) -> Result<Option<String>, StoreError> {
        let collection = self.db.collection::<User>(USERS);

        let filter = doc! {
            "student_id": { "$exists": true, "$ne": null },
        };

        let user = collection
            .find_one(filter)
            .sort(doc! { "student_id": -1 })
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(user.and_then(|u| u.student_id))
    }

    async fn next_sequence(&self) -> Result<i64, StoreError> {
        let collection = self.db.collection::<Counter>(COUNTERS);

        // $inc under find_one_and_update is atomic on the server, so two
        // concurrent calls always observe distinct values.
        let counter = collection
            .find_one_and_update(
                doc! { "_id": STUDENT_ID_COUNTER },
                doc! { "$inc": { "value": 1i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?
            .ok_or_else(|| StoreError::Write("counter upsert returned no document".to_string()))?;

        Ok(counter.value)
    }

    async fn set_student_id(&self, uid: &str, student_id: &str) -> Result<bool, StoreError> {
        let collection = self.db.collection::<User>(USERS);

        // `student_id: null` matches both a missing field and an explicit
        // null, so an already-assigned record is never overwritten.
        let filter = doc! {
            "uid": uid,
            "student_id": null,
        };

        let update = doc! {
            "$set": { "student_id": student_id },
        };

        let result = collection
            .update_one(filter, update)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        Ok(result.modified_count > 0)
    }
}
