use crate::database::MongoDB;
use crate::models::{Counter, STUDENT_ID_COUNTER};
use crate::services::student_id;
use crate::store::{MongoUserStore, UserStore};
use mongodb::bson::doc;

/// Raises the student ID counter to the highest already-assigned value.
/// Makes deployments over an existing collection safe: the counter document
/// never falls behind IDs issued by the old max-scan path, so no low number
/// is ever re-issued. `$max` with upsert never lowers the counter.
pub async fn sync_student_id_counter(db: &MongoDB) {
    let store = MongoUserStore::new(db.clone());

    let highest = match store.highest_student_id().await {
        Ok(h) => h,
        Err(e) => {
            log::error!("❌ Counter seed: failed to read highest student ID: {}", e);
            return;
        }
    };

    let Some(current) = highest else {
        log::info!("🆔 Counter seed: no student IDs assigned yet — nothing to sync");
        return;
    };

    let Some(value) = student_id::parse_student_id(&current) else {
        log::warn!("⚠️  Counter seed: unparseable max student ID '{}' — skipping", current);
        return;
    };

    let counters = db.collection::<Counter>("counters");

    let filter = doc! { "_id": STUDENT_ID_COUNTER };
    let update = doc! { "$max": { "value": value as i64 } };

    match counters.update_one(filter, update).upsert(true).await {
        Ok(_) => {
            log::info!("🆔 Counter seed: student ID counter at least {} ({})", value, current);
        }
        Err(e) => {
            log::error!("❌ Counter seed: failed to update counter: {}", e);
        }
    }
}
