use serde::{Deserialize, Serialize};

/// Name of the counter document backing student ID assignment.
pub const STUDENT_ID_COUNTER: &str = "student_id";

/// Counter document in the `counters` collection. Advanced atomically with
/// `$inc` so concurrent assignments never see the same value.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub name: String,
    pub value: i64,
}
