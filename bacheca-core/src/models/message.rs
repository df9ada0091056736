use serde::{Deserialize, Serialize};

/// Messaggio della bacheca. `id` is assigned by storage and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub text: String,
}
