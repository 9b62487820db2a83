use serde::{Deserialize, Serialize};

/// Chat (private, group or channel) the message arrived in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}
