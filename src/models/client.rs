use serde::{Deserialize, Serialize};

/// A billable client bucket. Deactivating hides it from the weekly board
/// without losing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub is_active: bool,
    pub created_at: String,
}
