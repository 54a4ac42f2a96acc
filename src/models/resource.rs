use serde::{Deserialize, Serialize};

/// A team member tasks can be assigned to. `show_on_dashboard` drives the
/// weekly board display filter (replaces the old name allow-list).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub photo_url: Option<String>,
    pub show_on_dashboard: bool,
    pub created_at: String,
}
