use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile record mirrored from the external auth provider on sign-in.
/// Upserts are best-effort — a failed write is observed, never surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Equal to the owner id issued by the auth provider.
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
