use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationPreferences {
    pub event_updates: bool,
    pub new_notices: bool,
    pub registration_confirmations: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            event_updates: true,
            new_notices: true,
            registration_confirmations: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub notifications: NotificationPreferences,
    pub updated_at: DateTime<Utc>,
}

/// Merge-upsert patch: only the supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub notifications: Option<NotificationPreferences>,
}
