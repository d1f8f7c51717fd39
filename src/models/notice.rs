use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum NoticeCategory {
    Academic,
    Facility,
    Financial,
    General,
}

impl NoticeCategory {
    pub const ALL: [NoticeCategory; 4] = [
        NoticeCategory::Academic,
        NoticeCategory::Facility,
        NoticeCategory::Financial,
        NoticeCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::Academic => "Academic",
            NoticeCategory::Facility => "Facility",
            NoticeCategory::Financial => "Financial",
            NoticeCategory::General => "General",
        }
    }
}

impl fmt::Display for NoticeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notice {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    pub important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable notice fields; identifier and timestamps are server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeDraft {
    pub title: String,
    pub content: String,
    pub category: NoticeCategory,
    #[serde(default)]
    pub important: bool,
}
