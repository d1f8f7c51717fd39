use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Event category. Closed enumeration; the API rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum EventCategory {
    Technical,
    Cultural,
    Sports,
}

impl EventCategory {
    pub const ALL: [EventCategory; 3] = [
        EventCategory::Technical,
        EventCategory::Cultural,
        EventCategory::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Technical => "Technical",
            EventCategory::Cultural => "Cultural",
            EventCategory::Sports => "Sports",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organizing club. Closed enumeration of the campus clubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum Club {
    General,
    #[serde(rename = "Slug & Plug")]
    #[sqlx(rename = "Slug & Plug")]
    SlugAndPlug,
    Sketch,
    #[serde(rename = "Tech-Wiz")]
    #[sqlx(rename = "Tech-Wiz")]
    TechWiz,
    Andropedia,
    Codekrafters,
    Chipset,
    Logicplay,
    Intellects,
    Synergies,
    Techpro,
    Gamecon,
    Techvayuna,
    Cyborg,
    #[serde(rename = "Developers Student Club")]
    #[sqlx(rename = "Developers Student Club")]
    DevelopersStudentClub,
    Codezilla,
    #[serde(rename = "Journal Club")]
    #[sqlx(rename = "Journal Club")]
    JournalClub,
    #[serde(rename = "Eleet Club")]
    #[sqlx(rename = "Eleet Club")]
    EleetClub,
    #[serde(rename = "Foreign Language Club")]
    #[sqlx(rename = "Foreign Language Club")]
    ForeignLanguageClub,
}

impl Club {
    pub const ALL: [Club; 19] = [
        Club::General,
        Club::SlugAndPlug,
        Club::Sketch,
        Club::TechWiz,
        Club::Andropedia,
        Club::Codekrafters,
        Club::Chipset,
        Club::Logicplay,
        Club::Intellects,
        Club::Synergies,
        Club::Techpro,
        Club::Gamecon,
        Club::Techvayuna,
        Club::Cyborg,
        Club::DevelopersStudentClub,
        Club::Codezilla,
        Club::JournalClub,
        Club::EleetClub,
        Club::ForeignLanguageClub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Club::General => "General",
            Club::SlugAndPlug => "Slug & Plug",
            Club::Sketch => "Sketch",
            Club::TechWiz => "Tech-Wiz",
            Club::Andropedia => "Andropedia",
            Club::Codekrafters => "Codekrafters",
            Club::Chipset => "Chipset",
            Club::Logicplay => "Logicplay",
            Club::Intellects => "Intellects",
            Club::Synergies => "Synergies",
            Club::Techpro => "Techpro",
            Club::Gamecon => "Gamecon",
            Club::Techvayuna => "Techvayuna",
            Club::Cyborg => "Cyborg",
            Club::DevelopersStudentClub => "Developers Student Club",
            Club::Codezilla => "Codezilla",
            Club::JournalClub => "Journal Club",
            Club::EleetClub => "Eleet Club",
            Club::ForeignLanguageClub => "Foreign Language Club",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for Club {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// Freeform display range, e.g. "09:00 AM - 05:00 PM" or "48 Hours".
    pub time: String,
    pub venue: String,
    pub category: EventCategory,
    pub club: Club,
    pub image_url: Option<String>,
    pub registration_open: bool,
    pub registration_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable fields of an event, exactly; identifier and timestamps are
/// server-assigned and never part of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub venue: String,
    pub category: EventCategory,
    pub club: Club,
    #[serde(default)]
    pub image_url: Option<String>,
    pub registration_open: bool,
    #[serde(default)]
    pub registration_link: Option<String>,
}

impl EventDraft {
    /// Pre-populate a draft from a stored record, for edit mode.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            time: event.time.clone(),
            venue: event.venue.clone(),
            category: event.category,
            club: event.club,
            image_url: event.image_url.clone(),
            registration_open: event.registration_open,
            registration_link: event.registration_link.clone(),
        }
    }
}

/// Field-wise partial update. Absent fields are left untouched by the store;
/// `updated_at` is refreshed on every update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub category: Option<EventCategory>,
    pub club: Option<Club>,
    pub image_url: Option<String>,
    pub registration_open: Option<bool>,
    pub registration_link: Option<String>,
}

impl From<EventDraft> for EventPatch {
    fn from(draft: EventDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            date: Some(draft.date),
            time: Some(draft.time),
            venue: Some(draft.venue),
            category: Some(draft.category),
            club: Some(draft.club),
            image_url: draft.image_url,
            registration_open: Some(draft.registration_open),
            registration_link: draft.registration_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_round_trips() {
        for category in EventCategory::ALL {
            assert_eq!(EventCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(EventCategory::parse("Musical"), None);
    }

    #[test]
    fn club_parse_round_trips() {
        for club in Club::ALL {
            assert_eq!(Club::parse(club.as_str()), Some(club));
        }
        assert_eq!(Club::parse("Chess Club"), None);
    }

    #[test]
    fn club_serde_uses_display_names() {
        let json = serde_json::to_string(&Club::SlugAndPlug).unwrap();
        assert_eq!(json, "\"Slug & Plug\"");
        let club: Club = serde_json::from_str("\"Developers Student Club\"").unwrap();
        assert_eq!(club, Club::DevelopersStudentClub);
    }
}
