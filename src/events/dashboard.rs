//! Admin dashboard summary.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Event;

pub const EMPTY_TABLE_PLACEHOLDER: &str = "No events found. Add your first event!";

/// The Total / Active / Upcoming stat tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub upcoming: usize,
}

impl DashboardStats {
    /// Active counts open registrations; upcoming counts strictly future
    /// dates, so a past-dated (or today's) event still appears in the table
    /// but not in the upcoming tile.
    pub fn compute(events: &[Event], today: NaiveDate) -> Self {
        Self {
            total: events.len(),
            active: events.iter().filter(|e| e.registration_open).count(),
            upcoming: events.iter().filter(|e| e.date > today).count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub events: Vec<Event>,
    pub placeholder: Option<&'static str>,
}

impl DashboardSummary {
    pub fn build(events: Vec<Event>, today: NaiveDate) -> Self {
        let stats = DashboardStats::compute(&events, today);
        let placeholder = events.is_empty().then_some(EMPTY_TABLE_PLACEHOLDER);
        Self {
            stats,
            events,
            placeholder,
        }
    }
}
