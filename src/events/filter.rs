//! Client-side filter composition.
//!
//! Filtering is a pure function over the in-memory listing, re-evaluated on
//! every snapshot or selection change. There is no pushdown to the store;
//! collections here are tens to low hundreds of records.

use crate::models::{Club, Event, EventCategory};

/// A single equality constraint: everything, or exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

// Hand-written so `Selection<T>: Default` does not demand `T: Default`.
impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

/// Category and club constraints, composed with logical AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub category: Selection<EventCategory>,
    pub club: Selection<Club>,
}

impl EventFilter {
    pub fn category(category: EventCategory) -> Self {
        Self {
            category: Selection::Only(category),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.category.admits(&event.category) && self.club.admits(&event.club)
    }

    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn event(category: EventCategory, club: Club) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            time: "10:00 AM".to_string(),
            venue: "v".to_string(),
            category,
            club,
            image_url: None,
            registration_open: true,
            registration_link: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Event> {
        vec![
            event(EventCategory::Technical, Club::Codekrafters),
            event(EventCategory::Technical, Club::General),
            event(EventCategory::Cultural, Club::Sketch),
            event(EventCategory::Sports, Club::General),
        ]
    }

    #[test]
    fn all_selections_pass_everything_through() {
        let events = sample();
        let filtered = EventFilter::default().apply(&events);
        assert_eq!(filtered.len(), events.len());
    }

    #[test]
    fn selections_compose_with_and() {
        let events = sample();
        let filter = EventFilter {
            category: Selection::Only(EventCategory::Technical),
            club: Selection::Only(Club::General),
        };
        let filtered = filter.apply(&events);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, EventCategory::Technical);
        assert_eq!(filtered[0].club, Club::General);
    }

    #[test]
    fn output_is_exactly_the_matching_subset() {
        let events = sample();
        let filter = EventFilter::category(EventCategory::Technical);
        let filtered = filter.apply(&events);

        assert_eq!(filtered.len(), 2);
        for event in &filtered {
            assert!(filter.matches(event));
            assert!(events.iter().any(|e| e.id == event.id));
        }
        for event in &events {
            if filter.matches(event) {
                assert!(filtered.iter().any(|e| e.id == event.id));
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let events = sample();
        let filter = EventFilter {
            category: Selection::Only(EventCategory::Cultural),
            club: Selection::All,
        };
        let once = filter.apply(&events);
        let twice = filter.apply(&once);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn no_match_yields_empty_not_error() {
        let events = sample();
        let filter = EventFilter {
            category: Selection::Only(EventCategory::Sports),
            club: Selection::Only(Club::Sketch),
        };
        assert!(filter.apply(&events).is_empty());
    }
}
