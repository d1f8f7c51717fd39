//! Event registration.
//!
//! Events carrying an external registration link are never registered
//! locally; the caller is redirected. Everything else goes through a
//! check-then-insert: the existence query and the insert are two separate
//! calls, so concurrent duplicate submissions can race past the check.
//! That window is accepted (the submit button debounces) and there is no
//! database constraint backing it up.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::models::Registration;
use crate::store::{EventStore, RegistrationStore, StoreError};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("event not found")]
    EventNotFound,
    #[error("registration for this event is closed")]
    RegistrationClosed,
    #[error("already registered for this event")]
    AlreadyRegistered,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    /// Registration recorded locally.
    Registered(Registration),
    /// The event registers externally; no local state change.
    ExternalLink(String),
}

#[derive(Clone)]
pub struct RegistrationService {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
}

impl RegistrationService {
    pub fn new(events: Arc<dyn EventStore>, registrations: Arc<dyn RegistrationStore>) -> Self {
        Self {
            events,
            registrations,
        }
    }

    pub async fn register(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(RegistrationError::EventNotFound)?;

        if let Some(link) = event.registration_link {
            return Ok(RegistrationOutcome::ExternalLink(link));
        }
        if !event.registration_open {
            return Err(RegistrationError::RegistrationClosed);
        }

        // Check, then insert. Not atomic; see the module docs.
        if self
            .registrations
            .find(event_id, user_id)
            .await?
            .is_some()
        {
            return Err(RegistrationError::AlreadyRegistered);
        }
        let registration = self.registrations.insert(event_id, user_id).await?;
        Ok(RegistrationOutcome::Registered(registration))
    }

    pub async fn registrations_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<Registration>, RegistrationError> {
        Ok(self.registrations.list_for_event(event_id).await?)
    }

    pub async fn registrations_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Registration>, RegistrationError> {
        Ok(self.registrations.list_for_user(user_id).await?)
    }
}
