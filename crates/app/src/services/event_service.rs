//! Event service: use-cases for managing competitions.

use eodsa_domain::error::{EodsaError, NotFoundError};
use eodsa_domain::event::{Event, EventFilter, EventStatus};
use eodsa_domain::id::EventId;

use crate::ports::{Backend, EventRepository, Ports};

/// Application service for event CRUD and status changes.
pub struct EventService<B: Backend> {
    events: B::Events,
}

impl<B: Backend> EventService<B> {
    pub fn new(ports: &Ports<B>) -> Self {
        Self {
            events: ports.events.clone(),
        }
    }

    /// Create a new event after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    pub async fn create_event(&self, event: Event) -> Result<Event, EodsaError> {
        event.validate()?;
        let event = self.events.create(event).await?;
        tracing::info!(event_id = %event.id, name = %event.name, "event created");
        Ok(event)
    }

    /// Look up an event by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] when no event with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_event(&self, id: EventId) -> Result<Event, EodsaError> {
        self.events.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Event",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List events matching `filter`, by event date.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>, EodsaError> {
        let mut events = self.events.list().await?;
        events.retain(|event| filter.matches(event));
        Ok(events)
    }

    /// Move an event to `status`. Admins may set any status.
    ///
    /// # Errors
    ///
    /// Returns [`EodsaError::NotFound`] if the event does not exist.
    pub async fn set_status(&self, id: EventId, status: EventStatus) -> Result<Event, EodsaError> {
        let mut event = self.get_event(id).await?;
        let previous = event.status;
        event.status = status;
        let event = self.events.update(event).await?;
        tracing::info!(event_id = %id, %previous, current = %status, "event status changed");
        Ok(event)
    }
}
