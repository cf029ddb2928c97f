// Copyright (c) 2025 - Cowboy AI, LLC.

//! Domain events
//!
//! Events represent facts that have occurred to a case file. They are immutable
//! and are the only output of the command side.

use crate::cqrs::{CausationId, CorrelationId, EventId, MessageFactory, MessageIdentity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base trait for all domain events
///
/// # Examples
///
/// ```rust
/// use prosecution_casefile::DomainEvent;
/// use uuid::Uuid;
///
/// #[derive(Debug)]
/// struct CaseReferred {
///     case_id: Uuid,
/// }
///
/// impl DomainEvent for CaseReferred {
///     fn aggregate_id(&self) -> Uuid {
///         self.case_id
///     }
///
///     fn event_type(&self) -> &'static str {
///         "CaseReferred"
///     }
/// }
///
/// let event = CaseReferred { case_id: Uuid::new_v4() };
/// assert_eq!(event.event_type(), "CaseReferred");
/// assert_eq!(event.version(), "v1");
/// ```
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;

    /// Get the schema version
    fn version(&self) -> &'static str {
        "v1"
    }
}

/// Event envelope carrying identity alongside the inline payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEventEnvelope<E> {
    /// The event ID
    pub event_id: EventId,

    /// Aggregate identifier copied from the event
    pub aggregate_id: Uuid,

    /// Event type name copied from the event
    pub event_type: String,

    /// Correlation ID for tracking across services
    pub correlation_id: CorrelationId,

    /// ID of the message that caused this one
    pub causation_id: CausationId,

    /// When the event was recorded
    pub occurred_at: DateTime<Utc>,

    /// Event payload
    pub payload: E,
}

impl<E: DomainEvent> DomainEventEnvelope<E> {
    /// Wrap an event caused by the message with the given identity
    pub fn caused_by(event: E, cause: &MessageIdentity) -> Self {
        let event_id = EventId::new();
        let identity = MessageFactory::caused_by(event_id.0, cause);
        Self {
            event_id,
            aggregate_id: event.aggregate_id(),
            event_type: event.event_type().to_string(),
            correlation_id: identity.correlation_id,
            causation_id: identity.causation_id,
            occurred_at: Utc::now(),
            payload: event,
        }
    }
}
