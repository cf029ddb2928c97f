// Copyright 2025 Cowboy AI, LLC.

//! # CQRS (Command Query Responsibility Segregation) Pattern
//!
//! Message identity, envelopes and acknowledgments shared by the case-file
//! command side and query side. Commands never return data; the outcome of a
//! submission is observable through events and the read models.

use crate::entity::{CommandMarker, EntityId, QueryMarker};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use uuid::Uuid;

/// Correlation ID for tracking related commands and events.
///
/// - Single: one submission; correlation == message_id
/// - Transaction: a group prosecution; correlation == group transaction id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value")]
pub enum CorrelationId {
    /// Non-transactional, correlation equals message_id
    Single(Uuid),
    /// Transactional, correlation equals aggregate transaction id
    Transaction(AggregateTransactionId),
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationId::Single(id) => write!(f, "correlation:{}", id),
            CorrelationId::Transaction(tx) => write!(f, "correlation:{}", tx.0),
        }
    }
}

/// Causation ID for tracking event causality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CausationId(pub Uuid);

impl fmt::Display for CausationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "causation:{}", self.0)
    }
}

/// Transaction identifier spanning every case of a group prosecution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AggregateTransactionId(pub Uuid);

impl From<AggregateTransactionId> for CorrelationId {
    fn from(tx: AggregateTransactionId) -> Self {
        CorrelationId::Transaction(tx)
    }
}

/// Factory for creating message identities
pub struct MessageFactory;

impl MessageFactory {
    /// Root identity for a standalone message: correlation == causation == message id
    pub fn create_root(id: Uuid) -> MessageIdentity {
        MessageIdentity {
            correlation_id: CorrelationId::Single(id),
            causation_id: CausationId(id),
            message_id: id,
        }
    }

    /// Root identity inside a transaction (correlation comes from tx)
    pub fn create_root_in_tx(id: Uuid, tx: AggregateTransactionId) -> MessageIdentity {
        MessageIdentity {
            correlation_id: tx.into(),
            causation_id: CausationId(id),
            message_id: id,
        }
    }

    /// Identity for a message caused by `parent` (continues correlation)
    pub fn caused_by(id: Uuid, parent: &MessageIdentity) -> MessageIdentity {
        MessageIdentity {
            correlation_id: parent.correlation_id,
            causation_id: CausationId(parent.message_id),
            message_id: id,
        }
    }
}

/// Message identity for tracking message metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MessageIdentity {
    /// Correlation shared by everything the originating message caused
    pub correlation_id: CorrelationId,
    /// The message that directly caused this one
    pub causation_id: CausationId,
    /// This message's own id
    pub message_id: Uuid,
}

/// Status of command acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CommandStatus {
    /// Command was accepted for processing
    Accepted,
    /// Command was rejected (e.g., validation failed)
    Rejected,
}

/// Acknowledgment returned when a command is submitted
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommandAcknowledgment {
    /// The command ID that was acknowledged
    pub command_id: CommandId,
    /// Correlation ID (same as command ID for originating commands)
    pub correlation_id: CorrelationId,
    /// Status of command acceptance
    pub status: CommandStatus,
    /// Optional rejection reason
    pub reason: Option<String>,
}

impl CommandAcknowledgment {
    /// Acknowledge an accepted command
    pub fn accepted<C>(envelope: &CommandEnvelope<C>) -> Self {
        Self {
            command_id: envelope.id,
            correlation_id: envelope.identity.correlation_id,
            status: CommandStatus::Accepted,
            reason: None,
        }
    }

    /// Acknowledge a rejected command with a reason
    pub fn rejected<C>(envelope: &CommandEnvelope<C>, reason: impl Into<String>) -> Self {
        Self {
            command_id: envelope.id,
            correlation_id: envelope.identity.correlation_id,
            status: CommandStatus::Rejected,
            reason: Some(reason.into()),
        }
    }
}

/// A command that requests a state change
///
/// Commands are named with imperative verbs (`ReceiveSjpProsecution`,
/// `CorrectDefendant`). Results come through events, not return values.
pub trait Command: Debug + Send + Sync {
    /// The aggregate type this command targets
    type Aggregate;

    /// Get the aggregate ID this command targets
    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>>;
}

/// A query that requests data without modifying state
pub trait Query: Debug + Send + Sync {}

/// Type alias for command IDs
pub type CommandId = EntityId<CommandMarker>;

/// Type alias for query IDs
pub type QueryId = EntityId<QueryMarker>;

/// Event ID - UUID v7 for time-ordered event identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new EventId with UUID v7 (time-ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A command with metadata for tracking and auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope<C> {
    /// Unique identifier for this command instance
    pub id: CommandId,
    /// The actual command
    pub command: C,
    /// Who issued this command
    pub issued_by: String,
    /// Message identity (correlation and causation)
    pub identity: MessageIdentity,
}

impl<C: Command> CommandEnvelope<C> {
    /// Create a standalone command envelope
    pub fn new(command: C, issued_by: impl Into<String>) -> Self {
        let id = CommandId::new();
        let identity = MessageFactory::create_root(*id.as_uuid());
        Self {
            id,
            command,
            issued_by: issued_by.into(),
            identity,
        }
    }

    /// Create a command envelope within a transaction (group prosecutions)
    pub fn new_in_tx(command: C, issued_by: impl Into<String>, tx: AggregateTransactionId) -> Self {
        let id = CommandId::new();
        let identity = MessageFactory::create_root_in_tx(*id.as_uuid(), tx);
        Self {
            id,
            command,
            issued_by: issued_by.into(),
            identity,
        }
    }

    /// Get the correlation ID
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.identity.correlation_id
    }

    /// Get the causation ID
    pub fn causation_id(&self) -> &CausationId {
        &self.identity.causation_id
    }
}

/// A query with metadata for tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryEnvelope<Q> {
    /// Unique identifier for this query instance
    pub id: QueryId,
    /// The actual query
    pub query: Q,
    /// Who issued this query
    pub issued_by: String,
    /// Message identity (correlation and causation)
    pub identity: MessageIdentity,
}

impl<Q: Query> QueryEnvelope<Q> {
    /// Create a standalone query envelope
    pub fn new(query: Q, issued_by: impl Into<String>) -> Self {
        let id = QueryId::new();
        let identity = MessageFactory::create_root(*id.as_uuid());
        Self {
            id,
            query,
            issued_by: issued_by.into(),
            identity,
        }
    }

    /// Get the correlation ID
    pub fn correlation_id(&self) -> &CorrelationId {
        &self.identity.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CaseMarker;

    #[derive(Debug, Clone)]
    struct TestCommand {
        aggregate_id: Option<EntityId<CaseMarker>>,
    }

    impl Command for TestCommand {
        type Aggregate = CaseMarker;

        fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>> {
            self.aggregate_id
        }
    }

    #[derive(Debug, Clone)]
    struct TestQuery;

    impl Query for TestQuery {}

    #[test]
    fn test_command_envelope_new_is_self_correlated() {
        let envelope = CommandEnvelope::new(
            TestCommand {
                aggregate_id: Some(EntityId::new()),
            },
            "prosecutor-portal",
        );

        assert_eq!(envelope.issued_by, "prosecutor-portal");
        assert_eq!(
            envelope.identity.correlation_id,
            CorrelationId::Single(*envelope.id.as_uuid())
        );
        assert_eq!(envelope.identity.causation_id.0, *envelope.id.as_uuid());
        assert!(envelope.command.aggregate_id().is_some());
    }

    #[test]
    fn test_command_envelope_in_tx_uses_group_correlation() {
        let tx = AggregateTransactionId(Uuid::new_v4());
        let envelope = CommandEnvelope::new_in_tx(TestCommand { aggregate_id: None }, "spi", tx);

        match envelope.identity.correlation_id {
            CorrelationId::Transaction(t) => assert_eq!(t.0, tx.0),
            _ => panic!("expected transactional correlation"),
        }
        assert_eq!(envelope.causation_id().0, *envelope.id.as_uuid());
    }

    #[test]
    fn test_caused_by_continues_correlation() {
        let parent = CommandEnvelope::new(TestCommand { aggregate_id: None }, "spi");
        let child = MessageFactory::caused_by(Uuid::new_v4(), &parent.identity);

        assert_eq!(child.causation_id.0, *parent.id.as_uuid());
        assert_eq!(&child.correlation_id, parent.correlation_id());
        assert_ne!(child.message_id, parent.identity.message_id);
    }

    #[test]
    fn test_query_envelope_new() {
        let envelope = QueryEnvelope::new(TestQuery, "caseworker");
        assert_eq!(envelope.issued_by, "caseworker");
        assert_eq!(
            *envelope.correlation_id(),
            CorrelationId::Single(*envelope.id.as_uuid())
        );
    }

    #[test]
    fn test_acknowledgment_helpers() {
        let envelope = CommandEnvelope::new(TestCommand { aggregate_id: None }, "spi");

        let ack = CommandAcknowledgment::accepted(&envelope);
        assert_eq!(ack.status, CommandStatus::Accepted);
        assert!(ack.reason.is_none());

        let rejected = CommandAcknowledgment::rejected(&envelope, "Validation failed");
        assert_eq!(rejected.status, CommandStatus::Rejected);
        assert_eq!(rejected.reason.as_deref(), Some("Validation failed"));
        assert_eq!(rejected.command_id, envelope.id);
    }

    #[test]
    fn test_correlation_id_display() {
        let id = Uuid::new_v4();
        let display = format!("{}", CorrelationId::Single(id));
        assert_eq!(display, format!("correlation:{id}"));
        assert_eq!(format!("{}", CausationId(id)), format!("causation:{id}"));
    }

    #[test]
    fn event_id_is_monotonic_non_decreasing_by_bytes() {
        let mut ids: Vec<EventId> = Vec::new();
        for _ in 0..12 {
            ids.push(EventId::new());
        }
        for w in ids.windows(2) {
            let a = (w[0].0).as_bytes();
            let b = (w[1].0).as_bytes();
            assert!(a <= b, "EventId must be non-decreasing: {:?} <= {:?}", a, b);
        }
    }
}
