// Copyright 2025 Cowboy AI, LLC.

//! # Prosecution Case File
//!
//! The prosecution case-file bounded context: criminal case submissions are
//! received, enriched with reference data, validated by a rule pipeline chosen
//! for the kind of case, and recorded as case files whose outcome is published
//! as events.
//!
//! - **Model**: the submission payload (case, prosecutor, defendants, offences)
//! - **Reference data**: offence, prosecutor, court and code-list lookups
//! - **Validation**: prioritised rules at case, defendant, offence and group scope
//! - **Case file**: the aggregate, its commands and its events
//! - **Queries**: status and error read models kept by a projection
//!
//! ## Case types
//!
//! 1. **SJP**: Single Justice Procedure cases; any error rejects the case
//! 2. **Crown Court**: charged cases; defendant errors hold the case for correction
//! 3. **Group**: many charged cases from one prosecutor, validated together

#![warn(missing_docs)]

mod entity;
mod errors;

pub mod bootstrap;
pub mod case_file;
pub mod command_handlers;
pub mod config;
pub mod cqrs;
pub mod enrichment;
pub mod events;
pub mod model;
pub mod projections;
pub mod query_handlers;
pub mod reference_data;
pub mod telemetry;
pub mod validation;

#[cfg(test)]
mod test_support;

/// Phantom markers that type entity ids
pub mod markers {
    pub use crate::entity::{
        CaseMarker, CommandMarker, DefendantMarker, GroupMarker, OffenceMarker, QueryMarker,
    };
}

pub use bootstrap::{bootstrap, CaseFileService};
pub use case_file::{
    CaseFileEvent, CaseStatus, CorrectDefendant, ProsecutionCaseFile, ReceiveCcProsecution,
    ReceiveGroupProsecution, ReceiveSjpProsecution,
};
pub use command_handlers::{
    AggregateRepository, CaseFileCommandHandler, CommandHandler, EventPublisher,
    InMemoryEventPublisher, InMemoryRepository,
};
pub use config::{CaseFileConfig, ValidationSettings};
pub use cqrs::{
    AggregateTransactionId, CausationId, Command, CommandAcknowledgment, CommandEnvelope,
    CommandId, CommandStatus, CorrelationId, EventId, MessageIdentity, Query, QueryEnvelope,
    QueryId,
};
pub use entity::{AggregateRoot, EntityId};
pub use errors::{DomainError, DomainResult};
pub use events::{DomainEvent, DomainEventEnvelope};
pub use model::{CaseId, CaseType, DefendantId, GroupId, OffenceId, Prosecution};
pub use projections::{CaseErrorsView, CaseStatusProjection, CaseStatusView, Projection};
pub use query_handlers::{
    CaseFileQueryHandler, DirectQueryHandler, FindCaseByReference, FindCasesWithErrors,
    GetCaseErrors, GetCaseStatus,
};
pub use reference_data::{ReferenceDataQueryService, ReferenceDataSnapshot};
pub use validation::{Decision, ValidationPipeline, ValidationReport};
