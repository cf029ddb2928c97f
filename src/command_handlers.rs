// Copyright 2025 Cowboy AI, LLC.

//! Command handlers for the prosecution case file
//!
//! Handlers validate submissions, store the resulting case files and publish
//! their events. They return only acknowledgments; use the query side to read
//! what a command produced.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, instrument, warn};

use crate::case_file::{
    CaseFileEvent, CaseOutcome, CaseStatus, CaseSummary, CorrectDefendant, GroupOutcome,
    ProsecutionCaseFile, ReceiveCcProsecution, ReceiveGroupProsecution, ReceiveSjpProsecution,
};
use crate::cqrs::{Command, CommandAcknowledgment, CommandEnvelope};
use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::events::DomainEventEnvelope;
use crate::model::{CaseId, CaseType, Prosecution};
use crate::validation::{Decision, ValidatedProsecution, ValidationPipeline};

/// Envelope of a published case file event
pub type CaseFileEventEnvelope = DomainEventEnvelope<CaseFileEvent>;

/// Handles one command type
#[async_trait]
pub trait CommandHandler<C: Command> {
    /// Handle the command and acknowledge it
    async fn handle(&self, envelope: CommandEnvelope<C>) -> DomainResult<CommandAcknowledgment>;
}

/// Publishes case file events to the outside world
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish events in order
    async fn publish(&self, events: &[CaseFileEventEnvelope]) -> DomainResult<()>;
}

/// Publisher that keeps every event in memory
#[derive(Clone, Default)]
pub struct InMemoryEventPublisher {
    published: Arc<RwLock<Vec<CaseFileEventEnvelope>>>,
}

impl InMemoryEventPublisher {
    /// An empty publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far
    pub fn published(&self) -> Vec<CaseFileEventEnvelope> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Event type names published so far
    pub fn event_types(&self) -> Vec<String> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, events: &[CaseFileEventEnvelope]) -> DomainResult<()> {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(events);
        Ok(())
    }
}

/// Repository trait for loading and saving aggregates
pub trait AggregateRepository<A: AggregateRoot>: Send + Sync {
    /// Load aggregate by ID
    fn load(&self, id: A::Id) -> DomainResult<Option<A>>;

    /// Save an aggregate over the stored one, which must be at `expected_version`
    /// (0 when nothing is stored)
    fn save(&self, aggregate: &A, expected_version: u64) -> DomainResult<()>;

    /// Remove the aggregate stored under `id`, if any
    fn remove(&self, id: A::Id) -> DomainResult<()>;

    /// Whether an aggregate is stored under `id`
    fn exists(&self, id: A::Id) -> DomainResult<bool> {
        Ok(self.load(id)?.is_some())
    }
}

/// In-memory repository
pub struct InMemoryRepository<A: AggregateRoot + Clone + Send + Sync> {
    storage: Arc<RwLock<HashMap<A::Id, A>>>,
}

impl<A: AggregateRoot + Clone + Send + Sync> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot + Clone + Send + Sync> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<A: AggregateRoot + Clone + Send + Sync> InMemoryRepository<A> {
    /// An empty repository
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored aggregates
    pub fn len(&self) -> usize {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: AggregateRoot + Clone + Send + Sync> AggregateRepository<A> for InMemoryRepository<A> {
    fn load(&self, id: A::Id) -> DomainResult<Option<A>> {
        Ok(self
            .storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }

    fn save(&self, aggregate: &A, expected_version: u64) -> DomainResult<()> {
        let mut storage = self
            .storage
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let actual = storage.get(&aggregate.id()).map_or(0, A::version);
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                expected: expected_version,
                actual,
            });
        }
        storage.insert(aggregate.id(), aggregate.clone());
        Ok(())
    }

    fn remove(&self, id: A::Id) -> DomainResult<()> {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        Ok(())
    }
}

/// Handles every case file command
pub struct CaseFileCommandHandler<R, P> {
    pipeline: Arc<ValidationPipeline>,
    repository: R,
    publisher: P,
}

impl<R, P> CaseFileCommandHandler<R, P>
where
    R: AggregateRepository<ProsecutionCaseFile>,
    P: EventPublisher,
{
    /// Create a handler
    pub fn new(pipeline: Arc<ValidationPipeline>, repository: R, publisher: P) -> Self {
        Self {
            pipeline,
            repository,
            publisher,
        }
    }

    /// The repository case files are stored in
    pub fn repository(&self) -> &R {
        &self.repository
    }

    async fn receive<C>(
        &self,
        envelope: &CommandEnvelope<C>,
        prosecution: &Prosecution,
        case_type: CaseType,
    ) -> DomainResult<CommandAcknowledgment> {
        let case_id = prosecution.case_id();
        if self.repository.exists(case_id)? {
            return Err(DomainError::AlreadyExists(format!("case {case_id}")));
        }

        let validated = self.pipeline.validate(prosecution, case_type).await?;
        let reason = validated.report.error_summary();
        let (case_file, events) = ProsecutionCaseFile::receive(validated, case_type)?;
        self.repository.save(&case_file, 0)?;
        if let Err(err) = self.publish(envelope, events).await {
            warn!(case_id = %case_id, error = %err, "Publish failed, case file withdrawn");
            self.withdraw(&[case_id])?;
            return Err(err);
        }

        info!(
            case_id = %case_id,
            case_type = %case_type,
            status = %case_file.status(),
            "Prosecution received"
        );
        Ok(match case_file.status() {
            CaseStatus::Rejected => CommandAcknowledgment::rejected(envelope, reason),
            _ => CommandAcknowledgment::accepted(envelope),
        })
    }

    async fn publish<C>(
        &self,
        envelope: &CommandEnvelope<C>,
        events: Vec<CaseFileEvent>,
    ) -> DomainResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let envelopes: Vec<CaseFileEventEnvelope> = events
            .into_iter()
            .map(|event| DomainEventEnvelope::caused_by(event, &envelope.identity))
            .collect();
        self.publisher.publish(&envelopes).await
    }

    fn withdraw(&self, case_ids: &[CaseId]) -> DomainResult<()> {
        for case_id in case_ids {
            self.repository.remove(*case_id)?;
        }
        Ok(())
    }
}

#[async_trait]
impl<R, P> CommandHandler<ReceiveSjpProsecution> for CaseFileCommandHandler<R, P>
where
    R: AggregateRepository<ProsecutionCaseFile>,
    P: EventPublisher,
{
    #[instrument(skip_all, fields(command_id = %envelope.id))]
    async fn handle(
        &self,
        envelope: CommandEnvelope<ReceiveSjpProsecution>,
    ) -> DomainResult<CommandAcknowledgment> {
        self.receive(&envelope, &envelope.command.prosecution, CaseType::Sjp)
            .await
    }
}

#[async_trait]
impl<R, P> CommandHandler<ReceiveCcProsecution> for CaseFileCommandHandler<R, P>
where
    R: AggregateRepository<ProsecutionCaseFile>,
    P: EventPublisher,
{
    #[instrument(skip_all, fields(command_id = %envelope.id))]
    async fn handle(
        &self,
        envelope: CommandEnvelope<ReceiveCcProsecution>,
    ) -> DomainResult<CommandAcknowledgment> {
        self.receive(&envelope, &envelope.command.prosecution, CaseType::CrownCourt)
            .await
    }
}

#[async_trait]
impl<R, P> CommandHandler<ReceiveGroupProsecution> for CaseFileCommandHandler<R, P>
where
    R: AggregateRepository<ProsecutionCaseFile>,
    P: EventPublisher,
{
    #[instrument(skip_all, fields(command_id = %envelope.id))]
    async fn handle(
        &self,
        envelope: CommandEnvelope<ReceiveGroupProsecution>,
    ) -> DomainResult<CommandAcknowledgment> {
        let group = &envelope.command.group;
        for member in &group.cases {
            let case_id = member.prosecution.case_id();
            if self.repository.exists(case_id)? {
                return Err(DomainError::AlreadyExists(format!("case {case_id}")));
            }
        }

        let validated = self.pipeline.validate_group(group).await?;
        let report = validated.report;
        let cases: Vec<CaseSummary> = validated
            .group
            .cases
            .iter()
            .map(|m| CaseSummary::of(&m.prosecution, CaseType::Group, Some(group.group_id)))
            .collect();

        if report.is_rejected() {
            let reason = report.error_summary();
            warn!(group_id = %group.group_id, %reason, "Group prosecution rejected");
            let members = cases
                .iter()
                .zip(&report.members)
                .map(|(case, member)| CaseOutcome::from_report(case.clone(), member))
                .collect();
            let event = CaseFileEvent::GroupProsecutionRejected(GroupOutcome {
                group_id: group.group_id,
                cases,
                group_problems: report.group_problems,
                members,
                reason: Some(reason.clone()),
            });
            self.publish(&envelope, vec![event]).await?;
            return Ok(CommandAcknowledgment::rejected(&envelope, reason));
        }

        let mut case_files = Vec::with_capacity(group.cases.len());
        let mut events = Vec::new();
        for ((member, member_report), (_, decision)) in validated
            .group
            .cases
            .into_iter()
            .zip(report.members.iter().cloned())
            .zip(report.member_decisions())
        {
            let (case_file, case_events) = ProsecutionCaseFile::receive_group_member(
                ValidatedProsecution {
                    prosecution: member.prosecution,
                    report: member_report,
                },
                group.group_id,
                decision,
            )?;
            case_files.push(case_file);
            events.extend(case_events);
        }
        events.push(CaseFileEvent::GroupProsecutionReceived(GroupOutcome {
            group_id: group.group_id,
            cases,
            group_problems: report.group_problems,
            members: Vec::new(),
            reason: None,
        }));

        let mut stored = Vec::with_capacity(case_files.len());
        for case_file in &case_files {
            if let Err(err) = self.repository.save(case_file, 0) {
                self.withdraw(&stored)?;
                return Err(err);
            }
            stored.push(case_file.id());
        }
        if let Err(err) = self.publish(&envelope, events).await {
            warn!(group_id = %group.group_id, error = %err, "Publish failed, group withdrawn");
            self.withdraw(&stored)?;
            return Err(err);
        }

        info!(
            group_id = %group.group_id,
            cases = group.cases.len(),
            "Group prosecution received"
        );
        Ok(CommandAcknowledgment::accepted(&envelope))
    }
}

#[async_trait]
impl<R, P> CommandHandler<CorrectDefendant> for CaseFileCommandHandler<R, P>
where
    R: AggregateRepository<ProsecutionCaseFile>,
    P: EventPublisher,
{
    #[instrument(skip_all, fields(command_id = %envelope.id, case_id = %envelope.command.case_id))]
    async fn handle(
        &self,
        envelope: CommandEnvelope<CorrectDefendant>,
    ) -> DomainResult<CommandAcknowledgment> {
        let command = &envelope.command;
        let mut case_file = self
            .repository
            .load(command.case_id)?
            .ok_or_else(|| DomainError::CaseNotFound(command.case_id.to_string()))?;
        let loaded_version = case_file.version();

        let payload = case_file.corrected_prosecution(command.defendant.clone())?;
        let validated = self
            .pipeline
            .validate(&payload, case_file.case_type())
            .await?;
        let decision = validated.report.decision(case_file.case_type());
        let reason = validated.report.error_summary();

        let loaded = case_file.clone();
        let events = case_file.apply_correction(command.defendant.id, validated)?;
        self.repository.save(&case_file, loaded_version)?;
        if let Err(err) = self.publish(&envelope, events).await {
            warn!(error = %err, "Publish failed, correction undone");
            self.repository.save(&loaded, case_file.version())?;
            return Err(err);
        }

        info!(
            defendant_id = %command.defendant.id,
            status = %case_file.status(),
            "Defendant corrected"
        );
        Ok(match decision {
            Decision::Rejected => CommandAcknowledgment::rejected(&envelope, reason),
            _ => CommandAcknowledgment::accepted(&envelope),
        })
    }
}
