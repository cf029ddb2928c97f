// Copyright 2025 Cowboy AI, LLC.

//! Case status projection
//!
//! Keeps one status view and one errors view per case.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EventSequence, Projection};
use crate::case_file::{CaseFileEvent, CaseOutcome, CaseStatus, CaseSummary, DefendantOutcome};
use crate::command_handlers::CaseFileEventEnvelope;
use crate::errors::DomainResult;
use crate::model::{CaseId, CaseType, DefendantId, GroupId};
use crate::query_handlers::{InMemoryReadModel, ReadModelStorage};
use crate::validation::{DefendantReport, LeveledProblem, ProblemLevel};

/// Where a case stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStatusView {
    /// Case
    pub case_id: CaseId,
    /// Case type
    pub case_type: CaseType,
    /// URN
    pub prosecutor_case_reference: String,
    /// Prosecuting authority OU code
    pub prosecuting_authority: String,
    /// Group the case was submitted in
    pub group_id: Option<GroupId>,
    /// Current status
    pub status: CaseStatus,
    /// Error-level problems outstanding
    pub error_count: usize,
    /// Warning-level problems outstanding
    pub warning_count: usize,
    /// Defendants awaiting correction
    pub defendants_pending: Vec<DefendantId>,
    /// Type of the last event applied
    pub last_event: String,
    /// When the last event occurred
    pub updated_at: DateTime<Utc>,
}

/// Outstanding problems of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseErrorsView {
    /// Case
    pub case_id: CaseId,
    /// URN
    pub prosecutor_case_reference: String,
    /// Case-level problems
    pub case_problems: Vec<LeveledProblem>,
    /// Defendants with problems
    pub defendants: Vec<DefendantReport>,
}

impl CaseErrorsView {
    fn empty(case: &CaseSummary) -> Self {
        Self {
            case_id: case.case_id,
            prosecutor_case_reference: case.prosecutor_case_reference.clone(),
            case_problems: Vec::new(),
            defendants: Vec::new(),
        }
    }

    /// Every problem, case-level first
    pub fn problems(&self) -> impl Iterator<Item = &LeveledProblem> {
        self.case_problems
            .iter()
            .chain(self.defendants.iter().flat_map(|d| d.problems.iter()))
    }

    /// Number of problems at a level
    pub fn count(&self, level: ProblemLevel) -> usize {
        self.problems().filter(|p| p.level == level).count()
    }
}

/// Projection of case file events into [`CaseStatusView`] and [`CaseErrorsView`]
#[derive(Clone, Default)]
pub struct CaseStatusProjection {
    statuses: InMemoryReadModel<CaseStatusView>,
    errors: InMemoryReadModel<CaseErrorsView>,
    checkpoint: Option<EventSequence>,
}

impl CaseStatusProjection {
    /// An empty projection
    pub fn new() -> Self {
        Self::default()
    }

    /// Status read model, shared with query handlers
    pub fn statuses(&self) -> InMemoryReadModel<CaseStatusView> {
        self.statuses.clone()
    }

    /// Errors read model, shared with query handlers
    pub fn errors(&self) -> InMemoryReadModel<CaseErrorsView> {
        self.errors.clone()
    }

    /// Apply every event of `log` past the checkpoint, then move the checkpoint
    /// to the end of the log. Returns the number of events applied.
    pub async fn catch_up(&mut self, log: &[CaseFileEventEnvelope]) -> DomainResult<usize> {
        let start = self.checkpoint.map_or(0, |s| s.value() as usize);
        let pending = log.get(start..).unwrap_or_default();
        for event in pending {
            self.handle_event(event).await?;
        }
        self.save_checkpoint(EventSequence::new(log.len().max(start) as u64))
            .await?;
        Ok(pending.len())
    }

    fn record_outcome(
        &self,
        outcome: &CaseOutcome,
        status: CaseStatus,
        envelope: &CaseFileEventEnvelope,
    ) {
        let errors = CaseErrorsView {
            case_problems: outcome.case_problems.clone(),
            defendants: outcome.defendants.clone(),
            ..CaseErrorsView::empty(&outcome.case)
        };
        self.write(&outcome.case, status, errors, Vec::new(), envelope);
    }

    fn record_defendant(&self, outcome: &DefendantOutcome, envelope: &CaseFileEventEnvelope) {
        let key = outcome.case.case_id.to_string();
        let defendant = &outcome.defendant;
        let previous = self.statuses.get(&key);

        let mut errors = self
            .errors
            .get(&key)
            .unwrap_or_else(|| CaseErrorsView::empty(&outcome.case));
        errors
            .defendants
            .retain(|d| d.defendant_id != defendant.defendant_id);
        if !defendant.problems.is_empty() {
            errors.defendants.push(defendant.clone());
        }

        let mut pending = previous
            .as_ref()
            .map(|view| view.defendants_pending.clone())
            .unwrap_or_default();
        pending.retain(|id| *id != defendant.defendant_id);
        if defendant.has_errors() {
            pending.push(defendant.defendant_id);
        }

        let status = previous
            .map(|view| view.status)
            .filter(|_| !defendant.has_errors())
            .unwrap_or(CaseStatus::PendingCorrection);
        self.write(&outcome.case, status, errors, pending, envelope);
    }

    fn write(
        &self,
        case: &CaseSummary,
        status: CaseStatus,
        errors: CaseErrorsView,
        defendants_pending: Vec<DefendantId>,
        envelope: &CaseFileEventEnvelope,
    ) {
        let key = case.case_id.to_string();
        let view = CaseStatusView {
            case_id: case.case_id,
            case_type: case.case_type,
            prosecutor_case_reference: case.prosecutor_case_reference.clone(),
            prosecuting_authority: case.prosecuting_authority.clone(),
            group_id: case.group_id,
            status,
            error_count: errors.count(ProblemLevel::Error),
            warning_count: errors.count(ProblemLevel::Warning),
            defendants_pending,
            last_event: envelope.event_type.clone(),
            updated_at: envelope.occurred_at,
        };
        debug!(case_id = %case.case_id, status = %status, "Case status projected");
        self.statuses.insert(key.clone(), view);
        self.errors.insert(key, errors);
    }
}

#[async_trait]
impl Projection for CaseStatusProjection {
    async fn handle_event(&mut self, envelope: &CaseFileEventEnvelope) -> DomainResult<()> {
        match &envelope.payload {
            CaseFileEvent::SjpProsecutionReceived(outcome)
            | CaseFileEvent::CcCaseReceived(outcome) => {
                self.record_outcome(outcome, CaseStatus::Accepted, envelope)
            }
            CaseFileEvent::SjpProsecutionReceivedWithWarnings(outcome)
            | CaseFileEvent::CcCaseReceivedWithWarnings(outcome) => {
                self.record_outcome(outcome, CaseStatus::AcceptedWithWarnings, envelope)
            }
            CaseFileEvent::SjpProsecutionRejected(outcome)
            | CaseFileEvent::CaseValidationFailed(outcome) => {
                self.record_outcome(outcome, CaseStatus::Rejected, envelope)
            }
            CaseFileEvent::DefendantValidationFailed(outcome)
            | CaseFileEvent::DefendantValidationPassed(outcome) => {
                self.record_defendant(outcome, envelope)
            }
            CaseFileEvent::GroupProsecutionRejected(group) => {
                for case in &group.cases {
                    let mut outcome = CaseOutcome {
                        case: case.clone(),
                        case_problems: group.group_problems.clone(),
                        defendants: Vec::new(),
                    };
                    let member = group.members.iter().find(|m| m.case.case_id == case.case_id);
                    if let Some(member) = member {
                        outcome.case_problems.extend(member.case_problems.iter().cloned());
                        outcome.defendants = member.defendants.clone();
                    }
                    self.record_outcome(&outcome, CaseStatus::Rejected, envelope);
                }
            }
            // members are projected from their own events
            CaseFileEvent::GroupProsecutionReceived(_) => {}
        }
        Ok(())
    }

    async fn get_checkpoint(&self) -> Option<EventSequence> {
        self.checkpoint
    }

    async fn save_checkpoint(&mut self, sequence: EventSequence) -> DomainResult<()> {
        self.checkpoint = Some(sequence);
        Ok(())
    }

    async fn clear(&mut self) -> DomainResult<()> {
        self.statuses.clear();
        self.errors.clear();
        self.checkpoint = None;
        Ok(())
    }
}
