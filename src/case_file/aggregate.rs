// Copyright 2025 Cowboy AI, LLC.

//! The prosecution case file aggregate
//!
//! A case file is created when a submission has been validated. Its status
//! follows the decision of the validation report; a case held for correction
//! moves on each time a corrected defendant is revalidated.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::{CaseFileEvent, CaseOutcome, CaseSummary, DefendantOutcome};
use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::model::{CaseId, CaseType, Defendant, DefendantId, GroupId, Prosecution};
use crate::validation::{Decision, DefendantReport, ValidatedProsecution, ValidationReport};

/// Status of a case file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Validated, decision not yet applied
    Received,
    /// Accepted with no problems
    Accepted,
    /// Accepted with warnings
    AcceptedWithWarnings,
    /// Held until defendants are corrected
    PendingCorrection,
    /// Refused
    Rejected,
}

impl CaseStatus {
    /// Status name
    pub fn name(&self) -> &'static str {
        match self {
            CaseStatus::Received => "RECEIVED",
            CaseStatus::Accepted => "ACCEPTED",
            CaseStatus::AcceptedWithWarnings => "ACCEPTED_WITH_WARNINGS",
            CaseStatus::PendingCorrection => "PENDING_CORRECTION",
            CaseStatus::Rejected => "REJECTED",
        }
    }

    /// No further submission can change a terminal case
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CaseStatus::Accepted | CaseStatus::AcceptedWithWarnings | CaseStatus::Rejected
        )
    }

    /// Whether `target` may follow this status
    pub fn can_transition_to(&self, target: CaseStatus) -> bool {
        match self {
            CaseStatus::Received | CaseStatus::PendingCorrection => {
                target != CaseStatus::Received
            }
            _ => false,
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&Decision> for CaseStatus {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Accepted => CaseStatus::Accepted,
            Decision::AcceptedWithWarnings => CaseStatus::AcceptedWithWarnings,
            Decision::PendingCorrection { .. } => CaseStatus::PendingCorrection,
            Decision::Rejected => CaseStatus::Rejected,
        }
    }
}

/// A prosecution case file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProsecutionCaseFile {
    id: CaseId,
    version: u64,
    case_type: CaseType,
    group_id: Option<GroupId>,
    status: CaseStatus,
    prosecution: Prosecution,
    report: ValidationReport,
}

impl ProsecutionCaseFile {
    /// Open a case file from a validated standalone submission
    pub fn receive(
        validated: ValidatedProsecution,
        case_type: CaseType,
    ) -> DomainResult<(Self, Vec<CaseFileEvent>)> {
        let decision = validated.report.decision(case_type);
        Self::open(validated, case_type, None, decision)
    }

    /// Open a case file for a member of a group, with the decision the group
    /// validation gave it
    pub fn receive_group_member(
        validated: ValidatedProsecution,
        group_id: GroupId,
        decision: Decision,
    ) -> DomainResult<(Self, Vec<CaseFileEvent>)> {
        Self::open(validated, CaseType::Group, Some(group_id), decision)
    }

    fn open(
        validated: ValidatedProsecution,
        case_type: CaseType,
        group_id: Option<GroupId>,
        decision: Decision,
    ) -> DomainResult<(Self, Vec<CaseFileEvent>)> {
        let ValidatedProsecution {
            prosecution,
            report,
        } = validated;
        let mut case_file = Self {
            id: prosecution.case_id(),
            version: 0,
            case_type,
            group_id,
            status: CaseStatus::Received,
            prosecution,
            report,
        };
        case_file.transition(CaseStatus::from(&decision))?;
        let events = case_file.decision_events(&decision);
        case_file.increment_version();
        Ok((case_file, events))
    }

    /// The payload with `defendant` swapped in, ready to be revalidated
    pub fn corrected_prosecution(&self, defendant: Defendant) -> DomainResult<Prosecution> {
        if self.status != CaseStatus::PendingCorrection {
            return Err(DomainError::InvalidOperation {
                reason: format!("case {} is {}, not awaiting correction", self.id, self.status),
            });
        }
        let defendant_id = defendant.id;
        let mut prosecution = self.prosecution.clone();
        prosecution
            .replace_defendant(defendant)
            .ok_or_else(|| DomainError::DefendantNotFound {
                case_id: self.id.to_string(),
                defendant_id: defendant_id.to_string(),
            })?;
        Ok(prosecution)
    }

    /// Apply the revalidation of a corrected defendant
    pub fn apply_correction(
        &mut self,
        defendant_id: DefendantId,
        validated: ValidatedProsecution,
    ) -> DomainResult<Vec<CaseFileEvent>> {
        if validated.prosecution.case_id() != self.id {
            return Err(DomainError::InvalidOperation {
                reason: format!(
                    "revalidated case {} does not match case file {}",
                    validated.prosecution.case_id(),
                    self.id
                ),
            });
        }

        let decision = validated.report.decision(self.case_type);
        self.transition(CaseStatus::from(&decision))?;
        self.prosecution = validated.prosecution;
        self.report = validated.report;

        let defendant = self
            .report
            .defendant(defendant_id)
            .cloned()
            .unwrap_or_else(|| DefendantReport {
                defendant_id,
                prosecutor_defendant_reference: String::new(),
                problems: Vec::new(),
            });
        let outcome = DefendantOutcome {
            case: self.summary(),
            defendant,
        };
        let mut events = vec![if outcome.defendant.has_errors() {
            CaseFileEvent::DefendantValidationFailed(outcome)
        } else {
            CaseFileEvent::DefendantValidationPassed(outcome)
        }];
        if !matches!(decision, Decision::PendingCorrection { .. }) {
            events.extend(self.decision_events(&decision));
        }
        self.increment_version();
        Ok(events)
    }

    fn transition(&mut self, target: CaseStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        Ok(())
    }

    fn decision_events(&self, decision: &Decision) -> Vec<CaseFileEvent> {
        let outcome = || CaseOutcome::from_report(self.summary(), &self.report);
        match (self.case_type, decision) {
            (CaseType::Sjp, Decision::Accepted) => {
                vec![CaseFileEvent::SjpProsecutionReceived(outcome())]
            }
            (CaseType::Sjp, Decision::AcceptedWithWarnings) => {
                vec![CaseFileEvent::SjpProsecutionReceivedWithWarnings(outcome())]
            }
            (CaseType::Sjp, _) => vec![CaseFileEvent::SjpProsecutionRejected(outcome())],
            (_, Decision::Accepted) => vec![CaseFileEvent::CcCaseReceived(outcome())],
            (_, Decision::AcceptedWithWarnings) => {
                vec![CaseFileEvent::CcCaseReceivedWithWarnings(outcome())]
            }
            (_, Decision::PendingCorrection { defendant_ids }) => defendant_ids
                .iter()
                .filter_map(|id| self.report.defendant(*id))
                .map(|defendant| {
                    CaseFileEvent::DefendantValidationFailed(DefendantOutcome {
                        case: self.summary(),
                        defendant: defendant.clone(),
                    })
                })
                .collect(),
            (_, Decision::Rejected) => vec![CaseFileEvent::CaseValidationFailed(outcome())],
        }
    }

    /// Summary carried on this case's events
    pub fn summary(&self) -> CaseSummary {
        CaseSummary::of(&self.prosecution, self.case_type, self.group_id)
    }

    /// Case type the case was validated as
    pub fn case_type(&self) -> CaseType {
        self.case_type
    }

    /// Group the case was submitted in
    pub fn group_id(&self) -> Option<GroupId> {
        self.group_id
    }

    /// Current status
    pub fn status(&self) -> CaseStatus {
        self.status
    }

    /// Enriched payload as last validated
    pub fn prosecution(&self) -> &Prosecution {
        &self.prosecution
    }

    /// Report of the last validation
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}

impl AggregateRoot for ProsecutionCaseFile {
    type Id = CaseId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationSettings;
    use crate::events::DomainEvent;
    use crate::test_support::{fixtures, reference_data, today};
    use crate::validation::ValidationPipeline;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn pipeline() -> ValidationPipeline {
        ValidationPipeline::new(Arc::new(reference_data()), ValidationSettings::default())
            .with_today(today())
    }

    fn event_types(events: &[CaseFileEvent]) -> Vec<&'static str> {
        events.iter().map(|e| e.event_type()).collect()
    }

    #[test]
    fn status_transitions() {
        assert!(CaseStatus::Received.can_transition_to(CaseStatus::PendingCorrection));
        assert!(CaseStatus::PendingCorrection.can_transition_to(CaseStatus::PendingCorrection));
        assert!(CaseStatus::PendingCorrection.can_transition_to(CaseStatus::Accepted));
        assert!(!CaseStatus::Accepted.can_transition_to(CaseStatus::Rejected));
        assert!(!CaseStatus::Rejected.can_transition_to(CaseStatus::Accepted));
        assert!(!CaseStatus::PendingCorrection.can_transition_to(CaseStatus::Received));
        assert!(CaseStatus::AcceptedWithWarnings.is_terminal());
        assert!(!CaseStatus::PendingCorrection.is_terminal());
    }

    #[tokio::test]
    async fn clean_sjp_case_opens_accepted() {
        let validated = pipeline()
            .validate(&fixtures::sjp_prosecution(), CaseType::Sjp)
            .await
            .unwrap();

        let (case_file, events) = ProsecutionCaseFile::receive(validated, CaseType::Sjp).unwrap();

        assert_eq!(case_file.status(), CaseStatus::Accepted);
        assert_eq!(case_file.version(), 1);
        assert_eq!(event_types(&events), vec!["SjpProsecutionReceived"]);
    }

    #[tokio::test]
    async fn sjp_defendant_error_rejects() {
        let mut prosecution = fixtures::sjp_prosecution();
        prosecution.defendants[0].address = None;
        let validated = pipeline().validate(&prosecution, CaseType::Sjp).await.unwrap();

        let (case_file, events) = ProsecutionCaseFile::receive(validated, CaseType::Sjp).unwrap();

        assert_eq!(case_file.status(), CaseStatus::Rejected);
        assert_eq!(event_types(&events), vec!["SjpProsecutionRejected"]);
        let CaseFileEvent::SjpProsecutionRejected(outcome) = &events[0] else {
            panic!("unexpected event {:?}", events[0]);
        };
        assert_eq!(outcome.defendants.len(), 1);
    }

    #[tokio::test]
    async fn held_defendant_is_corrected() {
        let pipeline = pipeline();
        let mut prosecution = fixtures::cc_prosecution();
        let hearing = prosecution.defendants[0].initial_hearing.take();
        let defendant_id = prosecution.defendants[0].id;

        let validated = pipeline
            .validate(&prosecution, CaseType::CrownCourt)
            .await
            .unwrap();
        let (mut case_file, events) =
            ProsecutionCaseFile::receive(validated, CaseType::CrownCourt).unwrap();
        assert_eq!(case_file.status(), CaseStatus::PendingCorrection);
        assert_eq!(event_types(&events), vec!["DefendantValidationFailed"]);
        assert_eq!(events[0].defendant_id(), Some(defendant_id));

        let mut corrected = case_file.prosecution().defendants[0].clone();
        corrected.initial_hearing = hearing;
        let payload = case_file.corrected_prosecution(corrected).unwrap();
        let revalidated = pipeline
            .validate(&payload, CaseType::CrownCourt)
            .await
            .unwrap();
        let events = case_file.apply_correction(defendant_id, revalidated).unwrap();

        assert_eq!(case_file.status(), CaseStatus::Accepted);
        assert_eq!(case_file.version(), 2);
        assert_eq!(
            event_types(&events),
            vec!["DefendantValidationPassed", "CcCaseReceived"]
        );
    }

    #[tokio::test]
    async fn accepted_case_cannot_be_corrected() {
        let validated = pipeline()
            .validate(&fixtures::cc_prosecution(), CaseType::CrownCourt)
            .await
            .unwrap();
        let (case_file, _) =
            ProsecutionCaseFile::receive(validated, CaseType::CrownCourt).unwrap();

        let defendant = case_file.prosecution().defendants[0].clone();
        let err = case_file.corrected_prosecution(defendant).unwrap_err();
        assert!(matches!(err, DomainError::InvalidOperation { .. }));
    }

    #[tokio::test]
    async fn unknown_defendant_is_not_found() {
        let mut prosecution = fixtures::cc_prosecution();
        prosecution.defendants[0].initial_hearing = None;
        let validated = pipeline()
            .validate(&prosecution, CaseType::CrownCourt)
            .await
            .unwrap();
        let (case_file, _) =
            ProsecutionCaseFile::receive(validated, CaseType::CrownCourt).unwrap();

        let stranger = fixtures::defendant("MET-DEF-9", vec![]);
        let err = case_file.corrected_prosecution(stranger).unwrap_err();
        assert!(err.is_not_found());
    }
}
