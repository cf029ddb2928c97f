// Copyright 2025 Cowboy AI, LLC.

//! Events raised by the case file

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::DomainEvent;
use crate::model::{CaseId, CaseType, DefendantId, GroupId, Prosecution};
use crate::reference_data::normalise;
use crate::validation::{DefendantReport, LeveledProblem, ValidationReport};

/// Identifying details of a case, carried on every case event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    /// Case
    pub case_id: CaseId,
    /// Case type the case was validated as
    pub case_type: CaseType,
    /// URN
    pub prosecutor_case_reference: String,
    /// Prosecuting authority OU code
    pub prosecuting_authority: String,
    /// Group the case was submitted in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
}

impl CaseSummary {
    /// Summarise a prosecution
    pub fn of(prosecution: &Prosecution, case_type: CaseType, group_id: Option<GroupId>) -> Self {
        let details = &prosecution.case_details;
        Self {
            case_id: details.case_id,
            case_type,
            prosecutor_case_reference: normalise(&details.prosecutor_case_reference),
            prosecuting_authority: normalise(&details.prosecutor.prosecuting_authority),
            group_id,
        }
    }
}

/// Outcome of validating a case: the case summary and every problem raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    /// Case
    pub case: CaseSummary,
    /// Case-level problems
    pub case_problems: Vec<LeveledProblem>,
    /// Defendants that raised problems
    pub defendants: Vec<DefendantReport>,
}

impl CaseOutcome {
    /// Outcome taken from a validation report
    pub fn from_report(case: CaseSummary, report: &ValidationReport) -> Self {
        Self {
            case,
            case_problems: report.case_problems.clone(),
            defendants: report
                .defendants
                .iter()
                .filter(|d| !d.problems.is_empty())
                .cloned()
                .collect(),
        }
    }
}

/// Validation result of one defendant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendantOutcome {
    /// Case the defendant belongs to
    pub case: CaseSummary,
    /// The defendant's problems
    pub defendant: DefendantReport,
}

/// A group prosecution was accepted or refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOutcome {
    /// Group
    pub group_id: GroupId,
    /// Member cases
    pub cases: Vec<CaseSummary>,
    /// Group-level problems
    pub group_problems: Vec<LeveledProblem>,
    /// Outcome of each member validated before the group was refused
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<CaseOutcome>,
    /// Reason given when the group is refused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Case file events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CaseFileEvent {
    /// SJP case accepted with no problems
    SjpProsecutionReceived(CaseOutcome),
    /// SJP case accepted with warnings
    SjpProsecutionReceivedWithWarnings(CaseOutcome),
    /// SJP case refused
    SjpProsecutionRejected(CaseOutcome),
    /// Charged case accepted with no problems
    CcCaseReceived(CaseOutcome),
    /// Charged case accepted with warnings
    CcCaseReceivedWithWarnings(CaseOutcome),
    /// Charged case refused on case-level errors
    CaseValidationFailed(CaseOutcome),
    /// A defendant of a charged case needs correcting
    DefendantValidationFailed(DefendantOutcome),
    /// A corrected defendant now passes
    DefendantValidationPassed(DefendantOutcome),
    /// Every member of a group was taken on
    GroupProsecutionReceived(GroupOutcome),
    /// The group was refused as a whole
    GroupProsecutionRejected(GroupOutcome),
}

impl CaseFileEvent {
    /// Case the event belongs to; group events have none
    pub fn case_id(&self) -> Option<CaseId> {
        match self {
            CaseFileEvent::SjpProsecutionReceived(outcome)
            | CaseFileEvent::SjpProsecutionReceivedWithWarnings(outcome)
            | CaseFileEvent::SjpProsecutionRejected(outcome)
            | CaseFileEvent::CcCaseReceived(outcome)
            | CaseFileEvent::CcCaseReceivedWithWarnings(outcome)
            | CaseFileEvent::CaseValidationFailed(outcome) => Some(outcome.case.case_id),
            CaseFileEvent::DefendantValidationFailed(outcome)
            | CaseFileEvent::DefendantValidationPassed(outcome) => Some(outcome.case.case_id),
            CaseFileEvent::GroupProsecutionReceived(_)
            | CaseFileEvent::GroupProsecutionRejected(_) => None,
        }
    }

    /// Defendant a defendant event is about
    pub fn defendant_id(&self) -> Option<DefendantId> {
        match self {
            CaseFileEvent::DefendantValidationFailed(outcome)
            | CaseFileEvent::DefendantValidationPassed(outcome) => {
                Some(outcome.defendant.defendant_id)
            }
            _ => None,
        }
    }
}

impl DomainEvent for CaseFileEvent {
    fn aggregate_id(&self) -> Uuid {
        match self {
            CaseFileEvent::GroupProsecutionReceived(outcome)
            | CaseFileEvent::GroupProsecutionRejected(outcome) => *outcome.group_id.as_uuid(),
            other => other
                .case_id()
                .map(|id| *id.as_uuid())
                .unwrap_or_default(),
        }
    }

    fn event_type(&self) -> &'static str {
        match self {
            CaseFileEvent::SjpProsecutionReceived(_) => "SjpProsecutionReceived",
            CaseFileEvent::SjpProsecutionReceivedWithWarnings(_) => {
                "SjpProsecutionReceivedWithWarnings"
            }
            CaseFileEvent::SjpProsecutionRejected(_) => "SjpProsecutionRejected",
            CaseFileEvent::CcCaseReceived(_) => "CcCaseReceived",
            CaseFileEvent::CcCaseReceivedWithWarnings(_) => "CcCaseReceivedWithWarnings",
            CaseFileEvent::CaseValidationFailed(_) => "CaseValidationFailed",
            CaseFileEvent::DefendantValidationFailed(_) => "DefendantValidationFailed",
            CaseFileEvent::DefendantValidationPassed(_) => "DefendantValidationPassed",
            CaseFileEvent::GroupProsecutionReceived(_) => "GroupProsecutionReceived",
            CaseFileEvent::GroupProsecutionRejected(_) => "GroupProsecutionRejected",
        }
    }
}
