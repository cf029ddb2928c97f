// Copyright 2025 Cowboy AI, LLC.

//! Aggregated validation outcome and the decision it implies

use serde::{Deserialize, Serialize};

use super::{LeveledProblem, ProblemLevel};
use crate::model::{CaseId, CaseType, DefendantId, GroupId};

/// Problems raised against one defendant and its offences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefendantReport {
    /// Defendant
    pub defendant_id: DefendantId,
    /// Prosecutor's reference for the defendant
    pub prosecutor_defendant_reference: String,
    /// Defendant and offence problems; offence problems carry `offenceId`
    pub problems: Vec<LeveledProblem>,
}

impl DefendantReport {
    /// Whether any problem is an error
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(LeveledProblem::is_error)
    }

    /// Error-level problems
    pub fn errors(&self) -> impl Iterator<Item = &LeveledProblem> {
        self.problems.iter().filter(|p| p.is_error())
    }

    /// Warning-level problems
    pub fn warnings(&self) -> impl Iterator<Item = &LeveledProblem> {
        self.problems.iter().filter(|p| !p.is_error())
    }
}

/// What should happen to a validated submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// No problems
    Accepted,
    /// Warnings only
    AcceptedWithWarnings,
    /// Held until the listed defendants are corrected
    PendingCorrection {
        /// Defendants with errors
        defendant_ids: Vec<DefendantId>,
    },
    /// Refused
    Rejected,
}

impl Decision {
    /// Whether the case is accepted, with or without warnings
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted | Decision::AcceptedWithWarnings)
    }
}

/// Outcome of validating one prosecution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Case validated
    pub case_id: CaseId,
    /// Case type the rules were selected for
    pub case_type: CaseType,
    /// Case-level problems
    pub case_problems: Vec<LeveledProblem>,
    /// One entry per defendant; empty when a blocking case rule failed
    pub defendants: Vec<DefendantReport>,
    /// Blocking case rule that stopped defendant validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
}

impl ValidationReport {
    /// An empty report
    pub fn new(case_id: CaseId, case_type: CaseType) -> Self {
        Self {
            case_id,
            case_type,
            case_problems: Vec::new(),
            defendants: Vec::new(),
            blocked_by: None,
        }
    }

    /// Whether any case-level problem is an error
    pub fn has_case_errors(&self) -> bool {
        self.case_problems.iter().any(LeveledProblem::is_error)
    }

    /// Defendants with at least one error, in payload order
    pub fn defendants_with_errors(&self) -> Vec<DefendantId> {
        self.defendants
            .iter()
            .filter(|d| d.has_errors())
            .map(|d| d.defendant_id)
            .collect()
    }

    /// Report for one defendant
    pub fn defendant(&self, id: DefendantId) -> Option<&DefendantReport> {
        self.defendants.iter().find(|d| d.defendant_id == id)
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

    /// Whether nothing was raised
    pub fn is_clean(&self) -> bool {
        self.problems().next().is_none()
    }

    /// Decide the outcome for `case_type`.
    ///
    /// A case-level error rejects any case. Defendant errors reject an SJP case
    /// outright but hold Crown Court and group cases for correction.
    pub fn decision(&self, case_type: CaseType) -> Decision {
        if self.has_case_errors() {
            return Decision::Rejected;
        }
        let defendant_ids = self.defendants_with_errors();
        if !defendant_ids.is_empty() {
            return match case_type {
                CaseType::Sjp => Decision::Rejected,
                CaseType::CrownCourt | CaseType::Group => {
                    Decision::PendingCorrection { defendant_ids }
                }
            };
        }
        if self.count(ProblemLevel::Warning) > 0 {
            Decision::AcceptedWithWarnings
        } else {
            Decision::Accepted
        }
    }

    /// One-line description of the errors, used as a rejection reason
    pub fn error_summary(&self) -> String {
        let codes: Vec<&str> = self
            .problems()
            .filter(|p| p.is_error())
            .map(|p| p.code().as_str())
            .collect();
        if codes.is_empty() {
            "no errors".to_string()
        } else {
            codes.join(", ")
        }
    }
}

/// Outcome of validating a group prosecution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupValidationReport {
    /// Group validated
    pub group_id: GroupId,
    /// Problems raised by the group rules
    pub group_problems: Vec<LeveledProblem>,
    /// Member reports, in submission order
    pub members: Vec<ValidationReport>,
    /// Blocking group rule that stopped member validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<String>,
}

impl GroupValidationReport {
    /// A group error or any member case-level error rejects the whole group
    pub fn is_rejected(&self) -> bool {
        self.group_problems.iter().any(LeveledProblem::is_error)
            || self.members.iter().any(ValidationReport::has_case_errors)
    }

    /// Decision per member; every member is rejected when the group is
    pub fn member_decisions(&self) -> Vec<(CaseId, Decision)> {
        let rejected = self.is_rejected();
        self.members
            .iter()
            .map(|member| {
                let decision = if rejected {
                    Decision::Rejected
                } else {
                    member.decision(CaseType::Group)
                };
                (member.case_id, decision)
            })
            .collect()
    }

    /// One-line description of the errors, used as a rejection reason
    pub fn error_summary(&self) -> String {
        let mut codes: Vec<&str> = self
            .group_problems
            .iter()
            .filter(|p| p.is_error())
            .map(|p| p.code().as_str())
            .collect();
        for member in &self.members {
            codes.extend(
                member
                    .case_problems
                    .iter()
                    .filter(|p| p.is_error())
                    .map(|p| p.code().as_str()),
            );
        }
        codes.dedup();
        if codes.is_empty() {
            "no errors".to_string()
        } else {
            codes.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Problem, ProblemCode};
    use pretty_assertions::assert_eq;

    fn problem(level: ProblemLevel, code: ProblemCode) -> LeveledProblem {
        LeveledProblem {
            level,
            rule: "test".into(),
            problem: Problem::new(code),
        }
    }

    fn report_with(
        case: Vec<LeveledProblem>,
        defendant: Vec<LeveledProblem>,
    ) -> (ValidationReport, DefendantId) {
        let defendant_id = DefendantId::new();
        let mut report = ValidationReport::new(CaseId::new(), CaseType::CrownCourt);
        report.case_problems = case;
        report.defendants.push(DefendantReport {
            defendant_id,
            prosecutor_defendant_reference: "D1".into(),
            problems: defendant,
        });
        (report, defendant_id)
    }

    #[test]
    fn clean_report_is_accepted() {
        let (report, _) = report_with(vec![], vec![]);
        assert!(report.is_clean());
        assert_eq!(report.decision(CaseType::Sjp), Decision::Accepted);
    }

    #[test]
    fn warnings_only_accept_with_warnings() {
        let (report, _) = report_with(
            vec![],
            vec![problem(ProblemLevel::Warning, ProblemCode::InvalidPostcode)],
        );
        assert_eq!(report.decision(CaseType::CrownCourt), Decision::AcceptedWithWarnings);
    }

    #[test]
    fn case_error_rejects_every_case_type() {
        let (report, _) = report_with(
            vec![problem(ProblemLevel::Error, ProblemCode::ProsecutorNotFound)],
            vec![],
        );
        for case_type in [CaseType::Sjp, CaseType::CrownCourt, CaseType::Group] {
            assert_eq!(report.decision(case_type), Decision::Rejected);
        }
    }

    #[test]
    fn defendant_error_depends_on_case_type() {
        let (report, defendant_id) = report_with(
            vec![problem(ProblemLevel::Warning, ProblemCode::DateReceivedInFuture)],
            vec![problem(ProblemLevel::Error, ProblemCode::AddressRequired)],
        );
        assert_eq!(report.decision(CaseType::Sjp), Decision::Rejected);
        assert_eq!(
            report.decision(CaseType::CrownCourt),
            Decision::PendingCorrection {
                defendant_ids: vec![defendant_id]
            }
        );
        assert_eq!(report.error_summary(), "ADDRESS_REQUIRED");
    }

    #[test]
    fn member_case_error_rejects_group() {
        let (clean, _) = report_with(vec![], vec![]);
        let (broken, _) = report_with(
            vec![problem(ProblemLevel::Error, ProblemCode::ProsecutorNotFound)],
            vec![],
        );
        let report = GroupValidationReport {
            group_id: GroupId::new(),
            group_problems: vec![],
            members: vec![clean, broken],
            blocked_by: None,
        };
        assert!(report.is_rejected());
        assert!(report
            .member_decisions()
            .iter()
            .all(|(_, d)| *d == Decision::Rejected));
    }

    #[test]
    fn decision_serializes_with_tag() {
        let json = serde_json::to_value(Decision::PendingCorrection {
            defendant_ids: vec![],
        })
        .unwrap();
        assert_eq!(json["decision"], "PENDING_CORRECTION");
    }
}
