// Copyright 2025 Cowboy AI, LLC.

//! Fetch, enrich, evaluate, aggregate

use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    DefendantReport, GroupValidationReport, LeveledProblem, ProblemLevel, RuleProvider, RuleSet,
    ValidationContext, ValidationReport,
};
use crate::config::ValidationSettings;
use crate::enrichment::enrich;
use crate::errors::DomainResult;
use crate::model::{CaseType, GroupMember, GroupProsecution, Offence, Prosecution};
use crate::reference_data::{ReferenceDataQueryService, ReferenceDataSnapshot};

/// An enriched prosecution and its report
#[derive(Debug, Clone)]
pub struct ValidatedProsecution {
    /// Payload after enrichment
    pub prosecution: Prosecution,
    /// What the rules found
    pub report: ValidationReport,
}

/// An enriched group and its report
#[derive(Debug, Clone)]
pub struct ValidatedGroup {
    /// Group with enriched member payloads
    pub group: GroupProsecution,
    /// What the rules found
    pub report: GroupValidationReport,
}

/// Validates submissions against the rule catalogue of their case type
pub struct ValidationPipeline {
    reference_data: Arc<dyn ReferenceDataQueryService>,
    settings: Arc<ValidationSettings>,
    sjp: RuleProvider,
    crown_court: RuleProvider,
    group: RuleProvider,
    group_rules: RuleSet<GroupProsecution, ValidationSettings>,
    today: Option<NaiveDate>,
}

impl ValidationPipeline {
    /// Build the catalogues for every case type
    pub fn new(
        reference_data: Arc<dyn ReferenceDataQueryService>,
        settings: ValidationSettings,
    ) -> Self {
        Self {
            reference_data,
            sjp: RuleProvider::for_case_type(CaseType::Sjp, &settings),
            crown_court: RuleProvider::for_case_type(CaseType::CrownCourt, &settings),
            group: RuleProvider::for_case_type(CaseType::Group, &settings),
            group_rules: RuleProvider::group_rules(),
            settings: Arc::new(settings),
            today: None,
        }
    }

    /// Validate as of a fixed date instead of the current UTC date
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Rule thresholds in use
    pub fn settings(&self) -> &ValidationSettings {
        &self.settings
    }

    /// Rules used for a case type
    pub fn provider(&self, case_type: CaseType) -> &RuleProvider {
        match case_type {
            CaseType::Sjp => &self.sjp,
            CaseType::CrownCourt => &self.crown_court,
            CaseType::Group => &self.group,
        }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Fetch reference data, enrich and validate one prosecution
    pub async fn validate(
        &self,
        prosecution: &Prosecution,
        case_type: CaseType,
    ) -> DomainResult<ValidatedProsecution> {
        let snapshot =
            ReferenceDataSnapshot::fetch(self.reference_data.as_ref(), &[prosecution]).await?;
        Ok(self.validate_with(prosecution, case_type, Arc::new(snapshot)))
    }

    /// Enrich and validate against an already fetched snapshot
    pub fn validate_with(
        &self,
        prosecution: &Prosecution,
        case_type: CaseType,
        snapshot: Arc<ReferenceDataSnapshot>,
    ) -> ValidatedProsecution {
        let enriched = enrich(prosecution, &snapshot);
        let context = ValidationContext {
            case_type,
            case: Arc::new(enriched.case_details.clone()),
            reference_data: snapshot,
            settings: Arc::clone(&self.settings),
            today: self.today(),
        };
        let report = self.evaluate(&enriched, &context);

        info!(
            case_id = %report.case_id,
            case_type = %case_type,
            errors = report.count(ProblemLevel::Error),
            warnings = report.count(ProblemLevel::Warning),
            blocked_by = report.blocked_by.as_deref().unwrap_or("-"),
            "Prosecution validated"
        );
        ValidatedProsecution {
            prosecution: enriched,
            report,
        }
    }

    fn evaluate(&self, prosecution: &Prosecution, context: &ValidationContext) -> ValidationReport {
        let provider = self.provider(context.case_type);
        let mut report = ValidationReport::new(prosecution.case_id(), context.case_type);

        let case = provider.case_rules().evaluate(prosecution, context);
        report.case_problems = case.problems;
        if let Some(rule) = case.blocked_by {
            debug!(
                case_id = %report.case_id,
                rule = %rule,
                "Case rules blocked defendant validation"
            );
            report.blocked_by = Some(rule);
            return report;
        }

        for defendant in &prosecution.defendants {
            let outcome = provider.defendant_rules().evaluate(defendant, context);
            let mut problems = outcome.problems;
            if outcome.blocked_by.is_none() {
                for offence in &defendant.offences {
                    let offence_outcome = provider.offence_rules().evaluate(offence, context);
                    problems.extend(
                        offence_outcome
                            .problems
                            .into_iter()
                            .map(|problem| tag_offence(problem, offence)),
                    );
                }
            }
            report.defendants.push(DefendantReport {
                defendant_id: defendant.id,
                prosecutor_defendant_reference: defendant.prosecutor_defendant_reference.clone(),
                problems,
            });
        }
        report
    }

    /// Validate a group: group rules first, then every member as a group case
    /// against one shared snapshot
    pub async fn validate_group(&self, group: &GroupProsecution) -> DomainResult<ValidatedGroup> {
        let members: Vec<&Prosecution> = group.cases.iter().map(|m| &m.prosecution).collect();
        let snapshot =
            Arc::new(ReferenceDataSnapshot::fetch(self.reference_data.as_ref(), &members).await?);

        let outcome = self.group_rules.evaluate(group, &self.settings);
        let mut report = GroupValidationReport {
            group_id: group.group_id,
            group_problems: outcome.problems,
            members: Vec::with_capacity(group.cases.len()),
            blocked_by: outcome.blocked_by,
        };

        let mut enriched = GroupProsecution {
            group_id: group.group_id,
            cases: Vec::with_capacity(group.cases.len()),
        };
        for member in &group.cases {
            if report.blocked_by.is_some() {
                enriched.cases.push(member.clone());
                continue;
            }
            let validated =
                self.validate_with(&member.prosecution, CaseType::Group, Arc::clone(&snapshot));
            report.members.push(validated.report);
            enriched.cases.push(GroupMember {
                is_group_master: member.is_group_master,
                prosecution: validated.prosecution,
            });
        }

        info!(
            group_id = %group.group_id,
            cases = group.cases.len(),
            rejected = report.is_rejected(),
            "Group prosecution validated"
        );
        Ok(ValidatedGroup {
            group: enriched,
            report,
        })
    }
}

fn tag_offence(mut leveled: LeveledProblem, offence: &Offence) -> LeveledProblem {
    leveled.problem = leveled
        .problem
        .with_entity_value("offenceId", offence.offence_id, offence.offence_id)
        .with_entity_value(
            "offenceSequenceNumber",
            offence.offence_sequence_number,
            offence.offence_id,
        );
    leveled
}
