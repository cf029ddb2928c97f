// Copyright 2025 Cowboy AI, LLC.

//! Rule selection by case type

use super::rules::{case, defendant, group, offence};
use super::{RuleSet, ValidationContext};
use crate::config::ValidationSettings;
use crate::model::{CaseType, Defendant, GroupProsecution, InitiationCode, Offence, Prosecution};

const CHARGED_INITIATION: [InitiationCode; 5] = [
    InitiationCode::C,
    InitiationCode::S,
    InitiationCode::R,
    InitiationCode::O,
    InitiationCode::Z,
];

/// Case, defendant and offence rule sets for one case type
#[derive(Debug)]
pub struct RuleProvider {
    case_type: CaseType,
    case_rules: RuleSet<Prosecution, ValidationContext>,
    defendant_rules: RuleSet<Defendant, ValidationContext>,
    offence_rules: RuleSet<Offence, ValidationContext>,
}

impl RuleProvider {
    /// Assemble the catalogue for `case_type`
    pub fn for_case_type(case_type: CaseType, settings: &ValidationSettings) -> Self {
        let (case_rules, defendant_rules, offence_rules) = match case_type {
            CaseType::Sjp => (
                sjp_case_rules(),
                sjp_defendant_rules(settings),
                sjp_offence_rules(settings),
            ),
            CaseType::CrownCourt | CaseType::Group => (
                charged_case_rules(),
                charged_defendant_rules(),
                charged_offence_rules(settings),
            ),
        };

        Self {
            case_type,
            case_rules,
            defendant_rules: defendant_rules.extend(data_quality_rules()),
            offence_rules,
        }
    }

    /// Rules run once over a whole group prosecution
    pub fn group_rules() -> RuleSet<GroupProsecution, ValidationSettings> {
        RuleSet::new()
            .error(group::GroupNotEmpty)
            .error(group::SingleGroupMaster)
            .error(group::SingleProsecutor)
            .error(group::UniqueCaseIds)
            .error(group::UniqueCaseReferences)
            .error(group::GroupSize)
    }

    /// Case type the rules were selected for
    pub fn case_type(&self) -> CaseType {
        self.case_type
    }

    /// Case-level rules
    pub fn case_rules(&self) -> &RuleSet<Prosecution, ValidationContext> {
        &self.case_rules
    }

    /// Defendant-level rules
    pub fn defendant_rules(&self) -> &RuleSet<Defendant, ValidationContext> {
        &self.defendant_rules
    }

    /// Offence-level rules
    pub fn offence_rules(&self) -> &RuleSet<Offence, ValidationContext> {
        &self.offence_rules
    }
}

fn sjp_case_rules() -> RuleSet<Prosecution, ValidationContext> {
    RuleSet::new()
        .error(case::ProsecutorKnown)
        .error(case::ProsecutorSjpEnabled)
        .error(case::InitiationCodeAllowed::new([InitiationCode::J]))
        .error(case::DefendantsRequired)
        .error(case::SingleSjpDefendant)
        .error(case::CaseReferenceFormat)
        .error(case::DateReceivedNotInFuture)
}

fn charged_case_rules() -> RuleSet<Prosecution, ValidationContext> {
    RuleSet::new()
        .error(case::ProsecutorKnown)
        .error(case::InitiationCodeAllowed::new(CHARGED_INITIATION))
        .error(case::DefendantsRequired)
        .error(case::CaseReferenceFormat)
        .error(case::DateReceivedNotInFuture)
        .error(case::UniqueDefendantReferences)
        .error(case::SummonsCodeKnown)
}

fn sjp_defendant_rules(settings: &ValidationSettings) -> RuleSet<Defendant, ValidationContext> {
    RuleSet::new()
        .error(defendant::OffencesRequired)
        .error(defendant::DefendantNamed)
        .error(defendant::AdultDefendant::new(settings.sjp_minimum_age))
        .error(defendant::DateOfBirthNotInFuture)
        .error(defendant::PostalAddressRequired)
        .error(defendant::MaxOffences::new(settings.sjp_max_offences))
        .error(defendant::UniqueOffenceSequence)
}

fn charged_defendant_rules() -> RuleSet<Defendant, ValidationContext> {
    RuleSet::new()
        .error(defendant::OffencesRequired)
        .error(defendant::InitialHearingRequired)
        .error(defendant::DefendantNamed)
        .error(defendant::DateOfBirthNotInFuture)
        .error(defendant::HearingCourtKnown)
        .error(defendant::CustodyStatusKnown)
        .error(defendant::UniqueOffenceSequence)
        .warning(defendant::HearingDateNotPast)
}

fn data_quality_rules() -> RuleSet<Defendant, ValidationContext> {
    use defendant::{PersonCode, PersonCodeKnown};

    RuleSet::new()
        .warning(PersonCodeKnown::new(PersonCode::Nationality))
        .warning(PersonCodeKnown::new(PersonCode::ObservedEthnicity))
        .warning(PersonCodeKnown::new(PersonCode::SelfDefinedEthnicity))
        .warning(defendant::PostcodeFormat)
        .warning(defendant::TitleRecognised)
}

fn sjp_offence_rules(settings: &ValidationSettings) -> RuleSet<Offence, ValidationContext> {
    RuleSet::new()
        .error(offence::OffenceCodeKnown)
        .error(offence::OffenceInForce)
        .error(offence::SjpEligibleOffence)
        .error(offence::SummaryOnlyOffence)
        .error(offence::OffenceDates)
        .error(offence::WordingRequired)
        .error(offence::StatementOfFactsRequired)
        .error(offence::OffenceLocationRequired)
        .error(offence::CompensationNotNegative)
        .warning(offence::SummaryTimeLimit::new(settings.summary_time_limit_months))
}

fn charged_offence_rules(settings: &ValidationSettings) -> RuleSet<Offence, ValidationContext> {
    RuleSet::new()
        .error(offence::OffenceCodeKnown)
        .error(offence::OffenceInForce)
        .error(offence::OffenceDates)
        .error(offence::ChargeAndArrestDates)
        .error(offence::WordingRequired)
        .error(offence::OffenceLocationRequired)
        .error(offence::CompensationNotNegative)
        .warning(offence::SummaryTimeLimit::new(settings.summary_time_limit_months))
}
