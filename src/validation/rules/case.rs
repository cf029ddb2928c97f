// Copyright 2025 Cowboy AI, LLC.

//! Case-level rules

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

use crate::model::{InitiationCode, Prosecution};
use crate::validation::{
    Problem, ProblemCode, ValidationContext, ValidationResult, ValidationRule,
};

/// The prosecuting authority must be in reference data
pub struct ProsecutorKnown;

impl ValidationRule<Prosecution, ValidationContext> for ProsecutorKnown {
    fn name(&self) -> &str {
        "prosecutor_known"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        let prosecutor = &prosecution.case_details.prosecutor;
        prosecutor
            .reference_data
            .is_none()
            .then(|| {
                Problem::new(ProblemCode::ProsecutorNotFound)
                    .with_value("prosecutingAuthority", &prosecutor.prosecuting_authority)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// An SJP prosecutor must be enabled for SJP
pub struct ProsecutorSjpEnabled;

impl ValidationRule<Prosecution, ValidationContext> for ProsecutorSjpEnabled {
    fn name(&self) -> &str {
        "prosecutor_sjp_enabled"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        let prosecutor = &prosecution.case_details.prosecutor;
        match &prosecutor.reference_data {
            Some(details) if !details.sjp_enabled => ValidationResult::invalid(
                Problem::new(ProblemCode::ProsecutorNotSjpEnabled)
                    .with_value("prosecutingAuthority", &prosecutor.prosecuting_authority),
            ),
            _ => ValidationResult::Valid,
        }
    }

    fn priority(&self) -> u32 {
        90
    }
}

/// The initiation code must be one the case type allows
pub struct InitiationCodeAllowed {
    allowed: Vec<InitiationCode>,
}

impl InitiationCodeAllowed {
    /// Allow the given codes
    pub fn new(allowed: impl IntoIterator<Item = InitiationCode>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl ValidationRule<Prosecution, ValidationContext> for InitiationCodeAllowed {
    fn name(&self) -> &str {
        "initiation_code_allowed"
    }

    fn validate(&self, prosecution: &Prosecution, context: &ValidationContext) -> ValidationResult {
        let code = prosecution.case_details.initiation_code;
        (!self.allowed.contains(&code))
            .then(|| {
                Problem::new(ProblemCode::InvalidInitiationCode)
                    .with_value("initiationCode", code.code())
                    .with_value("caseType", context.case_type)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        90
    }
}

static URN: OnceLock<Option<Regex>> = OnceLock::new();

/// The prosecutor case reference must be 1-20 letters and digits
pub struct CaseReferenceFormat;

impl ValidationRule<Prosecution, ValidationContext> for CaseReferenceFormat {
    fn name(&self) -> &str {
        "case_reference_format"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        let Some(urn) = URN.get_or_init(|| Regex::new(r"^[A-Z0-9]{1,20}$").ok()) else {
            return ValidationResult::Valid;
        };
        let reference = &prosecution.case_details.prosecutor_case_reference;
        (!urn.is_match(reference))
            .then(|| {
                Problem::new(ProblemCode::InvalidCaseReference)
                    .with_value("prosecutorCaseReference", reference)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        80
    }
}

/// The case cannot be received in the future
pub struct DateReceivedNotInFuture;

impl ValidationRule<Prosecution, ValidationContext> for DateReceivedNotInFuture {
    fn name(&self) -> &str {
        "date_received_not_in_future"
    }

    fn validate(&self, prosecution: &Prosecution, context: &ValidationContext) -> ValidationResult {
        let received = prosecution.case_details.date_received;
        (received > context.today)
            .then(|| {
                Problem::new(ProblemCode::DateReceivedInFuture).with_value("dateReceived", received)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        60
    }
}

/// A case needs at least one defendant
pub struct DefendantsRequired;

impl ValidationRule<Prosecution, ValidationContext> for DefendantsRequired {
    fn name(&self) -> &str {
        "defendants_required"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        prosecution
            .defendants
            .is_empty()
            .then(|| Problem::new(ProblemCode::DefendantsRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// An SJP notice names exactly one defendant
pub struct SingleSjpDefendant;

impl ValidationRule<Prosecution, ValidationContext> for SingleSjpDefendant {
    fn name(&self) -> &str {
        "single_sjp_defendant"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        let count = prosecution.defendants.len();
        (count > 1)
            .then(|| {
                Problem::new(ProblemCode::SjpSingleDefendantRequired).with_value("count", count)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        90
    }
}

/// Prosecutor defendant references are unique within the case
pub struct UniqueDefendantReferences;

impl ValidationRule<Prosecution, ValidationContext> for UniqueDefendantReferences {
    fn name(&self) -> &str {
        "unique_defendant_references"
    }

    fn validate(&self, prosecution: &Prosecution, _: &ValidationContext) -> ValidationResult {
        let mut seen: IndexMap<String, usize> = IndexMap::new();
        for defendant in &prosecution.defendants {
            *seen
                .entry(defendant.prosecutor_defendant_reference.to_ascii_uppercase())
                .or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(reference, _)| {
                Problem::new(ProblemCode::DuplicateDefendantReference)
                    .with_value("prosecutorDefendantReference", reference)
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        60
    }
}

/// Summons cases carry a known summons code
pub struct SummonsCodeKnown;

impl ValidationRule<Prosecution, ValidationContext> for SummonsCodeKnown {
    fn name(&self) -> &str {
        "summons_code_known"
    }

    fn validate(&self, prosecution: &Prosecution, context: &ValidationContext) -> ValidationResult {
        let case = &prosecution.case_details;
        if case.initiation_code != InitiationCode::S {
            return ValidationResult::Valid;
        }
        match &case.summons_code {
            None => ValidationResult::invalid(Problem::new(ProblemCode::SummonsCodeRequired)),
            Some(code) if !context.reference_data.is_known_summons_code(code) => {
                ValidationResult::invalid(
                    Problem::new(ProblemCode::SummonsCodeNotFound).with_value("summonsCode", code),
                )
            }
            Some(_) => ValidationResult::Valid,
        }
    }
}
