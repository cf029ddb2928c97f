// Copyright 2025 Cowboy AI, LLC.

//! Offence-level rules
//!
//! Rules that need the offence definition read the version in force on the
//! offence's effective date from the context's snapshot.

use chrono::Months;
use rust_decimal::Decimal;

use crate::model::{has_text, ModeOfTrial, Offence};
use crate::reference_data::OffenceReferenceData;
use crate::validation::{
    Problem, ProblemCode, ValidationContext, ValidationResult, ValidationRule,
};

fn version<'a>(
    offence: &Offence,
    context: &'a ValidationContext,
) -> Option<&'a OffenceReferenceData> {
    context
        .reference_data
        .offence_on(&offence.offence_code, offence.effective_date())
}

fn offence_problem(code: ProblemCode, offence: &Offence) -> Problem {
    Problem::new(code).with_value("offenceCode", &offence.offence_code)
}

/// The offence code must exist in reference data
pub struct OffenceCodeKnown;

impl ValidationRule<Offence, ValidationContext> for OffenceCodeKnown {
    fn name(&self) -> &str {
        "offence_code_known"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        context
            .reference_data
            .offence_versions(&offence.offence_code)
            .is_empty()
            .then(|| offence_problem(ProblemCode::OffenceCodeNotFound, offence))
            .into()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// Some version of the offence must be in force on the committed date
pub struct OffenceInForce;

impl ValidationRule<Offence, ValidationContext> for OffenceInForce {
    fn name(&self) -> &str {
        "offence_in_force"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        version(offence, context)
            .is_none()
            .then(|| {
                offence_problem(ProblemCode::OffenceNotInForce, offence)
                    .with_value("offenceCommittedDate", offence.offence_committed_date)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        90
    }
}

/// Committed dates are consistent: not after receipt, and the range ordered
pub struct OffenceDates;

impl ValidationRule<Offence, ValidationContext> for OffenceDates {
    fn name(&self) -> &str {
        "offence_dates"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        let committed = offence.offence_committed_date;
        let future = (committed > context.date_received()).then(|| {
            offence_problem(ProblemCode::OffenceDateInFuture, offence)
                .with_value("offenceCommittedDate", committed)
        });
        let range = offence
            .offence_committed_end_date
            .filter(|end| *end < committed)
            .map(|end| {
                offence_problem(ProblemCode::OffenceDateRangeInvalid, offence)
                    .with_value("offenceCommittedDate", committed)
                    .with_value("offenceCommittedEndDate", end)
            });
        ValidationResult::from(future).and(range.into())
    }

    fn priority(&self) -> u32 {
        70
    }
}

/// Arrest, charge and offence dates are in order
pub struct ChargeAndArrestDates;

impl ValidationRule<Offence, ValidationContext> for ChargeAndArrestDates {
    fn name(&self) -> &str {
        "charge_and_arrest_dates"
    }

    fn validate(&self, offence: &Offence, _: &ValidationContext) -> ValidationResult {
        let charge_before_offence = offence
            .charge_date
            .filter(|charged| *charged < offence.offence_committed_date)
            .map(|charged| {
                offence_problem(ProblemCode::ChargeDateBeforeOffenceDate, offence)
                    .with_value("chargeDate", charged)
            });
        let arrest_after_charge = offence
            .arrest_date
            .zip(offence.charge_date)
            .filter(|(arrested, charged)| arrested > charged)
            .map(|(arrested, charged)| {
                offence_problem(ProblemCode::ArrestDateAfterChargeDate, offence)
                    .with_value("arrestDate", arrested)
                    .with_value("chargeDate", charged)
            });
        ValidationResult::from(charge_before_offence).and(arrest_after_charge.into())
    }
}

/// A location is given when the offence definition needs one
pub struct OffenceLocationRequired;

impl ValidationRule<Offence, ValidationContext> for OffenceLocationRequired {
    fn name(&self) -> &str {
        "offence_location_required"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        let required = version(offence, context).is_some_and(|v| v.location_required);
        (required && !has_text(&offence.offence_location))
            .then(|| offence_problem(ProblemCode::OffenceLocationRequired, offence))
            .into()
    }
}

/// The offence may be prosecuted by SJP notice
pub struct SjpEligibleOffence;

impl ValidationRule<Offence, ValidationContext> for SjpEligibleOffence {
    fn name(&self) -> &str {
        "sjp_eligible_offence"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        version(offence, context)
            .filter(|v| !v.sjp_eligible)
            .map(|_| offence_problem(ProblemCode::OffenceNotSjpEligible, offence))
            .into()
    }

    fn priority(&self) -> u32 {
        80
    }
}

/// The offence is triable only summarily
pub struct SummaryOnlyOffence;

impl ValidationRule<Offence, ValidationContext> for SummaryOnlyOffence {
    fn name(&self) -> &str {
        "summary_only_offence"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        version(offence, context)
            .filter(|v| v.mode_of_trial != ModeOfTrial::SummaryOnly)
            .map(|v| {
                offence_problem(ProblemCode::OffenceNotSummaryOnly, offence)
                    .with_value("modeOfTrial", v.mode_of_trial.as_str())
            })
            .into()
    }

    fn priority(&self) -> u32 {
        80
    }
}

/// Charge wording is given
pub struct WordingRequired;

impl ValidationRule<Offence, ValidationContext> for WordingRequired {
    fn name(&self) -> &str {
        "wording_required"
    }

    fn validate(&self, offence: &Offence, _: &ValidationContext) -> ValidationResult {
        (!has_text(&offence.offence_wording))
            .then(|| offence_problem(ProblemCode::OffenceWordingRequired, offence))
            .into()
    }
}

/// A statement of facts is given
pub struct StatementOfFactsRequired;

impl ValidationRule<Offence, ValidationContext> for StatementOfFactsRequired {
    fn name(&self) -> &str {
        "statement_of_facts_required"
    }

    fn validate(&self, offence: &Offence, _: &ValidationContext) -> ValidationResult {
        (!has_text(&offence.statement_of_facts))
            .then(|| offence_problem(ProblemCode::StatementOfFactsRequired, offence))
            .into()
    }
}

/// Compensation applied for is not negative
pub struct CompensationNotNegative;

impl ValidationRule<Offence, ValidationContext> for CompensationNotNegative {
    fn name(&self) -> &str {
        "compensation_not_negative"
    }

    fn validate(&self, offence: &Offence, _: &ValidationContext) -> ValidationResult {
        offence
            .applied_compensation
            .filter(|amount| *amount < Decimal::ZERO)
            .map(|amount| {
                offence_problem(ProblemCode::InvalidCompensationAmount, offence)
                    .with_value("appliedCompensation", amount)
            })
            .into()
    }
}

/// Summary-only offences are laid within the time limit from commission
pub struct SummaryTimeLimit {
    months: u32,
}

impl SummaryTimeLimit {
    /// Limit of `months` calendar months
    pub fn new(months: u32) -> Self {
        Self { months }
    }
}

impl ValidationRule<Offence, ValidationContext> for SummaryTimeLimit {
    fn name(&self) -> &str {
        "summary_time_limit"
    }

    fn validate(&self, offence: &Offence, context: &ValidationContext) -> ValidationResult {
        let summary = version(offence, context)
            .is_some_and(|v| v.mode_of_trial == ModeOfTrial::SummaryOnly);
        if !summary {
            return ValidationResult::Valid;
        }
        let committed = offence
            .offence_committed_end_date
            .unwrap_or(offence.offence_committed_date);
        let Some(limit) = committed.checked_add_months(Months::new(self.months)) else {
            return ValidationResult::Valid;
        };
        (context.date_received() > limit)
            .then(|| {
                offence_problem(ProblemCode::OffenceOutOfTime, offence)
                    .with_value("limit", limit)
                    .with_value("dateReceived", context.date_received())
            })
            .into()
    }

    fn priority(&self) -> u32 {
        30
    }
}
