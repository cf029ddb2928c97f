// Copyright 2025 Cowboy AI, LLC.

//! Problem codes and problem values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every problem the rule catalogue can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemCode {
    // Case
    /// Prosecuting authority is not in reference data
    ProsecutorNotFound,
    /// Prosecutor may not bring SJP cases
    ProsecutorNotSjpEnabled,
    /// Initiation code does not fit the case type
    InvalidInitiationCode,
    /// Prosecutor case reference (URN) missing or malformed
    InvalidCaseReference,
    /// Date received is after today
    DateReceivedInFuture,
    /// Case has no defendants
    DefendantsRequired,
    /// SJP case does not have exactly one defendant
    SjpSingleDefendantRequired,
    /// Two defendants share a prosecutor reference
    DuplicateDefendantReference,
    /// Summons case without a summons code
    SummonsCodeRequired,
    /// Summons code is not in reference data
    SummonsCodeNotFound,

    // Defendant
    /// Neither a surname nor an organisation name
    DefendantNameRequired,
    /// Date of birth is after the date received
    DateOfBirthInFuture,
    /// SJP individual without a date of birth
    DateOfBirthRequired,
    /// Defendant younger than the SJP minimum age
    DefendantUnderage,
    /// Postal address incomplete
    AddressRequired,
    /// Defendant has no offences
    OffencesRequired,
    /// More offences than an SJP defendant may face
    TooManyOffences,
    /// Offence sequence numbers repeat
    DuplicateOffenceSequenceNumber,
    /// Custody status is not in reference data
    CustodyStatusNotFound,
    /// No initial hearing requested
    InitialHearingRequired,
    /// Hearing court is not in reference data
    CourtNotFound,
    /// Requested hearing date has passed
    HearingDateInPast,
    /// Nationality code is not in reference data
    NationalityNotFound,
    /// Observed ethnicity code is not in reference data
    ObservedEthnicityNotFound,
    /// Self-defined ethnicity code is not in reference data
    SelfDefinedEthnicityNotFound,
    /// Postcode is not a UK postcode
    InvalidPostcode,
    /// Title is not a recognised honorific
    InvalidTitle,

    // Offence
    /// Offence code is not in reference data
    OffenceCodeNotFound,
    /// No version of the offence was in force on the committed date
    OffenceNotInForce,
    /// Offence committed after the date received
    OffenceDateInFuture,
    /// Committed end date precedes the committed date
    OffenceDateRangeInvalid,
    /// Charged before the offence was committed
    ChargeDateBeforeOffenceDate,
    /// Arrested after being charged
    ArrestDateAfterChargeDate,
    /// Location required by the offence is missing
    OffenceLocationRequired,
    /// Offence cannot be prosecuted by SJP notice
    OffenceNotSjpEligible,
    /// SJP offence is not summary only
    OffenceNotSummaryOnly,
    /// Charge wording missing
    OffenceWordingRequired,
    /// Statement of facts missing
    StatementOfFactsRequired,
    /// Compensation applied for is negative
    InvalidCompensationAmount,
    /// Summary-only offence laid after the time limit
    OffenceOutOfTime,

    // Group
    /// Group prosecution has no cases
    GroupCasesRequired,
    /// Group does not have exactly one master case
    GroupMasterRequired,
    /// Group cases come from different prosecutors
    GroupProsecutorMismatch,
    /// Two group cases share a case reference
    GroupDuplicateCaseReference,
    /// Two group cases share a case id
    GroupDuplicateCaseId,
    /// Group holds more cases than allowed
    GroupTooLarge,
}

impl ProblemCode {
    /// Wire name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemCode::ProsecutorNotFound => "PROSECUTOR_NOT_FOUND",
            ProblemCode::ProsecutorNotSjpEnabled => "PROSECUTOR_NOT_SJP_ENABLED",
            ProblemCode::InvalidInitiationCode => "INVALID_INITIATION_CODE",
            ProblemCode::InvalidCaseReference => "INVALID_CASE_REFERENCE",
            ProblemCode::DateReceivedInFuture => "DATE_RECEIVED_IN_FUTURE",
            ProblemCode::DefendantsRequired => "DEFENDANTS_REQUIRED",
            ProblemCode::SjpSingleDefendantRequired => "SJP_SINGLE_DEFENDANT_REQUIRED",
            ProblemCode::DuplicateDefendantReference => "DUPLICATE_DEFENDANT_REFERENCE",
            ProblemCode::SummonsCodeRequired => "SUMMONS_CODE_REQUIRED",
            ProblemCode::SummonsCodeNotFound => "SUMMONS_CODE_NOT_FOUND",
            ProblemCode::DefendantNameRequired => "DEFENDANT_NAME_REQUIRED",
            ProblemCode::DateOfBirthInFuture => "DATE_OF_BIRTH_IN_FUTURE",
            ProblemCode::DateOfBirthRequired => "DATE_OF_BIRTH_REQUIRED",
            ProblemCode::DefendantUnderage => "DEFENDANT_UNDERAGE",
            ProblemCode::AddressRequired => "ADDRESS_REQUIRED",
            ProblemCode::OffencesRequired => "OFFENCES_REQUIRED",
            ProblemCode::TooManyOffences => "TOO_MANY_OFFENCES",
            ProblemCode::DuplicateOffenceSequenceNumber => "DUPLICATE_OFFENCE_SEQUENCE_NUMBER",
            ProblemCode::CustodyStatusNotFound => "CUSTODY_STATUS_NOT_FOUND",
            ProblemCode::InitialHearingRequired => "INITIAL_HEARING_REQUIRED",
            ProblemCode::CourtNotFound => "COURT_NOT_FOUND",
            ProblemCode::HearingDateInPast => "HEARING_DATE_IN_PAST",
            ProblemCode::NationalityNotFound => "NATIONALITY_NOT_FOUND",
            ProblemCode::ObservedEthnicityNotFound => "OBSERVED_ETHNICITY_NOT_FOUND",
            ProblemCode::SelfDefinedEthnicityNotFound => "SELF_DEFINED_ETHNICITY_NOT_FOUND",
            ProblemCode::InvalidPostcode => "INVALID_POSTCODE",
            ProblemCode::InvalidTitle => "INVALID_TITLE",
            ProblemCode::OffenceCodeNotFound => "OFFENCE_CODE_NOT_FOUND",
            ProblemCode::OffenceNotInForce => "OFFENCE_NOT_IN_FORCE",
            ProblemCode::OffenceDateInFuture => "OFFENCE_DATE_IN_FUTURE",
            ProblemCode::OffenceDateRangeInvalid => "OFFENCE_DATE_RANGE_INVALID",
            ProblemCode::ChargeDateBeforeOffenceDate => "CHARGE_DATE_BEFORE_OFFENCE_DATE",
            ProblemCode::ArrestDateAfterChargeDate => "ARREST_DATE_AFTER_CHARGE_DATE",
            ProblemCode::OffenceLocationRequired => "OFFENCE_LOCATION_REQUIRED",
            ProblemCode::OffenceNotSjpEligible => "OFFENCE_NOT_SJP_ELIGIBLE",
            ProblemCode::OffenceNotSummaryOnly => "OFFENCE_NOT_SUMMARY_ONLY",
            ProblemCode::OffenceWordingRequired => "OFFENCE_WORDING_REQUIRED",
            ProblemCode::StatementOfFactsRequired => "STATEMENT_OF_FACTS_REQUIRED",
            ProblemCode::InvalidCompensationAmount => "INVALID_COMPENSATION_AMOUNT",
            ProblemCode::OffenceOutOfTime => "OFFENCE_OUT_OF_TIME",
            ProblemCode::GroupCasesRequired => "GROUP_CASES_REQUIRED",
            ProblemCode::GroupMasterRequired => "GROUP_MASTER_REQUIRED",
            ProblemCode::GroupProsecutorMismatch => "GROUP_PROSECUTOR_MISMATCH",
            ProblemCode::GroupDuplicateCaseReference => "GROUP_DUPLICATE_CASE_REFERENCE",
            ProblemCode::GroupDuplicateCaseId => "GROUP_DUPLICATE_CASE_ID",
            ProblemCode::GroupTooLarge => "GROUP_TOO_LARGE",
        }
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named value explaining a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemValue {
    /// Field or parameter name
    pub key: String,
    /// Offending or expected value
    pub value: String,
    /// Identity of the entity the value belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A coded, parameterised validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// What went wrong
    pub code: ProblemCode,
    /// Values describing the failure
    #[serde(default)]
    pub values: Vec<ProblemValue>,
}

impl Problem {
    /// A problem with no values
    pub fn new(code: ProblemCode) -> Self {
        Self {
            code,
            values: Vec::new(),
        }
    }

    /// Attach a value
    pub fn with_value(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.values.push(ProblemValue {
            key: key.into(),
            value: value.to_string(),
            id: None,
        });
        self
    }

    /// Attach a value owned by an identified entity
    pub fn with_entity_value(
        mut self,
        key: impl Into<String>,
        value: impl ToString,
        id: impl ToString,
    ) -> Self {
        self.values.push(ProblemValue {
            key: key.into(),
            value: value.to_string(),
            id: Some(id.to_string()),
        });
        self
    }

    /// First value stored under `key`
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        for (i, value) in self.values.iter().enumerate() {
            let sep = if i == 0 { " (" } else { ", " };
            write!(f, "{sep}{}={}", value.key, value.value)?;
        }
        if !self.values.is_empty() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Whether a problem stops acceptance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProblemLevel {
    /// Accepted, but the prosecutor is told
    Warning,
    /// Blocks acceptance
    Error,
}

/// A problem with the level its rule was registered at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeveledProblem {
    /// Level
    pub level: ProblemLevel,
    /// Name of the rule that raised it
    pub rule: String,
    /// The problem
    #[serde(flatten)]
    pub problem: Problem,
}

impl LeveledProblem {
    /// Whether this blocks acceptance
    pub fn is_error(&self) -> bool {
        self.level == ProblemLevel::Error
    }

    /// Problem code
    pub fn code(&self) -> ProblemCode {
        self.problem.code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn code_wire_name_matches_serde() {
        for code in [
            ProblemCode::ProsecutorNotSjpEnabled,
            ProblemCode::DuplicateOffenceSequenceNumber,
            ProblemCode::GroupDuplicateCaseId,
            ProblemCode::GroupTooLarge,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.as_str().into()));
        }
    }

    #[test]
    fn leveled_problem_flattens() {
        let leveled = LeveledProblem {
            level: ProblemLevel::Warning,
            rule: "nationality_known".into(),
            problem: Problem::new(ProblemCode::NationalityNotFound)
                .with_value("nationalityCode", "XXX"),
        };
        let json = serde_json::to_value(&leveled).unwrap();
        assert_eq!(json["level"], "WARNING");
        assert_eq!(json["code"], "NATIONALITY_NOT_FOUND");
        assert_eq!(json["values"][0]["key"], "nationalityCode");
        assert!(json["values"][0].get("id").is_none());
    }

    #[test]
    fn display_lists_values() {
        let problem = Problem::new(ProblemCode::TooManyOffences)
            .with_value("count", 21)
            .with_value("max", 20);
        assert_eq!(problem.to_string(), "TOO_MANY_OFFENCES (count=21, max=20)");
        assert_eq!(problem.value("max"), Some("20"));
    }
}
