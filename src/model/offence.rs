// Copyright 2025 Cowboy AI, LLC.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::OffenceId;

/// Mode of trial of an offence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModeOfTrial {
    /// Triable only in the magistrates' court
    SummaryOnly,
    /// Triable either way
    EitherWay,
    /// Triable only on indictment
    IndictableOnly,
}

impl ModeOfTrial {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOfTrial::SummaryOnly => "SUMMARY_ONLY",
            ModeOfTrial::EitherWay => "EITHER_WAY",
            ModeOfTrial::IndictableOnly => "INDICTABLE_ONLY",
        }
    }
}

/// Offence details resolved from reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OffenceDetails {
    /// Offence title
    pub title: String,
    /// Legislation the offence is created by
    pub legislation: String,
    /// Mode of trial
    pub mode_of_trial: ModeOfTrial,
    /// Start of the reference data version used
    pub valid_from: NaiveDate,
}

/// An offence charged against a defendant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Offence {
    /// Offence identity
    pub offence_id: OffenceId,
    /// Order of the offence on the charge sheet
    pub offence_sequence_number: u32,
    /// CJS offence code
    pub offence_code: String,
    /// Date the offence was committed (start of range)
    pub offence_committed_date: NaiveDate,
    /// End of the committed date range
    #[serde(default)]
    pub offence_committed_end_date: Option<NaiveDate>,
    /// Date of charge
    #[serde(default)]
    pub charge_date: Option<NaiveDate>,
    /// Date of arrest
    #[serde(default)]
    pub arrest_date: Option<NaiveDate>,
    /// Charge wording
    #[serde(default)]
    pub offence_wording: Option<String>,
    /// Prosecutor's statement of facts
    #[serde(default)]
    pub statement_of_facts: Option<String>,
    /// Free-text location of the offence
    #[serde(default)]
    pub offence_location: Option<String>,
    /// Compensation applied for by the prosecutor
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub applied_compensation: Option<Decimal>,
    /// Filled by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_data: Option<OffenceDetails>,
}

impl Offence {
    /// Date used to pick the reference data version of the offence
    pub fn effective_date(&self) -> NaiveDate {
        self.offence_committed_date
    }
}

/// True when a free-text field carries content
pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|text| !text.trim().is_empty())
}
