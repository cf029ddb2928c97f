// Copyright 2025 Cowboy AI, LLC.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{CaseId, Defendant, DefendantId};

/// Channel a prosecution was submitted through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    /// Police case management feed
    Spi,
    /// Prosecutor portal
    Cppi,
    /// Magistrates' court clerk upload
    Mcc,
}

/// How proceedings were initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum InitiationCode {
    /// Single Justice Procedure notice
    J,
    /// Charge
    C,
    /// Summons
    S,
    /// Requisition
    R,
    /// Other
    O,
    /// Postal requisition
    Z,
}

impl InitiationCode {
    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            InitiationCode::J => "SJP notice",
            InitiationCode::C => "Charge",
            InitiationCode::S => "Summons",
            InitiationCode::R => "Requisition",
            InitiationCode::O => "Other",
            InitiationCode::Z => "Postal requisition",
        }
    }

    /// Single-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            InitiationCode::J => "J",
            InitiationCode::C => "C",
            InitiationCode::S => "S",
            InitiationCode::R => "R",
            InitiationCode::O => "O",
            InitiationCode::Z => "Z",
        }
    }
}

/// Case type used to select the rule catalogue and interpret outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseType {
    /// Single Justice Procedure
    Sjp,
    /// Crown Court / charged case
    CrownCourt,
    /// Member of a group prosecution
    Group,
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseType::Sjp => write!(f, "SJP"),
            CaseType::CrownCourt => write!(f, "CROWN_COURT"),
            CaseType::Group => write!(f, "GROUP"),
        }
    }
}

/// Prosecutor details resolved from reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProsecutorDetails {
    /// Reference data id of the prosecutor
    pub prosecutor_id: Uuid,
    /// Full name of the prosecuting authority
    pub full_name: String,
    /// Whether the prosecutor may bring SJP cases
    pub sjp_enabled: bool,
}

/// Prosecuting authority named on the submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prosecutor {
    /// Originating organisation (OU) code
    pub prosecuting_authority: String,
    /// Filled by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_data: Option<ProsecutorDetails>,
}

/// Case-level details of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetails {
    /// Case identity
    pub case_id: CaseId,
    /// Unique reference number assigned by the prosecutor (URN)
    pub prosecutor_case_reference: String,
    /// Prosecuting authority
    pub prosecutor: Prosecutor,
    /// How proceedings were initiated
    pub initiation_code: InitiationCode,
    /// Date the prosecutor received the case
    pub date_received: NaiveDate,
    /// Optional case marker code
    #[serde(default)]
    pub case_marker: Option<String>,
    /// Summons code (summons cases only)
    #[serde(default)]
    pub summons_code: Option<String>,
}

/// A prosecution submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prosecution {
    /// Case-level details
    pub case_details: CaseDetails,
    /// Defendants on the case
    #[serde(default)]
    pub defendants: Vec<Defendant>,
    /// Submission channel
    pub channel: Channel,
}

impl Prosecution {
    /// Case identity
    pub fn case_id(&self) -> CaseId {
        self.case_details.case_id
    }

    /// Classify a standalone submission: SJP notices are SJP, everything else is
    /// treated as a Crown Court case. Group membership is decided by the caller.
    pub fn case_type(&self) -> CaseType {
        match self.case_details.initiation_code {
            InitiationCode::J => CaseType::Sjp,
            _ => CaseType::CrownCourt,
        }
    }

    /// Find a defendant by id
    pub fn defendant(&self, id: DefendantId) -> Option<&Defendant> {
        self.defendants.iter().find(|d| d.id == id)
    }

    /// Replace a defendant in place, returning the previous value
    pub fn replace_defendant(&mut self, defendant: Defendant) -> Option<Defendant> {
        let slot = self.defendants.iter_mut().find(|d| d.id == defendant.id)?;
        Some(std::mem::replace(slot, defendant))
    }
}
