// Copyright 2025 Cowboy AI, LLC.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ModeOfTrial, OffenceDetails, ProsecutorDetails};

/// A dated version of an offence definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffenceReferenceData {
    /// CJS offence code
    pub cjs_offence_code: String,
    /// Offence title
    pub title: String,
    /// Creating legislation
    pub legislation: String,
    /// Mode of trial
    pub mode_of_trial: ModeOfTrial,
    /// First day this version applies
    pub valid_from: NaiveDate,
    /// Last day this version applies (open ended when absent)
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    /// Offence may be prosecuted by SJP notice
    #[serde(default)]
    pub sjp_eligible: bool,
    /// An offence location must be given
    #[serde(default)]
    pub location_required: bool,
}

impl OffenceReferenceData {
    /// Whether this version applies on `date` (both bounds inclusive)
    pub fn in_force_on(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && self.valid_to.map_or(true, |end| date <= end)
    }

    /// Details copied onto an enriched offence
    pub fn details(&self) -> OffenceDetails {
        OffenceDetails {
            title: self.title.clone(),
            legislation: self.legislation.clone(),
            mode_of_trial: self.mode_of_trial,
            valid_from: self.valid_from,
        }
    }
}

/// A registered prosecuting authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsecutorReferenceData {
    /// Reference data id
    pub id: Uuid,
    /// Originating organisation code
    pub ou_code: String,
    /// Full name
    pub full_name: String,
    /// May bring SJP cases
    #[serde(default)]
    pub sjp_enabled: bool,
}

impl ProsecutorReferenceData {
    /// Details copied onto an enriched case
    pub fn details(&self) -> ProsecutorDetails {
        ProsecutorDetails {
            prosecutor_id: self.id,
            full_name: self.full_name.clone(),
            sjp_enabled: self.sjp_enabled,
        }
    }
}

/// A court centre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtReferenceData {
    /// Court OU code
    pub ou_code: String,
    /// Court name
    pub court_name: String,
    /// Court sits in Wales
    #[serde(default)]
    pub welsh: bool,
}

/// A nationality entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalityReferenceData {
    /// ISO 3166 alpha-3 code
    pub iso_code: String,
    /// Nationality description
    pub nationality: String,
}

/// Generic code list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDescription {
    /// Code
    pub code: String,
    /// Description
    pub description: String,
}

impl CodeDescription {
    /// Build an entry
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }
}
