// Copyright 2025 Cowboy AI, LLC.

//! In-memory reference data, loadable from a JSON document

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    CodeDescription, CourtReferenceData, NationalityReferenceData, OffenceReferenceData,
    ProsecutorReferenceData, ReferenceDataQueryService, ReferenceDataSnapshot,
};
use crate::errors::{DomainError, DomainResult};

/// Reference data held in memory
///
/// The JSON shape mirrors the field names:
///
/// ```json
/// {
///   "offences": [{ "cjsOffenceCode": "CA03012", "title": "...", "legislation": "...",
///                  "modeOfTrial": "SUMMARY_ONLY", "validFrom": "2003-01-01",
///                  "sjpEligible": true }],
///   "prosecutors": [{ "id": "...", "ouCode": "GAFTL00", "fullName": "Transport for London",
///                     "sjpEnabled": true }],
///   "courts": [{ "ouCode": "B01LY00", "courtName": "Lavender Hill Magistrates' Court" }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InMemoryReferenceData {
    /// Offence versions
    pub offences: Vec<OffenceReferenceData>,
    /// Prosecutors
    pub prosecutors: Vec<ProsecutorReferenceData>,
    /// Courts
    pub courts: Vec<CourtReferenceData>,
    /// Nationalities
    pub nationalities: Vec<NationalityReferenceData>,
    /// Observed ethnicity codes
    pub observed_ethnicities: Vec<CodeDescription>,
    /// Self-defined ethnicity codes
    pub self_defined_ethnicities: Vec<CodeDescription>,
    /// Custody status codes
    pub custody_statuses: Vec<CodeDescription>,
    /// Summons codes
    pub summons_codes: Vec<CodeDescription>,
}

impl InMemoryReferenceData {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::reference_data("file", format!("{}: {e}", path.display()))
        })?;
        Self::from_json(&content)
    }

    /// Add an offence version
    pub fn with_offence(mut self, offence: OffenceReferenceData) -> Self {
        self.offences.push(offence);
        self
    }

    /// Add a prosecutor
    pub fn with_prosecutor(mut self, prosecutor: ProsecutorReferenceData) -> Self {
        self.prosecutors.push(prosecutor);
        self
    }

    /// Add a court
    pub fn with_court(mut self, court: CourtReferenceData) -> Self {
        self.courts.push(court);
        self
    }

    /// Snapshot holding the whole store, for offline validation
    pub fn snapshot(&self) -> ReferenceDataSnapshot {
        let mut snapshot = ReferenceDataSnapshot::default();
        for prosecutor in &self.prosecutors {
            snapshot.insert_prosecutor(&prosecutor.ou_code, Some(prosecutor.clone()));
        }
        for court in &self.courts {
            snapshot.insert_court(&court.ou_code, Some(court.clone()));
        }
        for offence in &self.offences {
            snapshot.insert_offence_version(offence.clone());
        }
        snapshot.set_nationalities(&self.nationalities);
        snapshot.set_observed_ethnicities(&self.observed_ethnicities);
        snapshot.set_self_defined_ethnicities(&self.self_defined_ethnicities);
        snapshot.set_custody_statuses(&self.custody_statuses);
        snapshot.set_summons_codes(&self.summons_codes);
        snapshot
    }
}

#[async_trait]
impl ReferenceDataQueryService for InMemoryReferenceData {
    async fn offences_by_cjs_code(
        &self,
        cjs_code: &str,
    ) -> DomainResult<Vec<OffenceReferenceData>> {
        let mut versions: Vec<_> = self
            .offences
            .iter()
            .filter(|o| o.cjs_offence_code.eq_ignore_ascii_case(cjs_code))
            .cloned()
            .collect();
        versions.sort_by_key(|o| o.valid_from);
        Ok(versions)
    }

    async fn prosecutor_by_ou_code(
        &self,
        ou_code: &str,
    ) -> DomainResult<Option<ProsecutorReferenceData>> {
        Ok(self
            .prosecutors
            .iter()
            .find(|p| p.ou_code.eq_ignore_ascii_case(ou_code))
            .cloned())
    }

    async fn court_by_ou_code(&self, ou_code: &str) -> DomainResult<Option<CourtReferenceData>> {
        Ok(self
            .courts
            .iter()
            .find(|c| c.ou_code.eq_ignore_ascii_case(ou_code))
            .cloned())
    }

    async fn nationalities(&self) -> DomainResult<Vec<NationalityReferenceData>> {
        Ok(self.nationalities.clone())
    }

    async fn observed_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        Ok(self.observed_ethnicities.clone())
    }

    async fn self_defined_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        Ok(self.self_defined_ethnicities.clone())
    }

    async fn custody_statuses(&self) -> DomainResult<Vec<CodeDescription>> {
        Ok(self.custody_statuses.clone())
    }

    async fn summons_codes(&self) -> DomainResult<Vec<CodeDescription>> {
        Ok(self.summons_codes.clone())
    }
}
