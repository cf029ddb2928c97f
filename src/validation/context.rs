// Copyright 2025 Cowboy AI, LLC.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::ValidationSettings;
use crate::model::{CaseDetails, CaseType};
use crate::reference_data::ReferenceDataSnapshot;

/// Everything a case, defendant or offence rule may consult besides its target
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Case type the rules were selected for
    pub case_type: CaseType,
    /// Enriched case details of the prosecution under validation
    pub case: Arc<CaseDetails>,
    /// Reference data fetched for the submission
    pub reference_data: Arc<ReferenceDataSnapshot>,
    /// Rule thresholds
    pub settings: Arc<ValidationSettings>,
    /// Date validation runs on
    pub today: NaiveDate,
}

impl ValidationContext {
    /// Date the prosecutor received the case
    pub fn date_received(&self) -> NaiveDate {
        self.case.date_received
    }
}
