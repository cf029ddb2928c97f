// Copyright 2025 Cowboy AI, LLC.

//! Reference data
//!
//! Lookup tables owned by the reference-data context: offences, prosecutors,
//! courts and the code lists defendants are described with. The case file only
//! reads them through [`ReferenceDataQueryService`], gathers what a submission
//! needs into a [`ReferenceDataSnapshot`] and validates against that snapshot.

mod cached;
mod in_memory;
mod snapshot;
mod types;

pub use cached::CachedReferenceData;
pub use in_memory::InMemoryReferenceData;
pub(crate) use snapshot::normalise;
pub use snapshot::ReferenceDataSnapshot;
pub use types::{
    CodeDescription, CourtReferenceData, NationalityReferenceData, OffenceReferenceData,
    ProsecutorReferenceData,
};

use crate::errors::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to the reference-data context
#[async_trait]
pub trait ReferenceDataQueryService: Send + Sync {
    /// Every dated version of an offence, oldest first
    async fn offences_by_cjs_code(&self, cjs_code: &str) -> DomainResult<Vec<OffenceReferenceData>>;

    /// Prosecutor registered under an OU code
    async fn prosecutor_by_ou_code(
        &self,
        ou_code: &str,
    ) -> DomainResult<Option<ProsecutorReferenceData>>;

    /// Court centre registered under an OU code
    async fn court_by_ou_code(&self, ou_code: &str) -> DomainResult<Option<CourtReferenceData>>;

    /// Nationality code list
    async fn nationalities(&self) -> DomainResult<Vec<NationalityReferenceData>>;

    /// Officer-observed ethnicity code list
    async fn observed_ethnicities(&self) -> DomainResult<Vec<CodeDescription>>;

    /// Self-defined ethnicity code list
    async fn self_defined_ethnicities(&self) -> DomainResult<Vec<CodeDescription>>;

    /// Custody status code list
    async fn custody_statuses(&self) -> DomainResult<Vec<CodeDescription>>;

    /// Summons code list
    async fn summons_codes(&self) -> DomainResult<Vec<CodeDescription>>;
}

#[async_trait]
impl<S: ReferenceDataQueryService + ?Sized> ReferenceDataQueryService for Arc<S> {
    async fn offences_by_cjs_code(
        &self,
        cjs_code: &str,
    ) -> DomainResult<Vec<OffenceReferenceData>> {
        (**self).offences_by_cjs_code(cjs_code).await
    }

    async fn prosecutor_by_ou_code(
        &self,
        ou_code: &str,
    ) -> DomainResult<Option<ProsecutorReferenceData>> {
        (**self).prosecutor_by_ou_code(ou_code).await
    }

    async fn court_by_ou_code(&self, ou_code: &str) -> DomainResult<Option<CourtReferenceData>> {
        (**self).court_by_ou_code(ou_code).await
    }

    async fn nationalities(&self) -> DomainResult<Vec<NationalityReferenceData>> {
        (**self).nationalities().await
    }

    async fn observed_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        (**self).observed_ethnicities().await
    }

    async fn self_defined_ethnicities(&self) -> DomainResult<Vec<CodeDescription>> {
        (**self).self_defined_ethnicities().await
    }

    async fn custody_statuses(&self) -> DomainResult<Vec<CodeDescription>> {
        (**self).custody_statuses().await
    }

    async fn summons_codes(&self) -> DomainResult<Vec<CodeDescription>> {
        (**self).summons_codes().await
    }
}
