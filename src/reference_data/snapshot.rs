// Copyright 2025 Cowboy AI, LLC.

//! Reference data gathered once per submission

use chrono::NaiveDate;
use futures::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::{
    CodeDescription, CourtReferenceData, NationalityReferenceData, OffenceReferenceData,
    ProsecutorReferenceData, ReferenceDataQueryService,
};
use crate::errors::DomainResult;
use crate::model::Prosecution;

/// Every piece of reference data a set of prosecutions refers to
///
/// Keys are normalised (trimmed, upper-cased). A keyed lookup that was made but
/// found nothing is remembered as `None`, so rules can tell "unknown" apart from
/// "never asked for".
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataSnapshot {
    prosecutors: IndexMap<String, Option<ProsecutorReferenceData>>,
    courts: IndexMap<String, Option<CourtReferenceData>>,
    offences: IndexMap<String, Vec<OffenceReferenceData>>,
    nationalities: IndexMap<String, String>,
    observed_ethnicities: IndexMap<String, String>,
    self_defined_ethnicities: IndexMap<String, String>,
    custody_statuses: IndexMap<String, String>,
    summons_codes: IndexMap<String, String>,
}

/// Normalise a reference data key
pub(crate) fn normalise(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl ReferenceDataSnapshot {
    /// Fetch everything the given prosecutions refer to. Each distinct key is
    /// looked up once; keyed lookups run concurrently.
    pub async fn fetch<S>(service: &S, prosecutions: &[&Prosecution]) -> DomainResult<Self>
    where
        S: ReferenceDataQueryService + ?Sized,
    {
        let mut prosecutor_codes = IndexSet::new();
        let mut court_codes = IndexSet::new();
        let mut offence_codes = IndexSet::new();

        for prosecution in prosecutions {
            insert_code(
                &mut prosecutor_codes,
                &prosecution.case_details.prosecutor.prosecuting_authority,
            );
            for defendant in &prosecution.defendants {
                if let Some(hearing) = &defendant.initial_hearing {
                    insert_code(&mut court_codes, &hearing.court_hearing_location);
                }
                for offence in &defendant.offences {
                    insert_code(&mut offence_codes, &offence.offence_code);
                }
            }
        }

        let prosecutors = try_join_all(prosecutor_codes.iter().map(|code| async move {
            service
                .prosecutor_by_ou_code(code)
                .await
                .map(|found| (code.clone(), found))
        }));
        let courts = try_join_all(court_codes.iter().map(|code| async move {
            service
                .court_by_ou_code(code)
                .await
                .map(|found| (code.clone(), found))
        }));
        let offences = try_join_all(offence_codes.iter().map(|code| async move {
            service
                .offences_by_cjs_code(code)
                .await
                .map(|found| (code.clone(), found))
        }));

        let (
            prosecutors,
            courts,
            offences,
            nationalities,
            observed_ethnicities,
            self_defined_ethnicities,
            custody_statuses,
            summons_codes,
        ) = futures::try_join!(
            prosecutors,
            courts,
            offences,
            service.nationalities(),
            service.observed_ethnicities(),
            service.self_defined_ethnicities(),
            service.custody_statuses(),
            service.summons_codes(),
        )?;

        let mut snapshot = Self::default();
        for (code, prosecutor) in prosecutors {
            snapshot.insert_prosecutor(&code, prosecutor);
        }
        for (code, court) in courts {
            snapshot.insert_court(&code, court);
        }
        for (code, versions) in offences {
            snapshot.offences.entry(code).or_default();
            for version in versions {
                snapshot.insert_offence_version(version);
            }
        }
        snapshot.set_nationalities(&nationalities);
        snapshot.set_observed_ethnicities(&observed_ethnicities);
        snapshot.set_self_defined_ethnicities(&self_defined_ethnicities);
        snapshot.set_custody_statuses(&custody_statuses);
        snapshot.set_summons_codes(&summons_codes);

        debug!(
            prosecutors = snapshot.prosecutors.len(),
            courts = snapshot.courts.len(),
            offence_codes = snapshot.offences.len(),
            "Reference data snapshot fetched"
        );
        Ok(snapshot)
    }

    /// Prosecutor for an OU code
    pub fn prosecutor(&self, ou_code: &str) -> Option<&ProsecutorReferenceData> {
        self.prosecutors
            .get(&normalise(ou_code))
            .and_then(Option::as_ref)
    }

    /// Court for an OU code
    pub fn court(&self, ou_code: &str) -> Option<&CourtReferenceData> {
        self.courts.get(&normalise(ou_code)).and_then(Option::as_ref)
    }

    /// All versions of an offence code, oldest first
    pub fn offence_versions(&self, cjs_code: &str) -> &[OffenceReferenceData] {
        self.offences
            .get(&normalise(cjs_code))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The version of an offence in force on `date`; the latest matching version wins
    pub fn offence_on(&self, cjs_code: &str, date: NaiveDate) -> Option<&OffenceReferenceData> {
        self.offence_versions(cjs_code)
            .iter()
            .rev()
            .find(|version| version.in_force_on(date))
    }

    /// Whether a nationality code exists
    pub fn is_known_nationality(&self, code: &str) -> bool {
        self.nationalities.contains_key(&normalise(code))
    }

    /// Whether an observed ethnicity code exists
    pub fn is_known_observed_ethnicity(&self, code: &str) -> bool {
        self.observed_ethnicities.contains_key(&normalise(code))
    }

    /// Whether a self-defined ethnicity code exists
    pub fn is_known_self_defined_ethnicity(&self, code: &str) -> bool {
        self.self_defined_ethnicities.contains_key(&normalise(code))
    }

    /// Whether a custody status code exists
    pub fn is_known_custody_status(&self, code: &str) -> bool {
        self.custody_statuses.contains_key(&normalise(code))
    }

    /// Whether a summons code exists
    pub fn is_known_summons_code(&self, code: &str) -> bool {
        self.summons_codes.contains_key(&normalise(code))
    }

    pub(crate) fn insert_prosecutor(
        &mut self,
        code: &str,
        prosecutor: Option<ProsecutorReferenceData>,
    ) {
        self.prosecutors.insert(normalise(code), prosecutor);
    }

    pub(crate) fn insert_court(&mut self, code: &str, court: Option<CourtReferenceData>) {
        self.courts.insert(normalise(code), court);
    }

    pub(crate) fn insert_offence_version(&mut self, version: OffenceReferenceData) {
        let versions = self
            .offences
            .entry(normalise(&version.cjs_offence_code))
            .or_default();
        versions.push(version);
        versions.sort_by_key(|v| v.valid_from);
    }

    pub(crate) fn set_nationalities(&mut self, list: &[NationalityReferenceData]) {
        self.nationalities = list
            .iter()
            .map(|n| (normalise(&n.iso_code), n.nationality.clone()))
            .collect();
    }

    pub(crate) fn set_observed_ethnicities(&mut self, list: &[CodeDescription]) {
        self.observed_ethnicities = code_map(list);
    }

    pub(crate) fn set_self_defined_ethnicities(&mut self, list: &[CodeDescription]) {
        self.self_defined_ethnicities = code_map(list);
    }

    pub(crate) fn set_custody_statuses(&mut self, list: &[CodeDescription]) {
        self.custody_statuses = code_map(list);
    }

    pub(crate) fn set_summons_codes(&mut self, list: &[CodeDescription]) {
        self.summons_codes = code_map(list);
    }
}

fn insert_code(codes: &mut IndexSet<String>, code: &str) {
    let code = normalise(code);
    if !code.is_empty() {
        codes.insert(code);
    }
}

fn code_map(list: &[CodeDescription]) -> IndexMap<String, String> {
    list.iter()
        .map(|entry| (normalise(&entry.code), entry.description.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_data::InMemoryReferenceData;
    use crate::test_support::{fixtures, reference_data};

    #[tokio::test]
    async fn fetch_records_misses_and_hits() {
        let store = reference_data();
        let mut prosecution = fixtures::sjp_prosecution();
        prosecution.case_details.prosecutor.prosecuting_authority = "NOPE000".into();

        let snapshot = ReferenceDataSnapshot::fetch(&store, &[&prosecution])
            .await
            .unwrap();

        assert!(snapshot.prosecutor("NOPE000").is_none());
        assert!(snapshot.prosecutors.contains_key("NOPE000"));
        assert!(!snapshot.offence_versions("CA03012").is_empty());
        assert!(snapshot.is_known_nationality("gbr"));
    }

    #[tokio::test]
    async fn fetch_skips_blank_codes() {
        let mut prosecution = fixtures::sjp_prosecution();
        prosecution.defendants[0].offences[0].offence_code = "  ".into();

        let snapshot = ReferenceDataSnapshot::fetch(&InMemoryReferenceData::new(), &[&prosecution])
            .await
            .unwrap();
        assert!(snapshot.offences.is_empty());
    }

    #[test]
    fn offence_on_picks_version_by_date() {
        let snapshot = reference_data().snapshot();
        let old = snapshot
            .offence_on("TH68001", NaiveDate::from_ymd_opt(2012, 5, 1).unwrap())
            .unwrap();
        let new = snapshot
            .offence_on("TH68001", NaiveDate::from_ymd_opt(2020, 5, 1).unwrap())
            .unwrap();

        assert_ne!(old.valid_from, new.valid_from);
        assert!(snapshot
            .offence_on("TH68001", NaiveDate::from_ymd_opt(1950, 1, 1).unwrap())
            .is_none());
    }
}
