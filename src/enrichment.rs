// Copyright 2025 Cowboy AI, LLC.

//! Reference-data enrichment
//!
//! Enrichment is pure: it copies what the [`ReferenceDataSnapshot`] knows onto
//! the payload and tidies free text. Codes the snapshot does not know are left
//! alone so the rules can report them.

use crate::model::{Address, Defendant, Individual, Offence, Prosecution};
use crate::reference_data::ReferenceDataSnapshot;

/// Return an enriched copy of `prosecution`
pub fn enrich(prosecution: &Prosecution, snapshot: &ReferenceDataSnapshot) -> Prosecution {
    let mut enriched = prosecution.clone();

    let case = &mut enriched.case_details;
    case.prosecutor_case_reference = case.prosecutor_case_reference.trim().to_ascii_uppercase();
    case.prosecutor.prosecuting_authority =
        case.prosecutor.prosecuting_authority.trim().to_ascii_uppercase();
    case.prosecutor.reference_data = snapshot
        .prosecutor(&case.prosecutor.prosecuting_authority)
        .map(|p| p.details());
    tidy_code(&mut case.summons_code);
    tidy_code(&mut case.case_marker);

    for defendant in &mut enriched.defendants {
        enrich_defendant(defendant, snapshot);
    }

    enriched
}

/// Enrich a single defendant in place
pub fn enrich_defendant(defendant: &mut Defendant, snapshot: &ReferenceDataSnapshot) {
    defendant.prosecutor_defendant_reference =
        defendant.prosecutor_defendant_reference.trim().to_string();
    tidy_text(&mut defendant.organisation_name);
    tidy_code(&mut defendant.custody_status);

    if let Some(person) = &mut defendant.individual {
        tidy_individual(person);
    }
    if let Some(address) = &mut defendant.address {
        tidy_address(address);
    }
    if let Some(hearing) = &mut defendant.initial_hearing {
        hearing.court_hearing_location = hearing.court_hearing_location.trim().to_ascii_uppercase();
        hearing.court_name = snapshot
            .court(&hearing.court_hearing_location)
            .map(|court| court.court_name.clone());
    }
    for offence in &mut defendant.offences {
        enrich_offence(offence, snapshot);
    }
}

fn enrich_offence(offence: &mut Offence, snapshot: &ReferenceDataSnapshot) {
    offence.offence_code = offence.offence_code.trim().to_ascii_uppercase();
    offence.reference_data = snapshot
        .offence_on(&offence.offence_code, offence.effective_date())
        .map(|version| version.details());
    tidy_text(&mut offence.offence_wording);
    tidy_text(&mut offence.statement_of_facts);
    tidy_text(&mut offence.offence_location);
}

fn tidy_individual(person: &mut Individual) {
    tidy_text(&mut person.title);
    tidy_text(&mut person.first_name);
    tidy_text(&mut person.last_name);
    tidy_code(&mut person.nationality_code);
    tidy_code(&mut person.observed_ethnicity);
    tidy_code(&mut person.self_defined_ethnicity);
}

fn tidy_address(address: &mut Address) {
    for line in [
        &mut address.address1,
        &mut address.address2,
        &mut address.address3,
        &mut address.address4,
        &mut address.address5,
    ] {
        tidy_text(line);
    }
    if let Some(postcode) = address.postcode.take() {
        let collapsed = postcode
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        address.postcode = (!collapsed.is_empty()).then_some(collapsed);
    }
}

/// Trim; blank becomes absent
fn tidy_text(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
}

/// Trim and upper-case; blank becomes absent
fn tidy_code(value: &mut Option<String>) {
    tidy_text(value);
    if let Some(code) = value {
        code.make_ascii_uppercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, fixtures, reference_data};
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_prosecutor_court_and_offence_details() {
        let snapshot = reference_data().snapshot();
        let enriched = enrich(&fixtures::cc_prosecution(), &snapshot);

        let prosecutor = enriched.case_details.prosecutor.reference_data.as_ref().unwrap();
        assert_eq!(prosecutor.full_name, "Metropolitan Police Service");
        assert!(!prosecutor.sjp_enabled);

        let defendant = &enriched.defendants[0];
        assert_eq!(
            defendant.initial_hearing.as_ref().unwrap().court_name.as_deref(),
            Some("Lavender Hill Magistrates' Court")
        );
        let details = defendant.offences[0].reference_data.as_ref().unwrap();
        assert_eq!(details.title, "Theft from the person");
    }

    #[test]
    fn picks_offence_version_by_committed_date() {
        let snapshot = reference_data().snapshot();
        let mut prosecution = fixtures::cc_prosecution();
        prosecution.defendants[0].offences[0].offence_committed_date = date(2014, 6, 1);

        let enriched = enrich(&prosecution, &snapshot);
        let details = enriched.defendants[0].offences[0].reference_data.as_ref().unwrap();
        assert_eq!(details.title, "Theft");
        assert_eq!(details.valid_from, date(1968, 7, 26));
    }

    #[test]
    fn unknown_codes_stay_unenriched() {
        let snapshot = reference_data().snapshot();
        let mut prosecution = fixtures::sjp_prosecution();
        prosecution.case_details.prosecutor.prosecuting_authority = "ZZZZZ00".into();
        prosecution.defendants[0].offences[0].offence_code = "XX99999".into();

        let enriched = enrich(&prosecution, &snapshot);
        assert!(enriched.case_details.prosecutor.reference_data.is_none());
        assert!(enriched.defendants[0].offences[0].reference_data.is_none());
    }

    #[test]
    fn normalises_codes_and_text() {
        let snapshot = reference_data().snapshot();
        let mut prosecution = fixtures::sjp_prosecution();
        prosecution.case_details.prosecutor_case_reference = " tfl00012345 ".into();
        let defendant = &mut prosecution.defendants[0];
        let person = defendant.individual.as_mut().unwrap();
        person.nationality_code = Some(" gbr".into());
        person.title = Some("   ".into());
        defendant.address.as_mut().unwrap().postcode = Some(" sw1a   1aa ".into());
        defendant.offences[0].offence_code = "ca03012".into();

        let enriched = enrich(&prosecution, &snapshot);
        let defendant = &enriched.defendants[0];
        let person = defendant.individual.as_ref().unwrap();

        assert_eq!(enriched.case_details.prosecutor_case_reference, "TFL00012345");
        assert_eq!(person.nationality_code.as_deref(), Some("GBR"));
        assert_eq!(person.title, None);
        assert_eq!(
            defendant.address.as_ref().unwrap().postcode.as_deref(),
            Some("SW1A 1AA")
        );
        assert!(defendant.offences[0].reference_data.is_some());
    }

    #[test]
    fn input_is_left_untouched() {
        let snapshot = reference_data().snapshot();
        let prosecution = fixtures::sjp_prosecution();
        let before = prosecution.clone();
        let _ = enrich(&prosecution, &snapshot);
        assert_eq!(prosecution, before);
    }
}
