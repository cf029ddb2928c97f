// Copyright 2025 Cowboy AI, LLC.

//! Defendant-level rules

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

use crate::model::{has_text, Defendant};
use crate::validation::{
    Problem, ProblemCode, ValidationContext, ValidationResult, ValidationRule,
};

/// A defendant is named: a surname for a person, or an organisation name
pub struct DefendantNamed;

impl ValidationRule<Defendant, ValidationContext> for DefendantNamed {
    fn name(&self) -> &str {
        "defendant_named"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        let named = has_text(&defendant.organisation_name)
            || defendant
                .individual
                .as_ref()
                .is_some_and(|person| has_text(&person.last_name));
        (!named)
            .then(|| Problem::new(ProblemCode::DefendantNameRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        80
    }
}

/// Date of birth cannot follow the date the case was received
pub struct DateOfBirthNotInFuture;

impl ValidationRule<Defendant, ValidationContext> for DateOfBirthNotInFuture {
    fn name(&self) -> &str {
        "date_of_birth_not_in_future"
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        defendant
            .date_of_birth()
            .filter(|dob| *dob > context.date_received())
            .map(|dob| {
                Problem::new(ProblemCode::DateOfBirthInFuture).with_value("dateOfBirth", dob)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        60
    }
}

/// Individual SJP defendants must have reached the minimum age when the case
/// was received
pub struct AdultDefendant {
    minimum_age: u32,
}

impl AdultDefendant {
    /// Require at least `minimum_age` whole years
    pub fn new(minimum_age: u32) -> Self {
        Self { minimum_age }
    }
}

impl ValidationRule<Defendant, ValidationContext> for AdultDefendant {
    fn name(&self) -> &str {
        "adult_defendant"
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        if defendant.individual.is_none() {
            return ValidationResult::Valid;
        }
        match defendant.age_on(context.date_received()) {
            None => ValidationResult::invalid(Problem::new(ProblemCode::DateOfBirthRequired)),
            Some(age) if age < self.minimum_age => ValidationResult::invalid(
                Problem::new(ProblemCode::DefendantUnderage)
                    .with_value("age", age)
                    .with_value("minimumAge", self.minimum_age),
            ),
            Some(_) => ValidationResult::Valid,
        }
    }

    fn priority(&self) -> u32 {
        70
    }
}

/// A postal address with a first line and a postcode
pub struct PostalAddressRequired;

impl ValidationRule<Defendant, ValidationContext> for PostalAddressRequired {
    fn name(&self) -> &str {
        "postal_address_required"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        let complete = defendant
            .address
            .as_ref()
            .is_some_and(|a| a.first_line().is_some() && has_text(&a.postcode));
        (!complete)
            .then(|| Problem::new(ProblemCode::AddressRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        60
    }
}

/// A defendant faces at least one offence
pub struct OffencesRequired;

impl ValidationRule<Defendant, ValidationContext> for OffencesRequired {
    fn name(&self) -> &str {
        "offences_required"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        defendant
            .offences
            .is_empty()
            .then(|| Problem::new(ProblemCode::OffencesRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// Cap on the offences one defendant faces
pub struct MaxOffences {
    max: usize,
}

impl MaxOffences {
    /// At most `max` offences
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl ValidationRule<Defendant, ValidationContext> for MaxOffences {
    fn name(&self) -> &str {
        "max_offences"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        let count = defendant.offences.len();
        (count > self.max)
            .then(|| {
                Problem::new(ProblemCode::TooManyOffences)
                    .with_value("count", count)
                    .with_value("max", self.max)
            })
            .into()
    }
}

/// Offence sequence numbers are unique per defendant
pub struct UniqueOffenceSequence;

impl ValidationRule<Defendant, ValidationContext> for UniqueOffenceSequence {
    fn name(&self) -> &str {
        "unique_offence_sequence"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        let mut seen: IndexMap<u32, usize> = IndexMap::new();
        for offence in &defendant.offences {
            *seen.entry(offence.offence_sequence_number).or_default() += 1;
        }
        seen.into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(sequence, _)| {
                Problem::new(ProblemCode::DuplicateOffenceSequenceNumber)
                    .with_value("offenceSequenceNumber", sequence)
            })
            .collect()
    }
}

/// A given custody status must be in the code list
pub struct CustodyStatusKnown;

impl ValidationRule<Defendant, ValidationContext> for CustodyStatusKnown {
    fn name(&self) -> &str {
        "custody_status_known"
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        defendant
            .custody_status
            .as_deref()
            .filter(|code| !context.reference_data.is_known_custody_status(code))
            .map(|code| {
                Problem::new(ProblemCode::CustodyStatusNotFound).with_value("custodyStatus", code)
            })
            .into()
    }
}

/// A first hearing must be requested
pub struct InitialHearingRequired;

impl ValidationRule<Defendant, ValidationContext> for InitialHearingRequired {
    fn name(&self) -> &str {
        "initial_hearing_required"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        defendant
            .initial_hearing
            .is_none()
            .then(|| Problem::new(ProblemCode::InitialHearingRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        90
    }
}

/// The hearing court must be in reference data
pub struct HearingCourtKnown;

impl ValidationRule<Defendant, ValidationContext> for HearingCourtKnown {
    fn name(&self) -> &str {
        "hearing_court_known"
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        defendant
            .initial_hearing
            .as_ref()
            .filter(|h| context.reference_data.court(&h.court_hearing_location).is_none())
            .map(|h| {
                Problem::new(ProblemCode::CourtNotFound)
                    .with_value("courtHearingLocation", &h.court_hearing_location)
            })
            .into()
    }
}

/// The requested hearing should not have passed
pub struct HearingDateNotPast;

impl ValidationRule<Defendant, ValidationContext> for HearingDateNotPast {
    fn name(&self) -> &str {
        "hearing_date_not_past"
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        defendant
            .initial_hearing
            .as_ref()
            .filter(|h| h.date_of_hearing < context.today)
            .map(|h| {
                Problem::new(ProblemCode::HearingDateInPast)
                    .with_value("dateOfHearing", h.date_of_hearing)
            })
            .into()
    }
}

/// Which code list an individual's code is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonCode {
    /// Nationality
    Nationality,
    /// Officer-observed ethnicity
    ObservedEthnicity,
    /// Self-defined ethnicity
    SelfDefinedEthnicity,
}

/// A given nationality or ethnicity code must be in its code list
pub struct PersonCodeKnown {
    kind: PersonCode,
}

impl PersonCodeKnown {
    /// Check the given code list
    pub fn new(kind: PersonCode) -> Self {
        Self { kind }
    }
}

impl ValidationRule<Defendant, ValidationContext> for PersonCodeKnown {
    fn name(&self) -> &str {
        match self.kind {
            PersonCode::Nationality => "nationality_known",
            PersonCode::ObservedEthnicity => "observed_ethnicity_known",
            PersonCode::SelfDefinedEthnicity => "self_defined_ethnicity_known",
        }
    }

    fn validate(&self, defendant: &Defendant, context: &ValidationContext) -> ValidationResult {
        let Some(person) = &defendant.individual else {
            return ValidationResult::Valid;
        };
        let data = &context.reference_data;
        let (code, problem, key) = match self.kind {
            PersonCode::Nationality => (
                person.nationality_code.as_deref(),
                ProblemCode::NationalityNotFound,
                "nationalityCode",
            ),
            PersonCode::ObservedEthnicity => (
                person.observed_ethnicity.as_deref(),
                ProblemCode::ObservedEthnicityNotFound,
                "observedEthnicity",
            ),
            PersonCode::SelfDefinedEthnicity => (
                person.self_defined_ethnicity.as_deref(),
                ProblemCode::SelfDefinedEthnicityNotFound,
                "selfDefinedEthnicity",
            ),
        };
        let Some(code) = code else {
            return ValidationResult::Valid;
        };
        let known = match self.kind {
            PersonCode::Nationality => data.is_known_nationality(code),
            PersonCode::ObservedEthnicity => data.is_known_observed_ethnicity(code),
            PersonCode::SelfDefinedEthnicity => data.is_known_self_defined_ethnicity(code),
        };
        (!known)
            .then(|| Problem::new(problem).with_value(key, code))
            .into()
    }

    fn priority(&self) -> u32 {
        20
    }
}

static POSTCODE: OnceLock<Option<Regex>> = OnceLock::new();

/// A given postcode must look like a UK postcode
pub struct PostcodeFormat;

impl ValidationRule<Defendant, ValidationContext> for PostcodeFormat {
    fn name(&self) -> &str {
        "postcode_format"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        let Some(pattern) = POSTCODE.get_or_init(|| {
            Regex::new(r"^(GIR 0AA|[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2})$").ok()
        }) else {
            return ValidationResult::Valid;
        };
        defendant
            .address
            .as_ref()
            .and_then(|a| a.postcode.as_deref())
            .filter(|postcode| !pattern.is_match(postcode))
            .map(|postcode| {
                Problem::new(ProblemCode::InvalidPostcode).with_value("postcode", postcode)
            })
            .into()
    }

    fn priority(&self) -> u32 {
        20
    }
}

const TITLES: &[&str] = &[
    "MR", "MRS", "MISS", "MS", "MX", "DR", "PROF", "REV", "SIR", "DAME", "LORD", "LADY",
];

/// A given title must be a recognised honorific
pub struct TitleRecognised;

impl ValidationRule<Defendant, ValidationContext> for TitleRecognised {
    fn name(&self) -> &str {
        "title_recognised"
    }

    fn validate(&self, defendant: &Defendant, _: &ValidationContext) -> ValidationResult {
        defendant
            .individual
            .as_ref()
            .and_then(|person| person.title.as_deref())
            .filter(|title| {
                let bare = title.trim_end_matches('.').to_ascii_uppercase();
                !TITLES.contains(&bare.as_str())
            })
            .map(|title| Problem::new(ProblemCode::InvalidTitle).with_value("title", title))
            .into()
    }

    fn priority(&self) -> u32 {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::enrich;
    use crate::model::{CaseType, InitialHearing, Prosecution};
    use crate::test_support::{context, date, fixtures, reference_data};
    use test_case::test_case;

    fn check<R>(rule: R, prosecution: Prosecution, case_type: CaseType) -> Vec<ProblemCode>
    where
        R: ValidationRule<Defendant, ValidationContext>,
    {
        let enriched = enrich(&prosecution, &reference_data().snapshot());
        let ctx = context(case_type, &enriched);
        rule.validate(&enriched.defendants[0], &ctx)
            .problems()
            .iter()
            .map(|p| p.code)
            .collect()
    }

    fn sjp_with(change: impl FnOnce(&mut Defendant)) -> Prosecution {
        let mut prosecution = fixtures::sjp_prosecution();
        change(&mut prosecution.defendants[0]);
        prosecution
    }

    #[test]
    fn organisation_counts_as_named() {
        let prosecution = sjp_with(|d| {
            d.individual = None;
            d.organisation_name = Some("Acme Haulage Ltd".into());
        });
        assert!(check(DefendantNamed, prosecution, CaseType::Sjp).is_empty());

        let prosecution = sjp_with(|d| d.individual.as_mut().unwrap().last_name = Some(" ".into()));
        assert_eq!(
            check(DefendantNamed, prosecution, CaseType::Sjp),
            vec![ProblemCode::DefendantNameRequired]
        );
    }

    #[test_case(Some(date(2006, 2, 1)) => Vec::<ProblemCode>::new() ; "eighteenth birthday on receipt")]
    #[test_case(Some(date(2006, 2, 2)) => vec![ProblemCode::DefendantUnderage] ; "one day short")]
    #[test_case(None => vec![ProblemCode::DateOfBirthRequired] ; "no date of birth")]
    fn sjp_minimum_age(dob: Option<chrono::NaiveDate>) -> Vec<ProblemCode> {
        let prosecution = sjp_with(|d| d.individual.as_mut().unwrap().date_of_birth = dob);
        check(AdultDefendant::new(18), prosecution, CaseType::Sjp)
    }

    #[test]
    fn organisations_have_no_age() {
        let prosecution = sjp_with(|d| {
            d.individual = None;
            d.organisation_name = Some("Acme Haulage Ltd".into());
        });
        assert!(check(AdultDefendant::new(18), prosecution, CaseType::Sjp).is_empty());
    }

    #[test]
    fn date_of_birth_after_receipt_is_reported() {
        let prosecution =
            sjp_with(|d| d.individual.as_mut().unwrap().date_of_birth = Some(date(2024, 2, 2)));
        assert_eq!(
            check(DateOfBirthNotInFuture, prosecution, CaseType::Sjp),
            vec![ProblemCode::DateOfBirthInFuture]
        );
    }

    #[test]
    fn address_needs_first_line_and_postcode() {
        let prosecution = sjp_with(|d| d.address.as_mut().unwrap().postcode = None);
        assert_eq!(
            check(PostalAddressRequired, prosecution, CaseType::Sjp),
            vec![ProblemCode::AddressRequired]
        );
        let prosecution = sjp_with(|d| d.address = None);
        assert_eq!(
            check(PostalAddressRequired, prosecution, CaseType::Sjp),
            vec![ProblemCode::AddressRequired]
        );
    }

    #[test]
    fn offence_count_rules() {
        let prosecution = sjp_with(|d| d.offences.clear());
        assert_eq!(
            check(OffencesRequired, prosecution, CaseType::Sjp),
            vec![ProblemCode::OffencesRequired]
        );

        let prosecution = sjp_with(|d| {
            let template = d.offences[0].clone();
            d.offences = (1..=3)
                .map(|n| {
                    let mut o = template.clone();
                    o.offence_sequence_number = n;
                    o
                })
                .collect();
        });
        assert_eq!(
            check(MaxOffences::new(2), prosecution, CaseType::Sjp),
            vec![ProblemCode::TooManyOffences]
        );
    }

    #[test]
    fn repeated_sequence_numbers_are_reported() {
        let prosecution = sjp_with(|d| {
            let copy = d.offences[0].clone();
            d.offences.push(copy);
        });
        assert_eq!(
            check(UniqueOffenceSequence, prosecution, CaseType::Sjp),
            vec![ProblemCode::DuplicateOffenceSequenceNumber]
        );
    }

    #[test_case(Some("B") => true ; "known")]
    #[test_case(Some("x") => false ; "unknown")]
    #[test_case(None => true ; "absent")]
    fn custody_status(code: Option<&str>) -> bool {
        let mut prosecution = fixtures::cc_prosecution();
        prosecution.defendants[0].custody_status = code.map(String::from);
        check(CustodyStatusKnown, prosecution, CaseType::CrownCourt).is_empty()
    }

    #[test]
    fn hearing_rules() {
        let mut prosecution = fixtures::cc_prosecution();
        assert!(check(HearingCourtKnown, prosecution.clone(), CaseType::CrownCourt).is_empty());
        assert!(check(HearingDateNotPast, prosecution.clone(), CaseType::CrownCourt).is_empty());

        prosecution.defendants[0].initial_hearing = Some(InitialHearing {
            date_of_hearing: date(2024, 2, 28),
            court_hearing_location: "ZZ99Z00".into(),
            court_name: None,
        });
        assert_eq!(
            check(HearingCourtKnown, prosecution.clone(), CaseType::CrownCourt),
            vec![ProblemCode::CourtNotFound]
        );
        assert_eq!(
            check(HearingDateNotPast, prosecution.clone(), CaseType::CrownCourt),
            vec![ProblemCode::HearingDateInPast]
        );

        prosecution.defendants[0].initial_hearing = None;
        assert_eq!(
            check(InitialHearingRequired, prosecution, CaseType::CrownCourt),
            vec![ProblemCode::InitialHearingRequired]
        );
    }

    #[test_case(PersonCode::Nationality ; "nationality")]
    #[test_case(PersonCode::ObservedEthnicity ; "observed ethnicity")]
    #[test_case(PersonCode::SelfDefinedEthnicity ; "self-defined ethnicity")]
    fn unknown_person_codes_are_reported(kind: PersonCode) {
        let prosecution = sjp_with(|d| {
            let person = d.individual.as_mut().unwrap();
            person.nationality_code = Some("XXX".into());
            person.observed_ethnicity = Some("Z9".into());
            person.self_defined_ethnicity = Some("Z9".into());
        });
        assert_eq!(check(PersonCodeKnown::new(kind), prosecution, CaseType::Sjp).len(), 1);
        assert!(check(
            PersonCodeKnown::new(kind),
            fixtures::sjp_prosecution(),
            CaseType::Sjp
        )
        .is_empty());
    }

    #[test_case("SW1A 1AA" => true ; "central london")]
    #[test_case("m1 1ae" => true ; "lower case normalised")]
    #[test_case("CR26XH" => true ; "no space")]
    #[test_case("GIR 0AA" => true ; "girobank")]
    #[test_case("12345" => false ; "zip code")]
    #[test_case("SW1A 1A" => false ; "truncated")]
    fn postcode_format(postcode: &str) -> bool {
        let prosecution =
            sjp_with(|d| d.address.as_mut().unwrap().postcode = Some(postcode.into()));
        check(PostcodeFormat, prosecution, CaseType::Sjp).is_empty()
    }

    #[test_case("Mrs" => true ; "plain")]
    #[test_case("dr." => true ; "abbreviated with stop")]
    #[test_case("Captain" => false ; "not recognised")]
    fn title(title: &str) -> bool {
        let prosecution = sjp_with(|d| d.individual.as_mut().unwrap().title = Some(title.into()));
        check(TitleRecognised, prosecution, CaseType::Sjp).is_empty()
    }
}
