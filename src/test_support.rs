// Copyright 2025 Cowboy AI, LLC.

//! Shared fixtures for unit tests

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ValidationSettings;
use crate::model::{CaseType, ModeOfTrial, Prosecution};
use crate::reference_data::{
    CodeDescription, CourtReferenceData, InMemoryReferenceData, NationalityReferenceData,
    OffenceReferenceData, ProsecutorReferenceData,
};
use crate::validation::ValidationContext;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Date every fixture is validated on
pub(crate) fn today() -> NaiveDate {
    date(2024, 3, 1)
}

fn offence(
    code: &str,
    title: &str,
    mode_of_trial: ModeOfTrial,
    valid: (NaiveDate, Option<NaiveDate>),
    sjp_eligible: bool,
    location_required: bool,
) -> OffenceReferenceData {
    OffenceReferenceData {
        cjs_offence_code: code.into(),
        title: title.into(),
        legislation: format!("{title} legislation"),
        mode_of_trial,
        valid_from: valid.0,
        valid_to: valid.1,
        sjp_eligible,
        location_required,
    }
}

pub(crate) fn reference_data() -> InMemoryReferenceData {
    let mut store = InMemoryReferenceData::new()
        .with_prosecutor(ProsecutorReferenceData {
            id: Uuid::from_u128(0x7f1),
            ou_code: fixtures::TFL.into(),
            full_name: "Transport for London".into(),
            sjp_enabled: true,
        })
        .with_prosecutor(ProsecutorReferenceData {
            id: Uuid::from_u128(0x1a1),
            ou_code: fixtures::MET.into(),
            full_name: "Metropolitan Police Service".into(),
            sjp_enabled: false,
        })
        .with_court(CourtReferenceData {
            ou_code: fixtures::LAVENDER_HILL.into(),
            court_name: "Lavender Hill Magistrates' Court".into(),
            welsh: false,
        })
        .with_court(CourtReferenceData {
            ou_code: "B62AA00".into(),
            court_name: "Cardiff Magistrates' Court".into(),
            welsh: true,
        })
        .with_offence(offence(
            "CA03012",
            "Use a television receiver without a licence",
            ModeOfTrial::SummaryOnly,
            (date(2004, 4, 1), None),
            true,
            false,
        ))
        .with_offence(offence(
            "RT88191",
            "Exceed 30 mph speed limit",
            ModeOfTrial::SummaryOnly,
            (date(1988, 11, 15), None),
            true,
            true,
        ))
        .with_offence(offence(
            "TH68001",
            "Theft from the person",
            ModeOfTrial::EitherWay,
            (date(2016, 1, 1), None),
            false,
            false,
        ))
        .with_offence(offence(
            "TH68001",
            "Theft",
            ModeOfTrial::EitherWay,
            (date(1968, 7, 26), Some(date(2015, 12, 31))),
            false,
            false,
        ))
        .with_offence(offence(
            "OF61016",
            "Murder",
            ModeOfTrial::IndictableOnly,
            (date(1861, 8, 6), None),
            false,
            false,
        ));

    store.nationalities = vec![
        NationalityReferenceData {
            iso_code: "GBR".into(),
            nationality: "British".into(),
        },
        NationalityReferenceData {
            iso_code: "IRL".into(),
            nationality: "Irish".into(),
        },
    ];
    store.observed_ethnicities = vec![
        CodeDescription::new("W1", "White - British"),
        CodeDescription::new("B1", "Black - Caribbean"),
    ];
    store.self_defined_ethnicities = vec![
        CodeDescription::new("W1", "White - British"),
        CodeDescription::new("A1", "Asian - Indian"),
    ];
    store.custody_statuses = vec![
        CodeDescription::new("C", "Remanded in custody"),
        CodeDescription::new("B", "Conditional bail"),
        CodeDescription::new("U", "Unconditional bail"),
    ];
    store.summons_codes = vec![
        CodeDescription::new("M", "Motoring"),
        CodeDescription::new("E", "Either way"),
    ];
    store
}

/// Context over the whole fixture store, dated [`today`]
pub(crate) fn context(case_type: CaseType, prosecution: &Prosecution) -> ValidationContext {
    ValidationContext {
        case_type,
        case: Arc::new(prosecution.case_details.clone()),
        reference_data: Arc::new(reference_data().snapshot()),
        settings: Arc::new(ValidationSettings::default()),
        today: today(),
    }
}

pub(crate) mod fixtures {
    use super::*;
    use crate::model::{
        Address, CaseDetails, CaseId, Channel, Defendant, DefendantId, GroupId, GroupMember,
        GroupProsecution, InitialHearing, Individual, InitiationCode, Offence, OffenceId,
        Prosecutor,
    };

    pub(crate) const TFL: &str = "GAFTL00";
    pub(crate) const MET: &str = "01MP000";
    pub(crate) const LAVENDER_HILL: &str = "B01LY00";

    pub(crate) fn individual() -> Individual {
        Individual {
            title: Some("Mr".into()),
            first_name: Some("Sam".into()),
            last_name: Some("Jones".into()),
            date_of_birth: Some(date(1985, 4, 12)),
            nationality_code: Some("GBR".into()),
            observed_ethnicity: Some("W1".into()),
            self_defined_ethnicity: Some("W1".into()),
        }
    }

    pub(crate) fn address() -> Address {
        Address {
            address1: Some("1 High Street".into()),
            address2: Some("London".into()),
            postcode: Some("SW1A 1AA".into()),
            ..Default::default()
        }
    }

    pub(crate) fn offence(code: &str, sequence: u32, committed: NaiveDate) -> Offence {
        Offence {
            offence_id: OffenceId::new(),
            offence_sequence_number: sequence,
            offence_code: code.into(),
            offence_committed_date: committed,
            offence_committed_end_date: None,
            charge_date: None,
            arrest_date: None,
            offence_wording: Some("On the date stated the defendant committed the offence".into()),
            statement_of_facts: Some("The defendant was seen by an officer".into()),
            offence_location: None,
            applied_compensation: Some(Decimal::new(5000, 2)),
            reference_data: None,
        }
    }

    pub(crate) fn defendant(reference: &str, offences: Vec<Offence>) -> Defendant {
        Defendant {
            id: DefendantId::new(),
            prosecutor_defendant_reference: reference.into(),
            individual: Some(individual()),
            organisation_name: None,
            address: Some(address()),
            custody_status: None,
            initial_hearing: None,
            offences,
        }
    }

    fn case_details(urn: &str, prosecutor: &str, initiation_code: InitiationCode) -> CaseDetails {
        CaseDetails {
            case_id: CaseId::new(),
            prosecutor_case_reference: urn.into(),
            prosecutor: Prosecutor {
                prosecuting_authority: prosecutor.into(),
                reference_data: None,
            },
            initiation_code,
            date_received: date(2024, 2, 1),
            case_marker: None,
            summons_code: None,
        }
    }

    /// SJP television licence case brought by TfL
    pub(crate) fn sjp_prosecution() -> Prosecution {
        Prosecution {
            case_details: case_details("TFL00012345", TFL, InitiationCode::J),
            defendants: vec![defendant(
                "TFL-DEF-1",
                vec![offence("CA03012", 1, date(2024, 1, 10))],
            )],
            channel: Channel::Cppi,
        }
    }

    /// Charged theft case brought by the Met
    pub(crate) fn cc_prosecution() -> Prosecution {
        let mut theft = offence("TH68001", 1, date(2023, 12, 20));
        theft.arrest_date = Some(date(2024, 1, 4));
        theft.charge_date = Some(date(2024, 1, 5));
        theft.statement_of_facts = None;
        theft.applied_compensation = None;

        let mut defendant = defendant("MET-DEF-1", vec![theft]);
        defendant.custody_status = Some("B".into());
        defendant.initial_hearing = Some(InitialHearing {
            date_of_hearing: date(2024, 3, 15),
            court_hearing_location: LAVENDER_HILL.into(),
            court_name: None,
        });

        Prosecution {
            case_details: case_details("01MP1234524", MET, InitiationCode::C),
            defendants: vec![defendant],
            channel: Channel::Spi,
        }
    }

    /// Group of `size` charged cases, the first being master
    pub(crate) fn group_prosecution(size: usize) -> GroupProsecution {
        GroupProsecution {
            group_id: GroupId::new(),
            cases: (0..size)
                .map(|i| {
                    let mut prosecution = cc_prosecution();
                    prosecution.case_details.prosecutor_case_reference =
                        format!("01MP{:05}24", 10000 + i);
                    GroupMember {
                        is_group_master: i == 0,
                        prosecution,
                    }
                })
                .collect(),
        }
    }
}
