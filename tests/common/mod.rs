// Copyright 2025 Cowboy AI, LLC.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use prosecution_casefile::config::CaseFileConfig;
use prosecution_casefile::model::{GroupProsecution, Prosecution};
use prosecution_casefile::reference_data::InMemoryReferenceData;
use prosecution_casefile::validation::ValidationPipeline;
use prosecution_casefile::CaseFileService;
use serde_json::{json, Value};
use uuid::Uuid;

pub const TFL: &str = "GAFTL00";
pub const MET: &str = "01MP000";
pub const LAVENDER_HILL: &str = "B01LY00";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

pub fn reference_data() -> InMemoryReferenceData {
    InMemoryReferenceData::from_json(include_str!("../fixtures/reference_data.json"))
        .expect("reference data fixture parses")
}

pub fn pipeline() -> Arc<ValidationPipeline> {
    let config = CaseFileConfig::default();
    Arc::new(
        ValidationPipeline::new(Arc::new(reference_data()), config.validation.clone())
            .with_today(today()),
    )
}

pub fn service() -> CaseFileService {
    CaseFileService::with_pipeline(CaseFileConfig::default(), pipeline())
}

pub fn offence(code: &str, sequence: u32, committed: &str) -> Value {
    json!({
        "offenceId": Uuid::new_v4(),
        "offenceSequenceNumber": sequence,
        "offenceCode": code,
        "offenceCommittedDate": committed,
        "offenceWording": "On the date stated the defendant committed the offence",
        "statementOfFacts": "The defendant was seen by an officer",
        "appliedCompensation": "50.00"
    })
}

pub fn defendant(reference: &str, offences: Vec<Value>) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "prosecutorDefendantReference": reference,
        "individual": {
            "title": "Ms",
            "firstName": "Alex",
            "lastName": "Morgan",
            "dateOfBirth": "1990-06-01",
            "nationalityCode": "GBR",
            "observedEthnicity": "W1",
            "selfDefinedEthnicity": "W1"
        },
        "address": {
            "address1": "12 Station Road",
            "postcode": "SW11 1JU"
        },
        "offences": offences
    })
}

/// Defendant with the hearing and custody details charged cases need
pub fn charged_defendant(reference: &str, offences: Vec<Value>) -> Value {
    let mut defendant = defendant(reference, offences);
    defendant["custodyStatus"] = json!("B");
    defendant["initialHearing"] = json!({
        "dateOfHearing": "2024-03-15",
        "courtHearingLocation": LAVENDER_HILL
    });
    defendant
}

fn payload(
    urn: &str,
    prosecutor: &str,
    initiation: &str,
    channel: &str,
    defendants: Vec<Value>,
) -> Value {
    json!({
        "caseDetails": {
            "caseId": Uuid::new_v4(),
            "prosecutorCaseReference": urn,
            "prosecutor": { "prosecutingAuthority": prosecutor },
            "initiationCode": initiation,
            "dateReceived": "2024-02-01"
        },
        "defendants": defendants,
        "channel": channel
    })
}

pub fn sjp_payload(urn: &str) -> Value {
    payload(
        urn,
        TFL,
        "J",
        "CPPI",
        vec![defendant("TFL-DEF-1", vec![offence("CA03012", 1, "2024-01-10")])],
    )
}

pub fn cc_payload(urn: &str) -> Value {
    let mut theft = offence("TH68001", 1, "2023-12-20");
    theft["chargeDate"] = json!("2024-01-05");
    theft["arrestDate"] = json!("2024-01-04");
    payload(
        urn,
        MET,
        "C",
        "SPI",
        vec![charged_defendant("MET-DEF-1", vec![theft])],
    )
}

pub fn prosecution(payload: Value) -> Prosecution {
    serde_json::from_value(payload).expect("payload deserializes")
}

pub fn group(urns: &[&str]) -> GroupProsecution {
    let cases: Vec<Value> = urns
        .iter()
        .enumerate()
        .map(|(i, urn)| json!({ "isGroupMaster": i == 0, "prosecution": cc_payload(urn) }))
        .collect();
    serde_json::from_value(json!({ "groupId": Uuid::new_v4(), "cases": cases }))
        .expect("group deserializes")
}
