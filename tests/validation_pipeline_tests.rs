// Copyright 2025 Cowboy AI, LLC.

mod common;

use common::{cc_payload, prosecution, sjp_payload};
use pretty_assertions::assert_eq;
use prosecution_casefile::validation::{Decision, ProblemCode, ProblemLevel};
use prosecution_casefile::CaseType;
use serde_json::json;

fn codes(report: &prosecution_casefile::ValidationReport) -> Vec<ProblemCode> {
    report.problems().map(|p| p.code()).collect()
}

#[tokio::test]
async fn clean_sjp_submission_is_accepted_and_enriched() {
    let pipeline = common::pipeline();
    let mut payload = sjp_payload("tfl00012345 ");
    payload["defendants"][0]["offences"][0]["offenceCode"] = json!(" ca03012");

    let validated = pipeline
        .validate(&prosecution(payload), CaseType::Sjp)
        .await
        .expect("validation runs");

    assert_eq!(validated.report.decision(CaseType::Sjp), Decision::Accepted);
    let case = &validated.prosecution.case_details;
    assert_eq!(case.prosecutor_case_reference, "TFL00012345");
    assert_eq!(
        case.prosecutor
            .reference_data
            .as_ref()
            .map(|p| p.full_name.as_str()),
        Some("Transport for London")
    );
    let offence = &validated.prosecution.defendants[0].offences[0];
    assert_eq!(offence.offence_code, "CA03012");
    assert!(offence.reference_data.is_some());
}

#[tokio::test]
async fn offence_version_follows_committed_date() {
    let pipeline = common::pipeline();
    let mut payload = cc_payload("01MP1234524");
    payload["defendants"][0]["offences"][0]["offenceCommittedDate"] = json!("2015-06-01");

    let validated = pipeline
        .validate(&prosecution(payload), CaseType::CrownCourt)
        .await
        .expect("validation runs");

    let details = validated.prosecution.defendants[0].offences[0]
        .reference_data
        .clone()
        .expect("offence enriched");
    assert_eq!(details.title, "Theft");
    assert_eq!(validated.report.decision(CaseType::CrownCourt), Decision::Accepted);
}

#[tokio::test]
async fn unknown_prosecutor_stops_before_defendants() {
    let pipeline = common::pipeline();
    let mut payload = sjp_payload("TFL00012345");
    payload["caseDetails"]["prosecutor"]["prosecutingAuthority"] = json!("ZZ99999");
    payload["defendants"][0]["offences"][0]["offenceCode"] = json!("NOPE001");

    let report = pipeline
        .validate(&prosecution(payload), CaseType::Sjp)
        .await
        .expect("validation runs")
        .report;

    assert_eq!(report.blocked_by.as_deref(), Some("prosecutor_known"));
    assert_eq!(codes(&report), vec![ProblemCode::ProsecutorNotFound]);
    assert!(report.defendants.is_empty());
    assert_eq!(report.decision(CaseType::Sjp), Decision::Rejected);
}

#[tokio::test]
async fn underage_sjp_defendant_rejects_the_case() {
    let pipeline = common::pipeline();
    let mut payload = sjp_payload("TFL00012345");
    payload["defendants"][0]["individual"]["dateOfBirth"] = json!("2010-05-05");

    let report = pipeline
        .validate(&prosecution(payload), CaseType::Sjp)
        .await
        .expect("validation runs")
        .report;

    assert!(codes(&report).contains(&ProblemCode::DefendantUnderage));
    assert_eq!(report.decision(CaseType::Sjp), Decision::Rejected);
}

#[tokio::test]
async fn offence_problems_name_the_offence() {
    let pipeline = common::pipeline();
    let mut payload = sjp_payload("TFL00012345");
    payload["defendants"][0]["offences"][0]["offenceCode"] = json!("XX00000");
    let submitted = prosecution(payload);
    let offence_id = submitted.defendants[0].offences[0].offence_id;

    let report = pipeline
        .validate(&submitted, CaseType::Sjp)
        .await
        .expect("validation runs")
        .report;

    let problem = report
        .problems()
        .find(|p| p.code() == ProblemCode::OffenceCodeNotFound)
        .expect("unknown offence reported");
    assert_eq!(
        problem.problem.value("offenceId"),
        Some(offence_id.to_string().as_str())
    );
    assert_eq!(problem.problem.value("offenceSequenceNumber"), Some("1"));
}

#[tokio::test]
async fn crown_court_defendant_errors_hold_the_case() {
    let pipeline = common::pipeline();
    let mut payload = cc_payload("01MP1234524");
    payload["defendants"][0]
        .as_object_mut()
        .expect("defendant object")
        .remove("initialHearing");
    let submitted = prosecution(payload);
    let defendant_id = submitted.defendants[0].id;

    let report = pipeline
        .validate(&submitted, CaseType::CrownCourt)
        .await
        .expect("validation runs")
        .report;

    assert!(codes(&report).contains(&ProblemCode::InitialHearingRequired));
    assert_eq!(
        report.decision(CaseType::CrownCourt),
        Decision::PendingCorrection {
            defendant_ids: vec![defendant_id]
        }
    );
}

#[tokio::test]
async fn unknown_codes_only_warn() {
    let pipeline = common::pipeline();
    let mut payload = cc_payload("01MP1234524");
    payload["defendants"][0]["individual"]["nationalityCode"] = json!("XXX");
    payload["defendants"][0]["address"]["postcode"] = json!("NOT A POSTCODE");

    let report = pipeline
        .validate(&prosecution(payload), CaseType::CrownCourt)
        .await
        .expect("validation runs")
        .report;

    assert_eq!(report.count(ProblemLevel::Error), 0);
    assert_eq!(
        codes(&report),
        vec![ProblemCode::NationalityNotFound, ProblemCode::InvalidPostcode]
    );
    assert_eq!(
        report.decision(CaseType::CrownCourt),
        Decision::AcceptedWithWarnings
    );
}

#[tokio::test]
async fn sjp_route_refuses_a_prosecutor_without_sjp() {
    let pipeline = common::pipeline();
    let mut payload = sjp_payload("01MP1234524");
    payload["caseDetails"]["prosecutor"]["prosecutingAuthority"] = json!(common::MET);

    let report = pipeline
        .validate(&prosecution(payload), CaseType::Sjp)
        .await
        .expect("validation runs")
        .report;

    assert!(codes(&report).contains(&ProblemCode::ProsecutorNotSjpEnabled));
    assert_eq!(report.decision(CaseType::Sjp), Decision::Rejected);
}

#[tokio::test]
async fn group_member_case_error_rejects_every_member() {
    let pipeline = common::pipeline();
    let mut group = common::group(&["01MP1000124", "01MP1000224", "01MP1000324"]);
    group.cases[2].prosecution.case_details.prosecutor_case_reference = "BAD-URN!".into();

    let validated = pipeline
        .validate_group(&group)
        .await
        .expect("validation runs");

    assert!(validated.report.is_rejected());
    let decisions = validated.report.member_decisions();
    assert_eq!(decisions.len(), 3);
    assert!(decisions.iter().all(|(_, d)| *d == Decision::Rejected));
    assert_eq!(validated.report.error_summary(), "INVALID_CASE_REFERENCE");
}

#[tokio::test]
async fn clean_group_accepts_every_member() {
    let pipeline = common::pipeline();
    let group = common::group(&["01MP1000124", "01MP1000224"]);

    let validated = pipeline
        .validate_group(&group)
        .await
        .expect("validation runs");

    assert!(!validated.report.is_rejected());
    assert!(validated
        .report
        .member_decisions()
        .iter()
        .all(|(_, d)| *d == Decision::Accepted));
    assert!(validated
        .group
        .cases
        .iter()
        .all(|m| m.prosecution.case_details.prosecutor.reference_data.is_some()));
}
