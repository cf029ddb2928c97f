// Copyright 2025 Cowboy AI, LLC.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{DefendantId, Offence};

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First line
    #[serde(default)]
    pub address1: Option<String>,
    /// Second line
    #[serde(default)]
    pub address2: Option<String>,
    /// Third line
    #[serde(default)]
    pub address3: Option<String>,
    /// Fourth line
    #[serde(default)]
    pub address4: Option<String>,
    /// Fifth line
    #[serde(default)]
    pub address5: Option<String>,
    /// Postcode
    #[serde(default)]
    pub postcode: Option<String>,
}

impl Address {
    /// First address line with content, if any
    pub fn first_line(&self) -> Option<&str> {
        self.address1
            .as_deref()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Personal details of an individual defendant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    /// Title (Mr, Ms, Dr...)
    #[serde(default)]
    pub title: Option<String>,
    /// Forename
    #[serde(default)]
    pub first_name: Option<String>,
    /// Surname
    #[serde(default)]
    pub last_name: Option<String>,
    /// Date of birth
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Nationality code (ISO 3166 alpha-3)
    #[serde(default)]
    pub nationality_code: Option<String>,
    /// Officer-observed ethnicity code
    #[serde(default)]
    pub observed_ethnicity: Option<String>,
    /// Self-defined ethnicity code
    #[serde(default)]
    pub self_defined_ethnicity: Option<String>,
}

/// First hearing the prosecutor asks to be listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialHearing {
    /// Requested hearing date
    pub date_of_hearing: NaiveDate,
    /// Court OU code
    pub court_hearing_location: String,
    /// Filled by enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_name: Option<String>,
}

/// A defendant on a prosecution case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Defendant {
    /// Defendant identity
    pub id: DefendantId,
    /// Prosecutor's own reference for the defendant
    pub prosecutor_defendant_reference: String,
    /// Set for individual defendants
    #[serde(default)]
    pub individual: Option<Individual>,
    /// Set for corporate defendants
    #[serde(default)]
    pub organisation_name: Option<String>,
    /// Postal address
    #[serde(default)]
    pub address: Option<Address>,
    /// Custody status code
    #[serde(default)]
    pub custody_status: Option<String>,
    /// Requested first hearing
    #[serde(default)]
    pub initial_hearing: Option<InitialHearing>,
    /// Offences charged
    #[serde(default)]
    pub offences: Vec<Offence>,
}

impl Defendant {
    /// Name for logs and read models
    pub fn display_name(&self) -> String {
        if let Some(org) = &self.organisation_name {
            return org.clone();
        }
        match &self.individual {
            Some(person) => [person.first_name.as_deref(), person.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
            None => self.prosecutor_defendant_reference.clone(),
        }
    }

    /// Date of birth of an individual defendant
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.individual.as_ref().and_then(|p| p.date_of_birth)
    }

    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        self.date_of_birth().map(|dob| age_between(dob, date))
    }
}

/// Whole years elapsed from `from` to `to`; zero when `to` precedes `from`
pub(crate) fn age_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to < from {
        return 0;
    }
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_case(date(2000, 6, 15), date(2018, 6, 14) => 17 ; "day before birthday")]
    #[test_case(date(2000, 6, 15), date(2018, 6, 15) => 18 ; "on birthday")]
    #[test_case(date(2000, 2, 29), date(2018, 2, 28) => 17 ; "leap day not yet reached")]
    #[test_case(date(2000, 2, 29), date(2018, 3, 1) => 18 ; "leap day passed")]
    #[test_case(date(2020, 1, 1), date(2019, 1, 1) => 0 ; "born after date")]
    fn age_is_whole_years(dob: NaiveDate, on: NaiveDate) -> u32 {
        age_between(dob, on)
    }

    #[test]
    fn display_name_prefers_organisation() {
        let mut defendant = Defendant {
            id: DefendantId::new(),
            prosecutor_defendant_reference: "DEF-1".into(),
            individual: Some(Individual {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                ..Default::default()
            }),
            organisation_name: None,
            address: None,
            custody_status: None,
            initial_hearing: None,
            offences: vec![],
        };
        assert_eq!(defendant.display_name(), "Ada Lovelace");

        defendant.organisation_name = Some("Acme Haulage Ltd".into());
        assert_eq!(defendant.display_name(), "Acme Haulage Ltd");
    }

    #[test]
    fn blank_first_line_is_missing() {
        let address = Address {
            address1: Some("   ".into()),
            ..Default::default()
        };
        assert!(address.first_line().is_none());
    }
}
