// Copyright 2025 Cowboy AI, LLC.

//! Prosecution submission payload
//!
//! These are the inbound shapes of a prosecution: a case, its prosecutor, its
//! defendants and their offences. They deserialize from the camelCase JSON
//! the submission channels send, and carry optional `reference_data` slots that
//! enrichment fills before validation.

mod defendant;
mod group;
mod offence;
mod prosecution;

pub use defendant::{Address, Defendant, InitialHearing, Individual};
pub use group::{GroupMember, GroupProsecution};
pub use offence::{ModeOfTrial, Offence, OffenceDetails};
pub(crate) use offence::has_text;
pub use prosecution::{
    CaseDetails, CaseType, Channel, InitiationCode, Prosecution, Prosecutor, ProsecutorDetails,
};

use crate::entity::{CaseMarker, DefendantMarker, EntityId, GroupMarker, OffenceMarker};

/// Identity of a prosecution case file
pub type CaseId = EntityId<CaseMarker>;
/// Identity of a defendant within a case
pub type DefendantId = EntityId<DefendantMarker>;
/// Identity of an offence within a defendant
pub type OffenceId = EntityId<OffenceMarker>;
/// Identity of a group prosecution
pub type GroupId = EntityId<GroupMarker>;

/// JSON schema of the prosecution submission payload
pub fn prosecution_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(Prosecution)
}
