// Copyright 2025 Cowboy AI, LLC.

//! Prosecution case file aggregate, its commands and its events

mod aggregate;
mod commands;
mod events;

pub use aggregate::{CaseStatus, ProsecutionCaseFile};
pub use commands::{
    CorrectDefendant, ReceiveCcProsecution, ReceiveGroupProsecution, ReceiveSjpProsecution,
};
pub use events::{CaseFileEvent, CaseOutcome, CaseSummary, DefendantOutcome, GroupOutcome};
