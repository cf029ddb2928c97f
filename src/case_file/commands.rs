// Copyright 2025 Cowboy AI, LLC.

//! Case file commands

use serde::{Deserialize, Serialize};

use crate::cqrs::Command;
use crate::entity::{CaseMarker, EntityId, GroupMarker};
use crate::model::{CaseId, Defendant, GroupProsecution, Prosecution};

/// Take on a Single Justice Procedure prosecution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveSjpProsecution {
    /// The submission
    pub prosecution: Prosecution,
}

impl Command for ReceiveSjpProsecution {
    type Aggregate = CaseMarker;

    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>> {
        Some(self.prosecution.case_id())
    }
}

/// Take on a charged (Crown Court) prosecution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveCcProsecution {
    /// The submission
    pub prosecution: Prosecution,
}

impl Command for ReceiveCcProsecution {
    type Aggregate = CaseMarker;

    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>> {
        Some(self.prosecution.case_id())
    }
}

/// Take on a group of charged prosecutions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveGroupProsecution {
    /// The group
    pub group: GroupProsecution,
}

impl Command for ReceiveGroupProsecution {
    type Aggregate = GroupMarker;

    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>> {
        Some(self.group.group_id)
    }
}

/// Replace a defendant held for correction and revalidate the case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectDefendant {
    /// Case holding the defendant
    pub case_id: CaseId,
    /// Corrected defendant; matched on its id
    pub defendant: Defendant,
}

impl Command for CorrectDefendant {
    type Aggregate = CaseMarker;

    fn aggregate_id(&self) -> Option<EntityId<Self::Aggregate>> {
        Some(self.case_id)
    }
}
