// Copyright 2025 Cowboy AI, LLC.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{GroupId, Prosecution};

/// One case of a group prosecution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    /// The master case carries the group's hearing and is listed first
    #[serde(default)]
    pub is_group_master: bool,
    /// The member case
    pub prosecution: Prosecution,
}

/// Many cases submitted together by one prosecutor for joint handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupProsecution {
    /// Group identity
    pub group_id: GroupId,
    /// Member cases
    #[serde(default)]
    pub cases: Vec<GroupMember>,
}
