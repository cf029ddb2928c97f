// Copyright 2025 Cowboy AI, LLC.

//! Group prosecution rules
//!
//! These run once over the whole group, before any member case is validated.

use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

use crate::config::ValidationSettings;
use crate::model::GroupProsecution;
use crate::reference_data::normalise;
use crate::validation::{Problem, ProblemCode, ValidationResult, ValidationRule};

/// A group holds at least one case
pub struct GroupNotEmpty;

impl ValidationRule<GroupProsecution, ValidationSettings> for GroupNotEmpty {
    fn name(&self) -> &str {
        "group_not_empty"
    }

    fn validate(&self, group: &GroupProsecution, _: &ValidationSettings) -> ValidationResult {
        group
            .cases
            .is_empty()
            .then(|| Problem::new(ProblemCode::GroupCasesRequired))
            .into()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// Exactly one case is the group master
pub struct SingleGroupMaster;

impl ValidationRule<GroupProsecution, ValidationSettings> for SingleGroupMaster {
    fn name(&self) -> &str {
        "single_group_master"
    }

    fn validate(&self, group: &GroupProsecution, _: &ValidationSettings) -> ValidationResult {
        let masters = group.cases.iter().filter(|m| m.is_group_master).count();
        (masters != 1)
            .then(|| Problem::new(ProblemCode::GroupMasterRequired).with_value("masters", masters))
            .into()
    }

    fn priority(&self) -> u32 {
        90
    }
}

/// Every case in the group comes from the same prosecutor
pub struct SingleProsecutor;

impl ValidationRule<GroupProsecution, ValidationSettings> for SingleProsecutor {
    fn name(&self) -> &str {
        "single_prosecutor"
    }

    fn validate(&self, group: &GroupProsecution, _: &ValidationSettings) -> ValidationResult {
        let prosecutors: IndexSet<String> = group
            .cases
            .iter()
            .map(|m| normalise(&m.prosecution.case_details.prosecutor.prosecuting_authority))
            .collect();
        (prosecutors.len() > 1)
            .then(|| {
                Problem::new(ProblemCode::GroupProsecutorMismatch).with_value(
                    "prosecutingAuthorities",
                    prosecutors.into_iter().collect::<Vec<_>>().join(","),
                )
            })
            .into()
    }

    fn priority(&self) -> u32 {
        80
    }
}

fn repeated<K: Hash + Eq>(keys: impl Iterator<Item = K>) -> Vec<K> {
    let mut seen: IndexMap<K, usize> = IndexMap::new();
    for key in keys {
        *seen.entry(key).or_default() += 1;
    }
    seen.into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect()
}

/// Case ids are unique within the group; members are stored under them
pub struct UniqueCaseIds;

impl ValidationRule<GroupProsecution, ValidationSettings> for UniqueCaseIds {
    fn name(&self) -> &str {
        "unique_case_ids"
    }

    fn validate(&self, group: &GroupProsecution, _: &ValidationSettings) -> ValidationResult {
        repeated(group.cases.iter().map(|m| m.prosecution.case_id()))
            .into_iter()
            .map(|case_id| {
                Problem::new(ProblemCode::GroupDuplicateCaseId).with_value("caseId", case_id)
            })
            .collect()
    }

    fn priority(&self) -> u32 {
        95
    }
}

/// Case references are unique within the group
pub struct UniqueCaseReferences;

impl ValidationRule<GroupProsecution, ValidationSettings> for UniqueCaseReferences {
    fn name(&self) -> &str {
        "unique_case_references"
    }

    fn validate(&self, group: &GroupProsecution, _: &ValidationSettings) -> ValidationResult {
        repeated(
            group
                .cases
                .iter()
                .map(|m| normalise(&m.prosecution.case_details.prosecutor_case_reference)),
        )
        .into_iter()
        .map(|reference| {
            Problem::new(ProblemCode::GroupDuplicateCaseReference)
                .with_value("prosecutorCaseReference", reference)
        })
        .collect()
    }
}

/// A group holds no more cases than configured
pub struct GroupSize;

impl ValidationRule<GroupProsecution, ValidationSettings> for GroupSize {
    fn name(&self) -> &str {
        "group_size"
    }

    fn validate(
        &self,
        group: &GroupProsecution,
        settings: &ValidationSettings,
    ) -> ValidationResult {
        let count = group.cases.len();
        (count > settings.group_max_cases)
            .then(|| {
                Problem::new(ProblemCode::GroupTooLarge)
                    .with_value("count", count)
                    .with_value("max", settings.group_max_cases)
            })
            .into()
    }
}
