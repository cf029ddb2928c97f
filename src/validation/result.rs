// Copyright 2025 Cowboy AI, LLC.

use serde::{Deserialize, Serialize};

use super::Problem;

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "result", content = "problems", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationResult {
    /// Rule passed
    #[default]
    Valid,
    /// Rule failed with at least one problem
    Invalid(Vec<Problem>),
}

impl ValidationResult {
    /// A passing result
    pub fn valid() -> Self {
        ValidationResult::Valid
    }

    /// A failing result with one problem
    pub fn invalid(problem: Problem) -> Self {
        ValidationResult::Invalid(vec![problem])
    }

    /// Whether the rule passed
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Problems raised, empty when valid
    pub fn problems(&self) -> &[Problem] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(problems) => problems,
        }
    }

    /// Take the problems
    pub fn into_problems(self) -> Vec<Problem> {
        match self {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid(problems) => problems,
        }
    }

    /// Combine two results, keeping the problems of both in order
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match (self, other) {
            (ValidationResult::Valid, other) => other,
            (this, ValidationResult::Valid) => this,
            (ValidationResult::Invalid(mut a), ValidationResult::Invalid(b)) => {
                a.extend(b);
                ValidationResult::Invalid(a)
            }
        }
    }
}

impl From<Option<Problem>> for ValidationResult {
    fn from(problem: Option<Problem>) -> Self {
        problem.map_or(ValidationResult::Valid, ValidationResult::invalid)
    }
}

impl FromIterator<Problem> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        let problems: Vec<Problem> = iter.into_iter().collect();
        if problems.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(problems)
        }
    }
}
