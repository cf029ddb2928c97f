// Copyright 2025 Cowboy AI, LLC.

//! Validation of prosecution submissions
//!
//! A submission is enriched against a reference data snapshot, then checked by
//! the rule catalogue of its case type at three scopes: the case, each
//! defendant and each offence. Problems are collected into a
//! [`ValidationReport`] which decides whether the case is accepted, held for
//! correction or rejected.
//!
//! ```rust
//! use prosecution_casefile::validation::{
//!     Problem, ProblemCode, ProblemLevel, RuleSet, ValidationResult, FnRule,
//! };
//!
//! let rules: RuleSet<String, ()> = RuleSet::new().error(FnRule::new(
//!     "not_blank",
//!     |value: &String, _: &()| -> ValidationResult {
//!         value
//!             .trim()
//!             .is_empty()
//!             .then(|| Problem::new(ProblemCode::DefendantNameRequired))
//!             .into()
//!     },
//! ));
//!
//! let outcome = rules.evaluate(&" ".to_string(), &());
//! assert_eq!(outcome.problems[0].level, ProblemLevel::Error);
//! assert!(matches!(
//!     ValidationResult::from(None),
//!     ValidationResult::Valid
//! ));
//! ```

mod context;
mod pipeline;
mod problem;
mod provider;
mod report;
mod result;
mod rule;
pub mod rules;

pub use context::ValidationContext;
pub use pipeline::{ValidatedGroup, ValidatedProsecution, ValidationPipeline};
pub use problem::{LeveledProblem, Problem, ProblemCode, ProblemLevel, ProblemValue};
pub use provider::RuleProvider;
pub use report::{Decision, DefendantReport, GroupValidationReport, ValidationReport};
pub use result::ValidationResult;
pub use rule::{
    FnRule, RuleExt, RuleSet, RuleSetOutcome, ValidationRule, When, BLOCKING_PRIORITY,
    DEFAULT_PRIORITY,
};
