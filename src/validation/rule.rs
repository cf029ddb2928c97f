// Copyright 2025 Cowboy AI, LLC.

//! Validation rules and ordered rule sets
//!
//! A rule inspects a target `T` against a context `S` and either passes or
//! reports problems. Rules carry a priority; a [`RuleSet`] evaluates them from
//! the highest priority down and records each problem at the level the rule was
//! registered with. A failing error-level rule at or above
//! [`BLOCKING_PRIORITY`] stops the set.

use std::cmp::Reverse;
use std::fmt;
use tracing::trace;

use super::{LeveledProblem, ProblemLevel, ValidationResult};

/// Priority at and above which a failing error-level rule stops its set
pub const BLOCKING_PRIORITY: u32 = 90;

/// Default rule priority
pub const DEFAULT_PRIORITY: u32 = 50;

/// A business rule over `T` evaluated in context `S`
pub trait ValidationRule<T: ?Sized, S: ?Sized>: Send + Sync {
    /// Stable rule name, used in logs and on raised problems
    fn name(&self) -> &str;

    /// Evaluate the rule
    fn validate(&self, target: &T, context: &S) -> ValidationResult;

    /// Evaluation priority (higher runs first)
    fn priority(&self) -> u32 {
        DEFAULT_PRIORITY
    }
}

/// A rule made from a closure
pub struct FnRule<F> {
    name: String,
    priority: u32,
    check: F,
}

impl<F> FnRule<F> {
    /// Wrap a closure at the default priority
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            check,
        }
    }

    /// Change the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

impl<T, S, F> ValidationRule<T, S> for FnRule<F>
where
    T: ?Sized,
    S: ?Sized,
    F: Fn(&T, &S) -> ValidationResult + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, target: &T, context: &S) -> ValidationResult {
        (self.check)(target, context)
    }

    fn priority(&self) -> u32 {
        self.priority
    }
}

/// A rule that only applies when a predicate holds
pub struct When<R, P> {
    rule: R,
    predicate: P,
}

impl<T, S, R, P> ValidationRule<T, S> for When<R, P>
where
    T: ?Sized,
    S: ?Sized,
    R: ValidationRule<T, S>,
    P: Fn(&T, &S) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn validate(&self, target: &T, context: &S) -> ValidationResult {
        if (self.predicate)(target, context) {
            self.rule.validate(target, context)
        } else {
            ValidationResult::Valid
        }
    }

    fn priority(&self) -> u32 {
        self.rule.priority()
    }
}

/// Combinators available on every rule
pub trait RuleExt<T: ?Sized, S: ?Sized>: ValidationRule<T, S> + Sized {
    /// Apply the rule only when `predicate` holds
    fn when<P>(self, predicate: P) -> When<Self, P>
    where
        P: Fn(&T, &S) -> bool + Send + Sync,
    {
        When {
            rule: self,
            predicate,
        }
    }
}

impl<T: ?Sized, S: ?Sized, R: ValidationRule<T, S>> RuleExt<T, S> for R {}

struct Registration<T: ?Sized, S: ?Sized> {
    rule: Box<dyn ValidationRule<T, S>>,
    level: ProblemLevel,
}

/// Problems raised by one evaluation of a [`RuleSet`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetOutcome {
    /// Problems in evaluation order
    pub problems: Vec<LeveledProblem>,
    /// Name of the blocking rule that stopped evaluation
    pub blocked_by: Option<String>,
}

impl RuleSetOutcome {
    /// Whether a blocking rule stopped evaluation
    pub fn is_blocked(&self) -> bool {
        self.blocked_by.is_some()
    }

    /// Whether any error-level problem was raised
    pub fn has_errors(&self) -> bool {
        self.problems.iter().any(LeveledProblem::is_error)
    }
}

/// Rules over one target type, kept in evaluation order
pub struct RuleSet<T: ?Sized, S: ?Sized> {
    registrations: Vec<Registration<T, S>>,
}

impl<T: ?Sized, S: ?Sized> Default for RuleSet<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, S: ?Sized> fmt::Debug for RuleSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.registrations
                    .iter()
                    .map(|r| (r.rule.name(), r.rule.priority(), r.level)),
            )
            .finish()
    }
}

impl<T: ?Sized, S: ?Sized> RuleSet<T, S> {
    /// An empty set
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Register a rule whose problems are errors
    pub fn error<R>(self, rule: R) -> Self
    where
        R: ValidationRule<T, S> + 'static,
    {
        self.with(rule, ProblemLevel::Error)
    }

    /// Register a rule whose problems are warnings
    pub fn warning<R>(self, rule: R) -> Self
    where
        R: ValidationRule<T, S> + 'static,
    {
        self.with(rule, ProblemLevel::Warning)
    }

    /// Register a rule at a level
    pub fn with<R>(mut self, rule: R, level: ProblemLevel) -> Self
    where
        R: ValidationRule<T, S> + 'static,
    {
        self.register(Box::new(rule), level);
        self
    }

    /// Register a boxed rule at a level
    pub fn register(&mut self, rule: Box<dyn ValidationRule<T, S>>, level: ProblemLevel) {
        self.registrations.push(Registration { rule, level });
        // stable: equal priorities keep registration order
        self.registrations.sort_by_key(|r| Reverse(r.rule.priority()));
    }

    /// Append every rule of another set
    pub fn extend(mut self, other: RuleSet<T, S>) -> Self {
        for registration in other.registrations {
            self.register(registration.rule, registration.level);
        }
        self
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.registrations.iter().map(|r| r.rule.name()).collect()
    }

    /// Level a rule is registered at
    pub fn level_of(&self, name: &str) -> Option<ProblemLevel> {
        self.registrations
            .iter()
            .find(|r| r.rule.name() == name)
            .map(|r| r.level)
    }

    /// Evaluate every rule in order
    pub fn evaluate(&self, target: &T, context: &S) -> RuleSetOutcome {
        let mut outcome = RuleSetOutcome::default();

        for registration in &self.registrations {
            let rule = &registration.rule;
            let result = rule.validate(target, context);
            if result.is_valid() {
                continue;
            }

            trace!(
                rule = rule.name(),
                level = ?registration.level,
                problems = result.problems().len(),
                "Rule failed"
            );
            outcome
                .problems
                .extend(result.into_problems().into_iter().map(|problem| LeveledProblem {
                    level: registration.level,
                    rule: rule.name().to_string(),
                    problem,
                }));

            if registration.level == ProblemLevel::Error && rule.priority() >= BLOCKING_PRIORITY {
                outcome.blocked_by = Some(rule.name().to_string());
                break;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Problem, ProblemCode};
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn failing(
        name: &str,
        priority: u32,
        code: ProblemCode,
    ) -> FnRule<impl Fn(&u32, &()) -> ValidationResult> {
        FnRule::new(name, move |_: &u32, _: &()| {
            ValidationResult::invalid(Problem::new(code))
        })
        .with_priority(priority)
    }

    #[test]
    fn evaluates_by_descending_priority() {
        let rules = RuleSet::new()
            .error(failing("low", 10, ProblemCode::AddressRequired))
            .warning(failing("high", 80, ProblemCode::InvalidTitle))
            .error(failing("mid", 50, ProblemCode::InvalidPostcode));

        assert_eq!(rules.rule_names(), vec!["high", "mid", "low"]);
        let outcome = rules.evaluate(&0, &());
        assert_eq!(outcome.problems.len(), 3);
        assert_eq!(outcome.problems[0].level, ProblemLevel::Warning);
        assert!(!outcome.is_blocked());
    }

    #[test]
    fn blocking_error_stops_the_set() {
        let rules = RuleSet::new()
            .error(failing("after", 50, ProblemCode::AddressRequired))
            .error(failing("gate", 95, ProblemCode::ProsecutorNotFound));

        let outcome = rules.evaluate(&0, &());
        assert_eq!(outcome.blocked_by.as_deref(), Some("gate"));
        assert_eq!(outcome.problems.len(), 1);
    }

    #[test]
    fn high_priority_warning_does_not_block() {
        let rules = RuleSet::new()
            .warning(failing("loud", 95, ProblemCode::HearingDateInPast))
            .error(failing("after", 50, ProblemCode::AddressRequired));

        let outcome = rules.evaluate(&0, &());
        assert!(!outcome.is_blocked());
        assert_eq!(outcome.problems.len(), 2);
        assert!(outcome.has_errors());
    }

    #[test]
    fn when_skips_rule_if_predicate_fails() {
        let rule = failing("even_only", 50, ProblemCode::InvalidTitle)
            .when(|n: &u32, _: &()| n % 2 == 0);
        assert!(rule.validate(&1, &()).is_valid());
        assert!(!rule.validate(&2, &()).is_valid());
        assert_eq!(rule.name(), "even_only");
    }

    struct Recording {
        index: usize,
        priority: u32,
    }

    impl ValidationRule<(), Mutex<Vec<usize>>> for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn validate(&self, _: &(), seen: &Mutex<Vec<usize>>) -> ValidationResult {
            seen.lock().unwrap().push(self.index);
            ValidationResult::Valid
        }

        fn priority(&self) -> u32 {
            self.priority
        }
    }

    proptest! {
        #[test]
        fn order_is_priority_then_registration(priorities in prop::collection::vec(0u32..120, 0..24)) {
            let mut rules = RuleSet::new();
            for (index, priority) in priorities.iter().enumerate() {
                rules = rules.error(Recording { index, priority: *priority });
            }

            let seen = Mutex::new(Vec::new());
            let outcome = rules.evaluate(&(), &seen);
            prop_assert!(outcome.problems.is_empty());

            let order = seen.into_inner().unwrap();
            prop_assert_eq!(order.len(), priorities.len());
            for pair in order.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(
                    priorities[a] > priorities[b]
                        || (priorities[a] == priorities[b] && a < b)
                );
            }
        }
    }
}
