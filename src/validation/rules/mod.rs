// Copyright 2025 Cowboy AI, LLC.

//! Rule catalogue
//!
//! One type per rule. Which rules run for a case type, and at which level, is
//! decided by [`RuleProvider`](crate::validation::RuleProvider).

pub mod case;
pub mod defendant;
pub mod group;
pub mod offence;
