// Copyright 2025 Cowboy AI, LLC.

//! Query handlers for the case file
//!
//! Query handlers answer from the read models kept by
//! [`CaseStatusProjection`](crate::projections::CaseStatusProjection). They
//! implement the read side of CQRS and never touch aggregates.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::cqrs::{Query, QueryEnvelope};
use crate::errors::{DomainError, DomainResult};
use crate::model::{CaseId, CaseType};
use crate::projections::{CaseErrorsView, CaseStatusView};
use crate::reference_data::normalise;

/// Query result type
pub type QueryResult<T> = DomainResult<T>;

/// Query handler that returns data directly
pub trait DirectQueryHandler<Q: Query, R> {
    /// Handle the query and return the result
    fn handle(&self, envelope: &QueryEnvelope<Q>) -> QueryResult<R>;
}

/// Read model storage trait
pub trait ReadModelStorage<T>: Send + Sync {
    /// Get an item by ID
    fn get(&self, id: &str) -> Option<T>;

    /// Query items by criteria
    fn query(&self, criteria: &QueryCriteria) -> Vec<T>;

    /// Get all items
    fn all(&self) -> Vec<T>;
}

/// Query criteria for filtering
///
/// Filters compare top-level fields of an item's JSON form for equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryCriteria {
    /// Filter conditions as key-value pairs
    pub filters: IndexMap<String, Value>,
    /// Maximum number of results to return
    pub limit: Option<usize>,
}

impl QueryCriteria {
    /// Create a new empty query criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter condition
    pub fn with_filter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.filters.insert(key.into(), value);
        self
    }

    /// Set the result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, item: &Value) -> bool {
        self.filters
            .iter()
            .all(|(key, expected)| item.get(key) == Some(expected))
    }
}

/// In-memory read model storage, in insertion order
#[derive(Clone)]
pub struct InMemoryReadModel<T: Clone> {
    storage: Arc<RwLock<IndexMap<String, T>>>,
}

impl<T: Clone> Default for InMemoryReadModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> InMemoryReadModel<T> {
    /// Create a new in-memory read model
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Insert or replace an item
    pub fn insert(&self, id: String, item: T) {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, item);
    }

    /// Remove every item
    pub fn clear(&self) {
        self.storage
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T: Clone + Serialize + Send + Sync> ReadModelStorage<T> for InMemoryReadModel<T> {
    fn get(&self, id: &str) -> Option<T> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn query(&self, criteria: &QueryCriteria) -> Vec<T> {
        let storage = self.storage.read().unwrap_or_else(PoisonError::into_inner);
        let matching = storage.values().filter(|item| {
            serde_json::to_value(item)
                .map(|json| criteria.matches(&json))
                .unwrap_or(false)
        });
        match criteria.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        }
    }

    fn all(&self) -> Vec<T> {
        self.storage
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// Status of one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCaseStatus {
    /// Case
    pub case_id: CaseId,
}

impl Query for GetCaseStatus {}

/// Outstanding problems of one case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCaseErrors {
    /// Case
    pub case_id: CaseId,
}

impl Query for GetCaseErrors {}

/// Case with a given URN
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCaseByReference {
    /// URN, matched after normalising
    pub prosecutor_case_reference: String,
}

impl Query for FindCaseByReference {}

/// Cases with outstanding errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindCasesWithErrors {
    /// Only cases of this prosecuting authority
    pub prosecuting_authority: Option<String>,
    /// Only cases of this type
    pub case_type: Option<CaseType>,
    /// At most this many cases
    pub limit: Option<usize>,
}

impl Query for FindCasesWithErrors {}

/// Answers case file queries from the projected read models
pub struct CaseFileQueryHandler<S, E> {
    statuses: S,
    errors: E,
}

impl<S, E> CaseFileQueryHandler<S, E>
where
    S: ReadModelStorage<CaseStatusView>,
    E: ReadModelStorage<CaseErrorsView>,
{
    /// Create a handler over the two read models
    pub fn new(statuses: S, errors: E) -> Self {
        Self { statuses, errors }
    }
}

impl<S, E> DirectQueryHandler<GetCaseStatus, CaseStatusView> for CaseFileQueryHandler<S, E>
where
    S: ReadModelStorage<CaseStatusView>,
    E: ReadModelStorage<CaseErrorsView>,
{
    fn handle(&self, envelope: &QueryEnvelope<GetCaseStatus>) -> QueryResult<CaseStatusView> {
        let case_id = envelope.query.case_id;
        self.statuses
            .get(&case_id.to_string())
            .ok_or_else(|| DomainError::CaseNotFound(case_id.to_string()))
    }
}

impl<S, E> DirectQueryHandler<GetCaseErrors, CaseErrorsView> for CaseFileQueryHandler<S, E>
where
    S: ReadModelStorage<CaseStatusView>,
    E: ReadModelStorage<CaseErrorsView>,
{
    fn handle(&self, envelope: &QueryEnvelope<GetCaseErrors>) -> QueryResult<CaseErrorsView> {
        let case_id = envelope.query.case_id;
        self.errors
            .get(&case_id.to_string())
            .ok_or_else(|| DomainError::CaseNotFound(case_id.to_string()))
    }
}

impl<S, E> DirectQueryHandler<FindCaseByReference, Option<CaseStatusView>>
    for CaseFileQueryHandler<S, E>
where
    S: ReadModelStorage<CaseStatusView>,
    E: ReadModelStorage<CaseErrorsView>,
{
    fn handle(
        &self,
        envelope: &QueryEnvelope<FindCaseByReference>,
    ) -> QueryResult<Option<CaseStatusView>> {
        let reference = normalise(&envelope.query.prosecutor_case_reference);
        let criteria = QueryCriteria::new()
            .with_filter("prosecutorCaseReference", Value::String(reference))
            .with_limit(1);
        Ok(self.statuses.query(&criteria).into_iter().next())
    }
}

impl<S, E> DirectQueryHandler<FindCasesWithErrors, Vec<CaseStatusView>>
    for CaseFileQueryHandler<S, E>
where
    S: ReadModelStorage<CaseStatusView>,
    E: ReadModelStorage<CaseErrorsView>,
{
    fn handle(
        &self,
        envelope: &QueryEnvelope<FindCasesWithErrors>,
    ) -> QueryResult<Vec<CaseStatusView>> {
        let query = &envelope.query;
        let mut criteria = QueryCriteria::new();
        if let Some(authority) = &query.prosecuting_authority {
            criteria = criteria
                .with_filter("prosecutingAuthority", Value::String(normalise(authority)));
        }
        if let Some(case_type) = query.case_type {
            criteria = criteria.with_filter("caseType", serde_json::to_value(case_type)?);
        }

        let found: Vec<CaseStatusView> = self
            .statuses
            .query(&criteria)
            .into_iter()
            .filter(|view| view.error_count > 0)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();
        debug!(
            issued_by = %envelope.issued_by,
            found = found.len(),
            "Cases with errors found"
        );
        Ok(found)
    }
}
