// Copyright 2025 Cowboy AI, LLC.

//! Read model projections for the case file
//!
//! Projections are read models kept up to date by handling case file events,
//! so queries never need to load aggregates.

mod case_status;

pub use case_status::{CaseErrorsView, CaseStatusProjection, CaseStatusView};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::command_handlers::CaseFileEventEnvelope;
use crate::errors::DomainResult;

/// Trait for all projections
#[async_trait]
pub trait Projection: Send + Sync {
    /// Handle a case file event to update the projection
    async fn handle_event(&mut self, event: &CaseFileEventEnvelope) -> DomainResult<()>;

    /// Get the current checkpoint (last processed event sequence)
    async fn get_checkpoint(&self) -> Option<EventSequence>;

    /// Save the checkpoint after processing events
    async fn save_checkpoint(&mut self, sequence: EventSequence) -> DomainResult<()>;

    /// Clear the projection (for rebuilding)
    async fn clear(&mut self) -> DomainResult<()>;
}

/// Event sequence number for checkpointing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventSequence(pub u64);

impl EventSequence {
    /// Create a new event sequence with the given value
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Get the current sequence value
    pub fn value(&self) -> u64 {
        self.0
    }
}
