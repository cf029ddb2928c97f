// Copyright 2025 Cowboy AI, LLC.

//! Wiring of a self-contained case file service
//!
//! Loads configuration, reads reference data from the configured file behind an
//! LRU cache, and connects the pipeline, command handler, projection and query
//! handler over in-memory storage.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::case_file::ProsecutionCaseFile;
use crate::command_handlers::{CaseFileCommandHandler, InMemoryEventPublisher, InMemoryRepository};
use crate::config::{CaseFileConfig, REFERENCE_DATA_PATH_ENV_VAR};
use crate::errors::DomainResult;
use crate::projections::{CaseErrorsView, CaseStatusProjection, CaseStatusView};
use crate::query_handlers::{CaseFileQueryHandler, InMemoryReadModel};
use crate::reference_data::{CachedReferenceData, InMemoryReferenceData};
use crate::telemetry;
use crate::validation::ValidationPipeline;

/// Command handler over in-memory storage
pub type InMemoryCommandHandler =
    CaseFileCommandHandler<InMemoryRepository<ProsecutionCaseFile>, InMemoryEventPublisher>;

/// Query handler over the projection's read models
pub type InMemoryQueryHandler =
    CaseFileQueryHandler<InMemoryReadModel<CaseStatusView>, InMemoryReadModel<CaseErrorsView>>;

/// A case file service with every part connected
pub struct CaseFileService {
    config: CaseFileConfig,
    pipeline: Arc<ValidationPipeline>,
    commands: InMemoryCommandHandler,
    publisher: InMemoryEventPublisher,
    projection: CaseStatusProjection,
}

impl CaseFileService {
    /// Build the service from configuration with the reference data it names
    pub fn from_config(config: CaseFileConfig) -> Result<Self> {
        let path = config.reference_data.path.clone().with_context(|| {
            format!("no reference data file configured (set {REFERENCE_DATA_PATH_ENV_VAR})")
        })?;
        let reference_data = InMemoryReferenceData::from_file(&path)
            .with_context(|| format!("loading reference data from {}", path.display()))?;
        Ok(Self::with_reference_data(config, reference_data))
    }

    /// Build the service over already loaded reference data
    pub fn with_reference_data(
        config: CaseFileConfig,
        reference_data: InMemoryReferenceData,
    ) -> Self {
        let cached = CachedReferenceData::new(reference_data, config.reference_data.cache_capacity);
        let pipeline = Arc::new(ValidationPipeline::new(
            Arc::new(cached),
            config.validation.clone(),
        ));
        Self::with_pipeline(config, pipeline)
    }

    /// Build the service around a pipeline
    pub fn with_pipeline(config: CaseFileConfig, pipeline: Arc<ValidationPipeline>) -> Self {
        let publisher = InMemoryEventPublisher::new();
        let commands = CaseFileCommandHandler::new(
            Arc::clone(&pipeline),
            InMemoryRepository::new(),
            publisher.clone(),
        );
        Self {
            config,
            pipeline,
            commands,
            publisher,
            projection: CaseStatusProjection::new(),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &CaseFileConfig {
        &self.config
    }

    /// Validation pipeline
    pub fn pipeline(&self) -> &ValidationPipeline {
        &self.pipeline
    }

    /// Command side
    pub fn commands(&self) -> &InMemoryCommandHandler {
        &self.commands
    }

    /// Everything published so far
    pub fn publisher(&self) -> &InMemoryEventPublisher {
        &self.publisher
    }

    /// Project events published since the last refresh
    pub async fn refresh(&mut self) -> DomainResult<usize> {
        let log = self.publisher.published();
        self.projection.catch_up(&log).await
    }

    /// Query side over the projected read models
    pub fn queries(&self) -> InMemoryQueryHandler {
        CaseFileQueryHandler::new(self.projection.statuses(), self.projection.errors())
    }
}

/// Install tracing, load configuration and build the service
pub fn bootstrap(config_path: Option<&Path>) -> Result<CaseFileService> {
    telemetry::init_tracing();
    let config = CaseFileConfig::load(config_path).context("loading case file configuration")?;
    let service = CaseFileService::from_config(config)?;
    info!(
        cache_capacity = service.config.reference_data.cache_capacity,
        sjp_minimum_age = service.config.validation.sjp_minimum_age,
        "Case file service ready"
    );
    Ok(service)
}
