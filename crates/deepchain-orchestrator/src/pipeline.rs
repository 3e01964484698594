//! Pipeline controller - one user turn end to end
//!
//! Runs cycles 1, 2 and 3 strictly in order (cycle n + 1 never starts before
//! cycle n has finished), then synthesizes their responses. A cycle error
//! aborts the turn before synthesis; it never takes the session down.

use crate::cycle::CycleOrchestrator;
use crate::progress::{ProgressObserver, TracingObserver};
use crate::synthesis::SynthesisEngine;
use crate::templates::CycleTemplateCatalog;
use chrono::{Local, NaiveDate};
use deepchain_agent::GenerationService;
use deepchain_core::{
    CycleNumber, CycleResult, DeepChainConfig, DeepChainError, DegradePolicy, Locale,
    PipelineResult, Result,
};
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of one turn, as seen by the session shell
#[derive(Debug)]
pub enum TurnOutcome {
    Success(PipelineResult),
    Failure(DeepChainError),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<PipelineResult>> for TurnOutcome {
    fn from(result: Result<PipelineResult>) -> Self {
        match result {
            Ok(pipeline) => Self::Success(pipeline),
            Err(e) => Self::Failure(e),
        }
    }
}

/// Drives the three refinement cycles and the synthesis for each turn
pub struct PipelineController<S: GenerationService> {
    service: S,
    model: String,
    catalog: CycleTemplateCatalog,
    degrade: DegradePolicy,
    observer: Arc<dyn ProgressObserver>,
}

impl<S: GenerationService> PipelineController<S> {
    /// Create a controller that sends every request with `model`
    pub fn new(service: S, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
            catalog: CycleTemplateCatalog::default(),
            degrade: DegradePolicy::default(),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Create a controller from session configuration
    pub fn from_config(service: S, config: &DeepChainConfig) -> Self {
        Self::new(service, config.generation.model.clone())
            .with_locale(config.locale)
            .with_degrade(config.degrade)
    }

    /// Set the template locale
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.catalog = CycleTemplateCatalog::new(locale);
        self
    }

    /// Set the policy for response and synthesis failures
    pub fn with_degrade(mut self, degrade: DegradePolicy) -> Self {
        self.degrade = degrade;
        self
    }

    /// Send stage notifications to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Model identifier used for the whole session
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Locale of templates and messages
    pub fn locale(&self) -> Locale {
        self.catalog.locale()
    }

    /// Run one turn dated today
    pub async fn run(&self, query: &str) -> Result<PipelineResult> {
        self.run_on(query, Local::now().date_naive()).await
    }

    /// Run one turn with a fixed `current_date`
    ///
    /// The date is captured once and shared by all three cycles.
    pub async fn run_on(&self, query: &str, current_date: NaiveDate) -> Result<PipelineResult> {
        if query.trim().is_empty() {
            info!("Empty query, skipping pipeline");
            return Ok(PipelineResult::short_circuit(
                self.catalog.empty_query_message(),
            ));
        }

        info!("Starting pipeline for query ({} chars)", query.len());

        let cycles = self.run_cycles(query, current_date).await?;

        let synthesis = SynthesisEngine::new(&self.service, &self.model, self.catalog)
            .with_degrade(self.degrade)
            .with_observer(self.observer.as_ref())
            .synthesize(&cycles, query)
            .await?;

        info!("Pipeline complete ({} chars synthesized)", synthesis.len());

        Ok(PipelineResult {
            cycles: cycles.into(),
            synthesis,
        })
    }

    /// Run one turn, folding any error into the outcome
    pub async fn run_turn(&self, query: &str) -> TurnOutcome {
        let outcome = TurnOutcome::from(self.run(query).await);
        if let TurnOutcome::Failure(e) = &outcome {
            error!("Turn aborted: {}", e);
        }
        outcome
    }

    async fn run_cycles(&self, query: &str, current_date: NaiveDate) -> Result<[CycleResult; 3]> {
        let orchestrator = CycleOrchestrator::new(&self.service, &self.model, self.catalog)
            .with_degrade(self.degrade)
            .with_observer(self.observer.as_ref());

        let first = orchestrator
            .run_cycle(query, CycleNumber::First, current_date)
            .await?;
        let second = orchestrator
            .run_cycle(query, CycleNumber::Second, current_date)
            .await?;
        let third = orchestrator
            .run_cycle(query, CycleNumber::Third, current_date)
            .await?;

        Ok([first, second, third])
    }
}
