//! Stage progress notifications
//!
//! Observers are notification-only: they see every stage transition of a
//! turn but cannot influence or fail it.

use deepchain_core::CycleNumber;
use tracing::{debug, info};

/// A stage transition inside one turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
    CycleStarted(CycleNumber),
    AnalyzingIntent(CycleNumber),
    IntentReady(CycleNumber, &'a str),
    GeneratingPrompt(CycleNumber),
    PromptReady(CycleNumber, &'a str),
    GeneratingResponse(CycleNumber),
    ResponseReady(CycleNumber, &'a str),
    Synthesizing,
}

/// Receiver of progress notifications
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent<'_>);
}

/// Default observer: structured log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        match event {
            ProgressEvent::CycleStarted(cycle) => {
                info!("=== Cycle {} ({}) ===", cycle, cycle.depth())
            }
            ProgressEvent::AnalyzingIntent(cycle) => info!("Cycle {}: analyzing intent", cycle),
            ProgressEvent::IntentReady(cycle, intent) => {
                debug!("Cycle {} intent ({} chars)", cycle, intent.len())
            }
            ProgressEvent::GeneratingPrompt(cycle) => info!("Cycle {}: generating prompt", cycle),
            ProgressEvent::PromptReady(cycle, prompt) => {
                debug!("Cycle {} prompt: {}", cycle, prompt)
            }
            ProgressEvent::GeneratingResponse(cycle) => {
                info!("Cycle {}: generating response", cycle)
            }
            ProgressEvent::ResponseReady(cycle, response) => {
                debug!("Cycle {} response ({} chars)", cycle, response.len())
            }
            ProgressEvent::Synthesizing => info!("Synthesizing final answer"),
        }
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_event(&self, _event: &ProgressEvent<'_>) {}
}
