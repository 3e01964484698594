//! One refinement cycle: intent -> prompt -> response
//!
//! Strict sequence, no internal retries:
//! 1. Analyze intent (empty or failed -> `EmptyResult(Intent)`)
//! 2. Generate a prompt (empty or failed -> `EmptyResult(Prompt)`)
//! 3. Normalize the prompt
//! 4. Validate it (fewer than three words -> `InvalidPrompt`)
//! 5. Generate the response; failures follow the degrade policy

use crate::postprocess::normalize;
use crate::progress::{ProgressEvent, ProgressObserver, TracingObserver};
use crate::templates::CycleTemplateCatalog;
use crate::validator::is_valid;
use chrono::NaiveDate;
use deepchain_agent::GenerationService;
use deepchain_core::degrade::degrade_on_failure;
use deepchain_core::{CycleNumber, CycleResult, DeepChainError, DegradePolicy, Result, Stage};
use tracing::{instrument, warn};

static DEFAULT_OBSERVER: TracingObserver = TracingObserver;

/// Runs single cycles against a generation service
pub struct CycleOrchestrator<'a, S: GenerationService + ?Sized> {
    service: &'a S,
    model: &'a str,
    catalog: CycleTemplateCatalog,
    degrade: DegradePolicy,
    observer: &'a dyn ProgressObserver,
}

impl<'a, S: GenerationService + ?Sized> CycleOrchestrator<'a, S> {
    /// Create an orchestrator using `model` for every call
    pub fn new(service: &'a S, model: &'a str, catalog: CycleTemplateCatalog) -> Self {
        Self {
            service,
            model,
            catalog,
            degrade: DegradePolicy::default(),
            observer: &DEFAULT_OBSERVER,
        }
    }

    /// Set the response-stage degrade policy
    pub fn with_degrade(mut self, degrade: DegradePolicy) -> Self {
        self.degrade = degrade;
        self
    }

    /// Send stage notifications to `observer`
    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Run one complete cycle
    #[instrument(skip_all, fields(cycle = %cycle))]
    pub async fn run_cycle(
        &self,
        query: &str,
        cycle: CycleNumber,
        current_date: NaiveDate,
    ) -> Result<CycleResult> {
        self.observer.on_event(&ProgressEvent::CycleStarted(cycle));

        self.observer.on_event(&ProgressEvent::AnalyzingIntent(cycle));
        let intent = self
            .generate_required(Stage::Intent, &self.catalog.analyze_intent(query, cycle))
            .await?;
        self.observer.on_event(&ProgressEvent::IntentReady(cycle, &intent));

        self.observer.on_event(&ProgressEvent::GeneratingPrompt(cycle));
        let raw_prompt = self
            .generate_required(
                Stage::Prompt,
                &self
                    .catalog
                    .generate_prompt(query, &intent, cycle, current_date),
            )
            .await?;

        let prompt = normalize(&raw_prompt);
        if !is_valid(&prompt) {
            warn!("Cycle {} produced an unusable prompt: {:?}", cycle, prompt);
            return Err(DeepChainError::InvalidPrompt(prompt));
        }
        self.observer.on_event(&ProgressEvent::PromptReady(cycle, &prompt));

        self.observer.on_event(&ProgressEvent::GeneratingResponse(cycle));
        let request = self.catalog.response_request(cycle, &prompt);
        let response = degrade_on_failure(
            Stage::Response,
            self.degrade,
            |message| self.catalog.response_error(message),
            || async {
                self.service
                    .generate(self.model, &request)
                    .await
                    .map(|text| text.trim().to_string())
            },
        )
        .await?;
        self.observer.on_event(&ProgressEvent::ResponseReady(cycle, &response));

        Ok(CycleResult {
            intent,
            prompt,
            response,
        })
    }

    /// Generate text for a stage that must not come back empty
    ///
    /// A service failure is logged and reported as an empty result for the
    /// stage: the turn aborts either way.
    async fn generate_required(&self, stage: Stage, prompt: &str) -> Result<String> {
        match self.service.generate(self.model, prompt).await {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                warn!("{} stage returned empty text", stage);
                Err(DeepChainError::EmptyResult(stage))
            }
            Err(e) => {
                warn!("{} stage failed: {}", stage, e);
                Err(DeepChainError::EmptyResult(stage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deepchain_core::Locale;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns scripted replies in order and records every prompt
    struct ScriptedService {
        replies: Mutex<VecDeque<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedService {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedService {
        async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(DeepChainError::Service("script exhausted".to_string())))
        }
    }

    fn ok(text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn orchestrator(service: &ScriptedService) -> CycleOrchestrator<'_, ScriptedService> {
        CycleOrchestrator::new(service, "gemma2:9b", CycleTemplateCatalog::new(Locale::English))
    }

    #[tokio::test]
    async fn test_successful_cycle() {
        let service = ScriptedService::new(vec![
            ok("  Understand how jazz evolved  "),
            ok("\"Prompt: Describe the\n history of jazz\""),
            ok("Jazz emerged in New Orleans.\n"),
        ]);

        let result = orchestrator(&service)
            .run_cycle("history of jazz", CycleNumber::Second, date())
            .await
            .unwrap();

        assert_eq!(result.intent, "Understand how jazz evolved");
        assert_eq!(result.prompt, "Describe the history of jazz");
        assert_eq!(result.response, "Jazz emerged in New Orleans.");

        let prompts = service.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("expert's perspective"));
        assert!(prompts[1].contains("Intent: Understand how jazz evolved"));
        assert!(prompts[1].contains("Date: 2024-05-01"));
        assert_eq!(
            prompts[2],
            "Provide a detailed response with explanations.\n\nDescribe the history of jazz"
        );
    }

    #[tokio::test]
    async fn test_empty_intent_aborts() {
        let service = ScriptedService::new(vec![ok("   ")]);
        let err = orchestrator(&service)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap_err();
        assert!(matches!(err, DeepChainError::EmptyResult(Stage::Intent)));
        assert_eq!(service.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_intent_service_failure_is_empty_result() {
        let service = ScriptedService::new(vec![Err(DeepChainError::Service(
            "connection refused".to_string(),
        ))]);
        let err = orchestrator(&service)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap_err();
        assert!(matches!(err, DeepChainError::EmptyResult(Stage::Intent)));
    }

    #[tokio::test]
    async fn test_empty_prompt_aborts() {
        let service = ScriptedService::new(vec![ok("intent"), ok("")]);
        let err = orchestrator(&service)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap_err();
        assert!(matches!(err, DeepChainError::EmptyResult(Stage::Prompt)));
        assert_eq!(service.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_short_prompt_is_invalid() {
        let service = ScriptedService::new(vec![ok("intent"), ok("\"Prompt: jazz history\"")]);
        let err = orchestrator(&service)
            .run_cycle("q", CycleNumber::Third, date())
            .await
            .unwrap_err();
        match err {
            DeepChainError::InvalidPrompt(prompt) => assert_eq!(prompt, "jazz history"),
            other => panic!("expected invalid prompt, got {:?}", other),
        }
        // No response call after a rejected prompt
        assert_eq!(service.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_response_failure_degrades_to_text() {
        let service = ScriptedService::new(vec![
            ok("intent"),
            ok("prompt one two three"),
            Err(DeepChainError::Service("model unloaded".to_string())),
        ]);
        let result = orchestrator(&service)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap();
        assert!(result
            .response
            .starts_with("Error getting response from model: "));
        assert!(result.response.contains("model unloaded"));
    }

    #[tokio::test]
    async fn test_empty_response_degrades_to_text() {
        let service = ScriptedService::new(vec![ok("intent"), ok("prompt one two three"), ok("")]);
        let result = orchestrator(&service)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap();
        assert!(result
            .response
            .starts_with("Error getting response from model: "));
    }

    #[tokio::test]
    async fn test_response_failure_aborts_under_strict_policy() {
        let service = ScriptedService::new(vec![
            ok("intent"),
            ok("prompt one two three"),
            Err(DeepChainError::Service("model unloaded".to_string())),
        ]);
        let err = orchestrator(&service)
            .with_degrade(DegradePolicy::Abort)
            .run_cycle("q", CycleNumber::First, date())
            .await
            .unwrap_err();
        assert!(matches!(err, DeepChainError::Service(_)));
    }
}
