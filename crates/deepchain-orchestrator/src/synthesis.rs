//! Final answer synthesis
//!
//! Merges the three cycle responses into one structured answer. Sources are
//! always embedded in cycle order with fixed roles: cycle 1 is the basic
//! answer, cycle 2 the detailed answer, cycle 3 the complete analysis.

use crate::progress::{ProgressEvent, ProgressObserver, TracingObserver};
use crate::templates::CycleTemplateCatalog;
use deepchain_agent::GenerationService;
use deepchain_core::degrade::degrade_on_failure;
use deepchain_core::{CycleNumber, CycleResult, DegradePolicy, Locale, Result, Stage};
use tracing::instrument;

static DEFAULT_OBSERVER: TracingObserver = TracingObserver;

/// Builds synthesis requests and collects the final answer
pub struct SynthesisEngine<'a, S: GenerationService + ?Sized> {
    service: &'a S,
    model: &'a str,
    catalog: CycleTemplateCatalog,
    degrade: DegradePolicy,
    observer: &'a dyn ProgressObserver,
}

impl<'a, S: GenerationService + ?Sized> SynthesisEngine<'a, S> {
    pub fn new(service: &'a S, model: &'a str, catalog: CycleTemplateCatalog) -> Self {
        Self {
            service,
            model,
            catalog,
            degrade: DegradePolicy::default(),
            observer: &DEFAULT_OBSERVER,
        }
    }

    pub fn with_degrade(mut self, degrade: DegradePolicy) -> Self {
        self.degrade = degrade;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Synthesize the final answer from all three cycles
    ///
    /// With the default policy a backend failure does not raise: the
    /// returned text is a visible error placeholder instead.
    #[instrument(skip_all)]
    pub async fn synthesize(
        &self,
        cycles: &[CycleResult; 3],
        original_query: &str,
    ) -> Result<String> {
        self.observer.on_event(&ProgressEvent::Synthesizing);

        let request = build_synthesis_request(self.catalog.locale(), cycles, original_query);
        tracing::debug!("Synthesis request length: {} chars", request.len());

        degrade_on_failure(
            Stage::Synthesis,
            self.degrade,
            |message| self.catalog.synthesis_error(message),
            || async {
                self.service
                    .generate(self.model, &request)
                    .await
                    .map(|text| text.trim().to_string())
            },
        )
        .await
    }
}

/// Role label of a cycle's response inside the synthesis request
pub fn source_label(locale: Locale, cycle: CycleNumber) -> &'static str {
    match (locale, cycle) {
        (Locale::English, CycleNumber::First) => "Basic answer",
        (Locale::English, CycleNumber::Second) => "Detailed answer",
        (Locale::English, CycleNumber::Third) => "Complete analysis",
        (Locale::Russian, CycleNumber::First) => "Базовый ответ",
        (Locale::Russian, CycleNumber::Second) => "Развёрнутый ответ",
        (Locale::Russian, CycleNumber::Third) => "Полный анализ",
    }
}

/// Build the synthesis request for `cycles` (index i = cycle i + 1)
pub fn build_synthesis_request(
    locale: Locale,
    cycles: &[CycleResult; 3],
    original_query: &str,
) -> String {
    let text = SynthesisText::for_locale(locale);
    let mut request = String::new();

    request.push_str(&format!("{} \"{}\"\n\n", text.intro, original_query));
    request.push_str(text.rules);
    request.push_str("\n\n");

    request.push_str(text.sources_header);
    request.push_str("\n---\n");
    for (cycle, result) in CycleNumber::ALL.iter().zip(cycles.iter()) {
        request.push_str(&format!("{}:\n", source_label(locale, *cycle)));
        request.push_str(&result.response);
        request.push_str("\n---\n");
    }
    request.push('\n');

    request.push_str(text.requirements);
    request.push_str("\n\n");
    request.push_str(text.no_meta);

    request
}

/// Fixed texts of one synthesis request locale
struct SynthesisText {
    intro: &'static str,
    rules: &'static str,
    sources_header: &'static str,
    requirements: &'static str,
    no_meta: &'static str,
}

impl SynthesisText {
    fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::English => Self {
                intro: "Based on the provided information, create a complete but well-structured \
                        response to the user's question:",
                rules: "Answer creation rules:\n\
                        1. Start with a brief, direct answer to the question (main figures/facts)\n\
                        2. Structure information by sections:\n   \
                           - Basic information\n   \
                           - Chronology and evolution\n     \
                             * Early period\n     \
                             * Development period\n     \
                             * Modern stage\n   \
                           - Significant works and achievements\n   \
                           - Impact and significance\n   \
                           - Interesting facts and details\n\
                        3. Provide detailed information in each section\n\
                        4. Use subheadings for better navigation\n\
                        5. Include all significant aspects from provided sources",
                sources_header: "Information from sources:",
                requirements: "Answer requirements:\n\
                               - Use markdown formatting for better readability\n\
                               - Preserve all important information from sources\n\
                               - Organize information logically\n\
                               - Use lists and subheadings\n\
                               - Highlight key points",
                no_meta: "Don't mention the analysis process or information sources - \
                          just provide a complete, well-organized answer.",
            },
            Locale::Russian => Self {
                intro: "На основе предоставленной информации создай полный, но хорошо \
                        структурированный ответ на вопрос пользователя:",
                rules: "Правила создания ответа:\n\
                        1. Начни с краткого, прямого ответа на вопрос (основные цифры/факты)\n\
                        2. Структурируй информацию по разделам:\n   \
                           - Основная информация\n   \
                           - Хронология и эволюция\n     \
                             * Ранний период\n     \
                             * Период развития\n     \
                             * Современный этап\n   \
                           - Значимые работы и достижения\n   \
                           - Влияние и значение\n   \
                           - Интересные факты и детали\n\
                        3. В каждом разделе предоставь детальную информацию\n\
                        4. Используй подзаголовки для лучшей навигации\n\
                        5. Включи все значимые аспекты из предоставленных источников",
                sources_header: "Информация из источников:",
                requirements: "Требования к ответу:\n\
                               - Используй форматирование markdown для лучшей читаемости\n\
                               - Сохраняй всю важную информацию из источников\n\
                               - Организуй информацию логически\n\
                               - Используй списки и подзаголовки\n\
                               - Выделяй ключевые моменты",
                no_meta: "Не упоминай о процессе анализа или источниках информации - \
                          просто предоставь полный, хорошо организованный ответ.",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deepchain_core::DeepChainError;
    use std::sync::Mutex;

    struct FixedService {
        reply: Result<String>,
        requests: Mutex<Vec<String>>,
    }

    impl FixedService {
        fn replying(reply: Result<String>) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationService for FixedService {
        async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
            self.requests.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(DeepChainError::Service(e.to_string())),
            }
        }
    }

    fn cycles() -> [CycleResult; 3] {
        [1, 2, 3].map(|n| CycleResult {
            intent: format!("intent-{}", n),
            prompt: "prompt one two three".to_string(),
            response: format!("response-{}", n),
        })
    }

    #[test]
    fn test_request_orders_sources_by_depth() {
        let request = build_synthesis_request(Locale::English, &cycles(), "history of jazz");

        assert!(request.contains("user's question: \"history of jazz\""));
        let basic = request.find("Basic answer:\nresponse-1").unwrap();
        let detailed = request.find("Detailed answer:\nresponse-2").unwrap();
        let complete = request.find("Complete analysis:\nresponse-3").unwrap();
        assert!(basic < detailed && detailed < complete);
    }

    #[test]
    fn test_request_sections_and_meta_suppression() {
        let request = build_synthesis_request(Locale::English, &cycles(), "q");
        assert!(request.contains("Start with a brief, direct answer"));
        assert!(request.contains("- Basic information"));
        assert!(request.contains("* Early period"));
        assert!(request.contains("* Development period"));
        assert!(request.contains("* Modern stage"));
        assert!(request.contains("- Significant works and achievements"));
        assert!(request.contains("- Impact and significance"));
        assert!(request.contains("- Interesting facts and details"));
        assert!(request.contains("Preserve all important information"));
        assert!(request.ends_with("just provide a complete, well-organized answer."));
    }

    #[test]
    fn test_russian_request_labels() {
        let request = build_synthesis_request(Locale::Russian, &cycles(), "история джаза");
        assert!(request.contains("вопрос пользователя: \"история джаза\""));
        assert!(request.contains("Базовый ответ:\nresponse-1"));
        assert!(request.contains("Полный анализ:\nresponse-3"));
    }

    #[tokio::test]
    async fn test_synthesize_trims_output() {
        let service = FixedService::replying(Ok("\n# Jazz\n\nAnswer body\n  ".to_string()));
        let engine = SynthesisEngine::new(&service, "gemma2:9b", CycleTemplateCatalog::default());
        let text = engine.synthesize(&cycles(), "q").await.unwrap();
        assert_eq!(text, "# Jazz\n\nAnswer body");
        assert_eq!(service.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_synthesize_failure_degrades() {
        let service = FixedService::replying(Err(DeepChainError::Service("boom".to_string())));
        let engine = SynthesisEngine::new(&service, "gemma2:9b", CycleTemplateCatalog::default());
        let text = engine.synthesize(&cycles(), "q").await.unwrap();
        assert!(text.starts_with("Error synthesizing final answer: "));
        assert!(text.contains("boom"));
    }

    #[tokio::test]
    async fn test_synthesize_failure_aborts_under_strict_policy() {
        let service = FixedService::replying(Ok(String::new()));
        let engine = SynthesisEngine::new(&service, "gemma2:9b", CycleTemplateCatalog::default())
            .with_degrade(DegradePolicy::Abort);
        let err = engine.synthesize(&cycles(), "q").await.unwrap_err();
        assert!(matches!(err, DeepChainError::EmptyResult(Stage::Synthesis)));
    }
}
