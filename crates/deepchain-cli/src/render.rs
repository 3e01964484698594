//! Shell texts and turn rendering

use deepchain_core::{DeepChainError, Locale, PipelineResult};
use deepchain_orchestrator::{ProgressEvent, ProgressObserver, TurnOutcome};

/// How a finished turn is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Localized shell labels
pub struct ShellText {
    pub input_prompt: &'static str,
    pub goodbye: &'static str,
    pub cycle: &'static str,
    pub intent: &'static str,
    pub prompt: &'static str,
    pub response: &'static str,
    pub final_answer: &'static str,
    pub analyzing_intent: &'static str,
    pub generating_prompt: &'static str,
    pub getting_response: &'static str,
    pub synthesizing: &'static str,
}

impl ShellText {
    pub fn for_locale(locale: Locale) -> &'static ShellText {
        match locale {
            Locale::English => &ENGLISH,
            Locale::Russian => &RUSSIAN,
        }
    }
}

static ENGLISH: ShellText = ShellText {
    input_prompt: "Enter text to create prompt (or 'exit' to quit): ",
    goodbye: "Terminating program.",
    cycle: "Cycle",
    intent: "Intent",
    prompt: "Prompt",
    response: "Response",
    final_answer: "Final synthesized answer:",
    analyzing_intent: "Analyzing intent...",
    generating_prompt: "Generating prompt...",
    getting_response: "Getting response...",
    synthesizing: "Synthesizing final answer...",
};

static RUSSIAN: ShellText = ShellText {
    input_prompt: "Введите текст для создания промпта (или 'выход' для завершения): ",
    goodbye: "Завершение работы.",
    cycle: "Цикл",
    intent: "Намерение",
    prompt: "Промпт",
    response: "Ответ",
    final_answer: "Финальный синтезированный ответ:",
    analyzing_intent: "Анализ намерения...",
    generating_prompt: "Генерация промпта...",
    getting_response: "Получение ответа...",
    synthesizing: "Синтез финального ответа...",
};

/// Startup banner
pub fn banner(model: &str) -> String {
    format!(
        "\nDeepChain Refinement LLM v{}:\n\
         Using chain-of-thought, multi-step prompting,\n\
         progressive refinement and response synthesis\n\
         Built on Ollama architecture. Powered by '{}'\n",
        env!("CARGO_PKG_VERSION"),
        model
    )
}

/// Render a finished turn for the terminal
pub fn render_outcome(outcome: &TurnOutcome, locale: Locale, format: OutputFormat) -> String {
    match outcome {
        TurnOutcome::Success(result) => render_result(result, locale, format),
        TurnOutcome::Failure(e) => render_failure(e, locale),
    }
}

/// Render a successful pipeline result
pub fn render_result(result: &PipelineResult, locale: Locale, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| render_failure(&DeepChainError::Serialization(e), locale));
    }

    if result.is_short_circuit() {
        return result.synthesis.clone();
    }

    let text = ShellText::for_locale(locale);
    let mut out = String::new();

    for (i, cycle) in result.cycles.iter().enumerate() {
        out.push_str(&format!("\n{} {}:\n", text.cycle, i + 1));
        out.push_str(&format!("{}: {}\n", text.intent, cycle.intent));
        out.push_str(&format!("{}: {}\n", text.prompt, cycle.prompt));
        out.push_str(&format!("{}: {}\n", text.response, cycle.response));
    }

    out.push_str(&format!("\n{}\n\n", text.final_answer));
    out.push_str(&result.synthesis);
    out
}

/// Render a turn-level failure as a user-facing message
pub fn render_failure(error: &DeepChainError, locale: Locale) -> String {
    match locale {
        Locale::English => format!("An error occurred: {}. Please try again.", error),
        Locale::Russian => format!(
            "Произошла ошибка: {}. Пожалуйста, попробуйте снова.",
            error
        ),
    }
}

/// Prints stage progress lines to stdout
pub struct ConsoleObserver {
    locale: Locale,
}

impl ConsoleObserver {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl ProgressObserver for ConsoleObserver {
    fn on_event(&self, event: &ProgressEvent<'_>) {
        let text = ShellText::for_locale(self.locale);
        match event {
            ProgressEvent::CycleStarted(cycle) => println!("\n{} {}:", text.cycle, cycle),
            ProgressEvent::AnalyzingIntent(_) => println!("{}", text.analyzing_intent),
            ProgressEvent::GeneratingPrompt(_) => println!("{}", text.generating_prompt),
            ProgressEvent::GeneratingResponse(_) => println!("{}", text.getting_response),
            ProgressEvent::Synthesizing => println!("\n{}", text.synthesizing),
            ProgressEvent::IntentReady(..)
            | ProgressEvent::PromptReady(..)
            | ProgressEvent::ResponseReady(..) => {}
        }
    }
}
