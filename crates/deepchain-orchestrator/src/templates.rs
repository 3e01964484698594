//! Per-cycle prompt templates
//!
//! Each cycle has three fixed texts: the intent-analysis request, the
//! prompt-generation request and the instruction prefixed to the final
//! prompt. Cycle 1 asks for a direct answer, cycle 2 for an expert and
//! explained one, cycle 3 for a complete analysis with examples and context.
//!
//! All functions here are pure string construction over closed enums.

use chrono::NaiveDate;
use deepchain_core::{CycleNumber, Locale};

/// Template catalog for one locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleTemplateCatalog {
    locale: Locale,
}

impl CycleTemplateCatalog {
    /// Create a catalog for the given locale
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Locale of every text this catalog produces
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Request asking the backend to formulate the user's intent
    pub fn analyze_intent(&self, query: &str, cycle: CycleNumber) -> String {
        let (user_text, answer_label) = match self.locale {
            Locale::English => ("User text", intent_label_en(cycle)),
            Locale::Russian => ("Текст пользователя", intent_label_ru(cycle)),
        };

        format!(
            "{}\n\n{}: {}\n{}:",
            self.intent_instructions(cycle),
            user_text,
            query,
            answer_label
        )
    }

    /// Request asking the backend to write a prompt for the final answer
    pub fn generate_prompt(
        &self,
        query: &str,
        intent: &str,
        cycle: CycleNumber,
        current_date: NaiveDate,
    ) -> String {
        let (text, intent_label, date, generate) = match self.locale {
            Locale::English => ("Text", "Intent", "Date", "Generate prompt"),
            Locale::Russian => ("Текст", "Намерение", "Дата", "Сгенерируй промпт"),
        };

        format!(
            "{}\n\n{}: {}\n{}: {}\n{}: {}\n\n{}:",
            self.prompt_instructions(cycle),
            text,
            query,
            intent_label,
            intent,
            date,
            current_date.format("%Y-%m-%d"),
            generate
        )
    }

    /// Instruction placed in front of the generated prompt
    pub fn response_prefix(&self, cycle: CycleNumber) -> &'static str {
        match (self.locale, cycle) {
            (Locale::English, CycleNumber::First) => {
                "Provide a direct and concise answer to the question."
            }
            (Locale::English, CycleNumber::Second) => {
                "Provide a detailed response with explanations."
            }
            (Locale::English, CycleNumber::Third) => {
                "Create a complete topic analysis with examples and context."
            }
            (Locale::Russian, CycleNumber::First) => "Дай прямой и краткий ответ на вопрос.",
            (Locale::Russian, CycleNumber::Second) => {
                "Предоставь развёрнутый ответ с пояснениями."
            }
            (Locale::Russian, CycleNumber::Third) => {
                "Создай полный анализ темы с примерами и контекстом."
            }
        }
    }

    /// Full response-stage request: prefix, blank line, prompt
    pub fn response_request(&self, cycle: CycleNumber, prompt: &str) -> String {
        format!("{}\n\n{}", self.response_prefix(cycle), prompt)
    }

    /// Message returned for an empty query
    pub fn empty_query_message(&self) -> &'static str {
        match self.locale {
            Locale::English => "Please enter text for prompt creation.",
            Locale::Russian => "Пожалуйста, введите текст для создания промпта.",
        }
    }

    /// Placeholder used when the response stage degrades
    pub fn response_error(&self, message: &str) -> String {
        match self.locale {
            Locale::English => format!("Error getting response from model: {}", message),
            Locale::Russian => format!("Ошибка при получении ответа от модели: {}", message),
        }
    }

    /// Placeholder used when the synthesis stage degrades
    pub fn synthesis_error(&self, message: &str) -> String {
        match self.locale {
            Locale::English => format!("Error synthesizing final answer: {}", message),
            Locale::Russian => format!("Ошибка при синтезе финального ответа: {}", message),
        }
    }

    fn intent_instructions(&self, cycle: CycleNumber) -> &'static str {
        match (self.locale, cycle) {
            (Locale::English, CycleNumber::First) => {
                "Analyze the user's text and determine their main intent.\n\
                 Focus on the basic goal of the request.\n\
                 \n\
                 Main steps:\n\
                 1. Find key words\n\
                 2. Determine request type (informational, analytical, creative)\n\
                 3. Determine main topic\n\
                 4. Formulate goal in one sentence\n\
                 \n\
                 Don't repeat the request text, create a new intent formulation."
            }
            (Locale::English, CycleNumber::Second) => {
                "Consider the following user text from an expert's perspective\n\
                 and determine the deeper intent of the request.\n\
                 \n\
                 In analysis consider:\n\
                 1. Request context\n\
                 2. Possible implicit goals\n\
                 3. Expected response format\n\
                 4. Level of detail\n\
                 5. Potential related interests\n\
                 \n\
                 Formulate intent differently than in the explicit request."
            }
            (Locale::English, CycleNumber::Third) => {
                "Conduct a comprehensive analysis of the user's request.\n\
                 Determine the broadest possible context of the request.\n\
                 \n\
                 Consider:\n\
                 1. Explicit and implicit goals\n\
                 2. Possible request prerequisites\n\
                 3. Related topics\n\
                 4. Potential follow-up questions\n\
                 5. Practical application of information\n\
                 \n\
                 Provide an expanded interpretation of user intent."
            }
            (Locale::Russian, CycleNumber::First) => {
                "Проанализируй текст пользователя и определи его основное намерение.\n\
                 Фокусируйся на базовой цели запроса.\n\
                 \n\
                 Основные шаги:\n\
                 1. Найди ключевые слова\n\
                 2. Определи тип запроса (информационный, аналитический, творческий)\n\
                 3. Определи основную тему\n\
                 4. Сформулируй цель одним предложением\n\
                 \n\
                 Не повторяй текст запроса, создай новую формулировку намерения."
            }
            (Locale::Russian, CycleNumber::Second) => {
                "Рассмотри следующий текст пользователя с точки зрения эксперта\n\
                 и определи глубинное намерение запроса.\n\
                 \n\
                 При анализе учитывай:\n\
                 1. Контекст запроса\n\
                 2. Возможные неявные цели\n\
                 3. Ожидаемый формат ответа\n\
                 4. Уровень детализации\n\
                 5. Потенциальные смежные интересы\n\
                 \n\
                 Сформулируй намерение иначе, чем в явном запросе."
            }
            (Locale::Russian, CycleNumber::Third) => {
                "Проведи комплексный анализ запроса пользователя.\n\
                 Определи максимально широкий контекст запроса.\n\
                 \n\
                 Рассмотри:\n\
                 1. Явные и неявные цели\n\
                 2. Возможные предпосылки запроса\n\
                 3. Сопутствующие темы\n\
                 4. Потенциальные последующие вопросы\n\
                 5. Практическое применение информации\n\
                 \n\
                 Дай расширенную интерпретацию намерения пользователя."
            }
        }
    }

    fn prompt_instructions(&self, cycle: CycleNumber) -> &'static str {
        match (self.locale, cycle) {
            (Locale::English, CycleNumber::First) => {
                "Create a basic prompt to get a direct answer to the user's request.\n\
                 \n\
                 Rules:\n\
                 1. Clear formulation of the main question\n\
                 2. Specification of desired response format\n\
                 3. Minimum necessary clarifications"
            }
            (Locale::English, CycleNumber::Second) => {
                "Create a detailed prompt to get an elaborate response.\n\
                 \n\
                 Requirements:\n\
                 1. Information structuring\n\
                 2. Request for additional context\n\
                 3. Clarification of related aspects\n\
                 4. Indication of need for explanations"
            }
            (Locale::English, CycleNumber::Third) => {
                "Create a comprehensive prompt for complete topic analysis.\n\
                 \n\
                 Include requirements:\n\
                 1. Coverage of all topic aspects\n\
                 2. Examples and illustrations\n\
                 3. Practical application\n\
                 4. Connection with other topics\n\
                 5. Perspectives and trends"
            }
            (Locale::Russian, CycleNumber::First) => {
                "Создай базовый промпт для получения прямого ответа на запрос пользователя.\n\
                 \n\
                 Правила:\n\
                 1. Чёткая формулировка основного вопроса\n\
                 2. Указание желаемого формата ответа\n\
                 3. Минимум необходимых уточнений"
            }
            (Locale::Russian, CycleNumber::Second) => {
                "Создай детальный промпт для получения развёрнутого ответа.\n\
                 \n\
                 Требования:\n\
                 1. Структурирование информации\n\
                 2. Запрос дополнительного контекста\n\
                 3. Уточнение связанных аспектов\n\
                 4. Указание на необходимость пояснений"
            }
            (Locale::Russian, CycleNumber::Third) => {
                "Создай комплексный промпт для получения полного анализа темы.\n\
                 \n\
                 Включи требования:\n\
                 1. Охват всех аспектов темы\n\
                 2. Примеры и иллюстрации\n\
                 3. Практическое применение\n\
                 4. Связь с другими темами\n\
                 5. Перспективы и тенденции"
            }
        }
    }
}

fn intent_label_en(cycle: CycleNumber) -> &'static str {
    match cycle {
        CycleNumber::First => "Intent",
        CycleNumber::Second => "Deep intent",
        CycleNumber::Third => "Expanded intent",
    }
}

fn intent_label_ru(cycle: CycleNumber) -> &'static str {
    match cycle {
        CycleNumber::First => "Намерение",
        CycleNumber::Second => "Глубинное намерение",
        CycleNumber::Third => "Расширенное намерение",
    }
}
