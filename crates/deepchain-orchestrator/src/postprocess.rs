//! Normalization of generated prompt text
//!
//! Models tend to wrap the prompt they were asked for in quotes, prefix it
//! with a `Prompt:` label or break it over several lines. One normalization
//! pass, in order:
//!
//! 1. strip one leading/trailing `"`, then one leading/trailing `'`
//! 2. drop a leading case-insensitive `prompt:` / `промпт:` label
//! 3. collapse whitespace runs (newlines included) to one space
//! 4. trim
//!
//! Passes repeat until the text stops changing, so the result of
//! [`normalize`] is a fixed point: `normalize(normalize(x)) == normalize(x)`.

use regex::Regex;
use std::sync::OnceLock;

static PROMPT_LABEL: OnceLock<Regex> = OnceLock::new();

fn prompt_label() -> &'static Regex {
    PROMPT_LABEL.get_or_init(|| {
        Regex::new(r"(?i)^(?:промпт:|prompt:)\s*").expect("prompt label pattern is valid")
    })
}

/// Normalize raw generated prompt text
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One ordered pass of the four normalization steps
fn normalize_once(text: &str) -> String {
    let unquoted = strip_one_layer(strip_one_layer(text, '"'), '\'');
    let unlabeled = prompt_label().replace(unquoted, "");
    unlabeled.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_one_layer(text: &str, quote: char) -> &str {
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_quotes_and_label() {
        assert_eq!(
            normalize("\"Prompt: Explain the history of jazz\""),
            "Explain the history of jazz"
        );
        assert_eq!(normalize("'prompt:   list three facts'"), "list three facts");
    }

    #[test]
    fn test_double_quotes_before_single_quotes() {
        assert_eq!(normalize("\"'Describe bebop in detail'\""), "Describe bebop in detail");
    }

    #[test]
    fn test_label_is_case_insensitive_and_localized() {
        assert_eq!(normalize("PROMPT: Tell me more"), "Tell me more");
        assert_eq!(normalize("Промпт: Расскажи о джазе"), "Расскажи о джазе");
    }

    #[test]
    fn test_label_only_removed_at_start() {
        assert_eq!(
            normalize("Write a prompt: one that explains swing"),
            "Write a prompt: one that explains swing"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize("  Explain\n\nthe   origins\tof\r\njazz  "),
            "Explain the origins of jazz"
        );
    }

    #[test]
    fn test_nested_wrapping_reaches_fixed_point() {
        // A single pass would leave the inner quotes behind
        assert_eq!(normalize("\"\"Prompt: \"Explain swing\"\"\""), "Explain swing");
        assert_eq!(normalize("  \"Explain swing\"  "), "Explain swing");
        assert_eq!(normalize("Prompt: prompt: Explain swing"), "Explain swing");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\""), "");
        assert_eq!(normalize("\"\""), "");
        assert_eq!(normalize("   \n "), "");
        assert_eq!(normalize("prompt:"), "");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            // Do not write `.proptest-regressions` files into the repo.
            failure_persistence: None,
            .. ProptestConfig::default()
        })]

        #[test]
        fn prop_normalize_is_idempotent(raw in "[\"' \\t\\nA-Za-zпромПРОМ:]{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalize_is_idempotent_any_text(raw in any::<String>()) {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_quoting_normalized_text_is_undone(raw in "[\"' \\na-z:]{0,30}") {
            let normalized = normalize(&raw);
            let quoted = format!("\"{}\"", normalized);
            prop_assert_eq!(normalize(&quoted), normalized);
        }

        #[test]
        fn prop_output_has_no_whitespace_runs(raw in any::<String>()) {
            let out = normalize(&raw);
            prop_assert_eq!(out.trim(), out.as_str());
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.contains('\n'));
        }
    }
}
