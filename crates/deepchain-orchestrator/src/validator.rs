//! Acceptance check for normalized prompts

/// Minimum number of whitespace-separated words in a usable prompt
pub const MIN_PROMPT_WORDS: usize = 3;

/// Check whether a normalized prompt is usable
///
/// Total over all inputs: non-empty and at least [`MIN_PROMPT_WORDS`] words.
pub fn is_valid(prompt: &str) -> bool {
    !prompt.is_empty() && prompt.split_whitespace().count() >= MIN_PROMPT_WORDS
}
