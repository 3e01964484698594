//! Degrade-to-text handling for late pipeline stages
//!
//! The response and synthesis stages do not abort a turn on failure by
//! default: the failure is turned into a visible placeholder string that
//! takes the place of the generated text. Intent and prompt stages never
//! go through here.

use std::future::Future;
use tracing::warn;

use crate::config::DegradePolicy;
use crate::types::Stage;
use crate::{DeepChainError, Result};

/// Run a generation step, degrading failures according to `policy`
///
/// An `Ok` with blank text counts as a failure (`EmptyResult(stage)`).
/// Under [`DegradePolicy::Embed`] the failure message is passed to
/// `placeholder` and the resulting string is returned as if it had been
/// generated. Under [`DegradePolicy::Abort`] the failure is returned as-is.
pub async fn degrade_on_failure<F, Fut, P>(
    stage: Stage,
    policy: DegradePolicy,
    placeholder: P,
    f: F,
) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
    P: FnOnce(&str) -> String,
{
    let failure = match f().await {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => DeepChainError::EmptyResult(stage),
        Err(e) => e,
    };

    match policy {
        DegradePolicy::Embed => {
            warn!("{} stage failed (degraded to placeholder): {}", stage, failure);
            Ok(placeholder(&failure.to_string()))
        }
        DegradePolicy::Abort => {
            warn!("{} stage failed (aborting turn): {}", stage, failure);
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(msg: &str) -> String {
        format!("Error: {}", msg)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let result = degrade_on_failure(
            Stage::Response,
            DegradePolicy::Embed,
            placeholder,
            || async { Ok("the answer".to_string()) },
        )
        .await;
        assert_eq!(result.unwrap(), "the answer");
    }

    #[tokio::test]
    async fn test_service_failure_is_embedded() {
        let result = degrade_on_failure(
            Stage::Response,
            DegradePolicy::Embed,
            placeholder,
            || async { Err(DeepChainError::Service("connection refused".to_string())) },
        )
        .await;
        let text = result.unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_blank_text_is_embedded_as_empty_result() {
        let result = degrade_on_failure(
            Stage::Synthesis,
            DegradePolicy::Embed,
            placeholder,
            || async { Ok("   ".to_string()) },
        )
        .await;
        assert_eq!(result.unwrap(), "Error: Empty result from the synthesis stage");
    }

    #[tokio::test]
    async fn test_abort_policy_propagates() {
        let result = degrade_on_failure(
            Stage::Response,
            DegradePolicy::Abort,
            placeholder,
            || async { Ok(String::new()) },
        )
        .await;
        assert!(matches!(
            result,
            Err(DeepChainError::EmptyResult(Stage::Response))
        ));
    }
}
