//! Endpoint resolution for the Ollama backend
//!
//! Priority:
//! 1. Explicit override (command-line flag)
//! 2. OLLAMA_HOST environment variable (same variable the ollama CLI reads)
//! 3. Configured base URL

use deepchain_core::{DeepChainError, Result};
use std::env;

/// Environment variable consulted for the backend address
pub const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

/// Port Ollama listens on when an address names none
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Resolve the base URL of the generation backend
pub fn resolve_base_url(explicit: Option<&str>, configured: &str) -> Result<String> {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        tracing::debug!("Using backend URL from command line");
        return Ok(normalize_base_url(url));
    }

    if let Ok(host) = env::var(OLLAMA_HOST_ENV) {
        if !host.trim().is_empty() {
            tracing::debug!("Using backend URL from {}", OLLAMA_HOST_ENV);
            return Ok(normalize_base_url(&host));
        }
    }

    if configured.trim().is_empty() {
        return Err(DeepChainError::Config(format!(
            "No generation backend configured. Set one of:\n\
             - --url http://host:11434\n\
             - {}=host:11434\n\
             - generation.base_url in .deepchain/config.toml",
            OLLAMA_HOST_ENV
        )));
    }

    Ok(normalize_base_url(configured))
}

/// Add a scheme and the Ollama port when missing, drop trailing slashes
///
/// `https://` URLs are taken as given: they usually sit behind a proxy on 443.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") {
        return trimmed.to_string();
    }

    let rest = trimmed.strip_prefix("http://").unwrap_or(trimmed);
    let (authority, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };

    if has_port(authority) {
        format!("http://{}", rest)
    } else {
        format!("http://{}:{}{}", authority, DEFAULT_OLLAMA_PORT, path)
    }
}

/// Whether `host[:port]` carries a port (bracketed IPv6 hosts included)
fn has_port(authority: &str) -> bool {
    match authority.rsplit_once(':') {
        Some((host, port)) => {
            !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!host.contains(':') || host.ends_with(']'))
        }
        None => false,
    }
}
