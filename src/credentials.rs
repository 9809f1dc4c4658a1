//! API credential lookup.

use keyring::Entry;
use std::env;

const KEYRING_SERVICE: &str = "namegen";
const KEYRING_USER: &str = "openrouter";
const ENV_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "NAMEGEN_API_KEY"];

/// Resolve the API key: OS keyring first, then `OPENROUTER_API_KEY`, then `NAMEGEN_API_KEY`.
///
/// Blank values count as absent.
pub fn resolve_api_key() -> Option<String> {
    if let Ok(entry) = Entry::new(KEYRING_SERVICE, KEYRING_USER) {
        if let Ok(key) = entry.get_password() {
            if let Some(key) = non_blank(key) {
                return Some(key);
            }
        }
    }

    ENV_VARS
        .iter()
        .find_map(|name| env::var(name).ok().and_then(non_blank))
}

/// Store `key` in the OS keyring for later runs.
pub fn store_api_key(key: &str) -> crate::Result<()> {
    let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER).map_err(keyring_error)?;
    entry.set_password(key).map_err(keyring_error)
}

fn keyring_error(e: keyring::Error) -> crate::Error {
    crate::Error::configuration_with_context(
        format!("Keyring unavailable: {}", e),
        crate::ErrorContext::new().with_source("credentials"),
    )
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  ".into()), None);
        assert_eq!(non_blank(" sk-1 ".into()).as_deref(), Some("sk-1"));
    }
}
