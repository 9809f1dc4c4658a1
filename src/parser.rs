//! Model reply parsing.
//!
//! Replies are split on commas only. A name that itself contains a comma is split in two;
//! the upstream format offers no escaping, so none is attempted.

use crate::types::ChatCompletionResponse;
use crate::{Error, Result};

/// Split `content` into at most `limit` trimmed, non-empty names. Duplicates are kept.
pub fn parse_names(content: &str, limit: usize) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Like [`parse_names`], but an empty result is an error rather than an empty success.
pub fn extract_names(content: &str, limit: usize) -> Result<Vec<String>> {
    let names = parse_names(content, limit);
    if names.is_empty() {
        return Err(Error::NoNames);
    }
    Ok(names)
}

/// `choices[0].message.content`, or `""` when any part is missing.
pub fn first_choice_content(response: &ChatCompletionResponse) -> &str {
    response
        .choices
        .first()
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.as_deref())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_preserved_and_truncated() {
        let names = parse_names("Acme, Zenith, Orbit, Acme, Lumen, Extra", 5);
        assert_eq!(names, vec!["Acme", "Zenith", "Orbit", "Acme", "Lumen"]);
    }

    #[test]
    fn test_empty_entries_dropped() {
        assert_eq!(parse_names(" ,Nova,, ,Vega, ", 10), vec!["Nova", "Vega"]);
    }

    #[test]
    fn test_comma_inside_name_is_a_boundary() {
        assert_eq!(
            parse_names("Smith, Jones & Co, Bolt", 10),
            vec!["Smith", "Jones & Co", "Bolt"]
        );
    }

    #[test]
    fn test_extract_names_rejects_empty() {
        assert!(matches!(extract_names(" , ,\n", 5), Err(Error::NoNames)));
        assert!(matches!(extract_names("", 5), Err(Error::NoNames)));
        assert!(matches!(extract_names("Nova", 0), Err(Error::NoNames)));
    }

    #[test]
    fn test_first_choice_content() {
        let resp: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"A, B"}}]}"#).unwrap();
        assert_eq!(first_choice_content(&resp), "A, B");
        assert_eq!(first_choice_content(&ChatCompletionResponse::default()), "");
    }
}
