//! Prompt construction: settings in, model instruction out.

use crate::types::{NameCategory, Settings};

/// System message sent ahead of every generation prompt.
pub const SYSTEM_PROMPT: &str = "You are a creative name generator. Generate names based on the given prompt. Return only the names as a comma-separated list.";

const BASE_PROMPT: &str = "Generate unique and creative names. Provide only the names as a comma-separated list, without any additional explanation or commentary. ";

/// Build the user instruction for `settings`. Pure and infallible.
///
/// A non-empty description always wins over the category template.
pub fn build_prompt(settings: &Settings) -> String {
    let description = settings.description();
    if !description.is_empty() {
        return format!(
            "Generate creative and unique names based on this description: {}. \
             The names should be memorable, distinctive, and suitable for their intended purpose. \
             Provide only the names as a comma-separated list, without any additional explanation or commentary.",
            description
        );
    }

    let guidance = match settings.category {
        NameCategory::Character => {
            "The names should be suitable for fictional characters, conveying personality and memorability."
        }
        NameCategory::Business => {
            "The names should be professional, trustworthy, and suitable for a business or brand."
        }
        NameCategory::Place => {
            "The names should evoke a sense of location and atmosphere, suitable for fictional places or landmarks."
        }
        NameCategory::Item => {
            "The names should be distinctive and suitable for products, artifacts, or special items."
        }
        NameCategory::Custom => "The names should be memorable and distinctive.",
    };
    format!("{}{}", BASE_PROMPT, guidance)
}
