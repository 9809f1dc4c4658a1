//! User settings as an immutable value.
//!
//! Every change goes through a `with_*` method that returns a new, normalized value,
//! so `names_per_page <= num_names` always holds for values built here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_NAMES: u32 = 1;
pub const MAX_NAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl FromStr for Theme {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(crate::Error::configuration_with_context(
                format!("Unknown theme '{}'", s),
                crate::ErrorContext::new().with_field_path("settings.theme"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameCategory {
    Character,
    Business,
    Place,
    Item,
    #[default]
    Custom,
}

impl NameCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Business => "business",
            Self::Place => "place",
            Self::Item => "item",
            Self::Custom => "custom",
        }
    }

    pub fn all() -> [Self; 5] {
        [
            Self::Character,
            Self::Business,
            Self::Place,
            Self::Item,
            Self::Custom,
        ]
    }
}

impl fmt::Display for NameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NameCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                crate::Error::configuration_with_context(
                    format!("Unknown category '{}'", s),
                    crate::ErrorContext::new()
                        .with_field_path("settings.category")
                        .with_details("expected one of character, business, place, item, custom"),
                )
            })
    }
}

/// Fields missing from a stored blob take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub category: NameCategory,
    pub custom_prompt: String,
    pub num_names: u32,
    pub names_per_page: u32,
    pub temperature: f32,
    pub max_length: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            category: NameCategory::Custom,
            custom_prompt: String::new(),
            num_names: 20,
            names_per_page: 10,
            temperature: 0.7,
            max_length: 20,
        }
    }
}

impl Settings {
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self {
            theme,
            ..self.clone()
        }
    }

    pub fn with_category(&self, category: NameCategory) -> Self {
        Self {
            category,
            ..self.clone()
        }
    }

    pub fn with_custom_prompt(&self, prompt: impl Into<String>) -> Self {
        Self {
            custom_prompt: prompt.into(),
            ..self.clone()
        }
    }

    /// Clamps to `[1, 30]` and pulls `names_per_page` down if needed.
    pub fn with_num_names(&self, num_names: u32) -> Self {
        Self {
            num_names,
            ..self.clone()
        }
        .normalized()
    }

    /// Clamps to `[1, num_names]`.
    pub fn with_names_per_page(&self, names_per_page: u32) -> Self {
        Self {
            names_per_page,
            ..self.clone()
        }
        .normalized()
    }

    pub fn with_temperature(&self, temperature: f32) -> Self {
        Self {
            temperature,
            ..self.clone()
        }
        .normalized()
    }

    pub fn with_max_length(&self, max_length: u32) -> Self {
        Self {
            max_length,
            ..self.clone()
        }
    }

    /// Restore the invariants on a value that came from outside (e.g. persisted JSON).
    pub fn normalized(self) -> Self {
        let num_names = self.num_names.clamp(MIN_NAMES, MAX_NAMES);
        let names_per_page = self.names_per_page.clamp(MIN_NAMES, num_names);
        let temperature = if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 2.0)
        } else {
            Settings::default().temperature
        };
        Self {
            num_names,
            names_per_page,
            temperature,
            ..self
        }
    }

    /// Description text with surrounding whitespace removed; empty when none was given.
    pub fn description(&self) -> &str {
        self.custom_prompt.trim()
    }
}
