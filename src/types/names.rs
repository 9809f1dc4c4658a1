use serde::Serialize;

/// The ordered result of one generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedNameSet {
    names: Vec<String>,
}

impl GeneratedNameSet {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when the model returned fewer names than were asked for.
    pub fn is_short_of(&self, requested: u32) -> bool {
        self.names.len() < requested as usize
    }
}

impl From<Vec<String>> for GeneratedNameSet {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl AsRef<[String]> for GeneratedNameSet {
    fn as_ref(&self) -> &[String] {
        &self.names
    }
}
