use serde::Serialize;

/// Facts about one successful generation, for logging and callers that want them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Client-side id shared by every attempt of one `generate` call.
    pub request_id: String,
    /// Model that produced the names.
    pub model: String,
    /// Total attempts across all models, the successful one included.
    pub attempts: u32,
    pub duration_ms: u128,
}
