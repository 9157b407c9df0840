//! Output types for a successful generation.

use serde::{Deserialize, Serialize};

/// The generated prompt template.
///
/// `text` is an opaque string — the two-section structure the instruction
/// demands is trusted, not validated. The text is mutable after generation:
/// the session's edit action overwrites it in place, and the edited value is
/// what the copy and save actions emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    /// The template text, whitespace-trimmed.
    pub text: String,
    /// Timing and model bookkeeping for the request that produced it.
    pub stats: GenerationStats,
}

/// Bookkeeping for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Model identifier the request was sent to.
    pub model: String,
    /// Wall-clock duration of the remote call in milliseconds.
    pub duration_ms: u64,
}
