//! Configuration for prompt-template generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across the session, log it, and diff two runs
//! to understand why their outputs differ.
//!
//! The credential is deliberately NOT part of the config: it is supplied per
//! request, held only in memory, and never serialised or logged.

use crate::error::Doc2PromptError;
use crate::model::{PromptModel, DEFAULT_API_BASE_URL};
use std::fmt;
use std::sync::Arc;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for a generation request.
///
/// Built via [`GenerationConfig::builder()`] or [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2prompt::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gemini-2.5-pro")
///     .enable_search(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Model identifier. Default: "gemini-2.5-flash".
    pub model: String,

    /// API base URL. Default: the public Gemini v1beta endpoint.
    ///
    /// Overridable so tests and proxies can point the client elsewhere.
    pub api_base_url: String,

    /// Request the service's own retrieval/search augmentation. Default: true.
    ///
    /// The fixed instruction tells the model to fold its own web-search
    /// sub-queries into the template; this flag asks the API to actually make
    /// that capability available.
    pub enable_search: bool,

    /// Custom system instruction. If None, uses the built-in default.
    pub system_instruction: Option<String>,

    /// Per-call HTTP timeout in seconds. Default: 60.
    ///
    /// The only timeout in play — the library enforces no deadline of its
    /// own on top of the HTTP client's.
    pub api_timeout_secs: u64,

    /// Pre-constructed model client. Takes precedence over the built-in
    /// Gemini client; the seam tests and middleware hook into.
    pub provider: Option<Arc<dyn PromptModel>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            enable_search: true,
            system_instruction: None,
            api_timeout_secs: 60,
            provider: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("enable_search", &self.enable_search)
            .field(
                "system_instruction",
                &self.system_instruction.as_ref().map(|s| s.len()),
            )
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn PromptModel>"))
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn enable_search(mut self, v: bool) -> Self {
        self.config.enable_search = v;
        self
    }

    pub fn system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.system_instruction = Some(instruction.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn PromptModel>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, Doc2PromptError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(Doc2PromptError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.api_base_url.trim().is_empty() {
            return Err(Doc2PromptError::InvalidConfig(
                "API base URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}
