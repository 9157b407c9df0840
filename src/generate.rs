//! Generation entry points.
//!
//! [`generate_prompt`] is the library's primary operation: validate the
//! inputs, issue exactly one remote call, and return the trimmed template or
//! a classified error. There is no retry, cache, or queue — a failure
//! surfaces immediately and the caller decides what to do.

use crate::classify::classify_remote_error;
use crate::config::GenerationConfig;
use crate::error::Doc2PromptError;
use crate::model::{GeminiClient, ModelRequest, PromptModel};
use crate::output::{GeneratedPrompt, GenerationStats};
use crate::prompts::{build_user_content, SYSTEM_INSTRUCTION};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate a reusable prompt template from a document's plain text.
///
/// # Arguments
/// * `document_text` — the text to analyse (typed or extracted from a file)
/// * `credential`    — the user's API key, held only for this call
/// * `config`        — generation configuration
///
/// # Errors
/// * [`Doc2PromptError::MissingCredential`] / [`Doc2PromptError::EmptyInput`]
///   for blank inputs, checked before any network call
/// * [`Doc2PromptError::EmptyResponse`] when the call succeeds but yields no
///   text — an empty template is never a valid result
/// * a classified remote error otherwise (see [`crate::classify`])
pub async fn generate_prompt(
    document_text: &str,
    credential: &str,
    config: &GenerationConfig,
) -> Result<GeneratedPrompt, Doc2PromptError> {
    // Preconditions first: no network traffic for invalid input.
    if credential.trim().is_empty() {
        return Err(Doc2PromptError::MissingCredential);
    }
    if document_text.trim().is_empty() {
        return Err(Doc2PromptError::EmptyInput);
    }

    let provider = resolve_provider(credential, config)?;

    let request = ModelRequest {
        model: config.model.clone(),
        system_instruction: config
            .system_instruction
            .clone()
            .unwrap_or_else(|| SYSTEM_INSTRUCTION.to_string()),
        user_content: build_user_content(document_text),
        enable_search: config.enable_search,
    };

    info!(model = %request.model, chars = document_text.len(), "Generating prompt template");
    let start = Instant::now();

    let raw = provider
        .generate(&request)
        .await
        .map_err(|e| classify_remote_error(e.message.as_deref()))?;

    let duration_ms = start.elapsed().as_millis() as u64;
    let text = raw.trim().to_string();

    if text.is_empty() {
        return Err(Doc2PromptError::EmptyResponse);
    }

    debug!(chars = text.len(), duration_ms, "Template generated");

    Ok(GeneratedPrompt {
        text,
        stats: GenerationStats {
            model: request.model,
            duration_ms,
        },
    })
}

/// Synchronous wrapper around [`generate_prompt`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_prompt_sync(
    document_text: &str,
    credential: &str,
    config: &GenerationConfig,
) -> Result<GeneratedPrompt, Doc2PromptError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Doc2PromptError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate_prompt(document_text, credential, config))
}

/// Write template text to a file as plain UTF-8.
///
/// Uses atomic write (temp file + rename) to prevent partial files. This is
/// the "download" side effect: the file contains exactly the given text.
pub async fn save_prompt_to_file(
    text: &str,
    output_path: impl AsRef<Path>,
) -> Result<(), Doc2PromptError> {
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Doc2PromptError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, text)
        .await
        .map_err(|e| Doc2PromptError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Doc2PromptError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}

/// Resolve the model client: an injected provider wins, otherwise a Gemini
/// client is built for this credential.
fn resolve_provider(
    credential: &str,
    config: &GenerationConfig,
) -> Result<Arc<dyn PromptModel>, Doc2PromptError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    Ok(Arc::new(GeminiClient::new(
        credential,
        config.api_base_url.clone(),
        config.api_timeout_secs,
    )?))
}
