//! # doc2prompt
//!
//! Turn a document into a reusable prompt template using the Gemini API.
//!
//! ## Why this crate?
//!
//! Re-creating a recurring document (lesson plans, reports, letters) with an
//! LLM means re-explaining its structure every time. Instead this crate sends
//! the document once to Gemini with a fixed analysis directive and gets back
//! a template that separates the fixed boilerplate from the minimal set of
//! user-supplied variables — a prompt the user can hand to any model, filling
//! in only what actually changes.
//!
//! ## Flow Overview
//!
//! ```text
//! document (.docx / text)
//!  │
//!  ├─ 1. Extract   flatten the docx container to plain text (local)
//!  ├─ 2. Validate  credential + input present, before any network call
//!  ├─ 3. Generate  one generateContent call, search tool enabled
//!  ├─ 4. Classify  remote failures → error taxonomy (no retries)
//!  └─ 5. Act       edit in place, copy to clipboard, save as .txt
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2prompt::{generate_prompt, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GenerationConfig::default();
//!     let prompt = generate_prompt("quarterly report text…", "<api key>", &config).await?;
//!     println!("{}", prompt.text);
//!     Ok(())
//! }
//! ```
//!
//! Or drive the full session state machine (what the CLI does):
//!
//! ```rust,no_run
//! use doc2prompt::{GenerationConfig, RequestState, Session};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut session = Session::new(GenerationConfig::default());
//! session.set_credential("<api key>");
//! session.set_input_text("document text…");
//! if let RequestState::Succeeded(prompt) = session.submit().await {
//!     println!("{}", prompt.text);
//! }
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | Enables the `doc2prompt` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `clipboard` | on      | System clipboard backend (arboard) for the copy action |
//!
//! Disable both when using only the library:
//! ```toml
//! doc2prompt = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod classify;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod model;
pub mod output;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use classify::classify_remote_error;
pub use clipboard::{BufferClipboard, Clipboard};
pub use config::{GenerationConfig, GenerationConfigBuilder, DEFAULT_MODEL};
pub use error::{Doc2PromptError, ErrorKind};
pub use extract::{extract_docx_text, extract_text};
pub use generate::{generate_prompt, generate_prompt_sync, save_prompt_to_file};
pub use model::{GeminiClient, ModelError, ModelRequest, PromptModel, DEFAULT_API_BASE_URL};
pub use output::{GeneratedPrompt, GenerationStats};
pub use session::{RequestState, Session};

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
