//! The session controller: input state, request state machine, and the
//! copy/save actions on the generated template.
//!
//! A [`Session`] owns everything one user session holds in memory — the
//! credential, the input text, and the [`RequestState`]. Nothing survives the
//! session; there is no persistence layer.
//!
//! ## State machine
//!
//! ```text
//!            begin()                     settle(Ok)
//!   Idle ───────────────▶ InFlight ─────────────────▶ Succeeded(prompt)
//!     ▲                      │
//!     │                      │ settle(Err)
//!     └── begin() clears ◀── ▼
//!         prior outcome    Failed(kind, message)
//! ```
//!
//! Transitions happen only on explicit calls — [`Session::begin`] and
//! [`Session::settle`] are public precisely so tests can drive the machine
//! without timing dependencies, and so the decorative progress animation in
//! the CLI never gates the real completion signal. [`Session::submit`]
//! composes them around the remote call.
//!
//! ## Single flight
//!
//! At most one generation request is in flight per session. `begin()` refuses
//! to transition while the state is already `InFlight`, so a repeated
//! `submit()` issues no second remote call. There is no cancellation: a
//! pending request always settles.

use crate::clipboard::Clipboard;
use crate::config::GenerationConfig;
use crate::error::{Doc2PromptError, ErrorKind};
use crate::extract;
use crate::generate::{generate_prompt, save_prompt_to_file};
use crate::output::GeneratedPrompt;
use std::path::Path;
use tracing::{debug, warn};

/// The lifecycle of the session's single generation request.
///
/// A tagged enum instead of separate loading/error/result fields: a loading
/// state with a populated error is unrepresentable.
#[derive(Debug, Clone)]
pub enum RequestState {
    /// No request has been made since the last reset.
    Idle,
    /// A generation request was issued and has not settled.
    InFlight,
    /// The last request produced a template.
    Succeeded(GeneratedPrompt),
    /// The last action failed; `message` is the user-facing text.
    Failed { kind: ErrorKind, message: String },
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, RequestState::Succeeded(_))
    }
}

/// One user session: credential, input document, request state.
#[derive(Debug)]
pub struct Session {
    config: GenerationConfig,
    credential: String,
    input_text: String,
    state: RequestState,
    extracting: bool,
}

impl Session {
    /// Create a session with the given generation configuration.
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            credential: String::new(),
            input_text: String::new(),
            state: RequestState::Idle,
            extracting: false,
        }
    }

    // ── Inputs ───────────────────────────────────────────────────────────

    /// Replace the in-memory credential. Never persisted or logged.
    pub fn set_credential(&mut self, credential: impl Into<String>) {
        self.credential = credential.into();
    }

    /// Replace the input document text (the typed path; uploads go through
    /// [`Session::ingest_document`]).
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    // ── State ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    /// True while a document upload is being flattened to text.
    pub fn is_extracting(&self) -> bool {
        self.extracting
    }

    // ── Generation ───────────────────────────────────────────────────────

    /// Validate inputs and transition to `InFlight`.
    ///
    /// Returns `false` without touching the state when a request is already
    /// in flight or an extraction is running (single-flight rule). On a
    /// validation failure the state becomes `Failed` with the same
    /// user-facing message the remote path would produce, and no call should
    /// be made. On `true`, any prior error AND prior result have been
    /// cleared — a failed retry can never display a stale template.
    pub fn begin(&mut self) -> bool {
        if self.state.is_in_flight() {
            warn!("Generation already in flight; ignoring submit");
            return false;
        }
        if self.extracting {
            warn!("Document extraction in progress; ignoring submit");
            return false;
        }

        if self.credential.trim().is_empty() {
            self.fail(Doc2PromptError::MissingCredential);
            return false;
        }
        if self.input_text.trim().is_empty() {
            self.fail(Doc2PromptError::EmptyInput);
            return false;
        }

        self.state = RequestState::InFlight;
        true
    }

    /// Settle the in-flight request: exactly one of `Succeeded` or `Failed`.
    ///
    /// `InFlight` never persists past this point, whichever way the call
    /// ended — including a synchronous failure before the request left the
    /// machine.
    pub fn settle(&mut self, result: Result<GeneratedPrompt, Doc2PromptError>) {
        match result {
            Ok(prompt) => {
                debug!(chars = prompt.text.len(), "Generation settled: success");
                self.state = RequestState::Succeeded(prompt);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Run one generation request end to end.
    ///
    /// Single-flight: if a request is already in flight this returns
    /// immediately without issuing a remote call.
    pub async fn submit(&mut self) -> &RequestState {
        if !self.begin() {
            return &self.state;
        }

        let result = generate_prompt(&self.input_text, &self.credential, &self.config).await;
        self.settle(result);
        &self.state
    }

    // ── Document ingestion ───────────────────────────────────────────────

    /// Flatten an uploaded `.docx` binary and make it the input text.
    ///
    /// Does not trigger generation. A prior error is cleared when the upload
    /// starts; on failure the shared error slot holds an extraction failure.
    /// Returns `true` when the input text was replaced.
    pub async fn ingest_document(&mut self, bytes: Vec<u8>) -> bool {
        if self.state.is_in_flight() || self.extracting {
            warn!("Busy; ignoring document upload");
            return false;
        }

        if matches!(self.state, RequestState::Failed { .. }) {
            self.state = RequestState::Idle;
        }

        self.extracting = true;
        let result = extract::extract_text(bytes).await;
        self.extracting = false;

        match result {
            Ok(text) => {
                debug!(chars = text.len(), "Document ingested");
                self.input_text = text;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    // ── Output actions ───────────────────────────────────────────────────

    /// The authoritative template text: the generated result, including any
    /// in-place edits. `None` unless the state is `Succeeded`.
    pub fn output_text(&self) -> Option<&str> {
        match &self.state {
            RequestState::Succeeded(prompt) => Some(&prompt.text),
            _ => None,
        }
    }

    /// Overwrite the generated text in place (the edit action).
    ///
    /// No state transition: editing is presentation-level, but the edited
    /// value becomes authoritative for [`Session::copy_to`] and
    /// [`Session::save_to_file`]. Ignored unless a result exists.
    pub fn set_generated_text(&mut self, text: impl Into<String>) {
        if let RequestState::Succeeded(ref mut prompt) = self.state {
            prompt.text = text.into();
        }
    }

    /// Copy the authoritative text to a clipboard.
    pub fn copy_to(&self, clipboard: &mut dyn Clipboard) -> Result<(), Doc2PromptError> {
        let text = self
            .output_text()
            .ok_or_else(|| Doc2PromptError::Internal("no generated template to copy".into()))?;
        clipboard.set_text(text)
    }

    /// Save the authoritative text to a plain-text file (the download
    /// action). The file contains exactly the current text.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), Doc2PromptError> {
        let text = self
            .output_text()
            .ok_or_else(|| Doc2PromptError::Internal("no generated template to save".into()))?;
        save_prompt_to_file(text, path).await
    }

    fn fail(&mut self, error: Doc2PromptError) {
        warn!(error = %error, "Action failed");
        self.state = RequestState::Failed {
            kind: error.kind(),
            message: error.user_message(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::BufferClipboard;
    use crate::model::{ModelError, ModelRequest, PromptModel};
    use crate::output::GenerationStats;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingModel {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl CountingModel {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn err(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PromptModel for CountingModel {
        async fn generate(&self, _request: &ModelRequest) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(msg) => Err(ModelError::message(msg.clone())),
            }
        }
    }

    fn session_with(model: Arc<CountingModel>) -> Session {
        let config = GenerationConfig::builder()
            .provider(model as Arc<dyn PromptModel>)
            .build()
            .unwrap();
        Session::new(config)
    }

    fn ready_session(model: Arc<CountingModel>) -> Session {
        let mut s = session_with(model);
        s.set_credential("k1");
        s.set_input_text("Sample doc text");
        s
    }

    fn succeeded_prompt(text: &str) -> GeneratedPrompt {
        GeneratedPrompt {
            text: text.to_string(),
            stats: GenerationStats {
                model: "gemini-2.5-flash".into(),
                duration_ms: 1,
            },
        }
    }

    #[tokio::test]
    async fn submit_succeeds_and_trims() {
        let model = CountingModel::ok("  [ PHẦN CẤU HÌNH ] ...  ");
        let mut session = ready_session(Arc::clone(&model));

        session.submit().await;

        match session.state() {
            RequestState::Succeeded(p) => assert_eq!(p.text, "[ PHẦN CẤU HÌNH ] ..."),
            other => panic!("expected Succeeded, got {other:?}"),
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_credential_fails_without_remote_call() {
        let model = CountingModel::ok("unused");
        let mut session = session_with(Arc::clone(&model));
        session.set_credential("   ");
        session.set_input_text("text");

        session.submit().await;

        match session.state() {
            RequestState::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::MissingCredential);
                assert_eq!(message, "Vui lòng nhập API Key của Google AI Studio.");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_input_fails_without_remote_call() {
        let model = CountingModel::ok("unused");
        let mut session = session_with(Arc::clone(&model));
        session.set_credential("k1");
        session.set_input_text(" \n ");

        session.submit().await;

        match session.state() {
            RequestState::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::EmptyInput),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_while_in_flight_issues_no_second_call() {
        let model = CountingModel::ok("template");
        let mut session = ready_session(Arc::clone(&model));

        // Drive the machine by hand: the request is logically in flight.
        assert!(session.begin());
        assert!(session.is_in_flight());

        // A second submit must be swallowed by the single-flight rule.
        session.submit().await;
        assert!(session.is_in_flight());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);

        // The pending request settles normally afterwards.
        session.settle(Ok(succeeded_prompt("late result")));
        assert_eq!(session.output_text(), Some("late result"));
    }

    #[test]
    fn begin_clears_prior_result_and_error() {
        let model = CountingModel::ok("unused");
        let mut session = ready_session(model);

        session.state = RequestState::Succeeded(succeeded_prompt("old"));
        assert!(session.begin());
        // InFlight means the stale template is already gone: a failed retry
        // can never display it.
        assert!(session.output_text().is_none());

        session.settle(Err(Doc2PromptError::RemoteUnavailable));
        match session.state() {
            RequestState::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::RemoteUnavailable),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(session.output_text().is_none());
    }

    #[tokio::test]
    async fn failure_settles_with_classified_kind_and_message() {
        let model = CountingModel::err("API key not valid");
        let mut session = ready_session(model);

        session.submit().await;

        match session.state() {
            RequestState::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::InvalidCredential);
                assert!(message.contains("API Key không hợp lệ"), "got: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn ingest_document_replaces_input_without_generating() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("word/document.xml", SimpleFileOptions::default())
                .unwrap();
            writer
                .write_all(
                    br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>uploaded text</w:t></w:r></w:p></w:body></w:document>"#,
                )
                .unwrap();
            writer.finish().unwrap();
        }

        let model = CountingModel::ok("unused");
        let mut session = ready_session(Arc::clone(&model));

        assert!(session.ingest_document(buf.into_inner()).await);
        assert_eq!(session.input_text(), "uploaded text");
        assert!(!session.is_extracting());
        // Upload must not trigger generation by itself.
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ingest_failure_uses_shared_error_slot() {
        let model = CountingModel::ok("unused");
        let mut session = ready_session(model);

        assert!(!session.ingest_document(b"garbage".to_vec()).await);
        assert!(!session.is_extracting());
        match session.state() {
            RequestState::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::Extraction);
                assert!(message.contains("tệp Word"), "got: {message}");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn edited_text_is_authoritative_for_copy() {
        let model = CountingModel::ok("unused");
        let mut session = ready_session(model);
        session.state = RequestState::Succeeded(succeeded_prompt("original"));

        session.set_generated_text("edited by user");

        let mut clipboard = BufferClipboard::default();
        session.copy_to(&mut clipboard).unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("edited by user"));
    }

    #[test]
    fn edit_without_result_is_ignored() {
        let model = CountingModel::ok("unused");
        let mut session = ready_session(model);

        session.set_generated_text("nothing to edit");
        assert!(session.output_text().is_none());

        let mut clipboard = BufferClipboard::default();
        assert!(session.copy_to(&mut clipboard).is_err());
        assert!(clipboard.contents.is_none());
    }

    #[tokio::test]
    async fn save_writes_edited_text() {
        let model = CountingModel::ok("unused");
        let mut session = ready_session(model);
        session.state = RequestState::Succeeded(succeeded_prompt("before edit"));
        session.set_generated_text("after edit");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generated-prompt.txt");
        session.save_to_file(&path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "after edit");
    }
}
