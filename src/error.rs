//! Error types for the doc2prompt library.
//!
//! One generation attempt produces at most one error, and every error is
//! terminal for the action that triggered it — there is no retry layer.
//! The variants fall into three groups:
//!
//! * **Input validation** ([`Doc2PromptError::MissingCredential`],
//!   [`Doc2PromptError::EmptyInput`]) — detected before any network call.
//! * **Remote failures** — classified from the Gemini API's free-text error
//!   message by [`crate::classify::classify_remote_error`].
//! * **Local failures** — document extraction, file I/O, configuration.
//!
//! [`ErrorKind`] is the cloneable tag stored in
//! [`crate::session::RequestState::Failed`] alongside the user-facing
//! message, so the session state stays `Clone` even though some error
//! variants carry an `io::Error` source.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the doc2prompt library.
#[derive(Debug, Error)]
pub enum Doc2PromptError {
    // ── Input validation ──────────────────────────────────────────────────
    /// No API credential was supplied (blank or whitespace-only).
    #[error("API credential is missing or blank")]
    MissingCredential,

    /// The document text to analyse is blank or whitespace-only.
    #[error("Input document text is empty")]
    EmptyInput,

    // ── Remote failures (classified) ──────────────────────────────────────
    /// The API rejected the supplied key.
    #[error("API key was rejected by the Gemini API")]
    InvalidCredential,

    /// The account's quota is exhausted.
    #[error("Gemini API quota exhausted")]
    QuotaExceeded,

    /// The remote service reported a transient server-side fault (5xx).
    #[error("Gemini API is temporarily unavailable")]
    RemoteUnavailable,

    /// The request was blocked by the remote safety policy.
    #[error("Request blocked by the Gemini safety policy")]
    ContentBlocked,

    /// Any other remote error, carrying the original message.
    #[error("Gemini API error: {0}")]
    RemoteError(String),

    /// The remote error had no usable textual message.
    #[error("Unknown error while talking to the Gemini API")]
    UnknownError,

    /// The API call succeeded but returned no text.
    #[error("Gemini API returned an empty response")]
    EmptyResponse,

    // ── Document extraction ───────────────────────────────────────────────
    /// The uploaded binary could not be flattened to plain text.
    #[error("Document extraction failed: {detail}")]
    Extraction { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The input file extension is not one we can read.
    #[error("Unsupported file type: '{path}'\nSupported: .docx, .txt, .md, or '-' for stdin.")]
    UnsupportedFile { path: PathBuf },

    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system clipboard could not be written.
    #[error("Failed to copy to clipboard: {0}")]
    ClipboardFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Doc2PromptError {
    /// The cloneable tag for this error, as held by
    /// [`crate::session::RequestState::Failed`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Doc2PromptError::MissingCredential => ErrorKind::MissingCredential,
            Doc2PromptError::EmptyInput => ErrorKind::EmptyInput,
            Doc2PromptError::InvalidCredential => ErrorKind::InvalidCredential,
            Doc2PromptError::QuotaExceeded => ErrorKind::QuotaExceeded,
            Doc2PromptError::RemoteUnavailable => ErrorKind::RemoteUnavailable,
            Doc2PromptError::ContentBlocked => ErrorKind::ContentBlocked,
            Doc2PromptError::RemoteError(_) => ErrorKind::RemoteError,
            Doc2PromptError::UnknownError => ErrorKind::UnknownError,
            Doc2PromptError::EmptyResponse => ErrorKind::EmptyResponse,
            Doc2PromptError::Extraction { .. } => ErrorKind::Extraction,
            Doc2PromptError::FileNotFound { .. }
            | Doc2PromptError::UnsupportedFile { .. }
            | Doc2PromptError::OutputWriteFailed { .. }
            | Doc2PromptError::ClipboardFailed(_) => ErrorKind::Io,
            Doc2PromptError::InvalidConfig(_) => ErrorKind::Config,
            Doc2PromptError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The fixed user-facing message for this error.
    ///
    /// The product ships in Vietnamese, so these strings are Vietnamese;
    /// [`std::fmt::Display`] stays English for logs. Extraction failures and
    /// generation failures share the error slot in the session but keep
    /// distinct messages here.
    pub fn user_message(&self) -> String {
        match self {
            Doc2PromptError::MissingCredential => {
                "Vui lòng nhập API Key của Google AI Studio.".to_string()
            }
            Doc2PromptError::EmptyInput => {
                "Nội dung đầu vào không được để trống.".to_string()
            }
            Doc2PromptError::InvalidCredential => {
                "API Key không hợp lệ. Vui lòng kiểm tra lại và đảm bảo key có quyền truy cập Gemini API."
                    .to_string()
            }
            Doc2PromptError::QuotaExceeded => {
                "Hạn ngạch (quota) của bạn đã hết. Vui lòng thử lại sau hoặc kiểm tra tài khoản Google AI Studio của bạn."
                    .to_string()
            }
            Doc2PromptError::RemoteUnavailable => {
                "Máy chủ của Google đang gặp sự cố tạm thời. Vui lòng thử lại sau ít phút."
                    .to_string()
            }
            Doc2PromptError::ContentBlocked => {
                "Yêu cầu của bạn đã bị chặn do vi phạm chính sách an toàn. Vui lòng điều chỉnh nội dung đầu vào."
                    .to_string()
            }
            Doc2PromptError::RemoteError(msg) => {
                format!("Tạo prompt thất bại: {}", msg)
            }
            Doc2PromptError::UnknownError => {
                "Đã xảy ra lỗi không xác định khi giao tiếp với Gemini API.".to_string()
            }
            Doc2PromptError::EmptyResponse => {
                "API đã trả về một phản hồi trống.".to_string()
            }
            Doc2PromptError::Extraction { .. } => {
                "Không thể đọc tệp Word. Vui lòng thử lại với tệp khác.".to_string()
            }
            other => format!("Lỗi: {}", other),
        }
    }
}

/// Cloneable tag identifying which taxonomy entry an error belongs to.
///
/// Stored in [`crate::session::RequestState::Failed`] together with the
/// user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    MissingCredential,
    EmptyInput,
    InvalidCredential,
    QuotaExceeded,
    RemoteUnavailable,
    ContentBlocked,
    RemoteError,
    UnknownError,
    EmptyResponse,
    Extraction,
    Io,
    Config,
    Internal,
}
