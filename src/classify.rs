//! Classification of remote API failures into the error taxonomy.
//!
//! The Gemini API (and the HTTP layer underneath it) reports failures as
//! free-text messages, not stable error codes. The rules below match known
//! substrings of those messages, case-insensitively, first match wins.
//! Substring matching is inherently fragile, so everything lives in this one
//! function: the rules are unit-testable in isolation and easy to extend when
//! the remote error vocabulary changes. Messages no rule recognises fall
//! through to [`Doc2PromptError::RemoteError`] with the original text, and a
//! failure with no usable message at all becomes
//! [`Doc2PromptError::UnknownError`].

use crate::error::Doc2PromptError;

/// Map a remote failure message to a taxonomy error.
///
/// Priority order (first match wins): credential > quota > server > blocked
/// > generic. `None` models an error shape that carried no text.
pub fn classify_remote_error(message: Option<&str>) -> Doc2PromptError {
    let Some(message) = message else {
        return Doc2PromptError::UnknownError;
    };

    let lower = message.to_lowercase();

    if lower.contains("api key not valid") {
        return Doc2PromptError::InvalidCredential;
    }

    if lower.contains("quota") || lower.contains("resource has been exhausted") {
        return Doc2PromptError::QuotaExceeded;
    }

    if lower.contains("500") || lower.contains("503") || lower.contains("internal error") {
        return Doc2PromptError::RemoteUnavailable;
    }

    if lower.contains("blocked") {
        return Doc2PromptError::ContentBlocked;
    }

    Doc2PromptError::RemoteError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn kind_of(message: &str) -> ErrorKind {
        classify_remote_error(Some(message)).kind()
    }

    #[test]
    fn invalid_key_any_case() {
        assert_eq!(kind_of("API key not valid"), ErrorKind::InvalidCredential);
        assert_eq!(
            kind_of("error: API KEY NOT VALID. Please pass a valid key."),
            ErrorKind::InvalidCredential
        );
    }

    #[test]
    fn quota_variants() {
        assert_eq!(kind_of("Quota exceeded for project"), ErrorKind::QuotaExceeded);
        assert_eq!(
            kind_of("the Resource has been exhausted"),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn server_variants() {
        assert_eq!(kind_of("HTTP 500: boom"), ErrorKind::RemoteUnavailable);
        assert_eq!(kind_of("got a 503 from upstream"), ErrorKind::RemoteUnavailable);
        assert_eq!(
            kind_of("An Internal Error has occurred"),
            ErrorKind::RemoteUnavailable
        );
    }

    #[test]
    fn blocked() {
        assert_eq!(
            kind_of("response was BLOCKED by safety settings"),
            ErrorKind::ContentBlocked
        );
    }

    #[test]
    fn priority_quota_beats_server() {
        // "quota" and "500" in the same message: quota has higher priority.
        assert_eq!(
            kind_of("HTTP 500: quota exceeded"),
            ErrorKind::QuotaExceeded
        );
    }

    #[test]
    fn priority_credential_beats_everything() {
        assert_eq!(
            kind_of("500 quota blocked — API key not valid"),
            ErrorKind::InvalidCredential
        );
    }

    #[test]
    fn unrecognised_falls_through_with_original_message() {
        let err = classify_remote_error(Some("connection reset by peer"));
        match err {
            Doc2PromptError::RemoteError(msg) => assert_eq!(msg, "connection reset by peer"),
            other => panic!("expected RemoteError, got {other:?}"),
        }
    }

    #[test]
    fn no_message_is_unknown() {
        assert!(matches!(
            classify_remote_error(None),
            Doc2PromptError::UnknownError
        ));
    }
}
