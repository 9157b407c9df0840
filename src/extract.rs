//! Document extraction: flatten a `.docx` binary to plain text.
//!
//! A `.docx` file is a ZIP container whose main body lives in
//! `word/document.xml`. Only the flattened text is consumed — styles, tables,
//! images and the rest of the package are ignored, matching what the
//! generation instruction needs (the model re-derives structure from the text
//! itself). We validate the ZIP magic bytes before opening the archive so
//! callers get a meaningful error rather than a parser failure deep inside.
//!
//! Text reconstruction rules, in document order:
//! * `w:t` runs contribute their character data
//! * `w:tab` → tab, `w:br` / `w:cr` → newline
//! * each closed `w:p` paragraph becomes one block, blocks joined by a blank
//!   line
//!
//! Extraction is CPU-bound, so the async wrapper runs it on
//! `spawn_blocking` to keep it off the executor's hot path.

use crate::error::Doc2PromptError;
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use std::io::{Cursor, Read};
use tracing::debug;

/// ZIP local-file-header magic ("PK\x03\x04").
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

static RE_EXCESS_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Flatten a `.docx` binary to plain text (async).
///
/// Runs [`extract_docx_text`] on a blocking thread.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, Doc2PromptError> {
    tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
        .await
        .map_err(|e| Doc2PromptError::Internal(format!("extraction task panicked: {e}")))?
}

/// Flatten a `.docx` binary to plain text.
///
/// Fails with [`Doc2PromptError::Extraction`] on anything that is not a
/// well-formed docx container: wrong magic, missing `word/document.xml`,
/// or malformed XML.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, Doc2PromptError> {
    if bytes.len() < ZIP_MAGIC.len() || bytes[..ZIP_MAGIC.len()] != ZIP_MAGIC {
        return Err(Doc2PromptError::Extraction {
            detail: "not a ZIP container (bad magic bytes)".into(),
        });
    }

    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| Doc2PromptError::Extraction {
            detail: format!("invalid docx archive: {e}"),
        })?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| Doc2PromptError::Extraction {
            detail: format!("word/document.xml missing: {e}"),
        })?
        .read_to_string(&mut document_xml)
        .map_err(|e| Doc2PromptError::Extraction {
            detail: format!("failed to read word/document.xml: {e}"),
        })?;

    let text = flatten_document_xml(&document_xml)?;
    debug!(chars = text.len(), "Extracted docx text");
    Ok(text)
}

/// Walk `word/document.xml` and reconstruct the visible text.
fn flatten_document_xml(xml: &str) -> Result<String, Doc2PromptError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let chunk = t.unescape().map_err(|e| Doc2PromptError::Extraction {
                    detail: format!("invalid character data: {e}"),
                })?;
                current.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Doc2PromptError::Extraction {
                    detail: format!("malformed document XML: {e}"),
                });
            }
        }
    }

    if !current.trim().is_empty() {
        paragraphs.push(current);
    }

    let joined = paragraphs.join("\n\n");
    Ok(RE_EXCESS_BLANK_LINES
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string())
}
