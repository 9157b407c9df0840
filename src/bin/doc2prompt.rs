//! CLI binary for doc2prompt.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GenerationConfig`, drives a `Session`, and prints the template.

use anyhow::{Context, Result};
use clap::Parser;
use doc2prompt::{GenerationConfig, RequestState, Session};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate a template from a Word document (stdout)
  doc2prompt giao-an.docx --api-key $GEMINI_API_KEY

  # Plain-text input, write the template to a file
  doc2prompt report.txt -o generated-prompt.txt

  # Read the document from stdin
  cat notes.md | doc2prompt -

  # Use a different model, without the search tool
  doc2prompt --model gemini-2.5-pro --no-search contract.docx

  # Copy the template straight to the clipboard
  doc2prompt letter.docx --copy

  # Structured JSON output (template + stats)
  doc2prompt report.docx --json > out.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY         Google AI Studio API key (same as --api-key)
  DOC2PROMPT_MODEL       Override model ID

SETUP:
  1. Get a key:   https://aistudio.google.com/apikey
  2. Export it:   export GEMINI_API_KEY=...
  3. Generate:    doc2prompt document.docx

The key is used for the one request and never written to disk.
"#;

/// Generate a reusable prompt template from a document using Gemini.
#[derive(Parser, Debug)]
#[command(
    name = "doc2prompt",
    version,
    about = "Generate a reusable prompt template from a document using Gemini",
    long_about = "Analyse a document (.docx or plain text) with the Gemini API and produce a \
reusable prompt template: a user-configuration block of variable placeholders followed by an \
AI-instruction block embedding the fixed boilerplate.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input document: .docx, a text file, or '-' for stdin.
    input: String,

    /// Google AI Studio API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model ID (e.g. gemini-2.5-flash, gemini-2.5-pro).
    #[arg(long, env = "DOC2PROMPT_MODEL", default_value = doc2prompt::DEFAULT_MODEL)]
    model: String,

    /// Write the template to this file instead of stdout.
    #[arg(short, long, env = "DOC2PROMPT_OUTPUT")]
    output: Option<PathBuf>,

    /// Disable the service-side search tool.
    #[arg(long, env = "DOC2PROMPT_NO_SEARCH")]
    no_search: bool,

    /// Path to a text file containing a custom system instruction.
    #[arg(long, env = "DOC2PROMPT_SYSTEM_INSTRUCTION")]
    system_instruction: Option<PathBuf>,

    /// Copy the template to the system clipboard.
    #[cfg(feature = "clipboard")]
    #[arg(long)]
    copy: bool,

    /// Output structured JSON (template + stats) instead of plain text.
    #[arg(long, env = "DOC2PROMPT_JSON")]
    json: bool,

    /// Per-call HTTP timeout in seconds.
    #[arg(long, env = "DOC2PROMPT_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Disable the progress spinner.
    #[arg(long, env = "DOC2PROMPT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2PROMPT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the template itself.
    #[arg(short, long, env = "DOC2PROMPT_QUIET")]
    quiet: bool,
}

/// Fixed spinner message sequence shown while the request is in flight.
///
/// Purely decorative: the timings are made up and the sequence never gates
/// the real completion — the spinner is cleared the moment the call settles,
/// wherever the animation happens to be.
const LOADING_STEPS: [(&str, u64); 5] = [
    ("Bắt đầu quá trình phân tích...", 200),
    ("Đang phân tích cấu trúc tài liệu...", 800),
    ("Xác định các yếu tố và biến số chính...", 1500),
    ("Xây dựng prompt tối ưu dựa trên phân tích...", 2000),
    ("Hoàn tất và chuẩn bị hiển thị...", 1200),
];

fn make_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("AI đang làm việc");
    bar.set_message("Khởi tạo...");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and session ─────────────────────────────────────────
    let config = build_config(&cli).await?;
    let mut session = Session::new(config);
    session.set_credential(&cli.api_key);

    match read_input(&cli.input)? {
        InputDocument::Text(text) => session.set_input_text(text),
        InputDocument::Docx(bytes) => {
            if !session.ingest_document(bytes).await {
                if let RequestState::Failed { message, .. } = session.state() {
                    eprintln!("{} {}", red("✘"), message);
                }
                std::process::exit(1);
            }
        }
    }

    // ── Run generation with the decorative spinner ───────────────────────
    let spinner = show_progress.then(make_spinner);
    let decorator = spinner.clone().map(|bar| {
        tokio::spawn(async move {
            for (text, delay_ms) in LOADING_STEPS {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                bar.set_message(text);
            }
        })
    });

    session.submit().await;

    if let Some(task) = decorator {
        task.abort();
    }
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    // ── Report the outcome ───────────────────────────────────────────────
    match session.state() {
        RequestState::Succeeded(prompt) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(prompt).context("Failed to serialise output")?
                );
            } else if let Some(ref output_path) = cli.output {
                session
                    .save_to_file(output_path)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                if !cli.quiet {
                    eprintln!(
                        "{} {}  {}",
                        green("✔"),
                        bold(&output_path.display().to_string()),
                        dim(&format!("{}ms", prompt.stats.duration_ms)),
                    );
                }
            } else {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(prompt.text.as_bytes())
                    .context("Failed to write to stdout")?;
                if !prompt.text.ends_with('\n') {
                    handle.write_all(b"\n").ok();
                }
                if !cli.quiet {
                    eprintln!(
                        "{}",
                        dim(&format!(
                            "{} — {}ms",
                            prompt.stats.model, prompt.stats.duration_ms
                        ))
                    );
                }
            }

            #[cfg(feature = "clipboard")]
            if cli.copy {
                let mut clipboard = doc2prompt::SystemClipboard::new()
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                session
                    .copy_to(&mut clipboard)
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?;
                if !cli.quiet {
                    eprintln!("{} Đã sao chép vào clipboard!", green("✔"));
                }
            }

            Ok(())
        }
        RequestState::Failed { message, .. } => {
            eprintln!("{} {}", red("✘"), message);
            std::process::exit(1);
        }
        // submit() always settles; these are unreachable in practice.
        other => anyhow::bail!("unexpected session state: {other:?}"),
    }
}

/// Map CLI args to `GenerationConfig`.
async fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .model(&cli.model)
        .enable_search(!cli.no_search)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref path) = cli.system_instruction {
        let instruction = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system instruction from {:?}", path))?;
        builder = builder.system_instruction(instruction);
    }

    builder.build().context("Invalid configuration")
}

/// The input document, as read from disk or stdin.
enum InputDocument {
    /// Already plain text; set on the session directly.
    Text(String),
    /// A .docx binary; goes through the session's ingest/extraction path.
    Docx(Vec<u8>),
}

/// Read the input: stdin, a .docx binary, or a plain-text file.
fn read_input(input: &str) -> Result<InputDocument> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(InputDocument::Text(text));
    }

    let path = PathBuf::from(input);
    if !path.exists() {
        anyhow::bail!("File not found: '{}'", path.display());
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("docx") => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;
            Ok(InputDocument::Docx(bytes))
        }
        _ => std::fs::read_to_string(&path)
            .map(InputDocument::Text)
            .with_context(|| format!("Failed to read {:?} as UTF-8 text", path)),
    }
}
