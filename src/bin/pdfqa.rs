//! CLI binary for edgequake-pdfqa.
//!
//! A thin shim over the library crate: `serve` runs the question endpoint,
//! `ask` opens a PDF and answers questions about it, either once
//! (`--question`) or interactively.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use edgequake_pdfqa::config::{DEFAULT_MAX_CONTEXT_CHARS, DEFAULT_MODEL, DEFAULT_PROVIDER};
use edgequake_pdfqa::pipeline::input::resolve_document;
use edgequake_pdfqa::{
    server, Answerer, App, Completion, Document, OperationKind, PdfExtractor, PdfQaError,
    QaClient, QaConfig, RemoteAnswerer, ServerConfig, SessionError, SessionObserver,
    SessionView,
};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio_stream::wrappers::LinesStream;
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Spinner observer using indicatif ─────────────────────────────────────────

/// Spinner for one operation kind, with the number of operations of that
/// kind still outstanding.
#[derive(Default)]
struct Spinner {
    bar: Option<ProgressBar>,
    running: usize,
}

/// One spinner per operation kind. A parse may start while an answer for
/// the previous document is still outstanding, so the two are tracked
/// separately. A superseded operation settles as stale after its successor
/// started; the spinner stays up until every operation of its kind settled.
struct CliObserver {
    enabled: bool,
    spinners: Mutex<HashMap<OperationKind, Spinner>>,
}

impl CliObserver {
    fn new(enabled: bool) -> Arc<Self> {
        Arc::new(Self {
            enabled,
            spinners: Mutex::new(HashMap::new()),
        })
    }

    fn start(&self, kind: OperationKind, msg: String) {
        if !self.enabled {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(msg);
        bar.enable_steady_tick(Duration::from_millis(80));

        let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
        let spinner = spinners.entry(kind).or_default();
        spinner.running += 1;
        if let Some(old) = spinner.bar.replace(bar) {
            old.finish_and_clear();
        }
    }

    /// One operation of `kind` is over, applied or stale.
    fn settle(&self, kind: OperationKind) {
        let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(spinner) = spinners.get_mut(&kind) else {
            return;
        };
        spinner.running = spinner.running.saturating_sub(1);
        if spinner.running == 0 {
            if let Some(bar) = spinner.bar.take() {
                bar.finish_and_clear();
            }
        }
    }

    /// Hide every spinner; used on reset. The abandoned operations still
    /// settle later, as stale.
    fn clear(&self) {
        let mut spinners = self.spinners.lock().unwrap_or_else(PoisonError::into_inner);
        for spinner in spinners.values_mut() {
            if let Some(bar) = spinner.bar.take() {
                bar.finish_and_clear();
            }
        }
    }

    #[cfg(test)]
    fn is_spinning(&self, kind: OperationKind) -> bool {
        self.spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .is_some_and(|s| s.bar.is_some())
    }
}

impl SessionObserver for CliObserver {
    fn on_parse_start(&self, name: &str) {
        self.start(OperationKind::Parse, format!("Parsing {name}…"));
    }

    fn on_parse_complete(&self, _page_count: usize) {
        self.settle(OperationKind::Parse);
    }

    fn on_parse_error(&self, _error: &str) {
        self.settle(OperationKind::Parse);
    }

    fn on_ask_start(&self, _question: &str) {
        self.start(OperationKind::Ask, "Thinking…".to_string());
    }

    fn on_answer(&self, _answer_len: usize) {
        self.settle(OperationKind::Ask);
    }

    fn on_ask_error(&self, _error: &str) {
        self.settle(OperationKind::Ask);
    }

    fn on_stale(&self, kind: OperationKind) {
        tracing::debug!("Ignored late {} completion", kind);
        self.settle(kind);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive session
  pdfqa ask report.pdf

  # One question, answer on stdout
  pdfqa ask report.pdf --question "What was the revenue growth?"

  # Same, as JSON
  pdfqa ask report.pdf --question "Who is the author?" --json

  # PDF from a URL
  pdfqa ask https://arxiv.org/pdf/1706.03762

  # Keep the credential on a server, ask from elsewhere
  GEMINI_API_KEY=... pdfqa serve --bind 0.0.0.0:3000
  pdfqa ask report.pdf --server http://host:3000

INTERACTIVE COMMANDS:
  /open <path|url>   Open another PDF (replaces the current one)
  /reset             Close the current PDF
  /status            Show the session state
  /quit              Exit
  anything else      Ask it as a question

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY     Google Gemini API key (default provider)
  OPENAI_API_KEY     OpenAI API key
  ANTHROPIC_API_KEY  Anthropic API key
  PDFQA_PROVIDER     Override provider
  PDFQA_MODEL        Override model ID
  PDFQA_BIND         Address for `pdfqa serve`
  PDFQA_SERVER       Server URL for `pdfqa ask --server`
  PDFIUM_LIB_PATH    Path to libpdfium
"#;

/// Ask questions about a PDF, answered from its content only.
#[derive(Parser, Debug)]
#[command(
    name = "pdfqa",
    version,
    about = "Ask questions about a PDF, answered from its content only",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: gemini, openai, anthropic, ollama, …
    #[arg(long, global = true, env = "PDFQA_PROVIDER", default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// LLM model ID.
    #[arg(long, global = true, env = "PDFQA_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Per-question LLM call timeout in seconds.
    #[arg(long, global = true, env = "PDFQA_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Characters of document text sent with each question.
    #[arg(long, global = true, env = "PDFQA_MAX_CONTEXT_CHARS", default_value_t = DEFAULT_MAX_CONTEXT_CHARS)]
    max_context_chars: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, global = true, env = "PDFQA_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFQA_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and answers.
    #[arg(short, long, global = true, env = "PDFQA_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve POST /api/generate, holding the provider credential.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "PDFQA_BIND", default_value = "127.0.0.1:3000")]
        bind: String,

        /// Largest accepted request body in bytes.
        #[arg(long, env = "PDFQA_MAX_BODY_BYTES", default_value_t = 8 * 1024 * 1024)]
        max_body_bytes: usize,
    },

    /// Open a PDF and ask questions about it.
    Ask {
        /// Local PDF file path or HTTP/HTTPS URL. Optional in interactive mode.
        input: Option<String>,

        /// Ask this one question, print the answer and exit.
        #[arg(long)]
        question: Option<String>,

        /// Answer through a `pdfqa serve` instance instead of calling the
        /// provider directly.
        #[arg(long, env = "PDFQA_SERVER")]
        server: Option<String>,

        /// Print the final session state as JSON (with --question).
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if matches!(cli.command, Command::Serve { .. }) {
        "info"
    } else {
        // Spinners and the prompt are the feedback in `ask`.
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    match cli.command {
        Command::Serve {
            ref bind,
            max_body_bytes,
        } => {
            // Refuse to start without a credential rather than failing every request.
            let client = QaClient::from_config(&config).context("Cannot start server")?;
            let server_config = ServerConfig {
                bind: bind.clone(),
                max_body_bytes,
            };
            if !cli.quiet {
                eprintln!(
                    "{} Serving {} on {}",
                    cyan("◆"),
                    bold(server::GENERATE_PATH),
                    bold(bind)
                );
            }
            server::serve(server_config, Some(Arc::new(client)))
                .await
                .context("Server failed")?;
        }

        Command::Ask {
            ref input,
            ref question,
            ref server,
            json,
        } => {
            let answerer: Arc<dyn Answerer> = match server {
                Some(url) => Arc::new(
                    RemoteAnswerer::new(url, cli.api_timeout)
                        .context("Invalid --server")?
                        .with_max_context_chars(cli.max_context_chars),
                ),
                None => Arc::new(
                    QaClient::from_config(&config).context("LLM provider is not ready")?,
                ),
            };

            let show_progress = !cli.quiet && !json;
            let observer = CliObserver::new(show_progress);
            let app = App::new(PdfExtractor::pdfium(), answerer).with_observer(observer.clone());

            match question {
                Some(q) => {
                    let Some(input) = input else {
                        bail!("--question needs a PDF path or URL");
                    };
                    ask_once(&app, input, q, &config, json).await?;
                }
                None => interactive(app, observer, input.clone(), &config).await?,
            }
        }
    }

    Ok(())
}

/// Map CLI args to `QaConfig`.
fn build_config(cli: &Cli) -> Result<QaConfig> {
    QaConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .api_timeout_secs(cli.api_timeout)
        .max_context_chars(cli.max_context_chars)
        .download_timeout_secs(cli.download_timeout)
        .build()
        .context("Invalid configuration")
}

/// Open `input`, ask `question` and return the final session state.
///
/// Failures the session records (a parse error, a document without text, a
/// failed answer) are left in the view rather than returned.
async fn run_once(
    app: &App,
    input: &str,
    question: &str,
    config: &QaConfig,
) -> Result<SessionView> {
    let doc = resolve_document(input, config.download_timeout_secs)
        .await
        .context("Failed to load PDF")?;
    app.select_document(doc)?.await;

    if app.snapshot().parse_error.is_none() {
        match app.submit_question(question) {
            Ok(answer) => {
                answer.await;
            }
            Err(SessionError::ContentNotReady) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(app.snapshot())
}

/// Open `input`, ask `question`, print the answer.
async fn ask_once(
    app: &App,
    input: &str,
    question: &str,
    config: &QaConfig,
    json: bool,
) -> Result<()> {
    let view = run_once(app, input, question, config).await?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("Failed to serialise session")?
        );
    }

    if let Some(err) = view.parse_error.or(view.ask_error) {
        bail!(err);
    }
    if !json {
        let answer = view.answer.unwrap_or_default();
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(answer.as_bytes())
            .context("Failed to write to stdout")?;
        if !answer.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }
    Ok(())
}

// ── Interactive session ──────────────────────────────────────────────────────

/// Something the interactive loop is waiting on.
enum Event {
    /// A `/open` finished loading. Carries the open stamp it was issued with.
    Loaded(u64, Result<Document, PdfQaError>),
    Done(OperationKind, Completion),
}

type Pending = FuturesUnordered<BoxFuture<'static, Event>>;

enum Line {
    Open(String),
    Reset,
    Status,
    Quit,
    Question(String),
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() {
        return Line::Empty;
    }
    let Some(cmd) = line.strip_prefix('/') else {
        return Line::Question(line.to_string());
    };
    let (name, arg) = cmd.split_once(char::is_whitespace).unwrap_or((cmd, ""));
    match name {
        "open" if !arg.trim().is_empty() => Line::Open(arg.trim().to_string()),
        "reset" => Line::Reset,
        "status" => Line::Status,
        "quit" | "exit" | "q" => Line::Quit,
        _ => Line::Unknown(name.to_string()),
    }
}

fn prompt() {
    eprint!("{} ", cyan("›"));
    io::stderr().flush().ok();
}

fn load(input: String, timeout_secs: u64, stamp: u64) -> BoxFuture<'static, Event> {
    async move { Event::Loaded(stamp, resolve_document(&input, timeout_secs).await) }.boxed()
}

/// Read commands from stdin while parses and questions run alongside.
///
/// Every operation is a future in `pending`; the loop never awaits one
/// directly, so `/reset` and `/open` take effect at once and make whatever
/// was in flight stale. Downloads happen before the session sees the
/// document, so they carry their own stamp: `opened` is bumped by every
/// `/open` and `/reset`, and a load whose stamp is not current is dropped.
async fn interactive(
    app: App,
    observer: Arc<CliObserver>,
    initial: Option<String>,
    config: &QaConfig,
) -> Result<()> {
    let mut pending: Pending = FuturesUnordered::new();
    let mut opened: u64 = 0;
    if let Some(input) = initial {
        opened += 1;
        pending.push(load(input, config.download_timeout_secs, opened));
    } else {
        eprintln!("{}", dim("Open a PDF with /open <path|url>. /quit to exit."));
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());
    prompt();

    loop {
        tokio::select! {
            Some(event) = pending.next(), if !pending.is_empty() => {
                handle_event(&app, event, opened, &mut pending);
                prompt();
            }
            line = lines.next() => {
                let Some(line) = line else { break };
                let line = line.context("Failed to read stdin")?;
                match parse_line(&line) {
                    Line::Empty => {}
                    Line::Quit => break,
                    Line::Open(input) => {
                        opened += 1;
                        pending.push(load(input, config.download_timeout_secs, opened));
                    }
                    Line::Reset => {
                        opened += 1;
                        app.reset_document();
                        observer.clear();
                        eprintln!("{}", dim("Document closed."));
                    }
                    Line::Status => print_status(&app.snapshot()),
                    Line::Question(q) => match app.submit_question(&q) {
                        Ok(fut) => pending.push(
                            fut.map(|c| Event::Done(OperationKind::Ask, c)).boxed(),
                        ),
                        Err(e) => eprintln!("{} {}", red("✗"), e),
                    },
                    Line::Unknown(name) => {
                        eprintln!("{} unknown command /{}", red("✗"), name);
                    }
                }
                prompt();
            }
        }
    }

    observer.clear();
    Ok(())
}

/// Apply one finished operation. `opened` is the stamp of the latest
/// `/open` or `/reset`.
fn handle_event(app: &App, event: Event, opened: u64, pending: &mut Pending) {
    match event {
        Event::Loaded(stamp, _) if stamp != opened => {
            tracing::debug!("Dropped load #{} superseded by #{}", stamp, opened);
        }
        Event::Loaded(_, Err(e)) => eprintln!("{} {}", red("✗"), e),
        Event::Loaded(_, Ok(doc)) => match app.select_document(doc) {
            Ok(fut) => pending.push(fut.map(|c| Event::Done(OperationKind::Parse, c)).boxed()),
            Err(e) => eprintln!("{} {}", red("✗"), e),
        },
        Event::Done(_, Completion::Stale) => {}
        Event::Done(OperationKind::Parse, Completion::Applied) => {
            let view = app.snapshot();
            match view.parse_error {
                Some(err) => eprintln!("{} {}", red("✗"), err),
                None => eprintln!(
                    "{} {}  {}",
                    green("✔"),
                    bold(view.document.as_deref().unwrap_or_default()),
                    dim(view.status.as_deref().unwrap_or_default()),
                ),
            }
        }
        Event::Done(OperationKind::Ask, Completion::Applied) => {
            let view = app.snapshot();
            match (view.answer, view.ask_error) {
                (Some(answer), _) => println!("{answer}"),
                (None, Some(err)) => eprintln!("{} {}", red("✗"), err),
                (None, None) => {}
            }
        }
    }
}

fn print_status(view: &SessionView) {
    let Some(name) = view.document.as_deref() else {
        eprintln!("{}", dim("No document open."));
        return;
    };
    eprintln!(
        "{}  {}",
        bold(name),
        dim(view.status.as_deref().unwrap_or_default())
    );
    if let Some(ref err) = view.parse_error {
        eprintln!("  {} {}", red("✗"), err);
    }
    if !view.question.is_empty() {
        eprintln!("  {} {}", dim("Q:"), view.question);
    }
    if let Some(ref err) = view.ask_error {
        eprintln!("  {} {}", red("✗"), err);
    }
    if view.can_ask {
        eprintln!("  {}", green("Ready to ask questions"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edgequake_pdfqa::error::CONTENT_NOT_READY_MESSAGE;
    use edgequake_pdfqa::pipeline::extract::{BackendError, PageText};
    use edgequake_pdfqa::{AskError, PdfBackend};
    use std::io::Write;

    /// Every document has `self.0` pages of text.
    struct Pages(usize);

    impl PdfBackend for Pages {
        fn read_pages(&self, _bytes: &[u8]) -> Result<Vec<PageText>, BackendError> {
            Ok((1..=self.0)
                .map(|n| PageText::new(n, vec![format!("page {n}")]))
                .collect())
        }
    }

    struct Echo;

    #[async_trait]
    impl Answerer for Echo {
        async fn answer(&self, _context: &str, question: &str) -> Result<String, AskError> {
            Ok(format!("**{question}**"))
        }
    }

    fn test_app(pages: usize) -> App {
        App::new(PdfExtractor::new(Arc::new(Pages(pages))), Arc::new(Echo))
    }

    fn pdf(name: &str) -> Document {
        Document::new(name, "application/pdf", b"%PDF-1.7".to_vec())
    }

    /// Hand `events` to the loop in order, then drive what they started.
    async fn drain(app: &App, events: Vec<Event>, opened: u64) {
        let mut pending: Pending = FuturesUnordered::new();
        for event in events {
            handle_event(app, event, opened, &mut pending);
        }
        while let Some(event) = pending.next().await {
            handle_event(app, event, opened, &mut pending);
        }
    }

    #[tokio::test]
    async fn later_open_wins_when_loads_land_out_of_order() {
        let app = test_app(1);
        // `/open slow.pdf` was stamped 1 and `/open fast.pdf` 2; fast lands first.
        drain(
            &app,
            vec![
                Event::Loaded(2, Ok(pdf("fast.pdf"))),
                Event::Loaded(1, Ok(pdf("slow.pdf"))),
            ],
            2,
        )
        .await;
        assert_eq!(app.snapshot().document.as_deref(), Some("fast.pdf"));
    }

    #[tokio::test]
    async fn load_landing_after_reset_is_dropped() {
        let app = test_app(1);
        // `/open late.pdf` was stamped 1, then `/reset` bumped the stamp to 2.
        app.reset_document();
        drain(&app, vec![Event::Loaded(1, Ok(pdf("late.pdf")))], 2).await;

        let view = app.snapshot();
        assert_eq!(view.document, None);
        assert!(!view.can_ask);
    }

    #[tokio::test]
    async fn current_load_is_opened() {
        let app = test_app(2);
        drain(&app, vec![Event::Loaded(3, Ok(pdf("a.pdf")))], 3).await;

        let view = app.snapshot();
        assert_eq!(view.document.as_deref(), Some("a.pdf"));
        assert_eq!(view.page_count, Some(2));
    }

    #[test]
    fn stale_completion_stops_its_spinner() {
        let observer = CliObserver::new(true);
        observer.on_ask_start("q?");
        assert!(observer.is_spinning(OperationKind::Ask));
        observer.on_stale(OperationKind::Ask);
        assert!(!observer.is_spinning(OperationKind::Ask));
    }

    #[test]
    fn stale_predecessor_leaves_successor_spinning() {
        let observer = CliObserver::new(true);
        observer.on_parse_start("old.pdf");
        observer.on_parse_start("new.pdf");
        observer.on_stale(OperationKind::Parse);
        assert!(observer.is_spinning(OperationKind::Parse));
        observer.on_parse_complete(3);
        assert!(!observer.is_spinning(OperationKind::Parse));
    }

    #[tokio::test]
    async fn question_outrun_by_new_document_stops_thinking_spinner() {
        let observer = CliObserver::new(true);
        let app = test_app(1).with_observer(observer.clone());
        app.select_document(pdf("a.pdf")).unwrap().await;

        let ask = app.submit_question("q?").unwrap();
        let parse = app.select_document(pdf("b.pdf")).unwrap();
        assert_eq!(ask.await, Completion::Stale);
        assert!(!observer.is_spinning(OperationKind::Ask));

        parse.await;
        assert!(!observer.is_spinning(OperationKind::Parse));
    }

    #[tokio::test]
    async fn run_once_keeps_text_less_pdf_error_in_view() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7 scanned").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let view = run_once(&test_app(0), &path, "Anything?", &QaConfig::default())
            .await
            .unwrap();
        assert_eq!(view.answer, None);
        assert_eq!(view.ask_error.as_deref(), Some(CONTENT_NOT_READY_MESSAGE));
    }

    #[tokio::test]
    async fn run_once_returns_sanitized_answer() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let view = run_once(&test_app(1), &path, "Who?", &QaConfig::default())
            .await
            .unwrap();
        assert_eq!(view.answer.as_deref(), Some("Who?"));
        assert_eq!(view.ask_error, None);
    }

    #[test]
    fn plain_text_is_a_question() {
        assert!(matches!(parse_line("open questions?"), Line::Question(q) if q == "open questions?"));
    }

    #[test]
    fn slash_commands() {
        assert!(matches!(parse_line("/open a.pdf"), Line::Open(p) if p == "a.pdf"));
        assert!(matches!(parse_line("  /reset "), Line::Reset));
        assert!(matches!(parse_line("/status"), Line::Status));
        assert!(matches!(parse_line("/quit"), Line::Quit));
        assert!(matches!(parse_line("/open"), Line::Unknown(_)));
        assert!(matches!(parse_line("/nope"), Line::Unknown(_)));
        assert!(matches!(parse_line("   "), Line::Empty));
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["pdfqa", "ask", "doc.pdf"]).unwrap();
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert_eq!(cli.max_context_chars, 300_000);
        assert!(matches!(cli.command, Command::Ask { input: Some(ref i), .. } if i == "doc.pdf"));
    }
}
