//! CLI binary for codedoc.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GeneratorConfig`, runs one generation (or the web page), and prints
//! results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codedoc::pipeline::render::terminal_view;
use codedoc::{
    client_from_config, generate_from_path, write_pdf_file, CodeDocError, ErrorKind,
    GenerationProgressCallback, GeneratorConfig, Outcome, ProgressCallback, DEFAULT_INSTRUCTION,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the model is working. There is a single request per
/// run, so no bar length is ever known; the spinner just changes message as
/// stages finish.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading source…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_request_start(&self, prompt_len: usize) {
        self.bar.set_prefix("Generating");
        self.bar.set_message(format!(
            "Generating document… {}",
            dim(&format!("({prompt_len} prompt chars)"))
        ));
    }

    fn on_completion_received(&self, markdown_len: usize, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} Response received  {}  {}",
            green("✓"),
            dim(&format!("{markdown_len:>6} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.set_prefix("Exporting");
        self.bar.set_message("Building PDF…");
    }

    fn on_export_complete(&self, filename: &str, bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} {}",
            green("✔"),
            bold(filename),
            dim(&format!("({bytes} bytes)"))
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Document a script with the default instruction (llama3 via local Ollama)
  codedoc generate script.py

  # Custom instruction, PDF written to a chosen path
  codedoc generate script.py --prompt "Explain the error handling" -o docs/script.pdf

  # Another Ollama model on another host
  codedoc generate --model codellama --base-url http://gpu-box:11434 script.py

  # Hosted provider through edgequake-llm
  codedoc generate --provider openai --model gpt-4.1-mini script.py

  # Machine-readable result
  codedoc generate --json script.py > result.json

  # Single-page web UI
  codedoc serve --addr 127.0.0.1:8501

ENVIRONMENT:
  CODEDOC_MODEL, CODEDOC_BASE_URL, CODEDOC_PROVIDER, CODEDOC_TIMEOUT,
  CODEDOC_PROMPT, CODEDOC_OUTPUT, CODEDOC_ADDR, CODEDOC_VERBOSE, CODEDOC_QUIET
  RUST_LOG overrides the log filter.
"#;

#[derive(Parser, Debug)]
#[command(
    name = "codedoc",
    version,
    about = "Generate a design document for Python code with a local LLM and export it as PDF",
    after_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging.
    #[arg(short, long, global = true, env = "CODEDOC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "CODEDOC_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a document for one Python file.
    Generate(GenerateArgs),

    /// Serve the single-page web UI.
    #[cfg(feature = "server")]
    Serve(ServeArgs),
}

/// Completion-service selection, shared by every subcommand.
#[derive(Args, Debug)]
struct ServiceArgs {
    /// Model name (default: llama3).
    #[arg(long, env = "CODEDOC_MODEL")]
    model: Option<String>,

    /// Ollama base URL (default: http://localhost:11434).
    #[arg(long, env = "CODEDOC_BASE_URL")]
    base_url: Option<String>,

    /// Route through an edgequake-llm provider instead of native Ollama:
    /// openai, anthropic, gemini, azure, …
    #[arg(long, env = "CODEDOC_PROVIDER")]
    provider: Option<String>,

    /// Completion timeout in seconds. Unset waits indefinitely.
    #[arg(long, env = "CODEDOC_TIMEOUT")]
    timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Python source file (.py).
    file: PathBuf,

    /// Instruction substituted into the prompt template.
    #[arg(short, long, env = "CODEDOC_PROMPT", default_value = DEFAULT_INSTRUCTION)]
    prompt: String,

    /// Write the PDF here instead of `<output-dir>/code_document_<timestamp>.pdf`.
    #[arg(short, long, env = "CODEDOC_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for the timestamped PDF when `--output` is not given.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Strip an outer ```markdown fence and normalise line endings.
    #[arg(long)]
    clean: bool,

    /// PDF font size in points.
    #[arg(long, default_value_t = 12.0)]
    font_size: f32,

    /// Print only the generated Markdown to stdout.
    #[arg(long, conflicts_with = "json")]
    markdown_only: bool,

    /// Print the result as JSON (markdown, filename, stats).
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long)]
    no_progress: bool,

    #[command(flatten)]
    service: ServiceArgs,
}

#[cfg(feature = "server")]
#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen address.
    #[arg(long, env = "CODEDOC_ADDR", default_value = "127.0.0.1:8501")]
    addr: std::net::SocketAddr,

    /// Strip an outer ```markdown fence and normalise line endings.
    #[arg(long)]
    clean: bool,

    #[command(flatten)]
    service: ServiceArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the feedback for `generate`; library logs would
    // tear through it.
    let show_progress = match &cli.command {
        Command::Generate(args) => !cli.quiet && !args.no_progress && !args.json,
        #[cfg(feature = "server")]
        Command::Serve(_) => false,
    };
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

    match cli.command {
        Command::Generate(args) => run_generate(args, cli.quiet, show_progress).await,
        #[cfg(feature = "server")]
        Command::Serve(args) => run_serve(args).await,
    }
}

async fn run_generate(args: GenerateArgs, quiet: bool, show_progress: bool) -> Result<()> {
    let mut config = apply_service(GeneratorConfig::builder(), &args.service)
        .clean_response(args.clean)
        .font_size(args.font_size)
        .build()
        .context("Invalid configuration")?;
    let client = client_from_config(&config.service).unwrap_or_else(|e| fail(e));

    // The spinner starts only once nothing before the request can exit.
    let progress = show_progress.then(CliProgressCallback::new);
    if let Some(ref cb) = progress {
        config.progress_callback = Some(cb.clone() as ProgressCallback);
    }

    let outcome = generate_from_path(client.as_ref(), &args.file, &args.prompt, &config).await;
    if let Some(ref cb) = progress {
        cb.abandon();
    }

    let doc = match outcome.unwrap_or_else(|e| fail(e)) {
        Outcome::NeedsInput { message } => {
            eprintln!("{} {}", cyan("ℹ"), message);
            return Ok(());
        }
        Outcome::Generated(doc) => doc,
    };

    let target = args
        .output
        .unwrap_or_else(|| args.output_dir.join(&doc.pdf.filename));
    write_pdf_file(&doc.pdf, &target).await.unwrap_or_else(|e| fail(e));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = serde_json::json!({
            "markdown": doc.markdown,
            "filename": doc.pdf.filename,
            "path": target.display().to_string(),
            "stats": doc.stats,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    } else if args.markdown_only {
        out.write_all(doc.markdown.as_bytes())?;
        if !doc.markdown.ends_with('\n') {
            writeln!(out)?;
        }
    } else {
        out.write_all(terminal_view(&doc.source, &doc.markdown).as_bytes())?;
    }
    out.flush()?;

    if !quiet {
        let s = &doc.stats;
        eprintln!(
            "{} PDF written to {}  {}",
            green("✔"),
            bold(&target.display().to_string()),
            dim(&format!(
                "model {:.1}s · export {}ms · total {:.1}s",
                s.llm_duration_ms as f64 / 1000.0,
                s.export_duration_ms,
                s.total_duration_ms as f64 / 1000.0
            )),
        );
    }
    Ok(())
}

#[cfg(feature = "server")]
async fn run_serve(args: ServeArgs) -> Result<()> {
    use codedoc::server::{serve, AppState};

    let config = apply_service(GeneratorConfig::builder(), &args.service)
        .clean_response(args.clean)
        .build()
        .context("Invalid configuration")?;
    let client = client_from_config(&config.service).unwrap_or_else(|e| fail(e));

    eprintln!(
        "{} {} {}",
        cyan("◆"),
        bold(&format!("Listening on http://{}", args.addr)),
        dim(&format!("({})", client.describe()))
    );
    serve(args.addr, AppState::new(client, config))
        .await
        .unwrap_or_else(|e| fail(e));
    Ok(())
}

fn apply_service(
    mut builder: codedoc::GeneratorConfigBuilder,
    service: &ServiceArgs,
) -> codedoc::GeneratorConfigBuilder {
    if let Some(ref model) = service.model {
        builder = builder.model(model);
    }
    if let Some(ref url) = service.base_url {
        builder = builder.base_url(url);
    }
    if let Some(ref provider) = service.provider {
        builder = builder.provider(provider);
    }
    if let Some(secs) = service.timeout {
        builder = builder.timeout_secs(secs);
    }
    builder
}

/// Print a library error the way the page would show it and exit.
///
/// Exit status 2 for bad input or configuration, 1 for everything else.
fn fail(e: CodeDocError) -> ! {
    let (mark, code) = match e.kind() {
        ErrorKind::Input | ErrorKind::Decode | ErrorKind::Config => (cyan("⚠"), 2),
        _ => (red("✘"), 1),
    };
    eprintln!("{mark} {}", e.user_message());
    std::process::exit(code)
}
