// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use brailleflow::app_config::{self, Config, DEFAULT_CONFIG_FILE, EngineKind};
use brailleflow::errors::{AppError, BootstrapError};
use brailleflow::file_utils::{BRF_EXTENSION, DISPLAY_EXTENSION, FileManager};
use brailleflow::layout::{self, PageGeometry, pages_to_embosser};
use brailleflow::math::MathRenderer;
use brailleflow::tables::{self, TABLE_GROUPS};
use brailleflow::translation::TranslationRequest;
use brailleflow::worker::{BrailleWorker, WireEvent, WorkerEvent, WorkerHandle, WorkerSettings};
use brailleflow::engine;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for EngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngine {
    Command,
    Mock,
}

impl From<CliEngine> for EngineKind {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::Command => EngineKind::Command,
            CliEngine::Mock => EngineKind::Mock,
        }
    }
}

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
enum OutputFormat {
    /// Braille ASCII with CRLF line endings and form feeds, for embossers
    Brf,
    /// Unicode braille pages, for reading on screen
    Display,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a text document to paginated braille
    Translate(TranslateArgs),

    /// List the known braille tables
    Tables,

    /// Run a translation worker speaking JSON lines on stdin/stdout
    Worker(WorkerArgs),

    /// Generate shell completions for brailleflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input text file
    #[arg(value_name = "INPUT")]
    input_path: PathBuf,

    /// Braille table key (e.g. 'en-ueb-g2', 'fr-bfu-g2.ctb')
    #[arg(short, long)]
    table: Option<String>,

    /// Math code for formulas ('nemeth' or 'ueb')
    #[arg(short, long)]
    math_code: Option<String>,

    /// Braille cells per row (10-100)
    #[arg(long)]
    cells: Option<usize>,

    /// Lines per page (5-50)
    #[arg(long)]
    lines: Option<usize>,

    /// Output layout
    #[arg(long, value_enum, default_value = "brf")]
    format: OutputFormat,

    /// Output file; defaults to the input name with a .brf or .txt extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Engine to translate with
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct WorkerArgs {
    /// Engine to translate with
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// brailleflow - text to paginated braille
///
/// Translates documents, including LaTeX math, into braille pages for the
/// screen or for an embosser.
#[derive(Parser, Debug)]
#[command(name = "brailleflow")]
#[command(version)]
#[command(about = "Text and math to paginated braille")]
#[command(long_about = "brailleflow translates text documents to braille with liblouis and lays
them out on pages.

EXAMPLES:
    brailleflow translate lesson.txt                    # Embosser-ready lesson.brf
    brailleflow translate -t fr-bfu-g2 notes.txt        # Use a French table
    brailleflow translate --cells 32 --lines 28 a.txt   # A4 page geometry
    brailleflow translate --format display a.txt        # Unicode pages for the screen
    brailleflow translate -e mock a.txt                 # Dry run without liblouis
    brailleflow tables                                  # List known tables
    brailleflow worker < requests.jsonl                 # JSON-lines worker
    brailleflow completions bash > brailleflow.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in brailleflow.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default one
    will be created automatically. Command-line flags override file values.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; `log::set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            // stderr keeps stdout free for worker events and page dumps
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "brailleflow", &mut std::io::stdout());
            Ok(())
        }
        Commands::Tables => {
            print_tables();
            Ok(())
        }
        Commands::Translate(args) => run_translate(args).await,
        Commands::Worker(args) => run_worker(args).await,
    }
}

/// Load the configuration and apply the log level from the CLI or the file
fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(config_path)?;

    match log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

/// Spawn a worker whose engine is opened off the async threads
fn spawn_worker(config: &Config) -> WorkerHandle {
    let engine_config = config.engine.clone();
    let init = async move {
        tokio::task::spawn_blocking(move || engine::open_configured(&engine_config))
            .await
            .map_err(|e| BootstrapError::RuntimeInit(e.to_string()))?
    };

    // No math capability is linked into the CLI; formulas become placeholders
    let math = Arc::new(MathRenderer::unavailable());
    BrailleWorker::spawn(init, math, WorkerSettings::from(config))
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Override config with CLI options if provided
    if let Some(table) = &options.table {
        config.translation.default_table = tables::resolve_table_key(table);
    }
    if let Some(math_code) = &options.math_code {
        config.translation.default_math_code = math_code.parse().unwrap_or_default();
    }
    if let Some(cells) = options.cells {
        config.layout.cells_per_row = cells;
    }
    if let Some(lines) = options.lines {
        config.layout.lines_per_page = lines;
    }
    if let Some(engine) = &options.engine {
        config.engine.kind = engine.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    let output_path = match &options.output {
        Some(path) => path.clone(),
        None => {
            let extension = match options.format {
                OutputFormat::Brf => BRF_EXTENSION,
                OutputFormat::Display => DISPLAY_EXTENSION,
            };
            FileManager::generate_output_path(&options.input_path, None, extension)
        }
    };
    if output_path == options.input_path {
        return Err(anyhow!("Output would overwrite the input file: {:?}", output_path));
    }
    if FileManager::file_exists(&output_path) && !options.force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
        return Ok(());
    }

    let text = FileManager::read_to_string(&options.input_path)?;
    info!(
        "Translating {:?} with {} ({})",
        options.input_path,
        tables::table_label(&config.translation.default_table),
        config.translation.default_math_code
    );

    let translated = translate_with_progress(&config, text).await?;

    let geometry = config.layout.geometry();
    let page_count = write_output(&translated, geometry, options.format, &output_path)?;

    info!(
        "Success: {:?} ({} page{}, {}x{})",
        output_path,
        page_count,
        if page_count == 1 { "" } else { "s" },
        geometry.cells_per_row,
        geometry.lines_per_page
    );
    Ok(())
}

/// Run one request through a worker, showing progress for chunked documents
async fn translate_with_progress(config: &Config, text: String) -> Result<String, AppError> {
    let mut worker = spawn_worker(config);

    let progress_bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.set_message("Translating");

    let pb = progress_bar.clone();
    let request = TranslationRequest::new(text);
    let result = worker
        .translate(request, move |percent| pb.set_position(u64::from(percent)))
        .await;

    // Finish and clear the progress bar so later log lines stay readable
    progress_bar.finish_and_clear();
    worker.shutdown().await;

    Ok(result?)
}

/// Lay out `translated` and write it; returns the number of pages
fn write_output(
    translated: &str,
    geometry: PageGeometry,
    format: OutputFormat,
    output_path: &Path,
) -> Result<usize, AppError> {
    match format {
        OutputFormat::Brf => {
            let pages = layout::embosser_pages(translated, geometry);
            FileManager::write_bytes(output_path, &pages_to_embosser(&pages))
                .map_err(|e| AppError::file(output_path, format!("{:#}", e)))?;
            Ok(pages.len())
        }
        OutputFormat::Display => {
            let pages = layout::display_pages(translated, geometry);
            let mut content = String::new();
            for (index, page) in pages.iter().enumerate() {
                content.push_str(&format!("--- page {} ---\n{}\n", index + 1, page));
            }
            FileManager::write_to_file(output_path, &content)
                .map_err(|e| AppError::file(output_path, format!("{:#}", e)))?;
            Ok(pages.len())
        }
    }
}

fn print_tables() {
    for group in TABLE_GROUPS {
        println!("{}", group.name);
        for table in group.tables {
            println!("  {:<24} {}", table.key, table.label);
        }
    }
}

/// Bridge stdin/stdout JSON lines to a worker.
///
/// Each input line is a request; each output line is an event. Once stdin
/// closes, the bridge waits for the current job to finish and exits.
async fn run_worker(options: WorkerArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.as_ref())?;
    if let Some(engine) = &options.engine {
        config.engine.kind = engine.clone().into();
    }
    config.validate().context("Configuration validation failed")?;

    let mut worker = spawn_worker(&config);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut awaiting_result = false;

    loop {
        if !input_open && !awaiting_result {
            break;
        }

        tokio::select! {
            line = input.next_line(), if input_open => {
                match line.context("Failed to read request from stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match serde_json::from_str::<TranslationRequest>(&line) {
                        Ok(request) => {
                            let id = worker.submit(request);
                            debug!("Accepted request as job {}", id);
                            awaiting_result = true;
                        }
                        Err(e) => emit(&WireEvent::Error {
                            error: format!("Invalid request: {}", e),
                        })?,
                    },
                    None => {
                        debug!("stdin closed");
                        input_open = false;
                    }
                }
            }
            event = worker.recv() => {
                let Some(event) = event else {
                    break;
                };
                emit(&WireEvent::from(&event))?;
                match &event {
                    WorkerEvent::Error { job: None, message } => {
                        error!("Worker failed to start: {}", message);
                        return Err(anyhow!("Worker bootstrap failed: {}", message));
                    }
                    event if event.is_terminal() => awaiting_result = false,
                    _ => {}
                }
            }
        }
    }

    worker.shutdown().await;
    Ok(())
}

fn emit(event: &WireEvent) -> Result<()> {
    let line = serde_json::to_string(event).context("Failed to serialize worker event")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
