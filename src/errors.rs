/*!
 * Error types for the brailleflow library.
 *
 * This module contains custom error types for the different stages of the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 */

use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

/// Errors that abort engine bootstrap.
///
/// Bootstrap failures are fatal for the worker that hit them; callers must
/// discard the worker and create a new one.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// The runtime artifact or adaptor could not be fetched
    #[error("Failed to fetch {url} (HTTP {status})")]
    FetchFailed {
        /// Location that was requested
        url: String,
        /// HTTP status returned by the server
        status: u16,
    },

    /// The artifact could not be read from disk or the network
    #[error("Cannot load {location}: {message}")]
    LoadFailed {
        /// Location that was requested
        location: String,
        /// Underlying failure
        message: String,
    },

    /// The artifact is neither a compiled module nor executable source
    #[error("Runtime fallback is not executable: {0}")]
    FallbackUnexecutable(String),

    /// The runtime host rejected the artifact
    #[error("Runtime failed to initialize: {0}")]
    RuntimeInit(String),

    /// The adaptor did not expose a capability the pipeline needs
    #[error("Adaptor is missing the required '{0}' capability")]
    MissingCapability(&'static str),

    /// The external translation tool could not be started
    #[error("Translation tool unavailable: {0}")]
    ToolUnavailable(String),

    /// The artifact location could not be resolved
    #[error("Invalid artifact location: {0}")]
    InvalidLocation(String),
}

/// Errors signalled by the transliteration engine for a single call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine produced no result for the given table
    #[error("Engine returned no result for table \"{table}\"")]
    NoResult {
        /// Table key passed to the engine
        table: String,
    },

    /// The engine reported a failure
    #[error("Engine failed: {0}")]
    Failed(String),
}

/// Errors raised inside the math renderer.
///
/// These never escape the renderer: they are converted to a visible placeholder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathRenderError {
    /// The formula could not be converted to math markup
    #[error("Formula could not be parsed: {0}")]
    Parse(String),

    /// The braille math engine could not be configured
    #[error("Math engine setup failed: {0}")]
    Setup(String),

    /// The braille math engine failed to render the markup
    #[error("Math rendering failed: {0}")]
    Render(String),

    /// No math capability is installed
    #[error("Math rendering is not available")]
    Unavailable,
}

/// Errors that abort a translation job
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The engine failed on one chunk; the whole job is aborted
    #[error(
        "Translation failed on chunk {}/{chunk_count} with table \"{table}\": {source}",
        .chunk_index + 1
    )]
    EngineTranslationFailed {
        /// Table key the job was using
        table: String,
        /// Zero-based index of the failing chunk or segment
        chunk_index: usize,
        /// Number of chunks or segments in the job
        chunk_count: usize,
        /// Engine failure
        source: EngineError,
    },

    /// The worker stopped before the job could finish
    #[error("Translation worker failed: {0}")]
    WorkerFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error during engine bootstrap
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Error from the engine
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// File error naming the path it happened on
    pub fn file(path: &Path, error: impl Display) -> Self {
        Self::File(format!("{}: {}", path.display(), error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
