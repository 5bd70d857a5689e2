/*!
 * # brailleflow - document to braille translation and pagination
 *
 * A Rust library that turns text, optionally with embedded math, into
 * paginated braille ready for the screen or an embosser.
 *
 * ## Features
 *
 * - Transliteration through a pluggable engine:
 *   - the liblouis command-line tool
 *   - a runtime loaded from compiled or interpreted artifacts
 *   - an in-process mock for tests and dry runs
 * - Math segments (`$$...$$` and `\(...\)`) rendered to Nemeth or UEB math
 * - Chunked translation of large documents with progress reporting
 * - A background worker where a newer request always supersedes an older one
 * - Word-aware wrapping and pagination to a fixed page geometry
 * - Embosser output with CRLF line endings and form-feed page breaks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `engine`: Transliteration engines and their bootstrap
 * - `math`: Math segmentation and rendering
 * - `translation`: Chunking, jobs and orchestration
 * - `worker`: Background worker and its host handle
 * - `layout`: Cell encodings, wrapping and pagination
 * - `tables`: Registry of known braille tables
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod engine;
pub mod errors;
pub mod file_utils;
pub mod layout;
pub mod math;
pub mod tables;
pub mod translation;
pub mod worker;

// Re-export main types for easier usage
pub use app_config::Config;
pub use engine::{CommandEngine, MockEngine, TranslationEngine};
pub use errors::{AppError, BootstrapError, EngineError, MathRenderError, TranslationError};
pub use layout::{PageGeometry, display_pages, embosser_output};
pub use math::{MathCode, MathRenderer};
pub use translation::{TranslationJob, TranslationRequest, Translator};
pub use worker::{BrailleWorker, WorkerEvent, WorkerHandle};
