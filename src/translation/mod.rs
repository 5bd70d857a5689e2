/*!
 * Document translation.
 *
 * This module turns a whole document into braille text. It is split into
 * several submodules:
 *
 * - `chunker`: splits large texts at paragraph and line boundaries
 * - `job`: translation requests, jobs and job ids
 * - `orchestrator`: sequences math segmentation, chunking and the engine
 */

// Re-export main types for easier usage
pub use self::chunker::{Chunk, split};
pub use self::job::{JobId, JobTracker, TranslationJob, TranslationRequest};
pub use self::orchestrator::{JobOutcome, TranslationOptions, Translator, progress_percent};

// Submodules
pub mod chunker;
pub mod job;
pub mod orchestrator;
