/*!
 * Common test utilities for the brailleflow test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use brailleflow::engine::MockEngine;
use brailleflow::math::MathRenderer;
use brailleflow::translation::TranslationOptions;
use brailleflow::worker::{BrailleWorker, WorkerEvent, WorkerHandle, WorkerSettings};


/// Route library logs to the test output; `RUST_LOG=debug` shows per-chunk detail
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A document of `paragraphs` short paragraphs separated by blank lines
pub fn sample_document(paragraphs: usize) -> String {
    (0..paragraphs)
        .map(|i| {
            format!(
                "Paragraph {} talks about braille.\nIt has a second line with more words.\n\n",
                i + 1
            )
        })
        .collect()
}

/// A short document mixing text with block and inline math
pub fn sample_math_document() -> &'static str {
    "The area is $$\\pi r^2$$ for a circle.\nSolve \\(x + 1 = 2\\) first."
}

/// Chunking options with tiny thresholds so short fixtures get chunked
pub fn small_chunks(size: usize) -> TranslationOptions {
    TranslationOptions {
        chunk_threshold: size,
        chunk_size: size,
    }
}

/// Spawn a worker over a mock engine without math support
pub fn mock_worker(engine: MockEngine, options: TranslationOptions) -> WorkerHandle {
    BrailleWorker::with_engine(
        Arc::new(engine),
        Arc::new(MathRenderer::unavailable()),
        WorkerSettings {
            options,
            ..Default::default()
        },
    )
}

/// Read events until a terminal one arrives, returning all of them
pub async fn collect_until_terminal(worker: &mut WorkerHandle) -> Vec<WorkerEvent> {
    let mut events = Vec::new();
    while let Some(event) = worker.recv().await {
        let terminal = event.is_terminal();
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}
