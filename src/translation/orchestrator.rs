/*!
 * Translation orchestration.
 *
 * Runs one job end to end:
 * - Documents without math are chunked and translated chunk by chunk, with
 *   progress after each chunk. Short documents go through in a single call.
 * - Documents with math are translated segment by segment in source order;
 *   plain segments go to the engine whole, formulas to the math renderer.
 *
 * An engine failure aborts the job and discards everything produced so far.
 * A job that stops being current is abandoned at the next chunk or segment
 * boundary.
 */

use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;

use super::chunker;
use super::job::TranslationJob;
use crate::app_config::TranslationConfig;
use crate::engine::TranslationEngine;
use crate::errors::{EngineError, TranslationError};
use crate::math::segmenter::{self, Segment};
use crate::math::MathRenderer;

/// Chunking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationOptions {
    /// Documents with at most this many characters are translated in one call
    pub chunk_threshold: usize,
    /// Maximum characters per chunk
    pub chunk_size: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            chunk_threshold: 5_000,
            chunk_size: 5_000,
        }
    }
}

impl From<&TranslationConfig> for TranslationOptions {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            chunk_threshold: config.chunk_threshold,
            chunk_size: config.chunk_size,
        }
    }
}

/// How a job ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The full translated document
    Completed(String),
    /// A newer job took over; nothing should be reported
    Superseded,
}

/// Progress percentage after `completed` of `total` chunks.
///
/// Rounded, and held at 99 until the last chunk so 100 only means done.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 || completed >= total {
        return 100;
    }
    let percent = ((completed as f64 / total as f64) * 100.0).round() as u8;
    percent.min(99)
}

/// Sequences segmentation, chunking, math rendering and the engine for a job
#[derive(Clone)]
pub struct Translator {
    engine: Arc<dyn TranslationEngine>,
    math: Arc<MathRenderer>,
    options: TranslationOptions,
}

impl Translator {
    /// Create a translator over an engine and a math renderer
    pub fn new(
        engine: Arc<dyn TranslationEngine>,
        math: Arc<MathRenderer>,
        options: TranslationOptions,
    ) -> Self {
        Self {
            engine,
            math,
            options,
        }
    }

    /// The chunking parameters in use
    pub fn options(&self) -> TranslationOptions {
        self.options
    }

    /// Translate `job`.
    ///
    /// `progress` receives percentages for chunked documents only. `is_current`
    /// is checked before each chunk or segment; once it returns `false` the job
    /// stops and `JobOutcome::Superseded` is returned.
    pub async fn translate<P, C>(
        &self,
        job: &TranslationJob,
        progress: P,
        is_current: C,
    ) -> Result<JobOutcome, TranslationError>
    where
        P: Fn(u8) + Send + Sync,
        C: Fn() -> bool + Send + Sync,
    {
        if job.text.trim().is_empty() {
            debug!("Job {} has no text, nothing to translate", job.id);
            return Ok(JobOutcome::Completed(String::new()));
        }

        let start = Instant::now();
        let result = if segmenter::contains_math(&job.text) {
            self.translate_with_math(job, &is_current).await
        } else {
            self.translate_plain(job, &progress, &is_current).await
        };

        match &result {
            Ok(JobOutcome::Completed(text)) => info!(
                "Job {} translated {} chars to {} cells with {} in {:?}",
                job.id,
                job.text.chars().count(),
                text.chars().count(),
                job.table,
                start.elapsed()
            ),
            Ok(JobOutcome::Superseded) => debug!("Job {} superseded, result dropped", job.id),
            Err(e) => error!("Job {} failed: {}", job.id, e),
        }
        result
    }

    async fn translate_plain<P, C>(
        &self,
        job: &TranslationJob,
        progress: &P,
        is_current: &C,
    ) -> Result<JobOutcome, TranslationError>
    where
        P: Fn(u8) + Send + Sync,
        C: Fn() -> bool + Send + Sync,
    {
        if job.text.chars().count() <= self.options.chunk_threshold {
            let text = self.translate_unit(&job.table, &job.text, 0, 1).await?;
            return Ok(JobOutcome::Completed(text));
        }

        let chunks = chunker::split(&job.text, self.options.chunk_size);
        info!("Job {} split into {} chunks", job.id, chunks.len());

        let mut translated = String::with_capacity(job.text.len());
        for chunk in &chunks {
            if !is_current() {
                return Ok(JobOutcome::Superseded);
            }
            let unit = self
                .translate_unit(&job.table, chunk.text, chunk.index, chunk.total)
                .await?;
            translated.push_str(&unit);

            let percent = progress_percent(chunk.index + 1, chunk.total);
            debug!(
                "Job {} chunk {}/{} done ({}%)",
                job.id,
                chunk.index + 1,
                chunk.total,
                percent
            );
            progress(percent);
        }

        Ok(JobOutcome::Completed(translated))
    }

    async fn translate_with_math<C>(
        &self,
        job: &TranslationJob,
        is_current: &C,
    ) -> Result<JobOutcome, TranslationError>
    where
        C: Fn() -> bool + Send + Sync,
    {
        let segments = segmenter::segment(&job.text);
        // Only plain segments reach the engine, so failures are numbered among them
        let plain_count = segments.iter().filter(|s| !s.is_math()).count();
        debug!(
            "Job {} has {} segments ({} math)",
            job.id,
            segments.len(),
            segments.len() - plain_count
        );

        let mut translated = String::with_capacity(job.text.len());
        let mut plain_index = 0;
        for segment in &segments {
            if !is_current() {
                return Ok(JobOutcome::Superseded);
            }
            match segment {
                Segment::Plain { text, .. } => {
                    let unit = self
                        .translate_unit(&job.table, text, plain_index, plain_count)
                        .await?;
                    plain_index += 1;
                    translated.push_str(&unit);
                }
                Segment::Math { formula, block, .. } => {
                    let braille = self.math.render(formula, *block, job.math_code).await;
                    translated.push_str(&braille);
                }
            }
        }

        Ok(JobOutcome::Completed(translated))
    }

    /// Run one engine call on a blocking thread
    async fn translate_unit(
        &self,
        table: &str,
        text: &str,
        index: usize,
        count: usize,
    ) -> Result<String, TranslationError> {
        let engine = Arc::clone(&self.engine);
        let owned_table = table.to_string();
        let owned_text = text.to_string();

        let result = tokio::task::spawn_blocking(move || {
            engine.translate(&owned_table, &owned_text)
        })
        .await
        .map_err(|e| TranslationError::WorkerFailed(format!("engine call panicked: {}", e)))?;

        let failed = |source: EngineError| TranslationError::EngineTranslationFailed {
            table: table.to_string(),
            chunk_index: index,
            chunk_count: count,
            source,
        };

        match result {
            Ok(output) if output.is_empty() && !text.trim().is_empty() => {
                Err(failed(EngineError::NoResult {
                    table: table.to_string(),
                }))
            }
            Ok(output) => Ok(output),
            Err(e) => Err(failed(e)),
        }
    }
}
