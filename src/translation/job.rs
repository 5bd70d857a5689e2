/*!
 * Translation requests and jobs.
 *
 * A request is what a caller sends; a job is a request that has been accepted
 * by the worker and given an id. Jobs are never mutated: a newer job for the
 * same caller supersedes the older one.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::MathCode;
use crate::tables::resolve_table_key;

/// Monotonically increasing job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues job ids and remembers which one is current
#[derive(Debug, Default)]
pub struct JobTracker {
    current: AtomicU64,
}

impl JobTracker {
    /// Create a tracker with no job issued yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id and make it current
    pub fn next(&self) -> JobId {
        JobId(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued id, if any
    pub fn current(&self) -> Option<JobId> {
        match self.current.load(Ordering::SeqCst) {
            0 => None,
            id => Some(JobId(id)),
        }
    }

    /// Whether `id` is still the most recently issued job
    pub fn is_current(&self, id: JobId) -> bool {
        self.current.load(Ordering::SeqCst) == id.0
    }
}

/// A translation request as sent by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    /// Source text
    pub text: String,

    /// Table key; the configured default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Math code name; the configured default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math_code: Option<String>,
}

impl TranslationRequest {
    /// Request for `text` with default table and math code
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            table: None,
            math_code: None,
        }
    }

    /// Set the table key
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the math code
    pub fn with_math_code(mut self, math_code: impl Into<String>) -> Self {
        self.math_code = Some(math_code.into());
        self
    }
}

/// An accepted request with its defaults resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationJob {
    /// Job id
    pub id: JobId,
    /// Source text
    pub text: String,
    /// Table key passed to the engine
    pub table: String,
    /// Math code for formulas
    pub math_code: MathCode,
}

impl TranslationJob {
    /// Accept `request` as job `id`, filling in defaults
    pub fn from_request(
        id: JobId,
        request: TranslationRequest,
        default_table: &str,
        default_math_code: MathCode,
    ) -> Self {
        let table = match request.table.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => resolve_table_key(key),
            _ => resolve_table_key(default_table),
        };
        let math_code = match request.math_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => MathCode::parse(code),
            _ => default_math_code,
        };

        Self {
            id,
            text: request.text,
            table,
            math_code,
        }
    }
}
