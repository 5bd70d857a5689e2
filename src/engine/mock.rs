/*!
 * Mock engine implementation for testing.
 *
 * This module provides a mock engine that simulates different behaviors:
 * - `MockEngine::working()` - Always succeeds with a deterministic transliteration
 * - `MockEngine::failing()` - Always signals failure
 * - `MockEngine::fail_on_call(n)` - Fails on the n-th call (1-based)
 * - `MockEngine::empty()` - Returns no output
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::TranslationEngine;
use crate::errors::EngineError;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the given call number (1-based), succeeds otherwise
    FailOnCall(usize),
    /// Returns an empty result for every call
    Empty,
    /// Succeeds after sleeping, to simulate a slow engine
    Slow { delay_ms: u64 },
}

/// Mock engine for testing translation behavior
///
/// The working transliteration maps letters to upper case Braille ASCII and
/// keeps every other character, so output length equals input length.
#[derive(Debug, Clone)]
pub struct MockEngine {
    behavior: MockBehavior,
    call_count: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
    table_base: Arc<Mutex<Option<String>>>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(Mutex::new(Vec::new())),
            table_base: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a working mock engine that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock engine
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock engine that fails on call `n` (1-based)
    pub fn fail_on_call(n: usize) -> Self {
        Self::new(MockBehavior::FailOnCall(n))
    }

    /// Create a mock engine that returns empty results
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock engine that sleeps before every call
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every `(table, text)` pair passed to translate, in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    /// Base location passed to `enable_on_demand_tables`, if any
    pub fn table_base(&self) -> Option<String> {
        self.table_base.lock().clone()
    }

    /// The deterministic transliteration used by working mocks
    pub fn transliterate(text: &str) -> String {
        text.chars().map(|c| c.to_ascii_uppercase()).collect()
    }
}

impl TranslationEngine for MockEngine {
    fn translate(&self, table: &str, text: &str) -> Result<String, EngineError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().push((table.to_string(), text.to_string()));

        match self.behavior {
            MockBehavior::Working => Ok(Self::transliterate(text)),
            MockBehavior::Failing => Err(EngineError::NoResult {
                table: table.to_string(),
            }),
            MockBehavior::FailOnCall(n) if n == call => Err(EngineError::NoResult {
                table: table.to_string(),
            }),
            MockBehavior::FailOnCall(_) => Ok(Self::transliterate(text)),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                std::thread::sleep(Duration::from_millis(delay_ms));
                Ok(Self::transliterate(text))
            }
        }
    }

    fn enable_on_demand_tables(&self, base: &str) {
        *self.table_base.lock() = Some(base.to_string());
    }

    fn name(&self) -> &str {
        "mock"
    }
}
