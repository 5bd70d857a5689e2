/*!
 * Math rendering.
 *
 * Converts one formula into braille math:
 * 1. LaTeX is converted to MathML by a `LatexConverter`
 * 2. Presentation wrappers around the `<math>` element are stripped
 * 3. The canonical tree is rendered by a `MathBrailleEngine`
 *
 * Rendering never fails the pipeline. Any failure is logged and replaced by a
 * visible `[Math Error: <formula>]` placeholder.
 */

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{LatexConverter, MathBrailleEngine, MathCode};
use crate::errors::MathRenderError;

static MATH_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<math[^>]*>(.*?)</math>").expect("math element pattern is valid")
});

/// Placeholder inserted in place of a formula that could not be rendered
pub fn error_placeholder(formula: &str) -> String {
    format!("[Math Error: {}]", formula)
}

/// Keep only the `<math>` element of converter output, without its attributes.
///
/// Markup without a `<math>` element is returned unchanged.
pub fn strip_math_wrappers(markup: &str) -> String {
    match MATH_ELEMENT.captures(markup) {
        Some(captures) => format!("<math>{}</math>", &captures[1]),
        None => markup.to_string(),
    }
}

/// Renders formulas, reconfiguring the braille math engine only when the
/// requested math code changes.
///
/// The configured-code cache and the configure-then-render sequence share one
/// lock, so concurrent calls with different codes run one after another.
pub struct MathRenderer {
    converter: Arc<dyn LatexConverter>,
    engine: Arc<dyn MathBrailleEngine>,
    configured: Mutex<Option<MathCode>>,
}

impl MathRenderer {
    /// Create a renderer over the given capabilities
    pub fn new(converter: Arc<dyn LatexConverter>, engine: Arc<dyn MathBrailleEngine>) -> Self {
        Self {
            converter,
            engine,
            configured: Mutex::new(None),
        }
    }

    /// Renderer for hosts without a math capability; every formula becomes a placeholder
    pub fn unavailable() -> Self {
        let backend = Arc::new(UnavailableMath);
        Self::new(backend.clone(), backend)
    }

    /// The math code the engine is currently configured for
    pub async fn configured_code(&self) -> Option<MathCode> {
        *self.configured.lock().await
    }

    /// Render `formula` for `math_code`, falling back to a placeholder on failure
    pub async fn render(&self, formula: &str, block: bool, math_code: MathCode) -> String {
        match self.try_render(formula, block, math_code).await {
            Ok(braille) => braille,
            Err(e) => {
                warn!("Math translation failed for '{}': {}", formula, e);
                error_placeholder(formula)
            }
        }
    }

    async fn try_render(
        &self,
        formula: &str,
        block: bool,
        math_code: MathCode,
    ) -> Result<String, MathRenderError> {
        let mut configured = self.configured.lock().await;

        if *configured != Some(math_code) {
            debug!(
                "Configuring math engine for {} (domain={}, locale={})",
                math_code,
                math_code.domain(),
                math_code.locale()
            );
            // A failed setup leaves the cache empty so the next call retries
            *configured = None;
            self.engine.setup(math_code.domain(), math_code.locale()).await?;
            *configured = Some(math_code);
        }

        let markup = self.converter.to_mathml(formula, block)?;
        let canonical = strip_math_wrappers(&markup);
        self.engine.to_braille(&canonical)
    }
}

/// Math backend used when no converter or engine is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableMath;

impl LatexConverter for UnavailableMath {
    fn to_mathml(&self, _formula: &str, _display: bool) -> Result<String, MathRenderError> {
        Err(MathRenderError::Unavailable)
    }
}

#[async_trait]
impl MathBrailleEngine for UnavailableMath {
    async fn setup(&self, _domain: &str, _locale: &str) -> Result<(), MathRenderError> {
        Ok(())
    }

    fn to_braille(&self, _mathml: &str) -> Result<String, MathRenderError> {
        Err(MathRenderError::Unavailable)
    }
}
