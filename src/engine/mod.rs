/*!
 * Transliteration engine integration.
 *
 * This module contains the capability interface the pipeline translates
 * through, and the ways of obtaining one:
 * - `bootstrap`: loads a runtime artifact through a `RuntimeHost`
 * - `runtime`: fetches runtime artifacts and detects their kind
 * - `command`: drives the liblouis command-line tool
 * - `mock`: in-process engine for tests and dry runs
 */

use log::{debug, info};
use std::fmt::Debug;
use std::sync::Arc;

use crate::app_config::{EngineConfig, EngineKind};
use crate::errors::{BootstrapError, EngineError};

/// Common trait for braille transliteration engines
///
/// Calls are synchronous and CPU-bound. The worker runs them on a blocking
/// thread and never issues two calls at once.
pub trait TranslationEngine: Send + Sync + Debug {
    /// Translate `text` with the table identified by `table`
    ///
    /// # Returns
    /// * `Result<String, EngineError>` - Braille text, or the failure the engine signalled
    fn translate(&self, table: &str, text: &str) -> Result<String, EngineError>;

    /// Fetch tables lazily by key from `base` instead of preloading them
    fn enable_on_demand_tables(&self, base: &str);

    /// Short name used in log messages
    fn name(&self) -> &str;
}

pub mod bootstrap;
pub mod command;
pub mod mock;
pub mod runtime;

pub use bootstrap::{EngineBootstrap, RuntimeHost};
pub use command::CommandEngine;
pub use mock::{MockBehavior, MockEngine};
pub use runtime::{ArtifactSource, RuntimeKind};

/// Open the engine selected in the configuration.
///
/// The command engine is located first so a missing tool fails here rather than
/// on the first translation. Its table path is only set when the configured
/// table directory exists; otherwise the tool's built-in search path is used.
pub fn open_configured(
    config: &EngineConfig,
) -> Result<Arc<dyn TranslationEngine>, BootstrapError> {
    let engine: Arc<dyn TranslationEngine> = match config.kind {
        EngineKind::Command => {
            let engine = CommandEngine::locate(config.command.as_str())?;
            let tables = config.assets_dir.join(&config.tables_path);
            if tables.is_dir() {
                engine.enable_on_demand_tables(&tables.to_string_lossy());
            } else {
                debug!("No table directory at {:?}, using the tool's default", tables);
            }
            Arc::new(engine)
        }
        EngineKind::Mock => Arc::new(MockEngine::working()),
    };
    info!("Using braille engine '{}'", engine.name());
    Ok(engine)
}
