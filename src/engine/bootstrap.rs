/*!
 * Engine bootstrap.
 *
 * Brings up the transliteration runtime once per worker:
 * 1. Fetch the runtime artifact and detect its kind from the leading bytes
 * 2. Load it with the matching `LoadStrategy` and wait for the runtime to initialize
 * 3. Fetch and link the adaptor that exposes the translate capability
 * 4. Switch the engine to on-demand table loading
 *
 * Every step can fail; any failure aborts the whole bootstrap. There are no
 * retries: the worker that owns the bootstrap has to be recreated.
 */

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error, info};
use std::sync::Arc;

use super::runtime::{ArtifactSource, RuntimeKind};
use super::TranslationEngine;
use crate::app_config::EngineConfig;
use crate::errors::BootstrapError;

/// The environment that executes runtime builds
///
/// Implementations own the actual runtime; the bootstrap only sequences the calls.
#[async_trait]
pub trait RuntimeHost: Send + Sync {
    /// Instantiate a compiled binary module
    async fn instantiate_module(&self, module: Bytes) -> Result<(), BootstrapError>;

    /// Execute the source of the portable interpreted build
    async fn evaluate_source(&self, source: &str) -> Result<(), BootstrapError>;

    /// Resolve once the runtime reports it has finished initializing
    async fn wait_initialized(&self) -> Result<(), BootstrapError>;

    /// Link the adaptor script and return the engine it exposes
    ///
    /// Returns `None` when the adaptor does not expose a translate capability.
    async fn link_adaptor(
        &self,
        adaptor: Bytes,
    ) -> Result<Option<Arc<dyn TranslationEngine>>, BootstrapError>;
}

/// One way of loading a runtime artifact into a host
#[async_trait]
pub trait LoadStrategy: Send + Sync {
    /// The artifact kind this strategy loads
    fn kind(&self) -> RuntimeKind;

    /// Load `payload` into `host` and wait for the runtime to come up
    async fn load(&self, host: &dyn RuntimeHost, payload: Bytes) -> Result<(), BootstrapError>;
}

/// Loads compiled binary modules
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledModuleStrategy;

#[async_trait]
impl LoadStrategy for CompiledModuleStrategy {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::CompiledModule
    }

    async fn load(&self, host: &dyn RuntimeHost, payload: Bytes) -> Result<(), BootstrapError> {
        host.instantiate_module(payload).await?;
        host.wait_initialized().await
    }
}

/// Loads the portable interpreted build from source text
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpretedStrategy;

#[async_trait]
impl LoadStrategy for InterpretedStrategy {
    fn kind(&self) -> RuntimeKind {
        RuntimeKind::InterpretedSource
    }

    async fn load(&self, host: &dyn RuntimeHost, payload: Bytes) -> Result<(), BootstrapError> {
        let source = std::str::from_utf8(&payload).map_err(|e| {
            BootstrapError::FallbackUnexecutable(format!(
                "payload is neither a compiled module nor source text ({})",
                e
            ))
        })?;
        host.evaluate_source(source).await?;
        host.wait_initialized().await
    }
}

/// Select the load strategy for a detected runtime kind
pub fn strategy_for(kind: RuntimeKind) -> &'static dyn LoadStrategy {
    match kind {
        RuntimeKind::CompiledModule => &CompiledModuleStrategy,
        RuntimeKind::InterpretedSource => &InterpretedStrategy,
    }
}

/// Loads the transliteration runtime and produces a ready engine handle
#[derive(Debug, Clone)]
pub struct EngineBootstrap {
    source: ArtifactSource,
    runtime_path: String,
    adaptor_path: String,
    tables_path: String,
}

impl EngineBootstrap {
    /// Create a bootstrap that loads artifacts from `source`
    pub fn new(
        source: ArtifactSource,
        runtime_path: impl Into<String>,
        adaptor_path: impl Into<String>,
        tables_path: impl Into<String>,
    ) -> Self {
        Self {
            source,
            runtime_path: runtime_path.into(),
            adaptor_path: adaptor_path.into(),
            tables_path: tables_path.into(),
        }
    }

    /// Create a bootstrap from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self, BootstrapError> {
        let source = match &config.base_url {
            Some(base) if !base.is_empty() => ArtifactSource::http(base)?,
            _ => ArtifactSource::directory(&config.assets_dir),
        };
        Ok(Self::new(
            source,
            config.runtime_path.clone(),
            config.adaptor_path.clone(),
            config.tables_path.clone(),
        ))
    }

    /// Run every bootstrap step against `host`
    pub async fn initialize(
        &self,
        host: &dyn RuntimeHost,
    ) -> Result<Arc<dyn TranslationEngine>, BootstrapError> {
        let result = self.run_steps(host).await;
        if let Err(e) = &result {
            error!("Engine bootstrap failed: {}", e);
        }
        result
    }

    async fn run_steps(
        &self,
        host: &dyn RuntimeHost,
    ) -> Result<Arc<dyn TranslationEngine>, BootstrapError> {
        let payload = self.source.fetch(&self.runtime_path).await?;
        let kind = RuntimeKind::detect(&payload);
        debug!("Runtime artifact is {} bytes, detected {:?}", payload.len(), kind);

        strategy_for(kind).load(host, payload).await?;

        let adaptor = self.source.fetch(&self.adaptor_path).await?;
        let engine = host
            .link_adaptor(adaptor)
            .await?
            .ok_or(BootstrapError::MissingCapability("translate"))?;

        let tables = self.source.resolve(&self.tables_path)?;
        engine.enable_on_demand_tables(&tables);

        info!("Braille engine '{}' ready ({:?}, tables from {})", engine.name(), kind, tables);
        Ok(engine)
    }
}
