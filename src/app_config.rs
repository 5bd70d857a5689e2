use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::layout::PageGeometry;
use crate::math::MathCode;
use crate::tables::DEFAULT_TABLE;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Page layout settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Engine selection and runtime locations
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Table used when a request does not name one
    #[serde(default = "default_table")]
    pub default_table: String,

    /// Math code used when a request does not name one
    #[serde(default)]
    pub default_math_code: MathCode,

    /// Documents up to this many characters are translated in one call
    #[serde(default = "default_chunk_threshold")]
    pub chunk_threshold: usize,

    /// Maximum characters per chunk for larger documents
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            default_table: default_table(),
            default_math_code: MathCode::default(),
            chunk_threshold: default_chunk_threshold(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Page geometry settings
///
/// Common geometries are 40 x 25 (letter) and 32 x 28 (A4).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Braille cells per row (10..=100)
    #[serde(default = "default_cells_per_row")]
    pub cells_per_row: usize,

    /// Lines per page (5..=50)
    #[serde(default = "default_lines_per_page")]
    pub lines_per_page: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cells_per_row: default_cells_per_row(),
            lines_per_page: default_lines_per_page(),
        }
    }
}

impl LayoutConfig {
    /// Page geometry for the layout stage
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.cells_per_row, self.lines_per_page)
    }
}

/// Which transliteration engine the CLI drives
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// The liblouis command-line tool
    #[default]
    Command,
    /// Built-in mock engine (dry runs)
    Mock,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Engine used by the CLI
    #[serde(default)]
    pub kind: EngineKind,

    /// Program run by the command engine
    #[serde(default = "default_command")]
    pub command: String,

    /// HTTP base for runtime artifacts; artifacts are read from `assets_dir` when unset
    #[serde(default)]
    pub base_url: Option<String>,

    /// Directory holding runtime artifacts when no base URL is set
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Runtime artifact, relative to the artifact root
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,

    /// Adaptor exposing the translate capability, relative to the artifact root
    #[serde(default = "default_adaptor_path")]
    pub adaptor_path: String,

    /// Location tables are loaded from on demand, relative to the artifact root
    #[serde(default = "default_tables_path")]
    pub tables_path: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            command: default_command(),
            base_url: None,
            assets_dir: default_assets_dir(),
            runtime_path: default_runtime_path(),
            adaptor_path: default_adaptor_path(),
            tables_path: default_tables_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Valid range for cells per row
pub const CELLS_PER_ROW_RANGE: std::ops::RangeInclusive<usize> = 10..=100;

/// Valid range for lines per page
pub const LINES_PER_PAGE_RANGE: std::ops::RangeInclusive<usize> = 5..=50;

/// Name of the configuration file looked up by default
pub const DEFAULT_CONFIG_FILE: &str = "brailleflow.json";

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_chunk_threshold() -> usize {
    5_000 // ~900 words, comfortable for one engine call
}

fn default_chunk_size() -> usize {
    5_000
}

fn default_cells_per_row() -> usize {
    40
}

fn default_lines_per_page() -> usize {
    25
}

fn default_command() -> String {
    crate::engine::command::DEFAULT_PROGRAM.to_string()
}

fn default_assets_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("brailleflow"))
        .unwrap_or_else(|| PathBuf::from("public"))
}

fn default_runtime_path() -> String {
    "wasm/liblouis.wasm".to_string()
}

fn default_adaptor_path() -> String {
    "wasm/easy-api.js".to_string()
}

fn default_tables_path() -> String {
    "tables/".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !CELLS_PER_ROW_RANGE.contains(&self.layout.cells_per_row) {
            return Err(anyhow!(
                "cells_per_row must be between {} and {}, got {}",
                CELLS_PER_ROW_RANGE.start(),
                CELLS_PER_ROW_RANGE.end(),
                self.layout.cells_per_row
            ));
        }

        if !LINES_PER_PAGE_RANGE.contains(&self.layout.lines_per_page) {
            return Err(anyhow!(
                "lines_per_page must be between {} and {}, got {}",
                LINES_PER_PAGE_RANGE.start(),
                LINES_PER_PAGE_RANGE.end(),
                self.layout.lines_per_page
            ));
        }

        if self.translation.chunk_size == 0 {
            return Err(anyhow!("chunk_size must be greater than zero"));
        }

        if self.translation.chunk_threshold == 0 {
            return Err(anyhow!("chunk_threshold must be greater than zero"));
        }

        if self.translation.default_table.trim().is_empty() {
            return Err(anyhow!("default_table must not be empty"));
        }

        if self.engine.kind == EngineKind::Command && self.engine.command.trim().is_empty() {
            return Err(anyhow!("engine.command is required for the command engine"));
        }

        Ok(())
    }

    /// Load the configuration at `path`, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        crate::file_utils::FileManager::write_to_file(path, &json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }
}
