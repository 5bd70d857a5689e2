/*!
 * Engine backed by the liblouis command-line tool.
 *
 * Each translate call runs `lou_translate --forward <table>` with the text on
 * stdin. Tables are looked up through `LOUIS_TABLEPATH`, which is pointed at
 * the on-demand table location.
 */

use log::{debug, warn};
use parking_lot::RwLock;
use std::io::Write;
use std::process::{Command, Stdio};

use super::TranslationEngine;
use crate::errors::{BootstrapError, EngineError};

/// Default name of the liblouis translation tool
pub const DEFAULT_PROGRAM: &str = "lou_translate";

/// Transliteration engine that shells out to `lou_translate`
#[derive(Debug)]
pub struct CommandEngine {
    program: String,
    table_path: RwLock<Option<String>>,
}

impl CommandEngine {
    /// Create an engine for `program` without checking that it exists
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            table_path: RwLock::new(None),
        }
    }

    /// Check that the tool can be started and return an engine for it
    pub fn locate(program: impl Into<String>) -> Result<Self, BootstrapError> {
        let program = program.into();
        let output = Command::new(&program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BootstrapError::ToolUnavailable(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            return Err(BootstrapError::ToolUnavailable(format!(
                "{} --version exited with {}",
                program, output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!("Found {}", version.lines().next().unwrap_or(program.as_str()));
        Ok(Self::new(program))
    }

    /// The program this engine runs
    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, table: &str, text: &str) -> Result<String, EngineError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--forward")
            .arg(table)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(path) = self.table_path.read().as_deref() {
            command.env("LOUIS_TABLEPATH", path);
        }

        let mut child = command
            .spawn()
            .map_err(|e| EngineError::Failed(format!("cannot start {}: {}", self.program, e)))?;

        // Feed stdin from another thread so a full stdout pipe cannot stall the write
        let stdin = child.stdin.take();
        let input = text.to_string();
        let writer = std::thread::spawn(move || match stdin {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        });

        let output = child
            .wait_with_output()
            .map_err(|e| EngineError::Failed(format!("{} did not finish: {}", self.program, e)))?;

        let written = writer.join();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("{} failed for table {}: {}", self.program, table, stderr.trim());
            return Err(EngineError::NoResult {
                table: table.to_string(),
            });
        }

        let program = &self.program;
        written
            .map_err(|_| EngineError::Failed(format!("stdin writer for {} panicked", program)))?
            .map_err(|e| EngineError::Failed(format!("cannot write to {}: {}", program, e)))?;

        String::from_utf8(output.stdout)
            .map_err(|e| EngineError::Failed(format!("{} produced invalid UTF-8: {}", program, e)))
    }
}

/// Undo the line terminator the tool appends when the input had none
pub fn normalize_tool_output(input: &str, mut output: String) -> String {
    if !input.ends_with('\n') && output.ends_with('\n') {
        output.pop();
        if output.ends_with('\r') {
            output.pop();
        }
    }
    output
}

impl TranslationEngine for CommandEngine {
    fn translate(&self, table: &str, text: &str) -> Result<String, EngineError> {
        let output = normalize_tool_output(text, self.run(table, text)?);
        if output.is_empty() && !text.trim().is_empty() {
            return Err(EngineError::NoResult {
                table: table.to_string(),
            });
        }
        Ok(output)
    }

    fn enable_on_demand_tables(&self, base: &str) {
        *self.table_path.write() = Some(base.trim_end_matches('/').to_string());
    }

    fn name(&self) -> &str {
        &self.program
    }
}
