//! Destinations for rendered interaction blocks.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;

/// Where rendered interaction blocks go.
///
/// A sink receives whole blocks. Implementations must write each block
/// atomically so concurrent tests do not interleave lines.
pub trait LogSink: Send + Sync {
    /// Writes one rendered block.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    fn write_block(&self, block: &str) -> io::Result<()>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Writes blocks to standard output.
///
/// Blocks go through `print!`, so the test harness captures them and only
/// shows the exchanges of failing tests (or all of them under
/// `--nocapture`). Each block is a single `print!` call and is written under
/// one stdout lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        println!("{block}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}

/// Writes blocks to standard error, captured like [`StdoutSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        eprintln!("{block}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stderr"
    }
}

/// Emits blocks as `tracing` events under the `hermes::interaction` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        tracing::info!(target: "hermes::interaction", "\n{block}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// Keeps blocks in memory. Used to assert on log output in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    blocks: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every block written so far.
    #[must_use]
    pub fn blocks(&self) -> Vec<String> {
        self.blocks.lock().clone()
    }

    /// Returns the number of blocks written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.lock().is_empty()
    }

    /// Discards all blocks.
    pub fn clear(&self) {
        self.blocks.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_block(&self, block: &str) -> io::Result<()> {
        self.blocks.lock().push(block.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Sink selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// [`StdoutSink`].
    #[default]
    Stdout,
    /// [`StderrSink`].
    Stderr,
    /// [`TracingSink`].
    Tracing,
}

impl SinkKind {
    /// Parses a sink name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            "tracing" => Some(Self::Tracing),
            _ => None,
        }
    }
}

/// Builds the sink for a configured kind.
#[must_use]
pub fn sink_for(kind: SinkKind) -> Arc<dyn LogSink> {
    match kind {
        SinkKind::Stdout => Arc::new(StdoutSink),
        SinkKind::Stderr => Arc::new(StderrSink),
        SinkKind::Tracing => Arc::new(TracingSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_collects_blocks() {
        let sink = MemorySink::new();
        let shared = sink.clone();

        sink.write_block("first").unwrap();
        sink.write_block("second").unwrap();

        assert_eq!(shared.len(), 2);
        assert_eq!(shared.blocks(), vec!["first", "second"]);

        shared.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_kind_parse() {
        assert_eq!(SinkKind::parse("STDERR"), Some(SinkKind::Stderr));
        assert_eq!(SinkKind::parse(" tracing "), Some(SinkKind::Tracing));
        assert_eq!(SinkKind::parse("file"), None);
    }

    #[test]
    fn test_sink_kind_serde() {
        let kind: SinkKind = serde_json::from_str("\"stdout\"").unwrap();
        assert_eq!(kind, SinkKind::Stdout);
        assert_eq!(serde_json::to_string(&SinkKind::Tracing).unwrap(), "\"tracing\"");
    }

    #[test]
    fn test_sink_for() {
        assert_eq!(sink_for(SinkKind::Stdout).name(), "stdout");
        assert_eq!(sink_for(SinkKind::Stderr).name(), "stderr");
        assert_eq!(sink_for(SinkKind::Tracing).name(), "tracing");
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        assert!(TracingSink.write_block("block").is_ok());
    }

    #[test]
    fn test_console_sinks_write_through_print() {
        // Captured by the test harness; visible with `--nocapture`.
        assert!(StdoutSink.write_block(">>> GET http://stub.test/api/users").is_ok());
        assert!(StderrSink.write_block("<<< 200 OK").is_ok());
    }
}
