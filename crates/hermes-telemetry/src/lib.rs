//! Logging for the Hermes harness.
//!
//! Two separate concerns live here:
//!
//! - **Diagnostic logging**: the harness's own structured `tracing` output
//!   (see [`logging`])
//! - **Interaction logging**: every HTTP exchange rendered through a named
//!   template and written to a sink (see [`template`], [`sink`], [`logger`])
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌──────────────────┐     ┌────────────┐
//! │  Interaction   │ ──▶ │ Template (named) │ ──▶ │  LogSink   │
//! │ (request +     │     │ `{{field}}`      │     │ stdout /   │
//! │  outcome)      │     │ placeholders     │     │ stderr /   │
//! └────────────────┘     └──────────────────┘     │ tracing /  │
//!                                                 │ memory     │
//!                                                 └────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hermes_telemetry::{InteractionLogger, MemorySink, TemplateRegistry};
//! use std::sync::Arc;
//!
//! let registry = TemplateRegistry::with_builtins();
//! let sink = MemorySink::new();
//! let logger = InteractionLogger::new(&registry, "custom", Arc::new(sink.clone())).unwrap();
//! assert_eq!(logger.template_name(), "custom");
//! assert!(sink.is_empty());
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interaction;
pub mod logger;
pub mod logging;
pub mod sink;
pub mod template;

pub use error::TelemetryError;
pub use interaction::{Interaction, InteractionOutcome};
pub use logger::InteractionLogger;
pub use logging::{init_logging, LogConfig};
pub use sink::{sink_for, LogSink, MemorySink, SinkKind, StderrSink, StdoutSink, TracingSink};
pub use template::{
    Template, TemplateRegistry, COMPACT_TEMPLATE, CUSTOM_TEMPLATE, DEFAULT_TEMPLATE,
};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Template used when nothing else is configured.
pub const LOG_TEMPLATE: &str = CUSTOM_TEMPLATE;
