//! Named templates for rendering HTTP interactions.
//!
//! A template is plain text with `{{placeholder}}` fields. Templates are
//! parsed once, when registered, so a typo in a placeholder fails at setup
//! rather than in the middle of a test run.
//!
//! # Placeholders
//!
//! | Placeholder | Renders |
//! |---|---|
//! | `request_id` | UUID v7 of the exchange |
//! | `timestamp` | local time the request was issued |
//! | `method` | request method |
//! | `url` | absolute request URL |
//! | `request_headers` | one `name: value` per line |
//! | `request_body` | pretty JSON or raw text |
//! | `status` | `201 Created`, or `<no response>` |
//! | `status_code` | `201`, or `-` |
//! | `response_headers` | one `name: value` per line |
//! | `response_body` | pretty JSON or raw text |
//! | `elapsed_ms` | milliseconds from dispatch to response |
//! | `error` | transport error, empty on success |
//!
//! A line holding nothing but one placeholder is dropped when that
//! placeholder renders empty, so bodiless requests do not leave gaps.
//!
//! # Example
//!
//! ```
//! use hermes_telemetry::template::TemplateRegistry;
//!
//! let mut registry = TemplateRegistry::with_builtins();
//! registry
//!     .register_source("oneline", "{{method}} {{url}} -> {{status_code}}")
//!     .unwrap();
//!
//! assert!(registry.get("oneline").is_ok());
//! assert!(registry.get("default").is_ok());
//! ```

use crate::error::TelemetryError;
use crate::interaction::{format_body, format_headers, format_status, Interaction, InteractionOutcome};
use crate::TelemetryResult;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name of the full request/response template.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Name of the single-line template.
pub const COMPACT_TEMPLATE: &str = "compact";

/// Name of the banner-framed template.
pub const CUSTOM_TEMPLATE: &str = "custom";

const DEFAULT_SOURCE: &str = "\
{{method}} {{url}}
{{request_headers}}
{{request_body}}

HTTP {{status}} ({{elapsed_ms}} ms)
{{response_headers}}
{{response_body}}
{{error}}";

const COMPACT_SOURCE: &str = "{{method}} {{url}} -> {{status}} in {{elapsed_ms}} ms {{error}}";

const CUSTOM_SOURCE: &str = "\
========== {{request_id}} @ {{timestamp}} ==========
>>> {{method}} {{url}}
{{request_headers}}
{{request_body}}

<<< {{status}} in {{elapsed_ms}} ms
{{response_headers}}
{{response_body}}
{{error}}
==========";

/// A value a template can interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Exchange identifier.
    RequestId,
    /// Issue time.
    Timestamp,
    /// Request method.
    Method,
    /// Absolute URL.
    Url,
    /// Request headers block.
    RequestHeaders,
    /// Request body block.
    RequestBody,
    /// Status line.
    Status,
    /// Numeric status.
    StatusCode,
    /// Response headers block.
    ResponseHeaders,
    /// Response body block.
    ResponseBody,
    /// Duration in milliseconds.
    ElapsedMs,
    /// Transport error.
    Error,
}

impl Field {
    /// Looks up a placeholder by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "request_id" => Self::RequestId,
            "timestamp" => Self::Timestamp,
            "method" => Self::Method,
            "url" => Self::Url,
            "request_headers" => Self::RequestHeaders,
            "request_body" => Self::RequestBody,
            "status" => Self::Status,
            "status_code" => Self::StatusCode,
            "response_headers" => Self::ResponseHeaders,
            "response_body" => Self::ResponseBody,
            "elapsed_ms" => Self::ElapsedMs,
            "error" => Self::Error,
            _ => return None,
        };
        Some(field)
    }

    fn render(self, interaction: &Interaction) -> String {
        match self {
            Self::RequestId => interaction.request_id.to_string(),
            Self::Timestamp => interaction
                .timestamp
                .format("%Y-%m-%d %H:%M:%S%.3f")
                .to_string(),
            Self::Method => interaction.method.to_string(),
            Self::Url => interaction.url.clone(),
            Self::RequestHeaders => format_headers(&interaction.request_headers),
            Self::RequestBody => format_body(&interaction.request_headers, &interaction.request_body),
            Self::Status => interaction
                .status()
                .map_or_else(|| "<no response>".to_string(), format_status),
            Self::StatusCode => interaction
                .status()
                .map_or_else(|| "-".to_string(), |s| s.as_u16().to_string()),
            Self::ResponseHeaders => match &interaction.outcome {
                InteractionOutcome::Completed { headers, .. } => format_headers(headers),
                InteractionOutcome::Failed { .. } => String::new(),
            },
            Self::ResponseBody => match &interaction.outcome {
                InteractionOutcome::Completed { headers, body, .. } => format_body(headers, body),
                InteractionOutcome::Failed { .. } => String::new(),
            },
            Self::ElapsedMs => interaction.elapsed_ms().to_string(),
            Self::Error => interaction
                .error()
                .map(|e| format!("!!! {e}"))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed, named interaction template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    lines: Vec<Vec<Segment>>,
}

impl Template {
    /// Parses a template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateSyntax` for an unterminated `{{` and `UnknownField`
    /// for a placeholder that is not in the table above.
    pub fn parse(name: impl Into<String>, source: &str) -> TelemetryResult<Self> {
        let name = name.into();
        let lines = source
            .lines()
            .map(|line| parse_line(&name, line))
            .collect::<TelemetryResult<Vec<_>>>()?;
        Ok(Self { name, lines })
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renders one interaction into a block of text.
    #[must_use]
    pub fn render(&self, interaction: &Interaction) -> String {
        let mut out = String::new();
        for line in &self.lines {
            let rendered: String = line
                .iter()
                .map(|segment| match segment {
                    Segment::Literal(text) => text.clone(),
                    Segment::Field(field) => field.render(interaction),
                })
                .collect();

            if rendered.is_empty() && matches!(line.as_slice(), [Segment::Field(_)]) {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(rendered.trim_end());
        }
        out
    }
}

fn parse_line(template: &str, line: &str) -> TelemetryResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = line;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_string()));
        }
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| TelemetryError::TemplateSyntax {
            template: template.to_string(),
            message: format!("unterminated placeholder in line '{line}'"),
        })?;
        let key = after[..end].trim();
        let field = Field::from_name(key).ok_or_else(|| TelemetryError::UnknownField {
            template: template.to_string(),
            field: key.to_string(),
        })?;
        segments.push(Segment::Field(field));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(segments)
}

// Every entry must parse; `with_builtins` panics otherwise.
const BUILTINS: [(&str, &str); 3] = [
    (DEFAULT_TEMPLATE, DEFAULT_SOURCE),
    (COMPACT_TEMPLATE, COMPACT_SOURCE),
    (CUSTOM_TEMPLATE, CUSTOM_SOURCE),
];

/// Templates by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<Template>>,
}

impl TemplateRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `default`, `compact` and `custom`
    /// templates.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, source) in BUILTINS {
            let template = Template::parse(name, source)
                .unwrap_or_else(|e| panic!("built-in template is invalid: {e}"));
            registry.register(template);
        }
        registry
    }

    /// Registers a parsed template, replacing any template of the same name.
    pub fn register(&mut self, template: Template) {
        self.templates
            .insert(template.name().to_string(), Arc::new(template));
    }

    /// Parses and registers a template.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `source` is not a valid template.
    pub fn register_source(&mut self, name: &str, source: &str) -> TelemetryResult<()> {
        let template = Template::parse(name, source)?;
        self.register(template);
        Ok(())
    }

    /// Looks up a template by name.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if nothing is registered under `name`.
    pub fn get(&self, name: &str) -> TelemetryResult<Arc<Template>> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TelemetryError::UnknownTemplate(name.to_string()))
    }

    /// Returns registered template names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}
