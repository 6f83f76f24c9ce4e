//! Template + sink, bound together.

use crate::interaction::Interaction;
use crate::sink::LogSink;
use crate::template::{Template, TemplateRegistry};
use crate::TelemetryResult;
use std::sync::Arc;

/// Renders interactions with one template and writes them to one sink.
///
/// Sink failures are reported through `tracing` and never propagate: a
/// broken log destination must not fail the test that produced the log.
#[derive(Clone)]
pub struct InteractionLogger {
    template: Arc<Template>,
    sink: Arc<dyn LogSink>,
}

impl InteractionLogger {
    /// Creates a logger for a template registered in `registry`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTemplate` if `template` is not registered.
    pub fn new(
        registry: &TemplateRegistry,
        template: &str,
        sink: Arc<dyn LogSink>,
    ) -> TelemetryResult<Self> {
        Ok(Self {
            template: registry.get(template)?,
            sink,
        })
    }

    /// Creates a logger from an already parsed template.
    #[must_use]
    pub fn from_template(template: Arc<Template>, sink: Arc<dyn LogSink>) -> Self {
        Self { template, sink }
    }

    /// Returns the template name.
    #[must_use]
    pub fn template_name(&self) -> &str {
        self.template.name()
    }

    /// Renders and writes one interaction.
    pub fn log(&self, interaction: &Interaction) {
        let block = self.template.render(interaction);
        if let Err(e) = self.sink.write_block(&block) {
            tracing::warn!(
                sink = self.sink.name(),
                request_id = %interaction.request_id,
                error = %e,
                "failed to write interaction log"
            );
        }
    }
}

impl std::fmt::Debug for InteractionLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionLogger")
            .field("template", &self.template.name())
            .field("sink", &self.sink.name())
            .finish()
    }
}
