//! API client that runs every request through the logging pipeline.

use crate::request::ApiRequest;
use crate::response::ValidatableResponse;
use hermes_config::{ConfigLoader, HarnessConfig};
use hermes_core::{HermesError, HermesResult};
use hermes_middleware::stages::{
    InteractionLogMiddleware, RequestLoggingMiddleware, ResponseLoggingMiddleware,
};
use hermes_middleware::{ExchangeContext, Pipeline, Request, ReqwestTransport, Transport};
use hermes_telemetry::{init_logging, sink_for, TemplateRegistry};
use http::Method;
use std::sync::{Arc, OnceLock};

/// Optional configuration file read by [`ApiClient::bootstrap`].
pub const CONFIG_FILE: &str = "hermes.toml";

static SHARED: OnceLock<ApiClient> = OnceLock::new();

/// Client for the API under test.
///
/// Paths are resolved against the configured base URL; absolute URLs are
/// used as given. Every request goes through the configured middleware
/// stages and then the transport.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hermes_config::HarnessConfig;
/// use hermes_middleware::{FnTransport, Response};
/// use hermes_test::{conditions::has_status_code, ApiClient};
/// use std::sync::Arc;
///
/// let config = HarnessConfig::builder()
///     .base_url("http://localhost:8080/")
///     .interaction_logging(false)
///     .build();
/// let transport = FnTransport::new(|_| Ok(Response::new(Bytes::from_static(b"[]"))));
/// let client = ApiClient::with_transport(&config, Arc::new(transport)).unwrap();
///
/// tokio_test::block_on(async {
///     let users = client.get("/api/users").send().await.unwrap();
///     users.should(has_status_code(200));
///     assert!(users.as_list::<String>().unwrap().is_empty());
/// });
/// ```
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    pipeline: Pipeline,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Creates a client that talks to the network.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::Setup` if the HTTP client cannot be built or the
    /// configured log template does not exist.
    pub fn from_config(config: &HarnessConfig) -> HermesResult<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client over the given transport with the stages the
    /// configuration enables.
    ///
    /// User templates from `log_templates` are registered over the built-in
    /// ones before `log_template` is looked up.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::Setup` if a user template does not parse or the
    /// configured log template does not exist.
    pub fn with_transport(
        config: &HarnessConfig,
        transport: Arc<dyn Transport>,
    ) -> HermesResult<Self> {
        let mut builder = Pipeline::builder()
            .add_stage_if(config.request_logging, RequestLoggingMiddleware::new())
            .add_stage_if(config.response_logging, ResponseLoggingMiddleware::new());

        if config.interaction_logging {
            let mut registry = TemplateRegistry::with_builtins();
            for (name, source) in &config.log_templates {
                registry
                    .register_source(name, source)
                    .map_err(|e| HermesError::setup(e.to_string()))?;
            }
            let stage = InteractionLogMiddleware::new(
                &registry,
                &config.log_template,
                sink_for(config.log_sink),
            )
            .map_err(|e| HermesError::setup(e.to_string()))?;
            builder = builder.add_stage(stage);
        }

        Ok(Self::with_pipeline(
            config.base_url.clone(),
            builder.build(),
            transport,
        ))
    }

    /// Creates a client from explicit parts.
    pub fn with_pipeline(
        base_url: impl Into<String>,
        pipeline: Pipeline,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            pipeline,
            transport,
        }
    }

    /// Returns the process-wide client, bootstrapping it on first use.
    ///
    /// Later calls return the same instance.
    pub fn shared() -> HermesResult<&'static Self> {
        if let Some(client) = SHARED.get() {
            return Ok(client);
        }
        let client = Self::bootstrap()?;
        Ok(SHARED.get_or_init(|| client))
    }

    /// Loads configuration (`hermes.toml`, `.env`, environment), installs
    /// diagnostic logging and builds a network client.
    pub fn bootstrap() -> HermesResult<Self> {
        let config = ConfigLoader::new()
            .with_optional_file(CONFIG_FILE)
            .and_then(ConfigLoader::with_dotenv)
            .and_then(|loader| loader.with_env().load())
            .map_err(|e| HermesError::setup(e.to_string()))?;

        init_logging(&config.logging.to_log_config())
            .map_err(|e| HermesError::setup(e.to_string()))?;

        tracing::info!(
            base_url = %config.base_url,
            timeout_ms = config.timeout_ms,
            log_template = %config.log_template,
            "API client configured"
        );
        Self::from_config(&config)
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the middleware pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Resolves a path against the base URL.
    ///
    /// Exactly one `/` separates the two parts.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Starts a GET request.
    pub fn get(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::GET, path)
    }

    /// Starts a POST request.
    pub fn post(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::POST, path)
    }

    /// Starts a PUT request.
    pub fn put(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::PUT, path)
    }

    /// Starts a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(Method::DELETE, path)
    }

    /// Starts a request with any method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest::new(self, method, path)
    }

    /// Runs a built request through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns the transport or stage error when no response was produced.
    pub async fn execute(&self, request: Request) -> HermesResult<ValidatableResponse> {
        let method = request.method().clone();
        let url = request.uri().to_string();
        let mut ctx = ExchangeContext::new();
        let response = self
            .pipeline
            .process(&mut ctx, request, self.transport.as_ref())
            .await?;
        Ok(ValidatableResponse::from_exchange(
            method,
            url,
            response,
            ctx.elapsed(),
        ))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::has_status_code;
    use bytes::Bytes;
    use hermes_config::SinkKind;
    use hermes_middleware::stages::InteractionLogMiddleware;
    use hermes_middleware::{FnTransport, Response, ResponseExt};
    use hermes_telemetry::{MemorySink, COMPACT_TEMPLATE};
    use http::StatusCode;
    use serde_json::json;

    fn quiet_config() -> HarnessConfig {
        HarnessConfig::builder()
            .base_url("http://localhost:8080/")
            .log_sink(SinkKind::Tracing)
            .build()
    }

    fn ok_transport() -> Arc<dyn Transport> {
        Arc::new(FnTransport::new(|_| {
            Response::json(StatusCode::OK, &json!(["admin"]))
        }))
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::with_transport(&quiet_config(), ok_transport()).unwrap();
        assert_eq!(client.url("/api/users"), "http://localhost:8080/api/users");
        assert_eq!(client.url("api/users"), "http://localhost:8080/api/users");
        assert_eq!(
            client.url("https://other.test/health"),
            "https://other.test/health"
        );

        let bare = ApiClient::with_pipeline("http://localhost:8080", Pipeline::default(), ok_transport());
        assert_eq!(bare.url("/api/login"), "http://localhost:8080/api/login");
    }

    #[test]
    fn test_stages_follow_config() {
        let client = ApiClient::with_transport(&quiet_config(), ok_transport()).unwrap();
        assert_eq!(
            client.pipeline().stage_names(),
            vec!["request_logging", "response_logging", "interaction_logging"]
        );

        let config = HarnessConfig::builder()
            .request_logging(false)
            .interaction_logging(false)
            .build();
        let client = ApiClient::with_transport(&config, ok_transport()).unwrap();
        assert_eq!(client.pipeline().stage_names(), vec!["response_logging"]);
    }

    #[test]
    fn test_unknown_template_is_setup_error() {
        let config = HarnessConfig::builder().log_template("fancy").build();
        let err = ApiClient::with_transport(&config, ok_transport()).unwrap_err();
        assert!(matches!(err, HermesError::Setup { .. }));
        assert!(err.to_string().contains("fancy"));
    }

    #[test]
    fn test_user_template_from_config() {
        let config = HarnessConfig::builder()
            .log_sink(SinkKind::Tracing)
            .log_template("oneline")
            .log_template_source("oneline", "{{method}} {{url}} -> {{status_code}}")
            .build();
        let client = ApiClient::with_transport(&config, ok_transport()).unwrap();
        assert!(client
            .pipeline()
            .stage_names()
            .contains(&"interaction_logging"));
    }

    #[test]
    fn test_invalid_user_template_is_setup_error() {
        let config = HarnessConfig::builder()
            .log_template_source("broken", "{{colour}}")
            .build();
        let err = ApiClient::with_transport(&config, ok_transport()).unwrap_err();
        assert!(matches!(err, HermesError::Setup { .. }));
        assert!(err.to_string().contains("colour"));
    }

    #[tokio::test]
    async fn test_execute_logs_interaction() {
        let sink = MemorySink::new();
        let registry = TemplateRegistry::with_builtins();
        let stage =
            InteractionLogMiddleware::new(&registry, COMPACT_TEMPLATE, Arc::new(sink.clone()))
                .unwrap();
        let pipeline = Pipeline::builder().add_stage(stage).build();
        let client = ApiClient::with_pipeline("http://localhost:8080/", pipeline, ok_transport());

        let response = client.get("/api/users").send().await.unwrap();
        response.should(has_status_code(200));
        assert_eq!(response.request_line(), "GET http://localhost:8080/api/users");

        let blocks = sink.blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("GET http://localhost:8080/api/users -> 200 OK"));
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let transport: Arc<dyn Transport> = Arc::new(FnTransport::new(|_| {
            Response::json(
                StatusCode::UNAUTHORIZED,
                &json!({"info": {"message": "Unauthorized"}}),
            )
        }));
        let client = ApiClient::with_transport(&quiet_config(), transport).unwrap();
        let response = client.get("/api/user").send().await.unwrap();
        response.should(has_status_code(401));
    }

    #[tokio::test]
    async fn test_transport_error_is_returned() {
        let transport: Arc<dyn Transport> = Arc::new(FnTransport::new(|_| {
            Err(HermesError::timeout("http://localhost:8080/api/users", 30_000))
        }));
        let client = ApiClient::with_transport(&quiet_config(), transport).unwrap();
        let err = client.get("/api/users").send().await.unwrap_err();
        assert!(matches!(err, HermesError::Timeout { timeout_ms: 30_000, .. }));
    }

    #[test]
    fn test_shared_client_is_bound_once() {
        let first = ApiClient::shared().unwrap();
        let second = ApiClient::shared().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_with_pipeline_accepts_empty_pipeline() {
        let client = ApiClient::with_pipeline(
            "http://localhost:8080/",
            Pipeline::default(),
            Arc::new(FnTransport::new(|_| Ok(Response::new(Bytes::new())))),
        );
        assert_eq!(client.pipeline().stage_count(), 0);
        assert_eq!(client.base_url(), "http://localhost:8080/");
    }
}
