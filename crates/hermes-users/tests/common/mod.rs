//! In-process stand-in for the user API.

#![allow(dead_code)]

use hermes_core::HermesResult;
use hermes_middleware::stages::InteractionLogMiddleware;
use hermes_middleware::{FnTransport, Pipeline, Request, Response, ResponseExt};
use hermes_telemetry::{MemorySink, TemplateRegistry, CUSTOM_TEMPLATE};
use hermes_test::ApiClient;
use hermes_users::messages;
use http::{header, Method, StatusCode};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Accounts the API refuses to modify or delete.
pub const SEEDED: [(&str, &str); 3] = [("admin", "admin"), ("demo", "demo"), ("guest", "guest")];

/// What the stub saw of one request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
}

#[derive(Debug)]
struct Account {
    password: String,
    id: i64,
}

#[derive(Debug, Default)]
struct State {
    accounts: BTreeMap<String, Account>,
    next_id: i64,
    requests: Vec<Recorded>,
}

/// A stub server plus a client wired to it through the interaction logger.
pub struct StubApi {
    state: Arc<Mutex<State>>,
    pub client: ApiClient,
    pub log: MemorySink,
}

impl StubApi {
    pub fn new() -> Self {
        let state = Arc::new(Mutex::new(State::default()));
        for (login, password) in SEEDED {
            state.lock().insert(login, password);
        }

        let handler_state = Arc::clone(&state);
        let transport = FnTransport::new(move |request| handle(&handler_state, request));

        let log = MemorySink::new();
        let registry = TemplateRegistry::with_builtins();
        let stage =
            InteractionLogMiddleware::new(&registry, CUSTOM_TEMPLATE, Arc::new(log.clone()))
                .unwrap();
        let pipeline = Pipeline::builder().add_stage(stage).build();
        let client = ApiClient::with_pipeline("http://stub.test/", pipeline, Arc::new(transport));

        Self { state, client, log }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().requests.clone()
    }

    pub fn has_account(&self, login: &str) -> bool {
        self.state.lock().accounts.contains_key(login)
    }
}

impl State {
    fn insert(&mut self, login: &str, password: &str) {
        self.next_id += 1;
        self.accounts.insert(
            login.to_string(),
            Account {
                password: password.to_string(),
                id: self.next_id,
            },
        );
    }

    fn owner(&self, authorization: Option<&str>) -> Option<String> {
        let login = authorization?.strip_prefix("Bearer stub.")?;
        self.accounts.contains_key(login).then(|| login.to_string())
    }
}

fn header_str(request: &Request, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn info(status: StatusCode, message: &str) -> HermesResult<Response> {
    let tag = if status.is_success() { "success" } else { "fail" };
    Response::json(status, &json!({"info": {"message": message, "status": tag}}))
}

fn body_field(request: &Request, field: &str) -> Option<String> {
    let body: Value = serde_json::from_slice(request.body()).ok()?;
    body.get(field)?.as_str().map(str::to_string)
}

fn is_seeded(login: &str) -> bool {
    SEEDED.iter().any(|(seeded, _)| *seeded == login)
}

fn handle(state: &Mutex<State>, request: Request) -> HermesResult<Response> {
    let mut state = state.lock();
    let authorization = header_str(&request, header::AUTHORIZATION);
    state.requests.push(Recorded {
        method: request.method().clone(),
        path: request.uri().path().to_string(),
        authorization: authorization.clone(),
        content_type: header_str(&request, header::CONTENT_TYPE),
        accept: header_str(&request, header::ACCEPT),
    });

    let owner = state.owner(authorization.as_deref());
    match (request.method().clone(), request.uri().path()) {
        (Method::POST, "/api/signup") => {
            let (Some(login), Some(password)) =
                (body_field(&request, "login"), body_field(&request, "pass"))
            else {
                return info(StatusCode::BAD_REQUEST, messages::MISSING_CREDENTIALS);
            };
            if state.accounts.contains_key(&login) {
                return info(StatusCode::BAD_REQUEST, messages::LOGIN_EXISTS);
            }
            state.insert(&login, &password);
            info(StatusCode::CREATED, messages::USER_CREATED)
        }
        (Method::POST, "/api/login") => {
            let login = body_field(&request, "login").unwrap_or_default();
            let password = body_field(&request, "password").unwrap_or_default();
            match state.accounts.get(&login) {
                Some(account) if account.password == password => {
                    Response::json(StatusCode::OK, &json!({"token": format!("stub.{login}")}))
                }
                _ => Ok(Response::empty(StatusCode::UNAUTHORIZED)),
            }
        }
        (method, "/api/user") => {
            let Some(login) = owner else {
                return Ok(Response::empty(StatusCode::UNAUTHORIZED));
            };
            match method {
                Method::GET => {
                    let account = &state.accounts[&login];
                    Response::json(
                        StatusCode::OK,
                        &json!({
                            "id": account.id,
                            "login": login,
                            "pass": account.password,
                            "games": [],
                        }),
                    )
                }
                Method::PUT if is_seeded(&login) => {
                    info(StatusCode::BAD_REQUEST, messages::CANT_UPDATE_BASE_USERS)
                }
                Method::PUT => {
                    let Some(password) = body_field(&request, "password") else {
                        return info(StatusCode::BAD_REQUEST, "Missing password");
                    };
                    if let Some(account) = state.accounts.get_mut(&login) {
                        account.password = password;
                    }
                    info(StatusCode::OK, messages::PASSWORD_CHANGED)
                }
                Method::DELETE if is_seeded(&login) => {
                    info(StatusCode::BAD_REQUEST, messages::CANT_DELETE_BASE_USERS)
                }
                Method::DELETE => {
                    state.accounts.remove(&login);
                    info(StatusCode::OK, messages::USER_DELETED)
                }
                _ => Ok(Response::empty(StatusCode::METHOD_NOT_ALLOWED)),
            }
        }
        (Method::GET, "/api/users") => {
            let logins: Vec<&String> = state.accounts.keys().collect();
            Response::json(StatusCode::OK, &json!(logins))
        }
        _ => Ok(Response::empty(StatusCode::NOT_FOUND)),
    }
}
