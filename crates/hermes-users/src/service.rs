//! One method per endpoint of the user API.
//!
//! | Method | Endpoint | Auth |
//! |---|---|---|
//! | [`register`](UserService::register) | `POST /api/signup` | none |
//! | [`auth`](UserService::auth) | `POST /api/login` | none |
//! | [`get_user_info`](UserService::get_user_info) | `GET /api/user` | bearer if given |
//! | [`update_pass`](UserService::update_pass) | `PUT /api/user` | bearer |
//! | [`delete_user`](UserService::delete_user) | `DELETE /api/user` | bearer |
//! | [`get_all_users`](UserService::get_all_users) | `GET /api/users` | none |
//!
//! Methods return the response whatever its status; checking it is the
//! caller's job.

use crate::models::{AuthRequest, PasswordUpdate, User};
use hermes_core::HermesResult;
use hermes_test::{ApiClient, ValidatableResponse, APPLICATION_JSON};

/// Registration endpoint.
pub const SIGNUP_PATH: &str = "/api/signup";
/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/login";
/// Current-user endpoint.
pub const USER_PATH: &str = "/api/user";
/// User listing endpoint.
pub const USERS_PATH: &str = "/api/users";

/// Typed calls against the user API.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'c> {
    client: &'c ApiClient,
}

impl<'c> UserService<'c> {
    /// Creates a service over `client`.
    #[must_use]
    pub const fn new(client: &'c ApiClient) -> Self {
        Self { client }
    }

    /// Returns the client in use.
    #[must_use]
    pub const fn client(&self) -> &'c ApiClient {
        self.client
    }

    /// Registers `user`. Unset fields are not sent.
    pub async fn register(&self, user: &User) -> HermesResult<ValidatableResponse> {
        tracing::debug!(login = user.login().unwrap_or_default(), "registering user");
        self.client
            .post(SIGNUP_PATH)
            .accept(APPLICATION_JSON)
            .json(user)
            .send()
            .await
    }

    /// Logs in with the user's login and password.
    pub async fn auth(&self, user: &User) -> HermesResult<ValidatableResponse> {
        self.client
            .post(LOGIN_PATH)
            .accept(APPLICATION_JSON)
            .json(&AuthRequest::from(user))
            .send()
            .await
    }

    /// Reads the profile of the token's owner; without a token no
    /// `Authorization` header is sent.
    pub async fn get_user_info(&self, token: Option<&str>) -> HermesResult<ValidatableResponse> {
        let mut request = self.client.get(USER_PATH).accept(APPLICATION_JSON);
        if let Some(token) = token {
            request = request.bearer_token(token);
        }
        request.send().await
    }

    /// Changes the password of the token's owner.
    pub async fn update_pass(
        &self,
        new_password: &str,
        token: &str,
    ) -> HermesResult<ValidatableResponse> {
        let body = PasswordUpdate {
            password: new_password.to_string(),
        };
        self.client
            .put(USER_PATH)
            .accept(APPLICATION_JSON)
            .bearer_token(token)
            .json(&body)
            .send()
            .await
    }

    /// Deletes the token's owner.
    pub async fn delete_user(&self, token: &str) -> HermesResult<ValidatableResponse> {
        self.client
            .delete(USER_PATH)
            .accept(APPLICATION_JSON)
            .bearer_token(token)
            .send()
            .await
    }

    /// Lists all logins.
    pub async fn get_all_users(&self) -> HermesResult<ValidatableResponse> {
        self.client
            .get(USERS_PATH)
            .accept(APPLICATION_JSON)
            .send()
            .await
    }
}

impl UserService<'static> {
    /// Creates a service over the process-wide client.
    pub fn shared() -> HermesResult<Self> {
        ApiClient::shared().map(Self::new)
    }
}
