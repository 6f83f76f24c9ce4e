//! Wire models of the user API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user account.
///
/// Every field is optional; unset fields are left out of the JSON rather
/// than sent as `null`. The password alone can also be set to an explicit
/// `null`, which is sent as `"pass": null`. Fields the client does not model
/// are kept in [`extras`](Self::extras) and written back unchanged.
///
/// # Example
///
/// ```
/// use hermes_users::User;
///
/// let user = User::builder().login("newTestUser7").password("newPassword").build();
/// assert_eq!(
///     serde_json::to_string(&user).unwrap(),
///     r#"{"login":"newTestUser7","pass":"newPassword"}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    login: Option<String>,

    /// `None` is unset, `Some(None)` is an explicit `null`.
    #[serde(
        rename = "pass",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    password: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    games: Option<Vec<Value>>,

    #[serde(flatten)]
    extras: Map<String, Value>,
}

impl User {
    /// Creates a user builder.
    #[must_use]
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    /// Returns the login.
    #[must_use]
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref()
    }

    /// Returns the password; `None` when unset or null.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_ref()?.as_deref()
    }

    /// Whether the password is an explicit `null`.
    #[must_use]
    pub fn has_null_password(&self) -> bool {
        matches!(self.password, Some(None))
    }

    /// Returns the server-assigned id.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Returns the user's games, as raw JSON.
    #[must_use]
    pub fn games(&self) -> Option<&[Value]> {
        self.games.as_deref()
    }

    /// Fields without a typed accessor.
    #[must_use]
    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// Replaces the password; `None` unsets it.
    pub fn set_password(&mut self, password: Option<impl Into<String>>) {
        self.password = password.map(|p| Some(p.into()));
    }

    /// Sets the password to an explicit `null`.
    pub fn set_null_password(&mut self) {
        self.password = Some(None);
    }
}

// A key that is present always deserializes to `Some`, even when its value is
// `null`; `default` covers the absent case.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Builder for [`User`].
#[derive(Debug, Clone, Default)]
pub struct UserBuilder {
    user: User,
}

impl UserBuilder {
    /// Sets the login.
    pub fn login(mut self, login: impl Into<String>) -> Self {
        self.user.login = Some(login.into());
        self
    }

    /// Sets the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.user.password = Some(Some(password.into()));
        self
    }

    /// Sets the password to an explicit `null`.
    pub fn null_password(mut self) -> Self {
        self.user.password = Some(None);
        self
    }

    /// Sets the id.
    pub fn id(mut self, id: i64) -> Self {
        self.user.id = Some(id);
        self
    }

    /// Sets the games list.
    pub fn games(mut self, games: Vec<Value>) -> Self {
        self.user.games = Some(games);
        self
    }

    /// Adds an untyped field.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.user.extras.insert(key.into(), value);
        self
    }

    /// Builds the user.
    #[must_use]
    pub fn build(self) -> User {
        self.user
    }
}

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Account login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Account password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthRequest {
    /// Creates credentials from a login and password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            password: Some(password.into()),
        }
    }
}

impl From<&User> for AuthRequest {
    fn from(user: &User) -> Self {
        Self {
            login: user.login.clone(),
            password: user.password().map(str::to_string),
        }
    }
}

/// Message envelope returned by mutating endpoints under `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    /// Human-readable outcome.
    pub message: String,
    /// Outcome tag (`success`, `fail`) when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body of `PUT /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordUpdate {
    /// The new password.
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_fields_are_omitted() {
        let user = User::builder().login("alice").build();
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"login": "alice"}));
        assert_eq!(serde_json::to_string(&User::default()).unwrap(), "{}");
    }

    #[test]
    fn test_password_uses_pass_key() {
        let user = User::builder().login("alice").password("secret").build();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["pass"], "secret");
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_lenient_deserialization_keeps_unknown_fields() {
        let body = json!({
            "id": 17,
            "login": "alice",
            "pass": "secret",
            "games": [{"gameId": 1}],
            "rank": "gold"
        });
        let user: User = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(user.login(), Some("alice"));
        assert_eq!(user.password(), Some("secret"));
        assert_eq!(user.id(), Some(17));
        assert_eq!(user.games().map(<[Value]>::len), Some(1));
        assert_eq!(user.extras().get("rank"), Some(&json!("gold")));
        assert_eq!(serde_json::to_value(&user).unwrap(), body);
    }

    #[test]
    fn test_missing_fields_are_unset() {
        let user: User = serde_json::from_value(json!({"login": "alice"})).unwrap();
        assert_eq!(user.password(), None);
        assert!(!user.has_null_password());
        assert_eq!(user.id(), None);
        assert!(user.extras().is_empty());
    }

    #[test]
    fn test_unset_and_null_password_differ() {
        let unset = User::builder().login("x").build();
        let null = User::builder().login("x").null_password().build();
        assert_eq!(serde_json::to_string(&unset).unwrap(), r#"{"login":"x"}"#);
        assert_eq!(
            serde_json::to_string(&null).unwrap(),
            r#"{"login":"x","pass":null}"#
        );
        assert!(null.has_null_password());
        assert_eq!(null.password(), None);
    }

    #[test]
    fn test_null_password_survives_deserialization() {
        let user: User = serde_json::from_value(json!({"login": "alice", "pass": null})).unwrap();
        assert!(user.has_null_password());
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"login": "alice", "pass": null})
        );
    }

    #[test]
    fn test_set_password() {
        let mut user = User::builder().login("alice").password("old").build();
        user.set_password(Some("new"));
        assert_eq!(user.password(), Some("new"));
        user.set_null_password();
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({"login": "alice", "pass": null})
        );
        user.set_password(None::<String>);
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"login": "alice"}));
    }

    #[test]
    fn test_auth_request_from_null_password() {
        let user = User::builder().login("alice").null_password().build();
        assert_eq!(
            serde_json::to_value(AuthRequest::from(&user)).unwrap(),
            json!({"login": "alice"})
        );
    }

    #[test]
    fn test_auth_request_from_user() {
        let user = User::builder().login("admin").password("admin").build();
        let auth = AuthRequest::from(&user);
        assert_eq!(auth, AuthRequest::new("admin", "admin"));
        assert_eq!(
            serde_json::to_value(&auth).unwrap(),
            json!({"login": "admin", "password": "admin"})
        );
    }

    #[test]
    fn test_info_status_is_optional() {
        let info: Info = serde_json::from_value(json!({"message": "User created"})).unwrap();
        assert_eq!(info.message, "User created");
        assert_eq!(info.status, None);

        let info: Info =
            serde_json::from_value(json!({"message": "User created", "status": "success"}))
                .unwrap();
        assert_eq!(info.status.as_deref(), Some("success"));
    }
}
