//! # Hermes Users
//!
//! Service layer for the user-management API: registration, bearer-token
//! login, profile read, password change, deletion and listing.
//!
//! ```no_run
//! use hermes_test::conditions::{has_message, has_status_code};
//! use hermes_users::{messages, random_user, UserService};
//!
//! # async fn run() -> hermes_core::HermesResult<()> {
//! let users = UserService::shared()?;
//! let user = random_user();
//!
//! users
//!     .register(&user)
//!     .await?
//!     .should(has_status_code(201))
//!     .should(has_message(messages::USER_CREATED));
//!
//! let token = users.auth(&user).await?.should(has_status_code(200)).as_jwt()?;
//! users
//!     .delete_user(&token)
//!     .await?
//!     .should(has_status_code(200))
//!     .should(has_message(messages::USER_DELETED));
//! # Ok(())
//! # }
//! ```
//!
//! The end-to-end scenarios live in `tests/`: `user_scenarios.rs` runs them
//! against an in-process stub of the API, `live_api.rs` against the real
//! server (`cargo test -p hermes-users -- --ignored`).

#![doc(html_root_url = "https://docs.rs/hermes-users/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod fixtures;
pub mod models;
mod service;

pub use fixtures::{admin_user, random_user, ADMIN_LOGIN, TEST_LOGIN_PREFIX, TEST_PASSWORD};
pub use models::{AuthRequest, Info, PasswordUpdate, User, UserBuilder};
pub use service::{UserService, LOGIN_PATH, SIGNUP_PATH, USERS_PATH, USER_PATH};

/// Messages the API returns in the `info` envelope.
pub mod messages {
    /// Registration succeeded.
    pub const USER_CREATED: &str = "User created";
    /// Registration with a taken login.
    pub const LOGIN_EXISTS: &str = "Login already exist";
    /// Registration without login or password.
    pub const MISSING_CREDENTIALS: &str = "Missing login or password";
    /// Password change succeeded.
    pub const PASSWORD_CHANGED: &str = "User password successfully changed";
    /// Password change on a seeded account.
    pub const CANT_UPDATE_BASE_USERS: &str = "Cant update base users";
    /// Deletion of a seeded account.
    pub const CANT_DELETE_BASE_USERS: &str = "Cant delete base users";
    /// Deletion succeeded.
    pub const USER_DELETED: &str = "User successfully deleted";
}
