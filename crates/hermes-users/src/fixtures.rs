//! Test users.

use crate::models::User;
use rand::Rng;

/// Login prefix of generated users.
pub const TEST_LOGIN_PREFIX: &str = "newTestUser";

/// Password of generated users.
pub const TEST_PASSWORD: &str = "newPassword";

/// Login and password of the seeded administrator account.
pub const ADMIN_LOGIN: &str = "admin";

/// Returns a fresh user with a random login suffix.
///
/// The suffix is a non-negative 31-bit number, so logins stay unique
/// across concurrent runs against the same server with high probability.
#[must_use]
pub fn random_user() -> User {
    let suffix = rand::thread_rng().gen_range(0..=i32::MAX);
    User::builder()
        .login(format!("{TEST_LOGIN_PREFIX}{suffix}"))
        .password(TEST_PASSWORD)
        .build()
}

/// Returns the seeded administrator, which the API refuses to modify.
#[must_use]
pub fn admin_user() -> User {
    User::builder()
        .login(ADMIN_LOGIN)
        .password(ADMIN_LOGIN)
        .build()
}
