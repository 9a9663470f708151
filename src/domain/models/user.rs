use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::models::credential::HashedPassword;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);
impl UserId {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One-time token proving ownership of the registered email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationCode(String);
impl ConfirmationCode {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    login: String,
    email: String,
    password: HashedPassword,
    created_at: DateTime<Utc>,
    confirmation_code: ConfirmationCode,
    expiration_date: DateTime<Utc>,
    is_confirmed: bool,
}

impl User {
    /// Build a freshly registered, unconfirmed user.
    /// `expiration_date` is exactly `created_at + confirmation_window`.
    pub fn register(
        id: Uuid,
        login: String,
        email: String,
        password: HashedPassword,
        confirmation_code: ConfirmationCode,
        created_at: DateTime<Utc>,
        confirmation_window: TimeDelta,
    ) -> Self {
        Self {
            id: UserId(id),
            login,
            email,
            password,
            created_at,
            confirmation_code,
            expiration_date: created_at + confirmation_window,
            is_confirmed: false,
        }
    }

    /// Rebuild a user from a stored row
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: Uuid,
        login: String,
        email: String,
        password: HashedPassword,
        created_at: DateTime<Utc>,
        confirmation_code: ConfirmationCode,
        expiration_date: DateTime<Utc>,
        is_confirmed: bool,
    ) -> Self {
        Self {
            id: UserId(id),
            login,
            email,
            password,
            created_at,
            confirmation_code,
            expiration_date,
            is_confirmed,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn login(&self) -> &str {
        &self.login
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn password(&self) -> &HashedPassword {
        &self.password
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn confirmation_code(&self) -> &ConfirmationCode {
        &self.confirmation_code
    }
    pub fn expiration_date(&self) -> DateTime<Utc> {
        self.expiration_date
    }
    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }
}
