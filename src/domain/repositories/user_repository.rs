use async_trait::async_trait;

use crate::domain::{error::RepositoryError, models::user::User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user whose login or email equals `value` (exact match)
    async fn find_by_login_or_email(&self, value: &str) -> Result<Option<User>, RepositoryError>;

    /// Persist a new user in a single atomic insert
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;
}
