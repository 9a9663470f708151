use async_trait::async_trait;

use crate::domain::{error::DomainError, models::credential::HashedPassword};

/// One-way password hashing
#[async_trait]
pub trait PasswordHasher: Clone + Send + Sync {
    /// Hash a plain text password
    async fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError>;
}
