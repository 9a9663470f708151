use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as Argon2Hasher, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use tracing::error;

use crate::domain::{
    error::DomainError, models::credential::HashedPassword,
    services::password_service::PasswordHasher,
};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(cost: HashCost) -> Result<Self, DomainError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| DomainError::PasswordHashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn hash_blocking(params: Params, plain_password: &[u8]) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(plain_password, &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                DomainError::PasswordHashing(e.to_string())
            })
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let params = self.params.clone();
        let plain_password = plain_password.as_bytes().to_vec();

        // argon2 is CPU bound; keep it off the async workers
        let hash = tokio::task::spawn_blocking(move || Self::hash_blocking(params, &plain_password))
            .await
            .map_err(|e| DomainError::PasswordHashing(e.to_string()))??;

        Ok(HashedPassword::new(hash))
    }
}
