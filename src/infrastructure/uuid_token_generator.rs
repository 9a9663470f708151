use uuid::Uuid;

use crate::domain::services::token_service::TokenGenerator;

#[derive(Clone, Default)]
pub struct UuidTokenGenerator;

impl UuidTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}
