use uuid::Uuid;

/// Source of unique opaque tokens (user ids, confirmation codes)
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}
