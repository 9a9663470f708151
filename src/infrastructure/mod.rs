pub mod argon2_password_hasher;
pub mod broadcast_event_bus;
pub mod entity;
pub mod schema;
pub mod user_repository;
pub mod uuid_token_generator;
