use crate::domain::models::user::ConfirmationCode;

/// Emitted once a new user row is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistrationEvent {
    pub email: String,
    pub confirmation_code: ConfirmationCode,
}

impl UserRegistrationEvent {
    pub fn new(email: String, confirmation_code: ConfirmationCode) -> Self {
        Self {
            email,
            confirmation_code,
        }
    }
}
