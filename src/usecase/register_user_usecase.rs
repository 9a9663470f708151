use chrono::{TimeDelta, Utc};
use tracing::{debug, info, instrument};

use crate::domain::{
    error::DomainError,
    events::user_registration_event::UserRegistrationEvent,
    models::user::{ConfirmationCode, User},
    repositories::user_repository::UserRepository,
    services::{
        event_service::EventPublisher, password_service::PasswordHasher,
        token_service::TokenGenerator,
    },
};

/// Input payload for one registration
#[derive(Clone)]
pub struct RegisterUserCommand {
    pub login: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterUserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserCommand")
            .field("login", &self.login)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

pub struct RegisterUserUsecase<
    R: UserRepository,
    P: PasswordHasher,
    T: TokenGenerator,
    E: EventPublisher,
> {
    user_repository: R,
    password_hasher: P,
    token_generator: T,
    event_publisher: E,
    confirmation_window: TimeDelta,
}

impl<R: UserRepository, P: PasswordHasher, T: TokenGenerator, E: EventPublisher>
    RegisterUserUsecase<R, P, T, E>
{
    pub fn new(
        user_repository: R,
        password_hasher: P,
        token_generator: T,
        event_publisher: E,
        confirmation_window: TimeDelta,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_generator,
            event_publisher,
            confirmation_window,
        }
    }

    /// Register a new unconfirmed user and announce it.
    ///
    /// Uniqueness is checked before any write, but the check and the insert
    /// are not atomic: a concurrent duplicate is rejected by the store and
    /// comes back as a repository error.
    #[instrument(skip_all, fields(login = %command.login))]
    pub async fn execute(&self, command: RegisterUserCommand) -> Result<(), DomainError> {
        let RegisterUserCommand {
            login,
            email,
            password,
        } = command;

        if self
            .user_repository
            .find_by_login_or_email(&login)
            .await?
            .is_some()
        {
            debug!("login already taken");
            return Err(DomainError::field("login", "Login is not unique"));
        }

        if self
            .user_repository
            .find_by_login_or_email(&email)
            .await?
            .is_some()
        {
            debug!("email already taken");
            return Err(DomainError::field("email", "Email is not unique"));
        }

        let password_hash = self.password_hasher.hash(&password).await?;

        let id = self.token_generator.generate();
        let confirmation_code = ConfirmationCode::new(self.token_generator.generate().to_string());

        let user = User::register(
            id,
            login,
            email,
            password_hash,
            confirmation_code,
            Utc::now(),
            self.confirmation_window,
        );

        self.user_repository.create(&user).await?;
        info!(user_id = %user.id(), "user registered");

        self.event_publisher.publish(UserRegistrationEvent::new(
            user.email().to_string(),
            user.confirmation_code().clone(),
        ));

        Ok(())
    }
}
