use std::sync::{Arc, LazyLock};

use crate::{
    domain::{
        error::{DomainError, FieldError, RepositoryError},
        repositories::user_repository::UserRepository,
        services::{
            event_service::EventPublisher, password_service::PasswordHasher,
            token_service::TokenGenerator,
        },
    },
    usecase::register_user_usecase::{RegisterUserCommand, RegisterUserUsecase},
};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::error;

static LOGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("static regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("static regex"));

// Request

/// json for registration request
/// missing fields default to empty so `validate` reports them by name
#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub login: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    /// Shape checks on the raw input; every failing field is reported
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let login = self.login.trim();
        let login_len = login.chars().count();
        if !(3..=10).contains(&login_len) || !LOGIN_RE.is_match(login) {
            errors.push(FieldError::new(
                "login",
                "Login must be 3-10 characters of letters, digits, '_' or '-'",
            ));
        }

        // the password is hashed verbatim, so it is measured verbatim
        let password_len = self.password.chars().count();
        if !(6..=20).contains(&password_len) {
            errors.push(FieldError::new(
                "password",
                "Password must be 6-20 characters",
            ));
        }

        if !EMAIL_RE.is_match(self.email.trim()) {
            errors.push(FieldError::new("email", "Email is invalid"));
        }

        errors
    }
}

impl From<RegisterRequest> for RegisterUserCommand {
    fn from(request: RegisterRequest) -> Self {
        Self {
            login: request.login.trim().to_string(),
            email: request.email.trim().to_string(),
            password: request.password,
        }
    }
}

// Response

/// json body for every rejected request
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub errors_messages: Vec<FieldError>,
}

fn error_response(status: StatusCode, errors: Vec<FieldError>) -> Response {
    (
        status,
        Json(ErrorResponse {
            errors_messages: errors,
        }),
    )
        .into_response()
}

fn not_unique_message(field: &str) -> String {
    match field {
        "login" => "Login is not unique".to_string(),
        "email" => "Email is not unique".to_string(),
        other => format!("{} is not unique", other),
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::Validation(errors) => error_response(StatusCode::BAD_REQUEST, errors),
            // a concurrent registration won the race past the uniqueness check
            DomainError::Repository(RepositoryError::UniqueViolation { field, detail }) => {
                tracing::warn!(field, %detail, "duplicate rejected by store");
                error_response(
                    StatusCode::CONFLICT,
                    vec![FieldError::new(field, not_unique_message(field))],
                )
            }
            other => {
                error!(error = %other, "registration failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json("Registration failed")).into_response()
            }
        }
    }
}

/* Router Function and Handler Function */

// Auth Router

/// function return Router object
/// Suppose to be nested by main router under /auth
pub fn create_user_router<
    R: UserRepository + 'static,
    P: PasswordHasher + 'static,
    T: TokenGenerator + 'static,
    E: EventPublisher + 'static,
>(
    register_service: RegisterUserUsecase<R, P, T, E>,
) -> Router {
    let state = AppState {
        register_service: Arc::new(register_service),
    };

    Router::new()
        .route("/registration", post(register::<R, P, T, E>))
        .with_state(state)
}

pub struct AppState<R: UserRepository, P: PasswordHasher, T: TokenGenerator, E: EventPublisher> {
    pub register_service: Arc<RegisterUserUsecase<R, P, T, E>>,
}

// derive(Clone) would demand Clone on every collaborator
impl<R: UserRepository, P: PasswordHasher, T: TokenGenerator, E: EventPublisher> Clone
    for AppState<R, P, T, E>
{
    fn clone(&self) -> Self {
        Self {
            register_service: Arc::clone(&self.register_service),
        }
    }
}

// handler function

/// handler function for registration
async fn register<R: UserRepository, P: PasswordHasher, T: TokenGenerator, E: EventPublisher>(
    State(state): State<AppState<R, P, T, E>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, DomainError> {
    let Json(payload) =
        payload.map_err(|rejection| DomainError::field("body", &rejection.body_text()))?;

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(DomainError::Validation(errors));
    }

    state.register_service.execute(payload.into()).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use rstest::*;

    use super::*;

    fn request(login: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn valid_request_has_no_errors() {
        assert!(request("carol", "carol@x.com", "secret1").validate().is_empty());
    }

    #[rstest]
    #[case("ab", "login")]
    #[case("waytoolonglogin", "login")]
    #[case("bad login", "login")]
    fn invalid_login_is_reported(#[case] login: &str, #[case] field: &str) {
        let errors = request(login, "carol@x.com", "secret1").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, field);
    }

    #[test]
    fn every_bad_field_is_reported() {
        let errors = request("a", "not-an-email", "123").validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["login", "password", "email"]);
    }

    #[test]
    fn command_is_trimmed_but_password_is_kept_verbatim() {
        let command: RegisterUserCommand = request(" carol ", " carol@x.com ", " secret1 ").into();
        assert_eq!(command.login, "carol");
        assert_eq!(command.email, "carol@x.com");
        assert_eq!(command.password, " secret1 ");
    }

    #[rstest]
    #[case("  abc  ", true)]
    #[case("abcdef", true)]
    #[case("  ab ", false)]
    #[case("      ", true)]
    fn password_length_counts_surrounding_spaces(#[case] password: &str, #[case] valid: bool) {
        let errors = request("carol", "carol@x.com", password).validate();
        assert_eq!(errors.is_empty(), valid);
    }

    #[test]
    fn missing_fields_deserialize_empty_and_fail_validation() {
        let request: RegisterRequest =
            serde_json::from_str(r#"{"login":"carol","email":"carol@x.com"}"#).unwrap();
        let errors = request.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "password");
    }

    async fn conflict_body(field: &'static str) -> (StatusCode, ErrorResponse) {
        let err = DomainError::Repository(RepositoryError::UniqueViolation {
            field,
            detail: format!("duplicate key value violates unique constraint \"users_{}_key\"", field),
        });
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn store_duplicate_email_names_email_field() {
        let (status, body) = conflict_body("email").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.errors_messages, vec![FieldError::new("email", "Email is not unique")]);
    }

    #[tokio::test]
    async fn store_duplicate_login_names_login_field() {
        let (status, body) = conflict_body("login").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.errors_messages, vec![FieldError::new("login", "Login is not unique")]);
    }
}
