use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    SqlErr,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            credential::HashedPassword,
            user::{ConfirmationCode, User},
        },
        repositories::user_repository::UserRepository,
    },
    infrastructure::entity::users,
};

pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_domain(model: users::Model) -> User {
    User::reconstruct(
        model.id,
        model.login,
        model.email,
        HashedPassword::new(model.password_hash),
        model.created_at.with_timezone(&Utc),
        ConfirmationCode::new(model.confirmation_code),
        model.expiration_date.with_timezone(&Utc),
        model.is_confirmed,
    )
}

fn map_insert_error(err: DbErr) -> RepositoryError {
    classify_insert_error(err.sql_err(), &err)
}

fn classify_insert_error(sql_err: Option<SqlErr>, err: &DbErr) -> RepositoryError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::UniqueViolation {
            field: unique_field(&detail),
            detail,
        },
        _ => RepositoryError::DatabaseError(err.to_string()),
    }
}

/// Map the violated constraint (`users_email_key`, ...) back to the input field
fn unique_field(detail: &str) -> &'static str {
    if detail.contains("confirmation_code") {
        "confirmationCode"
    } else if detail.contains("email") {
        "email"
    } else if detail.contains("login") {
        "login"
    } else {
        "user"
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_login_or_email(&self, value: &str) -> Result<Option<User>, RepositoryError> {
        let user = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Login.eq(value))
                    .add(users::Column::Email.eq(value)),
            )
            .one(&self.db)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(user.map(into_domain))
    }

    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let user_model = users::ActiveModel {
            id: Set(*user.id().as_uuid()),
            login: Set(user.login().to_string()),
            email: Set(user.email().to_string()),
            password_hash: Set(user.password().as_str().to_string()),
            created_at: Set(user.created_at().fixed_offset()),
            confirmation_code: Set(user.confirmation_code().as_str().to_string()),
            expiration_date: Set(user.expiration_date().fixed_offset()),
            is_confirmed: Set(user.is_confirmed()),
        };

        // single-row insert, either fully written or not at all
        users::Entity::insert(user_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(map_insert_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rstest::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::*;

    fn stored_model() -> users::Model {
        let created_at = Utc::now().fixed_offset();
        users::Model {
            id: Uuid::from_u128(7),
            login: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$stored".to_string(),
            created_at,
            confirmation_code: Uuid::from_u128(8).to_string(),
            expiration_date: created_at + TimeDelta::hours(1),
            is_confirmed: false,
        }
    }

    fn new_user() -> User {
        User::register(
            Uuid::from_u128(1),
            "carol".to_string(),
            "carol@x.com".to_string(),
            HashedPassword::new("$argon2id$new".to_string()),
            ConfirmationCode::new(Uuid::from_u128(2).to_string()),
            Utc::now(),
            TimeDelta::hours(1),
        )
    }

    #[tokio::test]
    async fn test_find_by_login_or_email_positive() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored_model()]])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let user = repo
            .find_by_login_or_email("alice@x.com")
            .await
            .unwrap()
            .expect("user should be found");

        assert_eq!(user.login(), "alice");
        assert_eq!(user.email(), "alice@x.com");
        assert_eq!(user.password().as_str(), "$argon2id$stored");
        assert!(!user.is_confirmed());
    }

    #[tokio::test]
    async fn test_find_by_login_or_email_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        assert!(repo.find_by_login_or_email("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_positive() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        repo.create(&new_user()).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_storage_error_negative() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let repo = PostgresUserRepository::new(db);

        let err = repo.create(&new_user()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DatabaseError(_)));
    }

    #[rstest]
    #[case("users_login_key", "login")]
    #[case("users_email_key", "email")]
    #[case("users_confirmation_code_key", "confirmationCode")]
    #[case("users_pkey", "user")]
    fn test_unique_violation_names_field(#[case] constraint: &str, #[case] field: &str) {
        let detail = format!(
            "duplicate key value violates unique constraint \"{}\"",
            constraint
        );
        let err = classify_insert_error(
            Some(SqlErr::UniqueConstraintViolation(detail.clone())),
            &DbErr::Custom(detail.clone()),
        );

        match err {
            RepositoryError::UniqueViolation {
                field: mapped,
                detail: kept,
            } => {
                assert_eq!(mapped, field);
                assert_eq!(kept, detail);
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }

    #[test]
    fn test_other_sql_errors_stay_database_errors() {
        let err = classify_insert_error(None, &DbErr::Custom("timeout".to_string()));
        assert!(matches!(err, RepositoryError::DatabaseError(msg) if msg.contains("timeout")));
    }
}
