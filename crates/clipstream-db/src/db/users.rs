//! User repository: registration writes and credential lookups.

use clipstream_core::models::User;
use clipstream_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for user identity records.
///
/// Callers hash the password before reaching this layer; the repository never
/// sees plaintext credentials.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user. The unique index on `email` is the final arbiter of
    /// uniqueness; a violation surfaces as [`AppError::Conflict`].
    #[tracing::instrument(
        skip(self, password_hash),
        fields(db.table = "users", db.operation = "insert")
    )]
    pub async fn create(
        &self,
        name: Option<String>,
        email: String,
        password_hash: String,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4();

        let user = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(&email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => {
                AppError::Conflict("A user with this email already exists".to_string())
            }
            other => other,
        })?;

        Ok(user)
    }

    /// Look up a user by email (for the external login collaborator).
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether any user already holds this email.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let exists: (bool,) =
            sqlx::query_as::<Postgres, (bool,)>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }
}
