//! User repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::corrupt;
use crate::backend::{RepositoryError, UserDirectory};
use crate::models::{NewUser, User};
use crate::types::{Phone, UserId};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    phone: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let phone = Phone::parse(&row.phone).map_err(|e| corrupt("phone", e))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            phone,
            created_at: row.created_at,
            is_admin: row.is_admin,
        })
    }
}

/// Users stored in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, phone, is_admin, created_at
            FROM users
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn find_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, phone, is_admin, created_at
            FROM users
            WHERE phone = $1
            ",
        )
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, phone, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, phone, is_admin, created_at
            ",
        )
        .bind(&user.name)
        .bind(user.phone.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "phone {} already registered",
                    user.phone
                ));
            }
            RepositoryError::from(e)
        })?;

        User::try_from(row)
    }

    async fn set_admin(&self, phone: &Phone, is_admin: bool) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users
            SET is_admin = $2
            WHERE phone = $1
            RETURNING id, name, phone, is_admin, created_at
            ",
        )
        .bind(phone.as_str())
        .bind(is_admin)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        User::try_from(row)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
