//! # User Repository
//!
//! Storage for accounts. Password hashes go in and out of this module only
//! through [`AuthGateway`](crate::auth::AuthGateway); every public read
//! returns [`User`], which has no hash field.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shelf_core::{NewUser, User};

const USER_COLUMNS: &str =
    "id, username, role, name, birth_date, email, phone, national_id, profile_image";

/// A user row together with its stored password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user with an already-hashed password.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - Username taken
    pub(crate) async fn insert(&self, user: &NewUser, password_hash: &str) -> DbResult<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                username, password_hash, role, name,
                birth_date, email, phone, national_id, profile_image
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.role)
        .bind(&user.name)
        .bind(&user.profile.birth_date)
        .bind(&user.profile.email)
        .bind(&user.profile.phone)
        .bind(&user.profile.national_id)
        .bind(&user.profile.profile_image)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("username", &user.username),
            other => other,
        })?;

        let id = result.last_insert_rowid();
        debug!(id, username = %user.username, role = %user.role, "Inserted user");

        Ok(User {
            id,
            username: user.username.clone(),
            role: user.role,
            name: user.name.clone(),
            birth_date: user.profile.birth_date.clone(),
            email: user.profile.email.clone(),
            phone: user.profile.phone.clone(),
            national_id: user.profile.national_id.clone(),
            profile_image: user.profile.profile_image.clone(),
        })
    }

    /// Looks up a user and their hash by username.
    pub(crate) async fn find_credentials(&self, username: &str) -> DbResult<Option<UserCredentials>> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1");
        let row = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Every account, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }
}
