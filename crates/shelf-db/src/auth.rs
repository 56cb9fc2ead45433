//! # Authentication Gateway
//!
//! Credential verification and account creation.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  verify_credentials("ana", "s3cret")                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  users WHERE username = ? ──► none ──► verify(dummy) ──► Ok(None)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  argon2 verify(password, password_hash) ──► mismatch ──► Ok(None)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ok(Some(User))  → caller builds a Session from it                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown user and wrong password are indistinguishable to the caller.
//! Hashes are PHC strings (`$argon2id$...`) with a random salt per user.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::user::UserRepository;
use shelf_core::validation::validate_new_user;
use shelf_core::{NewUser, Role, User};

/// Verified against on the unknown-user path so both misses cost one
/// argon2 run. Same parameters as `Argon2::default()`; matches no password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Verifies credentials and creates accounts.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    users: UserRepository,
}

impl AuthGateway {
    /// Creates a gateway over the given user repository.
    pub fn new(users: UserRepository) -> Self {
        AuthGateway { users }
    }

    /// Checks a username/password pair.
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - Credentials match
    /// * `Ok(None)` - Unknown user or wrong password
    pub async fn verify_credentials(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        let Some(credentials) = self.users.find_credentials(username.trim()).await? else {
            let _ = verify_password(password, DUMMY_HASH);
            warn!(username = %username, "Login failed: unknown user");
            return Ok(None);
        };

        if verify_password(password, &credentials.password_hash) {
            info!(user_id = credentials.user.id, role = %credentials.user.role, "Login succeeded");
            Ok(Some(credentials.user))
        } else {
            warn!(username = %username, "Login failed: wrong password");
            Ok(None)
        }
    }

    /// Creates an account, hashing its password.
    ///
    /// ## Errors
    /// * `DbError::Invalid` - Blank username or empty password
    /// * `DbError::UniqueViolation` - Username taken
    pub async fn create_user(&self, new_user: &NewUser) -> DbResult<User> {
        validate_new_user(new_user)?;

        let mut new_user = new_user.clone();
        new_user.username = new_user.username.trim().to_string();

        let hash = hash_password(&new_user.password)?;
        let user = self.users.insert(&new_user, &hash).await?;

        info!(user_id = user.id, role = %user.role, "Created user");
        Ok(user)
    }

    /// Lists every account.
    pub async fn list_users(&self) -> DbResult<Vec<User>> {
        self.users.list().await
    }

    /// Creates the bootstrap admin account unless `username` already exists.
    ///
    /// An existing account is left alone, password and role included.
    ///
    /// ## Returns
    /// Whether an account was created.
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> DbResult<bool> {
        if self.users.find_credentials(username.trim()).await?.is_some() {
            return Ok(false);
        }

        let admin = NewUser {
            username: username.to_string(),
            password: password.to_string(),
            role: Role::Admin,
            name: Some("Administrator".to_string()),
            profile: Default::default(),
        };
        self.create_user(&admin).await?;

        warn!(username = %username, "Created default admin account; change its password");
        Ok(true)
    }
}

/// Hashes a password into a PHC string with a fresh salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// A malformed stored hash verifies as false.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
