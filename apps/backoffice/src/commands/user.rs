//! # User Commands
//!
//! Login turns credentials into a [`Session`]; everything else needs one.

use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use shelf_core::{Capability, NewUser, Session, User};

/// Verifies credentials and opens a session.
///
/// Unknown user and wrong password fail identically.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<Session, ApiError> {
    match state.db().auth().verify_credentials(username, password).await? {
        Some(user) => {
            debug!(user_id = user.id, "Session opened");
            Ok(Session::for_user(&user))
        }
        None => {
            debug!(username = %username, "Login refused");
            Err(ApiError::unauthorized())
        }
    }
}

/// Creates an account. Admin only.
pub async fn create_user(
    state: &AppState,
    session: &Session,
    new_user: NewUser,
) -> Result<User, ApiError> {
    session.require(Capability::ManageUsers)?;

    let user = state.db().auth().create_user(&new_user).await?;
    debug!(id = user.id, by = %session.username, "User created");
    Ok(user)
}

/// Every account, without password hashes.
pub async fn list_users(state: &AppState, session: &Session) -> Result<Vec<User>, ApiError> {
    session.require(Capability::ManageUsers)?;

    let users = state.db().auth().list_users().await?;
    Ok(users)
}
