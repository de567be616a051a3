use anyhow::Context;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
};
use crate::{
    error::AppError,
    users::{NewUser, UserStore},
};

const CREDENTIALS_REQUIRED: &str = "Email and Password required";

/// Treats absent and empty strings alike.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AppError> {
    match (present(email), present(password)) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation(CREDENTIALS_REQUIRED.into())),
    }
}

/// Registers a new user. Uniqueness of the email is left to the store, so
/// concurrent signups for one address cannot both succeed.
pub async fn signup(store: &dyn UserStore, req: SignupRequest) -> Result<(), AppError> {
    let (email, password) = credentials(req.email, req.password)?;

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")??;

    let user = store
        .insert(NewUser {
            email,
            password_hash,
            first_name: present(req.first_name),
            last_name: present(req.last_name),
            phone: present(req.phone),
        })
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(())
}

/// Checks credentials and returns a signed token for the user.
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<String, AppError> {
    let (email, password) = credentials(req.email, req.password)?;

    let Some(user) = store.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::NotFound("User not found".into()));
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task failed")??;
    if !ok {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}
