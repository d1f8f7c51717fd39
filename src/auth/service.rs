//! The bundled auth provider.
//!
//! Credentials live in the user store as salted SHA-256 digests; sessions
//! are random bearer tokens, held hashed and process-local. The trait is
//! the contract the rest of the system consumes; swapping in a hosted
//! identity provider means swapping this adapter.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::models::AuthUser;
use crate::store::{StoreError, UserStore};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    WeakPassword,
    #[error("not signed in")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A fresh session: the raw token goes to the client once, never stored.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub user: AuthUser,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignedIn, AuthError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError>;
    async fn sign_out(&self, token: &str);
    /// Resolve a bearer token to the current user, if the session is live.
    async fn authenticate(&self, token: &str) -> Result<Option<AuthUser>, AuthError>;
    /// Re-authenticates with the current password before changing it.
    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
    async fn update_identity(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError>;
}

pub struct LocalAuthService {
    users: Arc<dyn UserStore>,
    // sha256(token) hex -> user id
    sessions: RwLock<HashMap<String, Uuid>>,
}

impl LocalAuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn hash_password(password: &str) -> String {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        format!("{}${}", hex::encode(salt), hex::encode(hasher.finalize()))
    }

    fn verify_password(password: &str, stored: &str) -> bool {
        let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        let mut hasher = Sha256::new();
        hasher.update(&salt);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize()) == digest_hex
    }

    fn digest_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    fn open_session(&self, user: AuthUser) -> SignedIn {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        self.sessions
            .write()
            .unwrap()
            .insert(Self::digest_token(&token), user.id);
        SignedIn { token, user }
    }

    fn session_user_id(&self, token: &str) -> Option<Uuid> {
        self.sessions
            .read()
            .unwrap()
            .get(&Self::digest_token(token))
            .copied()
    }
}

#[async_trait]
impl AuthService for LocalAuthService {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<SignedIn, AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        let record = self
            .users
            .insert(email, &Self::hash_password(password), display_name)
            .await?;
        Ok(self.open_session(AuthUser::from(&record)))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AuthError> {
        let record = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !Self::verify_password(password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.open_session(AuthUser::from(&record)))
    }

    async fn sign_out(&self, token: &str) {
        self.sessions
            .write()
            .unwrap()
            .remove(&Self::digest_token(token));
    }

    async fn authenticate(&self, token: &str) -> Result<Option<AuthUser>, AuthError> {
        let Some(user_id) = self.session_user_id(token) else {
            return Ok(None);
        };
        let record = self.users.find_by_id(user_id).await?;
        Ok(record.as_ref().map(AuthUser::from))
    }

    async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user_id = self
            .session_user_id(token)
            .ok_or(AuthError::Unauthenticated)?;
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let record = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        if !Self::verify_password(current_password, &record.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        self.users
            .update_password_hash(user_id, &Self::hash_password(new_password))
            .await?;
        Ok(())
    }

    async fn update_identity(
        &self,
        user_id: Uuid,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<AuthUser, AuthError> {
        let record = self
            .users
            .update_identity(user_id, display_name, photo_url)
            .await?;
        Ok(AuthUser::from(&record))
    }
}
