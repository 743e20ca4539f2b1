use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::entities::user::{AuthenticatedUser, Role};
use crate::usecase::ports::api::{ApiError, Mutation, ResourceApi};
use crate::usecase::ports::token_store::TokenStore;

pub const NO_ACCESS_MESSAGE: &str = "This account has no back-office access.";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("account has no back-office access")]
    NoAccess,

    #[error("failed to persist session: {0}")]
    Storage(String),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Api(err) => err.user_message(),
            LoginError::NoAccess => NO_ACCESS_MESSAGE.to_string(),
            LoginError::Storage(_) => "Signed in, but the session could not be saved.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
    user: AuthenticatedUser,
}

fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Process-wide signed-in user. Only `init`, `login` and `logout` write it.
pub struct AuthSession {
    api: Rc<dyn ResourceApi>,
    tokens: Rc<dyn TokenStore>,
    user: RefCell<Option<AuthenticatedUser>>,
}

impl AuthSession {
    pub fn new(api: Rc<dyn ResourceApi>, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            user: RefCell::new(None),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.borrow().as_ref().map(|user| user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    /// Restores the session from a stored token. Any failure leaves it signed out.
    pub async fn init(&self) -> Option<AuthenticatedUser> {
        if self.tokens.load().is_none() {
            debug!("no stored token; starting signed out");
            return None;
        }

        let user = match self.api.get("auth/me", &[]).await {
            Ok(body) => serde_json::from_value::<AuthenticatedUser>(unwrap_data(body))
                .map_err(|err| ApiError::Decode(err.to_string())),
            Err(err) => Err(err),
        };

        match user {
            Ok(user) if user.has_backoffice_access() => {
                info!(user_id = user.id, role = ?user.role, "session restored");
                *self.user.borrow_mut() = Some(user.clone());
                Some(user)
            }
            Ok(user) => {
                warn!(user_id = user.id, "stored session has no back-office access");
                self.forget();
                None
            }
            Err(err) => {
                warn!(error = %err, "stored session rejected");
                self.forget();
                None
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, LoginError> {
        let body = self
            .api
            .send(
                Mutation::Post,
                "auth/login",
                Some(json!({ "email": email.trim(), "password": password })),
            )
            .await?;
        let payload: LoginPayload = serde_json::from_value(unwrap_data(body))
            .map_err(|err| ApiError::Decode(err.to_string()))?;

        if !payload.user.has_backoffice_access() {
            warn!(user_id = payload.user.id, "login refused: no back-office role");
            return Err(LoginError::NoAccess);
        }

        self.tokens
            .save(&payload.token)
            .map_err(|err| LoginError::Storage(err.to_string()))?;
        info!(user_id = payload.user.id, role = ?payload.user.role, "signed in");
        *self.user.borrow_mut() = Some(payload.user.clone());
        Ok(payload.user)
    }

    /// Server-side logout is best effort; local state is always cleared.
    pub async fn logout(&self) {
        if let Err(err) = self.api.send(Mutation::Post, "auth/logout", None).await {
            warn!(error = %err, "server logout failed; clearing local session anyway");
        }
        self.forget();
        info!("signed out");
    }

    fn forget(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear stored token");
        }
        *self.user.borrow_mut() = None;
    }
}
