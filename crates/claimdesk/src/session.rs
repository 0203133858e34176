use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorSet};
use crate::models::{Role, User};
use crate::route::Route;
use crate::token::TokenStorage;

#[derive(Deserialize)]
struct AuthResponse {
    errors: Option<ErrorSet>,
    user: Option<User>,
    token: Option<String>,
}

#[derive(Serialize)]
struct AssignRoleRequest<'a> {
    user_id: i64,
    role: &'a Role,
}

/// Owns the authenticated identity and the persisted bearer token.
/// Only this store touches either; everything else reads.
pub struct SessionStore {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStorage>,
    pub user: Option<User>,
    pub errors: ErrorSet,
}

impl SessionStore {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStorage>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
            user: None,
            errors: ErrorSet::default(),
        }
    }

    pub fn has_token(&self) -> bool {
        self.tokens.get().is_some()
    }

    fn bearer(&self) -> String {
        self.tokens.get().unwrap_or_default()
    }

    /// Rebuilds the identity from a persisted token. A failed lookup
    /// leaves the identity unset but keeps the token, so a transient
    /// server error does not log the user out.
    pub async fn restore_session(&mut self) -> Result<(), Error> {
        if self.user.is_some() {
            return Ok(());
        }
        let Some(token) = self.tokens.get() else {
            return Ok(());
        };

        let res = self
            .client
            .get(format!("{}/api/user", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if res.status().is_success() {
            self.user = Some(res.json().await?);
        } else {
            debug!("session restore rejected with status {}", res.status());
        }
        Ok(())
    }

    /// Logs in or registers, depending on `endpoint` (`login` or
    /// `register`). On success the token is persisted, the identity is
    /// set, and the caller receives the destination to navigate to:
    /// the user's dashboard, or role selection for a fresh account.
    /// `None` means the attempt failed and `errors` says why.
    pub async fn authenticate<T>(&mut self, endpoint: &str, payload: &T) -> Result<Option<Route>, Error>
    where
        T: Serialize + ?Sized,
    {
        let res = self
            .client
            .post(format!("{}/api/{}", self.base_url, endpoint))
            .json(payload)
            .send()
            .await?;

        let body: AuthResponse = res.json().await?;

        if let Some(errors) = body.errors {
            self.errors = errors;
            return Ok(None);
        }

        let (Some(user), Some(token)) = (body.user, body.token) else {
            self.errors = ErrorSet::field("email", "Login failed. Please check your credentials.");
            return Ok(None);
        };

        self.tokens.set(&token)?;
        self.errors.clear();

        let destination = match user.role {
            Some(role) => Route::Dashboard(role),
            None => Route::SetRole,
        };
        info!("authenticated user {} via {}", user.id, endpoint);
        self.user = Some(user);

        Ok(Some(destination))
    }

    /// Ends the session server-side first. Only a successful response
    /// clears local state and the token; on failure the user stays
    /// logged in client-side and `errors` carries the server's reason.
    pub async fn logout(&mut self) -> Result<Option<Route>, Error> {
        let res = self
            .client
            .post(format!("{}/api/logout", self.base_url))
            .bearer_auth(self.bearer())
            .send()
            .await?;

        if res.status().is_success() {
            self.user = None;
            self.errors.clear();
            self.tokens.delete()?;
            Ok(Some(Route::Home))
        } else {
            let body: serde_json::Value = res.json().await.unwrap_or_default();
            self.errors = ErrorSet::from_body(&body, "Logout failed.");
            Ok(None)
        }
    }

    /// Admin operation: gives `user_id` a role. Returns the updated
    /// identity, or `None` with `errors` populated.
    pub async fn assign_role(&mut self, user_id: i64, role: Role) -> Result<Option<User>, Error> {
        let res = self
            .client
            .post(format!("{}/api/admin/assign-role", self.base_url))
            .bearer_auth(self.bearer())
            .json(&AssignRoleRequest {
                user_id,
                role: &role,
            })
            .send()
            .await?;

        if res.status().is_success() {
            self.errors.clear();
            Ok(Some(res.json().await?))
        } else {
            let body: serde_json::Value = res.json().await.unwrap_or_default();
            self.errors = ErrorSet::from_body(&body, "Failed to assign role.");
            Ok(None)
        }
    }
}
