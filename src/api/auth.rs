//! Authentication calls against the backend
//!
//! The backend owns all credential checks; this client only ships the
//! form contents and persists the returned token. Persisting through the
//! session store broadcasts the change to any subscribed UI.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::session::store::SessionStore;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    full_name: &'a str,
    username: &'a str,
    password: &'a str,
}

/// Successful auth responses wrap the token in a `data` field
#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    data: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl AuthClient {
    pub fn new(config: &ApiConfig, store: Arc<dyn SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Exchange credentials for a session token and persist it
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let response = self
            .http
            .post(format!("{}/auth/accesstoken", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response, status).await;
            return Err(if status == StatusCode::UNAUTHORIZED {
                AppError::Authentication(message)
            } else {
                AppError::Api(message)
            });
        }

        let envelope: TokenEnvelope = response.json().await?;
        self.store.set(&envelope.data)?;
        tracing::info!(username, "Signed in, session token persisted");
        Ok(())
    }

    /// Create an account. The backend does not return a token here; the
    /// caller signs in afterwards.
    pub async fn register(
        &self,
        full_name: &str,
        username: &str,
        password: &str,
    ) -> AppResult<()> {
        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&RegisterRequest {
                full_name,
                username,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(error_message(response, status).await));
        }

        tracing::info!(username, "Account registered");
        Ok(())
    }

    /// Drop the persisted session token. Local only: the backend keeps no
    /// session state to invalidate.
    pub fn logout(&self) -> AppResult<()> {
        self.store.clear()?;
        tracing::info!("Signed out, session token cleared");
        Ok(())
    }
}

async fn error_message(response: reqwest::Response, status: StatusCode) -> String {
    match response.json::<ApiMessage>().await {
        Ok(body) if !body.message.is_empty() => body.message,
        _ => format!("Request failed with status {}", status),
    }
}
