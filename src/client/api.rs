//! Talking to the portal backend

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::auth::models::{
    AccountStatus, LoginRequest, LoginResponse, MessageResponse, PublicAccount, RecoveryRequest,
    SessionResponse, StatusResponse,
};
use crate::auth::SESSION_HEADER;
use crate::error::Result;

/// What the client keeps locally after logging in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSession {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub user: PublicAccount,
}

/// A request that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// The server answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },
    /// No answer at all
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

/// Result of asking the server whether we are still welcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Valid,
    Rejected,
    Unreachable,
}

impl<T> From<&std::result::Result<T, ApiFailure>> for ProbeOutcome {
    fn from(result: &std::result::Result<T, ApiFailure>) -> Self {
        match result {
            Ok(_) => ProbeOutcome::Valid,
            Err(ApiFailure::Rejected { .. }) => ProbeOutcome::Rejected,
            Err(ApiFailure::Unreachable(_)) => ProbeOutcome::Unreachable,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

/// Backend operations the watchdog needs
pub trait PortalApi: Send + Sync {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ApiResult<ClientSession>> + Send;

    fn account_status(&self, email: &str) -> impl Future<Output = ApiResult<AccountStatus>> + Send;

    fn check_session(&self, token: &str) -> impl Future<Output = ApiResult<PublicAccount>> + Send;

    fn logout(&self, token: Option<&str>) -> impl Future<Output = ApiResult<()>> + Send;

    fn remember_password(&self, email: &str) -> impl Future<Output = ApiResult<String>> + Send;
}

/// [`PortalApi`] over HTTP
#[derive(Clone)]
pub struct HttpPortal {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortal {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn unreachable(err: reqwest::Error) -> ApiFailure {
    ApiFailure::Unreachable(err.to_string())
}

/// Decode a success body, or turn the `{ success, message }` envelope into a rejection
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(unreachable);
    }

    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
    };

    Err(ApiFailure::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl PortalApi for HttpPortal {
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ApiResult<ClientSession>> + Send {
        let request = self.client.post(self.url("/api/auth/login")).json(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        });

        async move {
            let response = request.send().await.map_err(unreachable)?;
            let body: LoginResponse = decode(response).await?;
            Ok(ClientSession {
                session_id: body.session_id,
                user: body.user,
            })
        }
    }

    fn account_status(&self, email: &str) -> impl Future<Output = ApiResult<AccountStatus>> + Send {
        let url = reqwest::Url::parse_with_params(
            &self.url("/api/auth/status"),
            &[("email", email)],
        );
        let client = self.client.clone();

        async move {
            let url = url.map_err(|e| ApiFailure::Unreachable(e.to_string()))?;
            let response = client.get(url).send().await.map_err(unreachable)?;
            let body: StatusResponse = decode(response).await?;
            Ok(body.status)
        }
    }

    fn check_session(&self, token: &str) -> impl Future<Output = ApiResult<PublicAccount>> + Send {
        let request = self
            .client
            .get(self.url("/api/auth/check-session"))
            .header(SESSION_HEADER, token);

        async move {
            let response = request.send().await.map_err(unreachable)?;
            let body: SessionResponse = decode(response).await?;
            Ok(body.user)
        }
    }

    fn logout(&self, token: Option<&str>) -> impl Future<Output = ApiResult<()>> + Send {
        let mut request = self.client.post(self.url("/api/auth/logout"));
        if let Some(token) = token {
            request = request.header(SESSION_HEADER, token);
        }

        async move {
            let response = request.send().await.map_err(unreachable)?;
            let _: MessageResponse = decode(response).await?;
            Ok(())
        }
    }

    fn remember_password(&self, email: &str) -> impl Future<Output = ApiResult<String>> + Send {
        let request = self
            .client
            .post(self.url("/api/auth/remember-password"))
            .json(&RecoveryRequest {
                email: Some(email.to_string()),
            });

        async move {
            let response = request.send().await.map_err(unreachable)?;
            let body: MessageResponse = decode(response).await?;
            Ok(body.message)
        }
    }
}
