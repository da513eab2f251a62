// src/core/service_client.rs
//! API gateway: attaches the session credential and normalizes every response
//! into success, client rejection or transport failure

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, trace, warn};

use crate::error::ApiError;
use crate::session::SessionStore;

pub const TOKEN_ENDPOINT: &str = "/users/api/auth/token/";
pub const TOKEN_REFRESH_ENDPOINT: &str = "/users/api/auth/token/refresh/";
pub const REGISTRATION_ENDPOINT: &str = "/users/api/auth/registration/";
pub const PASSWORD_RESET_ENDPOINT: &str = "/users/api/auth/password/reset/";
pub const PASSWORD_RESET_CONFIRM_ENDPOINT: &str = "/users/api/auth/password/reset/confirm/";
pub const PROFILE_ENDPOINT: &str = "/users/api/profile/";
pub const UPLOAD_RESUME_ENDPOINT: &str = "/resume/upload/";
pub const MATCH_RESUME_ENDPOINT: &str = "/resume/match/";
pub const VACANCIES_ENDPOINT: &str = "/vacancies/vacancies/";

/// A file carried as one multipart field
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FilePart),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    /// Full `Authorization` header value
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The network seam. Implementations only move bytes; status handling is the
/// gateway's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// `timeout_seconds` is the caller's deadline for a whole exchange
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        trace!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, &url);
        if let Some(authorization) = request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(payload) => builder.json(&payload),
            RequestBody::Multipart(file) => {
                let form = Form::new().part(
                    file.field,
                    Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .context("Failed to create multipart")?,
                );
                builder.multipart(form)
            }
        };

        let response = builder
            .send()
            .await
            .with_context(|| format!("HTTP request to {} failed", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response text")?;

        Ok(RawResponse { status, body })
    }
}

pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Issue one call. With `auth` set the session credential is required and
    /// attached; its absence fails before anything touches the network.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        auth: bool,
    ) -> Result<Value, ApiError> {
        let authorization = if auth {
            let credential = self.session.credential().ok_or(ApiError::Unauthenticated)?;
            if credential.is_expired_at(Utc::now()) {
                info!("Access token expired, clearing credential");
                self.session.clear_credential();
                return Err(ApiError::Unauthenticated);
            }
            Some(credential.bearer())
        } else {
            None
        };

        let request = ApiRequest {
            method: method.clone(),
            path: path.to_string(),
            body,
            authorization,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                error!("{} {} failed: {:#}", method, path, e);
                return Err(ApiError::TransportFailure(format!("{:#}", e)));
            }
        };

        trace!("{} {} -> {}", method, path, response.status);
        self.normalize(path, auth, response)
    }

    pub async fn get<R>(&self, path: &str, auth: bool) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let payload = self.request(Method::GET, path, RequestBody::Empty, auth).await?;
        decode(path, payload)
    }

    pub async fn post_json<T, R>(&self, path: &str, body: &T, auth: bool) -> Result<R, ApiError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let payload = self
            .request(Method::POST, path, json_body(body)?, auth)
            .await?;
        decode(path, payload)
    }

    pub async fn put_json<T, R>(&self, path: &str, body: &T, auth: bool) -> Result<R, ApiError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let payload = self
            .request(Method::PUT, path, json_body(body)?, auth)
            .await?;
        decode(path, payload)
    }

    pub async fn delete(&self, path: &str, auth: bool) -> Result<(), ApiError> {
        self.request(Method::DELETE, path, RequestBody::Empty, auth)
            .await
            .map(|_| ())
    }

    fn normalize(&self, path: &str, auth: bool, response: RawResponse) -> Result<Value, ApiError> {
        let status = response.status;

        match status {
            200..=299 => {
                if response.body.trim().is_empty() {
                    return Ok(Value::Null);
                }
                serde_json::from_str(&response.body).map_err(|e| {
                    error!("Undecodable response from {}: {}", path, e);
                    ApiError::TransportFailure(format!("invalid JSON in response: {}", e))
                })
            }
            400..=499 => {
                if status == 401 && auth {
                    warn!("Server rejected the credential for {}", path);
                    self.session.clear_credential();
                }
                let payload = serde_json::from_str(&response.body)
                    .unwrap_or_else(|_| Value::String(response.body.clone()));
                Err(ApiError::ClientRejected { status, payload })
            }
            _ => {
                error!("Service error {} from {}: {}", status, path, response.body);
                Err(ApiError::TransportFailure(format!(
                    "server responded with status {}",
                    status
                )))
            }
        }
    }
}

fn json_body<T: Serialize>(body: &T) -> Result<RequestBody, ApiError> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(|e| ApiError::TransportFailure(format!("failed to encode request: {}", e)))
}

fn decode<R: DeserializeOwned>(path: &str, payload: Value) -> Result<R, ApiError> {
    serde_json::from_value(payload).map_err(|e| {
        error!("Unexpected response shape from {}: {}", path, e);
        ApiError::TransportFailure(format!("unexpected response shape: {}", e))
    })
}
