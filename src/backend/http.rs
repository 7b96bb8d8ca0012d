//! HTTP calls to the chat backend.
//!
//! Each call is a single attempt without retry or client-side timeout; every
//! failure is reported as an [`ApiError`].

use std::path::Path;

use reqwest::{multipart, RequestBuilder, Response, StatusCode};

use crate::{
    backend::payloads::{ErrorBody, LoginRequest, LoginResponse, MessagePayload},
    domain::{
        api::{ApiError, LoginSuccess},
        auth_form::{Credentials, Registration},
        message::Message,
    },
    infra::{error::AppError, session_store::SessionStore},
};

const HTTP_REQUEST_FAILED: &str = "HTTP_REQUEST_FAILED";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("roomchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::HttpClient)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginSuccess, ApiError> {
        let request = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            });

        let response = send(request).await?;
        let body: LoginResponse = decode(response).await?;
        if body.access_token.trim().is_empty() {
            return Err(ApiError::InvalidData("empty access token".to_owned()));
        }

        Ok(body.into())
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let credentials = &registration.credentials;
        let mut form = multipart::Form::new()
            .text("username", credentials.username.clone())
            .text("password", credentials.password.clone());

        if let Some(path) = registration.avatar.as_deref() {
            form = form.part("avatar", avatar_part(path).await?);
        }

        let request = self.http.post(self.endpoint("/auth/register")).multipart(form);
        send(request).await.map(|_| ())
    }

    pub async fn fetch_history(&self, room: &str) -> Result<Vec<Message>, ApiError> {
        let request = self.authorized(self.http.get(self.endpoint(&history_path(room))));
        let response = send(request).await?;
        let payloads: Vec<MessagePayload> = decode(response).await?;

        Ok(payloads.into_iter().map(Message::from).collect())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The token is read at request time, so a logout in between is honored.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn history_path(room: &str) -> String {
    format!("/chat/{}", urlencoding::encode(room))
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|error| {
        tracing::warn!(code = HTTP_REQUEST_FAILED, error = %error, "backend request failed");
        ApiError::Unavailable(error.without_url().to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_text);
    tracing::warn!(
        code = HTTP_REQUEST_FAILED,
        status = status.as_u16(),
        message = message.as_deref(),
        "backend rejected request"
    );

    Err(status_error(status, message))
}

fn status_error(status: StatusCode, message: Option<String>) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized
    } else {
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::InvalidData(error.without_url().to_string()))
}

async fn avatar_part(path: &Path) -> Result<multipart::Part, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|error| ApiError::AvatarRead(format!("{}: {error}", path.display())))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_owned());

    multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime(path))
        .map_err(|error| ApiError::AvatarRead(error.to_string()))
}

fn image_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
