//! HTTP implementation of [`WidgetBackend`].
//!
//! Talks JSON to the widget API (`api_url`) and to the authentication
//! service (`auth_url`, session extension only). Every request is bounded by
//! the configured request timeout; hitting it is an ordinary failure.
//!
//! Chat ids are appended as single percent-encoded path segments, so an id
//! can never alter the route, query, or fragment of a request.

use chatdock_core::backend::WidgetBackend;
use chatdock_types::chat::{ChatId, ChatInfo, Message};
use chatdock_types::config::WidgetSettings;
use chatdock_types::error::BackendError;
use chatdock_types::widget::{EmergencyNotice, WidgetConfig};
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct OnlineStatusResponse {
    online: bool,
}

#[derive(Debug, Clone)]
pub struct HttpWidgetBackend {
    client: reqwest::Client,
    api_url: Url,
    auth_url: Url,
}

impl HttpWidgetBackend {
    pub fn new(settings: &WidgetSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timing.request_timeout())
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: base_url("api_url", &settings.api_url)?,
            auth_url: base_url("auth_url", &settings.auth_url)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BackendError> {
        let url = endpoint(&self.api_url, segments)?;
        tracing::trace!(%url, "GET");
        let response = self.client.get(url.clone()).send().await.map_err(map_send_error)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("{}: {e}", url.path())))
    }
}

fn base_url(field: &str, raw: &str) -> Result<Url, BackendError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| BackendError::InvalidRequest(format!("{field} {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(BackendError::InvalidRequest(format!(
            "{field} {raw:?} cannot carry a path"
        )));
    }
    Ok(url)
}

/// `base` with each of `segments` appended as one encoded path segment.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, BackendError> {
    // The url crate drops dot segments instead of encoding them.
    if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
        return Err(BackendError::InvalidRequest(format!(
            "{segment:?} is not a usable path segment"
        )));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| BackendError::InvalidRequest(format!("{base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn map_send_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        code: status.as_u16(),
        body,
    })
}

impl WidgetBackend for HttpWidgetBackend {
    async fn check_online_status(&self) -> Result<bool, BackendError> {
        let status: OnlineStatusResponse = self.get_json(&["online-status"]).await?;
        Ok(status.online)
    }

    async fn fetch_chat(&self, chat_id: &ChatId) -> Result<ChatInfo, BackendError> {
        self.get_json(&["chats", chat_id.as_str()]).await
    }

    async fn fetch_messages(&self, chat_id: &ChatId) -> Result<Vec<Message>, BackendError> {
        self.get_json(&["chats", chat_id.as_str(), "messages"]).await
    }

    async fn fetch_emergency_notice(&self) -> Result<EmergencyNotice, BackendError> {
        self.get_json(&["emergency-notice"]).await
    }

    async fn fetch_widget_config(&self) -> Result<WidgetConfig, BackendError> {
        self.get_json(&["widget-config"]).await
    }

    async fn extend_session(&self) -> Result<(), BackendError> {
        let url = endpoint(&self.auth_url, &["jwt", "extend"])?;
        tracing::trace!(%url, "POST");
        let response = self.client.post(url).send().await.map_err(map_send_error)?;
        check_status(response).await?;
        Ok(())
    }
}
