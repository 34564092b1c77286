//! Task action requests against the admin backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds and tests supply their own [`TaskApi`].
//!
//! ERROR HANDLING
//! ==============
//! The admin views answer `{success, message}` even on 403, so a non-2xx
//! response with a decodable body is returned as that body. Only transport
//! failures and undecodable error responses become [`ApiError`]s.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::fmt;
use std::future::Future;

use super::types::ActionResponse;
use crate::error::ApiError;

/// State-changing operation exposed per task row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskAction {
    ToggleStatus,
    Restart,
}

impl TaskAction {
    #[must_use]
    pub fn path_suffix(self) -> &'static str {
        match self {
            Self::ToggleStatus => "toggle-status",
            Self::Restart => "restart-task",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_suffix())
    }
}

/// Endpoint for `action` on task `id`, relative to the changelist path.
///
/// `/admin/sports_data/livefixturtask/` + toggle 42 ⇒
/// `/admin/sports_data/livefixturtask/toggle-status/42/`.
#[must_use]
pub fn action_url(list_path: &str, action: TaskAction, id: u64) -> String {
    let base = list_path.strip_suffix('/').unwrap_or(list_path);
    format!("{base}/{}/{id}/", action.path_suffix())
}

/// Value of cookie `name` in a `document.cookie` string.
#[must_use]
pub fn csrf_token(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
}

/// Decode an action response body; non-2xx statuses fall back to an HTTP error.
pub(crate) fn decode_response(status: u16, status_text: &str, body: &str) -> Result<ActionResponse, ApiError> {
    match serde_json::from_str::<ActionResponse>(body) {
        Ok(resp) => Ok(resp),
        Err(_) if !(200..300).contains(&status) => {
            Err(ApiError::Status { status, status_text: status_text.to_owned() })
        }
        Err(err) => Err(ApiError::Decode(err.to_string())),
    }
}

/// Performs task action POSTs.
pub trait TaskApi {
    /// POST to `url`, sending the CSRF header when a token is known.
    fn post_action(&self, url: &str, csrf_token: Option<&str>) -> impl Future<Output = Result<ActionResponse, ApiError>>;
}

/// [`TaskApi`] over `fetch`.
#[cfg(feature = "hydrate")]
pub struct GlooTaskApi {
    csrf_header: String,
}

#[cfg(feature = "hydrate")]
impl GlooTaskApi {
    pub fn new(csrf_header: impl Into<String>) -> Self {
        Self { csrf_header: csrf_header.into() }
    }
}

#[cfg(feature = "hydrate")]
impl TaskApi for GlooTaskApi {
    async fn post_action(&self, url: &str, csrf_token: Option<&str>) -> Result<ActionResponse, ApiError> {
        let mut request = gloo_net::http::Request::post(url);
        if let Some(token) = csrf_token {
            request = request.header(&self.csrf_header, token);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        decode_response(status, &resp.status_text(), &body)
    }
}
