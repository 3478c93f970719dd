// REST API client for the integration platform
//
// The REST API lives under `iaf/api/` relative to the server root; the
// embedded sub-tools are served as plain pages next to it.

use std::time::Duration;

use async_trait::async_trait;
use common::errors::ApiError;
use common::models::{ScheduleForm, ServerInfo};
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use url::Url;

const API_ROOT: &str = "iaf/api/";

/// Sub-tools embedded in the console as frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedTool {
    Larva,
    Ladybug,
}

impl EmbeddedTool {
    fn path(self) -> &'static str {
        match self {
            EmbeddedTool::Larva => "iaf/larva",
            EmbeddedTool::Ladybug => "iaf/ladybug",
        }
    }
}

/// Surface of the platform API used by the console.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// Fetch the server identity published during bootstrap.
    async fn server_info(&self) -> Result<ServerInfo, ApiError>;

    /// Create a schedule from the form and the separately tracked
    /// configuration selection. The server owns all validation.
    async fn create_schedule(
        &self,
        form: &ScheduleForm,
        configuration: &str,
    ) -> Result<(), ApiError>;
}

pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client against the server root URL. `base` must end with a
    /// slash so relative resolution keeps the server's context path.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport {
                status: None,
                message: format!("failed to create HTTP client: {}", e),
            })?;
        Ok(Self { http, base })
    }

    fn api_url(&self, resource: &str) -> Result<Url, ApiError> {
        self.base
            .join(API_ROOT)
            .and_then(|api| api.join(resource))
            .map_err(|e| ApiError::Transport {
                status: None,
                message: format!("invalid request URL for '{}': {}", resource, e),
            })
    }

    /// URL rendered as the source of an embedded frame, e.g.
    /// `{base}iaf/larva`. No protocol beyond ordinary page loading.
    pub fn frame_url(&self, tool: EmbeddedTool) -> Result<Url, ApiError> {
        self.base.join(tool.path()).map_err(|e| ApiError::Transport {
            status: None,
            message: format!("invalid frame URL: {}", e),
        })
    }

    fn transport(e: reqwest::Error) -> ApiError {
        ApiError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// Map a non-success response onto the error taxonomy: the JSON body's
    /// `error` field when it has one, otherwise a transport-level failure
    /// carrying the status' canonical reason.
    async fn reject(response: Response) -> ApiError {
        let status = response.status();
        let reason = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();

        match response.json::<serde_json::Value>().await {
            Ok(body) => match body.get("error").and_then(|e| e.as_str()) {
                Some(message) => ApiError::ServerRejected {
                    message: message.to_string(),
                },
                None => ApiError::Transport {
                    status: Some(status.as_u16()),
                    message: reason,
                },
            },
            Err(_) => ApiError::Transport {
                status: Some(status.as_u16()),
                message: reason,
            },
        }
    }
}

/// Multipart parts of the create-schedule request, in wire order. All
/// eleven are sent unconditionally as strings, locker included.
fn schedule_parts(form: &ScheduleForm, configuration: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", form.name.clone()),
        ("group", form.group.clone()),
        ("configuration", configuration.to_string()),
        ("adapter", form.adapter.clone()),
        ("listener", form.listener.clone()),
        ("cron", form.cron.clone()),
        ("interval", form.interval.clone()),
        ("message", form.message.clone()),
        ("description", form.description.clone()),
        ("locker", form.locker.to_string()),
        ("lockkey", form.lock_key.clone()),
    ]
}

#[async_trait]
impl ScheduleApi for ApiClient {
    #[tracing::instrument(skip(self))]
    async fn server_info(&self) -> Result<ServerInfo, ApiError> {
        let url = self.api_url("server/info")?;
        let response = self.http.get(url).send().await.map_err(Self::transport)?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        response
            .json::<ServerInfo>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    #[tracing::instrument(skip(self, form), fields(schedule = %form.name))]
    async fn create_schedule(
        &self,
        form: &ScheduleForm,
        configuration: &str,
    ) -> Result<(), ApiError> {
        let url = self.api_url("schedules")?;

        let mut body = Form::new();
        for (name, value) in schedule_parts(form, configuration) {
            body = body.text(name, value);
        }

        let response = self
            .http
            .post(url)
            .multipart(body)
            .send()
            .await
            .map_err(Self::transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject(response).await)
        }
    }
}
