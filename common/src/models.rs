use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Routing
// ============================================================================

/// Destination descriptor carried by every successful route transition.
/// A missing page title is normal absence, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteState {
    pub name: String,
    pub page_title: Option<String>,
}

impl RouteState {
    pub fn new(name: impl Into<String>, page_title: Option<&str>) -> Self {
        Self {
            name: name.into(),
            page_title: page_title.map(str::to_string),
        }
    }
}

// ============================================================================
// Schedules
// ============================================================================

/// Schedule creation form. Field names mirror the multipart parts of the
/// create-schedule request; cron and interval are both plain strings because
/// their mutual exclusivity is enforced server-side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub name: String,
    pub group: String,
    pub adapter: String,
    pub listener: String,
    pub cron: String,
    pub interval: String,
    pub message: String,
    pub description: String,
    pub locker: bool,
    pub lock_key: String,
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Warning,
}

/// Transient result/validation alert shown next to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

// ============================================================================
// Server identity
// ============================================================================

/// Server identity returned by `GET server/info` during bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub instance_name: String,
    pub dtap_stage: String,
    #[serde(default)]
    pub version: Option<String>,
}
