use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::env::Environment;

/// Default API endpoint for the Evntaly cloud.
pub const DEFAULT_BASE_URL: &str = "https://app.evntaly.com/prod";

/// Callback type for observable client side effects.
///
/// Invoked synchronously from the calling thread; keep it cheap.
pub type SignalCallback = Box<dyn Fn(&Signal) + Send + Sync>;

/// Observable side effect emitted by the client.
///
/// Every signal is also mirrored as a `log` line, so a callback is only
/// needed when the caller wants to react (or assert) programmatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// An event was accepted by the API.
    EventTracked,
    /// An event was discarded without a register call.
    EventDropped(DropReason),
    /// A user profile was accepted by the API.
    UserIdentified,
    TrackingEnabled,
    TrackingDisabled,
}

/// Why a tracked event was discarded instead of sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Tracking is switched off on this client.
    TrackingDisabled,
    /// The account limit check reported the quota as exhausted.
    LimitReached,
}

/// Reference to the user an event belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUser {
    pub id: String,
}

/// Environment metadata stamped onto every tracked event by the client.
///
/// Never populated by callers — `track` overwrites it at send time with
/// the SDK version and whatever the client's [`Environment`] reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub sdk_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sdk_runtime: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operating_system: String,
}

/// A single trackable event.
///
/// Field names follow the Evntaly wire format exactly; `data` carries an
/// arbitrary JSON payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    pub message: String,
    pub data: serde_json::Value,
    pub tags: Vec<String>,
    pub notify: bool,
    pub icon: String,
    pub apply_rule_only: bool,
    pub user: EventUser,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub feature: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<EventContext>,
}

/// A user profile for `identify_user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub organization: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Configuration for [`EvntalyClient`](crate::EvntalyClient).
pub struct Options {
    /// Developer secret, sent as the `secret` header (required).
    pub developer_secret: String,
    /// Project token, sent as the `pat` header (required).
    pub project_token: String,
    /// API base URL. Default: the Evntaly cloud.
    pub base_url: String,
    /// Per-request timeout. Default: none (a call may block indefinitely).
    pub timeout: Option<Duration>,
    /// Whether `track` sends events. Default: true.
    pub tracking_enabled: bool,
    /// Optional callback invoked for every [`Signal`].
    pub on_signal: Option<SignalCallback>,
    /// Provider for the runtime/OS identifiers stamped into event
    /// context blocks. Default: [`HostEnvironment`](crate::HostEnvironment).
    pub environment: Option<Box<dyn Environment + Send + Sync>>,
}

impl Options {
    /// Create options with required credentials only; all others use defaults.
    pub fn new(developer_secret: impl Into<String>, project_token: impl Into<String>) -> Self {
        Self {
            developer_secret: developer_secret.into(),
            project_token: project_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            tracking_enabled: true,
            on_signal: None,
            environment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_wire_field_names() {
        let event = Event {
            title: "payment".to_string(),
            event_type: "transaction".to_string(),
            session_id: "s-1".to_string(),
            user: EventUser {
                id: "u-1".to_string(),
            },
            context: Some(EventContext {
                sdk_version: "0.1.0".to_string(),
                sdk_runtime: "rust".to_string(),
                operating_system: "linux".to_string(),
            }),
            ..Default::default()
        };

        let json = serde_json::to_value(&event).unwrap();
        for field in [
            "title",
            "description",
            "message",
            "data",
            "tags",
            "notify",
            "icon",
            "apply_rule_only",
            "user",
            "type",
            "sessionID",
            "feature",
            "topic",
            "context",
        ] {
            assert!(json.get(field).is_some(), "missing wire field `{field}`");
        }
        assert_eq!(json["type"], "transaction");
        assert_eq!(json["sessionID"], "s-1");
        assert_eq!(json["user"]["id"], "u-1");
        assert_eq!(json["context"]["sdkVersion"], "0.1.0");
        assert_eq!(json["context"]["sdkRuntime"], "rust");
        assert_eq!(json["context"]["operatingSystem"], "linux");
    }

    #[test]
    fn event_context_omitted_when_absent() {
        let json = serde_json::to_value(Event::default()).unwrap();
        assert!(json.get("context").is_none());
    }

    #[test]
    fn context_omits_empty_runtime_and_os() {
        let ctx = EventContext {
            sdk_version: "0.1.0".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["sdkVersion"], "0.1.0");
        assert!(json.get("sdkRuntime").is_none());
        assert!(json.get("operatingSystem").is_none());
    }

    #[test]
    fn user_wire_field_names() {
        let mut data = serde_json::Map::new();
        data.insert("plan".to_string(), serde_json::json!("pro"));
        let user = User {
            id: "u-1".to_string(),
            email: "a@example.com".to_string(),
            full_name: "Ada Lovelace".to_string(),
            organization: "Analytical Engines".to_string(),
            data,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "u-1");
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["full_name"], "Ada Lovelace");
        assert_eq!(json["organization"], "Analytical Engines");
        assert_eq!(json["data"]["plan"], "pro");
    }

    #[test]
    fn options_defaults() {
        let opts = Options::new("sec", "tok");
        assert_eq!(opts.base_url, DEFAULT_BASE_URL);
        assert!(opts.timeout.is_none());
        assert!(opts.tracking_enabled);
    }
}
