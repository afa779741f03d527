use crate::env::{Environment, HostEnvironment};
use crate::error::Error;
use crate::types::{DropReason, Event, EventContext, Options, Signal, SignalCallback, User};
use crate::validate::{validate_base_url, validate_credential};

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Client for the Evntaly event-tracking API.
///
/// One blocking HTTP round trip per operation; requests reuse the
/// connections pooled by the internal agent. The tracking flag is the
/// only mutable state, held atomically so the client can be shared
/// across threads (`&self` everywhere except [`set_request_timeout`]).
///
/// [`set_request_timeout`]: EvntalyClient::set_request_timeout
pub struct EvntalyClient {
    base_url: String,
    developer_secret: String,
    project_token: String,
    tracking_enabled: AtomicBool,
    agent: ureq::Agent,
    environment: Box<dyn Environment + Send + Sync>,
    on_signal: Option<SignalCallback>,
    version: &'static str,
}

impl EvntalyClient {
    /// Create a new client from the given options.
    ///
    /// Validates credentials and the base URL, and builds the HTTP agent
    /// with the configured timeout.
    pub fn new(opts: Options) -> Result<Self, Error> {
        validate_credential("developer_secret", &opts.developer_secret)?;
        validate_credential("project_token", &opts.project_token)?;
        validate_base_url(&opts.base_url)?;

        Ok(Self {
            base_url: opts.base_url.trim_end_matches('/').to_string(),
            developer_secret: opts.developer_secret,
            project_token: opts.project_token,
            tracking_enabled: AtomicBool::new(opts.tracking_enabled),
            agent: build_agent(opts.timeout),
            environment: opts
                .environment
                .unwrap_or_else(|| Box::new(HostEnvironment)),
            on_signal: opts.on_signal,
            version: crate::VERSION,
        })
    }

    /// Query whether the account may currently submit events.
    ///
    /// Returns the negation of the API's `limitReached` field. Fails with
    /// [`Error::Decode`] if the body is not JSON, [`Error::UnexpectedFormat`]
    /// if the field is absent or not a boolean. Does not retry.
    pub fn check_limit(&self) -> Result<bool, Error> {
        let url = format!(
            "{}/api/v1/account/check-limits/{}",
            self.base_url, self.developer_secret
        );

        let response = self
            .agent
            .get(&url)
            .set("Content-Type", "application/json")
            .call()?;

        let body: serde_json::Value = response.into_json().map_err(Error::Decode)?;
        body.get("limitReached")
            .and_then(serde_json::Value::as_bool)
            .map(|reached| !reached)
            .ok_or(Error::UnexpectedFormat("limitReached"))
    }

    /// Submit an event.
    ///
    /// Two outcomes report success without sending anything: tracking is
    /// disabled on this client, or [`check_limit`] reports the quota as
    /// exhausted. A failing limit check propagates its error and the
    /// event is not sent. Otherwise the event is stamped with a context
    /// block (SDK version, runtime, OS) and posted once; a non-200
    /// response is an [`Error::Status`].
    ///
    /// Callers that need to distinguish "sent" from "dropped" should
    /// observe [`Signal`]s via `Options::on_signal`.
    ///
    /// [`check_limit`]: EvntalyClient::check_limit
    pub fn track(&self, mut event: Event) -> Result<(), Error> {
        if !self.tracking_enabled.load(Ordering::Relaxed) {
            log::debug!("tracking is disabled, event not sent");
            self.emit(Signal::EventDropped(DropReason::TrackingDisabled));
            return Ok(());
        }

        if !self.check_limit()? {
            log::warn!("account limit reached, event not sent");
            self.emit(Signal::EventDropped(DropReason::LimitReached));
            return Ok(());
        }

        event.context = Some(EventContext {
            sdk_version: self.version.to_string(),
            sdk_runtime: self.environment.runtime(),
            operating_system: self.environment.operating_system(),
        });

        self.post_json("/api/v1/register/event", &event)?;
        log::info!("event tracked successfully");
        self.emit(Signal::EventTracked);
        Ok(())
    }

    /// Create or update a user profile.
    ///
    /// No limit check and no context stamping; the payload is sent as
    /// given.
    pub fn identify_user(&self, user: User) -> Result<(), Error> {
        self.post_json("/api/v1/register/user", &user)?;
        log::info!("user identified successfully");
        self.emit(Signal::UserIdentified);
        Ok(())
    }

    /// Switch event tracking on. Idempotent.
    pub fn enable_tracking(&self) {
        self.tracking_enabled.store(true, Ordering::Relaxed);
        log::info!("tracking enabled");
        self.emit(Signal::TrackingEnabled);
    }

    /// Switch event tracking off. Idempotent; subsequent [`track`] calls
    /// report success without sending.
    ///
    /// [`track`]: EvntalyClient::track
    pub fn disable_tracking(&self) {
        self.tracking_enabled.store(false, Ordering::Relaxed);
        log::info!("tracking disabled");
        self.emit(Signal::TrackingDisabled);
    }

    /// Whether [`track`](EvntalyClient::track) currently sends events.
    pub fn tracking_enabled(&self) -> bool {
        self.tracking_enabled.load(Ordering::Relaxed)
    }

    /// Change the per-request timeout.
    ///
    /// Rebuilds the HTTP agent, dropping its pooled connections.
    pub fn set_request_timeout(&mut self, timeout: Duration) {
        self.agent = build_agent(Some(timeout));
    }

    /// SDK version stamped into event context blocks.
    pub fn version(&self) -> &str {
        self.version
    }

    // ------------------------------------------------------------------
    // Request path
    // ------------------------------------------------------------------

    fn post_json<T: serde::Serialize>(&self, path: &str, payload: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(payload).map_err(Error::Encode)?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .set("secret", &self.developer_secret)
            .set("pat", &self.project_token)
            .send_bytes(&body)?;

        // ureq reports non-2xx as Err; this covers 2xx-but-not-200
        if response.status() != 200 {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    fn emit(&self, signal: Signal) {
        if let Some(ref on_signal) = self.on_signal {
            on_signal(&signal);
        }
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    let mut builder = ureq::AgentBuilder::new();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
