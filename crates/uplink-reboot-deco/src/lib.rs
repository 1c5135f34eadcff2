// # Deco Rebooter
//
// Drives a reboot of a TP-Link Deco-style router through its web
// administration interface: authenticate with the admin password, obtain a
// session token, then issue the reboot request.
//
// This sequence is inherently coupled to one vendor's admin surface and is
// deliberately kept behind the `Rebooter` contract; swapping routers means
// swapping this crate, not touching the monitor.
//
// ## Behavior
//
// - One login + reboot sequence per `reboot()` call
// - HTTP timeout on every request (ceiling conventionally set to the
//   configured maximum poll interval)
// - Specific handling for auth failures (401/403), missing endpoints (404),
//   and server errors (5xx)
// - Dry-run mode: authenticate, log the intended reboot, skip the request
// - NO retry or backoff logic (owned by the Monitor's scheduling)
// - NO background tasks
//
// ## Security
//
// The admin password never appears in logs; the Debug implementation
// redacts it.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use uplink_core::config::RebooterConfig;
use uplink_core::credentials::Password;
use uplink_core::traits::{Rebooter, RebooterFactory};
use uplink_core::{ComponentRegistry, Error, Result};

/// Login endpoint, relative to the admin interface origin
const LOGIN_PATH: &str = "/api/v1/login";

/// Reboot endpoint, relative to the admin interface origin
const REBOOT_PATH: &str = "/api/v1/system/reboot";

/// Default ceiling on each admin request
///
/// Matches the default maximum poll interval.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// TP-Link Deco admin-interface rebooter
pub struct DecoRebooter {
    /// Base URL of the admin interface (any path component is ignored)
    base_url: reqwest::Url,

    /// Admin password; never logged
    password: Password,

    /// If true, authenticate but skip the actual reboot request
    dry_run: bool,

    /// HTTP client with the request timeout applied
    client: reqwest::Client,
}

// The password must never leak through debug output
impl std::fmt::Debug for DecoRebooter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoRebooter")
            .field("base_url", &self.base_url.as_str())
            .field("password", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DecoRebooter {
    /// Create a new Deco rebooter
    ///
    /// # Parameters
    ///
    /// - `url`: the admin interface URL; the endpoint paths are resolved
    ///   against its origin, so the UI-style
    ///   `http://192.168.1.1/webpages/index.html#reboot` form works as-is
    /// - `password`: router admin password
    /// - `dry_run`: authenticate but skip the reboot request
    /// - `timeout`: per-request ceiling (`None` for the default)
    pub fn new(
        url: &str,
        password: Password,
        dry_run: bool,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = reqwest::Url::parse(url)
            .map_err(|e| Error::config(format!("invalid rebooter URL '{}': {}", url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            password,
            dry_run,
            client,
        })
    }

    /// Resolve an endpoint path against the admin interface origin
    fn endpoint(&self, path: &str) -> Result<reqwest::Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::config(format!("invalid endpoint path '{}': {}", path, e)))
    }

    /// Authenticate and obtain a session token
    async fn login(&self) -> Result<String> {
        let url = self.endpoint(LOGIN_PATH)?;

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "password": self.password.expose() }))
            .send()
            .await
            .map_err(|e| Error::reboot(format!("login request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::reboot(
                "router rejected the admin password; check the credential file",
            ));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::reboot(
                "login endpoint not found; is the router URL correct?",
            ));
        }
        if status.is_server_error() {
            return Err(Error::reboot(format!("router admin error: {}", status)));
        }
        if !status.is_success() {
            return Err(Error::reboot(format!("unexpected login response: {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::reboot(format!("failed to parse login response: {}", e)))?;

        let token = body
            .get("stok")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::reboot("login response carried no session token"))?;

        Ok(token.to_string())
    }

    /// Issue the reboot request with a session token
    async fn trigger_reboot(&self, token: &str) -> Result<()> {
        let mut url = self.endpoint(REBOOT_PATH)?;
        url.query_pairs_mut().append_pair("stok", token);

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({ "operation": "reboot" }))
            .send()
            .await
            .map_err(|e| Error::reboot(format!("reboot request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::reboot(format!(
                "router refused the reboot request: {}",
                status
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Rebooter for DecoRebooter {
    async fn reboot(&self) -> Result<()> {
        info!(url = %self.base_url, "opening router admin interface");

        let token = self.login().await?;
        debug!("admin login succeeded");

        if self.dry_run {
            info!("dry-run: skipping the reboot request");
            return Ok(());
        }

        self.trigger_reboot(&token).await?;
        debug!("reboot request accepted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "deco"
    }
}

/// Factory for creating Deco rebooters
pub struct DecoFactory;

impl RebooterFactory for DecoFactory {
    fn create(
        &self,
        config: &RebooterConfig,
        password: &Password,
    ) -> Result<Box<dyn Rebooter>> {
        match config {
            RebooterConfig::Deco {
                url,
                dry_run,
                timeout_secs,
            } => Ok(Box::new(DecoRebooter::new(
                url,
                password.clone(),
                *dry_run,
                timeout_secs.map(Duration::from_secs),
            )?)),
            _ => Err(Error::config("invalid config for Deco rebooter")),
        }
    }
}

/// Register the Deco rebooter with a registry
pub fn register(registry: &ComponentRegistry) {
    registry.register_rebooter("deco", Box::new(DecoFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_creation() {
        let factory = DecoFactory;

        let config = RebooterConfig::Deco {
            url: "http://192.168.1.1/webpages/index.html#reboot".to_string(),
            dry_run: false,
            timeout_secs: Some(60),
        };

        let rebooter = factory.create(&config, &Password::new("s3cret"));
        assert!(rebooter.is_ok());
        assert_eq!(rebooter.unwrap().name(), "deco");
    }

    #[test]
    fn rejects_invalid_url() {
        let rebooter = DecoRebooter::new("not a url", Password::new("x"), false, None);
        assert!(rebooter.is_err());
    }

    #[test]
    fn endpoints_resolve_against_origin() {
        // The UI-style URL carries a path and fragment; endpoint resolution
        // must strip both.
        let rebooter = DecoRebooter::new(
            "http://192.168.1.1/webpages/index.html#reboot",
            Password::new("x"),
            false,
            None,
        )
        .unwrap();

        let login = rebooter.endpoint(LOGIN_PATH).unwrap();
        assert_eq!(login.as_str(), "http://192.168.1.1/api/v1/login");
    }

    #[test]
    fn debug_output_is_redacted() {
        let rebooter = DecoRebooter::new(
            "http://192.168.1.1/",
            Password::new("hunter2"),
            true,
            None,
        )
        .unwrap();

        let debug = format!("{:?}", rebooter);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("REDACTED"));
    }
}
