// Pluggable transport and its reqwest-backed default.
//
// `TransportConfig` carries the TLS, timeout and user-agent settings for
// building a `reqwest::Client`. Embedding applications can swap in their
// own `Transport` entirely; the facade only ever talks to the trait.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, decode_body};

/// Executes one HTTP round trip.
///
/// Implementations must return `Ok` for every status code the server
/// sends back and reserve `Err` for faults that prevented a response
/// (DNS, refused connection, timeout).
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Error>> + Send;
}

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// Use the bundled webpki root store.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (self-hosted instances with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub tls: TlsMode,
    #[serde(rename = "timeout_secs", with = "duration_secs")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            user_agent: concat!("grapevine-client/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

// ── reqwest transport ───────────────────────────────────────────────

/// Default [`Transport`] over `reqwest`.
///
/// Applies Basic auth when the request carries credentials, sends bodies
/// as JSON, and passes every status through untouched.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, Error>> + Send {
        async move {
            let HttpRequest {
                method,
                url,
                credentials,
                body,
            } = request;

            let mut builder = self.http.request(method.into(), url);
            if let Some(creds) = credentials.as_deref() {
                let password = creds.password().expose_secret();
                builder = builder.basic_auth(creds.username(), Some(password));
            }
            if let Some(body) = body {
                builder = builder.json(&body);
            }

            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let raw = resp.text().await?;

            Ok(HttpResponse {
                status,
                data: decode_body(&raw),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.tls, TlsMode::System);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("grapevine-client/"));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: TransportConfig =
            serde_json::from_str(r#"{ "timeout_secs": 5, "tls": "danger_accept_invalid" }"#)
                .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(config.user_agent, TransportConfig::default().user_agent);
    }

    #[test]
    fn custom_ca_deserializes_path() {
        let config: TransportConfig =
            serde_json::from_str(r#"{ "tls": { "custom_ca": "/etc/ssl/grapevine.pem" } }"#)
                .unwrap();
        assert_eq!(
            config.tls,
            TlsMode::CustomCa(PathBuf::from("/etc/ssl/grapevine.pem"))
        );
    }

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa(PathBuf::from("/nonexistent/grapevine-ca.pem")),
            ..TransportConfig::default()
        };
        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(ref msg) if msg.contains("failed to read CA cert")));
    }

    #[test]
    fn builds_client_for_default_and_insecure_modes() {
        assert!(TransportConfig::default().build_client().is_ok());
        let insecure = TransportConfig {
            tls: TlsMode::DangerAcceptInvalid,
            ..TransportConfig::default()
        };
        assert!(ReqwestTransport::new(&insecure).is_ok());
    }
}
