use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use uuid::Uuid;

use api_types::envelope::Envelope;

use crate::error::AppError;
use crate::transport::{Transport, TransportFailure};

/// Fixed deadline for a callback to fire before the call is abandoned.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(15);

/// Callback-injection strategy.
///
/// Some endpoints cannot honor direct cross-origin calls; this fallback
/// smuggles the request through a callback channel instead. The action and
/// payload are flattened into query parameters together with a temporary
/// callback identifier, and the response body arrives as that identifier
/// wrapped around the envelope (`cb_x({...})`).
///
/// Every injected identifier is tracked in `pending` and released on every
/// exit path, so identifiers never leak across calls.
pub struct CallbackTransport {
    endpoint: Url,
    http: reqwest::Client,
    pending: Mutex<HashSet<String>>,
}

impl CallbackTransport {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let endpoint = Url::parse(base_url)
            .map_err(|err| AppError::Setup(format!("invalid base_url: {err}")))?;
        Ok(Self {
            endpoint,
            http: reqwest::Client::new(),
            pending: Mutex::new(HashSet::new()),
        })
    }

    fn register(&self, name: &str) -> CallbackGuard<'_> {
        lock(&self.pending).insert(name.to_string());
        CallbackGuard {
            pending: &self.pending,
            name: name.to_string(),
        }
    }

    #[cfg(test)]
    fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// Scope guard that releases an injected callback identifier.
struct CallbackGuard<'a> {
    pending: &'a Mutex<HashSet<String>>,
    name: String,
}

impl Drop for CallbackGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.name);
    }
}

fn lock<'a>(pending: &'a Mutex<HashSet<String>>) -> std::sync::MutexGuard<'a, HashSet<String>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl Transport for CallbackTransport {
    async fn send(&self, action: &str, data: Value) -> Result<Envelope, TransportFailure> {
        let callback = format!("cb_{}", Uuid::new_v4().simple());
        let _guard = self.register(&callback);

        let payload =
            serde_json::to_string(&data).map_err(|err| TransportFailure::Decode(err.to_string()))?;
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", action)
            .append_pair("data", &payload)
            .append_pair("callback", &callback);

        let res = tokio::time::timeout(CALLBACK_TIMEOUT, self.http.get(url).send())
            .await
            .map_err(|_| {
                TransportFailure::NoResponse(format!(
                    "callback timed out after {}s",
                    CALLBACK_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|err| TransportFailure::NoResponse(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res
            .text()
            .await
            .map_err(|err| TransportFailure::Decode(err.to_string()))?;
        let inner = strip_callback_padding(&callback, &body).ok_or_else(|| {
            TransportFailure::Decode(format!("body does not invoke callback {callback}"))
        })?;

        serde_json::from_str::<Envelope>(inner)
            .map_err(|err| TransportFailure::Decode(err.to_string()))
    }
}

/// Extracts the envelope JSON out of the `name(...)` padding, tolerating a
/// trailing semicolon and surrounding whitespace.
fn strip_callback_padding<'a>(name: &str, body: &'a str) -> Option<&'a str> {
    let body = body.trim();
    let rest = body.strip_prefix(name)?.trim_start();
    let rest = rest.strip_prefix('(')?;
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_padding() {
        assert_eq!(
            strip_callback_padding("cb_1", r#"cb_1({"success":true})"#),
            Some(r#"{"success":true}"#)
        );
    }

    #[test]
    fn strips_padding_with_semicolon_and_whitespace() {
        assert_eq!(
            strip_callback_padding("cb_1", "  cb_1( {\"success\":true} );\n"),
            Some(r#"{"success":true}"#)
        );
    }

    #[test]
    fn rejects_foreign_callback_names() {
        assert!(strip_callback_padding("cb_1", r#"cb_2({"success":true})"#).is_none());
        assert!(strip_callback_padding("cb_1", r#"{"success":true}"#).is_none());
    }

    #[test]
    fn guard_releases_identifier_on_drop() {
        let transport = CallbackTransport::new("http://127.0.0.1:1/exec").unwrap();
        {
            let _guard = transport.register("cb_test");
            assert_eq!(transport.pending_count(), 1);
        }
        assert_eq!(transport.pending_count(), 0);
    }
}
