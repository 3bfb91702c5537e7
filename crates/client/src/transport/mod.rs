//! Transport strategies: how one logical request reaches the backend.
//!
//! Both strategies present the same contract to the gateway: send an
//! `action` plus payload, get back the decoded response envelope or a
//! transport-level failure. Which strategy is active is a configuration
//! choice, not a per-call one.

mod callback;
mod direct;

pub use callback::CallbackTransport;
pub use direct::DirectTransport;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use api_types::envelope::Envelope;

/// A failure below the protocol level, before any envelope was decoded.
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// The endpoint never answered: connect error or timeout.
    #[error("no response: {0}")]
    NoResponse(String),
    /// The endpoint answered with a non-2xx status.
    #[error("status {status}")]
    Status { status: u16, body: String },
    /// The endpoint answered but the body was not a valid envelope.
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one logical request and decodes the response envelope.
    async fn send(&self, action: &str, data: Value) -> Result<Envelope, TransportFailure>;
}

/// Which delivery mechanism the gateway uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Direct request/response call.
    #[default]
    Direct,
    /// Callback-injection fallback for endpoints that refuse direct calls.
    Callback,
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "direct" => Ok(Self::Direct),
            "callback" => Ok(Self::Callback),
            other => Err(format!("unknown transport '{other}'")),
        }
    }
}
