use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use api_types::envelope::{Envelope, Request};

use crate::error::AppError;
use crate::transport::{Transport, TransportFailure};

/// Direct strategy: one POST carrying the JSON-encoded request envelope.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl DirectTransport {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let endpoint = Url::parse(base_url)
            .map_err(|err| AppError::Setup(format!("invalid base_url: {err}")))?;
        Ok(Self {
            endpoint,
            http: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn send(&self, action: &str, data: Value) -> Result<Envelope, TransportFailure> {
        let request = Request {
            action: action.to_string(),
            data,
        };

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| TransportFailure::NoResponse(err.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TransportFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        res.json::<Envelope>()
            .await
            .map_err(|err| TransportFailure::Decode(err.to_string()))
    }
}
