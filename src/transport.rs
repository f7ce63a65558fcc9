use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Why a request produced no usable payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NoResult {
    Status(u16),
    Network(String),
    Malformed(String),
    Rejected(String),
}

impl fmt::Display for NoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResult::Status(code) => write!(f, "service answered HTTP {}", code),
            NoResult::Network(e) => write!(f, "request failed: {}", e),
            NoResult::Malformed(e) => write!(f, "unreadable response: {}", e),
            NoResult::Rejected(msg) => write!(f, "service rejected the request: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Payload(Value),
    NoResult(NoResult),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a single GET. `None` sends no query string at all, which is not
    /// the same request as an explicitly empty parameter set.
    async fn get(&self, url: &str, params: Option<&[(&'static str, String)]>) -> Response;
}

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, params: Option<&[(&'static str, String)]>) -> Response {
        let mut request = self.client.get(url);
        if let Some(params) = params {
            debug!("GET {} with {} parameter(s)", url, params.len());
            request = request.query(params);
        } else {
            debug!("GET {}", url);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => return Response::NoResult(NoResult::Network(e.to_string())),
        };

        if response.status() != StatusCode::OK {
            debug!("{} answered {}", url, response.status());
            return Response::NoResult(NoResult::Status(response.status().as_u16()));
        }

        match response.json::<Value>().await {
            Ok(value) => Response::Payload(value),
            Err(e) => Response::NoResult(NoResult::Malformed(e.to_string())),
        }
    }
}
