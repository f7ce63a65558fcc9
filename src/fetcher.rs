use crate::activity::{Activity, ActivityFilter};
use crate::transport::{NoResult, Response, Transport};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(Activity),
    NotFound(NoResult),
}

pub struct ActivityFetcher {
    transport: Arc<dyn Transport>,
    endpoint: String,
}

impl ActivityFetcher {
    pub fn new(transport: Arc<dyn Transport>, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
        }
    }

    pub async fn random_activity(&self, filter: &ActivityFilter) -> FetchOutcome {
        let response = if filter.is_empty() {
            self.transport.get(&self.endpoint, None).await
        } else {
            let params = filter.to_query();
            self.transport.get(&self.endpoint, Some(&params)).await
        };

        match response {
            Response::Payload(value) => decode(value),
            Response::NoResult(reason) => FetchOutcome::NotFound(reason),
        }
    }
}

fn decode(value: Value) -> FetchOutcome {
    if !value.is_object() {
        return FetchOutcome::NotFound(NoResult::Malformed(
            "expected a JSON object".to_string(),
        ));
    }

    // The service reports "nothing matches" as a 200 carrying an error message.
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return FetchOutcome::NotFound(NoResult::Rejected(message.to_string()));
    }

    match serde_json::from_value::<Activity>(value) {
        Ok(activity) => FetchOutcome::Found(activity),
        Err(e) => {
            debug!("Payload did not fit an activity: {}", e);
            FetchOutcome::NotFound(NoResult::Malformed(e.to_string()))
        }
    }
}
