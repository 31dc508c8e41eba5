//! HTTP client for the external reasoning engine.
//!
//! Wire protocol: `POST {base}/init?orgId=`, `POST {base}/buildGraph?orgId=`
//! (body: url), `POST {base}/query?orgId=` (body: query, prompt ->
//! {answer}), `POST {base}/insights?orgId=` (body: history). Every call
//! carries the shared service credential header and is bounded by the
//! configured timeout; there is no retry here.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::EngineConfig;
use crate::domain::foundation::OrgId;
use crate::ports::{EngineError, InsightsReport, ReasoningEngine};

/// Header carrying the shared service credential.
const SERVICE_KEY_HEADER: &str = "x-service-key";

/// Reqwest-based implementation of the ReasoningEngine port.
pub struct HttpReasoningEngine {
    config: EngineConfig,
    client: Client,
}

impl HttpReasoningEngine {
    /// Creates a client with the configured timeout baked in.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str, org_id: &OrgId) -> String {
        format!(
            "{}/{}?orgId={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            org_id
        )
    }

    async fn post(
        &self,
        path: &str,
        org_id: &OrgId,
        body: Option<serde_json::Value>,
    ) -> Result<Response, EngineError> {
        let mut request = self
            .client
            .post(self.endpoint(path, org_id))
            .header(SERVICE_KEY_HEADER, self.config.service_key());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout
            } else {
                EngineError::Unreachable(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(EngineError::Rejected {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    answer: String,
}

#[async_trait]
impl ReasoningEngine for HttpReasoningEngine {
    async fn init(&self, org_id: &OrgId) -> Result<(), EngineError> {
        tracing::debug!(%org_id, "engine init");
        self.post("init", org_id, None).await.map(|_| ())
    }

    async fn ingest_source(&self, org_id: &OrgId, location: &str) -> Result<(), EngineError> {
        tracing::debug!(%org_id, location, "engine ingest");
        self.post("buildGraph", org_id, Some(json!({ "url": location })))
            .await
            .map(|_| ())
    }

    async fn query(
        &self,
        org_id: &OrgId,
        question: &str,
        prompt: &str,
    ) -> Result<String, EngineError> {
        let response = self
            .post(
                "query",
                org_id,
                Some(json!({ "query": question, "prompt": prompt })),
            )
            .await?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))?;
        Ok(body.answer)
    }

    async fn insights(
        &self,
        org_id: &OrgId,
        transcript: &str,
    ) -> Result<InsightsReport, EngineError> {
        let response = self
            .post("insights", org_id, Some(json!({ "history": transcript })))
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(InsightsReport::default());
        }
        response
            .json()
            .await
            .map_err(|e| EngineError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn engine(base: &str) -> HttpReasoningEngine {
        HttpReasoningEngine::new(EngineConfig {
            base_url: base.to_string(),
            service_key: Secret::new("svc".to_string()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_includes_org_id_query_param() {
        let engine = engine("http://engine:9000/");
        let org = OrgId::new();
        let url = engine.endpoint("query", &org);
        assert_eq!(url, format!("http://engine:9000/query?orgId={}", org));
    }
}
