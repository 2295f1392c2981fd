use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    AssistantSpec, CreatedAssistant, Credential, PhoneNumberSpec, PurchasedNumber, RemoteError,
    RemoteResourceClient,
};
use crate::config::{ApiConfig, RateLimitConfig};
use crate::observability::{remote_metrics, RemoteOperation};

/// Rate-limited JSON client for the voice-agent platform REST API
pub struct HttpResourceClient {
    http: Client,
    base_url: String,
    endpoint: Url,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssociateNumberBody<'a> {
    assistant_id: &'a str,
}

impl std::fmt::Debug for HttpResourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResourceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpResourceClient {
    pub fn new(config: &ApiConfig) -> Result<Self, RemoteError> {
        Self::with_base_url(&config.base_url, &config.rate_limit)
    }

    pub fn with_base_url(base_url: &str, rate_limit: &RateLimitConfig) -> Result<Self, RemoteError> {
        let quota = Quota::per_second(
            NonZeroU32::new(rate_limit.requests_per_second).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(rate_limit.burst_capacity).unwrap_or(NonZeroU32::MIN));

        let http = Client::builder()
            .user_agent(concat!("voice-provisioner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let endpoint = Url::parse(&base_url)
            .map_err(|e| RemoteError::unexpected(format!("invalid base URL {base_url}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(RemoteError::unexpected(format!("invalid base URL {base_url}")));
        }

        Ok(Self {
            http,
            base_url,
            endpoint,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one authenticated JSON request; non-2xx answers become `RemoteError::Api`
    async fn send<B: Serialize + ?Sized>(
        &self,
        operation: RemoteOperation,
        method: Method,
        segments: &[&str],
        credential: &Credential,
        body: &B,
    ) -> Result<Response, RemoteError> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let url = self.url_for(segments)?;
        remote_metrics().record_request(operation);
        debug!(operation = %operation, method = %method, url = %url, "Sending platform request");

        let response = self
            .http
            .request(method, url)
            .bearer_auth(credential.expose())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                remote_metrics().record_error(operation);
                warn!(operation = %operation, error = %e, "Platform request did not get a response");
                RemoteError::from(e)
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // The body only feeds the error message, so a failed read is not fatal
        let body = response.text().await.unwrap_or_default();
        remote_metrics().record_error(operation);
        let err = RemoteError::from_response(status.as_u16(), &body);
        warn!(
            operation = %operation,
            status = status.as_u16(),
            error = %err,
            "Platform rejected request"
        );
        Err(err)
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment
    fn url_for(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::unexpected(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(
        operation: RemoteOperation,
        response: Response,
    ) -> Result<T, RemoteError> {
        response.json::<T>().await.map_err(|e| {
            remote_metrics().record_error(operation);
            RemoteError::unexpected(format!("could not decode {operation} response: {e}"))
        })
    }
}

#[async_trait]
impl RemoteResourceClient for HttpResourceClient {
    async fn create_assistant(
        &self,
        credential: &Credential,
        spec: &AssistantSpec,
    ) -> Result<CreatedAssistant, RemoteError> {
        let operation = RemoteOperation::CreateAssistant;
        let response = self
            .send(operation, Method::POST, &["assistant"], credential, spec)
            .await?;
        Self::decode(operation, response).await
    }

    async fn purchase_number(
        &self,
        credential: &Credential,
        spec: &PhoneNumberSpec,
    ) -> Result<PurchasedNumber, RemoteError> {
        let operation = RemoteOperation::PurchaseNumber;
        let response = self
            .send(operation, Method::POST, &["phone-number"], credential, spec)
            .await?;
        Self::decode(operation, response).await
    }

    async fn associate_number(
        &self,
        credential: &Credential,
        phone_number_id: &str,
        assistant_id: &str,
    ) -> Result<(), RemoteError> {
        let body = AssociateNumberBody { assistant_id };
        self.send(
            RemoteOperation::AssociateNumber,
            Method::PATCH,
            &["phone-number", phone_number_id],
            credential,
            &body,
        )
        .await?;
        Ok(())
    }
}
