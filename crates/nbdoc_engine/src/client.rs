use std::time::Duration;

use bytes::{Bytes, BytesMut};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::StreamExt;
use nbdoc_core::{GenerationRequest, GenerationResponse};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ServiceError, ServiceFailureKind};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5004";

/// Timeout and retry behaviour for calls to the generation service.
///
/// The defaults add nothing on top of the transport: no client-side timeout
/// and no retries. Retries, when enabled, only repeat transport failures
/// (connection errors and timeouts), never an HTTP error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPolicy {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            max_retries: 0,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub policy: RequestPolicy,
    pub max_artifact_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            policy: RequestPolicy::default(),
            max_artifact_bytes: 50 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// `POST /upload`: one call per request, never batched or split.
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResponse, ServiceError>;

    /// `GET /download`: the server-side export artifact.
    async fn download_artifact(&self) -> Result<Bytes, ServiceError>;
}

#[derive(Debug, Serialize)]
struct UploadBody<'a> {
    notebooks: &'a [String],
    language: &'a str,
    temperature: f64,
    max_tokens: u32,
}

impl<'a> From<&'a GenerationRequest> for UploadBody<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            notebooks: &request.notebooks,
            language: &request.language,
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadReply {
    documentation: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReqwestGenerationService {
    settings: ServiceSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestGenerationService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(&settings.base_url).map_err(|err| {
            ServiceError::new(
                ServiceFailureKind::InvalidUrl,
                format!("invalid service url '{}': {err}", settings.base_url),
            )
        })?;
        // Endpoints are joined relative to the base path.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = build_client(&settings.policy)?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url, ServiceError> {
        self.base_url.join(name).map_err(|err| {
            ServiceError::new(ServiceFailureKind::InvalidUrl, err.to_string())
        })
    }

    async fn send_with_policy<F>(&self, build: F) -> Result<reqwest::Response, ServiceError>
    where
        F: Fn() -> reqwest::RequestBuilder + Send + Sync,
    {
        let policy = &self.settings.policy;
        let mut retries = 0;
        loop {
            match build().send().await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    let error = map_reqwest_error(err);
                    if !error.is_transport() || retries >= policy.max_retries {
                        return Err(error);
                    }
                    retries += 1;
                    engine_warn!(
                        "request failed ({}), retry {}/{} in {:?}",
                        error.kind,
                        retries,
                        policy.max_retries,
                        policy.retry_backoff
                    );
                    tokio::time::sleep(policy.retry_backoff).await;
                }
            }
        }
    }
}

fn build_client(policy: &RequestPolicy) -> Result<reqwest::Client, ServiceError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = policy.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = policy.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| ServiceError::new(ServiceFailureKind::Network, err.to_string()))
}

#[async_trait::async_trait]
impl GenerationService for ReqwestGenerationService {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ServiceError> {
        let url = self.endpoint("upload")?;
        let body = UploadBody::from(request);
        engine_info!(
            "POST {} notebooks={} language={} temperature={} max_tokens={}",
            url,
            request.notebooks.len(),
            request.language,
            request.temperature,
            request.max_output_tokens
        );

        let response = self
            .send_with_policy(|| self.client.post(url.clone()).json(&body))
            .await?;

        let status = response.status();
        let payload = response.bytes().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&payload)
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| {
                    format!("generation service returned HTTP {}", status.as_u16())
                });
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let reply: UploadReply = serde_json::from_slice(&payload).map_err(|err| {
            ServiceError::new(
                ServiceFailureKind::MalformedResponse,
                format!("unexpected reply from generation service: {err}"),
            )
        })?;
        match reply {
            UploadReply {
                documentation: Some(documentation_text),
                ..
            } => {
                engine_debug!("received {} bytes of documentation", documentation_text.len());
                Ok(GenerationResponse { documentation_text })
            }
            UploadReply {
                error: Some(message),
                ..
            } => Err(ServiceError::new(ServiceFailureKind::RemoteError, message)),
            UploadReply { .. } => Err(ServiceError::new(
                ServiceFailureKind::MalformedResponse,
                "generation service reply had no documentation",
            )),
        }
    }

    async fn download_artifact(&self) -> Result<Bytes, ServiceError> {
        let url = self.endpoint("download")?;
        let max_bytes = self.settings.max_artifact_bytes;
        engine_info!("GET {}", url);

        let response = self.send_with_policy(|| self.client.get(url.clone())).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::new(
                ServiceFailureKind::HttpStatus(status.as_u16()),
                format!("export service returned HTTP {}", status.as_u16()),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ServiceError::new(
                    ServiceFailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "export artifact too large",
                ));
            }
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ServiceError::new(
                    ServiceFailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "export artifact too large",
                ));
            }
            buffer.extend_from_slice(&chunk);
        }

        engine_debug!("downloaded {} byte artifact", buffer.len());
        Ok(buffer.freeze())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(
            ServiceFailureKind::Timeout,
            format!("generation service timed out: {err}"),
        );
    }
    ServiceError::new(
        ServiceFailureKind::Network,
        format!("could not reach generation service: {err}"),
    )
}
