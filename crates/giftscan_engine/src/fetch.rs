use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use giftscan_core::{ExtractedRecord, Identifier};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};

use crate::{
    decode_html, AttributeRowExtractor, FailureKind, FetchError, RecordExtractor, ScanEvent,
    TargetAddress,
};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            max_bytes: 5 * 1024 * 1024,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Receives one [`ScanEvent`] per settled identifier.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScanEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<ScanEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<ScanEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ScanEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: ScanEvent) {}
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, identifier: Identifier) -> Result<ExtractedRecord, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("invalid {name} header value")]
    InvalidHeader { name: &'static str },
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Fetches gift pages over HTTP and extracts one record from each.
///
/// The client, and with it the connection pool, is shared by every fetch.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    target: TargetAddress,
    extractor: Arc<dyn RecordExtractor>,
    max_bytes: u64,
}

impl ReqwestFetcher {
    pub fn new(target: TargetAddress, settings: FetchSettings) -> Result<Self, ClientBuildError> {
        let client = build_client(&settings)?;
        Ok(Self {
            client,
            target,
            extractor: Arc::new(AttributeRowExtractor::default()),
            max_bytes: settings.max_bytes,
        })
    }

    pub fn with_extractor(mut self, extractor: impl RecordExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    async fn download(&self, identifier: Identifier) -> Result<(Vec<u8>, Option<String>), FetchError> {
        let url = self
            .target
            .url_for(identifier)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(too_large(self.max_bytes, content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(too_large(self.max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok((bytes, content_type))
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, identifier: Identifier) -> Result<ExtractedRecord, FetchError> {
        let (bytes, content_type) = self.download(identifier).await?;
        let decoded = decode_html(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        self.extractor.extract(&decoded).ok_or_else(|| {
            FetchError::new(
                FailureKind::Parse,
                format!("no attribute row found for identifier {identifier}"),
            )
        })
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, ClientBuildError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("user-agent", &settings.user_agent)?);
    headers.insert(ACCEPT, header_value("accept", &settings.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept-language", &settings.accept_language)?,
    );

    let client = reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .default_headers(headers)
        .build()?;
    Ok(client)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ClientBuildError> {
    HeaderValue::from_str(value).map_err(|_| ClientBuildError::InvalidHeader { name })
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
