use std::fmt::Debug;

use tokio::runtime::{Builder, Runtime};

/// One outbound GET, described independently of the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub query: Vec<(&'static str, String)>,
}

impl SourceRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Adds a query parameter only when a value is present.
    pub fn param<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((name, value.to_string()));
        }
        self
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Request(String),
    #[error("http runtime unavailable: {0}")]
    Runtime(String),
}

pub trait HttpTransport: Debug {
    fn get(&self, request: &SourceRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking facade over the async reqwest client. Each call runs to
/// completion on a private current-thread runtime.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    runtime: Runtime,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client, runtime: Runtime) -> Self {
        Self { client, runtime }
    }

    pub fn with_runtime() -> Result<Self, TransportError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| TransportError::Runtime(err.to_string()))?;
        Ok(Self::new(reqwest::Client::new(), runtime))
    }

    fn map_error<E: std::fmt::Display>(err: E) -> TransportError {
        TransportError::Request(err.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, request: &SourceRequest) -> Result<HttpResponse, TransportError> {
        self.runtime.block_on(async {
            let mut builder = self.client.get(&request.url).query(&request.query);
            for (name, value) in &request.headers {
                builder = builder.header(*name, value);
            }

            let response = builder.send().await.map_err(Self::map_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(Self::map_error)?;

            Ok(HttpResponse {
                status,
                body: body.to_vec(),
            })
        })
    }
}
