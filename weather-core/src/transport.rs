use std::{collections::BTreeMap, fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client, Proxy,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Settings applied to a transport when it is created.
///
/// Example TOML:
/// [transport]
/// timeout = 5000
/// user_agent = "my-app/1.0"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Whole-request timeout in milliseconds. Unset means no timeout.
    pub timeout: Option<u64>,
    /// Connect timeout in milliseconds.
    pub connect_timeout: Option<u64>,
    pub user_agent: Option<String>,
    /// Proxy URL used for every scheme.
    pub proxy: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// Treat non-2xx responses as transport failures.
    pub http_errors: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            proxy: None,
            headers: BTreeMap::new(),
            http_errors: true,
        }
    }
}

impl TransportOptions {
    pub fn with_timeout(mut self, millis: u64) -> Self {
        self.timeout = Some(millis);
        self
    }
}

/// Something that can perform a GET and hand back the body as text.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Options this transport was built with.
    fn options(&self) -> &TransportOptions;

    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, TransportError>;
}

/// Creates transports. This is the seam tests use to swap in a fake.
pub trait TransportFactory: Send + Sync + Debug {
    fn create(&self, options: &TransportOptions) -> Result<Box<dyn HttpTransport>, TransportError>;
}

/// Builds a [`ReqwestTransport`] per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransportFactory;

impl TransportFactory for ReqwestTransportFactory {
    fn create(&self, options: &TransportOptions) -> Result<Box<dyn HttpTransport>, TransportError> {
        Ok(Box::new(ReqwestTransport::new(options.clone())?))
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    options: TransportOptions,
    http: Client,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> Result<Self, TransportError> {
        let mut builder = Client::builder();

        if let Some(millis) = options.timeout {
            builder = builder.timeout(Duration::from_millis(millis));
        }
        if let Some(millis) = options.connect_timeout {
            builder = builder.connect_timeout(Duration::from_millis(millis));
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        if let Some(url) = &options.proxy {
            builder = builder.proxy(Proxy::all(url.as_str())?);
        }
        if !options.headers.is_empty() {
            builder = builder.default_headers(header_map(&options.headers)?);
        }

        Ok(Self { http: builder.build()?, options })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn options(&self) -> &TransportOptions {
        &self.options
    }

    async fn get(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, TransportError> {
        let res = self.http.get(url).query(query).send().await?;

        let res = if self.options.http_errors { res.error_for_status()? } else { res };

        Ok(res.text().await?)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
            TransportError::new(format!("Invalid header name '{name}'")).with_source(err)
        })?;
        let value = HeaderValue::from_str(value).map_err(|err| {
            TransportError::new(format!("Invalid value for header '{name}'")).with_source(err)
        })?;
        map.insert(header, value);
    }
    Ok(map)
}
