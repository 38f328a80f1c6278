use std::error::Error as StdError;

use thiserror::Error;

/// Failure raised by an [`HttpTransport`](crate::transport::HttpTransport).
///
/// Carries a human readable message, the HTTP status code when the failure
/// came from a response, and the underlying error if there was one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    code: Option<u16>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), code: None, source: None }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<u16> {
        self.code
    }
}

/// The request URL is dropped from the error: it carries the API key.
impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let code = err.status().map(|status| status.as_u16());
        let base = TransportError::new(err.to_string());
        let base = match code {
            Some(code) => base.with_code(code),
            None => base,
        };
        base.with_source(err)
    }
}

/// Errors returned by [`WeatherClient`](crate::client::WeatherClient).
#[derive(Debug, Error)]
pub enum WeatherError {
    /// A request parameter failed validation. Raised before any I/O.
    #[error("{0}")]
    InvalidArgument(String),

    /// The transport could not be built or the request itself failed.
    #[error("{message}")]
    Http {
        message: String,
        code: Option<u16>,
        #[source]
        source: TransportError,
    },

    /// The API answered a `json` request with a body that is not valid JSON.
    #[error("Failed to decode weather response as JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    /// HTTP status code for `Http` errors that came from a response.
    pub fn code(&self) -> Option<u16> {
        match self {
            WeatherError::Http { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<TransportError> for WeatherError {
    fn from(err: TransportError) -> Self {
        WeatherError::Http { message: err.message.clone(), code: err.code, source: err }
    }
}
