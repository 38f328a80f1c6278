use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    Config,
    error::WeatherError,
    model::{ResponseFormat, WeatherQuery, WeatherResult, WeatherType},
    transport::{HttpTransport, ReqwestTransportFactory, TransportFactory, TransportOptions},
};

/// Weather lookup endpoint of the AMap web service API.
pub const WEATHER_ENDPOINT: &str = "https://restapi.amap.com/v3/weather/weatherInfo";

/// Client for the AMap weather API.
///
/// A fresh transport is created for every request from the options held at
/// that moment, so changing options never affects a request already sent.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    api_key: String,
    endpoint: String,
    transport_options: TransportOptions,
    factory: Arc<dyn TransportFactory>,
}

impl WeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: WEATHER_ENDPOINT.to_string(),
            transport_options: TransportOptions::default(),
            factory: Arc::new(ReqwestTransportFactory),
        }
    }

    /// Send requests somewhere other than the public endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_transport_factory(mut self, factory: Arc<dyn TransportFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }

    /// Replace the transport options. Not merged with the previous ones.
    pub fn set_transport_options(&mut self, options: TransportOptions) {
        self.transport_options = options;
    }

    pub fn get_http_transport(&self) -> Result<Box<dyn HttpTransport>, WeatherError> {
        Ok(self.factory.create(&self.transport_options)?)
    }

    /// Look up weather for `city`.
    ///
    /// `kind` is `base` or `all`, `format` is `json` or `xml`; both are
    /// matched case-insensitively and validated before any request is made,
    /// then sent as spelled. Only `json` exactly is decoded.
    pub async fn get_weather(
        &self,
        city: &str,
        kind: &str,
        format: &str,
    ) -> Result<WeatherResult, WeatherError> {
        self.fetch(&WeatherQuery::parse(city, kind, format)?).await
    }

    /// Live weather as JSON.
    pub async fn live_weather(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        self.fetch(&WeatherQuery::new(city, WeatherType::Base, ResponseFormat::Json)).await
    }

    /// Forecast as JSON.
    pub async fn forecast_weather(&self, city: &str) -> Result<WeatherResult, WeatherError> {
        self.fetch(&WeatherQuery::new(city, WeatherType::All, ResponseFormat::Json)).await
    }

    pub async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherError> {
        let params = query.to_params(&self.api_key);
        debug!(
            endpoint = %self.endpoint,
            city = %query.city,
            extensions = query.kind(),
            output = query.format(),
            "Requesting weather"
        );

        let transport = self.get_http_transport()?;
        let body = transport.get(&self.endpoint, &params).await.map_err(|err| {
            warn!(error = %err, code = ?err.code(), "Weather request failed");
            WeatherError::from(err)
        })?;

        if query.decodes_json() {
            Ok(WeatherResult::Json(serde_json::from_str(&body)?))
        } else {
            Ok(WeatherResult::Raw(body))
        }
    }
}

/// Construct a client from config: API key, optional endpoint override and
/// transport options.
pub fn client_from_config(config: &Config) -> anyhow::Result<WeatherClient> {
    let api_key = config.api_key()?;

    let mut client = WeatherClient::new(api_key);
    if let Some(endpoint) = &config.endpoint {
        client = client.with_endpoint(endpoint.as_str());
    }
    client.set_transport_options(config.transport.clone());

    Ok(client)
}
