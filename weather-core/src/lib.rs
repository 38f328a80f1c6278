//! Core library for the AMap weather client.
//!
//! This crate defines:
//! - `WeatherClient`, which validates a lookup, sends it and decodes the answer
//! - The transport seam (`HttpTransport`, `TransportFactory`) and its reqwest default
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod transport;

pub use client::{WEATHER_ENDPOINT, WeatherClient, client_from_config};
pub use config::Config;
pub use error::{TransportError, WeatherError};
pub use model::{ResponseFormat, WeatherQuery, WeatherResult, WeatherType};
pub use transport::{
    HttpTransport, ReqwestTransport, ReqwestTransportFactory, TransportFactory, TransportOptions,
};
