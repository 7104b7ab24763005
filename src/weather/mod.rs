pub mod handlers;
mod models;
mod service;

pub use models::{capitalize, title_case, WeatherReading};
pub use service::{WeatherError, WeatherService, WeatherSource};

#[cfg(test)]
pub(crate) use service::classify_response;
