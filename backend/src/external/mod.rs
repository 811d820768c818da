//! External API integrations

pub mod weather;

pub use weather::{ForecastProvider, OpenWeatherClient};
