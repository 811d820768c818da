//! Engine services for the AgroSense decision engine

pub mod context;
pub mod crop_recommendation;
pub mod field;
pub mod gdd;
pub mod irrigation;
pub mod reading;
pub mod weather;

pub use context::EngineContext;
pub use crop_recommendation::CropRecommendationService;
pub use field::FieldService;
pub use gdd::GddService;
pub use irrigation::IrrigationService;
pub use reading::ReadingService;
pub use weather::WeatherService;
