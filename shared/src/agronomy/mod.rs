//! Pure agronomic calculations

mod calibration;
mod crop_suitability;
mod irrigation_plan;
mod thermal_time;
mod urgency;
mod water_balance;
mod weather_adjustment;

pub use calibration::*;
pub use crop_suitability::*;
pub use irrigation_plan::*;
pub use thermal_time::*;
pub use urgency::*;
pub use water_balance::*;
pub use weather_adjustment::*;
