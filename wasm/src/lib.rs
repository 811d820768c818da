//! WebAssembly module for the AgroSense field toolkit
//!
//! Provides offline computation on field tablets for:
//! - Sensor calibration
//! - Root-zone water balance and irrigation urgency
//! - Thermal time and growth stage

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn to_decimal(value: f64, name: &str) -> Result<Decimal, JsValue> {
    Decimal::try_from(value).map_err(|_| JsValue::from_str(&format!("Invalid {}: {}", name, value)))
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

#[derive(Serialize)]
struct UrgencyReport {
    level: UrgencyLevel,
    score: i32,
    decision: IrrigationAction,
    water_balance: WaterBalance,
}

/// Convert a raw moisture count to VWC % for a soil texture
#[wasm_bindgen]
pub fn calibrate_moisture(raw_count: i32, soil_texture: &str) -> Result<f64, JsValue> {
    validate_raw_count(raw_count).map_err(JsValue::from_str)?;
    let vwc = shared::to_vwc_for_texture_name(raw_count, soil_texture).map_err(js_error)?;
    Ok(to_f64(vwc))
}

/// Convert the sensor's temperature channel (°C × 10) to °C
#[wasm_bindgen]
pub fn convert_temperature(raw_temp_times_ten: i32) -> f64 {
    to_f64(shared::to_temperature(raw_temp_times_ten))
}

/// Water balance for a root zone, as JSON
#[wasm_bindgen]
pub fn calculate_water_balance(
    soil_texture: &str,
    current_vwc: f64,
    root_depth_cm: f64,
    mad: f64,
) -> Result<String, JsValue> {
    let balance = shared::calculate_water_balance_for_texture_name(
        soil_texture,
        to_decimal(current_vwc, "VWC")?,
        to_decimal(root_depth_cm, "root depth")?,
        to_decimal(mad, "MAD")?,
    )
    .map_err(js_error)?;
    to_json(&balance)
}

/// Urgency, decision and water balance for a catalog crop, as JSON
#[wasm_bindgen]
pub fn assess_irrigation(crop_name: &str, soil_texture: &str, current_vwc: f64) -> Result<String, JsValue> {
    let crop = find_default_crop(crop_name).map_err(js_error)?;
    let vwc = to_decimal(current_vwc, "VWC")?;
    validate_vwc(vwc).map_err(JsValue::from_str)?;

    let balance = shared::calculate_water_balance_for_texture_name(
        soil_texture,
        vwc,
        crop.root_depth_cm,
        crop.mad,
    )
    .map_err(js_error)?;
    let urgency = shared::classify_urgency(vwc, &balance, &crop);

    to_json(&UrgencyReport {
        level: urgency.level,
        score: urgency.score,
        decision: IrrigationAction::for_urgency(urgency.level),
        water_balance: balance,
    })
}

/// Urgency after a rain forecast, as `LEVEL:score`
#[wasm_bindgen]
pub fn downgrade_urgency_for_rain(level: &str, score: i32) -> Result<String, JsValue> {
    let level: UrgencyLevel = level.parse().map_err(js_error)?;
    let adjusted = shared::downgrade_for_rain(UrgencyAssessment::new(level, score));
    Ok(format!("{}:{}", adjusted.level, adjusted.score))
}

/// Growing degree days for one day
#[wasm_bindgen]
pub fn calculate_daily_gdd(avg_temperature: f64, base_temperature: f64) -> Result<f64, JsValue> {
    let gdd = shared::daily_gdd(
        to_decimal(avg_temperature, "average temperature")?,
        to_decimal(base_temperature, "base temperature")?,
    );
    Ok(to_f64(gdd))
}

/// Growth stage of a catalog crop at a cumulative GDD
#[wasm_bindgen]
pub fn growth_stage_for(crop_name: &str, cumulative_gdd: f64) -> Result<String, JsValue> {
    let crop = find_default_crop(crop_name).map_err(js_error)?;
    let stage = shared::stage_for_cumulative(to_decimal(cumulative_gdd, "cumulative GDD")?, &crop);
    Ok(stage.to_string())
}
