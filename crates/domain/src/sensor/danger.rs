//! Danger evaluation over live sensor readings.
//!
//! Pure and uncached: callers re-evaluate on every reading update. A reading
//! or threshold that is missing (or not numeric) never counts as dangerous.

use serde_json::{Map, Value};

use super::registry::sensor_type_descriptor;
use super::{Sensor, SensorType};
use crate::field::parse_number;

/// Threshold fields of `sensor_type` exceeded by the readings in `values`
pub fn dangerous_readings(sensor_type: SensorType, values: &Map<String, Value>) -> Vec<&'static str> {
    sensor_type_descriptor(sensor_type)
        .thresholds
        .iter()
        .filter(|t| {
            let current = values.get(t.reading).and_then(parse_number);
            let limit = values.get(t.name()).and_then(parse_number);
            match (current, limit) {
                (Some(current), Some(limit)) => t.direction.exceeded(current, limit),
                _ => false,
            }
        })
        .map(|t| t.name())
        .collect()
}

pub fn is_dangerous(sensor: &Sensor) -> bool {
    !dangerous_readings(sensor.sensor_type, &sensor.values).is_empty()
}

/// Threshold fields exceeded in an untyped sensor object. The type comes from
/// its `sensorType` field; unknown or missing types exceed nothing.
pub fn dangerous_readings_value(sensor: &Value) -> Vec<&'static str> {
    let Some(object) = sensor.as_object() else {
        return Vec::new();
    };
    object
        .get("sensorType")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<SensorType>().ok())
        .map(|sensor_type| dangerous_readings(sensor_type, object))
        .unwrap_or_default()
}

pub fn is_dangerous_value(sensor: &Value) -> bool {
    !dangerous_readings_value(sensor).is_empty()
}
