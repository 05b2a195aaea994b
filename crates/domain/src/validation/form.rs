use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::validator::{validate_field, ValidationContext, DEVICE_TYPE_FIELD, SENSOR_TYPE_FIELD};
use crate::device::device_type_descriptor;
use crate::field::FieldSpec;
use crate::sensor::sensor_type_descriptor;

/// Field name -> localized message, only for failing fields
pub type FieldErrors = BTreeMap<String, String>;

/// Re-validates a whole flat form.
///
/// Type selections found in `values` override the context, so thresholds and
/// settings are always checked against the type currently chosen. Required
/// fields of that type missing from `values` are reported too.
pub fn validate_form(values: &Map<String, Value>, ctx: &ValidationContext<'_>) -> FieldErrors {
    let mut ctx = *ctx;
    if let Some(device_type) = selection(values, DEVICE_TYPE_FIELD) {
        ctx.device_type = Some(device_type);
    }
    if let Some(sensor_type) = selection(values, SENSOR_TYPE_FIELD) {
        ctx.sensor_type = Some(sensor_type);
    }

    let mut errors = FieldErrors::new();
    for (name, value) in values {
        let message = validate_field(name, value, None, &ctx);
        if !message.is_empty() {
            errors.insert(name.clone(), message);
        }
    }

    let device_fields = ctx
        .device_type
        .map(|d| device_type_descriptor(d).fields)
        .unwrap_or(&[]);
    let sensor_fields = ctx
        .sensor_type
        .map(|s| sensor_type_descriptor(s).thresholds)
        .unwrap_or(&[]);
    let expected = device_fields
        .iter()
        .chain(sensor_fields.iter().map(|t| &t.field));

    for spec in expected.filter(|s| !values.contains_key(s.name)) {
        check_missing(spec, &ctx, &mut errors);
    }
    errors
}

fn check_missing(spec: &FieldSpec, ctx: &ValidationContext<'_>, errors: &mut FieldErrors) {
    let message = validate_field(spec.name, &Value::Null, Some(spec), ctx);
    if !message.is_empty() {
        errors.insert(spec.name.to_string(), message);
    }
}

fn selection<T: std::str::FromStr>(values: &Map<String, Value>, key: &str) -> Option<T> {
    values.get(key)?.as_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reports_every_failing_field() {
        let values = json!({
            "name": "x",
            "sensorType": "temperature_sensor",
            "dangerousTemperaturePlus": 0,
            "dangerousTemperatureMinus": -5
        });
        let errors = validate_form(values.as_object().unwrap(), &ValidationContext::default());
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("dangerousTemperaturePlus"));
    }

    #[test]
    fn test_missing_required_threshold() {
        let values = json!({ "name": "Kitchen", "sensorType": "power_sensor", "dangerousPower": 3000 });
        let errors = validate_form(values.as_object().unwrap(), &ValidationContext::default());
        let keys: Vec<_> = errors.keys().cloned().collect();
        assert_eq!(keys, ["dangerousCurrent", "dangerousVoltage"]);
    }

    #[test]
    fn test_selection_in_values_wins_over_context() {
        let values = json!({ "sensorType": "humidity_sensor", "dangerousLux": 50, "dangerousHumidity": 50 });
        let ctx = ValidationContext::default()
            .with_sensor_type(Some(crate::sensor::SensorType::LightSensor));
        let errors = validate_form(values.as_object().unwrap(), &ctx);
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["dangerousLux"]);
    }

    #[test]
    fn test_clean_form() {
        let values = json!({
            "name": "Lamp",
            "deviceType": "smart_light",
            "brightness": "80",
            "color": "focus_mode"
        });
        assert!(validate_form(values.as_object().unwrap(), &ValidationContext::default()).is_empty());
    }
}
