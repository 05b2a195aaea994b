//! Device action payload construction.

use serde_json::{Map, Value};

use super::registry::{device_type_descriptor, get_device_type_descriptor};
use super::DeviceType;
use crate::field::{
    is_empty_value, number_value, parse_number, Dimensions, FieldDataType, FieldSpec,
};

pub const IS_ACTIVE: &str = "isActive";

/// Normalized settings for a device action.
///
/// Emits exactly the fields of `device_type`, each taken from `raw` when usable
/// and from the field default otherwise, plus `isActive: true`. An unrecognized
/// type yields `{isActive: true}` alone.
pub fn build_device_action_settings(device_type: &str, raw: &Map<String, Value>) -> Map<String, Value> {
    let fields: &[FieldSpec] = match get_device_type_descriptor(device_type) {
        Ok(descriptor) => descriptor.fields,
        Err(_) => &[],
    };

    let mut settings = Map::new();
    for field in fields {
        if let Some(value) = resolve_setting(field, raw.get(field.name)) {
            settings.insert(field.name.to_string(), value);
        }
    }
    settings.insert(IS_ACTIVE.to_string(), Value::Bool(true));
    settings
}

/// The payload produced when nothing was entered.
pub fn default_settings(device_type: DeviceType) -> Map<String, Value> {
    build_device_action_settings(device_type.as_str(), &Map::new())
}

fn resolve_setting(field: &FieldSpec, raw: Option<&Value>) -> Option<Value> {
    let provided = raw.filter(|v| !is_empty_value(v));
    let value = match field.data_type {
        FieldDataType::Number => provided.and_then(parse_number).map(number_value),
        FieldDataType::Select => provided.and_then(|v| select_value(field, v)),
        FieldDataType::Text => provided.cloned(),
    };
    value.or_else(|| field.default_value())
}

fn select_value(field: &FieldSpec, value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => field.option(s.trim()).map(|o| match o.dimensions {
            Some(d) => d.to_value(),
            None => Value::String(o.value.to_string()),
        }),
        Value::Object(_) => {
            let dims: Dimensions = serde_json::from_value(value.clone()).ok()?;
            field
                .options
                .iter()
                .any(|o| o.dimensions == Some(dims))
                .then(|| dims.to_value())
        }
        _ => None,
    }
}

/// Converts a stored setting back into the raw input a form edits
/// (`{width:1280,height:720}` becomes `"hd"`, numbers become strings).
pub fn setting_input(field: &FieldSpec, value: &Value) -> Option<String> {
    match (field.data_type, value) {
        (_, Value::String(s)) => Some(s.clone()),
        (FieldDataType::Number, Value::Number(n)) => Some(n.to_string()),
        (FieldDataType::Select, Value::Object(_)) => {
            let dims: Dimensions = serde_json::from_value(value.clone()).ok()?;
            field
                .options
                .iter()
                .find(|o| o.dimensions == Some(dims))
                .map(|o| o.value.to_string())
        }
        _ => None,
    }
}

/// Form inputs pre-filled from the field defaults of `device_type`.
pub fn default_inputs(device_type: DeviceType) -> Map<String, Value> {
    device_type_descriptor(device_type)
        .fields
        .iter()
        .filter_map(|f| Some((f.name.to_string(), Value::String(f.default_input()?))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_smart_light_from_form_strings() {
        let settings = build_device_action_settings(
            "smart_light",
            &map(json!({ "brightness": "55", "color": "warm_white", "extra": 1 })),
        );
        assert_eq!(
            Value::Object(settings),
            json!({ "brightness": 55, "color": "warm_white", "isActive": true })
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = build_device_action_settings("ventilation", &Map::new());
        assert_eq!(
            Value::Object(settings),
            json!({
                "currentMode": "auto",
                "currentFanSpeed": 1,
                "currentAirflow": 1,
                "isActive": true
            })
        );
    }

    #[test]
    fn test_invalid_select_falls_back_to_default() {
        let settings =
            build_device_action_settings("thermostat", &map(json!({ "currentMode": "turbo" })));
        assert_eq!(settings["currentMode"], json!("heat"));
        assert_eq!(settings["currentTemperature"], json!(21));
    }

    #[test]
    fn test_camera_resolution_maps_to_dimensions() {
        let settings =
            build_device_action_settings("camera", &map(json!({ "currentResolution": "4k" })));
        assert_eq!(
            settings["currentResolution"],
            json!({ "width": 3840, "height": 2160 })
        );

        let defaults = default_settings(DeviceType::Camera);
        assert_eq!(
            defaults["currentResolution"],
            json!({ "width": 1280, "height": 720 })
        );
    }

    #[test]
    fn test_camera_accepts_known_dimensions() {
        let raw = map(json!({ "currentResolution": { "width": 640, "height": 480 } }));
        let settings = build_device_action_settings("camera", &raw);
        assert_eq!(settings["currentResolution"], json!({ "width": 640, "height": 480 }));

        let odd = map(json!({ "currentResolution": { "width": 10, "height": 10 } }));
        let settings = build_device_action_settings("camera", &odd);
        assert_eq!(settings["currentResolution"], json!({ "width": 1280, "height": 720 }));
    }

    #[test]
    fn test_smart_plug_only_active_flag() {
        let settings = build_device_action_settings("smart_plug", &map(json!({ "power": 1 })));
        assert_eq!(Value::Object(settings), json!({ "isActive": true }));
    }

    #[test]
    fn test_unknown_type_is_lenient() {
        let settings = build_device_action_settings("unknown_type", &map(json!({ "foo": 1 })));
        assert_eq!(Value::Object(settings), json!({ "isActive": true }));
    }

    #[test]
    fn test_setting_input_reverses_camera_dimensions() {
        let field = device_type_descriptor(DeviceType::Camera)
            .field("currentResolution")
            .unwrap();
        assert_eq!(
            setting_input(field, &json!({ "width": 1920, "height": 1080 })),
            Some("fullhd".to_string())
        );
    }

    #[test]
    fn test_default_inputs() {
        let inputs = default_inputs(DeviceType::SmartLight);
        assert_eq!(Value::Object(inputs), json!({ "brightness": "100", "color": "white" }));
    }
}
