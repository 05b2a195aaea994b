use domain::automation::{
    build_automation_trigger, resolve_sensor_trigger_defaults, DayOfWeek, TimeTrigger, Trigger,
};
use domain::device::{
    build_device_action_settings, default_settings, get_device_type_descriptor, DeviceType,
};
use domain::field::FieldDataType;
use domain::sensor::{get_sensor_type_descriptor, is_dangerous, Sensor, SensorType};
use domain::validation::{check_field, validate_field, ValidationContext, ValidationError};
use domain::FallbackTranslator;
use serde_json::{json, Map, Value};

fn field_names(device_type: &str) -> Vec<&'static str> {
    get_device_type_descriptor(device_type)
        .unwrap()
        .fields
        .iter()
        .map(|f| f.name)
        .collect()
}

fn threshold_names(sensor_type: &str) -> Vec<&'static str> {
    get_sensor_type_descriptor(sensor_type)
        .unwrap()
        .threshold_fields()
        .map(|f| f.name)
        .collect()
}

#[test]
fn device_field_coverage() {
    assert_eq!(field_names("smart_light"), ["brightness", "color"]);
    assert_eq!(field_names("thermostat"), ["currentMode", "currentTemperature"]);
    assert_eq!(field_names("heating_valve"), ["currentTemperature"]);
    assert_eq!(field_names("smart_lock"), ["currentDoorState"]);
    assert_eq!(field_names("gate"), ["currentPosition"]);
    assert_eq!(field_names("irrigation_system"), ["currentWaterFlow"]);
    assert_eq!(
        field_names("ventilation"),
        ["currentMode", "currentFanSpeed", "currentAirflow"]
    );
    assert_eq!(field_names("air_purifier"), ["currentMode", "currentFanSpeed"]);
    assert_eq!(field_names("camera"), ["currentResolution"]);
    assert!(field_names("smart_plug").is_empty());
}

#[test]
fn device_field_requiredness() {
    let irrigation = get_device_type_descriptor("irrigation_system").unwrap();
    assert!(!irrigation.fields[0].required);

    let ventilation = get_device_type_descriptor("ventilation").unwrap();
    let required: Vec<_> = ventilation.fields.iter().map(|f| f.required).collect();
    assert_eq!(required, [true, true, false]);

    let camera = get_device_type_descriptor("camera").unwrap();
    assert_eq!(camera.fields[0].data_type, FieldDataType::Select);
    assert_eq!(camera.fields[0].options.len(), 5);
}

#[test]
fn sensor_threshold_coverage() {
    assert_eq!(
        threshold_names("temperature_sensor"),
        ["dangerousTemperaturePlus", "dangerousTemperatureMinus"]
    );
    assert_eq!(threshold_names("humidity_sensor"), ["dangerousHumidity"]);
    assert_eq!(threshold_names("motion_sensor"), ["dangerousMotionIntensity"]);
    assert_eq!(threshold_names("smoke_sensor"), ["dangerousSmokeLevel"]);
    assert_eq!(
        threshold_names("gas_sensor"),
        [
            "dangerousMethanLevel",
            "dangerousCarbonMonoxideLevel",
            "dangerousCarbonDioxideLevel",
            "dangerousPropaneLevel",
            "dangerousNitrogenDioxideLevel",
            "dangerousOzoneLevel"
        ]
    );
    assert_eq!(threshold_names("water_leak_sensor"), ["dangerousWaterDetectionIndex"]);
    assert_eq!(threshold_names("light_sensor"), ["dangerousLux"]);
    assert_eq!(
        threshold_names("air_quality_sensor"),
        ["dangerousAQI", "dangerousPM25", "dangerousPM10"]
    );
    assert_eq!(
        threshold_names("power_sensor"),
        ["dangerousPower", "dangerousVoltage", "dangerousCurrent"]
    );
    assert_eq!(
        threshold_names("weather_sensor"),
        [
            "dangerousTemperaturePlus",
            "dangerousTemperatureMinus",
            "dangerousWindSpeed",
            "dangerousRainIntensity"
        ]
    );
}

#[test]
fn validator_is_pure() {
    let ctx = ValidationContext::default().with_sensor_type(Some(SensorType::HumiditySensor));
    let first = validate_field("dangerousHumidity", &json!("abc"), None, &ctx);
    let second = validate_field("dangerousHumidity", &json!("abc"), None, &ctx);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn validator_range_boundaries() {
    let temperature = get_sensor_type_descriptor("temperature_sensor").unwrap();
    let plus = &temperature.threshold("dangerousTemperaturePlus").unwrap().field;
    let ctx = ValidationContext::default();

    assert!(matches!(
        check_field("dangerousTemperaturePlus", &json!(0), Some(plus), &ctx),
        Err(ValidationError::Range { .. })
    ));
    assert_eq!(
        validate_field("dangerousTemperaturePlus", &json!(0.01), Some(plus), &ctx),
        ""
    );

    let humidity = get_sensor_type_descriptor("humidity_sensor").unwrap();
    let spec = &humidity.threshold("dangerousHumidity").unwrap().field;
    assert_eq!(validate_field("dangerousHumidity", &json!(100), Some(spec), &ctx), "");
    assert!(matches!(
        check_field("dangerousHumidity", &json!(101), Some(spec), &ctx),
        Err(ValidationError::Range { .. })
    ));
}

#[test]
fn non_recurring_trigger_drops_days() {
    let trigger = Trigger::Time {
        time_trigger: TimeTrigger {
            start_time: "08:00".into(),
            end_time: "09:00".into(),
            is_recurring: false,
            days_of_week: [DayOfWeek::Monday].into(),
        },
    };
    let built = serde_json::to_value(build_automation_trigger(&trigger)).unwrap();
    assert_eq!(built["timeTrigger"]["daysOfWeek"], json!([]));
}

#[test]
fn property_change_resets_threshold() {
    let t = FallbackTranslator;
    let co = resolve_sensor_trigger_defaults(SensorType::GasSensor, "currentCarbonMonoxideLevel", &t)
        .unwrap();
    assert_eq!(
        serde_json::to_value(&co).unwrap(),
        json!({ "property": "currentCarbonMonoxideLevel", "defaultValue": "50", "unit": "ppm" })
    );

    let ozone = resolve_sensor_trigger_defaults(SensorType::GasSensor, "currentOzoneLevel", &t).unwrap();
    assert_eq!(ozone.default_value, "100");
    assert_eq!(ozone.unit.as_deref(), Some("мкг/м³"));
    assert_ne!(ozone.default_value, co.default_value);
}

#[test]
fn power_sensor_danger() {
    let mut sensor: Sensor = serde_json::from_value(json!({
        "id": "p-1",
        "name": "Kitchen outlet",
        "sensorType": "power_sensor",
        "roomId": "r-1",
        "homeId": "h-1",
        "currentPower": 3600,
        "dangerousPower": 3500,
        "currentVoltage": 200,
        "dangerousVoltage": 250
    }))
    .unwrap();
    assert!(is_dangerous(&sensor));

    sensor.values.insert("currentPower".into(), json!(3000));
    assert!(!is_dangerous(&sensor));
}

#[test]
fn unknown_device_type_payload() {
    let raw = json!({ "foo": 1 }).as_object().cloned().unwrap();
    assert_eq!(
        Value::Object(build_device_action_settings("unknown_type", &raw)),
        json!({ "isActive": true })
    );
}

#[test]
fn defaults_are_a_fixed_point() {
    for device_type in DeviceType::ALL {
        let defaults = default_settings(device_type);
        let rebuilt = build_device_action_settings(device_type.as_str(), &defaults);
        assert_eq!(rebuilt, defaults, "{device_type}");
    }
}

#[test]
fn builder_emits_exactly_descriptor_keys() {
    for device_type in DeviceType::ALL {
        let settings = build_device_action_settings(device_type.as_str(), &Map::new());
        let mut expected = field_names(device_type.as_str());
        expected.push("isActive");
        expected.sort();
        let mut keys: Vec<_> = settings.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, expected, "{device_type}");
    }
}
