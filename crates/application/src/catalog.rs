use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use domain::automation::{
    build_automation_trigger, resolve_sensor_trigger_defaults, trigger_properties, Trigger,
    TriggerDefaults,
};
use domain::device::{
    build_device_action_settings, default_settings, get_device_type_descriptor,
    list_device_types, LocalizedDeviceType,
};
use domain::sensor::{
    dangerous_readings_value, get_default_threshold, get_sensor_type_descriptor,
    list_sensor_types, LocalizedSensorType, SensorType,
};
use domain::validation::{validate_field, validate_form, FieldErrors, ValidationContext};
use domain::{DeviceType, Result, Translator, TypeOption};

/// Default threshold with its unit in both forms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdInfo {
    pub field: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
}

/// Danger state of one sensor snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DangerReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor_id: Option<String>,
    pub is_dangerous: bool,
    pub exceeded: Vec<String>,
}

/// Read-only facade over the type registry, threshold table, validator and
/// payload builders, with every label resolved through one translator.
#[derive(Clone)]
pub struct Catalog {
    translator: Arc<dyn Translator>,
}

impl Catalog {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn device_types(&self) -> Vec<TypeOption> {
        list_device_types(self.translator())
    }

    pub fn device_type(&self, key: &str) -> Result<LocalizedDeviceType> {
        Ok(get_device_type_descriptor(key)?.localize(self.translator()))
    }

    /// The settings payload a device of this type gets when nothing is entered
    pub fn device_defaults(&self, key: &str) -> Result<Map<String, Value>> {
        let descriptor = get_device_type_descriptor(key)?;
        Ok(default_settings(descriptor.device_type))
    }

    pub fn sensor_types(&self) -> Vec<TypeOption> {
        list_sensor_types(self.translator())
    }

    pub fn sensor_type(&self, key: &str) -> Result<LocalizedSensorType> {
        Ok(get_sensor_type_descriptor(key)?.localize(self.translator()))
    }

    pub fn default_threshold(&self, sensor_type: &str, field: &str) -> Result<ThresholdInfo> {
        let sensor_type: SensorType = sensor_type.parse()?;
        let default = get_default_threshold(sensor_type, field)?;
        Ok(ThresholdInfo {
            field: field.to_string(),
            value: default.value,
            unit: default.unit.map(|u| u.symbol().to_string()),
            unit_label: default.unit.map(|u| u.label(self.translator())),
        })
    }

    pub fn trigger_properties(&self, sensor_type: &str) -> Result<Vec<TypeOption>> {
        let sensor_type: SensorType = sensor_type.parse()?;
        Ok(trigger_properties(sensor_type, self.translator()))
    }

    pub fn trigger_defaults(&self, sensor_type: &str, property: &str) -> Result<TriggerDefaults> {
        let sensor_type: SensorType = sensor_type.parse()?;
        resolve_sensor_trigger_defaults(sensor_type, property, self.translator())
    }

    /// Validates one field against the given type selection; `""` means valid.
    pub fn validate_field(
        &self,
        field: &str,
        value: &Value,
        device_type: Option<DeviceType>,
        sensor_type: Option<SensorType>,
    ) -> String {
        let ctx = self.context(device_type, sensor_type);
        validate_field(field, value, None, &ctx)
    }

    pub fn validate_form(
        &self,
        values: &Map<String, Value>,
        device_type: Option<DeviceType>,
        sensor_type: Option<SensorType>,
    ) -> FieldErrors {
        let errors = validate_form(values, &self.context(device_type, sensor_type));
        debug!(fields = values.len(), failed = errors.len(), "Form validated");
        errors
    }

    /// Lenient by contract: an unknown type yields `{isActive: true}`.
    pub fn device_action_settings(
        &self,
        device_type: &str,
        raw: &Map<String, Value>,
    ) -> Map<String, Value> {
        if get_device_type_descriptor(device_type).is_err() {
            debug!(device_type, "Building settings for unrecognized device type");
        }
        build_device_action_settings(device_type, raw)
    }

    pub fn automation_trigger(&self, trigger: &Trigger) -> Trigger {
        build_automation_trigger(trigger)
    }

    /// Evaluates a live sensor object. Only `sensorType` and its
    /// `current*`/`dangerous*` fields are read; anything missing is not dangerous.
    pub fn danger(&self, sensor: &Value) -> DangerReport {
        let exceeded: Vec<String> = dangerous_readings_value(sensor)
            .into_iter()
            .map(str::to_string)
            .collect();
        DangerReport {
            sensor_id: sensor.get("id").and_then(Value::as_str).map(str::to_string),
            is_dangerous: !exceeded.is_empty(),
            exceeded,
        }
    }

    fn context(
        &self,
        device_type: Option<DeviceType>,
        sensor_type: Option<SensorType>,
    ) -> ValidationContext<'_> {
        ValidationContext::new(self.translator())
            .with_device_type(device_type)
            .with_sensor_type(sensor_type)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DomainError, FallbackTranslator};
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(FallbackTranslator))
    }

    #[test]
    fn test_translated_labels() {
        let english = Catalog::new(Arc::new(|key: &str, fallback: &str| match key {
            "devices.types.gate" => "Gate".to_string(),
            _ => fallback.to_string(),
        }));
        let gate = english.device_type("gate").unwrap();
        assert_eq!(gate.label, "Gate");
        let lock = english.device_type("smart_lock").unwrap();
        assert_ne!(lock.label, "Gate");
    }

    #[test]
    fn test_unknown_type_lookups() {
        let err = catalog().device_type("toaster").unwrap_err();
        assert!(err.is_unknown_type());
        let err = catalog().trigger_properties("toaster").unwrap_err();
        assert_eq!(err, DomainError::UnknownSensorType("toaster".into()));
    }

    #[test]
    fn test_threshold_info_units() {
        let info = catalog()
            .default_threshold("air_quality_sensor", "dangerousPM25")
            .unwrap();
        assert_eq!(info.value, 35.0);
        assert_eq!(info.unit.as_deref(), Some("µg/m³"));
        assert_eq!(info.unit_label.as_deref(), Some("мкг/м³"));

        let missing = catalog().default_threshold("humidity_sensor", "dangerousLux");
        assert!(matches!(missing, Err(DomainError::ThresholdNotFound { .. })));
    }

    #[test]
    fn test_danger_report() {
        let report = catalog().danger(&json!({
            "id": "t-1",
            "sensorType": "temperature_sensor",
            "currentTemperature": -12,
            "dangerousTemperaturePlus": 35,
            "dangerousTemperatureMinus": -10
        }));
        assert!(report.is_dangerous);
        assert_eq!(report.sensor_id.as_deref(), Some("t-1"));
        assert_eq!(report.exceeded, ["dangerousTemperatureMinus"]);
    }

    #[test]
    fn test_danger_report_without_thresholds() {
        let report = catalog().danger(&json!({
            "sensorType": "smoke_sensor",
            "currentSmokeLevel": 90
        }));
        assert!(!report.is_dangerous);
        assert!(report.sensor_id.is_none());
        assert!(report.exceeded.is_empty());
    }

    #[test]
    fn test_validate_field_uses_selection() {
        let message = catalog().validate_field(
            "brightness",
            &json!(150),
            Some(DeviceType::SmartLight),
            None,
        );
        assert!(!message.is_empty());
        let ignored = catalog().validate_field("brightness", &json!(150), None, None);
        assert_eq!(ignored, "");
    }
}
