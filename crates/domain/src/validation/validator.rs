use serde_json::Value;

use super::ValidationError;
use crate::device::{device_type_descriptor, DeviceType};
use crate::field::{is_empty_value, parse_number, Dimensions, FieldDataType, FieldSpec};
use crate::i18n::{Translator, FALLBACK};
use crate::sensor::{sensor_type_descriptor, SensorType, THRESHOLD_PREFIX};

pub const NAME_FIELD: &str = "name";
pub const DEVICE_TYPE_FIELD: &str = "deviceType";
pub const SENSOR_TYPE_FIELD: &str = "sensorType";
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;

/// Selections a field's rules may depend on, plus the translator for messages
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    pub translator: &'a dyn Translator,
    pub device_type: Option<DeviceType>,
    pub sensor_type: Option<SensorType>,
}

impl Default for ValidationContext<'static> {
    fn default() -> Self {
        Self::new(&FALLBACK)
    }
}

impl<'a> ValidationContext<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self {
            translator,
            device_type: None,
            sensor_type: None,
        }
    }

    pub fn with_device_type(mut self, device_type: Option<DeviceType>) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn with_sensor_type(mut self, sensor_type: Option<SensorType>) -> Self {
        self.sensor_type = sensor_type;
        self
    }

    /// FieldSpec of `name` under the current device/sensor type selection
    pub fn field_spec(&self, name: &str) -> Option<&'static FieldSpec> {
        self.device_type
            .and_then(|d| device_type_descriptor(d).field(name))
            .or_else(|| {
                self.sensor_type
                    .and_then(|s| sensor_type_descriptor(s).threshold(name))
                    .map(|t| &t.field)
            })
    }
}

impl std::fmt::Debug for ValidationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("device_type", &self.device_type)
            .field("sensor_type", &self.sensor_type)
            .finish_non_exhaustive()
    }
}

/// Validates one field value, returning the localized error or `""` when valid.
///
/// When `spec` is `None` it is resolved from the context's current selection.
pub fn validate_field(
    field_name: &str,
    value: &Value,
    spec: Option<&FieldSpec>,
    ctx: &ValidationContext<'_>,
) -> String {
    match check_field(field_name, value, spec, ctx) {
        Ok(()) => String::new(),
        Err(e) => e.message(ctx.translator),
    }
}

/// Typed form of [`validate_field`].
pub fn check_field(
    field_name: &str,
    value: &Value,
    spec: Option<&FieldSpec>,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    match field_name {
        NAME_FIELD => return check_name_value(value),
        DEVICE_TYPE_FIELD => return check_type_key(value, |s| s.parse::<DeviceType>().is_ok()),
        SENSOR_TYPE_FIELD => return check_type_key(value, |s| s.parse::<SensorType>().is_ok()),
        _ => {}
    }

    let Some(spec) = spec.or_else(|| ctx.field_spec(field_name)) else {
        // A threshold left over from a previously selected sensor type
        if field_name.starts_with(THRESHOLD_PREFIX) && ctx.sensor_type.is_some() {
            return Err(ValidationError::InvalidValue);
        }
        return Ok(());
    };

    if is_empty_value(value) {
        return if spec.required {
            Err(ValidationError::Required)
        } else {
            Ok(())
        };
    }

    match spec.data_type {
        FieldDataType::Number => check_number(spec, value),
        FieldDataType::Select => check_select(spec, value),
        FieldDataType::Text => Ok(()),
    }
}

/// Names are required and 2 to 50 characters long once trimmed.
pub fn check_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        Err(ValidationError::Required)
    } else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        Err(ValidationError::Length {
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
        })
    } else {
        Ok(())
    }
}

fn check_name_value(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::String(s) => check_name(s),
        v if is_empty_value(v) => Err(ValidationError::Required),
        _ => Err(ValidationError::Format),
    }
}

fn check_type_key(value: &Value, known: impl Fn(&str) -> bool) -> Result<(), ValidationError> {
    if is_empty_value(value) {
        return Err(ValidationError::Required);
    }
    match value.as_str() {
        Some(key) if known(key.trim()) => Ok(()),
        _ => Err(ValidationError::InvalidValue),
    }
}

fn check_number(spec: &FieldSpec, value: &Value) -> Result<(), ValidationError> {
    let n = parse_number(value).ok_or(ValidationError::Format)?;
    match spec.range {
        Some(range) if !range.contains(n) => Err(ValidationError::Range { range }),
        _ => Ok(()),
    }
}

fn check_select(spec: &FieldSpec, value: &Value) -> Result<(), ValidationError> {
    let known = match value {
        Value::String(s) => spec.option(s.trim()).is_some(),
        Value::Object(_) => serde_json::from_value::<Dimensions>(value.clone())
            .map(|d| spec.options.iter().any(|o| o.dimensions == Some(d)))
            .unwrap_or(false),
        _ => false,
    };
    if known {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sensor_ctx(sensor_type: SensorType) -> ValidationContext<'static> {
        ValidationContext::default().with_sensor_type(Some(sensor_type))
    }

    #[test]
    fn test_name_rules() {
        let ctx = ValidationContext::default();
        assert_eq!(check_field("name", &json!(""), None, &ctx), Err(ValidationError::Required));
        assert_eq!(
            check_field("name", &json!(" a "), None, &ctx),
            Err(ValidationError::Length { min: 2, max: 50 })
        );
        assert_eq!(check_field("name", &json!("ab"), None, &ctx), Ok(()));
        assert!(check_field("name", &json!("x".repeat(51)), None, &ctx).is_err());
        assert_eq!(check_field("name", &json!("я".repeat(50)), None, &ctx), Ok(()));
    }

    #[test]
    fn test_type_selectors() {
        let ctx = ValidationContext::default();
        assert_eq!(
            check_field("deviceType", &Value::Null, None, &ctx),
            Err(ValidationError::Required)
        );
        assert_eq!(
            check_field("deviceType", &json!("toaster"), None, &ctx),
            Err(ValidationError::InvalidValue)
        );
        assert_eq!(check_field("sensorType", &json!("gas_sensor"), None, &ctx), Ok(()));
        assert_eq!(
            check_field("sensorType", &json!("smart_plug"), None, &ctx),
            Err(ValidationError::InvalidValue)
        );
    }

    #[test]
    fn test_numeric_rules() {
        let ctx = sensor_ctx(SensorType::TemperatureSensor);
        assert_eq!(
            check_field("dangerousTemperaturePlus", &json!(""), None, &ctx),
            Err(ValidationError::Required)
        );
        assert_eq!(
            check_field("dangerousTemperaturePlus", &json!("hot"), None, &ctx),
            Err(ValidationError::Format)
        );
        assert!(matches!(
            check_field("dangerousTemperatureMinus", &json!(0), None, &ctx),
            Err(ValidationError::Range { .. })
        ));
        assert_eq!(check_field("dangerousTemperatureMinus", &json!("-0.5"), None, &ctx), Ok(()));
    }

    #[test]
    fn test_optional_number_may_be_empty() {
        let ctx = ValidationContext::default().with_device_type(Some(DeviceType::IrrigationSystem));
        assert_eq!(check_field("currentWaterFlow", &json!(""), None, &ctx), Ok(()));
        assert!(matches!(
            check_field("currentWaterFlow", &json!(-1), None, &ctx),
            Err(ValidationError::Range { .. })
        ));
    }

    #[test]
    fn test_select_rules() {
        let ctx = ValidationContext::default().with_device_type(Some(DeviceType::Thermostat));
        assert_eq!(
            check_field("currentMode", &json!(""), None, &ctx),
            Err(ValidationError::Required)
        );
        assert_eq!(
            check_field("currentMode", &json!("boost"), None, &ctx),
            Err(ValidationError::InvalidValue)
        );
        assert_eq!(check_field("currentMode", &json!("eco"), None, &ctx), Ok(()));
    }

    #[test]
    fn test_stale_threshold_rejected() {
        let ctx = sensor_ctx(SensorType::HumiditySensor);
        assert_eq!(
            check_field("dangerousLux", &json!(100), None, &ctx),
            Err(ValidationError::InvalidValue)
        );
    }

    #[test]
    fn test_unknown_field_without_context_is_valid() {
        let ctx = ValidationContext::default();
        assert_eq!(check_field("roomId", &json!("r-1"), None, &ctx), Ok(()));
    }

    #[test]
    fn test_message_rendering() {
        let ctx = sensor_ctx(SensorType::HumiditySensor);
        assert_eq!(validate_field("dangerousHumidity", &json!(50), None, &ctx), "");
        assert_eq!(
            validate_field("dangerousHumidity", &json!(101), None, &ctx),
            "Значение должно быть от 0 до 100"
        );
    }
}
