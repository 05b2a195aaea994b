//! Automation trigger normalization and sensor-condition defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rule::{SensorTrigger, TimeTrigger, Trigger, TriggerCondition};
use crate::error::{DomainError, Result};
use crate::field::{format_number, number_value, parse_number, TypeOption};
use crate::i18n::Translator;
use crate::sensor::{sensor_type_descriptor, SensorType, TriggerDefault};

/// Initial condition for a monitored sensor property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDefaults {
    pub property: String,
    pub default_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl TriggerDefaults {
    /// A fresh condition for this property. Whatever value was entered for the
    /// previous property is discarded.
    pub fn to_condition(&self) -> TriggerCondition {
        TriggerCondition {
            property: self.property.clone(),
            trigger_value: Value::String(self.default_value.clone()),
            unit: self.unit.clone(),
        }
    }
}

/// Normalized copy of a trigger, ready for the API.
///
/// Time triggers drop their weekday selection unless recurring. Sensor trigger
/// values become JSON numbers when numeric; a blank unit is omitted.
pub fn build_automation_trigger(trigger: &Trigger) -> Trigger {
    match trigger {
        Trigger::Time { time_trigger } => Trigger::Time {
            time_trigger: TimeTrigger {
                start_time: time_trigger.start_time.trim().to_string(),
                end_time: time_trigger.end_time.trim().to_string(),
                is_recurring: time_trigger.is_recurring,
                days_of_week: if time_trigger.is_recurring {
                    time_trigger.days_of_week.clone()
                } else {
                    Default::default()
                },
            },
        },
        Trigger::Sensor { sensor_trigger } => Trigger::Sensor {
            sensor_trigger: SensorTrigger {
                sensor_id: sensor_trigger.sensor_id.clone(),
                sensor_type: sensor_trigger.sensor_type,
                condition: normalize_condition(&sensor_trigger.condition),
            },
        },
    }
}

fn normalize_condition(condition: &TriggerCondition) -> TriggerCondition {
    let trigger_value = match parse_number(&condition.trigger_value) {
        Some(n) => number_value(n),
        None => match &condition.trigger_value {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        },
    };
    TriggerCondition {
        property: condition.property.clone(),
        trigger_value,
        unit: condition
            .unit
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string),
    }
}

/// Default threshold value and unit for a condition on `property`.
///
/// Called whenever the monitored sensor or property changes; the result
/// replaces any previously entered value.
pub fn resolve_sensor_trigger_defaults(
    sensor_type: SensorType,
    property: &str,
    t: &dyn Translator,
) -> Result<TriggerDefaults> {
    let descriptor = sensor_type_descriptor(sensor_type);
    let reading = descriptor
        .reading(property)
        .ok_or_else(|| DomainError::UnsupportedProperty {
            sensor_type: sensor_type.to_string(),
            property: property.to_string(),
        })?;

    let (default_value, unit) = match reading.trigger_default {
        TriggerDefault::Threshold { field } => {
            let threshold =
                descriptor
                    .threshold(field)
                    .ok_or_else(|| DomainError::ThresholdNotFound {
                        sensor_type: sensor_type.to_string(),
                        field: field.to_string(),
                    })?;
            (format_number(threshold.default_value()), threshold.field.unit)
        }
        TriggerDefault::Fixed { value, unit } => (value.to_string(), Some(unit)),
    };

    Ok(TriggerDefaults {
        property: property.to_string(),
        default_value,
        unit: unit.map(|u| u.label(t)),
    })
}

/// Reading properties an automation may monitor on `sensor_type`
pub fn trigger_properties(sensor_type: SensorType, t: &dyn Translator) -> Vec<TypeOption> {
    sensor_type_descriptor(sensor_type)
        .readings
        .iter()
        .map(|r| TypeOption {
            value: r.property.to_string(),
            label: r.label(t),
        })
        .collect()
}
