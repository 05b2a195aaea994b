use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::device::{device_type_descriptor, Device, DeviceType, IS_ACTIVE};
use crate::error::{DomainError, Result};
use crate::field::parse_number;
use crate::i18n::FALLBACK;
use crate::sensor::{sensor_type_descriptor, Sensor, SensorType};
use crate::validation::check_name;

pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    Time,
    Sensor,
}

/// Time window during which the action applies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrigger {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub days_of_week: BTreeSet<DayOfWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCondition {
    pub property: String,
    pub trigger_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorTrigger {
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub condition: TriggerCondition,
}

/// What activates a rule. Exactly one payload exists per trigger type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "triggerType", rename_all = "lowercase")]
pub enum Trigger {
    Time {
        #[serde(rename = "timeTrigger")]
        time_trigger: TimeTrigger,
    },
    Sensor {
        #[serde(rename = "sensorTrigger")]
        sensor_trigger: SensorTrigger,
    },
}

impl Trigger {
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            Self::Time { .. } => TriggerType::Time,
            Self::Sensor { .. } => TriggerType::Sensor,
        }
    }
}

/// Settings applied to every target device when the rule fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAction {
    pub device_type: DeviceType,
    pub device_ids: BTreeSet<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationRule {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub home_id: String,
    #[serde(flatten)]
    pub trigger: Trigger,
    pub device_action: DeviceAction,
}

impl AutomationRule {
    /// Checks the rule's own invariants (no lookups).
    pub fn validate(&self) -> Result<()> {
        check_name(&self.name)
            .map_err(|e| DomainError::InvalidName(e.message(&FALLBACK)))?;

        match &self.trigger {
            Trigger::Time { time_trigger } => validate_time_trigger(time_trigger)?,
            Trigger::Sensor { sensor_trigger } => validate_sensor_trigger(sensor_trigger)?,
        }

        let action = &self.device_action;
        if action.device_ids.is_empty() {
            return invalid("device action targets no devices");
        }
        let descriptor = device_type_descriptor(action.device_type);
        if let Some(key) = action
            .settings
            .keys()
            .find(|k| k.as_str() != IS_ACTIVE && descriptor.field(k).is_none())
        {
            return Err(DomainError::UnknownSetting {
                device_type: action.device_type.to_string(),
                key: key.clone(),
            });
        }
        Ok(())
    }

    /// Checks ids against the home's devices and sensors.
    pub fn validate_references(&self, devices: &[Device], sensors: &[Sensor]) -> Result<()> {
        for id in &self.device_action.device_ids {
            let device = devices
                .iter()
                .find(|d| &d.id == id)
                .ok_or_else(|| DomainError::InvalidAutomation(format!("unknown device {id}")))?;
            if device.device_type != self.device_action.device_type {
                return invalid(&format!(
                    "device {id} is a {} but the action controls {}",
                    device.device_type, self.device_action.device_type
                ));
            }
        }

        if let Trigger::Sensor { sensor_trigger } = &self.trigger {
            let sensor = sensors
                .iter()
                .find(|s| s.id == sensor_trigger.sensor_id)
                .ok_or_else(|| {
                    DomainError::InvalidAutomation(format!(
                        "unknown sensor {}",
                        sensor_trigger.sensor_id
                    ))
                })?;
            if sensor.sensor_type != sensor_trigger.sensor_type {
                return invalid(&format!(
                    "sensor {} is a {}, not a {}",
                    sensor.id, sensor.sensor_type, sensor_trigger.sensor_type
                ));
            }
        }
        Ok(())
    }
}

fn invalid<T>(reason: &str) -> Result<T> {
    Err(DomainError::InvalidAutomation(reason.to_string()))
}

fn parse_time(label: &str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| DomainError::InvalidAutomation(format!("{label} '{value}' is not HH:MM")))
}

fn validate_time_trigger(trigger: &TimeTrigger) -> Result<()> {
    let start = parse_time("start time", &trigger.start_time)?;
    let end = parse_time("end time", &trigger.end_time)?;
    if start == end {
        return invalid("start and end time are equal");
    }
    match (trigger.is_recurring, trigger.days_of_week.is_empty()) {
        (true, true) => invalid("recurring trigger has no days selected"),
        (false, false) => invalid("non-recurring trigger carries day selection"),
        _ => Ok(()),
    }
}

fn validate_sensor_trigger(trigger: &SensorTrigger) -> Result<()> {
    if trigger.sensor_id.trim().is_empty() {
        return invalid("sensor trigger has no sensor");
    }
    let condition = &trigger.condition;
    if sensor_type_descriptor(trigger.sensor_type)
        .reading(&condition.property)
        .is_none()
    {
        return Err(DomainError::UnsupportedProperty {
            sensor_type: trigger.sensor_type.to_string(),
            property: condition.property.clone(),
        });
    }
    if parse_number(&condition.trigger_value).is_none() {
        return invalid("trigger value is not a number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sensor_rule() -> AutomationRule {
        serde_json::from_value(json!({
            "id": "a-1",
            "name": "Vent on CO",
            "homeId": "h-1",
            "triggerType": "sensor",
            "sensorTrigger": {
                "sensorId": "s-1",
                "sensorType": "gas_sensor",
                "condition": { "property": "currentCarbonMonoxideLevel", "triggerValue": 50, "unit": "ppm" }
            },
            "deviceAction": {
                "deviceType": "ventilation",
                "deviceIds": ["d-1"],
                "settings": { "currentMode": "boost", "currentFanSpeed": 3, "isActive": true }
            }
        }))
        .unwrap()
    }

    fn device(id: &str, device_type: DeviceType) -> Device {
        Device::new(id.into(), "Fan".into(), device_type, "r".into(), "h-1".into(), Map::new())
            .unwrap()
    }

    fn gas_sensor() -> Sensor {
        Sensor::new(
            "s-1".into(),
            "Boiler".into(),
            SensorType::GasSensor,
            "r".into(),
            "h-1".into(),
            Map::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_flattened_trigger_serde() {
        let rule = sensor_rule();
        assert_eq!(rule.trigger.trigger_type(), TriggerType::Sensor);
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["triggerType"], json!("sensor"));
        assert!(value.get("timeTrigger").is_none());
    }

    #[test]
    fn test_valid_sensor_rule() {
        let rule = sensor_rule();
        assert_eq!(rule.validate(), Ok(()));
        assert_eq!(
            rule.validate_references(&[device("d-1", DeviceType::Ventilation)], &[gas_sensor()]),
            Ok(())
        );
    }

    #[test]
    fn test_property_must_match_sensor_type() {
        let mut rule = sensor_rule();
        if let Trigger::Sensor { sensor_trigger } = &mut rule.trigger {
            sensor_trigger.condition.property = "currentLux".into();
        }
        assert!(matches!(
            rule.validate(),
            Err(DomainError::UnsupportedProperty { .. })
        ));
    }

    #[test]
    fn test_devices_must_share_action_type() {
        let rule = sensor_rule();
        let result =
            rule.validate_references(&[device("d-1", DeviceType::AirPurifier)], &[gas_sensor()]);
        assert!(matches!(result, Err(DomainError::InvalidAutomation(_))));

        let missing = rule.validate_references(&[], &[gas_sensor()]);
        assert!(matches!(missing, Err(DomainError::InvalidAutomation(_))));
    }

    #[test]
    fn test_time_trigger_rules() {
        let mut rule = sensor_rule();
        rule.trigger = Trigger::Time {
            time_trigger: TimeTrigger {
                start_time: "08:00".into(),
                end_time: "09:00".into(),
                is_recurring: false,
                days_of_week: [DayOfWeek::Monday].into(),
            },
        };
        assert!(rule.validate().is_err());

        rule.trigger = Trigger::Time {
            time_trigger: TimeTrigger {
                start_time: "8 am".into(),
                end_time: "09:00".into(),
                is_recurring: false,
                days_of_week: BTreeSet::new(),
            },
        };
        assert!(rule.validate().is_err());

        rule.trigger = Trigger::Time {
            time_trigger: TimeTrigger {
                start_time: "08:00".into(),
                end_time: "09:00".into(),
                is_recurring: true,
                days_of_week: [DayOfWeek::Friday].into(),
            },
        };
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn test_time_window_must_not_be_empty() {
        let window = |start: &str, end: &str| Trigger::Time {
            time_trigger: TimeTrigger {
                start_time: start.into(),
                end_time: end.into(),
                is_recurring: false,
                days_of_week: BTreeSet::new(),
            },
        };
        let mut rule = sensor_rule();
        rule.trigger = window("07:00", "07:00");
        assert!(matches!(
            rule.validate(),
            Err(DomainError::InvalidAutomation(_))
        ));

        // Overnight windows wrap past midnight
        rule.trigger = window("22:00", "06:00");
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_foreign_action_setting() {
        let mut rule = sensor_rule();
        rule.device_action.settings.insert("brightness".into(), json!(10));
        assert!(matches!(
            rule.validate(),
            Err(DomainError::UnknownSetting { .. })
        ));
    }
}
