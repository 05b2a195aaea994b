use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::registry::sensor_type_descriptor;
use super::SensorType;
use crate::error::{DomainError, Result};
use crate::field::{number_value, parse_number};

pub const THRESHOLD_PREFIX: &str = "dangerous";

/// A sensor with its live `current*` readings and `dangerous*` thresholds.
///
/// Reading and threshold fields sit flat next to the identity fields, the way
/// the API returns them. Deserializing goes through [`Sensor::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SensorRecord")]
pub struct Sensor {
    pub id: String,
    pub name: String,
    pub sensor_type: SensorType,
    pub room_id: String,
    pub home_id: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SensorRecord {
    id: String,
    name: String,
    sensor_type: SensorType,
    room_id: String,
    home_id: String,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl TryFrom<SensorRecord> for Sensor {
    type Error = DomainError;

    fn try_from(record: SensorRecord) -> Result<Self> {
        let mut sensor = Sensor::new(
            record.id,
            record.name,
            record.sensor_type,
            record.room_id,
            record.home_id,
            record.values,
        )?;
        sensor.is_active = record.is_active;
        Ok(sensor)
    }
}

impl Sensor {
    pub fn new(
        id: String,
        name: String,
        sensor_type: SensorType,
        room_id: String,
        home_id: String,
        values: Map<String, Value>,
    ) -> Result<Self> {
        check_threshold_keys(sensor_type, values.keys())?;
        Ok(Self {
            id,
            name,
            sensor_type,
            room_id,
            home_id,
            is_active: true,
            values,
        })
    }

    /// Numeric value of a reading or threshold, if present and parseable
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(parse_number)
    }

    /// Returns a copy with the given thresholds replaced. Only `dangerous*`
    /// fields of this sensor type are accepted.
    pub fn with_thresholds(&self, thresholds: &Map<String, Value>) -> Result<Self> {
        let descriptor = sensor_type_descriptor(self.sensor_type);
        if let Some(key) = thresholds.keys().find(|k| descriptor.threshold(k).is_none()) {
            return Err(DomainError::UnknownThreshold {
                sensor_type: self.sensor_type.to_string(),
                key: key.clone(),
            });
        }

        let mut values = self.values.clone();
        values.extend(thresholds.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Self {
            values,
            ..self.clone()
        })
    }

    /// Readings whose thresholds are currently exceeded
    pub fn dangerous_readings(&self) -> Vec<&'static str> {
        super::danger::dangerous_readings(self.sensor_type, &self.values)
    }

    pub fn is_dangerous(&self) -> bool {
        super::danger::is_dangerous(self)
    }
}

/// Threshold fields of `sensor_type` filled with table defaults
pub fn default_thresholds(sensor_type: SensorType) -> Map<String, Value> {
    sensor_type_descriptor(sensor_type)
        .thresholds
        .iter()
        .map(|t| (t.name().to_string(), number_value(t.default_value())))
        .collect()
}

fn check_threshold_keys<'a>(
    sensor_type: SensorType,
    mut keys: impl Iterator<Item = &'a String>,
) -> Result<()> {
    let descriptor = sensor_type_descriptor(sensor_type);
    match keys.find(|k| k.starts_with(THRESHOLD_PREFIX) && descriptor.threshold(k).is_none()) {
        Some(key) => Err(DomainError::UnknownThreshold {
            sensor_type: sensor_type.to_string(),
            key: key.clone(),
        }),
        None => Ok(()),
    }
}
