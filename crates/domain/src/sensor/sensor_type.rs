use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// The fixed set of sensor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    TemperatureSensor,
    HumiditySensor,
    MotionSensor,
    SmokeSensor,
    GasSensor,
    WaterLeakSensor,
    LightSensor,
    AirQualitySensor,
    PowerSensor,
    WeatherSensor,
}

impl SensorType {
    pub const ALL: [SensorType; 10] = [
        Self::TemperatureSensor,
        Self::HumiditySensor,
        Self::MotionSensor,
        Self::SmokeSensor,
        Self::GasSensor,
        Self::WaterLeakSensor,
        Self::LightSensor,
        Self::AirQualitySensor,
        Self::PowerSensor,
        Self::WeatherSensor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemperatureSensor => "temperature_sensor",
            Self::HumiditySensor => "humidity_sensor",
            Self::MotionSensor => "motion_sensor",
            Self::SmokeSensor => "smoke_sensor",
            Self::GasSensor => "gas_sensor",
            Self::WaterLeakSensor => "water_leak_sensor",
            Self::LightSensor => "light_sensor",
            Self::AirQualitySensor => "air_quality_sensor",
            Self::PowerSensor => "power_sensor",
            Self::WeatherSensor => "weather_sensor",
        }
    }
}

impl FromStr for SensorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownSensorType(s.to_string()))
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
