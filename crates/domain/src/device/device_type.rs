use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// The fixed set of controllable device kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    SmartPlug,
    Thermostat,
    HeatingValve,
    SmartLock,
    Gate,
    IrrigationSystem,
    Ventilation,
    AirPurifier,
    Camera,
    SmartLight,
}

impl DeviceType {
    /// Display order used by type pickers
    pub const ALL: [DeviceType; 10] = [
        Self::SmartPlug,
        Self::Thermostat,
        Self::HeatingValve,
        Self::SmartLock,
        Self::Gate,
        Self::IrrigationSystem,
        Self::Ventilation,
        Self::AirPurifier,
        Self::Camera,
        Self::SmartLight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SmartPlug => "smart_plug",
            Self::Thermostat => "thermostat",
            Self::HeatingValve => "heating_valve",
            Self::SmartLock => "smart_lock",
            Self::Gate => "gate",
            Self::IrrigationSystem => "irrigation_system",
            Self::Ventilation => "ventilation",
            Self::AirPurifier => "air_purifier",
            Self::Camera => "camera",
            Self::SmartLight => "smart_light",
        }
    }
}

impl FromStr for DeviceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::UnknownDeviceType(s.to_string()))
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
