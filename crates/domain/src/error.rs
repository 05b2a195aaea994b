use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Unknown sensor type: {0}")]
    UnknownSensorType(String),

    #[error("Threshold {field} is not defined for sensor type {sensor_type}")]
    ThresholdNotFound { sensor_type: String, field: String },

    #[error("Property {property} cannot trigger automations for sensor type {sensor_type}")]
    UnsupportedProperty {
        sensor_type: String,
        property: String,
    },

    #[error("Setting {key} is not defined for device type {device_type}")]
    UnknownSetting { device_type: String, key: String },

    #[error("Threshold field {key} is not defined for sensor type {sensor_type}")]
    UnknownThreshold { sensor_type: String, key: String },

    #[error("Device type cannot change after creation ({from} -> {to})")]
    DeviceTypeImmutable { from: String, to: String },

    #[error("Invalid automation rule: {0}")]
    InvalidAutomation(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

impl DomainError {
    /// True for lookups of a device/sensor type key outside the fixed set.
    /// Such keys mean corrupted input, never a transient failure.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, Self::UnknownDeviceType(_) | Self::UnknownSensorType(_))
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
