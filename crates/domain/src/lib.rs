//! Domain layer - device, sensor and automation rules with no I/O
//!
//! This crate contains:
//! - Type registry (device and sensor descriptors, field specs)
//! - Dangerous-threshold table
//! - Field validator
//! - Payload builders (device action settings, automation triggers)
//! - Danger evaluator
//! - Entities (Device, Sensor, AutomationRule, Home, Room)
//!
//! Principles:
//! - Static tables, read-only after startup
//! - Labels resolved through an injected `Translator`
//! - Validators return values, they never fail

pub mod automation;
pub mod device;
pub mod error;
pub mod field;
pub mod home;
pub mod i18n;
pub mod sensor;
pub mod unit;
pub mod validation;

// Re-export commonly used types
pub use automation::{AutomationRule, Trigger, TriggerType};
pub use device::{Device, DeviceType};
pub use error::{DomainError, Result};
pub use field::{FieldSpec, TypeOption};
pub use i18n::{FallbackTranslator, Translator};
pub use sensor::{Sensor, SensorType};
pub use validation::{validate_field, ValidationContext, ValidationError};
