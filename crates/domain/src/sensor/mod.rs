mod danger;
mod entity;
mod registry;
mod sensor_type;

pub use danger::{dangerous_readings, dangerous_readings_value, is_dangerous, is_dangerous_value};
pub use entity::{default_thresholds, Sensor, THRESHOLD_PREFIX};
pub use registry::{
    get_default_threshold, get_sensor_type_descriptor, list_sensor_types, sensor_type_descriptor,
    Direction, LocalizedReading, LocalizedSensorType, Reading, SensorTypeDescriptor, Threshold,
    ThresholdDefault, TriggerDefault,
};
pub use sensor_type::SensorType;
