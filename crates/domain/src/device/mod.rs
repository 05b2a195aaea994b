mod device_type;
mod entity;
mod registry;
mod settings;

pub use device_type::DeviceType;
pub use entity::{Device, DeviceUpdate};
pub use registry::{
    device_type_descriptor, get_device_type_descriptor, list_device_types, DeviceTypeDescriptor,
    LocalizedDeviceType,
};
pub use settings::{
    build_device_action_settings, default_inputs, default_settings, setting_input, IS_ACTIVE,
};
