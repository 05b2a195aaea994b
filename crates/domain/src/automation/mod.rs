mod rule;
mod trigger;

pub use rule::{
    AutomationRule, DayOfWeek, DeviceAction, SensorTrigger, TimeTrigger, Trigger,
    TriggerCondition, TriggerType, TIME_FORMAT,
};
pub use trigger::{
    build_automation_trigger, resolve_sensor_trigger_defaults, trigger_properties,
    TriggerDefaults,
};
