use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use domain::automation::{
    build_automation_trigger, resolve_sensor_trigger_defaults, AutomationRule, DayOfWeek,
    DeviceAction, SensorTrigger, TimeTrigger, Trigger, TriggerCondition, TriggerType,
    TIME_FORMAT,
};
use domain::device::{
    build_device_action_settings, default_inputs, device_type_descriptor, setting_input,
};
use domain::field::{is_empty_value, parse_number};
use domain::sensor::sensor_type_descriptor;
use domain::validation::{
    validate_field, FieldErrors, ValidationContext, ValidationError, DEVICE_TYPE_FIELD,
    NAME_FIELD,
};
use domain::{DeviceType, DomainError, SensorType, Translator};

use super::{record, validate_fields, FormError, FormMode, Submission};

const START_TIME: &str = "startTime";
const END_TIME: &str = "endTime";
const DAYS_OF_WEEK: &str = "daysOfWeek";
const SENSOR_ID: &str = "sensorId";
const PROPERTY: &str = "property";
const TRIGGER_VALUE: &str = "triggerValue";
const DEVICE_IDS: &str = "deviceIds";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AutomationStep {
    General,
    Trigger,
    Action,
}

impl AutomationStep {
    fn next(self) -> Self {
        match self {
            Self::General => Self::Trigger,
            Self::Trigger | Self::Action => Self::Action,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::General | Self::Trigger => Self::General,
            Self::Action => Self::Trigger,
        }
    }
}

/// Everything the automation form has collected so far.
///
/// Both trigger payloads are kept so switching the trigger type back and forth
/// loses nothing; only the selected one is submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationDraft {
    pub name: String,
    pub trigger_type: TriggerType,
    pub time_trigger: TimeTrigger,
    pub sensor_id: String,
    pub sensor_type: Option<SensorType>,
    pub condition: Option<TriggerCondition>,
    pub device_type: Option<DeviceType>,
    pub device_ids: BTreeSet<String>,
    pub settings: Map<String, Value>,
}

impl Default for AutomationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            trigger_type: TriggerType::Time,
            time_trigger: TimeTrigger::default(),
            sensor_id: String::new(),
            sensor_type: None,
            condition: None,
            device_type: None,
            device_ids: BTreeSet::new(),
            settings: Map::new(),
        }
    }
}

/// Three-step automation form: general, trigger, action.
pub struct AutomationWizard {
    translator: Arc<dyn Translator>,
    mode: FormMode,
    home_id: String,
    step: AutomationStep,
    draft: AutomationDraft,
    errors: FieldErrors,
}

impl AutomationWizard {
    pub fn create(translator: Arc<dyn Translator>, home_id: String) -> Self {
        Self {
            translator,
            mode: FormMode::Create,
            home_id,
            step: AutomationStep::General,
            draft: AutomationDraft::default(),
            errors: FieldErrors::new(),
        }
    }

    /// Prefills from a stored rule. The action's device type is locked.
    pub fn edit(translator: Arc<dyn Translator>, rule: &AutomationRule) -> Self {
        let mut draft = AutomationDraft {
            name: rule.name.clone(),
            trigger_type: rule.trigger.trigger_type(),
            device_type: Some(rule.device_action.device_type),
            device_ids: rule.device_action.device_ids.clone(),
            settings: default_inputs(rule.device_action.device_type),
            ..AutomationDraft::default()
        };
        match &rule.trigger {
            Trigger::Time { time_trigger } => draft.time_trigger = time_trigger.clone(),
            Trigger::Sensor { sensor_trigger } => {
                draft.sensor_id = sensor_trigger.sensor_id.clone();
                draft.sensor_type = Some(sensor_trigger.sensor_type);
                draft.condition = Some(sensor_trigger.condition.clone());
            }
        }
        for field in device_type_descriptor(rule.device_action.device_type).fields {
            let stored = rule.device_action.settings.get(field.name);
            if let Some(input) = stored.and_then(|v| setting_input(field, v)) {
                draft.settings.insert(field.name.into(), Value::String(input));
            }
        }

        Self {
            translator,
            mode: FormMode::Edit {
                id: rule.id.clone(),
            },
            home_id: rule.home_id.clone(),
            step: AutomationStep::General,
            draft,
            errors: FieldErrors::new(),
        }
    }

    pub fn step(&self) -> AutomationStep {
        self.step
    }

    pub fn draft(&self) -> &AutomationDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn set_name(&mut self, name: &str) -> String {
        self.draft.name = name.to_string();
        let message = validate_field(
            NAME_FIELD,
            &Value::String(self.draft.name.clone()),
            None,
            &self.context(),
        );
        record(&mut self.errors, NAME_FIELD, message)
    }

    pub fn set_trigger_type(&mut self, trigger_type: TriggerType) {
        self.draft.trigger_type = trigger_type;
    }

    pub fn set_start_time(&mut self, value: &str) -> String {
        self.draft.time_trigger.start_time = value.to_string();
        let message = self.time_message(value).unwrap_or_default();
        record(&mut self.errors, START_TIME, message)
    }

    pub fn set_end_time(&mut self, value: &str) -> String {
        self.draft.time_trigger.end_time = value.to_string();
        let message = self.time_message(value).unwrap_or_default();
        record(&mut self.errors, END_TIME, message)
    }

    pub fn set_recurring(&mut self, recurring: bool) {
        self.draft.time_trigger.is_recurring = recurring;
        if !recurring {
            self.errors.remove(DAYS_OF_WEEK);
        }
    }

    /// Flips one weekday; returns whether it is now selected.
    pub fn toggle_day(&mut self, day: DayOfWeek) -> bool {
        let days = &mut self.draft.time_trigger.days_of_week;
        let selected = if days.remove(&day) {
            false
        } else {
            days.insert(day)
        };
        if !days.is_empty() {
            self.errors.remove(DAYS_OF_WEEK);
        }
        selected
    }

    /// Picks the monitored sensor and resets the condition to that sensor's
    /// defaults. The current property is kept when the new type offers it.
    pub fn select_sensor(
        &mut self,
        sensor_id: &str,
        sensor_type: SensorType,
    ) -> Result<&TriggerCondition, FormError> {
        let descriptor = sensor_type_descriptor(sensor_type);
        let property = self
            .draft
            .condition
            .as_ref()
            .map(|c| c.property.as_str())
            .filter(|p| descriptor.reading(p).is_some())
            .or_else(|| descriptor.readings.first().map(|r| r.property))
            .ok_or_else(|| DomainError::UnsupportedProperty {
                sensor_type: sensor_type.to_string(),
                property: String::new(),
            })?
            .to_string();

        self.draft.sensor_id = sensor_id.to_string();
        self.draft.sensor_type = Some(sensor_type);
        self.errors.remove(SENSOR_ID);
        self.reset_condition(sensor_type, &property)
    }

    /// Picks the monitored property; any value entered before is discarded.
    pub fn select_property(&mut self, property: &str) -> Result<&TriggerCondition, FormError> {
        let Some(sensor_type) = self.draft.sensor_type else {
            let mut errors = FieldErrors::new();
            errors.insert(SENSOR_ID.into(), self.required());
            return Err(FormError::Invalid(errors));
        };
        self.reset_condition(sensor_type, property)
    }

    fn reset_condition(
        &mut self,
        sensor_type: SensorType,
        property: &str,
    ) -> Result<&TriggerCondition, FormError> {
        let defaults =
            resolve_sensor_trigger_defaults(sensor_type, property, self.translator.as_ref())?;
        debug!(
            sensor_type = %sensor_type,
            property,
            default_value = %defaults.default_value,
            "Trigger condition reset to defaults"
        );
        self.errors.remove(PROPERTY);
        self.errors.remove(TRIGGER_VALUE);
        Ok(self.draft.condition.insert(defaults.to_condition()))
    }

    pub fn set_trigger_value(&mut self, value: Value) -> Result<String, FormError> {
        let Some(condition) = self.draft.condition.as_mut() else {
            let mut errors = FieldErrors::new();
            errors.insert(PROPERTY.into(), self.required());
            return Err(FormError::Invalid(errors));
        };
        condition.trigger_value = value;
        let message = self.trigger_value_message().unwrap_or_default();
        Ok(record(&mut self.errors, TRIGGER_VALUE, message))
    }

    /// Picks the action's device type, clearing selected devices and settings.
    pub fn select_device_type(&mut self, device_type: DeviceType) -> Result<(), FormError> {
        if self.draft.device_type == Some(device_type) {
            return Ok(());
        }
        if self.is_editing() {
            return Err(FormError::Locked(DEVICE_TYPE_FIELD));
        }
        debug!(from = ?self.draft.device_type, to = %device_type, "Action device type changed");
        if let Some(previous) = self.draft.device_type {
            for name in device_type_descriptor(previous).field_names() {
                self.errors.remove(name);
            }
        }
        self.errors.remove(DEVICE_TYPE_FIELD);
        self.errors.remove(DEVICE_IDS);

        self.draft.device_type = Some(device_type);
        self.draft.device_ids.clear();
        self.draft.settings = default_inputs(device_type);
        Ok(())
    }

    /// Adds or removes a target device; returns whether it is now selected.
    pub fn toggle_device(&mut self, device_id: &str) -> bool {
        let ids = &mut self.draft.device_ids;
        let selected = if ids.remove(device_id) {
            false
        } else {
            ids.insert(device_id.to_string())
        };
        if !ids.is_empty() {
            self.errors.remove(DEVICE_IDS);
        }
        selected
    }

    pub fn set_setting(&mut self, field: &str, value: Value) -> Result<String, FormError> {
        let Some(device_type) = self.draft.device_type else {
            let mut errors = FieldErrors::new();
            errors.insert(DEVICE_TYPE_FIELD.into(), self.required());
            return Err(FormError::Invalid(errors));
        };
        if device_type_descriptor(device_type).field(field).is_none() {
            return Err(DomainError::UnknownSetting {
                device_type: device_type.to_string(),
                key: field.to_string(),
            }
            .into());
        }
        let message = validate_field(field, &value, None, &self.context());
        self.draft.settings.insert(field.to_string(), value);
        Ok(record(&mut self.errors, field, message))
    }

    pub fn next(&mut self) -> Result<AutomationStep, FormError> {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            debug!(step = ?self.step, failed = errors.len(), "Automation step rejected");
            self.errors.extend(errors.clone());
            return Err(FormError::Invalid(errors));
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> AutomationStep {
        self.step = self.step.previous();
        self.step
    }

    /// Re-validates all three steps and builds the normalized rule.
    pub fn submit(&mut self) -> Result<Submission<AutomationRule, AutomationRule>, FormError> {
        let mut errors = FieldErrors::new();
        for step in [
            AutomationStep::General,
            AutomationStep::Trigger,
            AutomationStep::Action,
        ] {
            errors.extend(self.validate_step(step));
        }
        if !errors.is_empty() {
            debug!(failed = errors.len(), "Automation submit rejected");
            self.errors = errors.clone();
            return Err(FormError::Invalid(errors));
        }

        let rule = self.build_rule()?;
        rule.validate()?;
        info!(
            trigger_type = ?rule.trigger.trigger_type(),
            devices = rule.device_action.device_ids.len(),
            editing = self.is_editing(),
            "Automation form submitted"
        );
        Ok(self.mode.submission(|| rule.clone(), || rule.clone()))
    }

    fn build_rule(&self) -> Result<AutomationRule, FormError> {
        let draft = &self.draft;
        let trigger = match draft.trigger_type {
            TriggerType::Time => Trigger::Time {
                time_trigger: draft.time_trigger.clone(),
            },
            TriggerType::Sensor => {
                let (Some(sensor_type), Some(condition)) = (draft.sensor_type, &draft.condition)
                else {
                    return Err(FormError::Invalid(self.validate_step(AutomationStep::Trigger)));
                };
                Trigger::Sensor {
                    sensor_trigger: SensorTrigger {
                        sensor_id: draft.sensor_id.trim().to_string(),
                        sensor_type,
                        condition: condition.clone(),
                    },
                }
            }
        };
        let Some(device_type) = draft.device_type else {
            return Err(FormError::Invalid(self.validate_step(AutomationStep::Action)));
        };

        let id = match &self.mode {
            FormMode::Create => String::new(),
            FormMode::Edit { id } => id.clone(),
        };
        Ok(AutomationRule {
            id,
            name: draft.name.trim().to_string(),
            home_id: self.home_id.clone(),
            trigger: build_automation_trigger(&trigger),
            device_action: DeviceAction {
                device_type,
                device_ids: draft.device_ids.clone(),
                settings: build_device_action_settings(device_type.as_str(), &draft.settings),
            },
        })
    }

    fn validate_step(&self, step: AutomationStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let draft = &self.draft;
        match step {
            AutomationStep::General => {
                let name = Value::String(draft.name.clone());
                let message = validate_field(NAME_FIELD, &name, None, &self.context());
                record(&mut errors, NAME_FIELD, message);
            }
            AutomationStep::Trigger => match draft.trigger_type {
                TriggerType::Time => self.validate_time(&mut errors),
                TriggerType::Sensor => {
                    if draft.sensor_id.trim().is_empty() || draft.sensor_type.is_none() {
                        errors.insert(SENSOR_ID.into(), self.required());
                    }
                    if draft.condition.is_none() {
                        errors.insert(PROPERTY.into(), self.required());
                    } else if let Some(message) = self.trigger_value_message() {
                        errors.insert(TRIGGER_VALUE.into(), message);
                    }
                }
            },
            AutomationStep::Action => match draft.device_type {
                None => {
                    errors.insert(DEVICE_TYPE_FIELD.into(), self.required());
                }
                Some(device_type) => {
                    if draft.device_ids.is_empty() {
                        errors.insert(DEVICE_IDS.into(), self.required());
                    }
                    errors.extend(validate_fields(
                        device_type_descriptor(device_type).field_names(),
                        &draft.settings,
                        &self.context(),
                    ));
                }
            },
        }
        errors
    }

    fn validate_time(&self, errors: &mut FieldErrors) {
        let window = &self.draft.time_trigger;
        let start = self.time_message(&window.start_time);
        let end = self.time_message(&window.end_time);
        if let Some(message) = &start {
            errors.insert(START_TIME.into(), message.clone());
        }
        if let Some(message) = &end {
            errors.insert(END_TIME.into(), message.clone());
        }
        if start.is_none() && end.is_none() && window.start_time.trim() == window.end_time.trim() {
            errors.insert(
                END_TIME.into(),
                ValidationError::InvalidValue.message(self.translator.as_ref()),
            );
        }
        if window.is_recurring && window.days_of_week.is_empty() {
            errors.insert(DAYS_OF_WEEK.into(), self.required());
        }
    }

    fn time_message(&self, value: &str) -> Option<String> {
        let error = if value.trim().is_empty() {
            ValidationError::Required
        } else if NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).is_err() {
            ValidationError::Format
        } else {
            return None;
        };
        Some(error.message(self.translator.as_ref()))
    }

    fn trigger_value_message(&self) -> Option<String> {
        let value = &self.draft.condition.as_ref()?.trigger_value;
        let error = if is_empty_value(value) {
            ValidationError::Required
        } else if parse_number(value).is_none() {
            ValidationError::Format
        } else {
            return None;
        };
        Some(error.message(self.translator.as_ref()))
    }

    fn required(&self) -> String {
        ValidationError::Required.message(self.translator.as_ref())
    }

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext::new(self.translator.as_ref()).with_device_type(self.draft.device_type)
    }
}
