use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use domain::device::{
    build_device_action_settings, default_inputs, device_type_descriptor, setting_input,
    DeviceUpdate, IS_ACTIVE,
};
use domain::validation::{
    validate_field, FieldErrors, ValidationContext, DEVICE_TYPE_FIELD, NAME_FIELD,
};
use domain::{Device, DeviceType, Translator};

use super::{
    record, text, validate_fields, validate_room, FormError, FormMode, Submission, ROOM_FIELD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceStep {
    Basics,
    Settings,
}

/// Create payload for `POST /devices`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub name: String,
    pub device_type: DeviceType,
    pub room_id: String,
    pub home_id: String,
    pub settings: Map<String, Value>,
}

/// Two-step device form: name, type and room first, then the type's settings.
pub struct DeviceWizard {
    translator: Arc<dyn Translator>,
    mode: FormMode,
    home_id: String,
    step: DeviceStep,
    values: Map<String, Value>,
    errors: FieldErrors,
}

impl DeviceWizard {
    pub fn create(
        translator: Arc<dyn Translator>,
        home_id: String,
        room_id: Option<String>,
    ) -> Self {
        let mut values = Map::new();
        values.insert(NAME_FIELD.into(), Value::String(String::new()));
        values.insert(DEVICE_TYPE_FIELD.into(), Value::String(String::new()));
        values.insert(ROOM_FIELD.into(), Value::String(room_id.unwrap_or_default()));
        Self {
            translator,
            mode: FormMode::Create,
            home_id,
            step: DeviceStep::Basics,
            values,
            errors: FieldErrors::new(),
        }
    }

    /// Prefills the form from a stored device. Its type is locked.
    pub fn edit(translator: Arc<dyn Translator>, device: &Device) -> Self {
        let mut values = Map::new();
        values.insert(NAME_FIELD.into(), Value::String(device.name.clone()));
        values.insert(
            DEVICE_TYPE_FIELD.into(),
            Value::String(device.device_type.as_str().into()),
        );
        values.insert(ROOM_FIELD.into(), Value::String(device.room_id.clone()));
        values.insert(IS_ACTIVE.into(), Value::Bool(device.is_active));

        for field in device_type_descriptor(device.device_type).fields {
            let input = device
                .settings
                .get(field.name)
                .and_then(|v| setting_input(field, v))
                .or_else(|| field.default_input());
            if let Some(input) = input {
                values.insert(field.name.into(), Value::String(input));
            }
        }

        Self {
            translator,
            mode: FormMode::Edit {
                id: device.id.clone(),
            },
            home_id: device.home_id.clone(),
            step: DeviceStep::Basics,
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn step(&self) -> DeviceStep {
        self.step
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn device_type(&self) -> Option<DeviceType> {
        text(&self.values, DEVICE_TYPE_FIELD).parse().ok()
    }

    /// Updates one input and returns its inline message (`""` when valid).
    ///
    /// Choosing another device type replaces the settings inputs with the new
    /// type's defaults.
    pub fn set(&mut self, field: &str, value: Value) -> Result<String, FormError> {
        if field == DEVICE_TYPE_FIELD {
            self.change_type(&value)?;
        }
        self.values.insert(field.to_string(), value);

        let ctx = self.context();
        let value = self.values.get(field).unwrap_or(&Value::Null);
        let message = if field == ROOM_FIELD {
            let mut errors = FieldErrors::new();
            validate_room(&self.values, &ctx, &mut errors);
            errors.remove(ROOM_FIELD).unwrap_or_default()
        } else {
            validate_field(field, value, None, &ctx)
        };
        Ok(record(&mut self.errors, field, message))
    }

    fn change_type(&mut self, value: &Value) -> Result<(), FormError> {
        let previous = self.device_type();
        let next = value.as_str().and_then(|s| s.trim().parse::<DeviceType>().ok());
        if previous == next {
            return Ok(());
        }
        if self.is_editing() {
            return Err(FormError::Locked(DEVICE_TYPE_FIELD));
        }

        if let Some(previous) = previous {
            for name in device_type_descriptor(previous).field_names() {
                self.values.remove(name);
                self.errors.remove(name);
            }
        }
        if let Some(next) = next {
            self.values.extend(default_inputs(next));
        }
        debug!(from = ?previous, to = ?next, "Device type changed, settings reset");
        Ok(())
    }

    /// Validates the active step and moves forward when it passes.
    pub fn next(&mut self) -> Result<DeviceStep, FormError> {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            debug!(step = ?self.step, failed = errors.len(), "Device step rejected");
            self.errors.extend(errors.clone());
            return Err(FormError::Invalid(errors));
        }
        self.step = DeviceStep::Settings;
        Ok(self.step)
    }

    pub fn back(&mut self) -> DeviceStep {
        self.step = DeviceStep::Basics;
        self.step
    }

    /// Re-validates both steps and builds the create or update payload.
    pub fn submit(&mut self) -> Result<Submission<NewDevice, DeviceUpdate>, FormError> {
        let mut errors = self.validate_step(DeviceStep::Basics);
        errors.extend(self.validate_step(DeviceStep::Settings));
        if !errors.is_empty() {
            debug!(failed = errors.len(), "Device form submit rejected");
            self.errors = errors.clone();
            return Err(FormError::Invalid(errors));
        }

        let Some(device_type) = self.device_type() else {
            return Err(FormError::Invalid(self.errors.clone()));
        };
        let settings = self.settings(device_type);
        let name = text(&self.values, NAME_FIELD);
        let room_id = text(&self.values, ROOM_FIELD);

        info!(device_type = %device_type, editing = self.is_editing(), "Device form submitted");
        Ok(self.mode.submission(
            || NewDevice {
                name: name.clone(),
                device_type,
                room_id: room_id.clone(),
                home_id: self.home_id.clone(),
                settings: settings.clone(),
            },
            || {
                let mut settings = settings.clone();
                settings.remove(IS_ACTIVE);
                DeviceUpdate {
                    name: Some(name.clone()),
                    device_type: None,
                    room_id: Some(room_id.clone()),
                    is_active: self.values.get(IS_ACTIVE).and_then(Value::as_bool),
                    settings,
                }
            },
        ))
    }

    fn settings(&self, device_type: DeviceType) -> Map<String, Value> {
        let mut settings = build_device_action_settings(device_type.as_str(), &self.values);
        if let Some(active) = self.values.get(IS_ACTIVE).and_then(Value::as_bool) {
            settings.insert(IS_ACTIVE.into(), Value::Bool(active));
        }
        settings
    }

    fn validate_step(&self, step: DeviceStep) -> FieldErrors {
        let ctx = self.context();
        match step {
            DeviceStep::Basics => {
                let mut errors =
                    validate_fields([NAME_FIELD, DEVICE_TYPE_FIELD], &self.values, &ctx);
                validate_room(&self.values, &ctx, &mut errors);
                errors
            }
            DeviceStep::Settings => match self.device_type() {
                Some(device_type) => validate_fields(
                    device_type_descriptor(device_type).field_names(),
                    &self.values,
                    &ctx,
                ),
                None => FieldErrors::new(),
            },
        }
    }

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext::new(self.translator.as_ref()).with_device_type(self.device_type())
    }
}
