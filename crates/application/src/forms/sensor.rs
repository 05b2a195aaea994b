use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use domain::field::{number_value, parse_number};
use domain::sensor::{default_thresholds, sensor_type_descriptor, THRESHOLD_PREFIX};
use domain::validation::{
    validate_field, FieldErrors, ValidationContext, NAME_FIELD, SENSOR_TYPE_FIELD,
};
use domain::{Sensor, SensorType, Translator};

use super::{
    record, text, validate_fields, validate_room, FormError, FormMode, Submission, ROOM_FIELD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorStep {
    Basics,
    Thresholds,
}

/// Create payload for `POST /sensors`; thresholds sit flat next to the identity fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSensor {
    pub name: String,
    pub sensor_type: SensorType,
    pub room_id: String,
    pub home_id: String,
    #[serde(flatten)]
    pub thresholds: Map<String, Value>,
}

/// Update payload; the sensor type is not editable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorUpdate {
    pub name: String,
    pub room_id: String,
    #[serde(flatten)]
    pub thresholds: Map<String, Value>,
}

/// Two-step sensor form: name, type and room, then the dangerous thresholds.
pub struct SensorWizard {
    translator: Arc<dyn Translator>,
    mode: FormMode,
    home_id: String,
    step: SensorStep,
    values: Map<String, Value>,
    errors: FieldErrors,
}

impl SensorWizard {
    pub fn create(
        translator: Arc<dyn Translator>,
        home_id: String,
        room_id: Option<String>,
    ) -> Self {
        let mut values = Map::new();
        values.insert(NAME_FIELD.into(), Value::String(String::new()));
        values.insert(SENSOR_TYPE_FIELD.into(), Value::String(String::new()));
        values.insert(ROOM_FIELD.into(), Value::String(room_id.unwrap_or_default()));
        Self {
            translator,
            mode: FormMode::Create,
            home_id,
            step: SensorStep::Basics,
            values,
            errors: FieldErrors::new(),
        }
    }

    /// Prefills from a stored sensor; thresholds it lacks take table defaults.
    pub fn edit(translator: Arc<dyn Translator>, sensor: &Sensor) -> Self {
        let mut values = default_thresholds(sensor.sensor_type);
        for name in sensor_type_descriptor(sensor.sensor_type).threshold_fields().map(|f| f.name) {
            if let Some(current) = sensor.values.get(name) {
                values.insert(name.into(), current.clone());
            }
        }
        values.insert(NAME_FIELD.into(), Value::String(sensor.name.clone()));
        values.insert(
            SENSOR_TYPE_FIELD.into(),
            Value::String(sensor.sensor_type.as_str().into()),
        );
        values.insert(ROOM_FIELD.into(), Value::String(sensor.room_id.clone()));

        Self {
            translator,
            mode: FormMode::Edit {
                id: sensor.id.clone(),
            },
            home_id: sensor.home_id.clone(),
            step: SensorStep::Basics,
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn step(&self) -> SensorStep {
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

    pub fn sensor_type(&self) -> Option<SensorType> {
        text(&self.values, SENSOR_TYPE_FIELD).parse().ok()
    }

    /// Updates one input and returns its inline message (`""` when valid).
    ///
    /// Choosing another sensor type drops every threshold of the previous type
    /// and loads the new type's table defaults.
    pub fn set(&mut self, field: &str, value: Value) -> Result<String, FormError> {
        if field == SENSOR_TYPE_FIELD {
            self.change_type(&value)?;
        }
        self.values.insert(field.to_string(), value);

        let ctx = self.context();
        let message = if field == ROOM_FIELD {
            let mut errors = FieldErrors::new();
            validate_room(&self.values, &ctx, &mut errors);
            errors.remove(ROOM_FIELD).unwrap_or_default()
        } else {
            let value = self.values.get(field).unwrap_or(&Value::Null);
            validate_field(field, value, None, &ctx)
        };
        Ok(record(&mut self.errors, field, message))
    }

    fn change_type(&mut self, value: &Value) -> Result<(), FormError> {
        let previous = self.sensor_type();
        let next = value.as_str().and_then(|s| s.trim().parse::<SensorType>().ok());
        if previous == next {
            return Ok(());
        }
        if self.is_editing() {
            return Err(FormError::Locked(SENSOR_TYPE_FIELD));
        }

        self.values.retain(|k, _| !k.starts_with(THRESHOLD_PREFIX));
        self.errors.retain(|k, _| !k.starts_with(THRESHOLD_PREFIX));
        if let Some(next) = next {
            self.values.extend(default_thresholds(next));
        }
        debug!(from = ?previous, to = ?next, "Sensor type changed, thresholds reset");
        Ok(())
    }

    pub fn next(&mut self) -> Result<SensorStep, FormError> {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            debug!(step = ?self.step, failed = errors.len(), "Sensor step rejected");
            self.errors.extend(errors.clone());
            return Err(FormError::Invalid(errors));
        }
        self.step = SensorStep::Thresholds;
        Ok(self.step)
    }

    pub fn back(&mut self) -> SensorStep {
        self.step = SensorStep::Basics;
        self.step
    }

    pub fn submit(&mut self) -> Result<Submission<NewSensor, SensorUpdate>, FormError> {
        let mut errors = self.validate_step(SensorStep::Basics);
        errors.extend(self.validate_step(SensorStep::Thresholds));
        if !errors.is_empty() {
            debug!(failed = errors.len(), "Sensor form submit rejected");
            self.errors = errors.clone();
            return Err(FormError::Invalid(errors));
        }

        let Some(sensor_type) = self.sensor_type() else {
            return Err(FormError::Invalid(self.errors.clone()));
        };
        let thresholds = self.thresholds(sensor_type);
        let name = text(&self.values, NAME_FIELD);
        let room_id = text(&self.values, ROOM_FIELD);

        info!(sensor_type = %sensor_type, editing = self.is_editing(), "Sensor form submitted");
        Ok(self.mode.submission(
            || NewSensor {
                name: name.clone(),
                sensor_type,
                room_id: room_id.clone(),
                home_id: self.home_id.clone(),
                thresholds: thresholds.clone(),
            },
            || SensorUpdate {
                name: name.clone(),
                room_id: room_id.clone(),
                thresholds: thresholds.clone(),
            },
        ))
    }

    fn thresholds(&self, sensor_type: SensorType) -> Map<String, Value> {
        sensor_type_descriptor(sensor_type)
            .threshold_fields()
            .filter_map(|f| {
                let value = self.values.get(f.name).and_then(parse_number)?;
                Some((f.name.to_string(), number_value(value)))
            })
            .collect()
    }

    fn validate_step(&self, step: SensorStep) -> FieldErrors {
        let ctx = self.context();
        match step {
            SensorStep::Basics => {
                let mut errors =
                    validate_fields([NAME_FIELD, SENSOR_TYPE_FIELD], &self.values, &ctx);
                validate_room(&self.values, &ctx, &mut errors);
                errors
            }
            SensorStep::Thresholds => {
                // Includes stale thresholds, which the validator rejects
                let names = self
                    .values
                    .keys()
                    .filter(|k| k.starts_with(THRESHOLD_PREFIX))
                    .map(String::as_str);
                let mut errors = validate_fields(names, &self.values, &ctx);
                if let Some(sensor_type) = self.sensor_type() {
                    let missing = sensor_type_descriptor(sensor_type)
                        .threshold_fields()
                        .map(|f| f.name)
                        .filter(|name| !self.values.contains_key(*name));
                    errors.extend(validate_fields(missing, &self.values, &ctx));
                }
                errors
            }
        }
    }

    fn context(&self) -> ValidationContext<'_> {
        ValidationContext::new(self.translator.as_ref()).with_sensor_type(self.sensor_type())
    }
}
