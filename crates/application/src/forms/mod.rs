//! Headless form workflows.
//!
//! Each wizard owns its draft values, validates the active step on `next()`
//! and re-validates every step on `submit()`. Submission yields the payload
//! the REST API expects; nothing here performs I/O.

mod automation;
mod device;
mod error;
mod sensor;

pub use automation::{AutomationDraft, AutomationStep, AutomationWizard};
pub use device::{DeviceStep, DeviceWizard, NewDevice};
pub use error::FormError;
pub use sensor::{NewSensor, SensorStep, SensorUpdate, SensorWizard};

use serde::Serialize;
use serde_json::{Map, Value};

use domain::field::is_empty_value;
use domain::validation::{validate_field, FieldErrors, ValidationContext, ValidationError};

pub const ROOM_FIELD: &str = "roomId";

/// What a wizard hands to the API once every step is valid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Submission<C, U> {
    Create { payload: C },
    Update { id: String, payload: U },
}

/// Whether a wizard creates a new entity or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    fn submission<C, U>(
        &self,
        create: impl FnOnce() -> C,
        update: impl FnOnce() -> U,
    ) -> Submission<C, U> {
        match self {
            Self::Create => Submission::Create { payload: create() },
            Self::Edit { id } => Submission::Update {
                id: id.clone(),
                payload: update(),
            },
        }
    }
}

/// Runs the field validator over `names`, reading each value from `values`.
pub(crate) fn validate_fields<'n>(
    names: impl IntoIterator<Item = &'n str>,
    values: &Map<String, Value>,
    ctx: &ValidationContext<'_>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for name in names {
        let value = values.get(name).unwrap_or(&Value::Null);
        let message = validate_field(name, value, None, ctx);
        if !message.is_empty() {
            errors.insert(name.to_string(), message);
        }
    }
    errors
}

/// Room selection has no FieldSpec; it is only required.
pub(crate) fn validate_room(
    values: &Map<String, Value>,
    ctx: &ValidationContext<'_>,
    errors: &mut FieldErrors,
) {
    let empty = values.get(ROOM_FIELD).is_none_or(is_empty_value);
    if empty {
        errors.insert(
            ROOM_FIELD.to_string(),
            ValidationError::Required.message(ctx.translator),
        );
    }
}

/// Stores the inline message for `name`, clearing it when valid.
pub(crate) fn record(errors: &mut FieldErrors, name: &str, message: String) -> String {
    if message.is_empty() {
        errors.remove(name);
    } else {
        errors.insert(name.to_string(), message.clone());
    }
    message
}

pub(crate) fn text(values: &Map<String, Value>, name: &str) -> String {
    values
        .get(name)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
