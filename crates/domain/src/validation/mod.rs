//! Field validation.
//!
//! Validators never fail: the outcome is an error value (or a localized
//! message, `""` meaning valid) so callers can render it inline.

mod error;
mod form;
mod validator;

pub use error::{ErrorKind, ValidationError};
pub use form::{validate_form, FieldErrors};
pub use validator::{
    check_field, check_name, validate_field, ValidationContext, DEVICE_TYPE_FIELD, NAME_FIELD,
    NAME_MAX_LEN, NAME_MIN_LEN, SENSOR_TYPE_FIELD,
};
