use serde::Serialize;

use crate::field::{format_number, NumericRange};
use crate::i18n::{translate_with, Translator};

/// Coarse class of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Required,
    Format,
    Range,
    InvalidValue,
}

/// Why a single field value was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    /// A mandatory field is empty
    Required,
    /// Not parseable as the expected type
    Format,
    /// Numeric value outside its allowed interval
    Range { range: NumericRange },
    /// Text length outside `[min, max]` characters
    Length { min: usize, max: usize },
    /// Not one of the allowed values
    InvalidValue,
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Required => ErrorKind::Required,
            Self::Format => ErrorKind::Format,
            Self::Range { .. } | Self::Length { .. } => ErrorKind::Range,
            Self::InvalidValue => ErrorKind::InvalidValue,
        }
    }

    /// Human-readable message in the translator's locale
    pub fn message(&self, t: &dyn Translator) -> String {
        match self {
            Self::Required => t.translate("validation.required", "Обязательное поле"),
            Self::Format => t.translate("validation.number", "Введите корректное число"),
            Self::InvalidValue => t.translate("validation.invalidValue", "Недопустимое значение"),
            Self::Length { min, max } => translate_with(
                t,
                "validation.length",
                "Длина должна быть от {min} до {max} символов",
                &[("min", min.to_string()), ("max", max.to_string())],
            ),
            Self::Range { range } => range_message(range, t),
        }
    }
}

fn range_message(range: &NumericRange, t: &dyn Translator) -> String {
    match (range.min, range.max) {
        (Some(min), Some(max)) => translate_with(
            t,
            "validation.between",
            "Значение должно быть от {min} до {max}",
            &[("min", format_number(min)), ("max", format_number(max))],
        ),
        (Some(min), None) if range.min_exclusive => translate_with(
            t,
            "validation.greaterThan",
            "Значение должно быть больше {min}",
            &[("min", format_number(min))],
        ),
        (Some(min), None) => translate_with(
            t,
            "validation.atLeast",
            "Значение должно быть не меньше {min}",
            &[("min", format_number(min))],
        ),
        (None, Some(max)) if range.max_exclusive => translate_with(
            t,
            "validation.lessThan",
            "Значение должно быть меньше {max}",
            &[("max", format_number(max))],
        ),
        (None, Some(max)) => translate_with(
            t,
            "validation.atMost",
            "Значение должно быть не больше {max}",
            &[("max", format_number(max))],
        ),
        (None, None) => t.translate("validation.invalidValue", "Недопустимое значение"),
    }
}
