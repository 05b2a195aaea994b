use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Translator;
use crate::unit::Unit;

/// Kind of input a field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDataType {
    Number,
    Select,
    Text,
}

/// Allowed numeric interval. Open bounds are expressed with the `*_exclusive` flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(default)]
    pub min_exclusive: bool,
    #[serde(default)]
    pub max_exclusive: bool,
}

impl NumericRange {
    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    pub const fn greater_than(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            min_exclusive: true,
            max_exclusive: false,
        }
    }

    pub const fn less_than(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
            min_exclusive: false,
            max_exclusive: true,
        }
    }

    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_min = match self.min {
            Some(min) if self.min_exclusive => value > min,
            Some(min) => value >= min,
            None => true,
        };
        let below_max = match self.max {
            Some(max) if self.max_exclusive => value < max,
            Some(max) => value <= max,
            None => true,
        };
        above_min && below_max
    }
}

/// Pixel size a camera resolution option maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn to_value(self) -> Value {
        serde_json::json!({ "width": self.width, "height": self.height })
    }
}

/// One entry of a select field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub value: &'static str,
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

impl FieldOption {
    pub const fn new(
        value: &'static str,
        label_key: &'static str,
        fallback_label: &'static str,
    ) -> Self {
        Self {
            value,
            label_key,
            fallback_label,
            dimensions: None,
        }
    }

    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.label_key, self.fallback_label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldDefault {
    Number(f64),
    Choice(&'static str),
}

/// Declarative description of one form field.
///
/// Lives in static tables; `name` is unique within its owning descriptor and
/// a select default is always one of its `options`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    pub data_type: FieldDataType,
    pub required: bool,
    pub default: Option<FieldDefault>,
    pub unit: Option<Unit>,
    pub options: &'static [FieldOption],
    pub range: Option<NumericRange>,
}

impl FieldSpec {
    pub const NUMBER: FieldSpec = FieldSpec {
        name: "",
        label_key: "",
        fallback_label: "",
        data_type: FieldDataType::Number,
        required: false,
        default: None,
        unit: None,
        options: &[],
        range: None,
    };

    pub const SELECT: FieldSpec = FieldSpec {
        data_type: FieldDataType::Select,
        ..Self::NUMBER
    };

    pub const TEXT: FieldSpec = FieldSpec {
        data_type: FieldDataType::Text,
        ..Self::NUMBER
    };

    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.label_key, self.fallback_label)
    }

    pub fn option(&self, value: &str) -> Option<&'static FieldOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Default in the shape the API expects (camera resolutions become `{width,height}`).
    pub fn default_value(&self) -> Option<Value> {
        match self.default? {
            FieldDefault::Number(n) => Some(number_value(n)),
            FieldDefault::Choice(choice) => match self.option(choice) {
                Some(FieldOption {
                    dimensions: Some(d),
                    ..
                }) => Some(d.to_value()),
                _ => Some(Value::String(choice.to_string())),
            },
        }
    }

    /// Default as the raw form-input string (`"21"`, `"hd"`).
    pub fn default_input(&self) -> Option<String> {
        match self.default? {
            FieldDefault::Number(n) => Some(format_number(n)),
            FieldDefault::Choice(choice) => Some(choice.to_string()),
        }
    }

    pub fn localize(&self, t: &dyn Translator) -> LocalizedField {
        LocalizedField {
            name: self.name.to_string(),
            label: self.label(t),
            data_type: self.data_type,
            required: self.required,
            default_value: self.default_value(),
            unit: self.unit.map(|u| u.label(t)),
            options: self
                .options
                .iter()
                .map(|o| TypeOption {
                    value: o.value.to_string(),
                    label: o.label(t),
                })
                .collect(),
            range: self.range,
        }
    }
}

/// A field with every label resolved, ready to render or serialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedField {
    pub name: String,
    pub label: String,
    pub data_type: FieldDataType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<TypeOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
}

/// `{value, label}` pair used by type lists and select options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeOption {
    pub value: String,
    pub label: String,
}

/// Integral values become JSON integers so `100` and `100.0` compare equal downstream.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub fn format_number(n: f64) -> String {
    format!("{n}")
}

/// Reads a finite number from a JSON number or a numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Null, blank strings and empty arrays count as "no input".
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
