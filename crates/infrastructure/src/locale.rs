//! Locale files as a [`Translator`].
//!
//! A locale file is a nested JSON object whose string leaves are addressed by
//! dotted keys, e.g. `{"devices": {"types": {"gate": "Gate"}}}` provides
//! `devices.types.gate`. Keys missing from the file resolve to the built-in
//! fallback.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use domain::Translator;

#[derive(Error, Debug)]
pub enum LocaleError {
    #[error("Failed to read locale file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid locale JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Locale root must be a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, Default)]
pub struct JsonTranslator {
    entries: HashMap<String, String>,
}

impl JsonTranslator {
    pub fn from_json_str(json: &str) -> Result<Self, LocaleError> {
        let Value::Object(root) = serde_json::from_str::<Value>(json)? else {
            return Err(LocaleError::NotAnObject);
        };
        let mut entries = HashMap::new();
        flatten("", &root, &mut entries);
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LocaleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LocaleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let translator = Self::from_json_str(&json)?;
        info!(path = %path.display(), keys = translator.len(), "Locale loaded");
        Ok(translator)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(prefix: &str, object: &Map<String, Value>, entries: &mut HashMap<String, String>) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(text) => {
                entries.insert(path, text.clone());
            }
            Value::Object(nested) => flatten(&path, nested, entries),
            other => warn!(key = %path, value = %other, "Skipping non-string locale entry"),
        }
    }
}

impl Translator for JsonTranslator {
    fn translate(&self, key: &str, fallback: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }
}
