use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::i18n::FALLBACK;
use crate::validation::check_name;

/// Top of the ownership tree: a home owns rooms and automation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub id: String,
    pub name: String,
}

/// A room owns devices and sensors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub home_id: String,
}

fn checked_name(name: String) -> Result<String> {
    check_name(&name).map_err(|e| DomainError::InvalidName(e.message(&FALLBACK)))?;
    Ok(name.trim().to_string())
}

impl Home {
    pub fn new(id: String, name: String) -> Result<Self> {
        Ok(Self {
            id,
            name: checked_name(name)?,
        })
    }

    pub fn renamed(&self, name: String) -> Result<Self> {
        Self::new(self.id.clone(), name)
    }
}

impl Room {
    pub fn new(id: String, name: String, home_id: String) -> Result<Self> {
        Ok(Self {
            id,
            name: checked_name(name)?,
            home_id,
        })
    }

    pub fn belongs_to(&self, home: &Home) -> bool {
        self.home_id == home.id
    }
}
