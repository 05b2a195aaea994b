use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::registry::device_type_descriptor;
use super::settings::IS_ACTIVE;
use super::DeviceType;
use crate::error::{DomainError, Result};

/// A controllable device in a room.
///
/// Owned by the REST API; the domain only enforces that `settings` keys belong
/// to the device type and that the type never changes. Deserializing goes
/// through [`Device::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DeviceRecord")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub device_type: DeviceType,
    pub room_id: String,
    pub home_id: String,
    pub is_active: bool,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceRecord {
    id: String,
    name: String,
    device_type: DeviceType,
    room_id: String,
    home_id: String,
    is_active: bool,
    #[serde(default)]
    settings: Map<String, Value>,
}

impl TryFrom<DeviceRecord> for Device {
    type Error = DomainError;

    fn try_from(record: DeviceRecord) -> Result<Self> {
        let mut device = Device::new(
            record.id,
            record.name,
            record.device_type,
            record.room_id,
            record.home_id,
            record.settings,
        )?;
        device.is_active = record.is_active;
        Ok(device)
    }
}

/// Partial update as sent by an edit dialog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl Device {
    pub fn new(
        id: String,
        name: String,
        device_type: DeviceType,
        room_id: String,
        home_id: String,
        settings: Map<String, Value>,
    ) -> Result<Self> {
        check_setting_keys(device_type, &settings)?;
        Ok(Self {
            id,
            name,
            device_type,
            room_id,
            home_id,
            is_active: true,
            settings,
        })
    }

    /// Returns a copy with `partial` merged over the current settings.
    pub fn merge_settings(&self, partial: &Map<String, Value>) -> Result<Self> {
        check_setting_keys(self.device_type, partial)?;
        let mut settings = self.settings.clone();
        settings.extend(partial.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Self {
            settings,
            ..self.clone()
        })
    }

    /// Returns a copy with `update` applied. Changing the device type is rejected.
    pub fn apply_update(&self, update: &DeviceUpdate) -> Result<Self> {
        if let Some(requested) = update.device_type {
            if requested != self.device_type {
                return Err(DomainError::DeviceTypeImmutable {
                    from: self.device_type.to_string(),
                    to: requested.to_string(),
                });
            }
        }

        let mut device = self.merge_settings(&update.settings)?;
        if let Some(name) = &update.name {
            device.name = name.clone();
        }
        if let Some(room_id) = &update.room_id {
            device.room_id = room_id.clone();
        }
        if let Some(is_active) = update.is_active {
            device.is_active = is_active;
        }
        Ok(device)
    }
}

fn check_setting_keys(device_type: DeviceType, settings: &Map<String, Value>) -> Result<()> {
    let descriptor = device_type_descriptor(device_type);
    match settings
        .keys()
        .find(|k| k.as_str() != IS_ACTIVE && descriptor.field(k).is_none())
    {
        Some(key) => Err(DomainError::UnknownSetting {
            device_type: device_type.to_string(),
            key: key.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thermostat() -> Device {
        Device::new(
            "dev-1".into(),
            "Living room".into(),
            DeviceType::Thermostat,
            "room-1".into(),
            "home-1".into(),
            json!({ "currentMode": "heat", "currentTemperature": 21 })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_device_creation() {
        let device = thermostat();
        assert_eq!(device.device_type, DeviceType::Thermostat);
        assert!(device.is_active);
        assert_eq!(device.settings["currentTemperature"], json!(21));
    }

    #[test]
    fn test_rejects_foreign_setting() {
        let result = Device::new(
            "dev-2".into(),
            "Lamp".into(),
            DeviceType::SmartPlug,
            "room-1".into(),
            "home-1".into(),
            json!({ "brightness": 10 }).as_object().cloned().unwrap(),
        );
        assert_eq!(
            result.unwrap_err(),
            DomainError::UnknownSetting {
                device_type: "smart_plug".into(),
                key: "brightness".into()
            }
        );
    }

    #[test]
    fn test_merge_settings_keeps_original() {
        let device = thermostat();
        let merged = device
            .merge_settings(json!({ "currentTemperature": 23 }).as_object().unwrap())
            .unwrap();
        assert_eq!(merged.settings["currentTemperature"], json!(23));
        assert_eq!(merged.settings["currentMode"], json!("heat"));
        assert_eq!(device.settings["currentTemperature"], json!(21));
    }

    #[test]
    fn test_device_type_is_immutable() {
        let update = DeviceUpdate {
            device_type: Some(DeviceType::Gate),
            ..Default::default()
        };
        assert!(matches!(
            thermostat().apply_update(&update),
            Err(DomainError::DeviceTypeImmutable { .. })
        ));
    }

    #[test]
    fn test_apply_update() {
        let update = DeviceUpdate {
            name: Some("Bedroom".into()),
            device_type: Some(DeviceType::Thermostat),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = thermostat().apply_update(&update).unwrap();
        assert_eq!(updated.name, "Bedroom");
        assert!(!updated.is_active);
        assert_eq!(updated.room_id, "room-1");
    }

    #[test]
    fn test_deserialize_rejects_foreign_setting() {
        let raw = json!({
            "id": "dev-3",
            "name": "Plug",
            "deviceType": "smart_plug",
            "roomId": "room-1",
            "homeId": "home-1",
            "isActive": false,
            "settings": { "brightness": 10 }
        });
        let err = serde_json::from_value::<Device>(raw.clone()).unwrap_err();
        assert!(err.to_string().contains("brightness"));

        let mut raw = raw;
        raw["settings"] = json!({ "isActive": false });
        let device: Device = serde_json::from_value(raw).unwrap();
        assert!(!device.is_active);
    }

    #[test]
    fn test_serde_camel_case() {
        let value = serde_json::to_value(thermostat()).unwrap();
        assert_eq!(value["deviceType"], json!("thermostat"));
        assert_eq!(value["roomId"], json!("room-1"));
        assert_eq!(value["isActive"], json!(true));
    }
}
