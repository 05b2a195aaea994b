use std::sync::Arc;

use application::forms::{AutomationStep, DeviceStep, SensorStep};
use application::{AutomationWizard, DeviceWizard, FormError, SensorWizard, Submission};
use domain::automation::{DayOfWeek, TriggerType};
use domain::device::DeviceUpdate;
use domain::{AutomationRule, Device, DeviceType, FallbackTranslator, Sensor, SensorType, Trigger};
use serde_json::{json, Map};

fn translator() -> Arc<FallbackTranslator> {
    Arc::new(FallbackTranslator)
}

#[test]
fn test_device_create_flow() {
    let mut wizard = DeviceWizard::create(translator(), "h-1".into(), None);
    wizard.set("name", json!("Living room camera")).unwrap();
    wizard.set("deviceType", json!("camera")).unwrap();

    // Room is still missing
    let err = wizard.next().unwrap_err();
    assert_eq!(err.field_errors().unwrap().len(), 1);
    assert!(err.field_errors().unwrap().contains_key("roomId"));

    wizard.set("roomId", json!("r-7")).unwrap();
    assert_eq!(wizard.next().unwrap(), DeviceStep::Settings);
    wizard.set("currentResolution", json!("fullhd")).unwrap();

    let Submission::Create { payload } = wizard.submit().unwrap() else {
        panic!("expected create submission");
    };
    assert_eq!(payload.device_type, DeviceType::Camera);
    assert_eq!(payload.home_id, "h-1");
    assert_eq!(
        serde_json::to_value(&payload.settings).unwrap(),
        json!({ "currentResolution": { "width": 1920, "height": 1080 }, "isActive": true })
    );
}

#[test]
fn test_device_edit_produces_update_without_type() {
    let mut settings = Map::new();
    settings.insert("currentResolution".into(), json!({ "width": 1280, "height": 720 }));
    let device = Device::new(
        "d-9".into(),
        "Porch camera".into(),
        DeviceType::Camera,
        "r-1".into(),
        "h-1".into(),
        settings,
    )
    .unwrap();

    let mut wizard = DeviceWizard::edit(translator(), &device);
    assert_eq!(wizard.values()["currentResolution"], json!("hd"));
    wizard.set("name", json!("Porch cam")).unwrap();

    let submission = wizard.submit().unwrap();
    let Submission::Update { id, payload } = submission else {
        panic!("expected update submission");
    };
    assert_eq!(id, "d-9");
    assert_eq!(payload.device_type, None);
    assert_eq!(payload.name.as_deref(), Some("Porch cam"));

    let updated = device.apply_update(&payload).unwrap();
    assert_eq!(updated.name, "Porch cam");
    assert_eq!(updated.settings["currentResolution"], json!({ "width": 1280, "height": 720 }));
}

#[test]
fn test_unchanged_edit_of_inactive_device() {
    let device: Device = serde_json::from_value(json!({
        "id": "d-4",
        "name": "Hall lamp",
        "deviceType": "smart_light",
        "roomId": "r-1",
        "homeId": "h-1",
        "isActive": false,
        "settings": { "brightness": 40, "color": "warm_white" }
    }))
    .unwrap();

    let mut wizard = DeviceWizard::edit(translator(), &device);
    let Submission::Update { payload, .. } = wizard.submit().unwrap() else {
        panic!("expected update submission");
    };
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "name": "Hall lamp",
            "roomId": "r-1",
            "isActive": false,
            "settings": { "brightness": 40, "color": "warm_white" }
        })
    );

    let updated = device.apply_update(&payload).unwrap();
    assert!(!updated.is_active);
    assert!(!updated.settings.contains_key("isActive"));
    assert_eq!(updated, device);
}

#[test]
fn test_device_submit_revalidates_every_step() {
    let mut wizard = DeviceWizard::create(translator(), "h-1".into(), Some("r-1".into()));
    wizard.set("name", json!("Thermostat")).unwrap();
    wizard.set("deviceType", json!("thermostat")).unwrap();
    wizard.next().unwrap();
    wizard.back();
    wizard.set("name", json!("T")).unwrap();

    let err = wizard.submit().unwrap_err();
    assert!(matches!(err, FormError::Invalid(_)));
    assert!(err.field_errors().unwrap().contains_key("name"));
}

#[test]
fn test_sensor_edit_keeps_thresholds() {
    let sensor: Sensor = serde_json::from_value(json!({
        "id": "s-3",
        "name": "Boiler room",
        "sensorType": "gas_sensor",
        "roomId": "r-2",
        "homeId": "h-1",
        "currentMethanLevel": 2,
        "dangerousMethanLevel": 15
    }))
    .unwrap();

    let mut wizard = SensorWizard::edit(translator(), &sensor);
    assert_eq!(wizard.values()["dangerousMethanLevel"], json!(15));
    assert_eq!(
        wizard.set("sensorType", json!("smoke_sensor")),
        Err(FormError::Locked("sensorType"))
    );

    wizard.next().unwrap();
    assert_eq!(wizard.step(), SensorStep::Thresholds);
    wizard.set("dangerousOzoneLevel", json!("120")).unwrap();

    let Submission::Update { id, payload } = wizard.submit().unwrap() else {
        panic!("expected update submission");
    };
    assert_eq!(id, "s-3");
    assert_eq!(payload.thresholds["dangerousMethanLevel"], json!(15));
    assert_eq!(payload.thresholds["dangerousOzoneLevel"], json!(120));
    assert_eq!(payload.thresholds.len(), 6);
    assert!(sensor.with_thresholds(&payload.thresholds).is_ok());
}

#[test]
fn test_automation_time_rule_flow() {
    let mut wizard = AutomationWizard::create(translator(), "h-1".into());
    wizard.set_name("Evening lights");
    assert_eq!(wizard.next().unwrap(), AutomationStep::Trigger);

    wizard.set_start_time("19:00");
    wizard.set_end_time("23:30");
    wizard.toggle_day(DayOfWeek::Friday);
    assert_eq!(wizard.next().unwrap(), AutomationStep::Action);

    wizard.select_device_type(DeviceType::SmartLight).unwrap();
    let err = wizard.next().unwrap_err();
    assert!(err.field_errors().unwrap().contains_key("deviceIds"));

    wizard.toggle_device("d-1");
    wizard.set_setting("color", json!("warm_white")).unwrap();

    let Submission::Create { payload: rule } = wizard.submit().unwrap() else {
        panic!("expected create submission");
    };
    let Trigger::Time { time_trigger } = &rule.trigger else {
        panic!("expected time trigger");
    };
    // Non-recurring rules never carry a day selection
    assert!(time_trigger.days_of_week.is_empty());
    assert_eq!(rule.device_action.settings["brightness"], json!(100));
    assert_eq!(rule.device_action.settings["color"], json!("warm_white"));
    assert_eq!(rule.validate(), Ok(()));
}

#[test]
fn test_automation_sensor_rule_flow() {
    let mut wizard = AutomationWizard::create(translator(), "h-1".into());
    wizard.set_name("Ventilate on CO");
    wizard.set_trigger_type(TriggerType::Sensor);
    wizard.select_sensor("s-5", SensorType::GasSensor).unwrap();
    wizard.select_property("currentCarbonMonoxideLevel").unwrap();
    wizard.set_trigger_value(json!(" 40 ")).unwrap();
    wizard.select_device_type(DeviceType::Ventilation).unwrap();
    wizard.toggle_device("d-2");

    let Submission::Create { payload: rule } = wizard.submit().unwrap() else {
        panic!("expected create submission");
    };
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value["triggerType"], json!("sensor"));
    assert_eq!(
        value["sensorTrigger"]["condition"],
        json!({ "property": "currentCarbonMonoxideLevel", "triggerValue": 40, "unit": "ppm" })
    );
    assert_eq!(value["deviceAction"]["settings"]["currentMode"], json!("auto"));
}

#[test]
fn test_automation_edit_locks_device_type() {
    let rule: AutomationRule = serde_json::from_value(json!({
        "id": "a-4",
        "name": "Night heating",
        "homeId": "h-1",
        "triggerType": "time",
        "timeTrigger": {
            "startTime": "22:00",
            "endTime": "06:00",
            "isRecurring": true,
            "daysOfWeek": ["monday", "tuesday"]
        },
        "deviceAction": {
            "deviceType": "heating_valve",
            "deviceIds": ["d-3"],
            "settings": { "currentTemperature": 24, "isActive": true }
        }
    }))
    .unwrap();

    let mut wizard = AutomationWizard::edit(translator(), &rule);
    assert_eq!(wizard.draft().settings["currentTemperature"], json!("24"));
    assert_eq!(
        wizard.select_device_type(DeviceType::Thermostat),
        Err(FormError::Locked("deviceType"))
    );

    let Submission::Update { id, payload } = wizard.submit().unwrap() else {
        panic!("expected update submission");
    };
    assert_eq!(id, "a-4");
    assert_eq!(payload, rule);
}

#[test]
fn test_update_payload_serialization() {
    let update = DeviceUpdate {
        name: Some("Lamp".into()),
        ..Default::default()
    };
    let submission: Submission<(), DeviceUpdate> = Submission::Update {
        id: "d-1".into(),
        payload: update,
    };
    let value = serde_json::to_value(&submission).unwrap();
    assert_eq!(value["mode"], json!("update"));
    assert_eq!(value["payload"]["name"], json!("Lamp"));
}
