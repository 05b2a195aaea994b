use std::fs;
use std::path::PathBuf;

use domain::automation::resolve_sensor_trigger_defaults;
use domain::device::list_device_types;
use domain::sensor::SensorType;
use infrastructure::{JsonTranslator, LocaleError, ServerConfig};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("homecfg-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = scratch_dir("config");
    fs::write(
        dir.join("default.toml"),
        "log_level = \"debug\"\n\n[server]\nport = 8088\n\n[locale]\npath = \"locales/en.json\"\n",
    )
    .unwrap();

    let config = ServerConfig::load(dir.to_str().unwrap()).unwrap();
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.locale.path.as_deref(), Some("locales/en.json"));
    assert_eq!(config.log_level, "debug");

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_locale_file_drives_labels() {
    let dir = scratch_dir("locale");
    let path = dir.join("en.json");
    fs::write(
        &path,
        r#"{
            "devices": { "types": { "smart_plug": "Smart plug" } },
            "units": { "microgramPerCubicMeter": "µg/m³" }
        }"#,
    )
    .unwrap();

    let t = JsonTranslator::load(&path).unwrap();
    let types = list_device_types(&t);
    let plug = types.iter().find(|o| o.value == "smart_plug").unwrap();
    assert_eq!(plug.label, "Smart plug");
    // Keys absent from the file keep the built-in label
    let gate = types.iter().find(|o| o.value == "gate").unwrap();
    assert_eq!(gate.label, "Ворота");

    let ozone =
        resolve_sensor_trigger_defaults(SensorType::GasSensor, "currentOzoneLevel", &t).unwrap();
    assert_eq!(ozone.default_value, "100");
    assert_eq!(ozone.unit.as_deref(), Some("µg/m³"));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_locale_file() {
    let err = JsonTranslator::load("/nonexistent/locale.json").unwrap_err();
    assert!(matches!(err, LocaleError::Io { .. }));
}
