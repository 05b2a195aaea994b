//! Static metadata for every device type.
//!
//! One row per type: label, image and the ordered settings fields an
//! automation action (or the device itself) may carry.

use serde::Serialize;

use super::DeviceType;
use crate::error::Result;
use crate::field::{
    Dimensions, FieldDefault, FieldOption, FieldSpec, LocalizedField, NumericRange, TypeOption,
};
use crate::i18n::Translator;
use crate::unit::Unit;

/// Metadata bundle for one device type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeDescriptor {
    pub device_type: DeviceType,
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    pub image: &'static str,
    pub fields: &'static [FieldSpec],
}

impl DeviceTypeDescriptor {
    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.label_key, self.fallback_label)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn localize(&self, t: &dyn Translator) -> LocalizedDeviceType {
        LocalizedDeviceType {
            value: self.device_type,
            label: self.label(t),
            image: self.image.to_string(),
            fields: self.fields.iter().map(|f| f.localize(t)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedDeviceType {
    pub value: DeviceType,
    pub label: String,
    pub image: String,
    pub fields: Vec<LocalizedField>,
}

const fn option(value: &'static str, label_key: &'static str, label: &'static str) -> FieldOption {
    FieldOption::new(value, label_key, label)
}

const fn resolution(
    value: &'static str,
    label_key: &'static str,
    label: &'static str,
    width: u32,
    height: u32,
) -> FieldOption {
    FieldOption {
        value,
        label_key,
        fallback_label: label,
        dimensions: Some(Dimensions { width, height }),
    }
}

static LIGHT_COLORS: [FieldOption; 29] = [
    option("white", "devices.colors.white", "Белый"),
    option("warm_white", "devices.colors.warm_white", "Тёплый белый"),
    option("cool_white", "devices.colors.cool_white", "Холодный белый"),
    option("daylight", "devices.colors.daylight", "Дневной свет"),
    option("red", "devices.colors.red", "Красный"),
    option("orange", "devices.colors.orange", "Оранжевый"),
    option("yellow", "devices.colors.yellow", "Жёлтый"),
    option("lime", "devices.colors.lime", "Лаймовый"),
    option("green", "devices.colors.green", "Зелёный"),
    option("mint", "devices.colors.mint", "Мятный"),
    option("cyan", "devices.colors.cyan", "Голубой"),
    option("turquoise", "devices.colors.turquoise", "Бирюзовый"),
    option("sky_blue", "devices.colors.sky_blue", "Небесно-голубой"),
    option("blue", "devices.colors.blue", "Синий"),
    option("indigo", "devices.colors.indigo", "Индиго"),
    option("purple", "devices.colors.purple", "Фиолетовый"),
    option("lavender", "devices.colors.lavender", "Лавандовый"),
    option("magenta", "devices.colors.magenta", "Пурпурный"),
    option("pink", "devices.colors.pink", "Розовый"),
    option("coral", "devices.colors.coral", "Коралловый"),
    option("amber", "devices.colors.amber", "Янтарный"),
    option("gold", "devices.colors.gold", "Золотой"),
    option("sunset", "devices.colors.sunset", "Закат"),
    option("ocean", "devices.colors.ocean", "Океан"),
    option("forest", "devices.colors.forest", "Лес"),
    option("candlelight", "devices.colors.candlelight", "Свеча"),
    option("night_mode", "devices.colors.night_mode", "Ночной режим"),
    option("relax_mode", "devices.colors.relax_mode", "Режим отдыха"),
    option("focus_mode", "devices.colors.focus_mode", "Режим концентрации"),
];

static THERMOSTAT_MODES: [FieldOption; 4] = [
    option("heat", "devices.modes.heat", "Обогрев"),
    option("cool", "devices.modes.cool", "Охлаждение"),
    option("auto", "devices.modes.auto", "Авто"),
    option("eco", "devices.modes.eco", "Эко"),
];

static OPEN_CLOSED: [FieldOption; 2] = [
    option("open", "devices.states.open", "Открыто"),
    option("closed", "devices.states.closed", "Закрыто"),
];

static VENTILATION_MODES: [FieldOption; 5] = [
    option("auto", "devices.modes.auto", "Авто"),
    option("manual", "devices.modes.manual", "Ручной"),
    option("boost", "devices.modes.boost", "Усиленный"),
    option("eco", "devices.modes.eco", "Эко"),
    option("night", "devices.modes.night", "Ночной"),
];

static PURIFIER_MODES: [FieldOption; 5] = [
    option("auto", "devices.modes.auto", "Авто"),
    option("manual", "devices.modes.manual", "Ручной"),
    option("sleep", "devices.modes.sleep", "Сон"),
    option("turbo", "devices.modes.turbo", "Турбо"),
    option("quiet", "devices.modes.quiet", "Тихий"),
];

static CAMERA_RESOLUTIONS: [FieldOption; 5] = [
    resolution("vga", "devices.resolutions.vga", "VGA (640×480)", 640, 480),
    resolution("hd", "devices.resolutions.hd", "HD (1280×720)", 1280, 720),
    resolution("fullhd", "devices.resolutions.fullhd", "Full HD (1920×1080)", 1920, 1080),
    resolution("2k", "devices.resolutions.2k", "2K (2560×1440)", 2560, 1440),
    resolution("4k", "devices.resolutions.4k", "4K (3840×2160)", 3840, 2160),
];

const CURRENT_TEMPERATURE: FieldSpec = FieldSpec {
    name: "currentTemperature",
    label_key: "devices.fields.currentTemperature",
    fallback_label: "Температура",
    required: true,
    default: Some(FieldDefault::Number(21.0)),
    unit: Some(Unit::Celsius),
    ..FieldSpec::NUMBER
};

const CURRENT_FAN_SPEED: FieldSpec = FieldSpec {
    name: "currentFanSpeed",
    label_key: "devices.fields.currentFanSpeed",
    fallback_label: "Скорость вентилятора",
    required: true,
    default: Some(FieldDefault::Number(1.0)),
    range: Some(NumericRange::at_least(0.0)),
    ..FieldSpec::NUMBER
};

static SMART_LIGHT_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: "brightness",
        label_key: "devices.fields.brightness",
        fallback_label: "Яркость",
        required: true,
        default: Some(FieldDefault::Number(100.0)),
        unit: Some(Unit::Percent),
        range: Some(NumericRange::between(0.0, 100.0)),
        ..FieldSpec::NUMBER
    },
    FieldSpec {
        name: "color",
        label_key: "devices.fields.color",
        fallback_label: "Цвет",
        required: true,
        default: Some(FieldDefault::Choice("white")),
        options: &LIGHT_COLORS,
        ..FieldSpec::SELECT
    },
];

static THERMOSTAT_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: "currentMode",
        label_key: "devices.fields.currentMode",
        fallback_label: "Режим",
        required: true,
        default: Some(FieldDefault::Choice("heat")),
        options: &THERMOSTAT_MODES,
        ..FieldSpec::SELECT
    },
    CURRENT_TEMPERATURE,
];

static HEATING_VALVE_FIELDS: [FieldSpec; 1] = [CURRENT_TEMPERATURE];

static SMART_LOCK_FIELDS: [FieldSpec; 1] = [FieldSpec {
    name: "currentDoorState",
    label_key: "devices.fields.currentDoorState",
    fallback_label: "Состояние двери",
    required: true,
    default: Some(FieldDefault::Choice("closed")),
    options: &OPEN_CLOSED,
    ..FieldSpec::SELECT
}];

static GATE_FIELDS: [FieldSpec; 1] = [FieldSpec {
    name: "currentPosition",
    label_key: "devices.fields.currentPosition",
    fallback_label: "Положение",
    required: true,
    default: Some(FieldDefault::Choice("closed")),
    options: &OPEN_CLOSED,
    ..FieldSpec::SELECT
}];

static IRRIGATION_FIELDS: [FieldSpec; 1] = [FieldSpec {
    name: "currentWaterFlow",
    label_key: "devices.fields.currentWaterFlow",
    fallback_label: "Расход воды",
    default: Some(FieldDefault::Number(1.0)),
    unit: Some(Unit::LiterPerMinute),
    range: Some(NumericRange::at_least(0.0)),
    ..FieldSpec::NUMBER
}];

static VENTILATION_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        name: "currentMode",
        label_key: "devices.fields.currentMode",
        fallback_label: "Режим",
        required: true,
        default: Some(FieldDefault::Choice("auto")),
        options: &VENTILATION_MODES,
        ..FieldSpec::SELECT
    },
    CURRENT_FAN_SPEED,
    FieldSpec {
        name: "currentAirflow",
        label_key: "devices.fields.currentAirflow",
        fallback_label: "Воздушный поток",
        default: Some(FieldDefault::Number(1.0)),
        unit: Some(Unit::CubicMeterPerHour),
        range: Some(NumericRange::at_least(0.0)),
        ..FieldSpec::NUMBER
    },
];

static AIR_PURIFIER_FIELDS: [FieldSpec; 2] = [
    FieldSpec {
        name: "currentMode",
        label_key: "devices.fields.currentMode",
        fallback_label: "Режим",
        required: true,
        default: Some(FieldDefault::Choice("auto")),
        options: &PURIFIER_MODES,
        ..FieldSpec::SELECT
    },
    CURRENT_FAN_SPEED,
];

static CAMERA_FIELDS: [FieldSpec; 1] = [FieldSpec {
    name: "currentResolution",
    label_key: "devices.fields.currentResolution",
    fallback_label: "Разрешение",
    required: true,
    default: Some(FieldDefault::Choice("hd")),
    options: &CAMERA_RESOLUTIONS,
    ..FieldSpec::SELECT
}];

static DEVICE_TYPES: [DeviceTypeDescriptor; 10] = [
    DeviceTypeDescriptor {
        device_type: DeviceType::SmartPlug,
        label_key: "devices.types.smart_plug",
        fallback_label: "Умная розетка",
        image: "/images/devices/smart_plug.png",
        fields: &[],
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::Thermostat,
        label_key: "devices.types.thermostat",
        fallback_label: "Термостат",
        image: "/images/devices/thermostat.png",
        fields: &THERMOSTAT_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::HeatingValve,
        label_key: "devices.types.heating_valve",
        fallback_label: "Радиаторный клапан",
        image: "/images/devices/heating_valve.png",
        fields: &HEATING_VALVE_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::SmartLock,
        label_key: "devices.types.smart_lock",
        fallback_label: "Умный замок",
        image: "/images/devices/smart_lock.png",
        fields: &SMART_LOCK_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::Gate,
        label_key: "devices.types.gate",
        fallback_label: "Ворота",
        image: "/images/devices/gate.png",
        fields: &GATE_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::IrrigationSystem,
        label_key: "devices.types.irrigation_system",
        fallback_label: "Система полива",
        image: "/images/devices/irrigation_system.png",
        fields: &IRRIGATION_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::Ventilation,
        label_key: "devices.types.ventilation",
        fallback_label: "Вентиляция",
        image: "/images/devices/ventilation.png",
        fields: &VENTILATION_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::AirPurifier,
        label_key: "devices.types.air_purifier",
        fallback_label: "Очиститель воздуха",
        image: "/images/devices/air_purifier.png",
        fields: &AIR_PURIFIER_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::Camera,
        label_key: "devices.types.camera",
        fallback_label: "Камера",
        image: "/images/devices/camera.png",
        fields: &CAMERA_FIELDS,
    },
    DeviceTypeDescriptor {
        device_type: DeviceType::SmartLight,
        label_key: "devices.types.smart_light",
        fallback_label: "Умная лампа",
        image: "/images/devices/smart_light.png",
        fields: &SMART_LIGHT_FIELDS,
    },
];

/// Descriptor for an already-parsed type. Never fails.
pub fn device_type_descriptor(device_type: DeviceType) -> &'static DeviceTypeDescriptor {
    // Table rows follow `DeviceType::ALL` order
    &DEVICE_TYPES[device_type as usize]
}

/// Looks up a raw type key; keys outside the fixed set are `UnknownDeviceType`.
pub fn get_device_type_descriptor(key: &str) -> Result<&'static DeviceTypeDescriptor> {
    let device_type = key.parse::<DeviceType>()?;
    Ok(device_type_descriptor(device_type))
}

pub fn list_device_types(t: &dyn Translator) -> Vec<TypeOption> {
    DEVICE_TYPES
        .iter()
        .map(|d| TypeOption {
            value: d.device_type.as_str().to_string(),
            label: d.label(t),
        })
        .collect()
}
