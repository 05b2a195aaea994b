//! Sensor metadata and the dangerous-threshold table.
//!
//! Each sensor type lists its live readings and the `dangerous*` thresholds
//! they are compared against. Threshold defaults are locale independent and
//! never change at runtime.

use serde::Serialize;

use super::SensorType;
use crate::error::{DomainError, Result};
use crate::field::{FieldDefault, FieldSpec, LocalizedField, NumericRange, TypeOption};
use crate::i18n::Translator;
use crate::unit::Unit;

/// Which side of the threshold is dangerous
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    pub fn exceeded(&self, current: f64, threshold: f64) -> bool {
        match self {
            Self::Above => current > threshold,
            Self::Below => current < threshold,
        }
    }
}

/// A `dangerous*` field and the reading it guards
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub field: FieldSpec,
    pub reading: &'static str,
    pub direction: Direction,
}

impl Threshold {
    pub fn name(&self) -> &'static str {
        self.field.name
    }

    pub fn default_value(&self) -> f64 {
        match self.field.default {
            Some(FieldDefault::Number(n)) => n,
            _ => 0.0,
        }
    }
}

/// Where an automation condition on a reading takes its initial value from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "source")]
pub enum TriggerDefault {
    Threshold { field: &'static str },
    Fixed { value: &'static str, unit: Unit },
}

/// A live `current*` property reported by a sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub property: &'static str,
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    pub unit: Option<Unit>,
    pub trigger_default: TriggerDefault,
}

impl Reading {
    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.label_key, self.fallback_label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdDefault {
    pub value: f64,
    pub unit: Option<Unit>,
}

/// Metadata bundle for one sensor type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorTypeDescriptor {
    pub sensor_type: SensorType,
    pub label_key: &'static str,
    pub fallback_label: &'static str,
    pub image: &'static str,
    pub thresholds: &'static [Threshold],
    pub readings: &'static [Reading],
}

impl SensorTypeDescriptor {
    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.label_key, self.fallback_label)
    }

    /// Threshold fields in form order
    pub fn threshold_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.thresholds.iter().map(|t| &t.field)
    }

    pub fn threshold(&self, name: &str) -> Option<&'static Threshold> {
        self.thresholds.iter().find(|t| t.field.name == name)
    }

    pub fn reading(&self, property: &str) -> Option<&'static Reading> {
        self.readings.iter().find(|r| r.property == property)
    }

    /// Thresholds paired with `property`; temperature readings have two.
    pub fn thresholds_for<'a>(&self, property: &'a str) -> impl Iterator<Item = &'static Threshold> + 'a {
        self.thresholds.iter().filter(move |t| t.reading == property)
    }

    pub fn localize(&self, t: &dyn Translator) -> LocalizedSensorType {
        LocalizedSensorType {
            value: self.sensor_type,
            label: self.label(t),
            image: self.image.to_string(),
            fields: self.threshold_fields().map(|f| f.localize(t)).collect(),
            readings: self
                .readings
                .iter()
                .map(|r| LocalizedReading {
                    property: r.property.to_string(),
                    label: r.label(t),
                    unit: r.unit.map(|u| u.label(t)),
                    thresholds: self
                        .thresholds_for(r.property)
                        .map(|th| th.name().to_string())
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedSensorType {
    pub value: SensorType,
    pub label: String,
    pub image: String,
    pub fields: Vec<LocalizedField>,
    pub readings: Vec<LocalizedReading>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedReading {
    pub property: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub thresholds: Vec<String>,
}

const fn above(
    name: &'static str,
    label_key: &'static str,
    label: &'static str,
    reading: &'static str,
    default: f64,
    unit: Option<Unit>,
    range: NumericRange,
) -> Threshold {
    Threshold {
        field: FieldSpec {
            name,
            label_key,
            fallback_label: label,
            required: true,
            default: Some(FieldDefault::Number(default)),
            unit,
            range: Some(range),
            ..FieldSpec::NUMBER
        },
        reading,
        direction: Direction::Above,
    }
}

const fn below(
    name: &'static str,
    label_key: &'static str,
    label: &'static str,
    reading: &'static str,
    default: f64,
    unit: Option<Unit>,
    range: NumericRange,
) -> Threshold {
    let mut threshold = above(name, label_key, label, reading, default, unit, range);
    threshold.direction = Direction::Below;
    threshold
}

const fn reading(
    property: &'static str,
    label_key: &'static str,
    label: &'static str,
    unit: Option<Unit>,
    threshold: &'static str,
) -> Reading {
    Reading {
        property,
        label_key,
        fallback_label: label,
        unit,
        trigger_default: TriggerDefault::Threshold { field: threshold },
    }
}

const NON_NEGATIVE: NumericRange = NumericRange::at_least(0.0);
const PERCENT: NumericRange = NumericRange::between(0.0, 100.0);
const POSITIVE: NumericRange = NumericRange::greater_than(0.0);
const NEGATIVE: NumericRange = NumericRange::less_than(0.0);

const C: Option<Unit> = Some(Unit::Celsius);
const PCT: Option<Unit> = Some(Unit::Percent);
const LEL: Option<Unit> = Some(Unit::PercentLel);
const PPM: Option<Unit> = Some(Unit::Ppm);
const UG: Option<Unit> = Some(Unit::MicrogramPerCubicMeter);

static TEMPERATURE_THRESHOLDS: [Threshold; 2] = [
    above(
        "dangerousTemperaturePlus",
        "sensors.thresholds.dangerousTemperaturePlus",
        "Опасная температура (верхний порог)",
        "currentTemperature",
        30.0,
        C,
        POSITIVE,
    ),
    below(
        "dangerousTemperatureMinus",
        "sensors.thresholds.dangerousTemperatureMinus",
        "Опасная температура (нижний порог)",
        "currentTemperature",
        -20.0,
        C,
        NEGATIVE,
    ),
];

static HUMIDITY_THRESHOLDS: [Threshold; 1] = [above(
    "dangerousHumidity",
    "sensors.thresholds.dangerousHumidity",
    "Опасная влажность",
    "currentHumidity",
    70.0,
    PCT,
    PERCENT,
)];

static MOTION_THRESHOLDS: [Threshold; 1] = [above(
    "dangerousMotionIntensity",
    "sensors.thresholds.dangerousMotionIntensity",
    "Опасная интенсивность движения",
    "currentMotionIntensity",
    80.0,
    None,
    PERCENT,
)];

static SMOKE_THRESHOLDS: [Threshold; 1] = [above(
    "dangerousSmokeLevel",
    "sensors.thresholds.dangerousSmokeLevel",
    "Опасный уровень дыма",
    "currentSmokeLevel",
    20.0,
    PCT,
    PERCENT,
)];

static GAS_THRESHOLDS: [Threshold; 6] = [
    above(
        "dangerousMethanLevel",
        "sensors.thresholds.dangerousMethanLevel",
        "Опасный уровень метана",
        "currentMethanLevel",
        0.5,
        LEL,
        NON_NEGATIVE,
    ),
    above(
        "dangerousCarbonMonoxideLevel",
        "sensors.thresholds.dangerousCarbonMonoxideLevel",
        "Опасный уровень угарного газа",
        "currentCarbonMonoxideLevel",
        50.0,
        PPM,
        NON_NEGATIVE,
    ),
    above(
        "dangerousCarbonDioxideLevel",
        "sensors.thresholds.dangerousCarbonDioxideLevel",
        "Опасный уровень углекислого газа",
        "currentCarbonDioxideLevel",
        1000.0,
        PPM,
        NON_NEGATIVE,
    ),
    above(
        "dangerousPropaneLevel",
        "sensors.thresholds.dangerousPropaneLevel",
        "Опасный уровень пропана",
        "currentPropaneLevel",
        0.4,
        LEL,
        NON_NEGATIVE,
    ),
    above(
        "dangerousNitrogenDioxideLevel",
        "sensors.thresholds.dangerousNitrogenDioxideLevel",
        "Опасный уровень диоксида азота",
        "currentNitrogenDioxideLevel",
        200.0,
        UG,
        NON_NEGATIVE,
    ),
    above(
        "dangerousOzoneLevel",
        "sensors.thresholds.dangerousOzoneLevel",
        "Опасный уровень озона",
        "currentOzoneLevel",
        100.0,
        UG,
        NON_NEGATIVE,
    ),
];

static WATER_LEAK_THRESHOLDS: [Threshold; 1] = [above(
    "dangerousWaterDetectionIndex",
    "sensors.thresholds.dangerousWaterDetectionIndex",
    "Опасный индекс обнаружения воды",
    "currentWaterDetectionIndex",
    5.0,
    None,
    NumericRange::between(0.0, 10.0),
)];

static LIGHT_THRESHOLDS: [Threshold; 1] = [above(
    "dangerousLux",
    "sensors.thresholds.dangerousLux",
    "Опасная освещённость",
    "currentLux",
    10000.0,
    Some(Unit::Lux),
    NON_NEGATIVE,
)];

static AIR_QUALITY_THRESHOLDS: [Threshold; 3] = [
    above(
        "dangerousAQI",
        "sensors.thresholds.dangerousAQI",
        "Опасный индекс качества воздуха",
        "currentAQI",
        150.0,
        None,
        NON_NEGATIVE,
    ),
    above(
        "dangerousPM25",
        "sensors.thresholds.dangerousPM25",
        "Опасный уровень PM2.5",
        "currentPM25",
        35.0,
        UG,
        NON_NEGATIVE,
    ),
    above(
        "dangerousPM10",
        "sensors.thresholds.dangerousPM10",
        "Опасный уровень PM10",
        "currentPM10",
        50.0,
        UG,
        NON_NEGATIVE,
    ),
];

static POWER_THRESHOLDS: [Threshold; 3] = [
    above(
        "dangerousPower",
        "sensors.thresholds.dangerousPower",
        "Опасная мощность",
        "currentPower",
        3500.0,
        Some(Unit::Watt),
        NON_NEGATIVE,
    ),
    above(
        "dangerousVoltage",
        "sensors.thresholds.dangerousVoltage",
        "Опасное напряжение",
        "currentVoltage",
        250.0,
        Some(Unit::Volt),
        NON_NEGATIVE,
    ),
    above(
        "dangerousCurrent",
        "sensors.thresholds.dangerousCurrent",
        "Опасная сила тока",
        "currentCurrent",
        16.0,
        Some(Unit::Ampere),
        NON_NEGATIVE,
    ),
];

static WEATHER_THRESHOLDS: [Threshold; 4] = [
    above(
        "dangerousTemperaturePlus",
        "sensors.thresholds.dangerousTemperaturePlus",
        "Опасная температура (верхний порог)",
        "currentTemperature",
        35.0,
        C,
        POSITIVE,
    ),
    below(
        "dangerousTemperatureMinus",
        "sensors.thresholds.dangerousTemperatureMinus",
        "Опасная температура (нижний порог)",
        "currentTemperature",
        -20.0,
        C,
        NEGATIVE,
    ),
    above(
        "dangerousWindSpeed",
        "sensors.thresholds.dangerousWindSpeed",
        "Опасная скорость ветра",
        "currentWindSpeed",
        20.0,
        Some(Unit::MeterPerSecond),
        NON_NEGATIVE,
    ),
    above(
        "dangerousRainIntensity",
        "sensors.thresholds.dangerousRainIntensity",
        "Опасная интенсивность осадков",
        "currentRainIntensity",
        15.0,
        Some(Unit::MillimeterPerHour),
        NON_NEGATIVE,
    ),
];

const TEMPERATURE_READING: Reading = reading(
    "currentTemperature",
    "sensors.readings.currentTemperature",
    "Температура",
    C,
    "dangerousTemperaturePlus",
);

static TEMPERATURE_READINGS: [Reading; 1] = [TEMPERATURE_READING];

static HUMIDITY_READINGS: [Reading; 1] = [reading(
    "currentHumidity",
    "sensors.readings.currentHumidity",
    "Влажность",
    PCT,
    "dangerousHumidity",
)];

static MOTION_READINGS: [Reading; 1] = [reading(
    "currentMotionIntensity",
    "sensors.readings.currentMotionIntensity",
    "Интенсивность движения",
    None,
    "dangerousMotionIntensity",
)];

static SMOKE_READINGS: [Reading; 1] = [reading(
    "currentSmokeLevel",
    "sensors.readings.currentSmokeLevel",
    "Уровень дыма",
    PCT,
    "dangerousSmokeLevel",
)];

static GAS_READINGS: [Reading; 6] = [
    reading(
        "currentMethanLevel",
        "sensors.readings.currentMethanLevel",
        "Метан",
        LEL,
        "dangerousMethanLevel",
    ),
    reading(
        "currentCarbonMonoxideLevel",
        "sensors.readings.currentCarbonMonoxideLevel",
        "Угарный газ (CO)",
        PPM,
        "dangerousCarbonMonoxideLevel",
    ),
    reading(
        "currentCarbonDioxideLevel",
        "sensors.readings.currentCarbonDioxideLevel",
        "Углекислый газ (CO₂)",
        PPM,
        "dangerousCarbonDioxideLevel",
    ),
    reading(
        "currentPropaneLevel",
        "sensors.readings.currentPropaneLevel",
        "Пропан",
        LEL,
        "dangerousPropaneLevel",
    ),
    reading(
        "currentNitrogenDioxideLevel",
        "sensors.readings.currentNitrogenDioxideLevel",
        "Диоксид азота (NO₂)",
        UG,
        "dangerousNitrogenDioxideLevel",
    ),
    reading(
        "currentOzoneLevel",
        "sensors.readings.currentOzoneLevel",
        "Озон (O₃)",
        UG,
        "dangerousOzoneLevel",
    ),
];

static WATER_LEAK_READINGS: [Reading; 1] = [reading(
    "currentWaterDetectionIndex",
    "sensors.readings.currentWaterDetectionIndex",
    "Индекс обнаружения воды",
    None,
    "dangerousWaterDetectionIndex",
)];

static LIGHT_READINGS: [Reading; 1] = [reading(
    "currentLux",
    "sensors.readings.currentLux",
    "Освещённость",
    Some(Unit::Lux),
    "dangerousLux",
)];

static AIR_QUALITY_READINGS: [Reading; 3] = [
    reading(
        "currentAQI",
        "sensors.readings.currentAQI",
        "Индекс качества воздуха",
        None,
        "dangerousAQI",
    ),
    reading("currentPM25", "sensors.readings.currentPM25", "PM2.5", UG, "dangerousPM25"),
    reading("currentPM10", "sensors.readings.currentPM10", "PM10", UG, "dangerousPM10"),
];

static POWER_READINGS: [Reading; 3] = [
    reading(
        "currentPower",
        "sensors.readings.currentPower",
        "Мощность",
        Some(Unit::Watt),
        "dangerousPower",
    ),
    reading(
        "currentVoltage",
        "sensors.readings.currentVoltage",
        "Напряжение",
        Some(Unit::Volt),
        "dangerousVoltage",
    ),
    reading(
        "currentCurrent",
        "sensors.readings.currentCurrent",
        "Сила тока",
        Some(Unit::Ampere),
        "dangerousCurrent",
    ),
];

// Humidity and pressure have no danger thresholds on weather stations; their
// trigger defaults are fixed literals.
static WEATHER_READINGS: [Reading; 5] = [
    TEMPERATURE_READING,
    Reading {
        property: "currentHumidity",
        label_key: "sensors.readings.currentHumidity",
        fallback_label: "Влажность",
        unit: PCT,
        trigger_default: TriggerDefault::Fixed {
            value: "80",
            unit: Unit::Percent,
        },
    },
    Reading {
        property: "currentPressure",
        label_key: "sensors.readings.currentPressure",
        fallback_label: "Давление",
        unit: Some(Unit::MillimeterOfMercury),
        trigger_default: TriggerDefault::Fixed {
            value: "750",
            unit: Unit::MillimeterOfMercury,
        },
    },
    reading(
        "currentWindSpeed",
        "sensors.readings.currentWindSpeed",
        "Скорость ветра",
        Some(Unit::MeterPerSecond),
        "dangerousWindSpeed",
    ),
    reading(
        "currentRainIntensity",
        "sensors.readings.currentRainIntensity",
        "Интенсивность осадков",
        Some(Unit::MillimeterPerHour),
        "dangerousRainIntensity",
    ),
];

static SENSOR_TYPES: [SensorTypeDescriptor; 10] = [
    SensorTypeDescriptor {
        sensor_type: SensorType::TemperatureSensor,
        label_key: "sensors.types.temperature_sensor",
        fallback_label: "Датчик температуры",
        image: "/images/sensors/temperature_sensor.png",
        thresholds: &TEMPERATURE_THRESHOLDS,
        readings: &TEMPERATURE_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::HumiditySensor,
        label_key: "sensors.types.humidity_sensor",
        fallback_label: "Датчик влажности",
        image: "/images/sensors/humidity_sensor.png",
        thresholds: &HUMIDITY_THRESHOLDS,
        readings: &HUMIDITY_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::MotionSensor,
        label_key: "sensors.types.motion_sensor",
        fallback_label: "Датчик движения",
        image: "/images/sensors/motion_sensor.png",
        thresholds: &MOTION_THRESHOLDS,
        readings: &MOTION_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::SmokeSensor,
        label_key: "sensors.types.smoke_sensor",
        fallback_label: "Датчик дыма",
        image: "/images/sensors/smoke_sensor.png",
        thresholds: &SMOKE_THRESHOLDS,
        readings: &SMOKE_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::GasSensor,
        label_key: "sensors.types.gas_sensor",
        fallback_label: "Датчик газа",
        image: "/images/sensors/gas_sensor.png",
        thresholds: &GAS_THRESHOLDS,
        readings: &GAS_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::WaterLeakSensor,
        label_key: "sensors.types.water_leak_sensor",
        fallback_label: "Датчик протечки",
        image: "/images/sensors/water_leak_sensor.png",
        thresholds: &WATER_LEAK_THRESHOLDS,
        readings: &WATER_LEAK_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::LightSensor,
        label_key: "sensors.types.light_sensor",
        fallback_label: "Датчик освещённости",
        image: "/images/sensors/light_sensor.png",
        thresholds: &LIGHT_THRESHOLDS,
        readings: &LIGHT_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::AirQualitySensor,
        label_key: "sensors.types.air_quality_sensor",
        fallback_label: "Датчик качества воздуха",
        image: "/images/sensors/air_quality_sensor.png",
        thresholds: &AIR_QUALITY_THRESHOLDS,
        readings: &AIR_QUALITY_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::PowerSensor,
        label_key: "sensors.types.power_sensor",
        fallback_label: "Датчик энергопотребления",
        image: "/images/sensors/power_sensor.png",
        thresholds: &POWER_THRESHOLDS,
        readings: &POWER_READINGS,
    },
    SensorTypeDescriptor {
        sensor_type: SensorType::WeatherSensor,
        label_key: "sensors.types.weather_sensor",
        fallback_label: "Метеостанция",
        image: "/images/sensors/weather_sensor.png",
        thresholds: &WEATHER_THRESHOLDS,
        readings: &WEATHER_READINGS,
    },
];

pub fn sensor_type_descriptor(sensor_type: SensorType) -> &'static SensorTypeDescriptor {
    // Table rows follow `SensorType::ALL` order
    &SENSOR_TYPES[sensor_type as usize]
}

/// Looks up a raw type key; keys outside the fixed set are `UnknownSensorType`.
pub fn get_sensor_type_descriptor(key: &str) -> Result<&'static SensorTypeDescriptor> {
    let sensor_type = key.parse::<SensorType>()?;
    Ok(sensor_type_descriptor(sensor_type))
}

pub fn list_sensor_types(t: &dyn Translator) -> Vec<TypeOption> {
    SENSOR_TYPES
        .iter()
        .map(|d| TypeOption {
            value: d.sensor_type.as_str().to_string(),
            label: d.label(t),
        })
        .collect()
}

pub fn get_default_threshold(sensor_type: SensorType, field: &str) -> Result<ThresholdDefault> {
    sensor_type_descriptor(sensor_type)
        .threshold(field)
        .map(|t| ThresholdDefault {
            value: t.default_value(),
            unit: t.field.unit,
        })
        .ok_or_else(|| DomainError::ThresholdNotFound {
            sensor_type: sensor_type.to_string(),
            field: field.to_string(),
        })
}
