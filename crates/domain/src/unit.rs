use serde::{Deserialize, Serialize};

use crate::i18n::Translator;

/// Measurement unit attached to fields, thresholds and readings.
///
/// `symbol` is locale independent; `label` is what the UI shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    Percent,
    PercentLel,
    Ppm,
    MicrogramPerCubicMeter,
    Lux,
    Watt,
    Volt,
    Ampere,
    MeterPerSecond,
    MillimeterPerHour,
    MillimeterOfMercury,
    LiterPerMinute,
    CubicMeterPerHour,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Percent => "%",
            Self::PercentLel => "%LEL",
            Self::Ppm => "ppm",
            Self::MicrogramPerCubicMeter => "µg/m³",
            Self::Lux => "lux",
            Self::Watt => "W",
            Self::Volt => "V",
            Self::Ampere => "A",
            Self::MeterPerSecond => "m/s",
            Self::MillimeterPerHour => "mm/h",
            Self::MillimeterOfMercury => "mmHg",
            Self::LiterPerMinute => "l/min",
            Self::CubicMeterPerHour => "m³/h",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Celsius => "units.celsius",
            Self::Percent => "units.percent",
            Self::PercentLel => "units.percentLel",
            Self::Ppm => "units.ppm",
            Self::MicrogramPerCubicMeter => "units.microgramPerCubicMeter",
            Self::Lux => "units.lux",
            Self::Watt => "units.watt",
            Self::Volt => "units.volt",
            Self::Ampere => "units.ampere",
            Self::MeterPerSecond => "units.meterPerSecond",
            Self::MillimeterPerHour => "units.millimeterPerHour",
            Self::MillimeterOfMercury => "units.millimeterOfMercury",
            Self::LiterPerMinute => "units.literPerMinute",
            Self::CubicMeterPerHour => "units.cubicMeterPerHour",
        }
    }

    fn fallback_label(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Percent => "%",
            Self::PercentLel => "%LEL",
            Self::Ppm => "ppm",
            Self::MicrogramPerCubicMeter => "мкг/м³",
            Self::Lux => "лк",
            Self::Watt => "Вт",
            Self::Volt => "В",
            Self::Ampere => "А",
            Self::MeterPerSecond => "м/с",
            Self::MillimeterPerHour => "мм/ч",
            Self::MillimeterOfMercury => "мм рт. ст.",
            Self::LiterPerMinute => "л/мин",
            Self::CubicMeterPerHour => "м³/ч",
        }
    }

    /// Display label in the translator's locale.
    pub fn label(&self, t: &dyn Translator) -> String {
        t.translate(self.key(), self.fallback_label())
    }
}
