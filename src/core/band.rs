use ::core::fmt;

use super::defaults;

/// Discrete wetness classification of a raw ADC value.
///
/// Resistive probes conduct better in wet soil, so a higher raw value means
/// drier soil.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WetnessBand {
    VeryWet,
    Wet,
    Medium,
    Dry,
    /// Above the dry breakpoint. Unreachable while the dry breakpoint equals
    /// the maximum raw value, which is the case for the default breakpoints.
    VeryDry,
    Invalid,
}

impl WetnessBand {
    pub fn is_valid(self) -> bool {
        self != WetnessBand::Invalid
    }
}

impl fmt::Display for WetnessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use WetnessBand::*;
        match self {
            VeryWet => write!(f, "Very Wet"),
            Wet => write!(f, "Wet"),
            Medium => write!(f, "Medium"),
            Dry => write!(f, "Dry"),
            VeryDry => write!(f, "Very Dry"),
            Invalid => write!(f, "Invalid"),
        }
    }
}

/// Inclusive upper bounds of the wetness bands in raw ADC units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandThresholds {
    pub very_wet_max: f32,
    pub wet_max: f32,
    pub medium_max: f32,
    pub dry_max: f32,
    /// Samples above this value are rejected as invalid.
    pub max_value: f32,
}

impl BandThresholds {
    pub const fn new() -> Self {
        Self {
            very_wet_max: defaults::VERY_WET_MAX,
            wet_max: defaults::WET_MAX,
            medium_max: defaults::MEDIUM_MAX,
            dry_max: defaults::DRY_MAX,
            max_value: defaults::MAX_ADC_VALUE,
        }
    }

    pub fn classify(&self, adc: f32) -> WetnessBand {
        if adc.is_nan() || adc < 0.0 || adc > self.max_value {
            log::error!("Invalid ADC value: {:.2}", adc);
            return WetnessBand::Invalid;
        }
        if adc <= self.very_wet_max {
            WetnessBand::VeryWet
        } else if adc <= self.wet_max {
            WetnessBand::Wet
        } else if adc <= self.medium_max {
            WetnessBand::Medium
        } else if adc <= self.dry_max {
            WetnessBand::Dry
        } else {
            WetnessBand::VeryDry
        }
    }
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies a raw ADC value against the default breakpoints.
pub fn classify(adc: f32) -> WetnessBand {
    BandThresholds::new().classify(adc)
}
