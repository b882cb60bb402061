use super::{BandThresholds, ConfigError, MoisturePercent};

/// Compile-time defaults for a YL-69 probe on a 12-bit converter.
pub mod defaults {
    /// ADC value measured in dry soil
    pub const DRY_ADC_VALUE: f32 = 4000.0;
    /// ADC value measured in wet soil
    pub const WET_ADC_VALUE: f32 = 1800.0;
    pub const MAX_ADC_VALUE: f32 = 4095.0;

    pub const VERY_WET_MAX: f32 = 1000.0;
    pub const WET_MAX: f32 = 2000.0;
    pub const MEDIUM_MAX: f32 = 3000.0;
    pub const DRY_MAX: f32 = 4095.0;

    pub const DRY_PERCENT: f32 = 30.0;
    pub const WET_PERCENT: f32 = 60.0;

    pub const VOLTAGE_REFERENCE: f32 = 3.3;
    pub const SUPPLY_VOLTAGE: f32 = 5.0;
    pub const ADC_RESOLUTION_BITS: u8 = 12;
    pub const LOAD_RESISTANCE_KOHM: f32 = 10.0;

    pub const RETRY_COUNT: u16 = 10;
    pub const RETRY_INTERVAL_MS: u32 = 10;

    /// Rs/R0 of the probe in the reference condition
    pub const CLEAN_AIR_RATIO: f32 = 1.0;
}

/// Supported probe variants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum SensorType {
    /// YL-69 / FC-28 resistive probe with analog output
    #[default]
    Yl69,
}

/// Measurement configuration of a sensor.
///
/// Calibration points and breakpoints are in raw ADC units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorConfig {
    pub dry_adc_value: f32,
    pub wet_adc_value: f32,
    pub bands: BandThresholds,
    /// Moisture below this percentage is reported as too dry
    pub dry_percent: f32,
    /// Moisture above this percentage is reported as too wet
    pub wet_percent: f32,
    /// Full-scale input range of the converter
    pub voltage_reference: f32,
    /// Supply voltage of the probe's divider
    pub supply_voltage: f32,
    pub adc_resolution_bits: u8,
    pub load_resistance_kohm: f32,
    /// Number of samples averaged per live read
    pub retry_count: u16,
    /// Pause after every sample
    pub retry_interval_ms: u32,
}

impl SensorConfig {
    /// The defaults shared by all sensor types. Calibration points are left
    /// at zero until a sensor type provides them.
    pub const fn new() -> Self {
        Self {
            dry_adc_value: 0.0,
            wet_adc_value: 0.0,
            bands: BandThresholds::new(),
            dry_percent: defaults::DRY_PERCENT,
            wet_percent: defaults::WET_PERCENT,
            voltage_reference: defaults::VOLTAGE_REFERENCE,
            supply_voltage: defaults::SUPPLY_VOLTAGE,
            adc_resolution_bits: defaults::ADC_RESOLUTION_BITS,
            load_resistance_kohm: defaults::LOAD_RESISTANCE_KOHM,
            retry_count: defaults::RETRY_COUNT,
            retry_interval_ms: defaults::RETRY_INTERVAL_MS,
        }
    }

    pub fn for_sensor(sensor_type: SensorType) -> Self {
        let config = Self::new();
        match sensor_type {
            SensorType::Yl69 => config.with_calibration(defaults::DRY_ADC_VALUE, defaults::WET_ADC_VALUE),
        }
    }

    pub fn with_calibration(mut self, dry_adc_value: f32, wet_adc_value: f32) -> Self {
        self.dry_adc_value = dry_adc_value;
        self.wet_adc_value = wet_adc_value;
        self
    }

    pub fn with_bands(mut self, bands: BandThresholds) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_percent_thresholds(mut self, dry_percent: f32, wet_percent: f32) -> Self {
        self.dry_percent = dry_percent;
        self.wet_percent = wet_percent;
        self
    }

    pub fn with_adc(mut self, voltage_reference: f32, resolution_bits: u8) -> Self {
        self.voltage_reference = voltage_reference;
        self.adc_resolution_bits = resolution_bits;
        self
    }

    pub fn with_supply_voltage(mut self, supply_voltage: f32) -> Self {
        self.supply_voltage = supply_voltage;
        self
    }

    pub fn with_load_resistance_kohm(mut self, load_resistance_kohm: f32) -> Self {
        self.load_resistance_kohm = load_resistance_kohm;
        self
    }

    pub fn with_sampling(mut self, retry_count: u16, retry_interval_ms: u32) -> Self {
        self.retry_count = retry_count;
        self.retry_interval_ms = retry_interval_ms;
        self
    }

    /// Checks the configuration for values the measurement cannot cope with.
    ///
    /// Reports the first problem found.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dry_adc_value > self.wet_adc_value) {
            return Err(ConfigError::DryNotAboveWet);
        }
        if !(1..=16).contains(&self.adc_resolution_bits) {
            return Err(ConfigError::UnsupportedResolution(self.adc_resolution_bits));
        }
        if !(self.voltage_reference > 0.0) {
            return Err(ConfigError::NonPositiveReference);
        }
        if self.retry_count == 0 {
            return Err(ConfigError::NoSamples);
        }
        Ok(())
    }

    /// `None` for values outside of the percentage range.
    pub fn moisture_status(&self, moisture: MoisturePercent) -> Option<MoistureStatus> {
        if !moisture.is_valid() {
            return None;
        }
        let percent = moisture.to_percent();
        let status = if percent < self.dry_percent {
            MoistureStatus::TooDry
        } else if percent > self.wet_percent {
            MoistureStatus::TooWet
        } else {
            MoistureStatus::Optimal
        };
        Some(status)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::for_sensor(SensorType::default())
    }
}

/// Moisture relative to the configured percent thresholds.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MoistureStatus {
    TooDry,
    Optimal,
    TooWet,
}
