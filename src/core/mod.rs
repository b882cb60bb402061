mod adc;
mod band;
mod config;
mod error;

pub use self::{adc::*, band::*, config::*, error::*};

/// Electric potential at the ADC input.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Voltage(f32);

impl Voltage {
    pub const fn from_volts(volts: f32) -> Self {
        Self(volts)
    }

    pub const fn to_volts(self) -> f32 {
        self.0
    }

    pub const fn zero() -> Self {
        Self(0.0)
    }
}

impl From<f32> for Voltage {
    fn from(from: f32) -> Self {
        Voltage(from)
    }
}

impl From<Voltage> for f32 {
    fn from(from: Voltage) -> Self {
        from.0
    }
}

/// Converts a (mean) raw ADC value into a voltage.
///
/// `voltage = raw * reference / (2^bits - 1)`
///
/// The reference voltage is the full-scale range of the converter, which is
/// independent of the supply voltage of the sensor itself. Resolutions
/// outside of `1..=31` bits yield NaN.
pub fn raw_to_voltage(raw: f32, reference_volts: f32, resolution_bits: u8) -> Voltage {
    Voltage::from_volts(raw * reference_volts / full_scale(resolution_bits))
}

/// The largest raw value a converter with the given resolution can produce.
pub fn full_scale(resolution_bits: u8) -> f32 {
    match 1u32.checked_shl(u32::from(resolution_bits)) {
        Some(levels) if resolution_bits > 0 => (levels - 1) as f32,
        _ => f32::NAN,
    }
}

/// Soil moisture in percent, where 0% corresponds to the dry and 100% to the
/// wet calibration point.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct MoisturePercent(f32);

impl MoisturePercent {
    pub const fn from_percent(percent: f32) -> Self {
        Self(percent)
    }

    pub const fn to_percent(self) -> f32 {
        self.0
    }

    pub const fn min_percent() -> f32 {
        0.0
    }

    pub const fn max_percent() -> f32 {
        100.0
    }

    pub const fn min() -> Self {
        Self::from_percent(Self::min_percent())
    }

    pub const fn max() -> Self {
        Self::from_percent(Self::max_percent())
    }

    pub fn is_valid(self) -> bool {
        self >= Self::min() && self <= Self::max()
    }
}

impl From<MoisturePercent> for f32 {
    fn from(from: MoisturePercent) -> Self {
        from.0
    }
}

/// Linear interpolation between the dry (0%) and wet (100%) calibration
/// points, clamped to the valid percentage range.
///
/// The sample is classified first and rejected if it is not a valid raw
/// value. The calibration points are expected to satisfy `dry > wet`;
/// coinciding or non-numeric calibration points reject every sample.
pub fn moisture_percent(
    dry: f32,
    wet: f32,
    adc: f32,
) -> ::core::result::Result<MoisturePercent, InvalidSample> {
    if classify(adc) == WetnessBand::Invalid {
        return Err(InvalidSample::new(adc));
    }
    interpolate(dry, wet, adc)
}

pub(crate) fn interpolate(
    dry: f32,
    wet: f32,
    adc: f32,
) -> ::core::result::Result<MoisturePercent, InvalidSample> {
    let span = dry - wet;
    let percent = (dry - adc) / span * MoisturePercent::max_percent();
    if span == 0.0 || percent.is_nan() {
        return Err(InvalidSample::new(adc));
    }
    Ok(MoisturePercent::from_percent(percent.clamp(
        MoisturePercent::min_percent(),
        MoisturePercent::max_percent(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(expected: f32, actual: f32) -> bool {
        (expected - actual).abs() < 1e-3
    }

    #[test]
    fn moisture_percent_range() {
        for i in 0..=100 {
            let moisture = MoisturePercent::from_percent(i as f32);
            assert!(moisture.is_valid());
        }
        assert!(!MoisturePercent::from_percent(-0.5).is_valid());
        assert!(!MoisturePercent::from_percent(100.01).is_valid());
        assert!(!MoisturePercent::from_percent(f32::NAN).is_valid());
        // Interpolated values are clamped into the valid range
        for adc in [0.0, 1000.0, 1800.0, 4000.0, 4095.0] {
            assert!(moisture_percent(4000.0, 1800.0, adc).unwrap().is_valid());
        }
        // Inverted calibration points still stay within range
        assert!(moisture_percent(1800.0, 4000.0, 2900.0).unwrap().is_valid());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn convert_raw_to_voltage() {
        assert!(approx_eq(1.4505, raw_to_voltage(1800.0, 3.3, 12).to_volts()));
        assert!(approx_eq(3.3, raw_to_voltage(4095.0, 3.3, 12).to_volts()));
        assert!(approx_eq(3.3, raw_to_voltage(1023.0, 3.3, 10).to_volts()));
        assert_eq!(0.0, raw_to_voltage(0.0, 3.3, 12).to_volts());
        // Negative samples are still converted numerically
        assert!(raw_to_voltage(-5.0, 3.3, 12).to_volts() < 0.0);
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn full_scale_of_resolution() {
        assert_eq!(1.0, full_scale(1));
        assert_eq!(1023.0, full_scale(10));
        assert_eq!(4095.0, full_scale(12));
        assert_eq!(65535.0, full_scale(16));
        assert!(full_scale(0).is_nan());
        assert!(full_scale(32).is_nan());
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn interpolate_between_calibration_points() {
        assert_eq!(0.0, moisture_percent(4000.0, 1800.0, 4000.0).unwrap().to_percent());
        assert_eq!(100.0, moisture_percent(4000.0, 1800.0, 1800.0).unwrap().to_percent());
        assert_eq!(50.0, moisture_percent(4000.0, 1800.0, 2900.0).unwrap().to_percent());
        // Clamped beyond the calibration points
        assert_eq!(0.0, moisture_percent(4000.0, 1800.0, 4095.0).unwrap().to_percent());
        assert_eq!(100.0, moisture_percent(4000.0, 1800.0, 0.0).unwrap().to_percent());
    }

    #[test]
    fn moisture_is_non_increasing() {
        let mut last = f32::INFINITY;
        for adc in 0..=4095 {
            let moisture = moisture_percent(4000.0, 1800.0, adc as f32)
                .unwrap()
                .to_percent();
            assert!(moisture <= last);
            assert!(MoisturePercent::from_percent(moisture).is_valid());
            last = moisture;
        }
    }

    #[test]
    fn reject_invalid_samples() {
        assert_eq!(
            Err(InvalidSample::new(-5.0)),
            moisture_percent(4000.0, 1800.0, -5.0)
        );
        assert_eq!(
            Err(InvalidSample::new(4096.0)),
            moisture_percent(4000.0, 1800.0, 4096.0)
        );
        assert!(moisture_percent(4000.0, 1800.0, f32::NAN).is_err());
    }

    #[test]
    fn reject_degenerate_calibration() {
        assert_eq!(
            Err(InvalidSample::new(2000.0)),
            moisture_percent(2000.0, 2000.0, 2000.0)
        );
        assert_eq!(
            Err(InvalidSample::new(1500.0)),
            moisture_percent(2000.0, 2000.0, 1500.0)
        );
        assert!(moisture_percent(f32::NAN, 1800.0, 2000.0).is_err());
    }
}
