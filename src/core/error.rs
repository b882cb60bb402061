use ::core::fmt;

/// A raw ADC value outside of the representable range, or NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidSample(f32);

impl InvalidSample {
    pub const fn new(adc: f32) -> Self {
        Self(adc)
    }

    pub const fn adc(self) -> f32 {
        self.0
    }
}

impl fmt::Display for InvalidSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid ADC value: {:.2}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidSample {}

/// Failure of a measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error<E> {
    /// The platform failed to deliver a sample. The remaining samples of
    /// the cycle have been abandoned.
    Adc { sample: u16, source: E },
    /// The averaged sample cannot be classified.
    InvalidSample(InvalidSample),
}

impl<E> From<InvalidSample> for Error<E> {
    fn from(from: InvalidSample) -> Self {
        Error::InvalidSample(from)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Adc { sample, source } => {
                write!(f, "ADC read failed at sample {}: {:?}", sample, source)
            }
            Error::InvalidSample(err) => err.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CalibrationError {
    /// The stored voltage does not allow to compute a resistance, i.e. it is
    /// not strictly between zero and the supply voltage.
    NoSignal,
    /// Clean air ratio or correction factor is not a positive number.
    InvalidReference,
    /// No reference resistance has been established yet.
    NotCalibrated,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CalibrationError::*;
        match self {
            NoSignal => write!(f, "No usable sensor voltage"),
            InvalidReference => write!(f, "Invalid reference ratio"),
            NotCalibrated => write!(f, "Not calibrated"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CalibrationError {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigError {
    DryNotAboveWet,
    UnsupportedResolution(u8),
    NonPositiveReference,
    NoSamples,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConfigError::*;
        match self {
            DryNotAboveWet => write!(f, "Dry calibration point must be above the wet one"),
            UnsupportedResolution(bits) => write!(f, "Unsupported ADC resolution: {} bits", bits),
            NonPositiveReference => write!(f, "Reference voltage must be positive"),
            NoSamples => write!(f, "At least one sample per read is required"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_errors() {
        assert_eq!("Invalid ADC value: -5.00", InvalidSample::new(-5.0).to_string());
        assert_eq!(
            "ADC read failed at sample 3: \"timeout\"",
            Error::Adc {
                sample: 3,
                source: "timeout"
            }
            .to_string()
        );
        assert_eq!(
            "Invalid ADC value: 4096.00",
            Error::<()>::from(InvalidSample::new(4096.0)).to_string()
        );
        assert_eq!(
            "Unsupported ADC resolution: 0 bits",
            ConfigError::UnsupportedResolution(0).to_string()
        );
    }
}
