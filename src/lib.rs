#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Driver for YL-69 style resistive soil moisture sensors.
//!
//! The driver averages a fixed number of raw samples from an analog channel,
//! converts the mean into a voltage, classifies it into a [`WetnessBand`] and
//! interpolates a moisture percentage between the dry and wet calibration
//! points.
//!
//! Platform access is reduced to two capabilities: an [`AdcChannel`] that
//! yields one raw sample per call and an [`embedded_hal::delay::DelayNs`]
//! used for pacing between samples.
//!
//! ```
//! use embedded_hal::delay::DelayNs;
//! use yl69_soil_sensor::{FnChannel, SensorType, SoilSensor, WetnessBand};
//!
//! struct BusyWait;
//!
//! impl DelayNs for BusyWait {
//!     fn delay_ns(&mut self, _ns: u32) {}
//! }
//!
//! let adc = FnChannel::new(|| Ok::<u16, ()>(2900));
//! let mut sensor = SoilSensor::new(adc, BusyWait, SensorType::Yl69);
//! sensor.init();
//!
//! assert_eq!(WetnessBand::Medium, sensor.band());
//! assert!((sensor.moisture().unwrap().to_percent() - 50.0).abs() < 0.01);
//! ```

/// The no_std enclave
pub mod core;

pub use self::core::*;

mod driver;

pub use self::driver::*;

#[cfg(feature = "embedded-hal-02")]
pub mod oneshot;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
