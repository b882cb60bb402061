//! Polls a simulated probe in drying soil.
//!
//! `RUST_LOG=debug cargo run --example simulated --features mock`

use chrono::{DateTime, Utc};
use env_logger::Builder as LoggerBuilder;
use std::env;

use yl69_soil_sensor::{mock::MockDelay, *};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Measurement<T> {
    ts: DateTime<Utc>,
    val: T,
}

impl<T> Measurement<T> {
    pub fn new(val: T) -> Self {
        Self {
            ts: Utc::now(),
            val,
        }
    }
}

#[derive(Debug)]
struct Glitch;

pub fn main() {
    let mut logger_builder = LoggerBuilder::new();
    if let Ok(rust_log_var) = env::var("RUST_LOG") {
        println!("Parsing RUST_LOG={}", rust_log_var);
        logger_builder.parse_filters(&rust_log_var);
    }
    logger_builder.init();

    // The probe dries out by 37 counts per sample and drops every 23rd
    // conversion.
    let mut counter = 0u16;
    let adc = FnChannel::new(move || {
        counter += 1;
        if counter % 23 == 0 {
            return Err(Glitch);
        }
        Ok(1200 + counter * 37)
    });

    let config = SensorConfig::default().with_sampling(5, 20);
    let mut sensor = SoilSensor::with_config(adc, MockDelay::new(), SensorType::Yl69, config);
    sensor.init();

    let mut last_valid = None;
    for cycle in 0..20 {
        match sensor.read_sensor() {
            Ok(reading) => {
                let measurement = Measurement::new(reading);
                log::info!(
                    "Cycle {}: {:.1}% ({}) at {}",
                    cycle,
                    measurement.val.moisture.to_percent(),
                    measurement.val.band,
                    measurement.ts
                );
                last_valid = Some(measurement);
            }
            Err(err) => {
                log::warn!("Cycle {} failed: {}", cycle, err);
                // Continue and don't leave the control loop!
            }
        }
        if let Some(status) = sensor.moisture_status() {
            if status == MoistureStatus::TooDry {
                log::info!("Soil is too dry, watering advised");
            }
        }
    }

    if let Some(measurement) = last_valid {
        println!("Last valid reading: {:?}", measurement);
    }
    let (_adc, delay) = sensor.release();
    println!("Simulated sampling time: {} ms", delay.total_ms());
}
