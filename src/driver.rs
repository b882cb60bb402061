use crate::core::{
    interpolate, raw_to_voltage, AdcChannel, CalibrationError, Error, InvalidSample,
    MoisturePercent, MoistureStatus, SensorConfig, SensorType, Voltage, WetnessBand,
};

use embedded_hal::delay::DelayNs;

pub type ReadResult<T, E> = Result<T, Error<E>>;

/// Where [`SoilSensor::voltage`] takes its value from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VoltageSource {
    /// Average a batch of samples from the ADC.
    Live,
    /// Convert the given raw value without touching the hardware.
    Injected(i32),
    /// Return the voltage of the last conversion.
    Cached,
}

/// Outcome of the most recent measurement cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadStatus {
    /// No measurement cycle has been run yet.
    Pending,
    Ok,
    InvalidSample,
    AdcFailure,
}

/// Status code returned by [`SoilSensor::init`].
///
/// `init` reports `Ok` even if the priming cycle failed, so `Error` is never
/// returned by this crate. The variant keeps the code set of the host
/// interface; the outcome of a cycle is [`ReadStatus`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,
    Error,
}

/// Result of a successful measurement cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Mean raw ADC value
    pub adc: f32,
    pub voltage: Voltage,
    pub moisture: MoisturePercent,
    pub band: WetnessBand,
}

/// Everything the sensor remembers between measurement cycles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadingState {
    pub adc: f32,
    pub voltage: Voltage,
    pub moisture: Option<MoisturePercent>,
    pub band: WetnessBand,
    pub status: ReadStatus,
    pub sensor_resistance_kohm: Option<f32>,
    pub reference_resistance_kohm: Option<f32>,
    pub resistance_ratio: Option<f32>,
    pub correction_factor: f32,
}

impl ReadingState {
    const fn new() -> Self {
        Self {
            adc: 0.0,
            voltage: Voltage::zero(),
            moisture: None,
            band: WetnessBand::Invalid,
            status: ReadStatus::Pending,
            sensor_resistance_kohm: None,
            reference_resistance_kohm: None,
            resistance_ratio: None,
            correction_factor: 1.0,
        }
    }
}

impl Default for ReadingState {
    fn default() -> Self {
        Self::new()
    }
}

/// A resistive soil moisture probe attached to one ADC channel.
///
/// The sensor follows a polling model: [`update`](Self::update) refreshes
/// the stored state and the accessors expose the results.
pub struct SoilSensor<A, D> {
    adc: A,
    delay: D,
    sensor_type: SensorType,
    config: SensorConfig,
    state: ReadingState,
}

impl<A, D> SoilSensor<A, D>
where
    A: AdcChannel,
    D: DelayNs,
{
    /// Bind a sensor to its ADC channel with the defaults of `sensor_type`.
    pub fn new(adc: A, delay: D, sensor_type: SensorType) -> Self {
        Self::with_config(adc, delay, sensor_type, SensorConfig::for_sensor(sensor_type))
    }

    /// Bind a sensor with an explicit configuration.
    ///
    /// Inconsistent configurations are reported in the log but accepted.
    pub fn with_config(adc: A, delay: D, sensor_type: SensorType, config: SensorConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("Questionable {:?} configuration: {}", sensor_type, err);
        }
        Self {
            adc,
            delay,
            sensor_type,
            config,
            state: ReadingState::new(),
        }
    }

    /// Run one measurement cycle to prime the state.
    ///
    /// Always reports [`Status::Ok`]. Whether the cycle succeeded is
    /// available from [`status`](Self::status).
    pub fn init(&mut self) -> Status {
        if let Err(err) = self.read_sensor() {
            log::warn!("Initial reading failed: {}", err);
        }
        Status::Ok
    }

    /// Refresh the state, discarding the outcome.
    ///
    /// Failures are logged and reflected by [`status`](Self::status).
    pub fn update(&mut self) {
        let _ = self.read_sensor();
    }

    /// Acquire a new averaged sample and derive moisture and wetness band.
    pub fn read_sensor(&mut self) -> ReadResult<Reading, A::Error> {
        if let Err(err) = self.voltage(VoltageSource::Live) {
            self.state.status = ReadStatus::AdcFailure;
            return Err(err);
        }
        self.evaluate()
    }

    /// Run a measurement cycle on a raw value supplied by the caller.
    pub fn read_sensor_injected(&mut self, raw: i32) -> ReadResult<Reading, A::Error> {
        self.voltage(VoltageSource::Injected(raw))?;
        self.evaluate()
    }

    /// Obtain the sensor voltage.
    ///
    /// Live and injected values update the stored raw value and voltage.
    /// A failing live read abandons the remaining samples and leaves the
    /// stored state untouched.
    pub fn voltage(&mut self, source: VoltageSource) -> ReadResult<Voltage, A::Error> {
        let raw = match source {
            VoltageSource::Live => self.acquire()?,
            VoltageSource::Injected(raw) => raw as f32,
            VoltageSource::Cached => {
                log::trace!("Cached sensor voltage: {:.2}", self.state.voltage.to_volts());
                return Ok(self.state.voltage);
            }
        };
        let voltage = raw_to_voltage(
            raw,
            self.config.voltage_reference,
            self.config.adc_resolution_bits,
        );
        log::debug!("Sensor voltage: {:.2}", voltage.to_volts());
        self.state.adc = raw;
        self.state.voltage = voltage;
        Ok(voltage)
    }

    /// Moisture of the given raw value according to the configured
    /// calibration points.
    pub fn compute_moisture(&self, adc: f32) -> Result<MoisturePercent, InvalidSample> {
        if self.config.bands.classify(adc) == WetnessBand::Invalid {
            return Err(InvalidSample::new(adc));
        }
        interpolate(self.config.dry_adc_value, self.config.wet_adc_value, adc)
    }

    pub fn classify(&self, adc: f32) -> WetnessBand {
        self.config.bands.classify(adc)
    }

    fn acquire(&mut self) -> ReadResult<f32, A::Error> {
        let samples = self.config.retry_count.max(1);
        let mut sum = 0u32;
        for sample in 0..samples {
            match self.adc.read_raw_sample() {
                Ok(raw) => {
                    log::debug!("ADC value: {}", raw);
                    sum += u32::from(raw);
                }
                Err(source) => {
                    log::error!("ADC read failed at sample {}: {:?}", sample, source);
                    self.adc.release();
                    return Err(Error::Adc { sample, source });
                }
            }
            self.delay.delay_ms(self.config.retry_interval_ms);
        }
        self.adc.release();
        Ok((f64::from(sum) / f64::from(samples)) as f32)
    }

    fn evaluate(&mut self) -> ReadResult<Reading, A::Error> {
        let adc = self.state.adc;
        let voltage = self.state.voltage;
        let band = self.config.bands.classify(adc);
        self.state.band = band;
        if band == WetnessBand::Invalid {
            self.state.moisture = None;
            self.state.status = ReadStatus::InvalidSample;
            return Err(InvalidSample::new(adc).into());
        }
        let moisture =
            match interpolate(self.config.dry_adc_value, self.config.wet_adc_value, adc) {
                Ok(moisture) => moisture,
                Err(err) => {
                    log::error!(
                        "No moisture from calibration points dry = {:.2}, wet = {:.2}",
                        self.config.dry_adc_value,
                        self.config.wet_adc_value
                    );
                    self.state.moisture = None;
                    self.state.status = ReadStatus::InvalidSample;
                    return Err(err.into());
                }
            };
        log::debug!(
            "ADC: {:.2} | Voltage: {:.2} | Moisture: {:.2}% | Range: {}",
            adc,
            voltage.to_volts(),
            moisture.to_percent(),
            band
        );
        self.state.moisture = Some(moisture);
        self.state.status = ReadStatus::Ok;
        Ok(Reading {
            adc,
            voltage,
            moisture,
            band,
        })
    }

    /// Establish the reference resistance R0 from the current voltage.
    ///
    /// The probe is expected to sit in the reference condition described by
    /// `clean_air_ratio` (Rs/R0). The sensor resistance is scaled by
    /// `correction_factor` before it is stored.
    ///
    /// Since R0 is derived from the same Rs, the returned Rs/R0 always
    /// equals `clean_air_ratio`. The measured resistance is available from
    /// [`sensor_resistance_kohm`](Self::sensor_resistance_kohm); later
    /// ratios come from [`measure_ratio`](Self::measure_ratio).
    pub fn calibrate(
        &mut self,
        clean_air_ratio: f32,
        correction_factor: f32,
    ) -> Result<f32, CalibrationError> {
        if !(clean_air_ratio > 0.0 && correction_factor > 0.0) {
            log::error!(
                "Invalid calibration reference: ratio = {}, correction = {}",
                clean_air_ratio,
                correction_factor
            );
            return Err(CalibrationError::InvalidReference);
        }
        let rs = self.divider_resistance_kohm()? * correction_factor;
        let r0 = rs / clean_air_ratio;
        let ratio = rs / r0;
        log::debug!("Calibrated: Rs = {:.3} kOhm | R0 = {:.3} kOhm", rs, r0);
        self.state.sensor_resistance_kohm = Some(rs);
        self.state.reference_resistance_kohm = Some(r0);
        self.state.resistance_ratio = Some(ratio);
        self.state.correction_factor = correction_factor;
        Ok(ratio)
    }

    /// Recompute Rs and Rs/R0 from the current voltage against the
    /// reference established by [`calibrate`](Self::calibrate).
    pub fn measure_ratio(&mut self) -> Result<f32, CalibrationError> {
        let r0 = self
            .state
            .reference_resistance_kohm
            .ok_or(CalibrationError::NotCalibrated)?;
        let rs = self.divider_resistance_kohm()? * self.state.correction_factor;
        let ratio = rs / r0;
        self.state.sensor_resistance_kohm = Some(rs);
        self.state.resistance_ratio = Some(ratio);
        Ok(ratio)
    }

    // Rs = R_L * (Vcc - Vout) / Vout
    fn divider_resistance_kohm(&self) -> Result<f32, CalibrationError> {
        let vout = self.state.voltage.to_volts();
        let vcc = self.config.supply_voltage;
        if !(vout > 0.0 && vout < vcc) {
            log::error!("Cannot derive resistance from {:.2} V at {:.2} V supply", vout, vcc);
            return Err(CalibrationError::NoSignal);
        }
        Ok(self.config.load_resistance_kohm * (vcc - vout) / vout)
    }
}

impl<A, D> SoilSensor<A, D> {
    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn state(&self) -> &ReadingState {
        &self.state
    }

    pub fn status(&self) -> ReadStatus {
        self.state.status
    }

    /// Moisture of the last valid cycle, `None` if the last cycle did not
    /// produce one.
    pub fn moisture(&self) -> Option<MoisturePercent> {
        self.state.moisture
    }

    pub fn moisture_status(&self) -> Option<MoistureStatus> {
        self.state
            .moisture
            .and_then(|moisture| self.config.moisture_status(moisture))
    }

    pub fn last_voltage(&self) -> Voltage {
        self.state.voltage
    }

    /// Mean raw ADC value of the last cycle.
    pub fn last_adc(&self) -> f32 {
        self.state.adc
    }

    pub fn band(&self) -> WetnessBand {
        self.state.band
    }

    pub fn dry_threshold(&self) -> f32 {
        self.config.dry_adc_value
    }

    pub fn wet_threshold(&self) -> f32 {
        self.config.wet_adc_value
    }

    pub fn sensor_resistance_kohm(&self) -> Option<f32> {
        self.state.sensor_resistance_kohm
    }

    pub fn reference_resistance_kohm(&self) -> Option<f32> {
        self.state.reference_resistance_kohm
    }

    pub fn resistance_ratio(&self) -> Option<f32> {
        self.state.resistance_ratio
    }

    /// Inconsistent calibration points are reported in the log but accepted.
    pub fn set_dry_threshold(&mut self, dry_adc_value: f32) {
        self.config.dry_adc_value = dry_adc_value;
        self.warn_on_invalid_config();
    }

    /// Inconsistent calibration points are reported in the log but accepted.
    pub fn set_wet_threshold(&mut self, wet_adc_value: f32) {
        self.config.wet_adc_value = wet_adc_value;
        self.warn_on_invalid_config();
    }

    pub fn set_supply_voltage(&mut self, supply_voltage: f32) {
        self.config.supply_voltage = supply_voltage;
    }

    /// Set the full-scale input range of the converter.
    pub fn set_voltage_reference(&mut self, voltage_reference: f32) {
        self.config.voltage_reference = voltage_reference;
    }

    pub fn set_adc_resolution_bits(&mut self, resolution_bits: u8) {
        self.config.adc_resolution_bits = resolution_bits;
    }

    pub fn set_load_resistance_kohm(&mut self, load_resistance_kohm: f32) {
        self.config.load_resistance_kohm = load_resistance_kohm;
    }

    /// A count of zero is treated as a single sample.
    pub fn set_retry_count(&mut self, retry_count: u16) {
        self.config.retry_count = retry_count;
    }

    pub fn set_retry_interval_ms(&mut self, retry_interval_ms: u32) {
        self.config.retry_interval_ms = retry_interval_ms;
    }

    /// Release the ADC channel and the delay.
    pub fn release(self) -> (A, D) {
        (self.adc, self.delay)
    }

    fn warn_on_invalid_config(&self) {
        if let Err(err) = self.config.validate() {
            log::warn!("Questionable {:?} configuration: {}", self.sensor_type, err);
        }
    }
}
