use ::core::fmt;

/// A single analog input that delivers one raw sample per call.
///
/// Implementations own all platform specific sequencing (channel setup,
/// conversion start, polling). The driver only calls
/// [`read_raw_sample`](AdcChannel::read_raw_sample) repeatedly and
/// [`release`](AdcChannel::release) once after each batch of samples.
pub trait AdcChannel {
    type Error: fmt::Debug;

    /// Perform a blocking conversion and return the raw value.
    fn read_raw_sample(&mut self) -> Result<u16, Self::Error>;

    /// Called after the last sample of a batch, whether or not the batch
    /// completed.
    fn release(&mut self) {}
}

impl<A: AdcChannel + ?Sized> AdcChannel for &mut A {
    type Error = A::Error;

    fn read_raw_sample(&mut self) -> Result<u16, Self::Error> {
        (**self).read_raw_sample()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Adapter for platforms that expose a single blocking read primitive,
/// e.g. `analogRead()`.
pub struct FnChannel<F> {
    read: F,
}

impl<F> FnChannel<F> {
    pub const fn new(read: F) -> Self {
        Self { read }
    }

    pub fn into_inner(self) -> F {
        self.read
    }
}

impl<F, E> AdcChannel for FnChannel<F>
where
    F: FnMut() -> Result<u16, E>,
    E: fmt::Debug,
{
    type Error = E;

    fn read_raw_sample(&mut self) -> Result<u16, E> {
        (self.read)()
    }
}

/// Converters that are driven explicitly: start a conversion, wait for it
/// to complete and fetch the result.
pub trait ConversionSequence {
    type Error: fmt::Debug;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn poll_for_conversion(&mut self, timeout_ms: u32) -> Result<(), Self::Error>;

    fn value(&mut self) -> Result<u16, Self::Error>;

    fn stop(&mut self);
}

/// Step of the conversion sequence that failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SequenceStep {
    Start,
    Poll,
    Fetch,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SequenceError<E> {
    pub step: SequenceStep,
    pub source: E,
}

impl<E: fmt::Debug> fmt::Display for SequenceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SequenceStep::*;
        match self.step {
            Start => write!(f, "ADC start failed with status: {:?}", self.source),
            Poll => write!(
                f,
                "ADC poll for conversion failed with status: {:?}",
                self.source
            ),
            Fetch => write!(f, "ADC get value failed with status: {:?}", self.source),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for SequenceError<E> {}

pub const DEFAULT_CONVERSION_TIMEOUT_MS: u32 = 10;

/// Turns a [`ConversionSequence`] into an [`AdcChannel`].
///
/// Every sample runs start, poll and fetch. The converter is stopped on
/// release.
pub struct Sequenced<C> {
    converter: C,
    timeout_ms: u32,
}

impl<C: ConversionSequence> Sequenced<C> {
    pub const fn new(converter: C) -> Self {
        Self::with_timeout(converter, DEFAULT_CONVERSION_TIMEOUT_MS)
    }

    pub const fn with_timeout(converter: C, timeout_ms: u32) -> Self {
        Self {
            converter,
            timeout_ms,
        }
    }

    pub fn into_inner(self) -> C {
        self.converter
    }
}

impl<C: ConversionSequence> AdcChannel for Sequenced<C> {
    type Error = SequenceError<C::Error>;

    fn read_raw_sample(&mut self) -> Result<u16, Self::Error> {
        self.converter.start().map_err(|source| SequenceError {
            step: SequenceStep::Start,
            source,
        })?;
        self.converter
            .poll_for_conversion(self.timeout_ms)
            .map_err(|source| SequenceError {
                step: SequenceStep::Poll,
                source,
            })?;
        self.converter.value().map_err(|source| SequenceError {
            step: SequenceStep::Fetch,
            source,
        })
    }

    fn release(&mut self) {
        self.converter.stop();
    }
}
