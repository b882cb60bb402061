//! Simulated hardware for host side tests and demos.

use crate::AdcChannel;

use embedded_hal::delay::DelayNs;

/// Replays a fixed sequence of sample results.
///
/// Once the sequence is exhausted the last result is repeated. An empty
/// sequence yields [`MockError::Exhausted`].
#[derive(Debug)]
pub struct MockAdc<'a, E = MockError> {
    samples: &'a [Result<u16, E>],
    reads: usize,
    releases: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MockError {
    Exhausted,
    Timeout,
}

impl<'a, E> MockAdc<'a, E> {
    pub const fn new(samples: &'a [Result<u16, E>]) -> Self {
        Self {
            samples,
            reads: 0,
            releases: 0,
        }
    }

    /// Number of samples requested so far.
    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn releases(&self) -> usize {
        self.releases
    }
}

impl<'a, E> AdcChannel for MockAdc<'a, E>
where
    E: Clone + ::core::fmt::Debug + From<MockError>,
{
    type Error = E;

    fn read_raw_sample(&mut self) -> Result<u16, E> {
        let index = self.reads.min(self.samples.len().saturating_sub(1));
        self.reads += 1;
        match self.samples.get(index) {
            Some(sample) => sample.clone(),
            None => Err(MockError::Exhausted.into()),
        }
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

/// Records requested delays instead of blocking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockDelay {
    total_ns: u64,
    calls: usize,
}

impl MockDelay {
    pub const fn new() -> Self {
        Self {
            total_ns: 0,
            calls: 0,
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }

    /// Number of individual delay requests.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}
