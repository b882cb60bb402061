//! Adapter for HALs implementing the `embedded-hal` 0.2 one-shot ADC traits.

use crate::AdcChannel;

use ::core::{fmt, marker::PhantomData};
use embedded_hal_02::adc::{Channel, OneShot};

/// One pin of a one-shot converter.
///
/// Conversions are started by `read()` and awaited with [`nb::block!`].
pub struct OneShotChannel<ADC, Word, PIN, A> {
    adc: A,
    pin: PIN,
    _marker: PhantomData<(ADC, Word)>,
}

impl<ADC, Word, PIN, A> OneShotChannel<ADC, Word, PIN, A>
where
    PIN: Channel<ADC>,
    A: OneShot<ADC, Word, PIN>,
{
    pub fn new(adc: A, pin: PIN) -> Self {
        Self {
            adc,
            pin,
            _marker: PhantomData,
        }
    }

    pub fn free(self) -> (A, PIN) {
        (self.adc, self.pin)
    }
}

impl<ADC, Word, PIN, A> AdcChannel for OneShotChannel<ADC, Word, PIN, A>
where
    Word: Into<u16>,
    PIN: Channel<ADC>,
    A: OneShot<ADC, Word, PIN>,
    A::Error: fmt::Debug,
{
    type Error = A::Error;

    fn read_raw_sample(&mut self) -> Result<u16, Self::Error> {
        let word = nb::block!(self.adc.read(&mut self.pin))?;
        Ok(word.into())
    }
}
