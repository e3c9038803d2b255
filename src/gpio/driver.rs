//! # Register driver
//!
//! [`Gpio`] owns a [`RegisterInterface`] and runs every operation in the same
//! order: check the descriptor is present, validate its port and pin, check
//! the mode allows the operation, look up the register block, and only then
//! touch a register. A failing check never leaves a partial write behind.
//!
//! Descriptors are passed as `impl Into<Option<&PinDescriptor>>`, so both
//! `&desc` and an `Option<&PinDescriptor>` are accepted. A missing descriptor
//! is reported as [`Error::NullDescriptor`], a malformed one as
//! [`Error::InvalidArgument`].
//!
//! # Embedded HAL traits
//!
//! [`Gpio::pin`] borrows the driver together with a descriptor and returns a
//! [`GpioPin`], which implements [`InputPin`], [`OutputPin`],
//! [`StatefulOutputPin`] and [`ToggleableOutputPin`]. As with the value-level
//! pins the mode is only known at run-time, so the trait functions return
//! [`Error::WrongMode`] instead of being infallible.
use super::pins::{Error, Mode, PinDescriptor, PinState, Port};
use super::reg::{ConfigFields, RegisterBlock, RegisterInterface, WritePolicy};
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

//==================================================================================================
//  Configuration
//==================================================================================================

/// Run-time configuration of the driver
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig {
    /// How [`Gpio::configure`] writes the configuration registers
    pub write_policy: WritePolicy,
}

impl GpioConfig {
    pub const fn new(write_policy: WritePolicy) -> Self {
        GpioConfig { write_policy }
    }
}

//==================================================================================================
//  Access
//==================================================================================================

/// Register access performed after validation
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Access {
    Set,
    Clear,
    Toggle,
    Read,
    ReadOutput,
}

impl Access {
    #[inline]
    fn required_mode(self) -> Mode {
        match self {
            Access::Read => Mode::Input,
            Access::Set | Access::Clear | Access::Toggle | Access::ReadOutput => Mode::Output,
        }
    }

    /// Returns the pin level for reads and 0 for writes
    #[inline]
    fn perform(self, block: &RegisterBlock, pin: u8) -> u32 {
        let mask = 1 << pin;
        match self {
            Access::Set => {
                block.odr.modify(|r| r | mask);
                0
            }
            Access::Clear => {
                block.odr.modify(|r| r & !mask);
                0
            }
            Access::Toggle => {
                block.odr.modify(|r| r ^ mask);
                0
            }
            Access::Read => (block.idr.read() >> pin) & 0x01,
            Access::ReadOutput => (block.odr.read() >> pin) & 0x01,
        }
    }
}

/// Presence and range checks shared by every operation
#[inline]
fn check(desc: Option<&PinDescriptor>) -> Result<(&PinDescriptor, Port), Error> {
    let desc = desc.ok_or(Error::NullDescriptor)?;
    let port = desc.validate()?;
    Ok((desc, port))
}

#[inline]
fn level(bit: u32) -> PinState {
    PinState::from(bit == 1)
}

//==================================================================================================
//  Gpio
//==================================================================================================

/// GPIO driver for all ports of the chip
pub struct Gpio<R> {
    regs: R,
    config: GpioConfig,
}

impl<R: RegisterInterface> Gpio<R> {
    /// Create a driver with the default [`GpioConfig`]
    #[inline]
    pub fn new(regs: R) -> Self {
        Self::with_config(regs, GpioConfig::default())
    }

    #[inline]
    pub fn with_config(regs: R, config: GpioConfig) -> Self {
        Gpio { regs, config }
    }

    #[inline]
    pub fn config(&self) -> GpioConfig {
        self.config
    }

    #[inline]
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Release the register file
    #[inline]
    pub fn release(self) -> R {
        self.regs
    }

    /// Program mode, output type, speed and pull of a pin
    ///
    /// Only the configuration registers of the descriptor's port are written.
    /// Whether the previous field contents are cleared first depends on the
    /// [`WritePolicy`] of the driver.
    pub fn configure<'d>(
        &mut self,
        desc: impl Into<Option<&'d PinDescriptor>>,
    ) -> Result<(), Error> {
        let (desc, port) = check(desc.into())?;
        let fields = ConfigFields::from(desc);
        let policy = self.config.write_policy;
        self.regs
            .with_block(port, |block| block.configure_pin(desc.pin, fields, policy))
            .ok_or(Error::UnsupportedPort)
    }

    /// Drive an output pin high
    #[inline]
    pub fn set_high<'d>(&mut self, desc: impl Into<Option<&'d PinDescriptor>>) -> Result<(), Error> {
        self.access(desc.into(), Access::Set).map(|_| ())
    }

    /// Drive an output pin low
    #[inline]
    pub fn set_low<'d>(&mut self, desc: impl Into<Option<&'d PinDescriptor>>) -> Result<(), Error> {
        self.access(desc.into(), Access::Clear).map(|_| ())
    }

    /// Invert the output level of an output pin
    #[inline]
    pub fn toggle<'d>(&mut self, desc: impl Into<Option<&'d PinDescriptor>>) -> Result<(), Error> {
        self.access(desc.into(), Access::Toggle).map(|_| ())
    }

    /// Sample the input data register bit of an input pin
    #[inline]
    pub fn read<'d>(&self, desc: impl Into<Option<&'d PinDescriptor>>) -> Result<PinState, Error> {
        self.access(desc.into(), Access::Read).map(level)
    }

    /// Level last written to the output data register for an output pin
    #[inline]
    pub fn output_level<'d>(
        &self,
        desc: impl Into<Option<&'d PinDescriptor>>,
    ) -> Result<PinState, Error> {
        self.access(desc.into(), Access::ReadOutput).map(level)
    }

    /// Borrow the driver as an embedded HAL pin
    #[inline]
    pub fn pin<'a>(&'a mut self, desc: &'a PinDescriptor) -> GpioPin<'a, R> {
        GpioPin { gpio: self, desc }
    }

    fn access(&self, desc: Option<&PinDescriptor>, access: Access) -> Result<u32, Error> {
        let (desc, port) = check(desc)?;
        if desc.mode != access.required_mode() {
            return Err(Error::WrongMode);
        }
        self.regs
            .with_block(port, |block| access.perform(block, desc.pin))
            .ok_or(Error::UnsupportedPort)
    }
}

//==================================================================================================
//  GpioPin
//==================================================================================================

/// A [`PinDescriptor`] bound to a driver
pub struct GpioPin<'a, R> {
    gpio: &'a mut Gpio<R>,
    desc: &'a PinDescriptor,
}

impl<R> GpioPin<'_, R> {
    #[inline]
    pub fn descriptor(&self) -> &PinDescriptor {
        self.desc
    }
}

impl<R: RegisterInterface> OutputPin for GpioPin<'_, R> {
    type Error = Error;
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_high(self.desc)
    }
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.gpio.set_low(self.desc)
    }
}

impl<R: RegisterInterface> StatefulOutputPin for GpioPin<'_, R> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        self.gpio.output_level(self.desc).map(bool::from)
    }
    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        self.is_set_high().map(|v| !v)
    }
}

impl<R: RegisterInterface> ToggleableOutputPin for GpioPin<'_, R> {
    type Error = Error;
    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.gpio.toggle(self.desc)
    }
}

impl<R: RegisterInterface> InputPin for GpioPin<'_, R> {
    type Error = Error;
    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        self.gpio.read(self.desc).map(bool::from)
    }
    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.is_high().map(|v| !v)
    }
}
