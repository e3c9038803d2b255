//! Register-level GPIO driver for the STM32F411CE
//!
//! The chip exposes three GPIO blocks on the target package: all of port A and
//! port B, and pins 13 to 15 of port C. See the [`gpio`] module for the driver.
#![no_std]

pub mod gpio;
pub mod prelude;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;
