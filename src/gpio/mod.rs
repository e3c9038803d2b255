//! # GPIO module
//!
//! The driver is split into three parts:
//!
//! - [`pins`]: the value-level [`PinDescriptor`] which describes the desired
//!   electrical configuration of one pin, plus the port and field enums.
//! - [`reg`]: the register block layout and the [`RegisterInterface`] which
//!   maps a [`Port`] to its register block. [`GpioRegisters`] maps to the
//!   memory-mapped hardware, [`SimRegisters`] to an in-memory register file.
//! - [`driver`]: [`Gpio`], which validates descriptors, encodes configuration
//!   into the register bitfields and performs set/clear/toggle/read.
//!
//! A descriptor is only ever read by the driver. Every call revalidates it, so
//! an out-of-range port or pin is rejected before any register is touched.
//!
//! ```no_run
//! use stm32f411_gpio::gpio::{Gpio, GpioRegisters, PinDescriptor, PortId};
//!
//! let mut gpio = Gpio::new(GpioRegisters::take().unwrap());
//! let led = PinDescriptor::new(13, PortId::C).into_output();
//! gpio.configure(&led).unwrap();
//! gpio.toggle(&led).unwrap();
//! ```
//!
//! ## Concurrency
//!
//! Set, clear and toggle are read-modify-write sequences on the output data
//! register and are not atomic. The driver does no locking. If an interrupt
//! handler touches the same port, wrap the register file in [`Guarded`], which
//! runs every register access inside `critical_section::with`.
pub mod driver;
pub use driver::*;

pub mod pins;
pub use pins::*;

pub mod reg;
pub use reg::{Guarded, GpioRegisters, Reg, RegisterBlock, RegisterInterface, WritePolicy};

pub mod sim;
pub use sim::SimRegisters;
