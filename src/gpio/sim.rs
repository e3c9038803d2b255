//! # In-memory register file
//!
//! [`SimRegisters`] holds one [`RegisterBlock`] per port in RAM and plugs into
//! the driver through the same [`RegisterInterface`] as the hardware. It lets
//! the driver run on a host, and lets tests drive input levels and inspect
//! every register.
//!
//! ```
//! use stm32f411_gpio::gpio::{Gpio, PinDescriptor, PinState, Port, PortId, Reg, SimRegisters};
//!
//! let gpio = Gpio::new(SimRegisters::new());
//! let button = PinDescriptor::new(0, PortId::A);
//! gpio.registers().drive_input(Port::A, 0, PinState::High).unwrap();
//! assert_eq!(gpio.read(&button), Ok(PinState::High));
//! assert_eq!(gpio.registers().register(Port::A, Reg::Idr), 0x1);
//! ```
use super::pins::{Error, PinState, Port, LAST_PIN, NUM_PORTS};
use super::reg::{Reg, RegisterBlock, RegisterInterface};
use crate::Sealed;

/// Contents of every register of one block, in address order
pub type Snapshot = [u32; Reg::COUNT];

/// Simulated GPIO register file with all registers cleared on creation
pub struct SimRegisters {
    blocks: [RegisterBlock; NUM_PORTS],
}

impl SimRegisters {
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const CLEARED: RegisterBlock = RegisterBlock::zeroed();
        SimRegisters {
            blocks: [CLEARED; NUM_PORTS],
        }
    }

    #[inline]
    fn port_block(&self, port: Port) -> &RegisterBlock {
        &self.blocks[port as usize]
    }

    /// Current value of a register
    #[inline]
    pub fn register(&self, port: Port, reg: Reg) -> u32 {
        self.port_block(port).reg(reg).read()
    }

    /// Overwrite a register, e.g. to load the reset values of the chip
    #[inline]
    pub fn set_register(&self, port: Port, reg: Reg, value: u32) {
        self.port_block(port).reg(reg).write(value)
    }

    /// Apply an external level to a pin by updating the input data register
    ///
    /// Returns [`Error::InvalidArgument`] for pins above [`LAST_PIN`].
    pub fn drive_input(&self, port: Port, pin: u8, level: PinState) -> Result<(), Error> {
        if pin > LAST_PIN {
            return Err(Error::InvalidArgument);
        }
        let mask = 1 << pin;
        self.port_block(port).idr.modify(|r| match level {
            PinState::High => r | mask,
            PinState::Low => r & !mask,
        });
        Ok(())
    }

    /// Copy of all registers of a port
    pub fn snapshot(&self, port: Port) -> Snapshot {
        let block = self.port_block(port);
        Reg::ALL.map(|reg| block.reg(reg).read())
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl Sealed for SimRegisters {}

impl RegisterInterface for SimRegisters {
    #[inline]
    fn block(&self, port: Port) -> Option<&RegisterBlock> {
        Some(self.port_block(port))
    }
}
