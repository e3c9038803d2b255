use super::pins::{Port, PinDescriptor};
use crate::Sealed;
use core::cell::UnsafeCell;
use core::mem::offset_of;
use core::ptr;

//==================================================================================================
//  Register block
//==================================================================================================

/// A single 32-bit register. All accesses are volatile.
#[repr(transparent)]
pub struct Register(UnsafeCell<u32>);

impl Register {
    #[inline]
    const fn new(value: u32) -> Self {
        Register(UnsafeCell::new(value))
    }

    #[inline(always)]
    pub fn read(&self) -> u32 {
        // Safety: the cell is either a memory-mapped register or owned RAM
        unsafe { ptr::read_volatile(self.0.get()) }
    }

    #[inline(always)]
    pub fn write(&self, value: u32) {
        unsafe { ptr::write_volatile(self.0.get(), value) }
    }

    /// Read-modify-write. This is not atomic, see [`Guarded`].
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()))
    }
}

/// Register layout of one GPIO block, starting at the port base address
#[repr(C)]
pub struct RegisterBlock {
    /// Mode configuration, 2 bits per pin
    pub moder: Register,
    /// Output type configuration, 1 bit per pin
    pub otyper: Register,
    /// Output speed configuration, 2 bits per pin
    pub ospeedr: Register,
    /// Pull-up/pull-down configuration, 2 bits per pin
    pub pupdr: Register,
    /// Input data
    pub idr: Register,
    /// Output data
    pub odr: Register,
    pub bsrr: Register,
    pub lckr: Register,
    /// Alternate function select, pins 0 to 7
    pub afrl: Register,
    /// Alternate function select, pins 8 to 15
    pub afrh: Register,
}

const _: () = {
    assert!(offset_of!(RegisterBlock, moder) == 0x00);
    assert!(offset_of!(RegisterBlock, otyper) == 0x04);
    assert!(offset_of!(RegisterBlock, ospeedr) == 0x08);
    assert!(offset_of!(RegisterBlock, pupdr) == 0x0C);
    assert!(offset_of!(RegisterBlock, idr) == 0x10);
    assert!(offset_of!(RegisterBlock, odr) == 0x14);
    assert!(offset_of!(RegisterBlock, bsrr) == 0x18);
    assert!(offset_of!(RegisterBlock, lckr) == 0x1C);
    assert!(offset_of!(RegisterBlock, afrl) == 0x20);
    assert!(offset_of!(RegisterBlock, afrh) == 0x24);
};

/// Value-level name of a register inside a [`RegisterBlock`]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reg {
    Moder,
    Otyper,
    Ospeedr,
    Pupdr,
    Idr,
    Odr,
    Bsrr,
    Lckr,
    Afrl,
    Afrh,
}

impl Reg {
    pub const COUNT: usize = 10;

    /// Every register, in address order
    pub const ALL: [Reg; Reg::COUNT] = [
        Reg::Moder,
        Reg::Otyper,
        Reg::Ospeedr,
        Reg::Pupdr,
        Reg::Idr,
        Reg::Odr,
        Reg::Bsrr,
        Reg::Lckr,
        Reg::Afrl,
        Reg::Afrh,
    ];

    /// Byte offset from the port base address
    #[inline]
    pub const fn offset(self) -> usize {
        self as usize * 4
    }
}

impl RegisterBlock {
    /// Register block with every register cleared
    pub(crate) const fn zeroed() -> Self {
        RegisterBlock {
            moder: Register::new(0),
            otyper: Register::new(0),
            ospeedr: Register::new(0),
            pupdr: Register::new(0),
            idr: Register::new(0),
            odr: Register::new(0),
            bsrr: Register::new(0),
            lckr: Register::new(0),
            afrl: Register::new(0),
            afrh: Register::new(0),
        }
    }

    #[inline]
    pub fn reg(&self, reg: Reg) -> &Register {
        match reg {
            Reg::Moder => &self.moder,
            Reg::Otyper => &self.otyper,
            Reg::Ospeedr => &self.ospeedr,
            Reg::Pupdr => &self.pupdr,
            Reg::Idr => &self.idr,
            Reg::Odr => &self.odr,
            Reg::Bsrr => &self.bsrr,
            Reg::Lckr => &self.lckr,
            Reg::Afrl => &self.afrl,
            Reg::Afrh => &self.afrh,
        }
    }

    /// Write the four configuration fields of `pin`
    ///
    /// `pin` must already be validated.
    pub(super) fn configure_pin(&self, pin: u8, fields: ConfigFields, policy: WritePolicy) {
        let pin = u32::from(pin);
        let wide = pin * 2;
        policy.apply(&self.moder, 0b11 << wide, fields.mode << wide);
        policy.apply(&self.otyper, 0b1 << pin, fields.out_type << pin);
        policy.apply(&self.ospeedr, 0b11 << wide, fields.speed << wide);
        policy.apply(&self.pupdr, 0b11 << wide, fields.pull << wide);
    }
}

//==================================================================================================
//  ConfigFields
//==================================================================================================

/// Raw field values of a descriptor, before shifting to the pin position
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(super) struct ConfigFields {
    mode: u32,
    out_type: u32,
    speed: u32,
    pull: u32,
}

impl From<&PinDescriptor> for ConfigFields {
    #[inline]
    fn from(desc: &PinDescriptor) -> Self {
        ConfigFields {
            mode: desc.mode as u32,
            out_type: desc.out_type as u32,
            speed: desc.out_speed as u32,
            pull: desc.pull as u32,
        }
    }
}

/// How configuration fields are combined with the current register contents
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WritePolicy {
    /// Clear the pin's field, then set the new value. Reconfiguring a pin
    /// fully replaces its previous configuration.
    #[default]
    ClearThenSet,
    /// OR the new value into the register without clearing the field first.
    /// Bits of a previous configuration stay set unless the register was
    /// reset in between.
    MergeBits,
}

impl WritePolicy {
    #[inline]
    fn apply(self, reg: &Register, mask: u32, value: u32) {
        match self {
            WritePolicy::ClearThenSet => reg.modify(|r| (r & !mask) | value),
            WritePolicy::MergeBits => reg.modify(|r| r | value),
        }
    }
}

//==================================================================================================
// Register Interface
//==================================================================================================

/// Map a [`Port`] to its register block
///
/// This is the only place where the driver dispatches on the port. Every
/// register access of the driver goes through [`with_block`], so an
/// implementation can wrap the access, e.g. in a critical section.
///
/// The trait is sealed. The implementations are [`GpioRegisters`] for the
/// hardware, [`SimRegisters`](super::SimRegisters) for host tests, and
/// [`Guarded`] around either of them.
///
/// [`with_block`]: Self::with_block
pub trait RegisterInterface: Sealed {
    /// Return the register block of `port`, or [`None`] if it is not mapped
    fn block(&self, port: Port) -> Option<&RegisterBlock>;

    /// Run `f` on the register block of `port`
    #[inline]
    fn with_block<T>(&self, port: Port, f: impl FnOnce(&RegisterBlock) -> T) -> Option<T> {
        self.block(port).map(f)
    }
}

/// The memory-mapped GPIO register blocks
///
/// The register blocks exist for as long as the chip is powered. This type is
/// only a token for them, it is zero-sized.
pub struct GpioRegisters {
    _private: (),
}

impl GpioRegisters {
    /// Take the register file. Returns [`None`] on subsequent calls.
    pub fn take() -> Option<Self> {
        let _: &'static mut bool = cortex_m::singleton!(: bool = false)?;
        Some(GpioRegisters { _private: () })
    }

    /// Create the register file without checking whether it was taken before
    ///
    /// # Safety
    ///
    /// Users must make sure that the driver is the only one modifying the
    /// GPIO registers, or provide their own mutual exclusion.
    #[inline]
    pub unsafe fn steal() -> Self {
        GpioRegisters { _private: () }
    }
}

impl Sealed for GpioRegisters {}

impl RegisterInterface for GpioRegisters {
    #[inline]
    fn block(&self, port: Port) -> Option<&RegisterBlock> {
        // Safety: the base address points to the register block of this port
        // for the entire lifetime of the program
        Some(unsafe { &*(port.base_addr() as *const RegisterBlock) })
    }
}

/// Run every register access of the wrapped register file inside a critical
/// section
///
/// Needed if interrupt handlers touch the same port as the main context, as
/// set, clear and toggle are read-modify-write sequences. The critical section
/// comes from the [`critical_section`] crate. On the bare-metal target it is
/// provided by `cortex-m` and disables interrupts.
pub struct Guarded<R> {
    inner: R,
}

impl<R: RegisterInterface> Guarded<R> {
    #[inline]
    pub fn new(inner: R) -> Self {
        Guarded { inner }
    }

    #[inline]
    pub fn release(self) -> R {
        self.inner
    }
}

impl<R> Sealed for Guarded<R> {}

/// Only [`with_block`](RegisterInterface::with_block) is guarded. [`block`](RegisterInterface::block)
/// returns the inner block as is, and accesses through that reference are not
/// synchronized.
impl<R: RegisterInterface> RegisterInterface for Guarded<R> {
    #[inline]
    fn block(&self, port: Port) -> Option<&RegisterBlock> {
        self.inner.block(port)
    }

    #[inline]
    fn with_block<T>(&self, port: Port, f: impl FnOnce(&RegisterBlock) -> T) -> Option<T> {
        critical_section::with(|_| self.inner.with_block(port, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::pins::{Mode, OutputType, PortId, Pull, Speed};

    #[test]
    fn register_offsets_follow_layout() {
        let block = RegisterBlock::zeroed();
        let base = &block as *const RegisterBlock as usize;
        for reg in Reg::ALL {
            let addr = block.reg(reg) as *const Register as usize;
            assert_eq!(addr - base, reg.offset());
        }
        assert_eq!(core::mem::size_of::<RegisterBlock>(), 0x28);
    }

    #[test]
    fn modify_keeps_other_bits() {
        let reg = Register::new(0xF0F0_0000);
        reg.modify(|r| r | 0b101);
        assert_eq!(reg.read(), 0xF0F0_0005);
    }

    #[test]
    fn clear_then_set_replaces_field() {
        let block = RegisterBlock::zeroed();
        block.moder.write(0xFFFF_FFFF);
        let desc = PinDescriptor::new(4, PortId::A).into_output();
        block.configure_pin(4, ConfigFields::from(&desc), WritePolicy::ClearThenSet);
        assert_eq!(block.moder.read(), 0xFFFF_FDFF);
        assert_eq!((block.ospeedr.read() >> 8) & 0b11, Speed::High as u32);
    }

    #[test]
    fn merge_bits_keeps_stale_field() {
        let block = RegisterBlock::zeroed();
        let fields = ConfigFields::from(
            &PinDescriptor::new(1, PortId::B)
                .with_mode(Mode::AlternateFunction)
                .with_pull(Pull::Down),
        );
        block.configure_pin(1, fields, WritePolicy::MergeBits);
        let fields = ConfigFields::from(
            &PinDescriptor::new(1, PortId::B)
                .into_output()
                .with_pull(Pull::Up),
        );
        block.configure_pin(1, fields, WritePolicy::MergeBits);
        // 0b10 | 0b01 leaves the pin in analog mode with both pulls set
        assert_eq!((block.moder.read() >> 2) & 0b11, Mode::Analog as u32);
        assert_eq!((block.pupdr.read() >> 2) & 0b11, 0b11);
    }

    #[test]
    fn open_drain_uses_single_bit() {
        let block = RegisterBlock::zeroed();
        let desc = PinDescriptor::new(15, PortId::A).with_out_type(OutputType::OpenDrain);
        block.configure_pin(15, ConfigFields::from(&desc), WritePolicy::ClearThenSet);
        assert_eq!(block.otyper.read(), 1 << 15);
    }
}
