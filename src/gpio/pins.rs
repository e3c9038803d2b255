//! # Value-level pin descriptors
//!
//! A [`PinDescriptor`] is a plain configuration intent: which pin, and how it
//! should be driven. It does not own or reference any register. The register
//! blocks themselves are singletons which live for as long as the chip is
//! powered, see [`reg`](super::reg).
//!
//! Ports are identified in two ways. [`PortId`] is the raw number a caller
//! passes in and may name a port that does not exist. [`Port`] is the closed
//! set of blocks present on the chip and is only obtained through validation.
//!
//! ```
//! use stm32f411_gpio::gpio::{Mode, PinDescriptor, PortId, Pull};
//!
//! let button = PinDescriptor::new(0, PortId::A).with_pull(Pull::Up);
//! assert_eq!(button.mode, Mode::Input);
//! assert!(button.is_valid());
//!
//! // Only C13 to C15 are bonded out on the package
//! assert!(!PinDescriptor::new(3, PortId::C).is_valid());
//! ```
use core::fmt;
use paste::paste;

//==================================================================================================
//  Errors and Definitions
//==================================================================================================

/// GPIO error type
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No descriptor was passed
    NullDescriptor,
    /// The port or pin of the descriptor is out of range
    InvalidArgument,
    /// The descriptor passed validation but no register block is mapped for its port
    UnsupportedPort,
    /// The descriptor mode does not allow the requested operation, e.g. driving an input
    WrongMode,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NullDescriptor => f.write_str("no pin descriptor given"),
            Error::InvalidArgument => f.write_str("port or pin out of range"),
            Error::UnsupportedPort => f.write_str("no register block for port"),
            Error::WrongMode => f.write_str("pin mode does not allow this operation"),
        }
    }
}

/// Logic level of a pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low = 0,
    High = 1,
}

impl From<bool> for PinState {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<PinState> for bool {
    #[inline]
    fn from(state: PinState) -> bool {
        state == PinState::High
    }
}

/// Highest pin index of a port
pub const LAST_PIN: u8 = 15;

/// Raw port number as supplied by the caller
///
/// Any value can be represented, validation decides whether it names a port
/// that exists.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortId(pub u8);

//==================================================================================================
//  Ports
//==================================================================================================

macro_rules! ports {
    ($($X:ident: ($id:literal, $base:literal, $first:literal),)+) => {
        paste! {
            $(
                #[doc = "Base address of the GPIO" $X " register block"]
                pub const [<GPIO $X _BASE>]: usize = $base;
            )+

            /// GPIO blocks present on the chip
            #[derive(Debug, PartialEq, Eq, Clone, Copy)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            pub enum Port {
                $(
                    #[doc = "GPIO" $X]
                    $X = $id,
                )+
            }

            impl PortId {
                $(
                    #[doc = "Port number of GPIO" $X]
                    pub const $X: PortId = PortId($id);
                )+
            }

            impl Port {
                /// Every port, in address order
                pub const ALL: &'static [Port] = &[$(Port::$X,)+];

                /// Base address of the register block
                #[inline]
                pub const fn base_addr(self) -> usize {
                    match self {
                        $(Port::$X => [<GPIO $X _BASE>],)+
                    }
                }

                /// Lowest pin which is bonded out on the package
                #[inline]
                pub const fn first_pin(self) -> u8 {
                    match self {
                        $(Port::$X => $first,)+
                    }
                }

                /// Raw port number of this block
                #[inline]
                pub const fn id(self) -> PortId {
                    PortId(self as u8)
                }
            }

            impl TryFrom<PortId> for Port {
                type Error = Error;

                #[inline]
                fn try_from(id: PortId) -> Result<Self, Error> {
                    match id.0 {
                        $($id => Ok(Port::$X),)+
                        _ => Err(Error::InvalidArgument),
                    }
                }
            }
        }
    };
}

ports!(
    A: (0, 0x4002_0000, 0),
    B: (1, 0x4002_0400, 0),
    C: (2, 0x4002_0800, 13),
);

/// Number of GPIO blocks on the chip
pub const NUM_PORTS: usize = Port::ALL.len();

//==================================================================================================
//  Field values
//==================================================================================================

/// Pin direction, 2 bits in MODER
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Input = 0b00,
    Output = 0b01,
    AlternateFunction = 0b10,
    Analog = 0b11,
}

/// Output driver topology, 1 bit in OTYPER
///
/// Only meaningful for [`Mode::Output`] and [`Mode::AlternateFunction`].
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    #[default]
    PushPull = 0,
    OpenDrain = 1,
}

/// Slew rate class, 2 bits in OSPEEDR
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Low = 0b00,
    Medium = 0b01,
    Fast = 0b10,
    #[default]
    High = 0b11,
}

/// Internal pull resistor, 2 bits in PUPDR
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

//==================================================================================================
//  PinDescriptor
//==================================================================================================

/// Desired electrical configuration of a single pin
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinDescriptor {
    pub port: PortId,
    pub pin: u8,
    pub mode: Mode,
    pub out_type: OutputType,
    pub out_speed: Speed,
    pub pull: Pull,
}

impl PinDescriptor {
    /// Returned by [`new`](Self::new) for a port/pin pair which does not exist.
    /// It never passes validation.
    pub const INVALID: PinDescriptor = PinDescriptor {
        port: PortId(u8::MAX),
        pin: u8::MAX,
        mode: Mode::Input,
        out_type: OutputType::PushPull,
        out_speed: Speed::High,
        pull: Pull::None,
    };

    /// Create a descriptor with the default configuration: input, push-pull,
    /// high speed and no pull resistor.
    ///
    /// This never fails. If the port/pin pair is invalid, [`Self::INVALID`] is
    /// returned and every driver operation on it reports
    /// [`Error::InvalidArgument`]. Use [`try_new`](Self::try_new) to get the
    /// error right away.
    #[inline]
    pub fn new(pin: u8, port: PortId) -> Self {
        Self::try_new(pin, port).unwrap_or(Self::INVALID)
    }

    /// Fallible version of [`new`](Self::new)
    pub fn try_new(pin: u8, port: PortId) -> Result<Self, Error> {
        let desc = PinDescriptor {
            port,
            pin,
            ..Self::INVALID
        };
        desc.validate()?;
        Ok(desc)
    }

    /// Check the port/pin pair against the chip and return the matching [`Port`]
    ///
    /// Pins 0 to 15 exist on ports A and B. Port C only has pins 13 to 15
    /// bonded out.
    pub fn validate(&self) -> Result<Port, Error> {
        let port = Port::try_from(self.port)?;
        if self.pin > LAST_PIN || self.pin < port.first_pin() {
            return Err(Error::InvalidArgument);
        }
        Ok(port)
    }

    /// Whether [`validate`](Self::validate) succeeds
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Set the pin direction
    #[inline]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set push-pull or open-drain output
    #[inline]
    pub const fn with_out_type(mut self, out_type: OutputType) -> Self {
        self.out_type = out_type;
        self
    }

    /// Set the slew rate class
    #[inline]
    pub const fn with_speed(mut self, out_speed: Speed) -> Self {
        self.out_speed = out_speed;
        self
    }

    /// Set the internal pull resistor
    #[inline]
    pub const fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Shortcut for `with_mode(Mode::Output)`
    #[inline]
    pub const fn into_output(self) -> Self {
        self.with_mode(Mode::Output)
    }

    /// Shortcut for `with_mode(Mode::Input)`
    #[inline]
    pub const fn into_input(self) -> Self {
        self.with_mode(Mode::Input)
    }
}
