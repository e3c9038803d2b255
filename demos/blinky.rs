//! Simple blinky example
//!
//! Blinks the user LED on PC13 of the common STM32F411CE "Black Pill"
//! board. The LED is wired active low.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;
use stm32f411_gpio::{
    gpio::{Gpio, GpioRegisters, PinDescriptor, PortId, Speed},
    prelude::*,
};

#[entry]
fn main() -> ! {
    let mut gpio = Gpio::new(GpioRegisters::take().unwrap());
    let led = PinDescriptor::new(13, PortId::C)
        .into_output()
        .with_speed(Speed::Low);
    gpio.configure(&led).unwrap();
    for _ in 0..10 {
        gpio.set_low(&led).ok();
        cortex_m::asm::delay(25_000_000);
        gpio.set_high(&led).ok();
        cortex_m::asm::delay(25_000_000);
    }
    let mut led = gpio.pin(&led);
    loop {
        led.toggle().ok();
        cortex_m::asm::delay(25_000_000);
    }
}
