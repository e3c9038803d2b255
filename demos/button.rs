//! Mirror the KEY button on PA0 to the LED on PC13
//!
//! The button pulls PA0 to ground, so the internal pull-up is enabled.
//! Every state change is logged over RTT.
#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f411_gpio::gpio::{Gpio, Guarded, GpioRegisters, PinDescriptor, PinState, PortId, Pull};

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("-- STM32F411 GPIO button example --");
    let mut gpio = Gpio::new(Guarded::new(GpioRegisters::take().unwrap()));
    let key = PinDescriptor::new(0, PortId::A).with_pull(Pull::Up);
    let led = PinDescriptor::new(13, PortId::C).into_output();
    gpio.configure(&key).unwrap();
    gpio.configure(&led).unwrap();

    let mut last = None;
    loop {
        let state = match gpio.read(&key) {
            Ok(state) => state,
            Err(e) => {
                rprintln!("reading key failed: {}", e);
                continue;
            }
        };
        if last != Some(state) {
            rprintln!("key {:?}", state);
            last = Some(state);
        }
        // Both the key and the LED are active low
        let res = match state {
            PinState::Low => gpio.set_low(&led),
            PinState::High => gpio.set_high(&led),
        };
        if let Err(e) = res {
            rprintln!("driving LED failed: {:?}", e);
        }
        cortex_m::asm::delay(1_000_000);
    }
}
