use stm32f411_gpio::gpio::{
    Error, Gpio, GpioConfig, Guarded, Mode, OutputType, PinDescriptor, PinState, Port, PortId,
    Pull, Reg, RegisterInterface, SimRegisters, Speed, WritePolicy, LAST_PIN,
};
use stm32f411_gpio::prelude::*;

fn sim_driver() -> Gpio<SimRegisters> {
    Gpio::new(SimRegisters::new())
}

#[test]
fn validation_matches_bonded_pins() {
    for pin in 0..=LAST_PIN {
        assert!(PinDescriptor::new(pin, PortId::A).is_valid());
        assert!(PinDescriptor::new(pin, PortId::B).is_valid());
        assert_eq!(
            PinDescriptor::new(pin, PortId::C).is_valid(),
            (13..=15).contains(&pin)
        );
    }
}

#[test]
fn fourth_port_is_invalid_argument() {
    let mut gpio = sim_driver();
    let desc = PinDescriptor {
        port: PortId(3),
        ..PinDescriptor::new(0, PortId::A).into_output()
    };
    assert_eq!(desc.validate(), Err(Error::InvalidArgument));
    assert_eq!(gpio.configure(&desc), Err(Error::InvalidArgument));
    assert_eq!(gpio.set_high(&desc), Err(Error::InvalidArgument));
    assert_eq!(gpio.set_low(&desc), Err(Error::InvalidArgument));
    assert_eq!(gpio.toggle(&desc), Err(Error::InvalidArgument));
    assert_eq!(
        gpio.read(&desc.into_input()),
        Err(Error::InvalidArgument)
    );
}

#[test]
fn absent_descriptor_is_not_invalid_argument() {
    let mut gpio = sim_driver();
    let absent: Option<&PinDescriptor> = None;
    assert_eq!(gpio.configure(absent), Err(Error::NullDescriptor));
    assert_eq!(gpio.set_high(absent), Err(Error::NullDescriptor));
    assert_eq!(gpio.read(absent), Err(Error::NullDescriptor));
    assert_ne!(Error::NullDescriptor, Error::InvalidArgument);
}

#[test]
fn c13_led_configuration() {
    let mut gpio = sim_driver();
    let led = PinDescriptor::new(13, PortId::C)
        .with_mode(Mode::Output)
        .with_out_type(OutputType::PushPull)
        .with_speed(Speed::High)
        .with_pull(Pull::None);
    gpio.configure(&led).unwrap();

    let snap = gpio.registers().snapshot(Port::C);
    assert_eq!(snap[Reg::Moder.offset() / 4], 0x0400_0000);
    assert_eq!(snap[Reg::Otyper.offset() / 4], 0);
    assert_eq!(snap[Reg::Ospeedr.offset() / 4], 0x0C00_0000);
    assert_eq!(snap[Reg::Pupdr.offset() / 4], 0);
}

#[test]
fn blink_sequence() {
    let mut gpio = sim_driver();
    let led = PinDescriptor::new(13, PortId::C).into_output();
    gpio.configure(&led).unwrap();

    gpio.set_high(&led).unwrap();
    gpio.toggle(&led).unwrap();
    assert_eq!(gpio.output_level(&led), Ok(PinState::Low));
    gpio.toggle(&led).unwrap();
    gpio.toggle(&led).unwrap();
    assert_eq!(gpio.output_level(&led), Ok(PinState::Low));
    assert_eq!(gpio.registers().register(Port::C, Reg::Odr), 0);
}

#[test]
fn input_reads_external_level_not_output_latch() {
    let mut gpio = sim_driver();
    let line = PinDescriptor::new(6, PortId::B).into_output();
    gpio.configure(&line).unwrap();
    gpio.set_high(&line).unwrap();

    let line = line.into_input().with_pull(Pull::Down);
    gpio.configure(&line).unwrap();
    assert_eq!(gpio.read(&line), Ok(PinState::Low));
    gpio.registers().drive_input(Port::B, 6, PinState::High).unwrap();
    assert_eq!(gpio.read(&line), Ok(PinState::High));
    // Other pins of port B are untouched
    assert_eq!(gpio.registers().register(Port::B, Reg::Odr), 1 << 6);
    assert_eq!(gpio.registers().register(Port::B, Reg::Pupdr), 0b10 << 12);
}

#[test]
fn set_high_on_input_is_rejected_without_write() {
    let mut gpio = sim_driver();
    gpio.registers().set_register(Port::A, Reg::Odr, 0x0000_0F0F);
    let before = gpio.registers().snapshot(Port::A);
    let desc = PinDescriptor::new(4, PortId::A);
    assert_eq!(desc.mode, Mode::Input);
    assert_eq!(gpio.set_high(&desc), Err(Error::WrongMode));
    assert_eq!(gpio.registers().snapshot(Port::A), before);
}

#[test]
fn merge_policy_reproduces_stale_configuration() {
    let mut gpio = Gpio::with_config(
        SimRegisters::new(),
        GpioConfig::new(WritePolicy::MergeBits),
    );
    let desc = PinDescriptor::new(2, PortId::A).with_speed(Speed::Low);
    gpio.configure(&desc.with_speed(Speed::Fast)).unwrap();
    gpio.configure(&desc.with_speed(Speed::Medium)).unwrap();
    assert_eq!(
        gpio.registers().register(Port::A, Reg::Ospeedr),
        (Speed::High as u32) << 4
    );

    let mut gpio = Gpio::new(gpio.release());
    gpio.configure(&desc.with_speed(Speed::Medium)).unwrap();
    assert_eq!(
        gpio.registers().register(Port::A, Reg::Ospeedr),
        (Speed::Medium as u32) << 4
    );
}

#[test]
fn embedded_hal_traits() {
    let mut gpio = sim_driver();
    let led = PinDescriptor::new(0, PortId::B).into_output();
    gpio.configure(&led).unwrap();
    let mut pin = gpio.pin(&led);
    pin.set_high().unwrap();
    assert!(pin.is_set_high().unwrap());
    pin.toggle().unwrap();
    assert!(pin.is_set_low().unwrap());
}

#[test]
fn guarded_register_file_runs_every_operation() {
    let mut gpio = Gpio::new(Guarded::new(SimRegisters::new()));
    let led = PinDescriptor::new(13, PortId::C).into_output();
    let key = PinDescriptor::new(0, PortId::A).with_pull(Pull::Up);
    gpio.configure(&led).unwrap();
    gpio.configure(&key).unwrap();

    gpio.set_high(&led).unwrap();
    gpio.toggle(&led).unwrap();
    assert_eq!(gpio.output_level(&led), Ok(PinState::Low));
    gpio.toggle(&led).unwrap();
    assert_eq!(gpio.output_level(&led), Ok(PinState::High));
    assert_eq!(gpio.set_high(&key), Err(Error::WrongMode));

    let odr = gpio
        .registers()
        .with_block(Port::C, |block| block.odr.read())
        .unwrap();
    assert_eq!(odr, 1 << 13);

    let regs = gpio.release().release();
    regs.drive_input(Port::A, 0, PinState::High).unwrap();
    assert_eq!(regs.register(Port::A, Reg::Pupdr), 0b01);
    assert_eq!(regs.register(Port::C, Reg::Moder), 0b01 << 26);
    let gpio = Gpio::new(Guarded::new(regs));
    assert_eq!(gpio.read(&key), Ok(PinState::High));
}
