//! Function accessor tests over the software bus.
//!
//! Every family's offset arithmetic is verified against raw register
//! reads at independently computed window offsets.

use flink::prelude::*;
use flink_bus::layout::{CONFIG_OFFSET, FUNCTION_BASE, REGISTER_WIDTH};

fn device(bus: SoftBus) -> FlinkDevice {
    FlinkDevice::with_transport(Box::new(bus)).unwrap()
}

// ── PWM ──────────────────────────────────────────────────────────────────────

fn pwm_bus() -> SoftBus {
    SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Pwm, 4, 0x60, 1)])
}

#[test]
fn pwm_set_period_lands_at_the_computed_offset() {
    let bus = pwm_bus();
    let dev = device(bus.clone());
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();

    pwm.set_period(0, 1000).unwrap();

    // window_start + header + subheader + first_pwm + 0·width = 0x24
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x4), 1000);
}

#[test]
fn pwm_hightime_lives_in_the_second_bank() {
    let bus = pwm_bus();
    let dev = device(bus.clone());
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();

    pwm.set_hightime(2, 77).unwrap();

    // bank 1 of 4 channels starts 16 bytes after the period bank
    let expected = FUNCTION_BASE + 0x4 + 4 * REGISTER_WIDTH + 2 * REGISTER_WIDTH;
    assert_eq!(bus.peek_register(0, expected), 77);
}

#[test]
fn pwm_round_trip() {
    let dev = device(pwm_bus());
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();
    for value in [0, 1, 1000, 0xFFFF_FFFF] {
        pwm.set_period(3, value).unwrap();
        assert_eq!(pwm.period(3).unwrap(), value);
    }
}

#[test]
fn pwm_base_clock_reads_the_scalar_register() {
    let bus = pwm_bus();
    bus.poke_register(0, FUNCTION_BASE, 125_000_000);
    let dev = device(bus);
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();
    assert_eq!(pwm.base_clock().unwrap(), 125_000_000);
}

#[test]
fn pwm_channel_bound_is_enforced() {
    let dev = device(pwm_bus());
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();
    assert!(matches!(
        pwm.set_period(4, 1).unwrap_err(),
        FlinkError::InvalidChannel { channel: 4, count: 4 }
    ));
}

#[test]
fn offsets_never_leave_the_memory_window() {
    // 40-byte window: channel 0's period register fits, channel 1's doesn't.
    let dev = device(SoftBus::with_subdevices(vec![SoftSubdevice::new(
        FunctionId::Pwm,
        4,
        0x28,
        1,
    )]));
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();
    assert!(pwm.set_period(0, 1).is_ok());
    assert!(matches!(
        pwm.set_period(1, 1).unwrap_err(),
        FlinkError::OutOfWindow { .. }
    ));
}

#[test]
fn garbled_channel_counts_cannot_wrap_the_bank_stride() {
    // A descriptor claiming 2^30 channels makes the bank-1 stride 2^32
    // bytes. That must surface as out-of-window, not wrap to zero and
    // alias the hightime write onto the period bank.
    let dev = device(SoftBus::with_subdevices(vec![SoftSubdevice::new(
        FunctionId::Pwm,
        1 << 30,
        0x40,
        1,
    )]));
    let pwm = dev.subdevice(0).unwrap().as_pwm().unwrap();

    pwm.set_period(0, 1000).unwrap();
    assert!(matches!(
        pwm.set_hightime(0, 77).unwrap_err(),
        FlinkError::OutOfWindow { .. }
    ));
    assert_eq!(pwm.period(0).unwrap(), 1000);
}

// ── Digital I/O ──────────────────────────────────────────────────────────────

fn dio_bus() -> SoftBus {
    SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Dio, 16, 0x80, 2)])
}

#[test]
fn dio_value_bits_are_per_channel() {
    let bus = dio_bus();
    let dev = device(bus.clone());
    let dio = dev.subdevice(0).unwrap().as_dio().unwrap();

    dio.set_value(5, true).unwrap();
    dio.set_value(7, true).unwrap();

    // 16 channels fit one word per bit bank: direction at +0x4, value at +0x8
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x8), (1 << 5) | (1 << 7));
    assert!(dio.value(5).unwrap());
    assert!(!dio.value(6).unwrap());
}

#[test]
fn dio_bit_writes_are_idempotent() {
    let bus = dio_bus();
    let dev = device(bus.clone());
    let dio = dev.subdevice(0).unwrap().as_dio().unwrap();

    dio.set_value(3, true).unwrap();
    let once = bus.peek_register(0, FUNCTION_BASE + 0x8);
    dio.set_value(3, true).unwrap();
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x8), once);
}

#[test]
fn dio_direction_bank_precedes_value_bank() {
    let bus = dio_bus();
    let dev = device(bus.clone());
    let dio = dev.subdevice(0).unwrap().as_dio().unwrap();

    dio.set_direction(0, Direction::Output).unwrap();

    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x4), 1);
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x8), 0);
}

#[test]
fn dio_debounce_registers_follow_the_bit_banks() {
    let bus = dio_bus();
    let dev = device(bus.clone());
    let dio = dev.subdevice(0).unwrap().as_dio().unwrap();

    dio.set_debounce(3, 250).unwrap();

    // two one-word bit banks, then one register per channel
    let expected = FUNCTION_BASE + 0x4 + 2 * REGISTER_WIDTH + 3 * REGISTER_WIDTH;
    assert_eq!(bus.peek_register(0, expected), 250);
    assert_eq!(dio.debounce(3).unwrap(), 250);
}

#[test]
fn dio_debounce_offsets_cannot_wrap() {
    let dev = device(SoftBus::with_subdevices(vec![SoftSubdevice::new(
        FunctionId::Dio,
        u32::MAX,
        0x80,
        2,
    )]));
    let dio = dev.subdevice(0).unwrap().as_dio().unwrap();
    assert!(matches!(
        dio.set_debounce(1 << 30, 1).unwrap_err(),
        FlinkError::OutOfWindow { .. }
    ));
}

// ── Stepper motor ────────────────────────────────────────────────────────────

fn stepper_bus() -> SoftBus {
    SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::StepperMotor, 2, 0x80, 3)])
}

#[test]
fn stepper_round_trips_every_bank() {
    let dev = device(stepper_bus());
    let motor = dev.subdevice(0).unwrap().as_stepper().unwrap();

    motor.set_config(1, 0x0F).unwrap();
    motor.set_prescaler_start(1, 10).unwrap();
    motor.set_prescaler_top(1, 200).unwrap();
    motor.set_acceleration(1, 3).unwrap();
    motor.set_steps_to_do(1, 4800).unwrap();

    assert_eq!(motor.config(1).unwrap(), 0x0F);
    assert_eq!(motor.prescaler_start(1).unwrap(), 10);
    assert_eq!(motor.prescaler_top(1).unwrap(), 200);
    assert_eq!(motor.acceleration(1).unwrap(), 3);
    assert_eq!(motor.steps_to_do(1).unwrap(), 4800);

    // neighbour channel untouched
    assert_eq!(motor.prescaler_start(0).unwrap(), 0);
}

#[test]
fn stepper_atomic_bits_touch_only_their_mask() {
    let bus = stepper_bus();
    let dev = device(bus.clone());
    let motor = dev.subdevice(0).unwrap().as_stepper().unwrap();

    motor.set_config(0, 0b1010).unwrap();
    motor.set_config_bits(0, 0b0001).unwrap();
    assert_eq!(motor.config(0).unwrap(), 0b1011);

    motor.clear_config_bits(0, 0b0010).unwrap();
    assert_eq!(motor.config(0).unwrap(), 0b1001);
}

#[test]
fn stepper_global_step_reset_uses_the_config_register() {
    let bus = stepper_bus();
    let dev = device(bus.clone());
    let motor = dev.subdevice(0).unwrap().as_stepper().unwrap();

    motor.global_step_reset().unwrap();

    assert_eq!(bus.peek_register(0, CONFIG_OFFSET), 0b10);
}

// ── Watchdog ─────────────────────────────────────────────────────────────────

#[test]
fn watchdog_counter_status_and_arm() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Watchdog, 0, 0x40, 4)]);
    bus.poke_register(0, flink_bus::layout::STATUS_OFFSET, 0x1);
    let dev = device(bus.clone());
    let wd = dev.subdevice(0).unwrap().as_watchdog().unwrap();

    wd.set_counter(48_000).unwrap();
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x4), 48_000);

    assert_eq!(wd.status_word().unwrap(), 0x1);

    wd.arm().unwrap();
    assert_eq!(bus.peek_register(0, CONFIG_OFFSET), 0b10);
}

// ── Analog and reflective sensor ─────────────────────────────────────────────

#[test]
fn analog_in_reads_resolution_and_values() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::AnalogIn, 2, 0x40, 5)]);
    bus.poke_register(0, FUNCTION_BASE, 4096);
    bus.poke_register(0, FUNCTION_BASE + 0x4 + REGISTER_WIDTH, 1234);
    let dev = device(bus);
    let adc = dev.subdevice(0).unwrap().as_analog_in().unwrap();

    assert_eq!(adc.resolution().unwrap(), 4096);
    assert_eq!(adc.value(1).unwrap(), 1234);
}

#[test]
fn analog_out_writes_the_value_bank() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::AnalogOut, 2, 0x40, 6)]);
    let dev = device(bus.clone());
    let dac = dev.subdevice(0).unwrap().as_analog_out().unwrap();

    dac.set_value(0, 2048).unwrap();
    assert_eq!(bus.peek_register(0, FUNCTION_BASE + 0x4), 2048);
}

#[test]
fn reflective_sensor_banks_are_value_upper_lower() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(
        FunctionId::ReflectiveSensor,
        2,
        0x40,
        7,
    )]);
    let dev = device(bus.clone());
    let sensor = dev.subdevice(0).unwrap().as_reflective_sensor().unwrap();

    sensor.set_upper_hysteresis(1, 900).unwrap();
    sensor.set_lower_hysteresis(1, 100).unwrap();

    let stride = 2 * REGISTER_WIDTH; // 2 channels per bank
    assert_eq!(
        bus.peek_register(0, FUNCTION_BASE + 0x4 + stride + REGISTER_WIDTH),
        900
    );
    assert_eq!(
        bus.peek_register(0, FUNCTION_BASE + 0x4 + 2 * stride + REGISTER_WIDTH),
        100
    );
    assert_eq!(sensor.upper_hysteresis(1).unwrap(), 900);
    assert_eq!(sensor.lower_hysteresis(1).unwrap(), 100);
}

// ── Counter ──────────────────────────────────────────────────────────────────

#[test]
fn counter_mode_and_count() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Counter, 2, 0x40, 8)]);
    bus.poke_register(0, FUNCTION_BASE + 0x4, 41);
    let dev = device(bus.clone());
    let counter = dev.subdevice(0).unwrap().as_counter().unwrap();

    counter.set_mode(2).unwrap();
    assert_eq!(bus.peek_register(0, FUNCTION_BASE), 2);
    assert_eq!(counter.count(0).unwrap(), 41);
}

// ── Info ─────────────────────────────────────────────────────────────────────

#[test]
fn info_description_is_nul_trimmed() {
    let bus = SoftBus::with_subdevices(vec![SoftSubdevice::new(FunctionId::Info, 0, 0x40, 9)]);
    let text = b"flink demo design";
    for (i, chunk) in text.chunks(4).enumerate() {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        #[allow(clippy::cast_possible_truncation)]
        bus.poke_register(0, FUNCTION_BASE + (i as u32) * REGISTER_WIDTH, u32::from_le_bytes(word));
    }
    let dev = device(bus);
    let info = dev.subdevice(0).unwrap().as_info().unwrap();

    assert_eq!(info.description().unwrap(), "flink demo design");
}
