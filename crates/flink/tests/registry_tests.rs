//! Registry and lifecycle tests over the software bus.
//!
//! Exercises enumeration, id/unique-id lookup, selection exclusivity and
//! the reset path without hardware.

use flink::prelude::*;
use flink_bus::layout::{CONFIG_OFFSET, STATUS_OFFSET};

fn demo_bus() -> SoftBus {
    SoftBus::with_subdevices(vec![
        SoftSubdevice::new(FunctionId::Dio, 16, 0x80, 0xAA01),
        SoftSubdevice::new(FunctionId::Pwm, 4, 0x60, 0xAA02),
        SoftSubdevice::new(FunctionId::Watchdog, 0, 0x40, 0xAA03),
    ])
}

#[test]
fn count_matches_reachable_descriptors() {
    let dev = FlinkDevice::with_transport(Box::new(demo_bus())).unwrap();
    assert_eq!(dev.nof_subdevices(), 3);
    for id in 0..dev.nof_subdevices() {
        let sub = dev.subdevice(id).unwrap();
        assert_eq!(sub.id(), id);
    }
    assert!(dev.subdevice(3).is_err());
    assert!(dev.subdevice(200).is_err());
}

#[test]
fn enumeration_is_all_or_nothing() {
    // One unreadable descriptor in the middle of the table fails the
    // whole open; no partially enumerated device comes back.
    let bus = demo_bus();
    bus.fail_descriptor(1);
    let err = FlinkDevice::with_transport(Box::new(bus)).unwrap_err();
    assert!(matches!(err, FlinkError::Enumeration { .. }));
}

#[test]
fn subdevice_one_is_the_pwm() {
    let dev = FlinkDevice::with_transport(Box::new(demo_bus())).unwrap();
    let sub = dev.subdevice(1).unwrap();
    assert_eq!(sub.function(), FunctionId::Pwm);
    assert_eq!(sub.nof_channels(), 4);
    assert!(sub.as_pwm().is_ok());
    assert!(matches!(
        sub.as_watchdog().unwrap_err(),
        FlinkError::WrongFunction { .. }
    ));
}

#[test]
fn unique_id_lookup_is_independent_of_enumeration_order() {
    let dev = FlinkDevice::with_transport(Box::new(demo_bus())).unwrap();
    let wd = dev.subdevice_by_unique_id(0xAA03).unwrap();
    assert_eq!(wd.id(), 2);
    assert!(matches!(
        dev.subdevice_by_unique_id(0x1234).unwrap_err(),
        FlinkError::NotFound { unique_id: 0x1234 }
    ));
}

#[test]
fn reset_writes_exactly_bit_zero_of_the_config_register() {
    let bus = demo_bus();
    bus.poke_register(1, CONFIG_OFFSET, 0xA0);
    let dev = FlinkDevice::with_transport(Box::new(bus.clone())).unwrap();

    dev.subdevice(1).unwrap().reset().unwrap();

    assert_eq!(bus.peek_register(1, CONFIG_OFFSET), 0xA1);
}

#[test]
fn status_reads_the_status_register() {
    let bus = demo_bus();
    bus.poke_register(0, STATUS_OFFSET, 0xBEEF);
    let dev = FlinkDevice::with_transport(Box::new(bus)).unwrap();
    assert_eq!(dev.subdevice(0).unwrap().status().unwrap(), 0xBEEF);
}

#[test]
fn exclusive_claim_is_visible_to_a_second_device() {
    let bus = demo_bus();
    let first = FlinkDevice::with_transport(Box::new(bus.clone())).unwrap();
    let second = FlinkDevice::with_transport(Box::new(bus.clone())).unwrap();

    first
        .subdevice(1)
        .unwrap()
        .select(AccessMode::Exclusive)
        .unwrap();

    assert!(second
        .subdevice(1)
        .unwrap()
        .select(AccessMode::Shared)
        .is_err());
    assert!(second
        .subdevice(1)
        .unwrap()
        .select(AccessMode::Exclusive)
        .is_err());

    // Other subdevices stay selectable.
    second
        .subdevice(0)
        .unwrap()
        .select(AccessMode::Shared)
        .unwrap();

    bus.release(1);
    second
        .subdevice(1)
        .unwrap()
        .select(AccessMode::Exclusive)
        .unwrap();
}

#[test]
fn irq_plumbing_round_trips() {
    let dev = FlinkDevice::with_transport(Box::new(demo_bus())).unwrap();

    dev.register_irq(4).unwrap();
    assert!(dev.signal_offset().unwrap() > 0);

    let sub = dev.subdevice(0).unwrap();
    sub.set_irq_multiplex(2, 4).unwrap();
    assert_eq!(sub.irq_multiplex(2).unwrap(), 4);

    dev.unregister_irq(4).unwrap();
    assert!(dev.unregister_irq(4).is_err());
}
