//! Monitor thread lifecycle: publishes snapshots and exits promptly on drop.

use std::time::{Duration, Instant};

use battmon_core::mocks::{IdentityCalibrator, NoopAdc, ScriptedAdc};
use battmon_core::{BatteryReaderBuilder, Monitor};
use battmon_traits::clock::MonotonicClock;

#[test]
fn monitor_publishes_snapshots() {
    let mut reader = BatteryReaderBuilder::new()
        .with_adc(ScriptedAdc::constant(1800))
        .with_calibrator(IdentityCalibrator)
        .build()
        .unwrap();
    reader.begin().unwrap();

    let monitor = Monitor::spawn(reader, Duration::from_millis(10), MonotonicClock::new());
    let status = monitor
        .recv_timeout(Duration::from_secs(2))
        .expect("snapshot within 2 s");
    assert_eq!(status.raw, 1800);
    assert_eq!(status.battery_v, 3.6);
}

#[test]
fn long_interval_does_not_delay_drop() {
    let mut reader = BatteryReaderBuilder::new()
        .with_adc(ScriptedAdc::constant(1000))
        .with_calibrator(IdentityCalibrator)
        .build()
        .unwrap();
    reader.begin().unwrap();

    let monitor = Monitor::spawn(reader, Duration::from_secs(60), MonotonicClock::new());
    assert!(monitor.recv_timeout(Duration::from_secs(2)).is_some());

    let started = Instant::now();
    drop(monitor);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn uninitialized_reader_publishes_nothing_and_reports_stall() {
    let reader = BatteryReaderBuilder::new()
        .with_adc(ScriptedAdc::constant(1000))
        .with_calibrator(IdentityCalibrator)
        .build()
        .unwrap();

    let monitor = Monitor::spawn(reader, Duration::from_millis(5), MonotonicClock::new());
    assert!(monitor.recv_timeout(Duration::from_millis(100)).is_none());
    assert!(monitor.stalled_for_now() >= 100);
}

#[test]
fn failing_adc_keeps_monitor_alive() {
    let mut reader = BatteryReaderBuilder::new()
        .with_adc(NoopAdc)
        .with_calibrator(IdentityCalibrator)
        .build()
        .unwrap();
    reader.begin().unwrap();

    let monitor = Monitor::spawn(reader, Duration::from_millis(5), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(30));
    assert!(monitor.latest().is_none());
    drop(monitor);
}

#[test]
fn repeated_monitors_do_not_leak_threads() {
    for _ in 0..10 {
        let mut reader = BatteryReaderBuilder::new()
            .with_adc(ScriptedAdc::constant(1200))
            .with_calibrator(IdentityCalibrator)
            .build()
            .unwrap();
        reader.begin().unwrap();
        let monitor = Monitor::spawn(reader, Duration::from_millis(20), MonotonicClock::new());
        std::thread::sleep(Duration::from_millis(5));
        let _ = monitor.latest();
    }
}
