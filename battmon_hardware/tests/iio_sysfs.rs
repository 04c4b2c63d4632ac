use std::fs;

use battmon_hardware::IioAdc;
use battmon_hardware::error::HwError;
use battmon_traits::{Adc, AdcWidth, Attenuation, Channel};
use tempfile::tempdir;

#[test]
fn reads_raw_attribute_from_device_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("in_voltage3_raw"), "2731\n").unwrap();

    let mut adc = IioAdc::new(dir.path());
    adc.configure(Channel(3), AdcWidth::Bits12, Attenuation::Db11)
        .expect("channel attribute exists");
    assert_eq!(adc.sample(Channel(3)).unwrap(), 2731);

    fs::write(dir.path().join("in_voltage3_raw"), "12\n").unwrap();
    assert_eq!(adc.sample(Channel(3)).unwrap(), 12);
}

#[test]
fn configure_fails_for_missing_channel() {
    let dir = tempdir().unwrap();
    let mut adc = IioAdc::new(dir.path());
    let err = adc
        .configure(Channel(7), AdcWidth::Bits12, Attenuation::Db11)
        .expect_err("no in_voltage7_raw");
    assert!(err.to_string().contains("in_voltage7_raw"));
}

#[test]
fn garbage_attribute_is_a_parse_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("in_voltage0_raw"), "busy\n").unwrap();
    let mut adc = IioAdc::new(dir.path());
    adc.configure(Channel(0), AdcWidth::Bits12, Attenuation::Db11)
        .unwrap();

    let err = adc.sample(Channel(0)).expect_err("not a number");
    match err.downcast_ref::<HwError>() {
        Some(HwError::Parse { value, .. }) => assert_eq!(value, "busy"),
        other => panic!("unexpected error: {other:?}"),
    }
}
