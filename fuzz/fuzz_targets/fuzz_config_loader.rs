#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = battmon_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // A validated config must map into reader parameters the builder accepts
            let reader: battmon_core::ReaderCfg = (&cfg).into();
            assert!(reader.v_min < reader.v_max);
            assert!(reader.r2 > 0);
        }
    }
});
