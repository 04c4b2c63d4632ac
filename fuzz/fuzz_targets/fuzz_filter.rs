#![no_main]
use battmon_core::filter::{Ema, average, median};
use libfuzzer_sys::arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    alpha: f32,
    batches: Vec<Vec<u32>>,
}

fuzz_target!(|input: Input| {
    let mut ema = Ema::new(input.alpha);
    for batch in input.batches {
        if batch.is_empty() {
            assert_eq!(average(&batch), 0);
            continue;
        }
        let lo = *batch.iter().min().unwrap();
        let hi = *batch.iter().max().unwrap();
        let avg = average(&batch);
        assert!(lo <= avg && avg <= hi);

        let mut work = batch.clone();
        let m = median(&mut work);
        assert!(batch.contains(&m));

        let _ = ema.reduce(&batch);
        assert!((0.01..=1.0).contains(&ema.alpha()));
    }
});
