#![allow(dead_code)]

use ta_commentary::{Bar, OhlcvSeries, Price};

/// One hour in milliseconds.
pub const HOUR: u64 = 3_600_000;

/// Bars for `closes`, one per hour. Each bar opens at the previous close
/// (the first at its own close) and its range extends half a point past
/// both ends.
pub fn bars_from_closes(closes: &[Price]) -> Vec<Bar> {
    let mut previous = None;

    closes
        .iter()
        .zip(1..)
        .map(|(&close, hour)| {
            let open = previous.unwrap_or(close);
            previous = Some(close);
            Bar::new(
                hour * HOUR,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
            )
            .with_volume(1_000.0)
        })
        .collect()
}

pub fn series(closes: &[Price]) -> OhlcvSeries {
    OhlcvSeries::new(bars_from_closes(closes)).expect("fixture closes must form a valid series")
}

pub fn flat(value: Price, count: usize) -> Vec<Price> {
    vec![value; count]
}

#[allow(clippy::cast_precision_loss)]
pub fn linear(start: Price, step: Price, count: usize) -> Vec<Price> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// Oscillating closes with a gentle upward drift.
#[allow(clippy::cast_precision_loss)]
pub fn wave(count: usize) -> Vec<Price> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            100.0 + 10.0 * (x * 0.3).sin() + 3.0 * (x * 0.07).cos() + 0.05 * x
        })
        .collect()
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}
