use std::num::NonZero;

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::{
    Bar, Commentary, CommentaryGenerator, EngineConfig, Ema, Indicator, Macd, OhlcvSeries, Price,
    Rsi, RsiValue, SavitzkyGolay, Sma,
    error::{Error, Result},
};

/// Derived indicator columns, aligned 1:1 with an [`OhlcvSeries`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndicatorSet {
    sma: Vec<Option<Price>>,
    ema: Vec<Price>,
    rsi: Vec<Option<RsiValue>>,
    macd: Vec<Price>,
    signal: Vec<Price>,
    hist: Vec<Price>,
}

impl IndicatorSet {
    /// Computes every indicator over `series`.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] for the first indicator whose minimum
    /// length is not met, or [`Error::InvalidConfig`] if the signal filter
    /// cannot be built.
    pub fn compute(series: &OhlcvSeries, config: &EngineConfig) -> Result<Self> {
        let closes = series.closes();
        let period = config.period_nz();
        let (fast, slow) = config.macd_nz();
        let (window, polyorder) = config.signal_filter();

        let sma = compute_column(Sma::new(period), &closes)?;
        let ema = compute_column(Ema::new(period), &closes)?;
        let rsi = compute_column(Rsi::new(period), &closes)?;
        let macd = compute_column(Macd::new(fast, slow), &closes)?;
        let signal = compute_column(SavitzkyGolay::new(window, polyorder)?, &macd)?;
        let hist = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        Ok(Self {
            sma,
            ema,
            rsi,
            macd,
            signal,
            hist,
        })
    }

    /// Simple moving average of close; `None` until the window is full.
    #[must_use]
    pub fn sma(&self) -> &[Option<Price>] {
        &self.sma
    }

    /// Kernel EMA of close, leading entries back-filled.
    #[must_use]
    pub fn ema(&self) -> &[Price] {
        &self.ema
    }

    /// RSI readings; `None` for the first `period` bars.
    #[must_use]
    pub fn rsi(&self) -> &[Option<RsiValue>] {
        &self.rsi
    }

    #[must_use]
    pub fn macd(&self) -> &[Price] {
        &self.macd
    }

    /// Polynomial-smoothed MACD.
    #[must_use]
    pub fn signal(&self) -> &[Price] {
        &self.signal
    }

    /// `MACD − SIGNAL`.
    #[must_use]
    pub fn hist(&self) -> &[Price] {
        &self.hist
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hist.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }
}

fn compute_column<I: Indicator>(indicator: I, input: &[Price]) -> Result<Vec<I::Output>> {
    let column = indicator.try_compute(input).inspect_err(|err| {
        warn!(%indicator, %err, "indicator prerequisites not met");
    })?;
    trace!(%indicator, bars = column.len(), "computed indicator");
    Ok(column)
}

/// All indicator values of one bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EnrichedRow {
    #[serde(flatten)]
    pub bar: Bar,
    pub sma: Option<Price>,
    pub ema: Price,
    pub rsi: Option<RsiValue>,
    pub macd: Price,
    pub signal: Price,
    pub hist: Price,
}

/// Indicator values of the most recent bar, all defined.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LatestReading {
    pub bar: Bar,
    pub period: usize,
    pub sma: Price,
    pub ema: Price,
    pub rsi: RsiValue,
    pub macd: Price,
    pub signal: Price,
    pub hist: Price,
}

/// A series together with the indicators computed over it.
///
/// Only produced by a successful computation, so every indicator is
/// defined on the latest bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedSeries {
    series: OhlcvSeries,
    indicators: IndicatorSet,
    #[serde(skip)]
    config: EngineConfig,
}

impl EnrichedSeries {
    /// Computes the indicators of `config` over `series`.
    ///
    /// # Errors
    ///
    /// See [`IndicatorSet::compute`].
    pub fn compute(series: OhlcvSeries, config: EngineConfig) -> Result<Self> {
        let indicators = IndicatorSet::compute(&series, &config)?;

        Ok(Self {
            series,
            indicators,
            config,
        })
    }

    #[must_use]
    pub fn series(&self) -> &OhlcvSeries {
        &self.series
    }

    #[must_use]
    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn period(&self) -> usize {
        self.config.period()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Always `false`: series are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Bar and indicator values at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<EnrichedRow> {
        let ind = &self.indicators;

        Some(EnrichedRow {
            bar: *self.series.bars().get(index)?,
            sma: ind.sma[index],
            ema: ind.ema[index],
            rsi: ind.rsi[index],
            macd: ind.macd[index],
            signal: ind.signal[index],
            hist: ind.hist[index],
        })
    }

    /// All rows in chronological order.
    pub fn rows(&self) -> impl Iterator<Item = EnrichedRow> + '_ {
        (0..self.len()).filter_map(|index| self.row(index))
    }

    /// Values of the most recent bar.
    ///
    /// # Panics
    ///
    /// If SMA or RSI is undefined on the latest bar. Computation rejects
    /// series that short, so this indicates a broken invariant.
    #[must_use]
    pub fn latest(&self) -> LatestReading {
        let last = self.len() - 1;
        let row = self
            .row(last)
            .expect("EnrichedSeries invariant violation: indicator columns shorter than series");

        LatestReading {
            bar: row.bar,
            period: self.period(),
            sma: row
                .sma
                .expect("EnrichedSeries invariant violation: SMA undefined on latest bar"),
            ema: row.ema,
            rsi: row
                .rsi
                .expect("EnrichedSeries invariant violation: RSI undefined on latest bar"),
            macd: row.macd,
            signal: row.signal,
            hist: row.hist,
        }
    }
}

/// Holds one OHLCV snapshot and the indicators computed over it.
///
/// The engine owns its working copy of the series. Recomputing with a new
/// period replaces every indicator column; the series itself never changes.
/// A failed recomputation leaves the previous columns in place.
///
/// # Example
///
/// ```
/// use ta_commentary::{Bar, IndicatorEngine, OhlcvSeries};
///
/// let bars = (1..=40u32)
///     .map(|t| {
///         let close = 100.0 + f64::from(t);
///         Bar::new(u64::from(t), close - 0.5, close + 1.0, close - 1.0, close)
///     })
///     .collect();
/// let series = OhlcvSeries::new(bars).unwrap();
///
/// let mut engine = IndicatorEngine::with_period(series, 20).unwrap();
/// assert!(engine.latest().bar.close > engine.latest().sma);
///
/// engine.change_period(10).unwrap();
/// assert_eq!(engine.period(), 10);
///
/// assert!(engine.change_period(40).is_err());
/// assert_eq!(engine.period(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct IndicatorEngine {
    enriched: EnrichedSeries,
}

impl IndicatorEngine {
    /// Takes ownership of `series` and computes every indicator.
    ///
    /// # Errors
    ///
    /// [`Error::InsufficientData`] when the series is too short for the
    /// configured period or signal window.
    pub fn new(series: OhlcvSeries, config: EngineConfig) -> Result<Self> {
        debug!(bars = series.len(), %config, "computing indicators");

        Ok(Self {
            enriched: EnrichedSeries::compute(series, config)?,
        })
    }

    /// Default config with the given period.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPeriod`] for zero, otherwise as [`IndicatorEngine::new`].
    pub fn with_period(series: OhlcvSeries, period: usize) -> Result<Self> {
        Self::new(series, EngineConfig::with_period(non_zero_period(period)?))
    }

    /// Recomputes every indicator under `config`.
    ///
    /// # Errors
    ///
    /// Same as [`IndicatorEngine::new`]; on error the previous indicators stay.
    pub fn compute(&mut self, config: EngineConfig) -> Result<&EnrichedSeries> {
        debug!(bars = self.enriched.len(), %config, "recomputing indicators");

        let indicators = IndicatorSet::compute(&self.enriched.series, &config)?;
        self.enriched.indicators = indicators;
        self.enriched.config = config;

        Ok(&self.enriched)
    }

    /// Replaces the analysis period and recomputes every indicator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPeriod`] for zero, otherwise as
    /// [`IndicatorEngine::compute`].
    pub fn change_period(&mut self, period: usize) -> Result<&EnrichedSeries> {
        let period = non_zero_period(period)?;
        debug!(
            from = self.enriched.period(),
            to = period.get(),
            "changing analysis period"
        );

        let config = self.enriched.config.with_replaced_period(period);

        self.compute(config)
    }

    #[must_use]
    pub fn enriched(&self) -> &EnrichedSeries {
        &self.enriched
    }

    #[must_use]
    pub fn series(&self) -> &OhlcvSeries {
        &self.enriched.series
    }

    #[must_use]
    pub fn indicators(&self) -> &IndicatorSet {
        &self.enriched.indicators
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.enriched.config
    }

    #[must_use]
    pub fn period(&self) -> usize {
        self.enriched.period()
    }

    /// See [`EnrichedSeries::latest`].
    #[must_use]
    pub fn latest(&self) -> LatestReading {
        self.enriched.latest()
    }

    /// Commentary from the default generator.
    #[must_use]
    pub fn commentary(&self) -> Commentary {
        CommentaryGenerator::default().generate(&self.enriched)
    }

    /// Releases the enriched series.
    #[must_use]
    pub fn into_enriched(self) -> EnrichedSeries {
        self.enriched
    }
}

fn non_zero_period(period: usize) -> Result<NonZero<usize>> {
    NonZero::new(period).ok_or(Error::InvalidPeriod(period))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        error::IndicatorKind,
        test_util::{assert_approx, rising, series_of},
    };

    fn nz(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    mod flat_series {
        use super::*;

        fn engine() -> IndicatorEngine {
            IndicatorEngine::with_period(series_of(&[100.0; 30]), 20).unwrap()
        }

        #[test]
        fn sma_is_flat_once_window_full() {
            let engine = engine();
            let sma = engine.indicators().sma();
            assert!(sma[..19].iter().all(Option::is_none));
            assert!(sma[19..].iter().all(|v| *v == Some(100.0)));
        }

        #[test]
        fn rsi_is_hundred() {
            let engine = engine();
            let rsi = engine.indicators().rsi();
            assert!(rsi[..20].iter().all(Option::is_none));
            for reading in rsi[20..].iter().flatten() {
                assert_eq!(reading.value(), 100.0);
                assert!(reading.is_flat());
            }
        }

        #[test]
        fn hist_is_zero() {
            let engine = engine();
            assert!(engine.indicators().macd().iter().all(|v| *v == 0.0));
            assert!(engine.indicators().hist().iter().all(|v| *v == 0.0));
        }
    }

    mod alignment {
        use super::*;

        #[test]
        fn every_column_matches_series_length() {
            let engine = IndicatorEngine::with_period(series_of(&rising(10.0, 35)), 5).unwrap();
            let ind = engine.indicators();
            for len in [
                ind.sma().len(),
                ind.ema().len(),
                ind.rsi().len(),
                ind.macd().len(),
                ind.signal().len(),
                ind.hist().len(),
            ] {
                assert_eq!(len, 35);
            }
            assert_eq!(engine.enriched().rows().count(), 35);
        }

        #[test]
        fn hist_is_macd_minus_signal() {
            let closes: Vec<f64> = (0..60)
                .map(|i| 100.0 + (f64::from(i) * 0.4).sin() * 5.0)
                .collect();
            let engine = IndicatorEngine::with_period(series_of(&closes), 14).unwrap();
            let ind = engine.indicators();

            for i in 0..ind.len() {
                assert_eq!(ind.hist()[i], ind.macd()[i] - ind.signal()[i]);
            }
        }

        #[test]
        fn row_exposes_bar_and_values() {
            let engine = IndicatorEngine::with_period(series_of(&rising(10.0, 12)), 3).unwrap();
            let row = engine.enriched().row(11).unwrap();
            assert_eq!(row.bar.close, 21.0);
            assert_approx!(row.sma.unwrap(), 20.0);
            assert!(engine.enriched().row(12).is_none());
        }
    }

    mod latest {
        use super::*;

        #[test]
        fn reads_last_bar() {
            let engine = IndicatorEngine::with_period(series_of(&rising(50.0, 60)), 20).unwrap();
            let latest = engine.latest();
            assert_eq!(latest.bar.close, 109.0);
            assert_eq!(latest.period, 20);
            assert_approx!(latest.sma, 99.5);
            assert!(latest.ema < latest.bar.close);
            assert_eq!(latest.rsi.value(), 100.0);
        }
    }

    mod requirements {
        use super::*;

        #[test]
        fn rejects_zero_period() {
            let result = IndicatorEngine::with_period(series_of(&[1.0; 20]), 0);
            assert!(matches!(result, Err(Error::InvalidPeriod(0))));
        }

        #[test]
        fn rejects_series_without_bar_past_period() {
            let result = IndicatorEngine::with_period(series_of(&rising(1.0, 20)), 20);
            assert!(matches!(
                result,
                Err(Error::InsufficientData {
                    indicator: IndicatorKind::Ema,
                    required: 21,
                    available: 20,
                })
            ));
        }

        #[test]
        fn rejects_series_shorter_than_signal_window() {
            let result = IndicatorEngine::with_period(series_of(&rising(1.0, 8)), 3);
            assert!(matches!(
                result,
                Err(Error::InsufficientData {
                    indicator: IndicatorKind::Signal,
                    required: 9,
                    available: 8,
                })
            ));
        }

        #[test]
        fn reports_sma_first_when_shorter_than_period() {
            let result = IndicatorEngine::with_period(series_of(&rising(1.0, 10)), 15);
            assert!(matches!(
                result,
                Err(Error::InsufficientData {
                    indicator: IndicatorKind::Sma,
                    ..
                })
            ));
        }
    }

    mod change_period {
        use super::*;

        fn closes() -> Vec<f64> {
            (0..80)
                .map(|i| 50.0 + (f64::from(i) * 0.3).cos() * 4.0 + f64::from(i) * 0.1)
                .collect()
        }

        #[test]
        fn equivalent_to_fresh_engine() {
            let mut changed = IndicatorEngine::with_period(series_of(&closes()), 20).unwrap();
            changed.change_period(7).unwrap();

            let fresh = IndicatorEngine::with_period(series_of(&closes()), 7).unwrap();

            assert_eq!(changed.indicators(), fresh.indicators());
            assert_eq!(changed.config(), fresh.config());
        }

        #[test]
        fn keeps_series_untouched() {
            let mut engine = IndicatorEngine::with_period(series_of(&closes()), 20).unwrap();
            let before = engine.series().clone();
            engine.change_period(30).unwrap();
            assert_eq!(engine.series(), &before);
        }

        #[test]
        fn failure_keeps_previous_indicators() {
            let mut engine = IndicatorEngine::with_period(series_of(&closes()), 20).unwrap();
            let before = engine.indicators().clone();

            assert!(matches!(
                engine.change_period(80),
                Err(Error::InsufficientData { .. })
            ));
            assert!(matches!(
                engine.change_period(0),
                Err(Error::InvalidPeriod(0))
            ));

            assert_eq!(engine.indicators(), &before);
            assert_eq!(engine.period(), 20);
        }

        #[test]
        fn keeps_custom_macd_and_signal() {
            let config = EngineConfig::builder()
                .period(nz(10))
                .macd_spans(nz(6), nz(13))
                .signal_filter(5, 2)
                .build()
                .unwrap();
            let mut engine = IndicatorEngine::new(series_of(&closes()), config).unwrap();

            engine.change_period(15).unwrap();
            assert_eq!(engine.config().macd_spans(), (6, 13));
            assert_eq!(engine.config().signal_filter(), (5, 2));
        }
    }
}
