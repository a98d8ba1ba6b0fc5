use std::fmt::Display;

use serde::Serialize;
use tracing::debug;

use crate::{CommentaryConfig, EnrichedSeries, LatestReading};

/// Rule group an [`Observation`] belongs to, in evaluation order.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Trend,
    Momentum,
    Macd,
    Candle,
}

/// One observation about the latest bar.
///
/// `Display` renders the human-readable message.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// Close above both moving averages.
    Uptrend { period: usize },
    /// Close below both moving averages.
    Downtrend { period: usize },
    /// Close between the moving averages or touching one.
    NearMovingAverages,
    Overbought { level: f64 },
    Oversold { level: f64 },
    /// Positive MACD histogram.
    BullishMomentum,
    /// Negative MACD histogram.
    BearishMomentum,
    /// Close above open.
    BullishPressure,
    /// Close below open.
    BearishPressure,
}

impl Observation {
    #[must_use]
    pub fn category(&self) -> RuleCategory {
        match self {
            Self::Uptrend { .. } | Self::Downtrend { .. } | Self::NearMovingAverages => {
                RuleCategory::Trend
            }
            Self::Overbought { .. } | Self::Oversold { .. } => RuleCategory::Momentum,
            Self::BullishMomentum | Self::BearishMomentum => RuleCategory::Macd,
            Self::BullishPressure | Self::BearishPressure => RuleCategory::Candle,
        }
    }
}

impl Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uptrend { period } => write!(
                f,
                "Price is above both the {period}-period SMA and {period}-period EMA, suggesting an uptrend."
            ),
            Self::Downtrend { period } => write!(
                f,
                "Price is below both the {period}-period SMA and {period}-period EMA, suggesting a downtrend."
            ),
            Self::NearMovingAverages => f.write_str(
                "Price is crossing or near the moving averages, indicating potential trend reversal.",
            ),
            Self::Overbought { level } => {
                write!(f, "RSI is above {level}, indicating overbought conditions.")
            }
            Self::Oversold { level } => {
                write!(f, "RSI is below {level}, indicating oversold conditions.")
            }
            Self::BullishMomentum => {
                f.write_str("MACD histogram is positive, suggesting bullish momentum.")
            }
            Self::BearishMomentum => {
                f.write_str("MACD histogram is negative, suggesting bearish momentum.")
            }
            Self::BullishPressure => {
                f.write_str("Price closed higher than the open, indicating bullish pressure.")
            }
            Self::BearishPressure => {
                f.write_str("Price closed lower than the open, indicating bearish pressure.")
            }
        }
    }
}

/// Ordered observations: trend, then momentum, MACD, candle.
///
/// Holds between one and four entries, at most one per [`RuleCategory`].
#[derive(PartialEq, Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Commentary {
    observations: Vec<Observation>,
}

impl Commentary {
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Message text of every observation.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.observations.iter().map(ToString::to_string).collect()
    }

    /// Observation of the given rule group, if it fired.
    #[must_use]
    pub fn get(&self, category: RuleCategory) -> Option<&Observation> {
        self.observations
            .iter()
            .find(|observation| observation.category() == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always `false`: the trend rule always fires.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }
}

impl<'a> IntoIterator for &'a Commentary {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// Applies the fixed rule battery to the latest bar of an enriched series.
///
/// Each rule group contributes at most one observation; alternatives within
/// a group are mutually exclusive:
///
/// 1. trend: close vs. SMA and EMA, always fires;
/// 2. momentum: RSI above overbought or below oversold;
/// 3. MACD: sign of the histogram, silent at exactly zero;
/// 4. candle: close vs. open, silent when equal.
///
/// A window that saw no price movement at all reads RSI 100 but emits no
/// momentum observation.
///
/// # Example
///
/// ```
/// use ta_commentary::{Bar, CommentaryGenerator, IndicatorEngine, OhlcvSeries, Observation};
///
/// let bars = (1..=30).map(|t| Bar::new(t, 100.0, 100.0, 100.0, 100.0)).collect();
/// let engine = IndicatorEngine::with_period(OhlcvSeries::new(bars).unwrap(), 20).unwrap();
///
/// let commentary = CommentaryGenerator::default().generate(engine.enriched());
/// assert_eq!(commentary.observations(), &[Observation::NearMovingAverages]);
/// ```
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct CommentaryGenerator {
    config: CommentaryConfig,
}

impl CommentaryGenerator {
    #[must_use]
    pub fn new(config: CommentaryConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CommentaryConfig {
        &self.config
    }

    /// Commentary on the most recent bar of `enriched`.
    #[must_use]
    pub fn generate(&self, enriched: &EnrichedSeries) -> Commentary {
        self.generate_for(&enriched.latest())
    }

    /// Commentary on a single reading.
    #[must_use]
    pub fn generate_for(&self, reading: &LatestReading) -> Commentary {
        let mut observations = vec![Self::trend(reading)];
        observations.extend(self.momentum(reading));
        observations.extend(Self::macd(reading));
        observations.extend(Self::candle(reading));

        debug!(
            observations = observations.len(),
            close = reading.bar.close,
            "generated commentary"
        );

        Commentary { observations }
    }

    fn trend(reading: &LatestReading) -> Observation {
        let close = reading.bar.close;

        if close > reading.sma && close > reading.ema {
            Observation::Uptrend {
                period: reading.period,
            }
        } else if close < reading.sma && close < reading.ema {
            Observation::Downtrend {
                period: reading.period,
            }
        } else {
            Observation::NearMovingAverages
        }
    }

    fn momentum(&self, reading: &LatestReading) -> Option<Observation> {
        if reading.rsi.is_flat() {
            return None;
        }

        let rsi = reading.rsi.value();

        if rsi > self.config.overbought() {
            Some(Observation::Overbought {
                level: self.config.overbought(),
            })
        } else if rsi < self.config.oversold() {
            Some(Observation::Oversold {
                level: self.config.oversold(),
            })
        } else {
            None
        }
    }

    fn macd(reading: &LatestReading) -> Option<Observation> {
        if reading.hist > 0.0 {
            Some(Observation::BullishMomentum)
        } else if reading.hist < 0.0 {
            Some(Observation::BearishMomentum)
        } else {
            None
        }
    }

    fn candle(reading: &LatestReading) -> Option<Observation> {
        let bar = &reading.bar;

        if bar.close > bar.open {
            Some(Observation::BullishPressure)
        } else if bar.close < bar.open {
            Some(Observation::BearishPressure)
        } else {
            None
        }
    }
}
