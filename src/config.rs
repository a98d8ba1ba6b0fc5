use std::{fmt::Display, num::NonZero};

use crate::error::{Error, Result};

const DEFAULT_PERIOD: usize = 20;
const DEFAULT_MACD_FAST: usize = 12;
const DEFAULT_MACD_SLOW: usize = 26;
const DEFAULT_SIGNAL_WINDOW: usize = 9;
const DEFAULT_SIGNAL_POLYORDER: usize = 2;

/// Parameters of the [`IndicatorEngine`](crate::IndicatorEngine).
///
/// Configs are value types: cheap to copy, compare, and hash.
///
/// # Example
///
/// ```rust
/// use ta_commentary::EngineConfig;
/// use std::num::NonZero;
///
/// let config = EngineConfig::builder()
///     .period(NonZero::new(50).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.period(), 50);
/// assert_eq!(config.macd_spans(), (12, 26));
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EngineConfig {
    period: NonZero<usize>,
    macd_fast: NonZero<usize>,
    macd_slow: NonZero<usize>,
    signal_window: usize,
    signal_polyorder: usize,
}

impl EngineConfig {
    /// Returns a new builder with default values.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Default config with the given analysis period.
    #[must_use]
    pub fn with_period(period: NonZero<usize>) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// Analysis period (bars) for SMA, EMA and RSI.
    #[must_use]
    pub fn period(&self) -> usize {
        self.period.get()
    }

    /// `(fast, slow)` spans of the MACD averages.
    #[must_use]
    pub fn macd_spans(&self) -> (usize, usize) {
        (self.macd_fast.get(), self.macd_slow.get())
    }

    /// `(window, polyorder)` of the signal-line smoother.
    #[must_use]
    pub fn signal_filter(&self) -> (usize, usize) {
        (self.signal_window, self.signal_polyorder)
    }

    /// Same parameters with a different analysis period.
    #[must_use]
    pub fn with_replaced_period(self, period: NonZero<usize>) -> Self {
        Self { period, ..self }
    }

    pub(crate) fn period_nz(&self) -> NonZero<usize> {
        self.period
    }

    pub(crate) fn macd_nz(&self) -> (NonZero<usize>, NonZero<usize>) {
        (self.macd_fast, self.macd_slow)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            period: NonZero::new(DEFAULT_PERIOD).expect("non zero default period"),
            macd_fast: NonZero::new(DEFAULT_MACD_FAST).expect("non zero default span"),
            macd_slow: NonZero::new(DEFAULT_MACD_SLOW).expect("non zero default span"),
            signal_window: DEFAULT_SIGNAL_WINDOW,
            signal_polyorder: DEFAULT_SIGNAL_POLYORDER,
        }
    }
}

impl Display for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EngineConfig(period={}, macd={}/{}, signal={}/{})",
            self.period, self.macd_fast, self.macd_slow, self.signal_window, self.signal_polyorder
        )
    }
}

/// Builder for [`EngineConfig`].
///
/// Defaults: period = 20, MACD spans = 12/26, signal = 9-sample quadratic.
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Sets the analysis period.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: NonZero<usize>) -> Self {
        self.config.period = period;
        self
    }

    /// Sets the fast and slow MACD spans.
    #[inline]
    #[must_use]
    pub fn macd_spans(mut self, fast: NonZero<usize>, slow: NonZero<usize>) -> Self {
        self.config.macd_fast = fast;
        self.config.macd_slow = slow;
        self
    }

    /// Sets the signal smoother's window and polynomial order.
    #[inline]
    #[must_use]
    pub fn signal_filter(mut self, window: usize, polyorder: usize) -> Self {
        self.config.signal_window = window;
        self.config.signal_polyorder = polyorder;
        self
    }

    /// Builds and validates the config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when the fast span is not below the slow
    /// span, the signal window is even, or the polynomial order is not below
    /// the window.
    pub fn build(self) -> Result<EngineConfig> {
        let config = self.config;

        if config.macd_fast >= config.macd_slow {
            return Err(Error::InvalidConfig(format!(
                "MACD fast span {} must be below slow span {}",
                config.macd_fast, config.macd_slow
            )));
        }
        if config.signal_window.is_multiple_of(2) {
            return Err(Error::InvalidConfig(format!(
                "signal window must be odd, got {}",
                config.signal_window
            )));
        }
        if config.signal_polyorder >= config.signal_window {
            return Err(Error::InvalidConfig(format!(
                "signal polynomial order {} must be less than window {}",
                config.signal_polyorder, config.signal_window
            )));
        }

        Ok(config)
    }
}

/// RSI thresholds used by the [`CommentaryGenerator`](crate::CommentaryGenerator).
///
/// # Example
///
/// ```rust
/// use ta_commentary::CommentaryConfig;
///
/// let config = CommentaryConfig::builder()
///     .overbought(80.0)
///     .oversold(20.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.overbought(), 80.0);
/// assert!(CommentaryConfig::builder().oversold(90.0).build().is_err());
/// ```
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct CommentaryConfig {
    overbought: f64,
    oversold: f64,
}

impl CommentaryConfig {
    /// Returns a new builder with default values.
    #[must_use]
    pub fn builder() -> CommentaryConfigBuilder {
        CommentaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// RSI strictly above this reads as overbought.
    #[must_use]
    pub fn overbought(&self) -> f64 {
        self.overbought
    }

    /// RSI strictly below this reads as oversold.
    #[must_use]
    pub fn oversold(&self) -> f64 {
        self.oversold
    }
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl Display for CommentaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CommentaryConfig(overbought={}, oversold={})",
            self.overbought, self.oversold
        )
    }
}

/// Builder for [`CommentaryConfig`].
///
/// Defaults: overbought = 70, oversold = 30.
pub struct CommentaryConfigBuilder {
    config: CommentaryConfig,
}

impl CommentaryConfigBuilder {
    #[inline]
    #[must_use]
    pub fn overbought(mut self, level: f64) -> Self {
        self.config.overbought = level;
        self
    }

    #[inline]
    #[must_use]
    pub fn oversold(mut self, level: f64) -> Self {
        self.config.oversold = level;
        self
    }

    /// Builds and validates the config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`] when a level is outside `[0, 100]` or
    /// oversold is not below overbought.
    pub fn build(self) -> Result<CommentaryConfig> {
        let config = self.config;

        for (name, level) in [
            ("overbought", config.overbought),
            ("oversold", config.oversold),
        ] {
            if !(0.0..=100.0).contains(&level) {
                return Err(Error::InvalidConfig(format!(
                    "{name} level must be within [0, 100], got {level}"
                )));
            }
        }
        if config.oversold >= config.overbought {
            return Err(Error::InvalidConfig(format!(
                "oversold level {} must be below overbought level {}",
                config.oversold, config.overbought
            )));
        }

        Ok(config)
    }
}
