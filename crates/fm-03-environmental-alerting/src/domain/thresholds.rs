//! Safe operating ranges.

use super::reading::ReadingKind;

/// Inclusive safe interval. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SafeRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// True when `value` falls outside the range.
    pub fn is_violated_by(&self, value: f64) -> bool {
        self.min.is_some_and(|min| value < min) || self.max.is_some_and(|max| value > max)
    }
}

/// Safe ranges for every reading kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Degrees Celsius.
    pub temperature: SafeRange,
    /// Percent relative humidity.
    pub humidity: SafeRange,
    /// Shock magnitude in g.
    pub shock: SafeRange,
}

impl AlertThresholds {
    /// Fixed ranges for lithium battery transport.
    pub const STANDARD: AlertThresholds = AlertThresholds {
        temperature: SafeRange::between(-10.0, 45.0),
        humidity: SafeRange::between(20.0, 80.0),
        shock: SafeRange::at_most(5.0),
    };

    pub fn range_for(&self, kind: ReadingKind) -> SafeRange {
        match kind {
            ReadingKind::Temperature => self.temperature,
            ReadingKind::Humidity => self.humidity,
            ReadingKind::Shock => self.shock,
        }
    }

    pub fn is_alert(&self, kind: ReadingKind, value: f64) -> bool {
        self.range_for(kind).is_violated_by(value)
    }
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self::STANDARD
    }
}
