// sentilex-stats/src/scoring/mod.rs

use libm::fabs;

/// Half-width of the neutral band on the polarity scale.
pub const NEUTRAL_BAND: f64 = 1.0 / 3.0;

/// The three classes a polarity score is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetClass {
    Positive,
    Negative,
    Neutral,
}

impl TargetClass {
    /// Converts the class into a scalar target, scaled by `label_smoothing`.
    pub fn target_polarity(self, label_smoothing: f64) -> f64 {
        match self {
            TargetClass::Positive => label_smoothing,
            TargetClass::Negative => -label_smoothing,
            TargetClass::Neutral => 0.0,
        }
    }

    /// Whether `polarity` falls inside this class's band.
    ///
    /// The bands partition the real line: `[1/3, ∞)` is positive,
    /// `(-∞, -1/3]` is negative and the open interval `(-1/3, 1/3)` is neutral.
    pub fn contains(self, polarity: f64) -> bool {
        match self {
            TargetClass::Positive => polarity >= NEUTRAL_BAND,
            TargetClass::Negative => polarity <= -NEUTRAL_BAND,
            TargetClass::Neutral => fabs(polarity) < NEUTRAL_BAND,
        }
    }
}

/// `|predicted - target|` for the smoothed target polarity of `class`.
pub fn absolute_error(predicted: f64, class: TargetClass, label_smoothing: f64) -> f64 {
    fabs(predicted - class.target_polarity(label_smoothing))
}

/// `true` when `predicted` lies outside the band of `class` (a miss).
pub fn categorical_error(predicted: f64, class: TargetClass) -> bool {
    !class.contains(predicted)
}

/// Clamps a score onto the closed polarity interval `[-1, 1]`.
///
/// NaN is passed through untouched so "no signal" survives clamping.
pub fn clamp_polarity(value: f64) -> f64 {
    if value.is_nan() {
        return value;
    }
    value.clamp(-1.0, 1.0)
}
