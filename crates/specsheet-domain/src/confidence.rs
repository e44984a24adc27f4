//! Confidence scoring for attribute answers
//!
//! The completion prompt asks the model to walk through a fixed checklist and
//! emit a [`STEP_MARKER`] for every step it completed. The score is the share
//! of the nominal [`EXPECTED_STEPS`] that were ticked off.
//!
//! This is a heuristic proxy for how thoroughly the model reasoned, not a
//! probability that the extracted value is correct. Tests and callers must not
//! interpret it as one.

use std::fmt;

/// Glyph the model emits once per completed reasoning step
pub const STEP_MARKER: char = '✓';

/// Nominal number of reasoning checkpoints requested by the prompts
pub const EXPECTED_STEPS: u32 = 5;

/// Upper bound of every confidence score
pub const MAX_CONFIDENCE: u8 = 100;

/// Confidence score in `[0, 100]`
///
/// Construction clamps, so a `Confidence` can never leave its range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Confidence(u8);

impl Confidence {
    /// Zero confidence, used for every failed extraction
    pub const ZERO: Confidence = Confidence(0);

    /// Full confidence
    pub const FULL: Confidence = Confidence(MAX_CONFIDENCE);

    /// Create a confidence score, clamping to 100
    pub fn new(value: u32) -> Self {
        Self(value.min(MAX_CONFIDENCE as u32) as u8)
    }

    /// Get the raw score
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Count the step markers in a reasoning section
pub fn count_steps(reasoning: &str) -> usize {
    reasoning.chars().filter(|c| *c == STEP_MARKER).count()
}

/// Convert a number of completed steps into a score
///
/// `min(100, round(100 * count / EXPECTED_STEPS))`, computed in integers.
pub fn score_count(count: usize) -> Confidence {
    let count = u32::try_from(count).unwrap_or(u32::MAX).min(EXPECTED_STEPS);
    Confidence::new((100 * count + EXPECTED_STEPS / 2) / EXPECTED_STEPS)
}

/// Score a reasoning section
///
/// # Examples
///
/// ```
/// use specsheet_domain::confidence::score;
///
/// assert_eq!(score("no checkpoints").value(), 0);
/// assert_eq!(score("✓ read ✓ located ✓ matched").value(), 60);
/// assert_eq!(score("✓✓✓✓✓✓✓").value(), 100);
/// ```
pub fn score(reasoning: &str) -> Confidence {
    score_count(count_steps(reasoning))
}
