//! Per-attribute results and their outcomes

use crate::confidence::Confidence;
use std::fmt;
use std::time::Duration;

/// Sentinel value for an attribute the documents do not state
pub const NOT_FOUND: &str = "NOT FOUND";

/// Sentinel value for an attribute whose extraction failed
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";

/// The two literal markers of the answer protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Introduces the reasoning section
    Reasoning,

    /// Introduces the final-answer section
    Answer,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Reasoning => f.write_str("reasoning marker"),
            Marker::Answer => f.write_str("answer marker"),
        }
    }
}

/// Why an attribute ended up with a sentinel value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// The raw answer lacked one of the protocol markers
    MissingMarker(Marker),

    /// The answer section did not start with a recognizable value
    UnrecognizedAnswer(String),

    /// The completion endpoint returned no text
    EmptyResponse,

    /// The completion endpoint failed or returned a non-success status
    Completion(String),

    /// The completion call exceeded its time budget
    Timeout(Duration),

    /// The attribute's configuration was unusable
    InvalidSpec(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::MissingMarker(marker) => write!(f, "response missing {}", marker),
            DegradedReason::UnrecognizedAnswer(answer) => {
                write!(f, "unrecognized answer: {:?}", answer)
            }
            DegradedReason::EmptyResponse => f.write_str("empty response"),
            DegradedReason::Completion(msg) => write!(f, "completion failed: {}", msg),
            DegradedReason::Timeout(after) => write!(f, "timed out after {:?}", after),
            DegradedReason::InvalidSpec(msg) => write!(f, "invalid attribute spec: {}", msg),
        }
    }
}

/// Tagged outcome of one attribute extraction
///
/// The value string alone conflates "the model said not found" with "the
/// response could not be parsed". The outcome keeps them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered with a value
    Found,

    /// The model explicitly answered `NOT FOUND`
    NotFound,

    /// Extraction or parsing failed and the value is a fallback sentinel
    Degraded(DegradedReason),
}

impl Outcome {
    /// Whether the outcome represents a failure of the pipeline
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    /// Short status label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Found => "found",
            Outcome::NotFound => "not found",
            Outcome::Degraded(_) => "degraded",
        }
    }
}

/// Result of analyzing one attribute
///
/// Invariants: `confidence` is in `[0, 100]` (enforced by [`Confidence`]) and
/// `value` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeResult {
    attribute: String,
    value: String,
    confidence: Confidence,
    outcome: Outcome,
}

impl AttributeResult {
    /// A value the model found
    ///
    /// An empty value is stored as [`NOT_FOUND`] with an
    /// [`DegradedReason::UnrecognizedAnswer`] outcome.
    pub fn found(
        attribute: impl Into<String>,
        value: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            return Self::degraded(
                attribute,
                DegradedReason::UnrecognizedAnswer(value),
                confidence,
            );
        }
        Self {
            attribute: attribute.into(),
            value,
            confidence,
            outcome: Outcome::Found,
        }
    }

    /// The model reported the attribute as absent
    pub fn not_found(attribute: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            attribute: attribute.into(),
            value: NOT_FOUND.to_string(),
            confidence,
            outcome: Outcome::NotFound,
        }
    }

    /// The response was obtained but could not be interpreted
    ///
    /// Carries the [`NOT_FOUND`] sentinel with best-effort confidence.
    pub fn degraded(
        attribute: impl Into<String>,
        reason: DegradedReason,
        confidence: Confidence,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            value: NOT_FOUND.to_string(),
            confidence,
            outcome: Outcome::Degraded(reason),
        }
    }

    /// No usable response was obtained at all
    ///
    /// Carries the [`ANALYSIS_ERROR`] sentinel with zero confidence.
    pub fn analysis_error(attribute: impl Into<String>, reason: DegradedReason) -> Self {
        Self {
            attribute: attribute.into(),
            value: ANALYSIS_ERROR.to_string(),
            confidence: Confidence::ZERO,
            outcome: Outcome::Degraded(reason),
        }
    }

    /// Attribute name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Extracted value or sentinel
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Confidence score
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Tagged outcome
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Whether the value is a sentinel
    pub fn is_sentinel(&self) -> bool {
        self.value == NOT_FOUND || self.value == ANALYSIS_ERROR
    }

    /// `(value, confidence)` pair, the shape presentation layers consume
    pub fn pair(&self) -> (&str, u8) {
        (&self.value, self.confidence.value())
    }
}
