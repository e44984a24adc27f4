//! Parse raw model answers into attribute values
//!
//! The model is asked to answer in two sections:
//!
//! ```text
//! REASONING: ✓ found the material table ✓ matched the housing row ✓ ...
//! MATERIAL NAME: PA66GF30
//! ```
//!
//! The parser locates the reasoning marker, then the answer marker after it,
//! and slices between them. Every failure is an ordinary [`ParsedAnswer`]
//! variant; nothing here returns an error.

use crate::spec::AttributeSpec;
use once_cell::sync::Lazy;
use regex::Regex;
use specsheet_domain::confidence;
use specsheet_domain::{AttributeResult, Confidence, DegradedReason, Marker, NOT_FOUND};

/// Leading value of an answer section. The sentinel comes first so it is
/// never cut down to `NOT`.
static ANSWER_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:NOT FOUND|[A-Z0-9]+)").expect("Invalid answer value regex")
});

/// Longest answer snippet kept for diagnostics
const MAX_SNIPPET_CHARS: usize = 80;

/// Result of parsing one raw answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAnswer {
    /// A value was read from the answer section
    Value {
        /// The extracted token
        value: String,
        /// Score of the reasoning section
        confidence: Confidence,
    },

    /// The model answered with the `NOT FOUND` sentinel
    NotFound {
        /// Score of the reasoning section
        confidence: Confidence,
    },

    /// The answer section did not start with a recognizable token
    Unrecognized {
        /// Leading part of the answer section
        answer: String,
        /// Score of the reasoning section
        confidence: Confidence,
    },

    /// A protocol marker was missing
    MissingMarker {
        /// Which marker
        marker: Marker,
        /// Best-effort score; zero when the reasoning marker itself is missing
        confidence: Confidence,
    },
}

impl ParsedAnswer {
    /// Confidence carried by the parse
    pub fn confidence(&self) -> Confidence {
        match self {
            ParsedAnswer::Value { confidence, .. }
            | ParsedAnswer::NotFound { confidence }
            | ParsedAnswer::Unrecognized { confidence, .. }
            | ParsedAnswer::MissingMarker { confidence, .. } => *confidence,
        }
    }

    /// Convert into the result for `attribute`
    pub fn into_result(self, attribute: impl Into<String>) -> AttributeResult {
        match self {
            ParsedAnswer::Value { value, confidence } => {
                AttributeResult::found(attribute, value, confidence)
            }
            ParsedAnswer::NotFound { confidence } => {
                AttributeResult::not_found(attribute, confidence)
            }
            ParsedAnswer::Unrecognized { answer, confidence } => AttributeResult::degraded(
                attribute,
                DegradedReason::UnrecognizedAnswer(answer),
                confidence,
            ),
            ParsedAnswer::MissingMarker { marker, confidence } => AttributeResult::degraded(
                attribute,
                DegradedReason::MissingMarker(marker),
                confidence,
            ),
        }
    }
}

/// Marker-driven parser for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser {
    reasoning_marker: String,
    answer_marker: String,
}

impl ResponseParser {
    /// Create a parser for explicit markers
    pub fn new(reasoning_marker: impl Into<String>, answer_marker: impl Into<String>) -> Self {
        Self {
            reasoning_marker: reasoning_marker.into(),
            answer_marker: answer_marker.into(),
        }
    }

    /// Create a parser using a spec's markers
    pub fn for_spec(spec: &AttributeSpec) -> Self {
        Self::new(spec.reasoning_marker.clone(), spec.answer_marker())
    }

    /// Parse a raw answer
    pub fn parse(&self, raw: &str) -> ParsedAnswer {
        let Some(reasoning_start) = raw.find(&self.reasoning_marker) else {
            return ParsedAnswer::MissingMarker {
                marker: Marker::Reasoning,
                confidence: Confidence::ZERO,
            };
        };
        let after_reasoning = &raw[reasoning_start + self.reasoning_marker.len()..];

        let Some(answer_start) = after_reasoning.find(&self.answer_marker) else {
            return ParsedAnswer::MissingMarker {
                marker: Marker::Answer,
                confidence: confidence::score(after_reasoning),
            };
        };

        let reasoning = &after_reasoning[..answer_start];
        let answer = after_reasoning[answer_start + self.answer_marker.len()..].trim();
        let confidence = confidence::score(reasoning);

        match ANSWER_VALUE.find(answer).map(|m| m.as_str()) {
            Some(NOT_FOUND) => ParsedAnswer::NotFound { confidence },
            Some(value) => ParsedAnswer::Value {
                value: value.to_string(),
                confidence,
            },
            None => ParsedAnswer::Unrecognized {
                answer: answer.chars().take(MAX_SNIPPET_CHARS).collect(),
                confidence,
            },
        }
    }
}
