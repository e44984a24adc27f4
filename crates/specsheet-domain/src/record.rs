//! The aggregate record of one pipeline run

use crate::attribute::AttributeResult;
use crate::document::ExtractionMethod;
use std::fmt;
use std::time::Duration;

/// Unique identifier for a pipeline run based on UUIDv7
///
/// UUIDv7 sorts chronologically, so run identifiers in logs and exports
/// order by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use specsheet_domain::RunId;
    ///
    /// let id = RunId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Parse a RunId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Ingestion timing for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTiming {
    /// Display name of the document
    pub name: String,

    /// Route that produced its text
    pub method: ExtractionMethod,

    /// Characters of text obtained
    pub chars: usize,

    /// Time spent extracting
    pub elapsed: Duration,
}

/// Timing metadata of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTimings {
    /// One entry per ingested document, in input order
    pub documents: Vec<DocumentTiming>,

    /// Time spent in the attribute-extraction stage
    pub extraction: Duration,
}

impl RunTimings {
    /// Total ingestion time across all documents
    pub fn ingestion(&self) -> Duration {
        self.documents.iter().map(|d| d.elapsed).sum()
    }

    /// Ingestion plus extraction
    pub fn total(&self) -> Duration {
        self.ingestion() + self.extraction
    }
}

/// Every attribute result of one run
///
/// Created once when the pipeline completes and immutable afterwards.
/// Results keep roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRecord {
    run_id: RunId,
    documents: Vec<String>,
    results: Vec<AttributeResult>,
    timings: RunTimings,
}

impl AnalysisRecord {
    /// Assemble a record
    pub fn new(
        run_id: RunId,
        documents: Vec<String>,
        results: Vec<AttributeResult>,
        timings: RunTimings,
    ) -> Self {
        Self {
            run_id,
            documents,
            results,
            timings,
        }
    }

    /// Identifier of the run that produced the record
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Names of the processed documents, in input order
    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    /// All results, in roster order
    pub fn results(&self) -> &[AttributeResult] {
        &self.results
    }

    /// Look up one attribute's result
    pub fn get(&self, attribute: &str) -> Option<&AttributeResult> {
        self.results.iter().find(|r| r.attribute() == attribute)
    }

    /// Number of attribute results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the record holds no results
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results whose extraction degraded
    pub fn degraded(&self) -> impl Iterator<Item = &AttributeResult> {
        self.results.iter().filter(|r| r.outcome().is_degraded())
    }

    /// Timing metadata
    pub fn timings(&self) -> &RunTimings {
        &self.timings
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        let found = self
            .results
            .iter()
            .filter(|r| !r.is_sentinel())
            .count();
        format!(
            "run {}: {} document(s), {} attribute(s), {} found, {} degraded, {:.1}s total",
            self.run_id,
            self.documents.len(),
            self.results.len(),
            found,
            self.degraded().count(),
            self.timings.total().as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::DegradedReason;
    use crate::confidence::Confidence;

    fn sample_record() -> AnalysisRecord {
        let results = vec![
            AttributeResult::found("material", "PA66", Confidence::new(100)),
            AttributeResult::not_found("colour", Confidence::new(60)),
            AttributeResult::analysis_error(
                "gender",
                DegradedReason::Completion("HTTP 503".to_string()),
            ),
        ];
        let timings = RunTimings {
            documents: vec![
                DocumentTiming {
                    name: "a.pdf".to_string(),
                    method: ExtractionMethod::TextLayer,
                    chars: 1200,
                    elapsed: Duration::from_millis(300),
                },
                DocumentTiming {
                    name: "b.pdf".to_string(),
                    method: ExtractionMethod::Ocr,
                    chars: 800,
                    elapsed: Duration::from_millis(700),
                },
            ],
            extraction: Duration::from_secs(2),
        };
        AnalysisRecord::new(
            RunId::new(),
            vec!["a.pdf".to_string(), "b.pdf".to_string()],
            results,
            timings,
        )
    }

    #[test]
    fn test_lookup_by_attribute() {
        let record = sample_record();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("material").unwrap().value(), "PA66");
        assert!(record.get("unknown").is_none());
    }

    #[test]
    fn test_degraded_filter() {
        let record = sample_record();
        let degraded: Vec<_> = record.degraded().map(|r| r.attribute()).collect();
        assert_eq!(degraded, vec!["gender"]);
    }

    #[test]
    fn test_timings() {
        let record = sample_record();
        assert_eq!(record.timings().ingestion(), Duration::from_secs(1));
        assert_eq!(record.timings().total(), Duration::from_secs(3));
    }

    #[test]
    fn test_summary() {
        let summary = sample_record().summary();
        assert!(summary.contains("2 document(s)"));
        assert!(summary.contains("1 found"));
        assert!(summary.contains("1 degraded"));
    }

    #[test]
    fn test_run_id_round_trip() {
        let id = RunId::new();
        let parsed = RunId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
        assert!(id.timestamp() > 0);
    }
}
