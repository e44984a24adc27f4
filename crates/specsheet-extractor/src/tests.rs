//! Integration tests for the pipeline

#[cfg(test)]
mod tests {
    use crate::{
        AttributeSpec, ExecutionMode, ExtractorConfig, Pipeline, PipelineError, PipelineState,
        Roster, RosterEntry,
    };
    use specsheet_domain::traits::{CompletionProvider, CompletionRequest, OcrEngine, TextLayer};
    use specsheet_domain::{
        DegradedReason, Document, ExtractionMethod, Outcome, ANALYSIS_ERROR, NOT_FOUND,
    };
    use specsheet_ingest::{IngestConfig, TextExtractor};
    use specsheet_llm::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Text layer that returns the document bytes as UTF-8
    struct Utf8TextLayer;

    impl TextLayer for Utf8TextLayer {
        type Error = String;

        fn extract_text(&self, bytes: &[u8]) -> Result<String, Self::Error> {
            String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string())
        }
    }

    struct CountingOcr {
        calls: Arc<AtomicUsize>,
    }

    impl OcrEngine for CountingOcr {
        type Error = String;

        fn recognize_pages(&self, _bytes: &[u8]) -> Result<Vec<String>, Self::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err("scanner offline".to_string())
        }
    }

    /// Provider that answers every attribute after a delay and records how
    /// many calls were in flight at once
    #[derive(Default)]
    struct GaugeProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl GaugeProvider {
        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    impl CompletionProvider for GaugeProvider {
        type Error = String;

        async fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(50)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            // The system prompt is the attribute key
            let marker = request.system_message.to_uppercase().replace('_', " ");
            Ok(format!("REASONING: ✓✓ {}: OK", marker))
        }
    }

    fn gauge_roster(count: usize) -> Roster {
        Roster::new((0..count).map(|i| {
            let name = format!("attr_{}", i);
            AttributeSpec::new(name.clone(), name, "test-model")
        }))
    }

    fn gauge_pipeline(
        provider: Arc<GaugeProvider>,
        roster: &Roster,
        config: ExtractorConfig,
    ) -> Pipeline<GaugeProvider, Utf8TextLayer, CountingOcr> {
        let text_extractor = TextExtractor::new(
            Utf8TextLayer,
            CountingOcr {
                calls: Arc::new(AtomicUsize::new(0)),
            },
            IngestConfig::default(),
        );
        Pipeline::new(roster, provider, text_extractor, config)
    }

    const ATTRIBUTES: &[(&str, &str)] = &[
        ("material_name", "REASONING: ✓✓✓ MATERIAL NAME: PA66GF30"),
        ("colour", "REASONING: ✓✓✓✓ COLOUR: BLACK"),
        ("cavities", "REASONING: ✓✓✓✓✓ CAVITIES: 12"),
        ("sealing_class", "REASONING: ✓✓ SEALING CLASS: IP67"),
        ("tpa", "REASONING: ✓ TPA: NOT FOUND"),
    ];

    fn prompt(name: &str) -> String {
        format!("Find the {} of the connector housing", name)
    }

    fn roster() -> Roster {
        Roster::new(
            ATTRIBUTES
                .iter()
                .map(|(name, _)| AttributeSpec::new(*name, prompt(name), "test-model")),
        )
    }

    fn provider() -> MockProvider {
        let mut provider = MockProvider::default();
        for (name, response) in ATTRIBUTES {
            provider.add_response(prompt(name), *response);
        }
        provider
    }

    struct Harness {
        pipeline: Pipeline<MockProvider, Utf8TextLayer, CountingOcr>,
        provider: Arc<MockProvider>,
        ocr_calls: Arc<AtomicUsize>,
    }

    fn harness(provider: MockProvider, roster: &Roster, config: ExtractorConfig) -> Harness {
        let provider = Arc::new(provider);
        let ocr_calls = Arc::new(AtomicUsize::new(0));
        let text_extractor = TextExtractor::new(
            Utf8TextLayer,
            CountingOcr {
                calls: Arc::clone(&ocr_calls),
            },
            IngestConfig::default(),
        );
        Harness {
            pipeline: Pipeline::new(roster, Arc::clone(&provider), text_extractor, config),
            provider,
            ocr_calls,
        }
    }

    fn datasheet(name: &str) -> Document {
        Document::pdf(
            name,
            format!(
                "{}: connector housing, 12 cavities in 2 rows, PA66 GF30, black, IP67",
                name
            )
            .into_bytes(),
        )
    }

    fn bounded() -> ExtractorConfig {
        ExtractorConfig {
            execution: ExecutionMode::Bounded { max_in_flight: 2 },
            ..ExtractorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_full_run() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());
        assert_eq!(h.pipeline.state(), PipelineState::Idle);

        let record = h
            .pipeline
            .run(vec![datasheet("a.pdf"), datasheet("b.pdf")])
            .await
            .unwrap();

        assert_eq!(h.pipeline.state(), PipelineState::Complete);
        assert_eq!(record.documents(), &["a.pdf".to_string(), "b.pdf".to_string()]);
        assert_eq!(record.len(), ATTRIBUTES.len());

        assert_eq!(record.get("material_name").unwrap().pair(), ("PA66GF30", 60));
        assert_eq!(record.get("colour").unwrap().pair(), ("BLACK", 80));
        assert_eq!(record.get("cavities").unwrap().pair(), ("12", 100));
        assert_eq!(record.get("sealing_class").unwrap().pair(), ("IP67", 40));

        let tpa = record.get("tpa").unwrap();
        assert_eq!(tpa.pair(), (NOT_FOUND, 20));
        assert_eq!(tpa.outcome(), &Outcome::NotFound);

        assert_eq!(record.degraded().count(), 0);
        assert_eq!(h.provider.call_count(), ATTRIBUTES.len());
        assert_eq!(h.ocr_calls.load(Ordering::SeqCst), 0);

        let timings = record.timings();
        assert_eq!(timings.documents.len(), 2);
        assert!(timings
            .documents
            .iter()
            .all(|d| d.method == ExtractionMethod::TextLayer));
    }

    #[tokio::test]
    async fn test_results_keep_roster_order() {
        let h = harness(provider(), &roster(), bounded());
        let record = h.pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

        let names: Vec<_> = record.results().iter().map(|r| r.attribute()).collect();
        let expected: Vec<_> = ATTRIBUTES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_every_request_sees_documents_in_order() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());
        h.pipeline
            .run(vec![datasheet("first.pdf"), datasheet("second.pdf")])
            .await
            .unwrap();

        for request in h.provider.requests() {
            let first = request.user_message.find("first.pdf").unwrap();
            let second = request.user_message.find("second.pdf").unwrap();
            assert!(first < second);
        }
    }

    #[tokio::test]
    async fn test_one_failing_attribute_is_isolated() {
        for config in [ExtractorConfig::default(), bounded()] {
            let mut provider = provider();
            provider.add_error(prompt("colour"));
            let h = harness(provider, &roster(), config);

            let record = h.pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

            assert_eq!(record.len(), ATTRIBUTES.len());
            assert_eq!(record.get("colour").unwrap().pair(), (ANALYSIS_ERROR, 0));
            assert_eq!(record.get("material_name").unwrap().pair(), ("PA66GF30", 60));
            assert_eq!(record.get("cavities").unwrap().pair(), ("12", 100));
            assert_eq!(record.degraded().count(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_isolated() {
        for config in [ExtractorConfig::default(), bounded()] {
            let mut provider = provider();
            provider.add_delayed_response(
                prompt("sealing_class"),
                Duration::from_secs(300),
                "REASONING: ✓ SEALING CLASS: IP69K",
            );
            let h = harness(provider, &roster(), config);

            let record = h.pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

            let sealing = record.get("sealing_class").unwrap();
            assert_eq!(sealing.pair(), (ANALYSIS_ERROR, 0));
            assert!(matches!(
                sealing.outcome(),
                Outcome::Degraded(DegradedReason::Timeout(_))
            ));
            assert_eq!(record.get("colour").unwrap().pair(), ("BLACK", 80));
            assert_eq!(record.len(), ATTRIBUTES.len());
        }
    }

    #[tokio::test]
    async fn test_unstructured_answer_is_not_found() {
        let mut provider = provider();
        provider.add_response(prompt("colour"), "no structured output");
        let h = harness(provider, &roster(), ExtractorConfig::default());

        let record = h.pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

        let colour = record.get("colour").unwrap();
        assert_eq!(colour.pair(), (NOT_FOUND, 0));
        assert!(colour.outcome().is_degraded());
    }

    #[tokio::test]
    async fn test_no_valid_documents_is_run_fatal() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());
        let documents = vec![
            Document::new("notes.txt", "text/plain", b"plain".to_vec()),
            Document::new("photo.png", "image/png", vec![0x89, 0x50]),
        ];

        let result = h.pipeline.run(documents).await;

        assert_eq!(result, Err(PipelineError::NoValidDocuments { submitted: 2 }));
        assert_eq!(h.pipeline.state(), PipelineState::Failed);
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_documents_are_dropped_silently() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());
        let documents = vec![
            Document::new("notes.txt", "text/plain", b"plain".to_vec()),
            datasheet("a.pdf"),
        ];

        let record = h.pipeline.run(documents).await.unwrap();
        assert_eq!(record.documents(), &["a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_unreadable_document_degrades_but_run_continues() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());
        let documents = vec![
            Document::pdf("scan.pdf", vec![0xff, 0xfe, 0x00]),
            datasheet("a.pdf"),
        ];

        let record = h.pipeline.run(documents).await.unwrap();

        let methods: Vec<_> = record.timings().documents.iter().map(|d| d.method).collect();
        assert_eq!(methods, vec![ExtractionMethod::Degraded, ExtractionMethod::TextLayer]);
        assert_eq!(h.ocr_calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.get("colour").unwrap().value(), "BLACK");
    }

    #[tokio::test]
    async fn test_invalid_spec_only_fails_its_attribute() {
        let mut specs: Vec<_> = ATTRIBUTES
            .iter()
            .map(|(name, _)| AttributeSpec::new(*name, prompt(name), "test-model"))
            .collect();
        specs[1].model = String::new();
        let roster = Roster::new(specs);
        assert!(matches!(roster.entries()[1], RosterEntry::Invalid { .. }));

        let h = harness(provider(), &roster, ExtractorConfig::default());
        let record = h.pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

        let colour = record.get("colour").unwrap();
        assert_eq!(colour.pair(), (ANALYSIS_ERROR, 0));
        assert!(matches!(
            colour.outcome(),
            Outcome::Degraded(DegradedReason::InvalidSpec(_))
        ));
        assert_eq!(h.provider.call_count(), ATTRIBUTES.len() - 1);
    }

    #[tokio::test]
    async fn test_run_attributes_subset() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());

        let record = h
            .pipeline
            .run_attributes(vec![datasheet("a.pdf")], &["cavities", "colour"])
            .await
            .unwrap();

        let names: Vec<_> = record.results().iter().map(|r| r.attribute()).collect();
        assert_eq!(names, vec!["cavities", "colour"]);
        assert_eq!(h.provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_run_attributes_unknown_name() {
        let h = harness(provider(), &roster(), ExtractorConfig::default());

        let result = h
            .pipeline
            .run_attributes(vec![datasheet("a.pdf")], &["width"])
            .await;

        assert_eq!(result, Err(PipelineError::UnknownAttribute("width".to_string())));
        assert_eq!(h.pipeline.state(), PipelineState::Idle);
        assert_eq!(h.provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_mode_limits_requests_in_flight() {
        let provider = Arc::new(GaugeProvider::default());
        let config = ExtractorConfig {
            execution: ExecutionMode::Bounded { max_in_flight: 3 },
            ..ExtractorConfig::default()
        };
        let pipeline = gauge_pipeline(Arc::clone(&provider), &gauge_roster(10), config);

        let record = pipeline.run(vec![datasheet("a.pdf")]).await.unwrap();

        assert_eq!(record.len(), 10);
        assert!(record.results().iter().all(|r| r.value() == "OK"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 10);
        assert!(provider.peak() <= 3);
        assert!(provider.peak() > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_runs_are_serialized() {
        let provider = Arc::new(GaugeProvider::default());
        let pipeline = gauge_pipeline(
            Arc::clone(&provider),
            &gauge_roster(3),
            ExtractorConfig::default(),
        );

        let (first, second) = tokio::join!(
            pipeline.run(vec![datasheet("a.pdf")]),
            pipeline.run(vec![datasheet("b.pdf")]),
        );

        assert_eq!(first.unwrap().documents(), &["a.pdf".to_string()]);
        assert_eq!(second.unwrap().documents(), &["b.pdf".to_string()]);
        assert_eq!(provider.peak(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
        assert_eq!(pipeline.state(), PipelineState::Complete);
    }
}
