//! Pipeline orchestration
//!
//! ```text
//! Idle → Ingesting → Extracting → Complete
//!            │
//!            └──(no valid documents)──→ Failed
//! ```
//!
//! Documents are validated and ingested one at a time, each on a blocking
//! worker. The corpus is then handed, read-only, to every attribute
//! extractor, either one after another or through a bounded fan-out. A run
//! only fails as a whole when validation leaves nothing to ingest.

use crate::config::{ExecutionMode, ExtractorConfig};
use crate::error::PipelineError;
use crate::extractor::AttributeExtractor;
use crate::registry::AttributeRegistry;
use crate::spec::Roster;
use specsheet_domain::traits::{CompletionProvider, OcrEngine, TextLayer};
use specsheet_domain::{
    AnalysisRecord, AttributeResult, Corpus, DegradedReason, Document, DocumentTiming,
    ExtractedText, ExtractionMethod, RunId, RunTimings,
};
use specsheet_ingest::{retain_valid, IngestConfig, TextExtractor};
use std::fmt::{self, Display};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Stage of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No run has started
    Idle,
    /// Validating documents and extracting their text
    Ingesting,
    /// Running the attribute extractors
    Extracting,
    /// The last run produced a record
    Complete,
    /// The last run had no valid documents
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Ingesting => "ingesting",
            PipelineState::Extracting => "extracting",
            PipelineState::Complete => "complete",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs documents through ingestion and every attribute extractor
///
/// Runs on one pipeline are serialized: a second `run` waits until the first
/// has finished, so [`Pipeline::state`] always describes a single run.
pub struct Pipeline<L, T, O> {
    registry: AttributeRegistry<L>,
    text_extractor: Arc<TextExtractor<T, O>>,
    ingest: IngestConfig,
    config: ExtractorConfig,
    state: Mutex<PipelineState>,
    run_lock: tokio::sync::Mutex<()>,
}

impl<L, T, O> Pipeline<L, T, O>
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display + Send,
    T: TextLayer + Send + Sync + 'static,
    T::Error: Display,
    O: OcrEngine + Send + Sync + 'static,
    O::Error: Display,
{
    /// Create a pipeline
    ///
    /// The ingest configuration used for validation is the one the text
    /// extractor was built with.
    pub fn new(
        roster: &Roster,
        provider: Arc<L>,
        text_extractor: TextExtractor<T, O>,
        config: ExtractorConfig,
    ) -> Self {
        let registry = AttributeRegistry::new(roster, provider, &config);
        Self {
            registry,
            ingest: text_extractor.config().clone(),
            text_extractor: Arc::new(text_extractor),
            config,
            state: Mutex::new(PipelineState::Idle),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Current stage
    pub fn state(&self) -> PipelineState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: PipelineState) {
        debug!("Pipeline state: {}", state);
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// The extractors of this pipeline
    pub fn registry(&self) -> &AttributeRegistry<L> {
        &self.registry
    }

    /// Run every attribute of the roster over `documents`
    ///
    /// # Errors
    ///
    /// Returns `NoValidDocuments` if validation rejects every document. All
    /// other failures are recorded in the returned record.
    pub async fn run(&self, documents: Vec<Document>) -> Result<AnalysisRecord, PipelineError> {
        self.execute(documents, self.registry.all()).await
    }

    /// Run a subset of the roster, in the order given
    ///
    /// # Errors
    ///
    /// Returns `UnknownAttribute` before any work starts if a name is not in
    /// the roster, or `NoValidDocuments` as for [`Pipeline::run`].
    pub async fn run_attributes<S: AsRef<str>>(
        &self,
        documents: Vec<Document>,
        names: &[S],
    ) -> Result<AnalysisRecord, PipelineError> {
        let extractors = self.registry.select(names)?;
        self.execute(documents, extractors).await
    }

    async fn execute(
        &self,
        documents: Vec<Document>,
        extractors: Vec<Arc<AttributeExtractor<L>>>,
    ) -> Result<AnalysisRecord, PipelineError> {
        let _run = self.run_lock.lock().await;
        self.set_state(PipelineState::Ingesting);

        let submitted = documents.len();
        let documents = retain_valid(documents, &self.ingest);
        if documents.is_empty() {
            warn!("All {} submitted document(s) were rejected", submitted);
            self.set_state(PipelineState::Failed);
            return Err(PipelineError::NoValidDocuments { submitted });
        }
        info!(
            "Ingesting {} of {} submitted document(s)",
            documents.len(),
            submitted
        );

        let mut texts = Vec::with_capacity(documents.len());
        for document in documents {
            texts.push(self.ingest_one(document).await);
        }

        let corpus = Corpus::build(texts.iter().map(|t| (&t.source, &t.text)));
        let timings: Vec<DocumentTiming> = texts
            .into_iter()
            .map(|t| DocumentTiming {
                chars: t.text.chars().count(),
                name: t.source,
                method: t.method,
                elapsed: t.elapsed,
            })
            .collect();
        info!(
            "Corpus built: {} chars from {} document(s)",
            corpus.char_count(),
            timings.len()
        );

        self.set_state(PipelineState::Extracting);
        let start = Instant::now();
        let results = match self.config.execution {
            ExecutionMode::Sequential => run_sequential(&extractors, &corpus).await,
            ExecutionMode::Bounded { max_in_flight } => {
                run_bounded(&extractors, corpus, max_in_flight).await
            }
        };
        let extraction = start.elapsed();

        let names = timings.iter().map(|t| t.name.clone()).collect();
        let record = AnalysisRecord::new(
            RunId::new(),
            names,
            results,
            RunTimings {
                documents: timings,
                extraction,
            },
        );

        self.set_state(PipelineState::Complete);
        info!("{}", record.summary());
        Ok(record)
    }

    async fn ingest_one(&self, document: Document) -> ExtractedText {
        let name = document.name().to_string();
        let start = Instant::now();
        let extractor = Arc::clone(&self.text_extractor);

        match tokio::task::spawn_blocking(move || extractor.extract(&document)).await {
            Ok(text) => {
                if text.method == ExtractionMethod::Degraded {
                    warn!("{}: degraded text extraction", name);
                }
                text
            }
            Err(e) => {
                warn!("{}: text extraction task failed: {}", name, e);
                ExtractedText::degraded(name, start.elapsed())
            }
        }
    }
}

async fn run_sequential<L>(
    extractors: &[Arc<AttributeExtractor<L>>],
    corpus: &Corpus,
) -> Vec<AttributeResult>
where
    L: CompletionProvider,
    L::Error: Display,
{
    let mut results = Vec::with_capacity(extractors.len());
    for (idx, extractor) in extractors.iter().enumerate() {
        debug!("[{}/{}] {}", idx + 1, extractors.len(), extractor.name());
        results.push(extractor.analyze(corpus).await);
    }
    results
}

/// Fan out with at most `max_in_flight` concurrent requests
///
/// Waits for every task. A failing or panicking task affects only its own
/// slot, and results keep the order of `extractors`.
async fn run_bounded<L>(
    extractors: &[Arc<AttributeExtractor<L>>],
    corpus: Corpus,
    max_in_flight: usize,
) -> Vec<AttributeResult>
where
    L: CompletionProvider + Send + Sync + 'static,
    L::Error: Display + Send,
{
    let corpus = Arc::new(corpus);
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
    let mut tasks = JoinSet::new();

    for (idx, extractor) in extractors.iter().enumerate() {
        let extractor = Arc::clone(extractor);
        let corpus = Arc::clone(&corpus);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            // The semaphore is never closed
            let _permit = semaphore.acquire_owned().await.ok();
            (idx, extractor.analyze(&corpus).await)
        });
    }

    let mut slots: Vec<Option<AttributeResult>> = vec![None; extractors.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(result),
            Err(e) => warn!("Attribute task failed: {}", e),
        }
    }

    slots
        .into_iter()
        .zip(extractors)
        .map(|(slot, extractor)| {
            slot.unwrap_or_else(|| {
                AttributeResult::analysis_error(
                    extractor.name(),
                    DegradedReason::Completion("extraction task aborted".to_string()),
                )
            })
        })
        .collect()
}
