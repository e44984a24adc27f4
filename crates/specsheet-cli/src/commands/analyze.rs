//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::export::export_csv;
use crate::output::Formatter;
use specsheet_domain::document::PDF_MEDIA_TYPE;
use specsheet_domain::Document;
use specsheet_extractor::{ExecutionMode, ExtractorConfig, Pipeline};
use specsheet_ingest::TextExtractor;
use specsheet_llm::ChatCompletionsProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Media type declared for anything that is not a PDF
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let roster = config.roster();
    if roster.is_empty() {
        return Err(CliError::Config(
            "No attributes configured (run `specsheet init` to write a template)".into(),
        ));
    }
    for entry in roster.invalid() {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "Attribute '{}' is invalid and will report ANALYSIS_ERROR",
                entry.name()
            ))
        );
    }

    let extraction = extraction_config(&config.extraction, args.parallel)?;
    let documents = read_documents(&args.files).await?;

    let mut provider = ChatCompletionsProvider::with_timeout(
        config.completion.endpoint.clone(),
        Duration::from_secs(config.completion.timeout_secs),
    )?;
    match config.api_key() {
        Some(key) => provider = provider.with_api_key(key),
        None => warn!(
            "{} is not set; only attributes with their own api_key can be analyzed",
            config.completion.api_key_env
        ),
    }

    let pipeline = Pipeline::new(
        &roster,
        Arc::new(provider),
        TextExtractor::pdf(config.ingest.clone()),
        extraction,
    );

    info!(
        "Analyzing {} file(s) for {} attribute(s)",
        documents.len(),
        if args.only.is_empty() {
            roster.len()
        } else {
            args.only.len()
        }
    );

    let record = if args.only.is_empty() {
        pipeline.run(documents).await?
    } else {
        pipeline.run_attributes(documents, &args.only).await?
    };

    if formatter.format() == OutputFormat::Table {
        println!("{}\n", formatter.summary(&record));
    }
    println!("{}", formatter.format_record(&record, &roster)?);

    if let Some(path) = args.csv {
        export_csv(&path, &record, &roster)?;
        if formatter.format() != OutputFormat::Quiet {
            println!(
                "{}",
                formatter.success(&format!("Results exported to {}", path.display()))
            );
        }
    }

    Ok(())
}

/// Apply a `--parallel` override to the configured execution mode.
pub fn extraction_config(
    base: &ExtractorConfig,
    parallel: Option<usize>,
) -> Result<ExtractorConfig> {
    let mut config = base.clone();
    if let Some(max_in_flight) = parallel {
        if max_in_flight == 0 {
            return Err(CliError::InvalidInput(
                "--parallel must be greater than 0".to_string(),
            ));
        }
        config.execution = ExecutionMode::Bounded { max_in_flight };
    }
    Ok(config)
}

/// Media type declared for `path`, judged by its extension.
pub fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MEDIA_TYPE,
        _ => OCTET_STREAM,
    }
}

/// Read every file into a [`Document`], keeping argument order.
pub async fn read_documents(paths: &[PathBuf]) -> Result<Vec<Document>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            CliError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.push(Document::new(name, media_type_for(path), bytes));
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_for(Path::new("housing.pdf")), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("HOUSING.PDF")), PDF_MEDIA_TYPE);
        assert_eq!(media_type_for(Path::new("notes.txt")), OCTET_STREAM);
        assert_eq!(media_type_for(Path::new("README")), OCTET_STREAM);
    }

    #[test]
    fn test_parallel_override() {
        let base = ExtractorConfig::default();

        let config = extraction_config(&base, Some(4)).unwrap();
        assert_eq!(config.execution, ExecutionMode::Bounded { max_in_flight: 4 });

        let config = extraction_config(&base, None).unwrap();
        assert_eq!(config.execution, base.execution);

        assert!(matches!(
            extraction_config(&base, Some(0)),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_read_documents_keeps_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("b.pdf");
        let second = dir.path().join("a.txt");
        std::fs::write(&first, b"%PDF-1.4").unwrap();
        std::fs::write(&second, b"notes").unwrap();

        let documents = read_documents(&[first, second]).await.unwrap();

        assert_eq!(documents[0].name(), "b.pdf");
        assert_eq!(documents[0].media_type(), PDF_MEDIA_TYPE);
        assert_eq!(documents[1].name(), "a.txt");
        assert_eq!(documents[1].media_type(), OCTET_STREAM);
        assert_eq!(documents[1].bytes(), b"notes");
    }

    #[tokio::test]
    async fn test_missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = read_documents(&[dir.path().join("absent.pdf")]).await;
        assert!(matches!(result, Err(CliError::InvalidInput(msg)) if msg.contains("absent.pdf")));
    }
}
