//! Analyzer: runs one resume/JD pair through extraction, parsing, embedding and
//! scoring, and assembles the final report.

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::extraction::document::{self, DocumentFormat, ExtractionError};
use crate::extraction::jd::parse_jd;
use crate::extraction::normalize::normalize_text;
use crate::extraction::resume::parse_resume;
use crate::models::jd::ParsedJD;
use crate::models::report::AnalysisReport;
use crate::models::resume::ParsedResume;
use crate::scoring::{ScoringEngine, ScoringError};
use crate::similarity::SimilarityEngine;

pub mod handlers;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// An uploaded document.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub bytes: Bytes,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub enum JdInput {
    File(DocumentInput),
    Text(String),
}

#[derive(Clone)]
pub struct Analyzer {
    scoring: ScoringEngine,
    similarity: SimilarityEngine,
    max_file_size: usize,
    supported_formats: Vec<String>,
}

impl Analyzer {
    pub fn new(config: &Config, similarity: SimilarityEngine) -> Self {
        Self {
            scoring: ScoringEngine::new(config.weights),
            similarity,
            max_file_size: config.max_file_size,
            supported_formats: config.supported_formats.clone(),
        }
    }

    pub fn similarity(&self) -> &SimilarityEngine {
        &self.similarity
    }

    /// Resolves the document format, rejecting extensions outside the
    /// configured allow-list even when a decoder exists.
    fn format_of(&self, filename: &str) -> Result<DocumentFormat, ExtractionError> {
        let format = DocumentFormat::from_filename(filename)?;
        if self.supported_formats.iter().any(|ext| ext == format.extension()) {
            Ok(format)
        } else {
            Err(ExtractionError::UnsupportedFormat(filename.to_string()))
        }
    }

    fn check_size(&self, input: &DocumentInput) -> Result<(), AnalysisError> {
        if input.bytes.len() > self.max_file_size {
            return Err(AnalysisError::PayloadTooLarge {
                size: input.bytes.len(),
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Decodes and normalizes on the blocking pool.
    async fn extract_text(&self, input: DocumentInput) -> Result<String, AnalysisError> {
        self.check_size(&input)?;
        let format = self.format_of(&input.filename)?;
        let text = on_blocking_pool("extraction", move || document::extract(&input.bytes, format))
            .await??;
        Ok(text)
    }

    pub async fn extract_and_parse_resume(
        &self,
        input: DocumentInput,
    ) -> Result<ParsedResume, AnalysisError> {
        let text = self.extract_text(input).await?;
        on_blocking_pool("resume parsing", move || parse_resume(&text)).await
    }

    pub async fn extract_and_parse_jd(&self, input: DocumentInput) -> Result<ParsedJD, AnalysisError> {
        let text = self.extract_text(input).await?;
        on_blocking_pool("jd parsing", move || parse_jd(&text)).await
    }

    pub async fn parse_jd_text(&self, text: String) -> Result<ParsedJD, AnalysisError> {
        on_blocking_pool("jd parsing", move || parse_jd(&normalize_text(&text))).await
    }

    pub async fn analyze(
        &self,
        resume: DocumentInput,
        jd: JdInput,
    ) -> Result<AnalysisReport, AnalysisError> {
        let request_id = Uuid::new_v4();

        let parsed_resume = self.extract_and_parse_resume(resume).await?;
        let parsed_jd = match jd {
            JdInput::File(input) => self.extract_and_parse_jd(input).await?,
            JdInput::Text(text) => self.parse_jd_text(text).await?,
        };

        let similarity = self
            .similarity
            .compare(&parsed_resume.raw_text, &parsed_jd.raw_text)
            .await;

        // fuzzy keyword matching is linear in resume length per keyword
        let scoring = self.scoring.clone();
        let (report, parsed_resume, parsed_jd) = on_blocking_pool("scoring", move || {
            scoring
                .score(&parsed_resume, &parsed_jd)
                .map(|report| (report, parsed_resume, parsed_jd))
        })
        .await??;

        info!(
            "Analysis {request_id} complete: overall={} seniority={} similarity={:.3} ({})",
            report.overall_score,
            parsed_jd.seniority.as_str(),
            similarity.score,
            similarity.backend.as_str()
        );

        Ok(AnalysisReport {
            request_id,
            report,
            semantic_similarity: similarity.score,
            similarity_backend: similarity.backend.as_str().to_string(),
            raw_parsed_resume: parsed_resume.raw_text,
            raw_parsed_jd: parsed_jd.raw_text,
            created_at: Utc::now(),
        })
    }
}

/// Runs CPU-bound work off the async workers.
async fn on_blocking_pool<T, F>(stage: &str, work: F) -> Result<T, AnalysisError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AnalysisError::Internal(format!("{stage} task failed: {e}")))
}
