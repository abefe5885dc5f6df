use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use crate::analysis::{DocumentInput, JdInput};
use crate::errors::AppError;
use crate::models::report::AnalysisReport;
use crate::similarity::ModelInfo;
use crate::state::AppState;

/// Optional descriptive fields sent with an analysis. Logged, not scored.
#[derive(Debug, Default)]
pub struct RequestMetadata {
    pub job_title: Option<String>,
    pub target_seniority: Option<String>,
}

#[derive(Debug, Default)]
pub struct AnalyzeForm {
    pub resume: Option<DocumentInput>,
    pub jd_file: Option<DocumentInput>,
    pub jd_text: Option<String>,
    pub metadata: RequestMetadata,
}

impl AnalyzeForm {
    /// Resume is mandatory; a JD file wins over JD text.
    pub fn into_inputs(self) -> Result<(DocumentInput, JdInput, RequestMetadata), AppError> {
        let resume = self
            .resume
            .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;

        let jd = match (self.jd_file, self.jd_text) {
            (Some(file), _) => JdInput::File(file),
            (None, Some(text)) if !text.trim().is_empty() => JdInput::Text(text),
            _ => {
                return Err(AppError::Validation(
                    "Either JD file or JD text is required".to_string(),
                ))
            }
        };
        Ok((resume, jd, self.metadata))
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

pub async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" | "jd_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // browsers send an empty part for an untouched file input
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                let input = DocumentInput { bytes, filename };
                if name == "resume" {
                    form.resume = Some(input);
                } else {
                    form.jd_file = Some(input);
                }
            }
            "jd_text" => form.jd_text = Some(field.text().await.map_err(multipart_error)?),
            // accepted form fields that play no part in scoring
            "candidate_name" | "candidate_email" => {}
            "job_title" => {
                form.metadata.job_title = Some(field.text().await.map_err(multipart_error)?)
            }
            "target_seniority" => {
                form.metadata.target_seniority = Some(field.text().await.map_err(multipart_error)?)
            }
            other => debug!("Ignoring unknown multipart field '{other}'"),
        }
    }
    Ok(form)
}

/// POST /api/v1/scoring/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let (resume, jd, metadata) = read_form(multipart).await?.into_inputs()?;
    info!(
        "Analyze request: resume={} job_title={:?} target_seniority={:?}",
        resume.filename, metadata.job_title, metadata.target_seniority
    );
    let report = state.analyzer.analyze(resume, jd).await?;
    Ok(Json(report))
}

/// POST /api/v1/scoring/analyze-sync
/// Same pipeline as `/analyze`; kept for clients of the synchronous endpoint.
pub async fn handle_analyze_sync(
    state: State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    handle_analyze(state, multipart).await
}

/// GET /api/v1/scoring/model-info
pub async fn handle_model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    Json(state.analyzer.similarity().model_info())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn doc(name: &str) -> DocumentInput {
        DocumentInput {
            bytes: Bytes::from_static(b"text"),
            filename: name.to_string(),
        }
    }

    #[test]
    fn test_missing_resume_rejected() {
        let form = AnalyzeForm {
            jd_text: Some("Python developer".to_string()),
            ..AnalyzeForm::default()
        };
        let err = form.into_inputs().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Resume file is required"));
    }

    #[test]
    fn test_blank_jd_text_counts_as_missing() {
        let form = AnalyzeForm {
            resume: Some(doc("cv.txt")),
            jd_text: Some("   ".to_string()),
            ..AnalyzeForm::default()
        };
        let err = form.into_inputs().unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref m) if m == "Either JD file or JD text is required")
        );
    }

    #[test]
    fn test_jd_file_preferred_over_text() {
        let form = AnalyzeForm {
            resume: Some(doc("cv.txt")),
            jd_file: Some(doc("jd.txt")),
            jd_text: Some("ignored".to_string()),
            ..AnalyzeForm::default()
        };
        let (_, jd, _) = form.into_inputs().unwrap();
        assert!(matches!(jd, JdInput::File(ref f) if f.filename == "jd.txt"));
    }
}
