//! Extract → prompt → infer pipeline shared by the document handlers.

use thiserror::Error;
use tracing::{error, info};

use crate::documents::extract::{extract_text_blocking, ExtractError};
use crate::documents::models::AnalysisResult;
use crate::documents::prompts::{query_prompt, summarize_prompt};
use crate::documents::upload::StoredUpload;
use crate::llm_client::{InferenceClient, InferenceError};

pub const DOCUMENT_UNREADABLE: &str =
    "Could not read the document. Please upload a valid .docx file.";
pub const SUMMARY_EMPTY: &str = "Summary could not be generated from the document.";
pub const SUMMARY_MALFORMED: &str = "Error occurred while generating the summary.";
pub const SUMMARY_FAILED: &str = "Error occurred while analyzing the document.";
pub const SUMMARY_TOO_LONG: &str = "The document is too long to be summarized.";
pub const STORAGE_FAILED: &str = "The document could not be stored for processing.";
pub const NO_ANSWER: &str = "No relevant information found in the document for your query.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::Extract(_) => "DOCUMENT_PARSE_ERROR",
            AnalysisError::Inference(e) => e.code(),
        }
    }

    /// Text shown in place of a summary when summarizing fails.
    pub fn summary_message(&self) -> &'static str {
        match self {
            AnalysisError::Extract(_) => DOCUMENT_UNREADABLE,
            AnalysisError::Inference(InferenceError::EmptyResult) => SUMMARY_EMPTY,
            AnalysisError::Inference(InferenceError::MalformedResponse) => SUMMARY_MALFORMED,
            AnalysisError::Inference(InferenceError::PromptTooLong { .. }) => SUMMARY_TOO_LONG,
            AnalysisError::Inference(_) => SUMMARY_FAILED,
        }
    }
}

/// Removes markdown emphasis and turns each line break into a paragraph break.
pub fn format_summary(text: &str) -> String {
    format!("Summary:\n\n{}", text.replace('*', "").replace('\n', "\n\n"))
}

pub async fn summarize_document(
    upload: &StoredUpload,
    llm: &InferenceClient,
) -> Result<String, AnalysisError> {
    let doc_text = extract_text_blocking(upload.path.clone()).await?;
    let summary = llm.infer(&summarize_prompt(&doc_text)).await?;
    Ok(format_summary(&summary))
}

/// Summarizes one upload, folding any failure into the result entry.
pub async fn analyze_upload(upload: &StoredUpload, llm: &InferenceClient) -> AnalysisResult {
    match summarize_document(upload, llm).await {
        Ok(summary) => {
            info!("Summarized {}", upload.filename);
            AnalysisResult::success(upload.filename.clone(), summary)
        }
        Err(e) => {
            error!("Failed to summarize {}: {e}", upload.filename);
            AnalysisResult::failure(upload.filename.clone(), e.summary_message(), e.code())
        }
    }
}

pub async fn answer_query(
    upload: &StoredUpload,
    query: &str,
    llm: &InferenceClient,
) -> Result<String, AnalysisError> {
    let doc_text = extract_text_blocking(upload.path.clone()).await?;
    let answer = llm.infer(&query_prompt(&doc_text, query)).await?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary_doubles_newlines_and_strips_asterisks() {
        assert_eq!(
            format_summary("Point A\nPoint B"),
            "Summary:\n\nPoint A\n\nPoint B"
        );
        assert_eq!(
            format_summary("**Key**: growth\n* item"),
            "Summary:\n\nKey: growth\n\n item"
        );
    }

    #[test]
    fn test_summary_messages_per_failure() {
        let empty = AnalysisError::from(InferenceError::EmptyResult);
        assert_eq!(empty.summary_message(), SUMMARY_EMPTY);
        assert_eq!(empty.code(), "INFERENCE_EMPTY_RESULT");

        let malformed = AnalysisError::from(InferenceError::MalformedResponse);
        assert_eq!(malformed.summary_message(), SUMMARY_MALFORMED);

        let status = AnalysisError::from(InferenceError::Status {
            status: 503,
            body: String::new(),
        });
        assert_eq!(status.summary_message(), SUMMARY_FAILED);

        let parse = AnalysisError::from(ExtractError::Parse("bad zip".into()));
        assert_eq!(parse.summary_message(), DOCUMENT_UNREADABLE);
        assert_eq!(parse.code(), "DOCUMENT_PARSE_ERROR");
    }
}
