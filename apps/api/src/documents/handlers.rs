//! Axum route handlers for the document endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::{debug, error, info};

use crate::documents::analysis::{
    analyze_upload, answer_query, AnalysisError, NO_ANSWER, STORAGE_FAILED,
};
use crate::documents::models::{AnalysisResult, QueryResult};
use crate::documents::upload::sanitize_filename;
use crate::errors::AppError;
use crate::llm_client::InferenceError;
use crate::state::AppState;

const FILES_FIELD: &str = "files";
const FILE_FIELD: &str = "file";
const QUERY_FIELD: &str = "query";

struct FilePart {
    field: String,
    filename: String,
    data: Bytes,
}

/// A fully buffered multipart form.
#[derive(Default)]
struct UploadForm {
    files: Vec<FilePart>,
    fields: Vec<(String, String)>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);
            match filename {
                Some(filename) => {
                    let data = field.bytes().await?;
                    // Browsers send an empty, unnamed part when no file is picked.
                    if filename.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.files.push(FilePart {
                        field: name,
                        filename,
                        data,
                    });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.push((name, value));
                }
            }
        }

        Ok(form)
    }

    fn files_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FilePart> + 'a {
        self.files.iter().filter(move |f| f.field == name)
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// POST /analyze_documents
///
/// Summarizes every uploaded `files` part. A failing file gets an error entry;
/// the rest of the batch still runs.
pub async fn handle_analyze_documents(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<AnalysisResult>>, AppError> {
    let form = UploadForm::read(multipart).await?;
    let files: Vec<&FilePart> = form.files_named(FILES_FIELD).collect();
    if files.is_empty() {
        return Err(AppError::Validation("No files uploaded.".to_string()));
    }

    info!("Analyzing {} document(s)", files.len());

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let result = match state.uploads.save(&file.filename, &file.data).await {
            Ok(upload) => analyze_upload(&upload, &state.llm).await,
            Err(e) => {
                error!("Failed to store {}: {e}", file.filename);
                AnalysisResult::failure(
                    sanitize_filename(&file.filename),
                    STORAGE_FAILED,
                    "STORAGE_ERROR",
                )
            }
        };
        results.push(result);
    }

    Ok(Json(results))
}

/// POST /query_document
///
/// Answers `query` from the single uploaded `file`. An empty or choiceless
/// model reply yields a `message` instead of an `answer`.
pub async fn handle_query_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<QueryResult>, AppError> {
    let form = UploadForm::read(multipart).await?;

    let file = form
        .files_named(FILE_FIELD)
        .next()
        .ok_or_else(|| AppError::Validation("No file uploaded.".to_string()))?;

    let query = form
        .text(QUERY_FIELD)
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No query provided.".to_string()))?;

    let upload = state.uploads.save(&file.filename, &file.data).await?;
    debug!("Answering query for {}: {query}", upload.filename);

    match answer_query(&upload, query, &state.llm).await {
        Ok(answer) => Ok(Json(QueryResult::answered(
            upload.filename.clone(),
            query.to_string(),
            answer,
        ))),
        Err(AnalysisError::Inference(
            InferenceError::EmptyResult | InferenceError::MalformedResponse,
        )) => Ok(Json(QueryResult::unanswered(
            upload.filename.clone(),
            query.to_string(),
            NO_ANSWER,
        ))),
        Err(e) => Err(e.into()),
    }
}
