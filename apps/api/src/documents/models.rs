use serde::Serialize;

/// One entry of the `/analyze_documents` response.
///
/// `summary` always holds displayable text: the formatted summary, or an error
/// string when `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub filename: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl AnalysisResult {
    pub fn success(filename: String, summary: String) -> Self {
        Self {
            filename,
            summary,
            error: None,
        }
    }

    pub fn failure(filename: String, message: &str, code: &'static str) -> Self {
        Self {
            filename,
            summary: message.to_string(),
            error: Some(code),
        }
    }
}

/// Response of `/query_document`. Exactly one of `answer` and `message` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub filename: String,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl QueryResult {
    pub fn answered(filename: String, query: String, answer: String) -> Self {
        Self {
            filename,
            query,
            answer: Some(answer),
            message: None,
        }
    }

    pub fn unanswered(filename: String, query: String, message: &str) -> Self {
        Self {
            filename,
            query,
            answer: None,
            message: Some(message.to_string()),
        }
    }
}
