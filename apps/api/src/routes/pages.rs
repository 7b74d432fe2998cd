use axum::response::Html;

/// GET /
pub async fn welcome_page() -> Html<&'static str> {
    Html(include_str!("../../templates/welcome.html"))
}

/// GET /document_analyzer
pub async fn document_analyzer_page() -> Html<&'static str> {
    Html(include_str!("../../templates/document_analyzer.html"))
}

/// GET /query
pub async fn query_page() -> Html<&'static str> {
    Html(include_str!("../../templates/query.html"))
}
