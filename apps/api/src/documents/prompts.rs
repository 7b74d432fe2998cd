// Prompt templates for document summarization and question answering.
// Documents are embedded whole; the inference client enforces the length limit.

pub const SUMMARIZE_PROMPT_TEMPLATE: &str = "Here is the content of a document:\n\n{doc_text}\n\n\
Please summarize the document's main points in a concise manner, \
without any additional questions or commentary.";

pub const QUERY_PROMPT_TEMPLATE: &str = "Here is the content of a document:\n\n{doc_text}\n\n\
User's query: {query}\n\n\
Please answer the user's query based on the document's content.";

pub fn summarize_prompt(doc_text: &str) -> String {
    SUMMARIZE_PROMPT_TEMPLATE.replace("{doc_text}", doc_text)
}

pub fn query_prompt(doc_text: &str, query: &str) -> String {
    // Query first, so placeholder-looking text inside the document is left alone.
    QUERY_PROMPT_TEMPLATE
        .replace("{query}", query)
        .replacen("{doc_text}", doc_text, 1)
}
