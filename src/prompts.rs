//! Prompt template for grounded question answering.
//!
//! The template is deterministic: same context and question, same prompt.
//! Keeping it here lets tests inspect it without a provider.

/// Instructions placed before the document.
pub const ANSWER_INSTRUCTIONS: &str = "Based on the following document content, please provide a concise and accurate answer to the user's question.
Your answer should be based solely on the information within the document.
If the answer cannot be found in the document, explicitly state that the information is not available in the provided text.
Do not use any external knowledge or make assumptions beyond the document's content.";

/// Opening delimiter of the embedded document.
pub const DOCUMENT_START: &str = "--- DOCUMENT CONTENT ---";

/// Closing delimiter of the embedded document.
pub const DOCUMENT_END: &str = "--- END OF DOCUMENT ---";

/// Build the prompt sent to the model.
///
/// `context` must already be truncated; the question is embedded verbatim
/// inside double quotes.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "{ANSWER_INSTRUCTIONS}\n\n{DOCUMENT_START}\n{context}\n{DOCUMENT_END}\n\nUSER'S QUESTION: \"{question}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_between_delimiters() {
        let p = build_prompt("Revenue grew 10%.", "What was the growth?");
        let start = p.find(DOCUMENT_START).unwrap();
        let end = p.find(DOCUMENT_END).unwrap();
        assert!(start < end);
        assert!(p[start..end].contains("Revenue grew 10%."));
    }

    #[test]
    fn prompt_quotes_question_last() {
        let p = build_prompt("ctx", "Who wrote it?");
        assert!(p.ends_with("USER'S QUESTION: \"Who wrote it?\""));
    }

    #[test]
    fn prompt_forbids_outside_knowledge() {
        let p = build_prompt("ctx", "q");
        assert!(p.contains("solely on the information within the document"));
        assert!(p.contains("not available in the provided text"));
        assert!(p.contains("Do not use any external knowledge"));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("a", "b"), build_prompt("a", "b"));
    }
}
