//! Prompt text for batch relevance classification

/// System instruction sent with every batch
pub const SYSTEM_INSTRUCTION: &str = "You select notes from a knowledge vault. \
You are given a query and a list of note identifiers. Return only identifiers \
that appear verbatim in that list and are relevant to the query. Never invent, \
shorten or rewrite an identifier. If none are relevant, return an empty list.";

/// Build the user message for one batch.
///
/// The batch is embedded as a JSON array so identifiers containing commas or
/// quotes stay unambiguous.
pub fn batch_prompt(query: &str, batch: &[String]) -> String {
    let listing = serde_json::to_string(batch).unwrap_or_else(|_| format!("{:?}", batch));
    format!(
        "From this list of notes, return only the ones relevant to: {query}\n\n\
         Notes:\n{listing}\n\n\
         Every returned entry must be copied exactly from the list above.\n\
         Wrap the output in this format and provide no other text:\n\
         {{\"notes\": [\"<identifier>\", ...]}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_prompt_contains_query_and_literal_batch() {
        let batch = vec!["concept/graph.md".to_string(), "a \"quoted\", note.md".to_string()];
        let prompt = batch_prompt("graph theory", &batch);

        assert!(prompt.contains("relevant to: graph theory"));
        assert!(prompt.contains(r#"["concept/graph.md","a \"quoted\", note.md"]"#));
        assert!(prompt.contains(r#"{"notes": ["#));
    }
}
