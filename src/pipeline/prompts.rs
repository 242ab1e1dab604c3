//! Prompt templates shared by the answer-drafting flows.

/// Answer a question from retrieved documentation.
pub fn assistant_prompt(context: &str, query: &str) -> String {
    format!(
        "You are an AI assistant. Use the provided context to answer the question.\n\n\
         Context:\n{context}\n\n\
         Question: {query}\n\n\
         Answer concisely and clearly. If the context does not contain enough information, say so."
    )
}
