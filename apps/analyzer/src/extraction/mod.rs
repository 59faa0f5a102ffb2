// Resume extraction pipeline.
// Implements: archive unpacking, document text extraction, structured field extraction, batch orchestration.
// All LLM calls go through llm_client. Blocking parsers run inside tokio::task::spawn_blocking.

pub mod archive;
pub mod fields;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;
