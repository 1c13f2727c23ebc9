// Prompt construction for every completion the service requests.
// All LLM calls go through llm_client; this module only builds their text.

pub mod prompts;
