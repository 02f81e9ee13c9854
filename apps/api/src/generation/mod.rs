// Question generation pipeline: prompt build → opaque generate → sanitize → store.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod sanitize;
