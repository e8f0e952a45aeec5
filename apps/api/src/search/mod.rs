// Job search pipeline.
// CSV → mapper → importer → store; query → parser → translator → store →
// assembler (→ analyzer). All LLM calls go through llm_client.

pub mod analyzer;
pub mod assembler;
pub mod handlers;
pub mod importer;
pub mod mapper;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod service;
pub mod translator;
