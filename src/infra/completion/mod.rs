//! Outbound completion adapters.
//!
//! A thin HTTP implementation of the `CompletionClient` port against Groq's
//! OpenAI-compatible chat completions endpoint.

mod dto;
mod groq;

pub use groq::{GroqCompletionClient, GroqKeyDiagnostics};
