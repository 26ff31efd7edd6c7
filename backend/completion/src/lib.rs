//! Chat-completion client for textlens.
//!
//! Forwards a single user prompt to an OpenAI-compatible
//! `/chat/completions` endpoint (NVIDIA's hosted Nemotron by default) with
//! fixed sampling parameters, bounded timeouts and one retry on transient
//! transport failures.

pub mod error;
pub mod nemotron;
pub mod retry;

pub use error::CompletionError;
pub use nemotron::{NemotronClient, NemotronSettings};
pub use retry::RetryPolicy;
