//! Request orchestration for the bridge.
//!
//! [`pipeline::GenerationPipeline`] runs prompt, completion, extraction,
//! validation and fallback for pattern requests; [`relay::ChatRelay`]
//! forwards chat-mode requests unchanged. Both receive their collaborators
//! as trait objects.

pub mod config;
pub mod pipeline;
pub mod relay;
