//! HTTP client for an Ollama inference server.
//!
//! Provides typed request/response bodies, a thin REST wrapper over
//! `/api/generate`, `/api/chat` and `/api/tags`, and an adapter that plugs
//! the client into the bridge's generator traits.

pub mod api;
pub mod config;
pub mod generator;
pub mod messages;
