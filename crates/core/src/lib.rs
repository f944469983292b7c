//! Domain logic for the Nala music-pattern bridge.
//!
//! Pure building blocks: request types, prompt rendering, completion
//! extraction, code validation, the fallback bank and result assembly,
//! plus the env-parsing helpers shared by every crate's config. The
//! collaborator traits for the generation service live in [`generator`];
//! implementations live in other crates.

pub mod assemble;
pub mod chat;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod generator;
pub mod prompt;
pub mod request;
pub mod types;
pub mod validate;
