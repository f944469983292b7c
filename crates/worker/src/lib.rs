//! Serverless-style job surface.
//!
//! A job is `{"id", "input"}`; the answer is `{"id", "output", "error"?}`.
//! The binary feeds jobs from stdin one JSON document per line.

pub mod handler;
pub mod job;
pub mod runner;
