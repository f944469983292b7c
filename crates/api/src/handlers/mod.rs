pub mod chat;
pub mod generation;
pub mod info;
pub mod jobs;
