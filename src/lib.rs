//! Command-line client for submitting exercises to a TMC grading server.
//!
//! The [`engine`] submits a batch of exercises, reconciles the local course
//! manifest with the server and collects feedback. The [`client`] module is the
//! HTTP implementation of the grading service it talks to.

pub mod client;
pub mod config;
pub mod console;
pub mod engine;
pub mod manifest;
pub mod models;
pub mod workdir;
