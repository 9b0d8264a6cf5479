//! hebrag - Hebrew retrieval-augmented question answering
//!
//! This crate provides the core functionality for the `hebrag` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`chat`] - Chat session and conversation history
//! - [`answer`] - Prompt assembly and answer generation
//! - [`retrieval`] - Query embedding plus index search
//! - [`embeddings`] - Model-derived embeddings with a hash-seeded fallback
//! - [`index`] - Vector index access (Pinecone)
//! - [`llm`] - Language model access (Anthropic)
//! - [`present`] - Right-to-left text presentation
//! - [`ratelimit`] - Per-operation call spacing
//! - [`factory`] - Pipeline wiring from settings
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod answer;
pub mod chat;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod factory;
pub mod index;
pub mod llm;
pub mod present;
pub mod ratelimit;
pub mod retrieval;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
