//! Character-level Markov text generation library.
//!
//! This crate provides a fixed-order character-level Markov model:
//! - Training from a corpus file or any character stream
//! - Per-window probability tables with cumulative-probability sampling
//! - Sliding-window text generation with a seedable random source
//!
//! The model is single-threaded by design; callers that share an instance
//! across threads must serialize access externally.

/// Core model and generation logic.
pub mod model;

/// I/O utilities (corpus loading, corpus directory listing).
pub mod io;
