//! Top-level module for the character-level Markov model.
//!
//! This module provides:
//! - The trained model and its public train/generate surface (`LanguageModel`)
//! - The per-window frequency/probability table (`CharDistribution`)

/// The fixed-order character-level Markov model.
///
/// Owns the context map and the random source, and exposes training
/// (corpus file or character stream) and sliding-window generation.
pub mod language_model;

/// Per-window "next character" frequency and probability table.
///
/// Tracks observed characters in first-seen order, converts counts into
/// probability / cumulative-probability values, and supports weighted
/// random sampling via inverse-CDF lookup.
pub mod distribution;
