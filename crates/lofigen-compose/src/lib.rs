//! Lofigen Composition Engine
//!
//! Procedural lo-fi music generation on top of [`lofigen_dsp`]. A
//! composition is described by [`GeneratorSettings`] (duration, tempo, key,
//! scale, variation level, fine-tuning knobs) and rendered offline into a
//! stereo sample buffer by [`render_composition`].
//!
//! # Architecture
//!
//! The target duration is divided into segments whose length depends on the
//! variation level. Each segment gets its own BLAKE3-derived PCG32 stream
//! and runs three pattern generators:
//!
//! - **Drums** - kick/snare/hihat templates cycling with a pattern phase
//! - **Chords** - one triad per bar from eight canonical progressions
//! - **Melody** - a stepwise random walk over the scale degrees
//!
//! The renderer synthesizes every event into an additive stereo mix,
//! peak-normalizes, and finishes with a lo-fi effect pass.
//!
//! # Determinism
//!
//! Given the same settings and base seed the output is byte-identical
//! across runs. All randomness flows through [`rng`].

pub mod error;
pub mod patterns;
pub mod render;
pub mod rng;
pub mod settings;
pub mod synthesis;

// Re-export main types at crate root
pub use error::{ComposeError, ComposeResult};
pub use render::{render_composition, SAMPLE_RATE};
pub use settings::{GeneratorSettings, Key, Scale, Style, VariationLevel};
