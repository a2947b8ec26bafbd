//! Pattern generators and their event types.
//!
//! Each generator takes an explicit `&mut impl Rng` so tests can pin a seed.
//! Events are segment-local: the renderer offsets their times into the
//! global timeline.

pub mod chords;
pub mod drum;
pub mod melody;

/// Drum one-shot kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumKind {
    Kick,
    Snare,
    Hihat,
}

/// A single drum hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumEvent {
    /// Time in seconds from segment start.
    pub time: f32,
    pub kind: DrumKind,
    /// Velocity in [0, 1].
    pub velocity: f32,
}

/// A held triad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChordEvent {
    /// Time in seconds from segment start.
    pub time: f32,
    /// The three chord tones in Hz.
    pub frequencies: [f32; 3],
    /// Duration in seconds.
    pub duration: f32,
}

/// A single melody note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyEvent {
    /// Time in seconds from segment start.
    pub time: f32,
    /// MIDI note number, key offset included.
    pub note: i32,
    /// Duration in seconds.
    pub duration: f32,
    /// Velocity in [0, 1].
    pub velocity: f32,
}
