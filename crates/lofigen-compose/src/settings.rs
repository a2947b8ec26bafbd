//! Generator settings and the variation-level lookup table.

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, ComposeResult};

/// Root key of the composition, one of the 12 chromatic pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

impl Key {
    /// Semitone offset from C.
    pub fn semitone(self) -> i32 {
        match self {
            Key::C => 0,
            Key::CSharp => 1,
            Key::D => 2,
            Key::DSharp => 3,
            Key::E => 4,
            Key::F => 5,
            Key::FSharp => 6,
            Key::G => 7,
            Key::GSharp => 8,
            Key::A => 9,
            Key::ASharp => 10,
            Key::B => 11,
        }
    }
}

/// Scale of the composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Major,
    Minor,
}

impl Scale {
    /// Semitone intervals of the seven scale degrees.
    pub fn intervals(self) -> [i32; 7] {
        match self {
            Scale::Major => [0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => [0, 2, 3, 5, 7, 8, 10],
        }
    }
}

/// Stylistic flavor. Accepted in settings but not yet routed into
/// rendering; kept so callers can persist it ahead of that wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Ambient,
    Chill,
    Jazz,
    Study,
}

/// How often generated patterns change over the course of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationLevel {
    Low,
    Medium,
    High,
    Extreme,
}

/// Per-level generation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationProfile {
    /// Length of one pattern segment in seconds.
    pub segment_seconds: f32,
    /// Segments between pattern template changes.
    pub pattern_change_interval: u32,
    /// Bound on per-event velocity jitter.
    pub velocity_variance: f32,
    /// Bound on density-gate jitter.
    pub density_variance: f32,
    /// Width of the melody octave band.
    pub octave_range: u32,
}

impl VariationLevel {
    /// Resolves the level to its generation constants.
    pub fn profile(self) -> VariationProfile {
        match self {
            VariationLevel::Low => VariationProfile {
                segment_seconds: 60.0,
                pattern_change_interval: 8,
                velocity_variance: 0.05,
                density_variance: 0.1,
                octave_range: 1,
            },
            VariationLevel::Medium => VariationProfile {
                segment_seconds: 30.0,
                pattern_change_interval: 4,
                velocity_variance: 0.1,
                density_variance: 0.2,
                octave_range: 2,
            },
            VariationLevel::High => VariationProfile {
                segment_seconds: 20.0,
                pattern_change_interval: 2,
                velocity_variance: 0.15,
                density_variance: 0.3,
                octave_range: 2,
            },
            VariationLevel::Extreme => VariationProfile {
                segment_seconds: 10.0,
                pattern_change_interval: 1,
                velocity_variance: 0.25,
                density_variance: 0.4,
                octave_range: 3,
            },
        }
    }

    /// Note durations (in beats) the melody generator may choose from.
    pub fn melody_durations(self) -> &'static [f32] {
        match self {
            VariationLevel::Low => &[1.0, 2.0],
            VariationLevel::Medium => &[0.5, 1.0, 2.0],
            VariationLevel::High => &[0.25, 0.5, 1.0],
            VariationLevel::Extreme => &[0.25, 0.5, 0.75, 1.0],
        }
    }
}

/// Full settings surface for [`crate::render::render_composition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// Target duration in seconds, 1 to 86400.
    pub duration_seconds: f32,
    /// Tempo in beats per minute, 60 to 120.
    pub bpm: f32,
    pub key: Key,
    pub scale: Scale,
    pub style: Style,
    pub variation_level: VariationLevel,

    // Fine-tuning knobs, all in [0, 1]. Several are accepted but not yet
    // consumed by the renderer; see the module docs on `render`.
    #[serde(default = "default_half")]
    pub swing: f32,
    #[serde(default = "default_half")]
    pub drum_intensity: f32,
    #[serde(default = "default_half")]
    pub melody_complexity: f32,
    #[serde(default = "default_half")]
    pub chord_voicing: f32,
    #[serde(default = "default_half")]
    pub reverb_amount: f32,
    #[serde(default = "default_half")]
    pub delay_amount: f32,
    #[serde(default = "default_half")]
    pub lofi_amount: f32,
    #[serde(default = "default_half")]
    pub bass_level: f32,
    #[serde(default = "default_half")]
    pub treble_level: f32,
    #[serde(default = "default_full")]
    pub overall_volume: f32,
}

fn default_half() -> f32 {
    0.5
}

fn default_full() -> f32 {
    1.0
}

impl GeneratorSettings {
    /// Checks every setting against its documented range. Called by the
    /// renderer before any synthesis work starts.
    pub fn validate(&self) -> ComposeResult<()> {
        if !(1.0..=86400.0).contains(&self.duration_seconds) {
            return Err(ComposeError::invalid_setting(
                "durationSeconds",
                format!("must be 1-86400 seconds, got {}", self.duration_seconds),
            ));
        }
        if !(60.0..=120.0).contains(&self.bpm) {
            return Err(ComposeError::invalid_setting(
                "bpm",
                format!("must be 60-120, got {}", self.bpm),
            ));
        }
        for (name, value) in [
            ("swing", self.swing),
            ("drumIntensity", self.drum_intensity),
            ("melodyComplexity", self.melody_complexity),
            ("chordVoicing", self.chord_voicing),
            ("reverbAmount", self.reverb_amount),
            ("delayAmount", self.delay_amount),
            ("lofiAmount", self.lofi_amount),
            ("bassLevel", self.bass_level),
            ("trebleLevel", self.treble_level),
            ("overallVolume", self.overall_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ComposeError::invalid_setting(
                    name,
                    format!("must be 0.0-1.0, got {}", value),
                ));
            }
        }
        Ok(())
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            duration_seconds: 60.0,
            bpm: 80.0,
            key: Key::C,
            scale: Scale::Minor,
            style: Style::Chill,
            variation_level: VariationLevel::Medium,
            swing: 0.5,
            drum_intensity: 0.5,
            melody_complexity: 0.5,
            chord_voicing: 0.5,
            reverb_amount: 0.5,
            delay_amount: 0.5,
            lofi_amount: 0.5,
            bass_level: 0.5,
            treble_level: 0.5,
            overall_volume: 1.0,
        }
    }
}
