//! Effect chain and unit processors.
//!
//! The chain is a fixed, ordered set of optional stages. Enabling or disabling
//! a stage never reorders the chain; [`apply_chain`] folds the buffer through
//! the enabled stages in the canonical order:
//!
//! volume, noise gate, highpass, compressor, multi-band EQ, distortion, tape
//! saturation, bit crusher, chorus, flanger, phaser, delay, reverb, pitch,
//! vibrato, tremolo, ring modulator, wah-wah, exciter, stereo widener, pan,
//! auto-pan, lowpass, lofi, bandpass, limiter, sidechain.
//!
//! Every stage preserves channel count and length, with one deliberate
//! exception: pitch is a playback-rate change, so its output duration scales
//! with the shift. Stereo-only stages (widener, pan, auto-pan) pass mono
//! buffers through unchanged.

pub mod delay;
pub mod delay_line;
pub mod distortion;
pub mod dynamics;
pub mod eq;
pub mod filters;
pub mod lfo;
pub mod modulation;
pub mod pitch;
pub mod reverb;
pub mod stereo;

pub use delay_line::DelayLine;
pub use lfo::{Lfo, LfoShape};

use crate::buffer::SampleBuffer;
use crate::error::{DspError, DspResult};
use serde::{Deserialize, Serialize};

/// Documented range of one effect parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// True if `value` lies inside the documented range.
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps `value` into the documented range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// One named parameter with its canonical range.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub range: ParamRange,
}

const fn param(name: &'static str, min: f32, max: f32, step: f32) -> ParamSpec {
    ParamSpec {
        name,
        range: ParamRange::new(min, max, step),
    }
}

macro_rules! effect_settings {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident : $ty:ty = $default:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            /// Whether this slot contributes to the chain.
            pub enabled: bool,
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    enabled: false,
                    $($field: $default,)*
                }
            }
        }
    };
}

effect_settings!(
    /// Plain gain stage.
    VolumeSettings { gain: f32 = 1.0 }
);
effect_settings!(
    /// Envelope-follower gate with attack/hold/release.
    NoiseGateSettings {
        threshold_db: f32 = -50.0,
        attack_ms: f32 = 10.0,
        hold_ms: f32 = 50.0,
        release_ms: f32 = 100.0,
    }
);
effect_settings!(
    /// Second-order highpass.
    HighpassSettings { cutoff: f32 = 80.0 }
);
effect_settings!(
    /// Stereo-linked RMS compressor.
    CompressorSettings {
        threshold_db: f32 = -24.0,
        ratio: f32 = 4.0,
        attack_ms: f32 = 10.0,
        release_ms: f32 = 100.0,
        makeup_db: f32 = 0.0,
    }
);
effect_settings!(
    /// Three fixed bands: low shelf 200 Hz, peak 1 kHz, high shelf 4 kHz.
    MultiBandEqSettings {
        low_gain_db: f32 = 0.0,
        mid_gain_db: f32 = 0.0,
        high_gain_db: f32 = 0.0,
    }
);
effect_settings!(
    /// Curve-table waveshaper with 4x oversampling.
    DistortionSettings { amount: f32 = 0.3 }
);
effect_settings!(
    /// Soft tanh saturation with makeup gain.
    TapeSaturationSettings { drive: f32 = 3.0, mix: f32 = 0.5 }
);
effect_settings!(
    /// Bit-depth quantization plus sample-hold rate reduction.
    BitCrusherSettings { bits: u8 = 8, rate_reduction: f32 = 4.0 }
);
effect_settings!(
    /// LFO-modulated short delay, summed with the dry signal.
    ChorusSettings {
        rate: f32 = 1.5,
        depth: f32 = 0.5,
        feedback: f32 = 0.2,
        wet: f32 = 0.5,
    }
);
effect_settings!(
    /// Like chorus but with a much shorter base delay.
    FlangerSettings {
        rate: f32 = 0.5,
        depth: f32 = 0.7,
        feedback: f32 = 0.5,
        wet: f32 = 0.5,
    }
);
effect_settings!(
    /// Cascaded first-order allpass stages swept around 1 kHz, mixed 50/50.
    PhaserSettings { rate: f32 = 0.5, depth: f32 = 0.7, stages: u8 = 4 }
);
effect_settings!(
    /// Single-tap feedback echo.
    DelaySettings {
        time_seconds: f32 = 0.35,
        feedback: f32 = 0.4,
        wet: f32 = 0.4,
    }
);
effect_settings!(
    /// Four parallel fixed-ratio taps scaled by room size.
    ReverbSettings {
        room_size: f32 = 0.5,
        dampening: f32 = 0.5,
        wet: f32 = 0.4,
    }
);
effect_settings!(
    /// Playback-rate pitch change; duration scales with the shift.
    PitchSettings { semitones: f32 = 0.0 }
);
effect_settings!(
    /// Sub-10 ms delay-offset modulation.
    VibratoSettings { rate: f32 = 5.0, depth: f32 = 0.3 }
);
effect_settings!(
    /// Amplitude modulation.
    TremoloSettings { rate: f32 = 4.0, depth: f32 = 0.5, shape: LfoShape = LfoShape::Sine }
);
effect_settings!(
    /// Carrier multiplication: in*carrier*depth + in*(1-depth).
    RingModulatorSettings { frequency: f32 = 440.0, depth: f32 = 0.5 }
);
effect_settings!(
    /// Bandpass swept between 400 and 2000 Hz by the LFO.
    WahWahSettings { rate: f32 = 1.5, depth: f32 = 0.7 }
);
effect_settings!(
    /// Cubic-nonlinearity harmonic enhancement.
    ExciterSettings { amount: f32 = 0.3 }
);
effect_settings!(
    /// Mid/side width scaling. No-op on mono input.
    StereoWidenerSettings { width: f32 = 1.0 }
);
effect_settings!(
    /// Constant-power pan. No-op on mono input.
    PanSettings { position: f32 = 0.0 }
);
effect_settings!(
    /// LFO-driven constant-power pan sweep. No-op on mono input.
    AutoPanSettings { rate: f32 = 1.0, depth: f32 = 0.5 }
);
effect_settings!(
    /// Second-order lowpass.
    LowpassSettings { cutoff: f32 = 8000.0 }
);
effect_settings!(
    /// The canned lo-fi sound: bit depth + rate reduction + one-pole lowpass.
    LofiSettings { bits: u8 = 12, rate_reduction: f32 = 2.0, cutoff: f32 = 3500.0 }
);
effect_settings!(
    /// Second-order bandpass with cutoff and Q.
    BandpassSettings { cutoff: f32 = 1000.0, q: f32 = 1.0 }
);
effect_settings!(
    /// Hard-knee limiter with smoothed release.
    LimiterSettings { threshold_db: f32 = -1.0, release_ms: f32 = 50.0 }
);
effect_settings!(
    /// Periodic ducking; the core has no external key signal.
    SidechainSettings { rate: f32 = 2.0, amount: f32 = 0.5 }
);

/// The full, fixed-order set of effect slots.
///
/// Only enabled slots contribute; the order itself never changes based on
/// which are enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectChain {
    pub volume: VolumeSettings,
    pub noise_gate: NoiseGateSettings,
    pub highpass: HighpassSettings,
    pub compressor: CompressorSettings,
    pub multi_band_eq: MultiBandEqSettings,
    pub distortion: DistortionSettings,
    pub tape_saturation: TapeSaturationSettings,
    pub bit_crusher: BitCrusherSettings,
    pub chorus: ChorusSettings,
    pub flanger: FlangerSettings,
    pub phaser: PhaserSettings,
    pub delay: DelaySettings,
    pub reverb: ReverbSettings,
    pub pitch: PitchSettings,
    pub vibrato: VibratoSettings,
    pub tremolo: TremoloSettings,
    pub ring_modulator: RingModulatorSettings,
    pub wah_wah: WahWahSettings,
    pub exciter: ExciterSettings,
    pub stereo_widener: StereoWidenerSettings,
    pub pan: PanSettings,
    pub auto_pan: AutoPanSettings,
    pub lowpass: LowpassSettings,
    pub lofi: LofiSettings,
    pub bandpass: BandpassSettings,
    pub limiter: LimiterSettings,
    pub sidechain: SidechainSettings,
}

/// Tagged descriptor for one enabled chain slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Volume(VolumeSettings),
    NoiseGate(NoiseGateSettings),
    Highpass(HighpassSettings),
    Compressor(CompressorSettings),
    MultiBandEq(MultiBandEqSettings),
    Distortion(DistortionSettings),
    TapeSaturation(TapeSaturationSettings),
    BitCrusher(BitCrusherSettings),
    Chorus(ChorusSettings),
    Flanger(FlangerSettings),
    Phaser(PhaserSettings),
    Delay(DelaySettings),
    Reverb(ReverbSettings),
    Pitch(PitchSettings),
    Vibrato(VibratoSettings),
    Tremolo(TremoloSettings),
    RingModulator(RingModulatorSettings),
    WahWah(WahWahSettings),
    Exciter(ExciterSettings),
    StereoWidener(StereoWidenerSettings),
    Pan(PanSettings),
    AutoPan(AutoPanSettings),
    Lowpass(LowpassSettings),
    Lofi(LofiSettings),
    Bandpass(BandpassSettings),
    Limiter(LimiterSettings),
    Sidechain(SidechainSettings),
}

/// Effect slot identifier, in canonical chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Volume,
    NoiseGate,
    Highpass,
    Compressor,
    MultiBandEq,
    Distortion,
    TapeSaturation,
    BitCrusher,
    Chorus,
    Flanger,
    Phaser,
    Delay,
    Reverb,
    Pitch,
    Vibrato,
    Tremolo,
    RingModulator,
    WahWah,
    Exciter,
    StereoWidener,
    Pan,
    AutoPan,
    Lowpass,
    Lofi,
    Bandpass,
    Limiter,
    Sidechain,
}

impl EffectKind {
    /// All slots in canonical chain order.
    pub const ALL: [EffectKind; 27] = [
        EffectKind::Volume,
        EffectKind::NoiseGate,
        EffectKind::Highpass,
        EffectKind::Compressor,
        EffectKind::MultiBandEq,
        EffectKind::Distortion,
        EffectKind::TapeSaturation,
        EffectKind::BitCrusher,
        EffectKind::Chorus,
        EffectKind::Flanger,
        EffectKind::Phaser,
        EffectKind::Delay,
        EffectKind::Reverb,
        EffectKind::Pitch,
        EffectKind::Vibrato,
        EffectKind::Tremolo,
        EffectKind::RingModulator,
        EffectKind::WahWah,
        EffectKind::Exciter,
        EffectKind::StereoWidener,
        EffectKind::Pan,
        EffectKind::AutoPan,
        EffectKind::Lowpass,
        EffectKind::Lofi,
        EffectKind::Bandpass,
        EffectKind::Limiter,
        EffectKind::Sidechain,
    ];

    /// Canonical parameter schema for this slot. This is the single source of
    /// truth for min/max/step; stage validation and any UI read from here.
    pub fn param_specs(&self) -> &'static [ParamSpec] {
        const VOLUME: &[ParamSpec] = &[param("gain", 0.0, 2.0, 0.01)];
        const NOISE_GATE: &[ParamSpec] = &[
            param("threshold_db", -80.0, 0.0, 1.0),
            param("attack_ms", 0.1, 100.0, 0.1),
            param("hold_ms", 0.0, 500.0, 1.0),
            param("release_ms", 1.0, 1000.0, 1.0),
        ];
        const HIGHPASS: &[ParamSpec] = &[param("cutoff", 20.0, 2000.0, 1.0)];
        const COMPRESSOR: &[ParamSpec] = &[
            param("threshold_db", -60.0, 0.0, 1.0),
            param("ratio", 1.0, 20.0, 0.1),
            param("attack_ms", 0.1, 100.0, 0.1),
            param("release_ms", 10.0, 1000.0, 1.0),
            param("makeup_db", 0.0, 24.0, 0.1),
        ];
        const MULTI_BAND_EQ: &[ParamSpec] = &[
            param("low_gain_db", -12.0, 12.0, 0.1),
            param("mid_gain_db", -12.0, 12.0, 0.1),
            param("high_gain_db", -12.0, 12.0, 0.1),
        ];
        const DISTORTION: &[ParamSpec] = &[param("amount", 0.0, 1.0, 0.01)];
        const TAPE_SATURATION: &[ParamSpec] =
            &[param("drive", 1.0, 20.0, 0.1), param("mix", 0.0, 1.0, 0.01)];
        const BIT_CRUSHER: &[ParamSpec] = &[
            param("bits", 1.0, 16.0, 1.0),
            param("rate_reduction", 1.0, 50.0, 1.0),
        ];
        const CHORUS: &[ParamSpec] = &[
            param("rate", 0.1, 10.0, 0.1),
            param("depth", 0.0, 1.0, 0.01),
            param("feedback", 0.0, 0.9, 0.01),
            param("wet", 0.0, 1.0, 0.01),
        ];
        const FLANGER: &[ParamSpec] = &[
            param("rate", 0.1, 10.0, 0.1),
            param("depth", 0.0, 1.0, 0.01),
            param("feedback", 0.0, 0.9, 0.01),
            param("wet", 0.0, 1.0, 0.01),
        ];
        const PHASER: &[ParamSpec] = &[
            param("rate", 0.1, 10.0, 0.1),
            param("depth", 0.0, 1.0, 0.01),
            param("stages", 2.0, 12.0, 2.0),
        ];
        const DELAY: &[ParamSpec] = &[
            param("time_seconds", 0.0, 2.0, 0.01),
            param("feedback", 0.0, 1.0, 0.01),
            param("wet", 0.0, 1.0, 0.01),
        ];
        const REVERB: &[ParamSpec] = &[
            param("room_size", 0.0, 1.0, 0.01),
            param("dampening", 0.0, 1.0, 0.01),
            param("wet", 0.0, 1.0, 0.01),
        ];
        const PITCH: &[ParamSpec] = &[param("semitones", -12.0, 12.0, 1.0)];
        const VIBRATO: &[ParamSpec] =
            &[param("rate", 0.1, 20.0, 0.1), param("depth", 0.0, 1.0, 0.01)];
        const TREMOLO: &[ParamSpec] =
            &[param("rate", 0.1, 20.0, 0.1), param("depth", 0.0, 1.0, 0.01)];
        const RING_MODULATOR: &[ParamSpec] = &[
            param("frequency", 1.0, 5000.0, 1.0),
            param("depth", 0.0, 1.0, 0.01),
        ];
        const WAH_WAH: &[ParamSpec] =
            &[param("rate", 0.1, 10.0, 0.1), param("depth", 0.0, 1.0, 0.01)];
        const EXCITER: &[ParamSpec] = &[param("amount", 0.0, 1.0, 0.01)];
        const STEREO_WIDENER: &[ParamSpec] = &[param("width", 0.0, 2.0, 0.01)];
        const PAN: &[ParamSpec] = &[param("position", -1.0, 1.0, 0.01)];
        const AUTO_PAN: &[ParamSpec] =
            &[param("rate", 0.1, 10.0, 0.1), param("depth", 0.0, 1.0, 0.01)];
        const LOWPASS: &[ParamSpec] = &[param("cutoff", 200.0, 20000.0, 1.0)];
        const LOFI: &[ParamSpec] = &[
            param("bits", 1.0, 16.0, 1.0),
            param("rate_reduction", 1.0, 50.0, 1.0),
            param("cutoff", 500.0, 20000.0, 1.0),
        ];
        const BANDPASS: &[ParamSpec] = &[
            param("cutoff", 20.0, 20000.0, 1.0),
            param("q", 0.1, 10.0, 0.1),
        ];
        const LIMITER: &[ParamSpec] = &[
            param("threshold_db", -24.0, 0.0, 0.1),
            param("release_ms", 10.0, 1000.0, 1.0),
        ];
        const SIDECHAIN: &[ParamSpec] =
            &[param("rate", 0.1, 8.0, 0.1), param("amount", 0.0, 1.0, 0.01)];

        match self {
            EffectKind::Volume => VOLUME,
            EffectKind::NoiseGate => NOISE_GATE,
            EffectKind::Highpass => HIGHPASS,
            EffectKind::Compressor => COMPRESSOR,
            EffectKind::MultiBandEq => MULTI_BAND_EQ,
            EffectKind::Distortion => DISTORTION,
            EffectKind::TapeSaturation => TAPE_SATURATION,
            EffectKind::BitCrusher => BIT_CRUSHER,
            EffectKind::Chorus => CHORUS,
            EffectKind::Flanger => FLANGER,
            EffectKind::Phaser => PHASER,
            EffectKind::Delay => DELAY,
            EffectKind::Reverb => REVERB,
            EffectKind::Pitch => PITCH,
            EffectKind::Vibrato => VIBRATO,
            EffectKind::Tremolo => TREMOLO,
            EffectKind::RingModulator => RING_MODULATOR,
            EffectKind::WahWah => WAH_WAH,
            EffectKind::Exciter => EXCITER,
            EffectKind::StereoWidener => STEREO_WIDENER,
            EffectKind::Pan => PAN,
            EffectKind::AutoPan => AUTO_PAN,
            EffectKind::Lowpass => LOWPASS,
            EffectKind::Lofi => LOFI,
            EffectKind::Bandpass => BANDPASS,
            EffectKind::Limiter => LIMITER,
            EffectKind::Sidechain => SIDECHAIN,
        }
    }
}

impl Effect {
    /// Which slot this descriptor occupies.
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::Volume(_) => EffectKind::Volume,
            Effect::NoiseGate(_) => EffectKind::NoiseGate,
            Effect::Highpass(_) => EffectKind::Highpass,
            Effect::Compressor(_) => EffectKind::Compressor,
            Effect::MultiBandEq(_) => EffectKind::MultiBandEq,
            Effect::Distortion(_) => EffectKind::Distortion,
            Effect::TapeSaturation(_) => EffectKind::TapeSaturation,
            Effect::BitCrusher(_) => EffectKind::BitCrusher,
            Effect::Chorus(_) => EffectKind::Chorus,
            Effect::Flanger(_) => EffectKind::Flanger,
            Effect::Phaser(_) => EffectKind::Phaser,
            Effect::Delay(_) => EffectKind::Delay,
            Effect::Reverb(_) => EffectKind::Reverb,
            Effect::Pitch(_) => EffectKind::Pitch,
            Effect::Vibrato(_) => EffectKind::Vibrato,
            Effect::Tremolo(_) => EffectKind::Tremolo,
            Effect::RingModulator(_) => EffectKind::RingModulator,
            Effect::WahWah(_) => EffectKind::WahWah,
            Effect::Exciter(_) => EffectKind::Exciter,
            Effect::StereoWidener(_) => EffectKind::StereoWidener,
            Effect::Pan(_) => EffectKind::Pan,
            Effect::AutoPan(_) => EffectKind::AutoPan,
            Effect::Lowpass(_) => EffectKind::Lowpass,
            Effect::Lofi(_) => EffectKind::Lofi,
            Effect::Bandpass(_) => EffectKind::Bandpass,
            Effect::Limiter(_) => EffectKind::Limiter,
            Effect::Sidechain(_) => EffectKind::Sidechain,
        }
    }

    /// Numeric parameter values by name, matching [`EffectKind::param_specs`].
    pub fn params(&self) -> Vec<(&'static str, f32)> {
        match self {
            Effect::Volume(s) => vec![("gain", s.gain)],
            Effect::NoiseGate(s) => vec![
                ("threshold_db", s.threshold_db),
                ("attack_ms", s.attack_ms),
                ("hold_ms", s.hold_ms),
                ("release_ms", s.release_ms),
            ],
            Effect::Highpass(s) => vec![("cutoff", s.cutoff)],
            Effect::Compressor(s) => vec![
                ("threshold_db", s.threshold_db),
                ("ratio", s.ratio),
                ("attack_ms", s.attack_ms),
                ("release_ms", s.release_ms),
                ("makeup_db", s.makeup_db),
            ],
            Effect::MultiBandEq(s) => vec![
                ("low_gain_db", s.low_gain_db),
                ("mid_gain_db", s.mid_gain_db),
                ("high_gain_db", s.high_gain_db),
            ],
            Effect::Distortion(s) => vec![("amount", s.amount)],
            Effect::TapeSaturation(s) => vec![("drive", s.drive), ("mix", s.mix)],
            Effect::BitCrusher(s) => vec![
                ("bits", s.bits as f32),
                ("rate_reduction", s.rate_reduction),
            ],
            Effect::Chorus(s) => vec![
                ("rate", s.rate),
                ("depth", s.depth),
                ("feedback", s.feedback),
                ("wet", s.wet),
            ],
            Effect::Flanger(s) => vec![
                ("rate", s.rate),
                ("depth", s.depth),
                ("feedback", s.feedback),
                ("wet", s.wet),
            ],
            Effect::Phaser(s) => vec![
                ("rate", s.rate),
                ("depth", s.depth),
                ("stages", s.stages as f32),
            ],
            Effect::Delay(s) => vec![
                ("time_seconds", s.time_seconds),
                ("feedback", s.feedback),
                ("wet", s.wet),
            ],
            Effect::Reverb(s) => vec![
                ("room_size", s.room_size),
                ("dampening", s.dampening),
                ("wet", s.wet),
            ],
            Effect::Pitch(s) => vec![("semitones", s.semitones)],
            Effect::Vibrato(s) => vec![("rate", s.rate), ("depth", s.depth)],
            Effect::Tremolo(s) => vec![("rate", s.rate), ("depth", s.depth)],
            Effect::RingModulator(s) => vec![("frequency", s.frequency), ("depth", s.depth)],
            Effect::WahWah(s) => vec![("rate", s.rate), ("depth", s.depth)],
            Effect::Exciter(s) => vec![("amount", s.amount)],
            Effect::StereoWidener(s) => vec![("width", s.width)],
            Effect::Pan(s) => vec![("position", s.position)],
            Effect::AutoPan(s) => vec![("rate", s.rate), ("depth", s.depth)],
            Effect::Lowpass(s) => vec![("cutoff", s.cutoff)],
            Effect::Lofi(s) => vec![
                ("bits", s.bits as f32),
                ("rate_reduction", s.rate_reduction),
                ("cutoff", s.cutoff),
            ],
            Effect::Bandpass(s) => vec![("cutoff", s.cutoff), ("q", s.q)],
            Effect::Limiter(s) => vec![
                ("threshold_db", s.threshold_db),
                ("release_ms", s.release_ms),
            ],
            Effect::Sidechain(s) => vec![("rate", s.rate), ("amount", s.amount)],
        }
    }

    /// Validates every parameter against the canonical schema.
    pub fn validate(&self) -> DspResult<()> {
        let specs = self.kind().param_specs();
        for (name, value) in self.params() {
            let spec = specs
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| DspError::invalid_param(name, "unknown parameter"))?;
            if !spec.range.contains(value) {
                return Err(DspError::invalid_param(
                    name,
                    format!(
                        "must be {}-{}, got {}",
                        spec.range.min, spec.range.max, value
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl EffectChain {
    /// Enabled slots as tagged descriptors, in canonical chain order.
    pub fn enabled_effects(&self) -> Vec<Effect> {
        let mut effects = Vec::new();
        macro_rules! push_if_enabled {
            ($($field:ident => $variant:ident),* $(,)?) => {
                $(if self.$field.enabled {
                    effects.push(Effect::$variant(self.$field.clone()));
                })*
            };
        }
        push_if_enabled!(
            volume => Volume,
            noise_gate => NoiseGate,
            highpass => Highpass,
            compressor => Compressor,
            multi_band_eq => MultiBandEq,
            distortion => Distortion,
            tape_saturation => TapeSaturation,
            bit_crusher => BitCrusher,
            chorus => Chorus,
            flanger => Flanger,
            phaser => Phaser,
            delay => Delay,
            reverb => Reverb,
            pitch => Pitch,
            vibrato => Vibrato,
            tremolo => Tremolo,
            ring_modulator => RingModulator,
            wah_wah => WahWah,
            exciter => Exciter,
            stereo_widener => StereoWidener,
            pan => Pan,
            auto_pan => AutoPan,
            lowpass => Lowpass,
            lofi => Lofi,
            bandpass => Bandpass,
            limiter => Limiter,
            sidechain => Sidechain,
        );
        effects
    }

    /// A chain with every slot enabled at its default parameters. Test helper
    /// and schema-audit surface.
    pub fn all_enabled() -> Self {
        let mut chain = Self::default();
        chain.volume.enabled = true;
        chain.noise_gate.enabled = true;
        chain.highpass.enabled = true;
        chain.compressor.enabled = true;
        chain.multi_band_eq.enabled = true;
        chain.distortion.enabled = true;
        chain.tape_saturation.enabled = true;
        chain.bit_crusher.enabled = true;
        chain.chorus.enabled = true;
        chain.flanger.enabled = true;
        chain.phaser.enabled = true;
        chain.delay.enabled = true;
        chain.reverb.enabled = true;
        chain.pitch.enabled = true;
        chain.vibrato.enabled = true;
        chain.tremolo.enabled = true;
        chain.ring_modulator.enabled = true;
        chain.wah_wah.enabled = true;
        chain.exciter.enabled = true;
        chain.stereo_widener.enabled = true;
        chain.pan.enabled = true;
        chain.auto_pan.enabled = true;
        chain.lowpass.enabled = true;
        chain.lofi.enabled = true;
        chain.bandpass.enabled = true;
        chain.limiter.enabled = true;
        chain.sidechain.enabled = true;
        chain
    }
}

/// Applies the enabled stages of `chain` to `input`, returning a new buffer.
///
/// Every enabled stage is validated before any audio is processed, so an
/// out-of-range parameter in a late slot cannot waste work on the early ones.
pub fn apply_chain(input: &SampleBuffer, chain: &EffectChain) -> DspResult<SampleBuffer> {
    let effects = chain.enabled_effects();
    for effect in &effects {
        effect.validate()?;
    }
    let mut buffer = input.clone();
    for effect in &effects {
        apply_effect(&mut buffer, effect)?;
    }
    Ok(buffer)
}

/// Applies a single effect in place.
pub fn apply_effect(buffer: &mut SampleBuffer, effect: &Effect) -> DspResult<()> {
    effect.validate()?;
    let sample_rate = buffer.sample_rate() as f32;
    match effect {
        Effect::Volume(s) => {
            buffer.scale(s.gain);
        }
        Effect::NoiseGate(s) => dynamics::noise_gate(buffer, s, sample_rate),
        Effect::Highpass(s) => filters::highpass(buffer, s.cutoff, sample_rate),
        Effect::Compressor(s) => dynamics::compressor(buffer, s, sample_rate),
        Effect::MultiBandEq(s) => {
            eq::three_band(buffer, s.low_gain_db, s.mid_gain_db, s.high_gain_db)
        }
        Effect::Distortion(s) => distortion::waveshape(buffer, s.amount),
        Effect::TapeSaturation(s) => distortion::tape_saturate(buffer, s.drive, s.mix),
        Effect::BitCrusher(s) => distortion::bit_crush(buffer, s.bits, s.rate_reduction),
        Effect::Chorus(s) => modulation::chorus(buffer, s, sample_rate),
        Effect::Flanger(s) => modulation::flanger(buffer, s, sample_rate),
        Effect::Phaser(s) => modulation::phaser(buffer, s, sample_rate),
        Effect::Delay(s) => delay::echo(buffer, s, sample_rate),
        Effect::Reverb(s) => reverb::multi_tap(buffer, s, sample_rate),
        Effect::Pitch(s) => pitch::playback_rate(buffer, s.semitones)?,
        Effect::Vibrato(s) => modulation::vibrato(buffer, s, sample_rate),
        Effect::Tremolo(s) => modulation::tremolo(buffer, s, sample_rate),
        Effect::RingModulator(s) => modulation::ring_modulate(buffer, s, sample_rate),
        Effect::WahWah(s) => modulation::wah_wah(buffer, s, sample_rate),
        Effect::Exciter(s) => distortion::excite(buffer, s.amount),
        Effect::StereoWidener(s) => stereo::widen(buffer, s.width),
        Effect::Pan(s) => stereo::pan(buffer, s.position),
        Effect::AutoPan(s) => stereo::auto_pan(buffer, s, sample_rate),
        Effect::Lowpass(s) => filters::lowpass(buffer, s.cutoff, sample_rate),
        Effect::Lofi(s) => distortion::lofi(buffer, s, sample_rate),
        Effect::Bandpass(s) => filters::bandpass(buffer, s.cutoff, s.q, sample_rate),
        Effect::Limiter(s) => dynamics::limiter(buffer, s, sample_rate),
        Effect::Sidechain(s) => dynamics::sidechain_duck(buffer, s, sample_rate),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_kind_has_a_schema() {
        for kind in EffectKind::ALL {
            let specs = kind.param_specs();
            for spec in specs {
                assert!(
                    spec.range.min < spec.range.max,
                    "{:?}.{} has an empty range",
                    kind,
                    spec.name
                );
                assert!(spec.range.step > 0.0);
            }
        }
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let input = SampleBuffer::from_stereo(
            (0..1000).map(|i| (i as f32 * 0.01).sin() * 0.5).collect(),
            (0..1000).map(|i| (i as f32 * 0.013).sin() * 0.5).collect(),
            44100,
        )
        .unwrap();

        let output = apply_chain(&input, &EffectChain::default()).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_enabled_effects_follow_canonical_order() {
        let chain = EffectChain::all_enabled();
        let kinds: Vec<EffectKind> = chain.enabled_effects().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, EffectKind::ALL.to_vec());

        // Disabling slots must not reorder the remainder.
        let mut partial = EffectChain::default();
        partial.reverb.enabled = true;
        partial.volume.enabled = true;
        partial.lowpass.enabled = true;
        let kinds: Vec<EffectKind> = partial.enabled_effects().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![EffectKind::Volume, EffectKind::Reverb, EffectKind::Lowpass]
        );
    }

    #[test]
    fn test_param_schema_agrees_with_settings_structs() {
        // Guards against drift between the settings structs and the canonical
        // range table: every parameter a struct exposes must appear in the
        // schema (and vice versa), and every default must sit in range.
        for effect in EffectChain::all_enabled().enabled_effects() {
            let specs = effect.kind().param_specs();
            let params = effect.params();
            assert_eq!(
                specs.len(),
                params.len(),
                "schema/struct arity mismatch for {:?}",
                effect.kind()
            );
            for (name, value) in params {
                let spec = specs
                    .iter()
                    .find(|s| s.name == name)
                    .unwrap_or_else(|| panic!("{:?} has no schema for '{}'", effect.kind(), name));
                assert!(
                    spec.range.contains(value),
                    "{:?}.{} default {} outside {}..{}",
                    effect.kind(),
                    name,
                    value,
                    spec.range.min,
                    spec.range.max
                );
                assert!(spec.range.step > 0.0);
            }
        }
    }

    #[test]
    fn test_out_of_range_parameter_rejected() {
        let mut buffer = SampleBuffer::silent(2, 100, 44100).unwrap();
        let effect = Effect::Delay(DelaySettings {
            enabled: true,
            time_seconds: 5.0,
            feedback: 0.5,
            wet: 0.5,
        });
        let err = apply_effect(&mut buffer, &effect);
        assert!(matches!(err, Err(DspError::InvalidParameter { .. })));
    }

    #[test]
    fn test_length_preserved_by_all_stages_except_pitch() {
        let input = SampleBuffer::from_stereo(
            (0..4410).map(|i| (i as f32 * 0.05).sin() * 0.5).collect(),
            (0..4410).map(|i| (i as f32 * 0.05).cos() * 0.5).collect(),
            44100,
        )
        .unwrap();

        for effect in EffectChain::all_enabled().enabled_effects() {
            let mut buffer = input.clone();
            apply_effect(&mut buffer, &effect).unwrap();
            assert_eq!(buffer.num_channels(), 2);
            if effect.kind() != EffectKind::Pitch {
                assert_eq!(
                    buffer.len(),
                    input.len(),
                    "{:?} changed buffer length",
                    effect.kind()
                );
            }
        }
    }

    #[test]
    fn test_stereo_only_stages_pass_mono_through() {
        let mono = SampleBuffer::from_mono(
            (0..2000).map(|i| (i as f32 * 0.02).sin() * 0.7).collect(),
            44100,
        )
        .unwrap();

        for effect in [
            Effect::StereoWidener(StereoWidenerSettings {
                enabled: true,
                width: 1.8,
            }),
            Effect::Pan(PanSettings {
                enabled: true,
                position: -0.6,
            }),
            Effect::AutoPan(AutoPanSettings {
                enabled: true,
                rate: 2.0,
                depth: 0.9,
            }),
        ] {
            let mut buffer = mono.clone();
            apply_effect(&mut buffer, &effect).unwrap();
            assert_eq!(buffer, mono, "{:?} must no-op on mono", effect.kind());
        }
    }

    #[test]
    fn test_chain_settings_roundtrip_json() {
        let mut chain = EffectChain::default();
        chain.reverb.enabled = true;
        chain.reverb.room_size = 0.8;
        chain.lofi.enabled = true;
        chain.lofi.bits = 8;

        let json = serde_json::to_string(&chain).unwrap();
        let back: EffectChain = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);

        // Missing fields fall back to defaults.
        let sparse: EffectChain = serde_json::from_str(r#"{"delay":{"enabled":true}}"#).unwrap();
        assert!(sparse.delay.enabled);
        assert!(!sparse.reverb.enabled);
    }
}
