//! Fixed-grid step sequencing.
//!
//! A track is cut into sixteenth-note steps. For every step the sequencer
//! decides which of the three voices sound and with which parameters; the
//! renderer then turns each [`VoiceEvent`] into samples.

use std::ops::Range;

use bgmgen_spec::{Note, TrackSpec};

use crate::envelope::EnvelopeKind;
use crate::mixer::PanWeights;
use crate::percussion::{select_percussion, PercussionHit, StepContext};

/// Step at which a non-boss melody enters.
pub const MELODY_ENTRY_STEP: usize = 16;

/// Bass level before intensity scaling.
pub const BASS_LEVEL: f64 = 0.6;

/// Melody level before intensity scaling.
pub const MELODY_LEVEL: f64 = 0.3;

/// Tolerance added before flooring `duration / step_duration`, so that a
/// duration that is an exact multiple of the step survives float rounding.
const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Timing grid of a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepGrid {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Step length in seconds.
    pub step_duration: f64,
    /// Step length in samples, `round(sample_rate * step_duration)`.
    pub samples_per_step: usize,
    /// Whole steps that fit in the track duration.
    pub total_steps: usize,
}

impl StepGrid {
    /// Builds the grid for a tempo and duration.
    pub fn new(tempo_bpm: f64, duration_seconds: f64, sample_rate: u32) -> Self {
        let step_duration = 60.0 / tempo_bpm / bgmgen_spec::STEPS_PER_BEAT as f64;
        let samples_per_step = to_count((sample_rate as f64 * step_duration).round());
        // A step shorter than one sample holds no audio, however many fit.
        let total_steps = if samples_per_step == 0 {
            0
        } else {
            to_count((duration_seconds / step_duration + STEP_COUNT_EPSILON).floor())
        };

        Self {
            sample_rate,
            step_duration,
            samples_per_step,
            total_steps,
        }
    }

    /// Builds the grid for a track.
    pub fn for_track(track: &TrackSpec, sample_rate: u32) -> Self {
        Self::new(track.tempo_bpm, track.duration_seconds, sample_rate)
    }

    /// Total frames in the rendered track.
    pub fn total_samples(&self) -> usize {
        self.total_steps.saturating_mul(self.samples_per_step)
    }

    /// Frame range covered by `step`.
    pub fn step_range(&self, step: usize) -> Range<usize> {
        let start = step * self.samples_per_step;
        start..start + self.samples_per_step
    }
}

fn to_count(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}

/// One of the three voices of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Bass,
    Melody,
    Percussion(PercussionHit),
}

impl Voice {
    /// Stereo placement of the voice.
    pub fn pan(&self) -> PanWeights {
        match self {
            Voice::Bass => PanWeights::BASS,
            Voice::Melody => PanWeights::MELODY,
            Voice::Percussion(_) => PanWeights::CENTER,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Voice::Bass => "bass",
            Voice::Melody => "melody",
            Voice::Percussion(hit) => hit.as_str(),
        }
    }
}

/// How an event produces sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sound {
    /// Square-wave tone.
    Tone {
        frequency: f64,
        envelope: EnvelopeKind,
    },
    /// Noise burst drawn from the track RNG.
    Noise,
}

/// A single voice sounding on one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceEvent {
    pub voice: Voice,
    pub sound: Sound,
    /// Final linear level, intensity already applied.
    pub volume: f64,
    /// Fraction of the step the event lasts.
    pub step_fraction: f64,
}

impl VoiceEvent {
    /// Event length in seconds on the given grid.
    pub fn duration(&self, grid: &StepGrid) -> f64 {
        grid.step_duration * self.step_fraction
    }
}

/// Everything that sounds on one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub step: usize,
    pub bass: Option<VoiceEvent>,
    pub melody: Option<VoiceEvent>,
    pub percussion: Option<VoiceEvent>,
}

impl StepPlan {
    /// Sounding events in mixing order: bass, melody, percussion.
    pub fn events(&self) -> impl Iterator<Item = &VoiceEvent> {
        self.bass
            .iter()
            .chain(self.melody.iter())
            .chain(self.percussion.iter())
    }

    /// The percussion hit on this step, if any.
    pub fn percussion_hit(&self) -> Option<PercussionHit> {
        match self.percussion.map(|e| e.voice) {
            Some(Voice::Percussion(hit)) => Some(hit),
            _ => None,
        }
    }

    /// True when nothing sounds on this step.
    pub fn is_silent(&self) -> bool {
        self.events().next().is_none()
    }
}

/// Whether the melody voice is evaluated on `step`.
pub fn melody_active(step: usize, boss_mode: bool) -> bool {
    boss_mode || step >= MELODY_ENTRY_STEP
}

fn tone_event(voice: Voice, note: Note, envelope: EnvelopeKind, volume: f64) -> Option<VoiceEvent> {
    if note.is_rest() {
        return None;
    }
    Some(VoiceEvent {
        voice,
        sound: Sound::Tone {
            frequency: note.frequency(),
            envelope,
        },
        volume,
        step_fraction: 1.0,
    })
}

fn percussion_event(hit: PercussionHit, intensity: f64) -> VoiceEvent {
    let sound = match hit.tone() {
        Some((frequency, envelope)) => Sound::Tone {
            frequency,
            envelope,
        },
        None => Sound::Noise,
    };
    VoiceEvent {
        voice: Voice::Percussion(hit),
        sound,
        volume: hit.level() * intensity,
        step_fraction: hit.step_fraction(),
    }
}

/// Plans a single step of a track.
///
/// Rests produce no event. Patterns wrap around, so any step index is valid.
pub fn plan_step(track: &TrackSpec, step: usize) -> StepPlan {
    let intensity = track.intensity;

    let bass = track.bass_pattern.note_at(step).and_then(|note| {
        tone_event(Voice::Bass, note, EnvelopeKind::Decaying, BASS_LEVEL * intensity)
    });

    let melody = if melody_active(step, track.boss_mode) {
        let envelope = if track.boss_mode {
            EnvelopeKind::Decaying
        } else {
            EnvelopeKind::Sustained
        };
        track
            .melody_pattern
            .note_at(step)
            .and_then(|note| tone_event(Voice::Melody, note, envelope, MELODY_LEVEL * intensity))
    } else {
        None
    };

    let ctx = StepContext {
        step,
        complexity: track.complexity,
        boss_mode: track.boss_mode,
    };
    let percussion = select_percussion(&ctx).map(|hit| percussion_event(hit, intensity));

    StepPlan {
        step,
        bass,
        melody,
        percussion,
    }
}

/// Step-by-step view of a track on its grid.
#[derive(Debug, Clone, Copy)]
pub struct StepSequencer<'a> {
    track: &'a TrackSpec,
    grid: StepGrid,
}

impl<'a> StepSequencer<'a> {
    /// Creates a sequencer for `track` at `sample_rate`.
    pub fn new(track: &'a TrackSpec, sample_rate: u32) -> Self {
        Self {
            track,
            grid: StepGrid::for_track(track, sample_rate),
        }
    }

    pub fn grid(&self) -> &StepGrid {
        &self.grid
    }

    pub fn track(&self) -> &'a TrackSpec {
        self.track
    }

    /// Plans every step in order.
    pub fn plans(&self) -> impl Iterator<Item = StepPlan> + 'a {
        let track = self.track;
        (0..self.grid.total_steps).map(move |step| plan_step(track, step))
    }
}
