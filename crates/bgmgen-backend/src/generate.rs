//! Main entry point for track rendering.
//!
//! A track is validated, sequenced step by step, mixed into a stereo buffer,
//! quantized to 16-bit PCM, and wrapped in a WAV container.

use rand::Rng;
use tracing::{debug, trace};

use bgmgen_spec::{validate_track, TrackSpec, ValidationWarning, SAMPLE_RATE};

use crate::error::{RenderError, RenderResult};
use crate::mixer::StereoBuffer;
use crate::oscillator::Oscillator;
use crate::quantize::{count_clipped, BYTES_PER_FRAME};
use crate::rng::create_component_rng;
use crate::sequencer::{Sound, StepGrid, StepSequencer, VoiceEvent};
use crate::wav::{WavResult, MAX_DATA_LEN};

/// Component key for the noise stream.
pub const PERCUSSION_RNG_KEY: &str = "percussion";

/// Result of rendering a track.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// WAV file data.
    pub wav: WavResult,
    /// Steps rendered.
    pub total_steps: usize,
    /// Frames per step.
    pub samples_per_step: usize,
    /// Seed of the noise stream, when it was derived from a track seed.
    pub seed: Option<u32>,
    /// Largest absolute pre-quantization sample.
    pub peak: f64,
    /// Samples that saturated during quantization.
    pub clipped_samples: usize,
    /// Validation warnings for the track.
    pub warnings: Vec<ValidationWarning>,
}

/// Renders a track with its effective seed.
///
/// The seed is the track's `seed` field, or a hash of its output name.
pub fn generate(track: &TrackSpec) -> RenderResult<GenerateResult> {
    generate_with_seed(track, track.effective_seed())
}

/// Renders a track with an explicit seed, overriding the track's own.
pub fn generate_with_seed(track: &TrackSpec, seed: u32) -> RenderResult<GenerateResult> {
    let mut rng = create_component_rng(seed, PERCUSSION_RNG_KEY);
    let mut result = generate_with_rng(track, &mut rng)?;
    result.seed = Some(seed);
    Ok(result)
}

/// Renders a track drawing noise from a caller-supplied source.
pub fn generate_with_rng<R: Rng + ?Sized>(
    track: &TrackSpec,
    rng: &mut R,
) -> RenderResult<GenerateResult> {
    let warnings = check_track(track)?;
    let grid = StepGrid::for_track(track, SAMPLE_RATE);
    let buffer = render_grid(track, &grid, rng)?;

    let peak = buffer.peak();
    let clipped_samples = count_clipped(&buffer);
    let wav = WavResult::from_stereo(&buffer, SAMPLE_RATE)?;

    debug!(
        track = %track.output_name,
        frames = wav.num_frames,
        peak,
        clipped_samples,
        pcm_hash = %wav.pcm_hash,
        "rendered track"
    );

    Ok(GenerateResult {
        wav,
        total_steps: grid.total_steps,
        samples_per_step: grid.samples_per_step,
        seed: None,
        peak,
        clipped_samples,
        warnings,
    })
}

/// Renders a track to a floating-point stereo buffer.
///
/// The buffer holds `total_steps * samples_per_step` frames.
pub fn render_track<R: Rng + ?Sized>(track: &TrackSpec, rng: &mut R) -> RenderResult<StereoBuffer> {
    check_track(track)?;
    render_grid(track, &StepGrid::for_track(track, SAMPLE_RATE), rng)
}

fn check_track(track: &TrackSpec) -> RenderResult<Vec<ValidationWarning>> {
    validate_track(track)
        .into_result()
        .map_err(|errors| RenderError::InvalidSpec {
            name: track.output_name.clone(),
            errors,
        })
}

fn render_grid<R: Rng + ?Sized>(
    track: &TrackSpec,
    grid: &StepGrid,
    rng: &mut R,
) -> RenderResult<StereoBuffer> {
    let total_samples = grid.total_samples();
    let pcm_bytes = (total_samples as u64).saturating_mul(BYTES_PER_FRAME as u64);
    if pcm_bytes > MAX_DATA_LEN as u64 {
        return Err(RenderError::OutputTooLarge {
            name: track.output_name.clone(),
            bytes: pcm_bytes,
        });
    }

    debug!(
        track = %track.output_name,
        tempo_bpm = track.tempo_bpm,
        total_steps = grid.total_steps,
        samples_per_step = grid.samples_per_step,
        "rendering track"
    );

    let oscillator = Oscillator::new(grid.sample_rate);
    let sequencer = StepSequencer::new(track, grid.sample_rate);
    let mut buffer = StereoBuffer::silent(total_samples);

    for plan in sequencer.plans() {
        let range = grid.step_range(plan.step);
        trace!(
            step = plan.step,
            percussion = ?plan.percussion_hit(),
            "step"
        );
        for event in plan.events() {
            let samples = render_event(&oscillator, grid, event, rng);
            buffer.mix(range.clone(), &samples, event.voice.pan());
        }
    }

    Ok(buffer)
}

fn render_event<R: Rng + ?Sized>(
    oscillator: &Oscillator,
    grid: &StepGrid,
    event: &VoiceEvent,
    rng: &mut R,
) -> Vec<f64> {
    let duration = event.duration(grid);
    match event.sound {
        Sound::Tone {
            frequency,
            envelope,
        } => oscillator.tone(frequency, duration, event.volume, envelope),
        Sound::Noise => oscillator.noise(duration, event.volume, rng),
    }
}
