//! Square-wave tone and noise-burst generators.
//!
//! Both generators return floating-point samples already scaled by
//! [`BASE_AMPLITUDE`]. Nothing is clipped here; saturation happens once, in
//! the quantizer.

use std::f64::consts::TAU;

use rand::Rng;

use crate::envelope::EnvelopeKind;

/// Peak sample value of a full-volume event.
pub const BASE_AMPLITUDE: f64 = 8000.0;

/// Tone and noise generator bound to a sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Oscillator {
    sample_rate: u32,
}

impl Oscillator {
    /// Creates an oscillator for the given sample rate.
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    /// Number of samples in an event of `duration` seconds.
    pub fn num_samples(&self, duration: f64) -> usize {
        let samples = (self.sample_rate as f64 * duration).round();
        if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        }
    }

    /// Renders a square-wave tone.
    ///
    /// A frequency of zero (a rest) yields silence of the same length.
    ///
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `duration` - Event length in seconds
    /// * `volume` - Linear gain applied on top of [`BASE_AMPLITUDE`]
    /// * `envelope` - Envelope shape
    pub fn tone(
        &self,
        frequency: f64,
        duration: f64,
        volume: f64,
        envelope: EnvelopeKind,
    ) -> Vec<f64> {
        let num_samples = self.num_samples(duration);
        if frequency == 0.0 {
            return vec![0.0; num_samples];
        }

        let rate = self.sample_rate as f64;
        let gains = envelope.curve(num_samples, duration, self.sample_rate);
        let level = BASE_AMPLITUDE * volume;

        gains
            .into_iter()
            .enumerate()
            .map(|(i, gain)| square(frequency, i as f64 / rate) * level * gain)
            .collect()
    }

    /// Renders a noise burst with the [`EnvelopeKind::Burst`] envelope.
    ///
    /// Draws exactly one value per sample from `rng`, in order.
    pub fn noise<R: Rng + ?Sized>(&self, duration: f64, volume: f64, rng: &mut R) -> Vec<f64> {
        let num_samples = self.num_samples(duration);
        let gains = EnvelopeKind::Burst.curve(num_samples, duration, self.sample_rate);
        let level = BASE_AMPLITUDE * volume;

        gains
            .into_iter()
            .map(|gain| rng.gen_range(-1.0..=1.0) * level * gain)
            .collect()
    }
}

/// Unit square wave: `+1` where `sin(2π·f·t)` is positive, `-1` elsewhere.
pub fn square(frequency: f64, t: f64) -> f64 {
    if (TAU * frequency * t).sin() > 0.0 {
        1.0
    } else {
        -1.0
    }
}
