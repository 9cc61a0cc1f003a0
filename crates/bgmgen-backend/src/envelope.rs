//! Amplitude envelopes applied to tone and noise events.
//!
//! Three shapes are used:
//! - [`EnvelopeKind::Decaying`]: full level for a short hold, then exponential decay
//! - [`EnvelopeKind::Sustained`]: a gentle linear droop with a short fade-out tail
//! - [`EnvelopeKind::Burst`]: fast exponential decay from the first sample, used for noise

/// Seconds a decaying envelope holds full gain before it starts to fall.
pub const DECAY_HOLD_SECONDS: f64 = 0.05;

/// Exponential rate of the decaying envelope after the hold.
pub const DECAY_RATE: f64 = 15.0;

/// Fraction of gain a sustained envelope loses over the event.
pub const SUSTAIN_DROOP: f64 = 0.2;

/// Length in samples of the linear fade at the end of a sustained event.
pub const SUSTAIN_TAIL_SAMPLES: usize = 500;

/// Exponential rate of the noise burst envelope.
pub const BURST_DECAY_RATE: f64 = 30.0;

/// Envelope shape for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// Plucked shape used by bass, kick, and boss melody.
    Decaying,
    /// Held shape used by the regular melody.
    Sustained,
    /// Percussive burst used by noise hits.
    Burst,
}

impl EnvelopeKind {
    /// Short lowercase name, used in plans and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeKind::Decaying => "decaying",
            EnvelopeKind::Sustained => "sustained",
            EnvelopeKind::Burst => "burst",
        }
    }

    /// Gain at `t` seconds into an event lasting `duration` seconds.
    ///
    /// The sustained tail fade is sample-based and therefore only applied by
    /// [`EnvelopeKind::curve`].
    pub fn gain_at(&self, t: f64, duration: f64) -> f64 {
        match self {
            EnvelopeKind::Decaying => {
                if t <= DECAY_HOLD_SECONDS {
                    1.0
                } else {
                    (-DECAY_RATE * (t - DECAY_HOLD_SECONDS)).exp().max(0.0)
                }
            }
            EnvelopeKind::Sustained => {
                let progress = if duration > 0.0 { t / duration } else { 0.0 };
                (1.0 - SUSTAIN_DROOP * progress).max(0.0)
            }
            EnvelopeKind::Burst => (-BURST_DECAY_RATE * t).exp().max(0.0),
        }
    }

    /// Renders the full gain curve for an event of `num_samples` samples.
    ///
    /// For [`EnvelopeKind::Sustained`] the last [`SUSTAIN_TAIL_SAMPLES`]
    /// samples are additionally scaled by `(n - i) / 500`. Events shorter
    /// than the tail are faded over their whole length.
    pub fn curve(&self, num_samples: usize, duration: f64, sample_rate: u32) -> Vec<f64> {
        let rate = sample_rate as f64;
        let mut curve: Vec<f64> = (0..num_samples)
            .map(|i| self.gain_at(i as f64 / rate, duration))
            .collect();

        if *self == EnvelopeKind::Sustained {
            // i > n - 500, written without underflow for short events.
            for (i, gain) in curve.iter_mut().enumerate() {
                if i + SUSTAIN_TAIL_SAMPLES > num_samples {
                    *gain *= (num_samples - i) as f64 / SUSTAIN_TAIL_SAMPLES as f64;
                }
            }
        }

        curve
    }
}

impl std::fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
