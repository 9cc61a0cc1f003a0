//! Stereo mixing of per-step voice buffers.
//!
//! Voices are summed into a pre-sized [`StereoBuffer`] with fixed per-voice
//! channel weights. Mixing is purely additive; nothing is normalized or
//! clipped at this stage.

use std::ops::Range;

/// Fixed left/right gains for one voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanWeights {
    /// Gain applied to the left channel.
    pub left: f64,
    /// Gain applied to the right channel.
    pub right: f64,
}

impl PanWeights {
    /// Bass sits to the left.
    pub const BASS: PanWeights = PanWeights {
        left: 0.8,
        right: 0.4,
    };

    /// Melody sits to the right.
    pub const MELODY: PanWeights = PanWeights {
        left: 0.3,
        right: 0.9,
    };

    /// Percussion is centered at full level.
    pub const CENTER: PanWeights = PanWeights {
        left: 1.0,
        right: 1.0,
    };
}

/// Track-level stereo accumulation buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StereoBuffer {
    /// Left channel samples.
    pub left: Vec<f64>,
    /// Right channel samples.
    pub right: Vec<f64>,
}

impl StereoBuffer {
    /// Creates a silent buffer of `num_frames` frames.
    pub fn silent(num_frames: usize) -> Self {
        Self {
            left: vec![0.0; num_frames],
            right: vec![0.0; num_frames],
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a mono voice into `range` with the given pan weights.
    ///
    /// A voice shorter than the range only touches the matching prefix;
    /// samples past the end of the range or the buffer are ignored.
    pub fn mix(&mut self, range: Range<usize>, samples: &[f64], pan: PanWeights) {
        let end = range.end.min(self.len());
        if range.start >= end {
            return;
        }

        let left = &mut self.left[range.start..end];
        let right = &mut self.right[range.start..end];
        for ((l, r), &s) in left.iter_mut().zip(right.iter_mut()).zip(samples) {
            *l += s * pan.left;
            *r += s * pan.right;
        }
    }

    /// Largest absolute sample value across both channels.
    pub fn peak(&self) -> f64 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0f64, |acc, &s| acc.max(s.abs()))
    }
}
