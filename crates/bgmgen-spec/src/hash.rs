//! Canonical hashing and seed derivation.
//!
//! - Track hashes are BLAKE3 over the track's JSON form with object keys in
//!   sorted order, so two documents that differ only in key order or
//!   whitespace hash identically.
//! - Default seeds are derived from the output name, giving every track a
//!   stable noise stream without configuration.

use crate::error::SpecError;
use crate::track::TrackSpec;

/// Computes the canonical BLAKE3 hash of a track.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use bgmgen_spec::{Pattern, TrackSpec};
/// use bgmgen_spec::hash::canonical_track_hash;
///
/// let track = TrackSpec::builder("stage1")
///     .tempo(130.0)
///     .bass(Pattern::parse(&["C2"]).unwrap())
///     .melody(Pattern::parse(&["C4"]).unwrap())
///     .build();
///
/// let hash = canonical_track_hash(&track).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_track_hash(track: &TrackSpec) -> Result<String, SpecError> {
    // serde_json::Value keeps object keys in a BTreeMap, so the
    // re-serialized text is key-sorted.
    let value = serde_json::to_value(track)?;
    let canonical = serde_json::to_string(&value)?;
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Derives a 32-bit seed from an output name.
///
/// The seed is the first four bytes (little-endian) of `BLAKE3(name)`.
pub fn derive_name_seed(name: &str) -> u32 {
    let hash = blake3::hash(name.as_bytes());
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    fn track(name: &str, tempo: f64) -> TrackSpec {
        TrackSpec::builder(name)
            .tempo(tempo)
            .duration(4.0)
            .bass(Pattern::parse(&["C2", "-"]).unwrap())
            .melody(Pattern::parse(&["C4", "Eb4"]).unwrap())
            .build()
    }

    #[test]
    fn test_hash_is_stable() {
        let a = canonical_track_hash(&track("stage1", 130.0)).unwrap();
        let b = canonical_track_hash(&track("stage1", 130.0)).unwrap();
        assert_eq!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_key_order() {
        let one = r#"{"output_name":"a1","tempo_bpm":120,"duration_seconds":2,
            "bass_pattern":["C2"],"melody_pattern":["C4"]}"#;
        let two = r#"{"melody_pattern":["C4"],"bass_pattern":["C2"],
            "duration_seconds":2,"tempo_bpm":120,"output_name":"a1"}"#;
        let a = canonical_track_hash(&TrackSpec::from_json(one).unwrap()).unwrap();
        let b = canonical_track_hash(&TrackSpec::from_json(two).unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = canonical_track_hash(&track("stage1", 130.0)).unwrap();
        let b = canonical_track_hash(&track("stage1", 150.0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_seed_differs_per_name() {
        assert_eq!(derive_name_seed("boss"), derive_name_seed("boss"));
        assert_ne!(derive_name_seed("boss"), derive_name_seed("stage1"));
    }
}
