//! End-to-end generation tests
//!
//! Tracks go in as JSON documents or built specs and come out as WAV files,
//! which are read back with `hound` rather than with our own parser.

use std::path::Path;

use bgmgen_backend::rng::create_rng;
use bgmgen_backend::wav::extract_pcm_data;
use bgmgen_backend::{generate, render_track, StepGrid};
use bgmgen_cli::commands::{generate as generate_cmd, generate_all};
use bgmgen_spec::{Pattern, TrackSet, TrackSpec, SAMPLE_RATE};
use bgmgen_tests::{boss_track, read_wav, read_wav_bytes, soundtrack_path, track_json, TrackFixture};
use pretty_assertions::assert_eq;

// ============================================================================
// Soundtrack
// ============================================================================

#[test]
fn test_soundtrack_document_loads() {
    let content = std::fs::read_to_string(soundtrack_path()).unwrap();
    let set = TrackSet::from_json(&content).unwrap();
    let names: Vec<&str> = set.tracks().map(|t| t.output_name.as_str()).collect();
    assert_eq!(names, vec!["stage1", "stage2", "stage3", "boss"]);
    assert!(bgmgen_spec::validate_track_set(&set).is_ok());
}

#[test]
fn test_soundtrack_renders_every_track() {
    let fixture = TrackFixture::new();
    let out = fixture.out_dir();

    let (output, code) = generate_all::execute(&soundtrack_path(), &out).unwrap();
    assert_eq!(code, 0);
    assert_eq!(output.succeeded, 4);

    // (name, total_steps, samples_per_step)
    let expected = [
        ("stage1", 138, 5088),
        ("stage2", 160, 4410),
        ("stage3", 181, 3891),
        ("boss", 192, 3675),
    ];
    for (name, steps, per_step) in expected {
        let info = read_wav(&out.join(format!("{}.wav", name))).unwrap();
        assert_eq!(info.channels, 2, "{}", name);
        assert_eq!(info.sample_rate, 44100, "{}", name);
        assert_eq!(info.bits_per_sample, 16, "{}", name);
        assert_eq!(info.frames as usize, steps * per_step, "{}", name);
    }

    // Whole steps only: stage1 stops 3456 frames short of 16 * 44100.
    let stage1 = read_wav(&out.join("stage1.wav")).unwrap();
    assert_eq!(stage1.frames, 702_144);
    assert!((stage1.frames as u64) < (16.0 * SAMPLE_RATE as f64).round() as u64);
}

// ============================================================================
// Single-track generation
// ============================================================================

#[test]
fn test_generate_command_writes_readable_wav() {
    let fixture = TrackFixture::new();
    let spec = fixture.write("stage2.json", &track_json("stage2", 150.0, 2.0));

    let (output, code) = generate_cmd::execute(&spec, &fixture.out_dir(), None);
    assert_eq!(code, 0, "{:?}", output.errors);

    let track = output.output.unwrap();
    assert_eq!(track.total_steps, 20);
    assert_eq!(track.samples_per_step, 4410);
    assert_eq!(track.frames, 20 * 4410);

    let info = read_wav(Path::new(&track.path)).unwrap();
    assert_eq!(info.frames as usize, track.frames);
    assert!(info.samples.iter().any(|&s| s != 0));
}

#[test]
fn test_wav_body_is_the_quantized_pcm() {
    let result = generate(&boss_track(1.0)).unwrap();
    let info = read_wav_bytes(&result.wav.wav_data).unwrap();

    let pcm = extract_pcm_data(&result.wav.wav_data).unwrap();
    assert_eq!(pcm.len(), result.wav.num_frames * 4);
    let decoded: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(decoded, info.samples);
}

#[test]
fn test_pcm_length_does_not_depend_on_patterns() {
    let quiet = TrackSpec::builder("quiet")
        .tempo(130.0)
        .duration(2.0)
        .bass(Pattern::parse(&["-"]).unwrap())
        .melody(Pattern::parse(&["-"]).unwrap())
        .build();
    let busy = TrackSpec::builder("busy")
        .tempo(130.0)
        .duration(2.0)
        .complexity(8)
        .boss(true)
        .bass(Pattern::parse(&["C2", "Eb2", "Gb2", "A2"]).unwrap())
        .melody(Pattern::parse(&["C5", "A4", "Gb4"]).unwrap())
        .build();

    let quiet = generate(&quiet).unwrap();
    let busy = generate(&busy).unwrap();
    assert_eq!(quiet.wav.pcm_data().len(), busy.wav.pcm_data().len());
    assert_eq!(quiet.wav.wav_data.len(), busy.wav.wav_data.len());
}

#[test]
fn test_short_track_renders_empty_with_warning() {
    let track = TrackSpec::builder("blip")
        .tempo(120.0)
        .duration(0.1)
        .bass(Pattern::parse(&["C2"]).unwrap())
        .melody(Pattern::parse(&["C4"]).unwrap())
        .build();

    let result = generate(&track).unwrap();
    assert_eq!(result.wav.num_frames, 0);
    assert_eq!(result.wav.wav_data.len(), 44);
    assert_eq!(result.warnings[0].code.code(), "W001");
}

// ============================================================================
// Voice layout
// ============================================================================

fn step_frames(info: &[i16], grid: &StepGrid, step: usize) -> Vec<i16> {
    let range = grid.step_range(step);
    info[range.start * 2..range.end * 2].to_vec()
}

fn quantized(track: &TrackSpec) -> Vec<i16> {
    let buffer = render_track(track, &mut create_rng(1)).unwrap();
    let bytes = bgmgen_backend::quantize::quantize(&buffer);
    bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect()
}

#[test]
fn test_melody_is_silent_during_intro() {
    let track = TrackSpec::builder("intro")
        .tempo(120.0)
        .duration(3.0)
        .complexity(1)
        .bass(Pattern::parse(&["-"]).unwrap())
        .melody(Pattern::parse(&["C4", "E4"]).unwrap())
        .build();
    let grid = StepGrid::for_track(&track, SAMPLE_RATE);
    let samples = quantized(&track);

    // Only the kick on steps 0 and 8 sounds before the melody enters.
    for step in (1..16).filter(|s| s % 8 != 0) {
        assert!(
            step_frames(&samples, &grid, step).iter().all(|&s| s == 0),
            "step {} should be silent",
            step
        );
    }
    assert!(step_frames(&samples, &grid, 17).iter().any(|&s| s != 0));
}

#[test]
fn test_boss_melody_starts_immediately() {
    let mut track = boss_track(1.0);
    track.bass_pattern = Pattern::parse(&["-"]).unwrap();
    let grid = StepGrid::for_track(&track, SAMPLE_RATE);
    let samples = quantized(&track);

    // Step 1: no kick (period 8), no hi-hat (odd step), melody only.
    let step1 = step_frames(&samples, &grid, 1);
    assert!(step1.iter().any(|&s| s != 0));
    // Melody pans right-heavy (0.3 / 0.9).
    let left: i32 = step1.iter().step_by(2).map(|&s| (s as i32).abs()).sum();
    let right: i32 = step1.iter().skip(1).step_by(2).map(|&s| (s as i32).abs()).sum();
    assert!(right > left * 2);
}

#[test]
fn test_hihat_fills_first_half_of_step() {
    let mut track = boss_track(1.0);
    track.bass_pattern = Pattern::parse(&["-"]).unwrap();
    track.melody_pattern = Pattern::parse(&["-"]).unwrap();
    let grid = StepGrid::for_track(&track, SAMPLE_RATE);
    let samples = quantized(&track);

    // Step 2 carries the hi-hat; its second half is silent.
    let step2 = step_frames(&samples, &grid, 2);
    let quarter = grid.samples_per_step / 4 * 2;
    let half = (grid.samples_per_step / 2 + 1) * 2;
    assert!(step2[..quarter].iter().any(|&s| s != 0));
    assert!(step2[half..].iter().all(|&s| s == 0));
    // Centered: both channels equal.
    assert!(step2.chunks_exact(2).all(|f| f[0] == f[1]));
}
