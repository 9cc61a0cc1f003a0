#![no_main]

use bgmgen_spec::{validate_track, validate_track_set, Note, TrackSet, TrackSpec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Note tokens either parse and print back to an equivalent note, or fail.
    if let Ok(note) = text.parse::<Note>() {
        let reparsed: Note = note.to_string().parse().expect("printed note must parse");
        assert_eq!(note.frequency(), reparsed.frequency());
    }

    if let Ok(track) = TrackSpec::from_json(text) {
        let _ = validate_track(&track);
        if let Ok(json) = track.to_json() {
            let again = TrackSpec::from_json(&json).expect("serialized track must load");
            assert_eq!(track, again);
        }
    }

    if let Ok(set) = TrackSet::from_json(text) {
        let _ = validate_track_set(&set);
    }
});
