//! Parallel motion detection for multi-track note streams.
//!
//! Each track is reduced to a map of pitch transitions ("movements") keyed
//! by absolute tick. Movements that share a tick across two tracks are then
//! tested for parallel unisons/octaves, fourths and fifths.
//!
//! ```
//! use voice_leading::{extract, find_parallels, Event, TrackMovements};
//!
//! let soprano = [Event::onset(0, 69), Event::onset(480, 70)];
//! let tenor = [Event::onset(0, 57), Event::onset(480, 58)];
//!
//! let mut maps = TrackMovements::new();
//! maps.insert(0, extract(&soprano));
//! maps.insert(1, extract(&tenor));
//!
//! let findings: Vec<_> = find_parallels(&maps).collect();
//! assert_eq!(findings.len(), 1);
//! assert_eq!(findings[0].timestamp, 480);
//! ```

pub mod decode;
pub mod movement;
pub mod parallel;
pub mod report;

pub use decode::{decode_smf, DecodedSmf, DecodedTrack};
pub use movement::{
    extract, extract_checked, extract_tracks, pitch_class, Direction, Event, Movement,
    MovementMap, Pitch, TrackMovements,
};
pub use parallel::{find_parallels, is_parallel, parallel_interval, sort_findings, Finding, Interval};
pub use report::{render_line, NameStyle, Report};

/// Errors from decoding and validating note streams.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    MidiParse(String),

    #[error("invalid event {index}{}: {reason}", track_suffix(.track))]
    InvalidEvent {
        track: Option<usize>,
        index: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn track_suffix(track: &Option<usize>) -> String {
    track.map(|t| format!(" in track {t}")).unwrap_or_default()
}

/// Analyze raw SMF bytes end to end: decode, extract, detect.
///
/// Findings are returned in detector order (track pair, then tick).
pub fn analyze(midi_bytes: &[u8]) -> Result<(DecodedSmf, Vec<Finding>)> {
    let smf = decode_smf(midi_bytes)?;
    let tracks: Vec<Vec<Event>> = smf.tracks.iter().map(|t| t.events.clone()).collect();
    let maps = extract_tracks(&tracks)?;

    if maps.len() < 2 {
        tracing::warn!(
            tracks_with_movements = maps.len(),
            "fewer than two tracks move, nothing to compare"
        );
    }

    let findings = find_parallels(&maps).collect();
    Ok((smf, findings))
}
